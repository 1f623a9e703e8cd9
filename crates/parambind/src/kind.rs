//! Coarse type categories used as the fallback dispatch key.

use std::fmt;

/// Category of a bindable type.
///
/// The [`Registry`](crate::Registry) resolves a codec by exact type first and
/// falls back to the kind. Integer and float widths are distinct kinds so a
/// single codec can be registered for the whole family while still knowing
/// the width it must truncate to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// `bool`
    Bool,
    /// `isize`
    Int,
    /// `i8`
    Int8,
    /// `i16`
    Int16,
    /// `i32`
    Int32,
    /// `i64`
    Int64,
    /// `usize`
    Uint,
    /// `u8`
    Uint8,
    /// `u16`
    Uint16,
    /// `u32`
    Uint32,
    /// `u64`
    Uint64,
    /// `f32`
    Float32,
    /// `f64`
    Float64,
    /// `String`
    String,
    /// Named-field structs.
    Struct,
    /// Growable sequences.
    Slice,
    /// Key/value maps.
    Map,
    /// Owning pointers (`Box<T>`, `Option<T>`).
    Pointer,
    /// Handle types only reachable through an exact-type codec.
    Opaque,
}

impl Kind {
    /// Signed integer kinds.
    pub const SIGNED: [Self; 5] = [Self::Int, Self::Int8, Self::Int16, Self::Int32, Self::Int64];

    /// Unsigned integer kinds.
    pub const UNSIGNED: [Self; 5] = [
        Self::Uint,
        Self::Uint8,
        Self::Uint16,
        Self::Uint32,
        Self::Uint64,
    ];

    /// Floating-point kinds.
    pub const FLOATS: [Self; 2] = [Self::Float32, Self::Float64];

    /// Returns true for the signed integer family.
    #[must_use]
    pub const fn is_signed(&self) -> bool {
        matches!(
            self,
            Self::Int | Self::Int8 | Self::Int16 | Self::Int32 | Self::Int64
        )
    }

    /// Returns true for the unsigned integer family.
    #[must_use]
    pub const fn is_unsigned(&self) -> bool {
        matches!(
            self,
            Self::Uint | Self::Uint8 | Self::Uint16 | Self::Uint32 | Self::Uint64
        )
    }

    /// Returns true for the float family.
    #[must_use]
    pub const fn is_float(&self) -> bool {
        matches!(self, Self::Float32 | Self::Float64)
    }

    /// Bit width of numeric kinds.
    #[must_use]
    pub const fn bits(&self) -> Option<u32> {
        match self {
            Self::Int8 | Self::Uint8 => Some(8),
            Self::Int16 | Self::Uint16 => Some(16),
            Self::Int32 | Self::Uint32 | Self::Float32 => Some(32),
            Self::Int64 | Self::Uint64 | Self::Float64 => Some(64),
            Self::Int | Self::Uint => Some(usize::BITS),
            _ => None,
        }
    }

    /// Lower-case name used in log lines.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Int8 => "int8",
            Self::Int16 => "int16",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::Uint => "uint",
            Self::Uint8 => "uint8",
            Self::Uint16 => "uint16",
            Self::Uint32 => "uint32",
            Self::Uint64 => "uint64",
            Self::Float32 => "float32",
            Self::Float64 => "float64",
            Self::String => "string",
            Self::Struct => "struct",
            Self::Slice => "slice",
            Self::Map => "map",
            Self::Pointer => "pointer",
            Self::Opaque => "opaque",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

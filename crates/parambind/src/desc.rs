//! Runtime type descriptors.
//!
//! A [`TypeDesc`] is the "target type" handed to every codec. It carries the
//! exact type identity used for exact-type dispatch, the [`Kind`] used for the
//! fallback, and the [`Shape`] composite codecs recurse through. Child
//! descriptors are resolved lazily through [`DescribeFn`] pointers so that
//! self-referential types (a struct holding `Vec<Self>`) can be described.

use std::any::{type_name, TypeId};
use std::fmt;
use std::sync::Arc;

use crate::{Bindable, Kind, Value};

/// Lazily produces a descriptor. Always `<T as Bindable>::describe`.
pub type DescribeFn = fn() -> TypeDesc;

/// Produces the zero value of a type in its dynamic form.
pub type ZeroFn = fn() -> Value;

/// Structural layout of a type, as far as binding is concerned.
#[derive(Debug, Clone)]
pub enum Shape {
    /// Leaf type without children.
    Scalar,
    /// Sequence of `elem`.
    Slice {
        /// Element type.
        elem: DescribeFn,
    },
    /// Mapping from `key` to `value`.
    Map {
        /// Key type.
        key: DescribeFn,
        /// Value type.
        value: DescribeFn,
    },
    /// Named-field struct.
    Struct {
        /// Fields in declaration order.
        fields: Arc<[FieldDesc]>,
    },
    /// Owning pointer to `pointee`.
    Pointer {
        /// Pointee type.
        pointee: DescribeFn,
    },
    /// Handle type with no inner structure.
    Opaque,
}

/// A struct field as seen by the struct codec.
#[derive(Debug, Clone, Copy)]
pub struct FieldDesc {
    /// Name matched against the path segment after `name.`.
    pub name: &'static str,
    /// Whether the field is externally settable (declared `pub`).
    pub exported: bool,
    /// Field type.
    pub ty: DescribeFn,
}

impl FieldDesc {
    /// Creates a field descriptor.
    #[must_use]
    pub const fn new(name: &'static str, exported: bool, ty: DescribeFn) -> Self {
        Self { name, exported, ty }
    }

    /// Resolves the field type.
    #[must_use]
    pub fn describe(&self) -> TypeDesc {
        (self.ty)()
    }
}

/// Descriptor of a bindable type.
///
/// # Example
///
/// ```rust
/// use parambind::{Bindable, Kind};
///
/// let desc = <Vec<u32> as Bindable>::describe();
/// assert_eq!(desc.kind(), Kind::Slice);
/// assert_eq!(desc.elem().unwrap().kind(), Kind::Uint32);
/// ```
#[derive(Clone)]
pub struct TypeDesc {
    id: TypeId,
    name: &'static str,
    kind: Kind,
    shape: Shape,
    zero: ZeroFn,
}

impl TypeDesc {
    /// Describes `T` with the given kind and shape.
    #[must_use]
    pub fn new<T: Bindable>(kind: Kind, shape: Shape) -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
            kind,
            shape,
            zero: zero_of::<T>,
        }
    }

    /// Describes a leaf type.
    #[must_use]
    pub fn scalar<T: Bindable>(kind: Kind) -> Self {
        Self::new::<T>(kind, Shape::Scalar)
    }

    /// Describes a named-field struct.
    #[must_use]
    pub fn structure<T: Bindable>(fields: Vec<FieldDesc>) -> Self {
        Self::new::<T>(
            Kind::Struct,
            Shape::Struct {
                fields: fields.into(),
            },
        )
    }

    /// Exact type identity.
    #[must_use]
    pub fn type_id(&self) -> TypeId {
        self.id
    }

    /// Fully qualified type name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Type category.
    #[must_use]
    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// Structural layout.
    #[must_use]
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Zero value of the described type.
    #[must_use]
    pub fn zero(&self) -> Value {
        (self.zero)()
    }

    /// Element type of a slice.
    #[must_use]
    pub fn elem(&self) -> Option<TypeDesc> {
        match self.shape {
            Shape::Slice { elem } => Some(elem()),
            _ => None,
        }
    }

    /// Key and value types of a map.
    #[must_use]
    pub fn map_types(&self) -> Option<(TypeDesc, TypeDesc)> {
        match self.shape {
            Shape::Map { key, value } => Some((key(), value())),
            _ => None,
        }
    }

    /// Pointee type of a pointer.
    #[must_use]
    pub fn pointee(&self) -> Option<TypeDesc> {
        match self.shape {
            Shape::Pointer { pointee } => Some(pointee()),
            _ => None,
        }
    }

    /// Fields of a struct.
    #[must_use]
    pub fn fields(&self) -> Option<&[FieldDesc]> {
        match &self.shape {
            Shape::Struct { fields } => Some(&fields[..]),
            _ => None,
        }
    }

    /// Looks up a struct field by its exact binding name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldDesc> {
        self.fields()?.iter().find(|f| f.name == name)
    }
}

fn zero_of<T: Bindable>() -> Value {
    T::zero().to_value()
}

impl PartialEq for TypeDesc {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeDesc {}

impl fmt::Debug for TypeDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDesc")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("shape", &self.shape)
            .finish_non_exhaustive()
    }
}

//! Codec lookup by exact type, then by kind.

use std::any::{type_name, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::codec::composite::{MapCodec, PointerCodec, SliceCodec, StructCodec};
use crate::codec::file::{BytesCodec, FileCodec, ReaderCodec};
use crate::codec::scalar::{BoolCodec, FloatCodec, IntCodec, StringCodec, TimeCodec, UintCodec};
use crate::codec::{Codec, Scalar};
use crate::{BoundFile, BoundReader, Kind, TypeDesc};

/// Two lookup tables: exact type and kind.
///
/// Resolution checks the exact type first and falls back to the kind.
/// Registering again for the same key overwrites. Once handed to a
/// [`Binder`](crate::Binder) the registry is frozen.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use parambind::{Bindable, Kind, Registry};
/// use parambind::codec::{scalar::StringCodec, Scalar};
///
/// let mut registry = Registry::new();
/// registry.register_kind(Kind::String, Arc::new(Scalar(StringCodec)));
/// assert!(registry.resolve(&String::describe()).is_some());
/// assert!(registry.resolve(&u8::describe()).is_none());
/// ```
#[derive(Clone, Default)]
pub struct Registry {
    types: HashMap<TypeId, (&'static str, Arc<dyn Codec>)>,
    kinds: HashMap<Kind, Arc<dyn Codec>>,
}

impl Registry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the built-in codecs.
    ///
    /// Kinds: every scalar kind, slice, map, struct and pointer. Exact types:
    /// the chrono time types, [`Bytes`], [`BoundFile`] and [`BoundReader`].
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();

        registry.register_kind(Kind::Bool, Arc::new(Scalar(BoolCodec)));
        registry.register_kinds(&Kind::SIGNED, Arc::new(Scalar(IntCodec)));
        registry.register_kinds(&Kind::UNSIGNED, Arc::new(Scalar(UintCodec)));
        registry.register_kinds(&Kind::FLOATS, Arc::new(Scalar(FloatCodec)));
        registry.register_kind(Kind::String, Arc::new(Scalar(StringCodec)));
        registry.register_kind(Kind::Slice, Arc::new(SliceCodec));
        registry.register_kind(Kind::Map, Arc::new(MapCodec));
        registry.register_kind(Kind::Struct, Arc::new(StructCodec));
        registry.register_kind(Kind::Pointer, Arc::new(PointerCodec));

        let time: Arc<dyn Codec> = Arc::new(Scalar(TimeCodec));
        registry.register_type_of::<NaiveDateTime>(Arc::clone(&time));
        registry.register_type_of::<NaiveDate>(Arc::clone(&time));
        registry.register_type_of::<DateTime<Utc>>(time);

        registry.register_type_of::<Bytes>(Arc::new(BytesCodec));
        registry.register_type_of::<BoundFile>(Arc::new(FileCodec));
        registry.register_type_of::<BoundReader>(Arc::new(ReaderCodec));

        registry
    }

    /// Registers a codec for an exact type identity.
    pub fn register_type(&mut self, id: TypeId, codec: Arc<dyn Codec>) -> &mut Self {
        self.types.insert(id, ("<unnamed>", codec));
        self
    }

    /// Registers a codec for the exact type `T`.
    pub fn register_type_of<T: 'static>(&mut self, codec: Arc<dyn Codec>) -> &mut Self {
        self.types
            .insert(TypeId::of::<T>(), (type_name::<T>(), codec));
        self
    }

    /// Registers a codec for a kind.
    pub fn register_kind(&mut self, kind: Kind, codec: Arc<dyn Codec>) -> &mut Self {
        self.kinds.insert(kind, codec);
        self
    }

    /// Registers one shared codec for several kinds.
    pub fn register_kinds(&mut self, kinds: &[Kind], codec: Arc<dyn Codec>) -> &mut Self {
        for kind in kinds {
            self.kinds.insert(*kind, Arc::clone(&codec));
        }
        self
    }

    /// Finds the codec for a type: exact type first, kind second.
    pub fn resolve(&self, ty: &TypeDesc) -> Option<&dyn Codec> {
        self.types
            .get(&ty.type_id())
            .map(|(_, codec)| codec)
            .or_else(|| self.kinds.get(&ty.kind()))
            .map(AsRef::as_ref)
    }

    /// Returns true if an exact-type codec is registered for `T`.
    pub fn has_type<T: 'static>(&self) -> bool {
        self.types.contains_key(&TypeId::of::<T>())
    }

    /// Returns true if a kind codec is registered.
    pub fn has_kind(&self, kind: Kind) -> bool {
        self.kinds.contains_key(&kind)
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut types: Vec<_> = self.types.values().map(|(name, _)| *name).collect();
        types.sort_unstable();
        let mut kinds: Vec<_> = self.kinds.keys().map(Kind::as_str).collect();
        kinds.sort_unstable();
        f.debug_struct("Registry")
            .field("types", &types)
            .field("kinds", &kinds)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binder::DecodeContext;
    use crate::{Bindable, BindResult, Binder, BinderOptions, ParameterSet, Value};

    struct Fixed(i64);

    impl Codec for Fixed {
        fn decode(&self, _cx: &DecodeContext<'_>, _name: &str, _ty: &TypeDesc) -> BindResult<Value> {
            Ok(Value::Int(self.0))
        }
    }

    #[test]
    fn test_defaults_cover_every_kind() {
        let registry = Registry::with_defaults();
        for kind in Kind::SIGNED
            .iter()
            .chain(&Kind::UNSIGNED)
            .chain(&Kind::FLOATS)
            .chain(&[Kind::Bool, Kind::String, Kind::Slice, Kind::Map, Kind::Struct, Kind::Pointer])
        {
            assert!(registry.has_kind(*kind), "missing {kind}");
        }
        assert!(!registry.has_kind(Kind::Opaque));
        assert!(registry.has_type::<NaiveDateTime>());
        assert!(registry.has_type::<BoundFile>());
    }

    #[test]
    fn test_exact_type_beats_kind() {
        let mut registry = Registry::with_defaults();
        registry.register_type_of::<i16>(Arc::new(Fixed(42)));
        let binder = Binder::new(registry, BinderOptions::default());

        let params: ParameterSet = [("n", "7")].into_iter().collect();
        assert_eq!(binder.bind::<i16>(&params, "n"), 42);
        assert_eq!(binder.bind::<i32>(&params, "n"), 7);
    }

    #[test]
    fn test_reregistration_overwrites() {
        let mut registry = Registry::new();
        registry.register_kind(Kind::Int32, Arc::new(Fixed(1)));
        registry.register_kind(Kind::Int32, Arc::new(Fixed(2)));
        let binder = Binder::new(registry, BinderOptions::default());
        assert_eq!(binder.bind::<i32>(&ParameterSet::new(), "x"), 2);
    }

    #[test]
    fn test_unresolved_is_zero() {
        let binder = Binder::new(Registry::new(), BinderOptions::default());
        let params: ParameterSet = [("n", "7")].into_iter().collect();
        assert_eq!(binder.bind::<i32>(&params, "n"), 0);
        assert!(binder.unbind_to_map("n", &7i32).is_empty());
        assert!(Registry::new().resolve(&i32::describe()).is_none());
    }

    #[test]
    fn test_debug_lists_names() {
        let rendered = format!("{:?}", Registry::with_defaults());
        assert!(rendered.contains("chrono"));
        assert!(rendered.contains("pointer"));
    }
}

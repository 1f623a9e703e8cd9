//! The total binding entry points.
//!
//! A [`Binder`] pairs a frozen [`Registry`] with [`BinderOptions`] and is
//! built once at startup. Cloning is cheap; every clone shares the same
//! registry. Decoding never fails: codec errors are logged through
//! `tracing` under the `parambind::binder` target and replaced by the zero
//! value of the requested type. Encoding an unsupported type writes nothing.
//! JSON bodies are decoded separately, through
//! [`ParameterSet::bind_json`](crate::ParameterSet::bind_json).

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::{BindError, Bindable, FilePart, ParameterSet, Registry, TypeDesc, Value};

/// `tracing` target of the binder's diagnostics.
pub const LOG_TARGET: &str = "parambind::binder";

/// Default date-only layout (strftime).
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Default date-time layout (strftime).
pub const DEFAULT_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Default upper bound on explicit slice indices.
pub const DEFAULT_MAX_SLICE_INDEX: usize = 10_000;

/// Default bound on nested codec calls for one decode.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Default file-name prefix of staged uploads.
pub const DEFAULT_TEMP_PREFIX: &str = "parambind-upload";

/// Settings read by the codecs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinderOptions {
    /// Parse layouts, tried in order.
    pub time_formats: Vec<String>,
    /// Output layout for times at exactly midnight.
    pub date_format: String,
    /// Output layout for all other times.
    pub datetime_format: String,
    /// Slice indices above this are ignored.
    pub max_slice_index: usize,
    /// Nested codec calls allowed below one decode; deeper paths decode
    /// to the zero value.
    pub max_depth: usize,
    /// Directory for staged uploads; the system temp dir when unset.
    pub temp_dir: Option<PathBuf>,
    /// File-name prefix for staged uploads.
    pub temp_prefix: String,
}

impl Default for BinderOptions {
    fn default() -> Self {
        Self {
            time_formats: vec![
                DEFAULT_DATETIME_FORMAT.to_string(),
                DEFAULT_DATE_FORMAT.to_string(),
            ],
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            datetime_format: DEFAULT_DATETIME_FORMAT.to_string(),
            max_slice_index: DEFAULT_MAX_SLICE_INDEX,
            max_depth: DEFAULT_MAX_DEPTH,
            temp_dir: None,
            temp_prefix: DEFAULT_TEMP_PREFIX.to_string(),
        }
    }
}

impl BinderOptions {
    /// Appends a parse layout.
    pub fn with_time_format(mut self, layout: impl Into<String>) -> Self {
        self.time_formats.push(layout.into());
        self
    }

    /// Sets the date-only output layout.
    pub fn with_date_format(mut self, layout: impl Into<String>) -> Self {
        self.date_format = layout.into();
        self
    }

    /// Sets the date-time output layout.
    pub fn with_datetime_format(mut self, layout: impl Into<String>) -> Self {
        self.datetime_format = layout.into();
        self
    }

    /// Sets the slice index limit.
    pub fn with_max_slice_index(mut self, limit: usize) -> Self {
        self.max_slice_index = limit;
        self
    }

    /// Sets the nesting limit.
    pub fn with_max_depth(mut self, limit: usize) -> Self {
        self.max_depth = limit;
        self
    }

    /// Sets the staging directory for uploads.
    pub fn with_temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = Some(dir.into());
        self
    }

    /// Sets the staging file-name prefix.
    pub fn with_temp_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.temp_prefix = prefix.into();
        self
    }
}

struct Inner {
    registry: Registry,
    options: BinderOptions,
}

/// Converts between flat parameters and typed values.
///
/// # Example
///
/// ```rust
/// use parambind::{Binder, ParameterSet};
///
/// let binder = Binder::default();
/// let params: ParameterSet = [("id", "123"), ("ol[0]", "1"), ("ol[1]", "2")]
///     .into_iter()
///     .collect();
///
/// let id: i32 = binder.bind(&params, "id");
/// let ol: Vec<i32> = binder.bind(&params, "ol");
/// assert_eq!((id, ol), (123, vec![1, 2]));
///
/// let out = binder.unbind_to_map("ol", &vec![1, 2]);
/// assert_eq!(out["ol[1]"], "2");
/// ```
#[derive(Clone)]
pub struct Binder {
    inner: Arc<Inner>,
}

impl Default for Binder {
    fn default() -> Self {
        Self::new(Registry::with_defaults(), BinderOptions::default())
    }
}

impl fmt::Debug for Binder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binder")
            .field("registry", &self.inner.registry)
            .field("options", &self.inner.options)
            .finish()
    }
}

impl Binder {
    /// Freezes `registry` and `options` into a binder.
    #[must_use]
    pub fn new(registry: Registry, options: BinderOptions) -> Self {
        Self {
            inner: Arc::new(Inner { registry, options }),
        }
    }

    /// The built-in registry with custom options.
    #[must_use]
    pub fn with_options(options: BinderOptions) -> Self {
        Self::new(Registry::with_defaults(), options)
    }

    /// The codec registry.
    pub fn registry(&self) -> &Registry {
        &self.inner.registry
    }

    /// The codec settings.
    pub fn options(&self) -> &BinderOptions {
        &self.inner.options
    }

    /// Decodes the parameters under `name` as `ty`.
    pub fn decode(&self, params: &ParameterSet, name: &str, ty: &TypeDesc) -> Value {
        DecodeContext::new(self, params).decode(name, ty)
    }

    /// Binds the parameters under `name` to a `T`.
    ///
    /// Only flat values and uploads are read. A JSON body kept on `params`
    /// never fills a struct or map here; decode it with
    /// [`ParameterSet::bind_json`] instead.
    pub fn bind<T: Bindable>(&self, params: &ParameterSet, name: &str) -> T {
        T::from_value(self.decode(params, name, &T::describe()))
    }

    /// Binds the parameters under `name` into an existing variable.
    pub fn bind_into<T: Bindable>(&self, params: &ParameterSet, dest: &mut T, name: &str) {
        *dest = self.bind(params, name);
    }

    /// Decodes a single raw string as the direct value of `ty`.
    pub fn decode_value(&self, raw: &str, ty: &TypeDesc) -> Value {
        let scratch = ParameterSet::direct_value(raw);
        DecodeContext::new(self, &scratch).decode("", ty)
    }

    /// Binds a single raw string to a `T`.
    pub fn bind_value<T: Bindable>(&self, raw: &str) -> T {
        T::from_value(self.decode_value(raw, &T::describe()))
    }

    /// Decodes a single upload as the direct value of `ty`.
    ///
    /// Temporary files staged on the way are handed to `owner`.
    pub fn decode_file(&self, owner: &ParameterSet, part: &FilePart, ty: &TypeDesc) -> Value {
        DecodeContext::new(self, owner).decode_file(part, ty)
    }

    /// Binds a single upload to a `T`.
    pub fn bind_file<T: Bindable>(&self, owner: &ParameterSet, part: &FilePart) -> T {
        T::from_value(self.decode_file(owner, part, &T::describe()))
    }

    /// Writes `value`, described by `ty`, as flat entries under `name`.
    pub fn encode(
        &self,
        out: &mut IndexMap<String, String>,
        name: &str,
        value: &Value,
        ty: &TypeDesc,
    ) {
        EncodeContext::new(self).encode(out, name, value, ty);
    }

    /// Writes a `T` as flat entries under `name`.
    pub fn unbind<T: Bindable>(&self, out: &mut IndexMap<String, String>, name: &str, value: &T) {
        self.encode(out, name, &value.to_value(), &T::describe());
    }

    /// Writes a `T` into a fresh map.
    pub fn unbind_to_map<T: Bindable>(&self, name: &str, value: &T) -> IndexMap<String, String> {
        let mut out = IndexMap::new();
        self.unbind(&mut out, name, value);
        out
    }
}

/// State handed to [`Codec::decode`](crate::codec::Codec::decode).
pub struct DecodeContext<'a> {
    binder: &'a Binder,
    params: &'a ParameterSet,
    depth: usize,
}

impl<'a> DecodeContext<'a> {
    fn new(binder: &'a Binder, params: &'a ParameterSet) -> Self {
        Self {
            binder,
            params,
            depth: 0,
        }
    }

    fn with_params<'b>(&self, params: &'b ParameterSet) -> DecodeContext<'b>
    where
        'a: 'b,
    {
        DecodeContext {
            binder: self.binder,
            params,
            depth: self.depth,
        }
    }

    /// The parameters being decoded.
    pub fn params(&self) -> &'a ParameterSet {
        self.params
    }

    /// The binder's settings.
    pub fn options(&self) -> &'a BinderOptions {
        self.binder.options()
    }

    /// Nested codec calls above this context.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Decodes a sub-key through the registry; never fails.
    pub fn decode(&self, name: &str, ty: &TypeDesc) -> Value {
        let limit = self.options().max_depth;
        if self.depth >= limit {
            self.report(name, ty, &BindError::DepthExceeded { limit });
            return ty.zero();
        }

        let Some(codec) = self.binder.registry().resolve(ty) else {
            self.report(
                name,
                ty,
                &BindError::Unresolved {
                    type_name: ty.name(),
                    kind: ty.kind(),
                },
            );
            return ty.zero();
        };

        let child = DecodeContext {
            binder: self.binder,
            params: self.params,
            depth: self.depth + 1,
        };
        match codec.decode(&child, name, ty) {
            Ok(value) => value,
            Err(err) => {
                self.report(name, ty, &err);
                ty.zero()
            }
        }
    }

    /// Decodes one raw string as the direct value of `ty`.
    pub fn decode_value(&self, raw: &str, ty: &TypeDesc) -> Value {
        let scratch = ParameterSet::direct_value(raw);
        self.with_params(&scratch).decode("", ty)
    }

    /// Decodes one upload as the direct value of `ty`.
    ///
    /// Temporary files staged on the way move to this context's parameters.
    pub fn decode_file(&self, part: &FilePart, ty: &TypeDesc) -> Value {
        let scratch = ParameterSet::direct_file(part);
        let value = self.with_params(&scratch).decode("", ty);
        self.params.adopt_temp_files(&scratch);
        value
    }

    /// Logs a soft failure without aborting the decode.
    pub fn report(&self, name: &str, ty: &TypeDesc, err: &BindError) {
        report("decode", name, ty, err);
    }
}

/// State handed to [`Codec::encode`](crate::codec::Codec::encode).
pub struct EncodeContext<'a> {
    binder: &'a Binder,
}

impl<'a> EncodeContext<'a> {
    fn new(binder: &'a Binder) -> Self {
        Self { binder }
    }

    /// The binder's settings.
    pub fn options(&self) -> &'a BinderOptions {
        self.binder.options()
    }

    /// Encodes a sub-value through the registry; failures write nothing.
    pub fn encode(
        &self,
        out: &mut IndexMap<String, String>,
        name: &str,
        value: &Value,
        ty: &TypeDesc,
    ) {
        let result = match self.binder.registry().resolve(ty) {
            Some(codec) => codec.encode(self, out, name, value, ty),
            None => Err(BindError::Unresolved {
                type_name: ty.name(),
                kind: ty.kind(),
            }),
        };
        if let Err(err) = result {
            report("encode", name, ty, &err);
        }
    }
}

fn report(op: &'static str, name: &str, ty: &TypeDesc, err: &BindError) {
    if err.is_input_error() {
        tracing::debug!(
            target: LOG_TARGET,
            op,
            param = name,
            type_name = ty.name(),
            kind = %ty.kind(),
            error = %err,
            "binding fell back to zero value"
        );
    } else {
        tracing::warn!(
            target: LOG_TARGET,
            op,
            param = name,
            type_name = ty.name(),
            kind = %ty.kind(),
            error = %err,
            "binding fell back to zero value"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_builder() {
        let options = BinderOptions::default()
            .with_time_format("%d/%m/%Y")
            .with_date_format("%d.%m.%Y")
            .with_max_slice_index(5)
            .with_max_depth(8);
        assert_eq!(
            options.time_formats,
            ["%Y-%m-%d %H:%M", "%Y-%m-%d", "%d/%m/%Y"]
        );
        assert_eq!(options.date_format, "%d.%m.%Y");
        assert_eq!(options.datetime_format, DEFAULT_DATETIME_FORMAT);
        assert_eq!(options.max_slice_index, 5);
        assert_eq!(options.max_depth, 8);
    }

    #[test]
    fn test_nesting_past_max_depth_is_zero() {
        let params: ParameterSet = [("a[0][0][0]", "5")].into_iter().collect();

        let got: Vec<Vec<Vec<u8>>> = Binder::default().bind(&params, "a");
        assert_eq!(got, vec![vec![vec![5u8]]]);

        let shallow = Binder::with_options(BinderOptions::default().with_max_depth(2));
        let got: Vec<Vec<Vec<u8>>> = shallow.bind(&params, "a");
        assert_eq!(got, vec![vec![Vec::<u8>::new()]]);

        let none = Binder::with_options(BinderOptions::default().with_max_depth(0));
        assert_eq!(none.bind::<u8>(&[("n", "3")].into_iter().collect(), "n"), 0);
    }

    #[test]
    fn test_absent_key_is_zero_for_every_scalar() {
        let binder = Binder::default();
        let params = ParameterSet::new();
        assert_eq!(binder.bind::<i64>(&params, "x"), 0);
        assert_eq!(binder.bind::<u8>(&params, "x"), 0);
        assert!(!binder.bind::<bool>(&params, "x"));
        assert_eq!(binder.bind::<String>(&params, "x"), "");
        assert!(binder.bind::<f32>(&params, "x").abs() < f32::EPSILON);
        assert_eq!(
            binder.bind::<chrono::NaiveDateTime>(&params, "x"),
            chrono::NaiveDateTime::default()
        );
    }

    #[test]
    fn test_json_body_is_not_consulted() {
        let mut params: ParameterSet = [("n", "1")].into_iter().collect();
        params.set_json(r#"{"n": 5, "m": {"a": 2}}"#);
        let binder = Binder::default();

        assert_eq!(binder.bind::<u32>(&params, "n"), 1);
        assert!(binder
            .bind::<std::collections::HashMap<String, u32>>(&params, "m")
            .is_empty());

        let body: serde_json::Value = params.bind_json().unwrap();
        assert_eq!(body["m"]["a"], 2);
    }

    #[test]
    fn test_bind_into() {
        let params: ParameterSet = [("n", "9")].into_iter().collect();
        let mut n = 1u32;
        Binder::default().bind_into(&params, &mut n, "n");
        assert_eq!(n, 9);
    }

    #[test]
    fn test_bind_file_hands_temp_files_to_owner() {
        let owner = ParameterSet::new();
        let part = FilePart::from_bytes("x");
        let bound: crate::BoundFile = Binder::default().bind_file(&owner, &part);
        assert!(!bound.is_empty());
        assert_eq!(owner.temp_files().len(), 1);
        assert_eq!(owner.purge().removed.len(), 1);
    }

    #[test]
    fn test_clones_share_registry() {
        let binder = Binder::default();
        let clone = binder.clone();
        assert!(std::ptr::eq(binder.registry(), clone.registry()));
    }

    #[test]
    fn test_binder_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Binder>();
    }
}

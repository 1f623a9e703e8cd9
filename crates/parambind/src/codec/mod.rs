//! Codecs: paired decode/encode behaviour for one type or kind.
//!
//! Every codec implements [`Codec`]. Leaf codecs that only ever look at the
//! first value under their key implement the narrower [`ScalarCodec`] and are
//! registered through the [`Scalar`] adapter, which takes care of the
//! "missing key means zero value" rule and the single output entry.

pub mod composite;
pub mod file;
pub mod scalar;

use indexmap::IndexMap;

use crate::binder::{DecodeContext, EncodeContext};
use crate::{BindError, BindResult, TypeDesc, Value};

/// Decode/encode behaviour registered for a type or kind.
///
/// Errors returned from either method are logged by the
/// [`Binder`](crate::Binder) and replaced by the zero value (decode) or
/// dropped (encode); they never reach callers of the binding API.
pub trait Codec: Send + Sync {
    /// Builds a value of type `ty` from the parameters under `name`.
    fn decode(&self, cx: &DecodeContext<'_>, name: &str, ty: &TypeDesc) -> BindResult<Value>;

    /// Writes `value` as flat entries under `name`.
    ///
    /// The default reports [`BindError::EncodeUnsupported`].
    fn encode(
        &self,
        cx: &EncodeContext<'_>,
        out: &mut IndexMap<String, String>,
        name: &str,
        value: &Value,
        ty: &TypeDesc,
    ) -> BindResult<()> {
        let _ = (cx, out, name, value);
        Err(BindError::EncodeUnsupported {
            type_name: ty.name(),
        })
    }
}

/// A codec for a single textual value.
pub trait ScalarCodec: Send + Sync {
    /// Parses the first value found under the key.
    fn parse(&self, cx: &DecodeContext<'_>, raw: &str, ty: &TypeDesc) -> BindResult<Value>;

    /// Renders a value as text.
    fn format(&self, cx: &EncodeContext<'_>, value: &Value, ty: &TypeDesc) -> BindResult<String>;
}

/// Adapts a [`ScalarCodec`] into a [`Codec`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Scalar<C>(pub C);

impl<C: ScalarCodec> Codec for Scalar<C> {
    fn decode(&self, cx: &DecodeContext<'_>, name: &str, ty: &TypeDesc) -> BindResult<Value> {
        match cx.params().first(name) {
            Some(raw) => self.0.parse(cx, raw, ty),
            None => Ok(ty.zero()),
        }
    }

    fn encode(
        &self,
        cx: &EncodeContext<'_>,
        out: &mut IndexMap<String, String>,
        name: &str,
        value: &Value,
        ty: &TypeDesc,
    ) -> BindResult<()> {
        let text = self.0.format(cx, value, ty)?;
        out.insert(name.to_string(), text);
        Ok(())
    }
}

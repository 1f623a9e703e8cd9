//! Recursive codecs for slices, maps, structs and pointers.
//!
//! These split the key namespace under `name` into sub-keys and decode each
//! sub-key back through the registry:
//!
//! | key             | codec  | sub-key decoded        |
//! |-----------------|--------|------------------------|
//! | `a[3].email`    | slice  | `a[3]` as the element  |
//! | `a[]`           | slice  | each raw value directly|
//! | `m[region]`     | map    | `m[region]` as value   |
//! | `user.Name`     | struct | `user.Name` as field   |

mod map;
mod slice;
mod structure;

pub use map::MapCodec;
pub use slice::SliceCodec;
pub use structure::StructCodec;

use indexmap::IndexMap;

use crate::binder::{DecodeContext, EncodeContext};
use crate::codec::Codec;
use crate::{BindError, BindResult, TypeDesc, Value};

/// Decodes the pointee under the same name and wraps it.
#[derive(Debug, Clone, Copy, Default)]
pub struct PointerCodec;

impl Codec for PointerCodec {
    fn decode(&self, cx: &DecodeContext<'_>, name: &str, ty: &TypeDesc) -> BindResult<Value> {
        let pointee = ty.pointee().ok_or_else(|| BindError::shape(ty, "pointer"))?;
        Ok(Value::Pointer(Some(Box::new(cx.decode(name, &pointee)))))
    }

    fn encode(
        &self,
        cx: &EncodeContext<'_>,
        out: &mut IndexMap<String, String>,
        name: &str,
        value: &Value,
        ty: &TypeDesc,
    ) -> BindResult<()> {
        let pointee = ty.pointee().ok_or_else(|| BindError::shape(ty, "pointer"))?;
        match value {
            Value::Pointer(Some(inner)) => {
                cx.encode(out, name, inner, &pointee);
                Ok(())
            }
            Value::Pointer(None) => Ok(()),
            other => Err(BindError::mismatch(ty.name(), "pointer", other)),
        }
    }
}

/// Splits `prefix<inner>]<rest>` and returns `inner` with the sub-key
/// `prefix<inner>]`.
///
/// `prefix` must end in `[`.
fn bracket<'k>(key: &'k str, prefix: &str) -> Option<(&'k str, &'k str)> {
    let rest = key.strip_prefix(prefix)?;
    let close = rest.find(']')?;
    Some((&rest[..close], &key[..prefix.len() + close + 1]))
}

/// Next path segment: everything up to the next `.` or `[`.
fn next_segment(path: &str) -> &str {
    path.find(['.', '[']).map_or(path, |end| &path[..end])
}

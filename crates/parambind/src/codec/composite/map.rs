use std::collections::HashSet;

use indexmap::IndexMap;

use super::bracket;
use crate::binder::{DecodeContext, EncodeContext};
use crate::codec::Codec;
use crate::value::upsert_entry;
use crate::{BindError, BindResult, TypeDesc, Value};

/// Maps addressed as `name[key]`.
///
/// The bracket text is decoded as the key type; the value is decoded from
/// the sub-key `name[key]`, so nested paths such as `m[a].ID` work. Keys
/// with anything but `.` or `[` after the closing bracket are skipped. When
/// two bracket texts decode to the same key, the later one wins.
#[derive(Debug, Clone, Copy, Default)]
pub struct MapCodec;

impl Codec for MapCodec {
    fn decode(&self, cx: &DecodeContext<'_>, name: &str, ty: &TypeDesc) -> BindResult<Value> {
        let (key_ty, value_ty) = ty.map_types().ok_or_else(|| BindError::shape(ty, "map"))?;
        let params = cx.params();
        let prefix = format!("{name}[");

        let mut seen = HashSet::new();
        let mut entries = Vec::new();

        for key in params.values().keys().chain(params.files().keys()) {
            let Some((raw_key, sub_key)) = bracket(key, &prefix) else {
                continue;
            };
            let rest = &key[sub_key.len()..];
            if !rest.is_empty() && !rest.starts_with(['.', '[']) {
                tracing::debug!(
                    target: crate::binder::LOG_TARGET,
                    param = key.as_str(),
                    "text after map key bracket, skipped"
                );
                continue;
            }
            if !seen.insert(sub_key) {
                continue;
            }
            let map_key = cx.decode_value(raw_key, &key_ty);
            let map_value = cx.decode(sub_key, &value_ty);
            upsert_entry(&mut entries, map_key, map_value);
        }

        Ok(Value::Map(entries))
    }

    fn encode(
        &self,
        cx: &EncodeContext<'_>,
        out: &mut IndexMap<String, String>,
        name: &str,
        value: &Value,
        ty: &TypeDesc,
    ) -> BindResult<()> {
        let (key_ty, value_ty) = ty.map_types().ok_or_else(|| BindError::shape(ty, "map"))?;
        let entries = match value {
            Value::Map(entries) => entries,
            other => return Err(BindError::mismatch(ty.name(), "map", other)),
        };

        for (key, value) in entries {
            let mut scratch = IndexMap::new();
            cx.encode(&mut scratch, "", key, &key_ty);
            match scratch.shift_remove("") {
                Some(text) => cx.encode(out, &format!("{name}[{text}]"), value, &value_ty),
                None => tracing::debug!(
                    target: crate::binder::LOG_TARGET,
                    param = name,
                    "map key has no textual form, entry skipped"
                ),
            }
        }
        Ok(())
    }
}

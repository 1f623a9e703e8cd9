use std::collections::HashSet;

use indexmap::IndexMap;

use super::next_segment;
use crate::binder::{DecodeContext, EncodeContext};
use crate::codec::Codec;
use crate::{BindError, BindResult, TypeDesc, Value};

/// Structs addressed as `name.Field`, chaining for nested structs.
///
/// Only exported fields bind. A field is decoded once, from the first key
/// that names it; unknown and unexported names are logged and skipped.
#[derive(Debug, Clone, Copy, Default)]
pub struct StructCodec;

impl Codec for StructCodec {
    fn decode(&self, cx: &DecodeContext<'_>, name: &str, ty: &TypeDesc) -> BindResult<Value> {
        let params = cx.params();
        let prefix = format!("{name}.");

        let mut visited = HashSet::new();
        let mut fields = Vec::new();

        for key in params.values().keys().chain(params.files().keys()) {
            let Some(suffix) = key.strip_prefix(&prefix) else {
                continue;
            };
            let field_name = next_segment(suffix);
            if !visited.insert(field_name) {
                continue;
            }

            let Some(field) = ty.field(field_name) else {
                cx.report(
                    name,
                    ty,
                    &BindError::MissingField {
                        field: field_name.to_string(),
                        type_name: ty.name(),
                    },
                );
                continue;
            };
            if !field.exported {
                cx.report(
                    name,
                    ty,
                    &BindError::UnsettableField {
                        field: field_name.to_string(),
                        type_name: ty.name(),
                    },
                );
                continue;
            }

            let sub_key = &key[..prefix.len() + field_name.len()];
            let value = cx.decode(sub_key, &field.describe());
            fields.push((field.name.to_string(), value));
        }

        Ok(Value::Struct(fields))
    }

    fn encode(
        &self,
        cx: &EncodeContext<'_>,
        out: &mut IndexMap<String, String>,
        name: &str,
        value: &Value,
        ty: &TypeDesc,
    ) -> BindResult<()> {
        if !matches!(value, Value::Struct(_)) {
            return Err(BindError::mismatch(ty.name(), "struct", value));
        }
        for field in ty.fields().unwrap_or_default() {
            if !field.exported {
                continue;
            }
            if let Some(field_value) = value.field(field.name) {
                cx.encode(
                    out,
                    &format!("{name}.{}", field.name),
                    field_value,
                    &field.describe(),
                );
            }
        }
        Ok(())
    }
}

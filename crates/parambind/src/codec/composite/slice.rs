use std::collections::HashSet;

use indexmap::IndexMap;

use super::bracket;
use crate::binder::{DecodeContext, EncodeContext};
use crate::codec::Codec;
use crate::{BindError, BindResult, FilePart, TypeDesc, Value};

/// Sequences addressed as `name[i]` (indexed) or `name[]` (unindexed).
///
/// Indexed elements land at their index; gaps hold the element's zero
/// value. Unindexed elements follow, in parameter arrival order, values
/// before files.
#[derive(Debug, Clone, Copy, Default)]
pub struct SliceCodec;

enum Raw<'a> {
    Values(&'a [String]),
    Files(&'a [FilePart]),
}

impl Codec for SliceCodec {
    fn decode(&self, cx: &DecodeContext<'_>, name: &str, ty: &TypeDesc) -> BindResult<Value> {
        let elem = ty.elem().ok_or_else(|| BindError::shape(ty, "slice"))?;
        let params = cx.params();
        let limit = cx.options().max_slice_index;
        let prefix = format!("{name}[");

        let mut seen = HashSet::new();
        let mut indexed: Vec<(usize, Value)> = Vec::new();
        let mut unindexed = Vec::new();
        let mut len = 0;

        let keys = params
            .values()
            .iter()
            .map(|(key, values)| (key, Raw::Values(values)))
            .chain(
                params
                    .files()
                    .iter()
                    .map(|(key, parts)| (key, Raw::Files(parts))),
            );

        for (key, raw) in keys {
            let Some((inner, sub_key)) = bracket(key, &prefix) else {
                continue;
            };

            if inner.is_empty() {
                match raw {
                    Raw::Values(values) => {
                        unindexed.extend(values.iter().map(|v| cx.decode_value(v, &elem)));
                    }
                    Raw::Files(parts) => {
                        unindexed.extend(parts.iter().map(|p| cx.decode_file(p, &elem)));
                    }
                }
                continue;
            }

            let index = match inner.parse::<usize>() {
                Ok(index) if index <= limit => index,
                Ok(index) => {
                    tracing::warn!(
                        target: crate::binder::LOG_TARGET,
                        param = key.as_str(),
                        index,
                        limit,
                        "slice index above limit, skipped"
                    );
                    continue;
                }
                Err(_) => {
                    tracing::debug!(
                        target: crate::binder::LOG_TARGET,
                        param = key.as_str(),
                        "non-numeric slice index, skipped"
                    );
                    continue;
                }
            };

            if !seen.insert(sub_key) {
                continue;
            }
            len = len.max(index + 1);
            indexed.push((index, cx.decode(sub_key, &elem)));
        }

        let mut slots: Vec<Option<Value>> = std::iter::repeat_with(|| None).take(len).collect();
        for (index, value) in indexed {
            slots[index] = Some(value);
        }

        let mut items = Vec::with_capacity(len + unindexed.len());
        items.extend(slots.into_iter().map(|slot| slot.unwrap_or_else(|| elem.zero())));
        items.extend(unindexed);
        Ok(Value::Slice(items))
    }

    fn encode(
        &self,
        cx: &EncodeContext<'_>,
        out: &mut IndexMap<String, String>,
        name: &str,
        value: &Value,
        ty: &TypeDesc,
    ) -> BindResult<()> {
        let elem = ty.elem().ok_or_else(|| BindError::shape(ty, "slice"))?;
        let items = match value {
            Value::Slice(items) => items,
            other => return Err(BindError::mismatch(ty.name(), "slice", other)),
        };
        for (i, item) in items.iter().enumerate() {
            cx.encode(out, &format!("{name}[{i}]"), item, &elem);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::{Binder, BinderOptions, FilePart, ParameterSet, Registry};

    #[test]
    fn test_indexed_then_unindexed() {
        let params: ParameterSet = [("a[2]", "x"), ("a[0]", "y"), ("a[]", "z")]
            .into_iter()
            .collect();
        let got: Vec<String> = Binder::default().bind(&params, "a");
        assert_eq!(got, ["y", "", "x", "z"]);
    }

    #[test]
    fn test_only_unindexed_keeps_arrival_order() {
        let params: ParameterSet = [("ul[]", "str"), ("ul[]", "array"), ("ul[]", "!")]
            .into_iter()
            .collect();
        let got: Vec<String> = Binder::default().bind(&params, "ul");
        assert_eq!(got, ["str", "array", "!"]);
    }

    #[test]
    fn test_later_index_writer_wins() {
        let params: ParameterSet = [("a[0]", "1"), ("a[00]", "2")].into_iter().collect();
        let got: Vec<i32> = Binder::default().bind(&params, "a");
        assert_eq!(got, [2]);
    }

    #[test]
    fn test_nested_struct_paths_decoded_once_per_index() {
        let params: ParameterSet = [("m[1][0]", "a"), ("m[1][1]", "b"), ("m[0][0]", "c")]
            .into_iter()
            .collect();
        let got: Vec<Vec<String>> = Binder::default().bind(&params, "m");
        assert_eq!(got, vec![vec!["c".to_string()], vec!["a".to_string(), "b".to_string()]]);
    }

    #[test]
    fn test_junk_indices_skipped() {
        let params: ParameterSet = [("a[x]", "1"), ("a[-1]", "2"), ("a[1]", "3"), ("a[99]", "4")]
            .into_iter()
            .collect();
        let binder = Binder::new(
            Registry::with_defaults(),
            BinderOptions::default().with_max_slice_index(10),
        );
        let got: Vec<u8> = binder.bind(&params, "a");
        assert_eq!(got, [0, 3]);
    }

    #[test]
    fn test_prefix_must_match_exactly() {
        let params: ParameterSet = [("ab[0]", "1"), ("a.b", "2")].into_iter().collect();
        let got: Vec<i32> = Binder::default().bind(&params, "a");
        assert!(got.is_empty());
    }

    #[test]
    fn test_unindexed_files_follow_values() {
        let mut params: ParameterSet = [("docs[]", "inline")].into_iter().collect();
        params.add_file("docs[]", FilePart::from_bytes("one"));
        params.add_file("docs[]", FilePart::from_bytes("two"));

        let got: Vec<bytes::Bytes> = Binder::default().bind(&params, "docs");
        // A plain value has no upload behind it, so its slot is empty.
        assert_eq!(got, ["", "one", "two"].map(|s| bytes::Bytes::from_static(s.as_bytes())));
    }

    #[test]
    fn test_encode() {
        let out = Binder::default().unbind_to_map("a", &vec![1, 2, 3]);
        let pairs: Vec<_> = out.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
        assert_eq!(pairs, [("a[0]", "1"), ("a[1]", "2"), ("a[2]", "3")]);
    }
}

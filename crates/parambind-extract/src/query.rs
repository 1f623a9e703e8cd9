//! URL-encoded pair parsing for query strings.

use crate::{ExtractionSource, LOG_TARGET};

/// Decodes `a=1&b=2&a=3` into ordered pairs, keeping repeats.
///
/// Undecodable input is logged and yields no pairs.
pub(crate) fn decode_pairs(source: ExtractionSource, raw: &[u8]) -> Vec<(String, String)> {
    if raw.is_empty() {
        return Vec::new();
    }
    match serde_urlencoded::from_bytes::<Vec<(String, String)>>(raw) {
        Ok(pairs) => pairs,
        Err(error) => {
            tracing::warn!(
                target: LOG_TARGET,
                source = %source,
                error = %error,
                "skipping undecodable url-encoded parameters"
            );
            Vec::new()
        }
    }
}

/// Parses the query string of a request.
pub(crate) fn query_pairs(query: Option<&str>) -> Vec<(String, String)> {
    decode_pairs(ExtractionSource::Query, query.unwrap_or("").as_bytes())
}

//! Building a [`ParameterSet`] from a request.

use parambind::ParameterSet;
use parambind_config::LimitConfig;

use crate::form::form_pairs;
use crate::multipart::read_multipart;
use crate::query::query_pairs;
use crate::{ExtractionError, ExtractionSource, RequestParts, LOG_TARGET};

/// Limits applied while reading a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractConfig {
    /// Largest body accepted, in bytes.
    pub max_body_size: usize,
    /// Most query or body fields accepted, each counted separately.
    pub max_fields: usize,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self::from(&LimitConfig::default())
    }
}

impl From<&LimitConfig> for ExtractConfig {
    fn from(limits: &LimitConfig) -> Self {
        Self {
            max_body_size: limits.max_body_size,
            max_fields: limits.max_fields,
        }
    }
}

impl ExtractConfig {
    /// Set the maximum body size.
    #[must_use]
    pub fn max_body_size(mut self, size: usize) -> Self {
        self.max_body_size = size;
        self
    }

    /// Set the maximum number of fields.
    #[must_use]
    pub fn max_fields(mut self, count: usize) -> Self {
        self.max_fields = count;
        self
    }
}

/// Reads every parameter source of a request into one [`ParameterSet`].
///
/// The body is read according to its media type:
///
/// | Media type | Result |
/// |------------|--------|
/// | `application/x-www-form-urlencoded` | form values |
/// | `multipart/form-data` | form values and in-memory file parts |
/// | `application/json`, `text/json` | raw body kept for [`ParameterSet::bind_json`] |
///
/// Values merge from least to most trusted: query values first, form
/// values appended after them, then route and fixed parameters each
/// replacing any earlier values of the same name.
///
/// # Errors
///
/// Returns `ExtractionError` when the body exceeds `max_body_size` or the
/// query or body carries more than `max_fields` fields. Malformed input
/// is logged and skipped.
pub async fn extract_params(
    parts: &RequestParts,
    config: &ExtractConfig,
) -> Result<ParameterSet, ExtractionError> {
    let body = parts.body();
    if body.len() > config.max_body_size {
        return Err(ExtractionError::payload_too_large(
            config.max_body_size,
            body.len(),
        ));
    }

    let query = query_pairs(parts.query_string());
    if query.len() > config.max_fields {
        return Err(ExtractionError::too_many_fields(
            ExtractionSource::Query,
            config.max_fields,
            query.len(),
        ));
    }

    let mut params: ParameterSet = query.into_iter().collect();

    match parts.media_type().as_deref() {
        Some("application/x-www-form-urlencoded") => {
            let form = form_pairs(body);
            if form.len() > config.max_fields {
                return Err(ExtractionError::too_many_fields(
                    ExtractionSource::Body,
                    config.max_fields,
                    form.len(),
                ));
            }
            params.extend(form);
        }
        Some("multipart/form-data") => {
            let content_type = parts.content_type().unwrap_or_default();
            let form = read_multipart(content_type, body.clone(), config.max_fields).await?;
            params.extend(form.values);
            for (name, part) in form.files {
                params.add_file(name, part);
            }
        }
        Some("application/json" | "text/json") => {
            if body.is_empty() {
                tracing::debug!(target: LOG_TARGET, "json request with an empty body");
            } else {
                params.set_json(body.clone());
            }
        }
        _ => {}
    }

    for (name, values) in group(parts.route_params()) {
        params.set(name, values);
    }
    for (name, values) in group(parts.fixed_params()) {
        params.set(name, values);
    }

    tracing::debug!(
        target: LOG_TARGET,
        method = %parts.method(),
        path = parts.uri().path(),
        values = params.values().len(),
        files = params.files().len(),
        "extracted request parameters"
    );

    Ok(params)
}

/// Collects repeated names so each replaces as a unit.
fn group(pairs: &[(String, String)]) -> Vec<(String, Vec<String>)> {
    let mut grouped: Vec<(String, Vec<String>)> = Vec::new();
    for (name, value) in pairs {
        match grouped.iter_mut().find(|(n, _)| n == name) {
            Some((_, values)) => values.push(value.clone()),
            None => grouped.push((name.clone(), vec![value.clone()])),
        }
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::multipart::tests::{multipart_body, BOUNDARY};
    use bytes::Bytes;
    use http::{header, HeaderMap, HeaderValue, Method, Uri};

    fn request(uri: &'static str, content_type: Option<&str>, body: Bytes) -> RequestParts {
        let mut headers = HeaderMap::new();
        if let Some(content_type) = content_type {
            headers.insert(
                header::CONTENT_TYPE,
                HeaderValue::from_str(content_type).unwrap(),
            );
        }
        RequestParts::new(Method::POST, Uri::from_static(uri), headers, body)
    }

    fn values(params: &ParameterSet, key: &str) -> Vec<String> {
        params.get(key).map(<[String]>::to_vec).unwrap_or_default()
    }

    #[tokio::test]
    async fn test_merge_precedence() {
        let parts = request(
            "/users/7?id=1&tag=a&mode=view",
            Some("application/x-www-form-urlencoded"),
            Bytes::from_static(b"tag=b&id=2&name=rob"),
        )
        .with_route_param("id", "7")
        .with_fixed_param("mode", "edit");

        let params = extract_params(&parts, &ExtractConfig::default()).await.unwrap();

        assert_eq!(values(&params, "tag"), ["a", "b"]);
        assert_eq!(values(&params, "id"), ["7"]);
        assert_eq!(values(&params, "mode"), ["edit"]);
        assert_eq!(values(&params, "name"), ["rob"]);
        let keys: Vec<_> = params.values().keys().map(String::as_str).collect();
        assert_eq!(keys, ["id", "tag", "mode", "name"]);
    }

    #[tokio::test]
    async fn test_fixed_overrides_route() {
        let parts = request("/", None, Bytes::new())
            .with_route_param("page", "2")
            .with_route_param("page", "3")
            .with_fixed_param("page", "1");
        let params = extract_params(&parts, &ExtractConfig::default()).await.unwrap();
        assert_eq!(values(&params, "page"), ["1"]);

        let parts = request("/", None, Bytes::new())
            .with_route_param("page", "2")
            .with_route_param("page", "3");
        let params = extract_params(&parts, &ExtractConfig::default()).await.unwrap();
        assert_eq!(values(&params, "page"), ["2", "3"]);
    }

    #[tokio::test]
    async fn test_json_body_kept_raw() {
        let parts = request(
            "/?id=5",
            Some("application/json; charset=utf-8"),
            Bytes::from_static(br#"{"name":"rob"}"#),
        );
        let params = extract_params(&parts, &ExtractConfig::default()).await.unwrap();
        assert_eq!(params.json(), Some(&br#"{"name":"rob"}"#[..]));
        assert_eq!(values(&params, "id"), ["5"]);
        assert!(params.get("name").is_none());

        let parts = request("/", Some("text/json"), Bytes::new());
        let params = extract_params(&parts, &ExtractConfig::default()).await.unwrap();
        assert!(params.json().is_none());
    }

    #[tokio::test]
    async fn test_multipart_values_and_files() {
        let body = multipart_body(&[("title", None, "report"), ("doc", Some("a.txt"), "hi")]);
        let content_type = format!("multipart/form-data; boundary={BOUNDARY}");
        let parts = request("/?title=draft", Some(&content_type), body);

        let params = extract_params(&parts, &ExtractConfig::default()).await.unwrap();
        assert_eq!(values(&params, "title"), ["draft", "report"]);
        assert_eq!(params.files_for("doc").len(), 1);
        assert!(params.temp_files().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_content_type_ignores_body() {
        let parts = request("/?a=1", Some("text/plain"), Bytes::from_static(b"b=2"));
        let params = extract_params(&parts, &ExtractConfig::default()).await.unwrap();
        assert_eq!(values(&params, "a"), ["1"]);
        assert!(!params.contains_key("b"));
    }

    #[tokio::test]
    async fn test_body_size_limit() {
        let parts = request(
            "/",
            Some("application/x-www-form-urlencoded"),
            Bytes::from_static(b"a=123456789"),
        );
        let err = extract_params(&parts, &ExtractConfig::default().max_body_size(4))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), http::StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn test_field_limits() {
        let config = ExtractConfig::default().max_fields(2);

        let parts = request("/?a=1&b=2&c=3", None, Bytes::new());
        let err = extract_params(&parts, &config).await.unwrap_err();
        assert_eq!(err.extraction_source(), ExtractionSource::Query);

        let parts = request(
            "/?a=1&b=2",
            Some("application/x-www-form-urlencoded"),
            Bytes::from_static(b"c=3&d=4&e=5"),
        );
        let err = extract_params(&parts, &config).await.unwrap_err();
        assert_eq!(err.extraction_source(), ExtractionSource::Body);
    }

    #[test]
    fn test_config_from_limits() {
        let limits = LimitConfig {
            max_body_size: 10,
            max_fields: 3,
            ..LimitConfig::default()
        };
        let config = ExtractConfig::from(&limits);
        assert_eq!(config.max_body_size, 10);
        assert_eq!(config.max_fields, 3);
    }

    #[test]
    fn test_group_keeps_first_position() {
        let pairs = [
            ("a".to_string(), "1".to_string()),
            ("b".to_string(), "2".to_string()),
            ("a".to_string(), "3".to_string()),
        ];
        assert_eq!(
            group(&pairs),
            [
                ("a".to_string(), vec!["1".to_string(), "3".to_string()]),
                ("b".to_string(), vec!["2".to_string()]),
            ]
        );
    }
}

//! The parts of an HTTP request that carry parameters.

use bytes::Bytes;
use http::{header, HeaderMap, Method, Uri};

/// Request data handed to [`extract_params`](crate::extract_params).
///
/// Route parameters come from the router's match (`/users/{id}`); fixed
/// parameters are constants attached to the route itself. Both override
/// query and body values of the same name.
///
/// # Example
///
/// ```rust
/// use parambind_extract::RequestParts;
/// use http::{HeaderMap, Method, Uri};
/// use bytes::Bytes;
///
/// let parts = RequestParts::new(
///     Method::GET,
///     Uri::from_static("/users/123?tab=posts"),
///     HeaderMap::new(),
///     Bytes::new(),
/// )
/// .with_route_param("id", "123");
///
/// assert_eq!(parts.query_string(), Some("tab=posts"));
/// assert_eq!(parts.route_params(), [("id".to_string(), "123".to_string())]);
/// ```
#[derive(Debug, Clone)]
pub struct RequestParts {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
    route_params: Vec<(String, String)>,
    fixed_params: Vec<(String, String)>,
}

impl RequestParts {
    /// Creates request parts with no route or fixed parameters.
    #[must_use]
    pub fn new(method: Method, uri: Uri, headers: HeaderMap, body: Bytes) -> Self {
        Self {
            method,
            uri,
            headers,
            body,
            route_params: Vec::new(),
            fixed_params: Vec::new(),
        }
    }

    /// Adds a parameter matched by the router.
    #[must_use]
    pub fn with_route_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.route_params.push((name.into(), value.into()));
        self
    }

    /// Adds a fixed parameter declared on the route.
    #[must_use]
    pub fn with_fixed_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fixed_params.push((name.into(), value.into()));
        self
    }

    /// Returns the HTTP method.
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the request URI.
    #[must_use]
    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    /// Returns the query string if present.
    #[must_use]
    pub fn query_string(&self) -> Option<&str> {
        self.uri.query()
    }

    /// Returns the request headers.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns the request body.
    #[must_use]
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Parameters matched by the router, in match order.
    #[must_use]
    pub fn route_params(&self) -> &[(String, String)] {
        &self.route_params
    }

    /// Fixed route parameters, in declaration order.
    #[must_use]
    pub fn fixed_params(&self) -> &[(String, String)] {
        &self.fixed_params
    }

    /// Returns the raw Content-Type header value.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
    }

    /// Returns the Content-Type without parameters, lowercased.
    ///
    /// `multipart/form-data; boundary=x` becomes `multipart/form-data`.
    #[must_use]
    pub fn media_type(&self) -> Option<String> {
        self.content_type()
            .and_then(|v| v.parse::<mime::Mime>().ok())
            .map(|m| m.essence_str().to_ascii_lowercase())
    }
}

//! Request-lifetime ownership of a [`ParameterSet`].

use std::ops::{Deref, DerefMut};

use parambind::{ParameterSet, PurgeReport};

use crate::{extract_params, ExtractConfig, ExtractionError, RequestParts, LOG_TARGET};

/// Owns a request's parameters and removes staged uploads when the request
/// ends.
///
/// Call [`finish`](Self::finish) once the handler has run. A scope dropped
/// without `finish` purges anyway and logs any failure.
///
/// # Example
///
/// ```rust,ignore
/// let scope = RequestScope::extract(&parts, &ExtractConfig::default()).await?;
/// let upload: Upload = binder.bind(&scope, "upload");
/// handle(upload)?;
/// let report = scope.finish();
/// ```
#[derive(Debug, Default)]
pub struct RequestScope {
    params: ParameterSet,
}

impl RequestScope {
    /// Wraps an existing parameter set.
    #[must_use]
    pub fn new(params: ParameterSet) -> Self {
        Self { params }
    }

    /// Extracts the request's parameters into a new scope.
    pub async fn extract(
        parts: &RequestParts,
        config: &ExtractConfig,
    ) -> Result<Self, ExtractionError> {
        extract_params(parts, config).await.map(Self::new)
    }

    /// The scoped parameters.
    #[must_use]
    pub fn params(&self) -> &ParameterSet {
        &self.params
    }

    /// Ends the request, removing every staged temp file.
    pub fn finish(self) -> PurgeReport {
        self.params.purge()
    }
}

impl Deref for RequestScope {
    type Target = ParameterSet;

    fn deref(&self) -> &Self::Target {
        &self.params
    }
}

impl DerefMut for RequestScope {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.params
    }
}

impl Drop for RequestScope {
    fn drop(&mut self) {
        let report = self.params.purge();
        if !report.removed.is_empty() {
            tracing::debug!(
                target: LOG_TARGET,
                removed = report.removed.len(),
                "request scope dropped without finish"
            );
        }
    }
}

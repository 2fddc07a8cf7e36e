use crate::domain::errors::{DomainError, DomainResult};
use url::Url;

/// Resolve `path` against the site's base URL.
pub fn absolutify(site_url: &Url, path: &str) -> DomainResult<String> {
    site_url
        .join(path)
        .map(|url| url.to_string())
        .map_err(|e| DomainError::Internal(format!("Cannot absolutify {}: {}", path, e)))
}

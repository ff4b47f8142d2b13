//! Service trait for reading and mutating documentation versions

#[cfg(test)]
use mockall::automock;

use crate::documentation::error::FetchError;
use crate::documentation::types::VersionListResult;

/// Trait for talking to the documentation service
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait DocumentationApi: Send + Sync {
    /// Fetches every generated documentation version
    ///
    /// # Returns
    /// * `Ok(VersionListResult)` - Versions in the order the service sent them
    /// * `Err(FetchError)` - Transport, status or body failure
    async fn fetch_versions(&self) -> Result<VersionListResult, FetchError>;

    /// Regenerates the documentation bundle of one version
    async fn regenerate(&self, version: &str) -> Result<(), FetchError>;

    /// Deletes the documentation bundle of one version
    async fn delete(&self, version: &str) -> Result<(), FetchError>;
}

//! Contact-directory port.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::DirectoryEntry;

/// Read-only snapshot source for the contact directory.
///
/// Implementations cache until explicitly invalidated; the engine loads
/// one snapshot per run and degrades to an empty directory on failure.
#[async_trait]
pub trait DirectoryProvider: Send + Sync {
    async fn load_entries(&self) -> DomainResult<Vec<DirectoryEntry>>;
}

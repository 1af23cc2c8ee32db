//! Null directory provider for runs without a contact source.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::DirectoryEntry;

use super::directory::DirectoryProvider;

/// Always-empty directory; every token resolves as-seen.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullDirectory;

#[async_trait]
impl DirectoryProvider for NullDirectory {
    async fn load_entries(&self) -> DomainResult<Vec<DirectoryEntry>> {
        Ok(Vec::new())
    }
}

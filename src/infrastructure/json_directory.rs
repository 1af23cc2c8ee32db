//! JSON-file contact-directory adapter.

use std::path::PathBuf;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::errors::{DomainResult, ExtractionError};
use crate::domain::models::{normalize_phone, DirectoryEntry};
use crate::domain::ports::DirectoryProvider;

/// Loads directory entries from a JSON array on disk, normalizing phones
/// on the way in. The snapshot is cached until `invalidate` is called.
pub struct JsonDirectory {
    path: PathBuf,
    cache: Mutex<Option<Vec<DirectoryEntry>>>,
}

impl JsonDirectory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cache: Mutex::new(None),
        }
    }

    /// Drops the cached snapshot; the next load re-reads the file.
    pub fn invalidate(&self) {
        *self.cache.lock().unwrap() = None;
    }
}

#[async_trait]
impl DirectoryProvider for JsonDirectory {
    async fn load_entries(&self) -> DomainResult<Vec<DirectoryEntry>> {
        if let Some(cached) = self.cache.lock().unwrap().clone() {
            return Ok(cached);
        }

        let raw = tokio::fs::read_to_string(&self.path).await.map_err(|err| {
            ExtractionError::DirectoryUnavailable(format!("{}: {err}", self.path.display()))
        })?;
        let mut entries: Vec<DirectoryEntry> = serde_json::from_str(&raw)
            .map_err(|err| ExtractionError::DirectoryUnavailable(err.to_string()))?;

        for entry in &mut entries {
            for phone in &mut entry.phones {
                *phone = normalize_phone(phone);
            }
        }

        *self.cache.lock().unwrap() = Some(entries.clone());
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn directory_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{content}").unwrap();
        file.flush().unwrap();
        file
    }

    #[tokio::test]
    async fn test_load_normalizes_phones() {
        let file = directory_file(
            r#"[{"id": "1", "name": "Rahul", "phones": ["+91 98765-43210"]}]"#,
        );
        let directory = JsonDirectory::new(file.path());

        let entries = directory.load_entries().await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].phones, vec!["+919876543210"]);
    }

    #[tokio::test]
    async fn test_cache_until_invalidated() {
        let file = directory_file(r#"[{"id": "1", "name": "Rahul", "phones": []}]"#);
        let directory = JsonDirectory::new(file.path());
        assert_eq!(directory.load_entries().await.unwrap().len(), 1);

        // Rewrite the file; the cached snapshot must win until invalidated.
        std::fs::write(file.path(), "[]").unwrap();
        assert_eq!(directory.load_entries().await.unwrap().len(), 1);

        directory.invalidate();
        assert!(directory.load_entries().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_file_is_directory_unavailable() {
        let directory = JsonDirectory::new("/nonexistent/contacts.json");
        let err = directory.load_entries().await.unwrap_err();
        assert!(matches!(err, ExtractionError::DirectoryUnavailable(_)));
    }
}

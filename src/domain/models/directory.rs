//! Contact-directory snapshot and lookup indexes.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::member::phone_key;

/// One read-only row of the external contact directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryEntry {
    /// Directory-assigned identifier.
    pub id: String,

    /// Contact display name.
    pub name: String,

    /// Normalized phone strings, most significant first.
    #[serde(default)]
    pub phones: Vec<String>,
}

/// Lookup indexes derived from a directory snapshot.
///
/// Built once per run. Phone lookups are keyed by the last-10-digit
/// identity key; name lookups by the lowercased trimmed name. The first
/// entry encountered for a key wins.
#[derive(Debug, Default, Clone)]
pub struct DirectoryIndex {
    phone_to_name: HashMap<String, String>,
    name_to_phone: HashMap<String, String>,
}

impl DirectoryIndex {
    /// Builds both indexes from a snapshot of directory entries.
    pub fn build(entries: &[DirectoryEntry]) -> Self {
        let mut phone_to_name = HashMap::new();
        let mut name_to_phone = HashMap::new();

        for entry in entries {
            for phone in &entry.phones {
                let key = phone_key(phone);
                if key.is_empty() {
                    continue;
                }
                phone_to_name
                    .entry(key)
                    .or_insert_with(|| entry.name.clone());
            }

            let name_key = entry.name.trim().to_lowercase();
            if let Some(first_phone) = entry.phones.first() {
                if !name_key.is_empty() {
                    name_to_phone
                        .entry(name_key)
                        .or_insert_with(|| first_phone.clone());
                }
            }
        }

        Self {
            phone_to_name,
            name_to_phone,
        }
    }

    /// Directory name for a last-10-digit phone key.
    pub fn name_for_phone_key(&self, key: &str) -> Option<&str> {
        self.phone_to_name.get(key).map(String::as_str)
    }

    /// Directory phone for a lowercased trimmed name.
    pub fn phone_for_name(&self, name_key: &str) -> Option<&str> {
        self.name_to_phone.get(name_key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.phone_to_name.is_empty() && self.name_to_phone.is_empty()
    }

    /// Number of distinct phone keys indexed.
    pub fn len(&self) -> usize {
        self.phone_to_name.len()
    }
}

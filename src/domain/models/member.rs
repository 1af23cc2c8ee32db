//! Member model and identity-key derivation.
//!
//! Members extracted from noisy UI text are merged across lists by a
//! derived identity key: the last 10 digits of the normalized phone when a
//! phone is present, otherwise the lowercased trimmed name. The key is
//! computed on demand and never persisted.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single extracted list member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    /// Unique member identifier.
    pub id: Uuid,

    /// Display name, as resolved against the contact directory.
    pub name: String,

    /// Display-form phone string as it appeared in the UI. May be empty
    /// when the member was only ever seen by name.
    #[serde(default)]
    pub phone: String,
}

impl Member {
    /// Creates a member with a fresh identifier.
    pub fn new(name: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            phone: phone.into(),
        }
    }

    /// Derived identity key used for cross-list matching.
    pub fn identity_key(&self) -> String {
        identity_key(&self.name, &self.phone)
    }

    /// Representative score used during reconciliation: a non-empty phone
    /// adds a fixed bonus, then name length decides.
    pub fn score(&self) -> usize {
        let phone_bonus = if self.phone.trim().is_empty() { 0 } else { 10 };
        phone_bonus + self.name.chars().count()
    }
}

/// Strips everything but digits and a leading `+` from a display phone.
pub fn normalize_phone(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_digit() || *c == '+')
        .collect()
}

/// Last 10 digits of a phone in any display form.
///
/// `"+91 98765 43210"` and `"9876543210"` map to the same key.
pub fn phone_key(phone: &str) -> String {
    let digits: Vec<char> = phone.chars().filter(char::is_ascii_digit).collect();
    let start = digits.len().saturating_sub(10);
    digits[start..].iter().collect()
}

/// Identity key for a (name, phone) pair.
pub fn identity_key(name: &str, phone: &str) -> String {
    if phone.trim().is_empty() {
        name.trim().to_lowercase()
    } else {
        phone_key(phone)
    }
}

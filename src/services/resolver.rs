//! Identity resolution of raw UI tokens against the directory snapshot.

use regex::Regex;

use crate::domain::models::{member::phone_key, DirectoryIndex, Member};

/// Optional leading `+`, then at least 9 digits interspersed with
/// spaces, hyphens, or parentheses. The first match in the token wins.
const PHONE_PATTERN: &str = r"\+?(?:[\s\-()]*\d){9,}";

/// Normalizes phone numbers and names and cross-references the directory.
pub struct IdentityResolver {
    pattern: Regex,
    index: DirectoryIndex,
}

impl IdentityResolver {
    pub fn new(index: DirectoryIndex) -> Self {
        Self {
            pattern: Regex::new(PHONE_PATTERN).unwrap(),
            index,
        }
    }

    /// Resolves a raw token into a member, or `None` when the resolved
    /// name is blank after trimming.
    ///
    /// A token carrying a phone keeps the display-form phone string it was
    /// seen with; the name comes from the directory when the last-10-digit
    /// key is known. A phoneless token is treated as a name and gains the
    /// directory phone when the lowercased name is known.
    pub fn resolve(&self, token: &str) -> Option<Member> {
        let resolved = if let Some(found) = self.pattern.find(token) {
            let display = found.as_str().trim().to_string();
            let key = phone_key(&display);
            match self.index.name_for_phone_key(&key) {
                Some(name) => Member::new(name, display),
                None => Member::new(token, display),
            }
        } else {
            let trimmed = token.trim();
            match self.index.phone_for_name(&trimmed.to_lowercase()) {
                Some(phone) => Member::new(trimmed, phone),
                None => Member::new(token, ""),
            }
        };

        if resolved.name.trim().is_empty() {
            None
        } else {
            Some(resolved)
        }
    }
}

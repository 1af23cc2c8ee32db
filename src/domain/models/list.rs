//! Extracted member lists.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::member::Member;

/// An extracted list of members.
///
/// Member order is insertion order and member names are unique
/// case-insensitively. At most one aggregate list (the reconciliation
/// output) exists in a store at a time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberList {
    /// Unique list identifier.
    pub id: Uuid,

    /// Display name, taken from the host UI row that opened the list.
    pub name: String,

    /// Members in first-seen order.
    pub members: Vec<Member>,

    /// When this list was first created in the store.
    pub created_at: DateTime<Utc>,

    /// True for the synthesized common-members aggregate.
    #[serde(default)]
    pub is_aggregate: bool,
}

impl MemberList {
    /// Creates an empty source list.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            members: Vec::new(),
            created_at: Utc::now(),
            is_aggregate: false,
        }
    }

    /// Creates the aggregate list produced by reconciliation.
    pub fn aggregate(name: impl Into<String>, members: Vec<Member>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            members,
            created_at: Utc::now(),
            is_aggregate: true,
        }
    }

    /// Case-insensitive membership test by display name.
    pub fn contains_name(&self, name: &str) -> bool {
        let needle = name.to_lowercase();
        self.members.iter().any(|m| m.name.to_lowercase() == needle)
    }

    /// Appends a member unless a member with the same name (ignoring case)
    /// is already present. Returns whether the member was added.
    pub fn push_unique(&mut self, member: Member) -> bool {
        if self.contains_name(&member.name) {
            return false;
        }
        self.members.push(member);
        true
    }

    /// Merges a batch of members, preserving existing order and appending
    /// newcomers in iteration order. Returns how many were added.
    pub fn merge(&mut self, incoming: impl IntoIterator<Item = Member>) -> usize {
        incoming
            .into_iter()
            .filter(|m| self.push_unique(m.clone()))
            .count()
    }
}

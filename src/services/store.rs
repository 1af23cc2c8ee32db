//! Coarse-locked in-memory list store.
//!
//! One lock guards every read-modify-write sequence; mutators return the
//! post-mutation snapshot so callers can notify observers without taking
//! the lock again. Readers always see a consistent pre- or post-mutation
//! view, never a partial one.

use std::sync::RwLock;

use crate::domain::models::{Member, MemberList};

/// The engine-side working set of extracted lists.
#[derive(Debug, Default)]
pub struct ListStore {
    inner: RwLock<Vec<MemberList>>,
}

impl ListStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consistent snapshot of all lists.
    pub fn snapshot(&self) -> Vec<MemberList> {
        self.inner.read().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.inner.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().unwrap().is_empty()
    }

    /// Removes everything. Returns the (empty) snapshot for notification.
    pub fn clear(&self) -> Vec<MemberList> {
        let mut lists = self.inner.write().unwrap();
        lists.clear();
        lists.clone()
    }

    /// Merges members into the source list with the given name (ignoring
    /// case), creating it first if needed. Returns the new snapshot.
    pub fn upsert_merge(&self, name: &str, members: Vec<Member>) -> Vec<MemberList> {
        let mut lists = self.inner.write().unwrap();
        let lower = name.to_lowercase();
        if let Some(list) = lists
            .iter_mut()
            .find(|l| !l.is_aggregate && l.name.to_lowercase() == lower)
        {
            list.merge(members);
        } else {
            let mut list = MemberList::new(name);
            list.merge(members);
            lists.push(list);
        }
        lists.clone()
    }

    /// Replaces the aggregate list: any prior aggregate is removed, the
    /// new one (if any) appended. Returns the new snapshot.
    pub fn replace_aggregate(&self, aggregate: Option<MemberList>) -> Vec<MemberList> {
        let mut lists = self.inner.write().unwrap();
        lists.retain(|l| !l.is_aggregate);
        if let Some(list) = aggregate {
            lists.push(list);
        }
        lists.clone()
    }
}

//! Sync port - pushes extraction results to an external backend.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainResult;
use crate::domain::models::MemberList;

/// Wire payload for one sync: the full current store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SyncPayload {
    pub device_id: String,
    pub lists: Vec<MemberList>,
    pub timestamp: DateTime<Utc>,
}

/// Trait for the result-sync transport.
///
/// No retry contract: the dispatcher logs the outcome and moves on.
#[async_trait]
pub trait SyncClient: Send + Sync {
    async fn send(&self, payload: &SyncPayload) -> DomainResult<()>;
}

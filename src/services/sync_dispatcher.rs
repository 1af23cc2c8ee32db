//! Fire-and-forget result sync.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::domain::models::MemberList;
use crate::domain::ports::{SyncClient, SyncPayload};

/// Packages the current store and pushes it through the sync port.
///
/// The outcome is logged either way; a failure never alters the run
/// outcome and there is no retry.
pub struct SyncDispatcher {
    client: Arc<dyn SyncClient>,
    device_id: String,
    enabled: bool,
}

impl SyncDispatcher {
    pub fn new(client: Arc<dyn SyncClient>, device_id: impl Into<String>, enabled: bool) -> Self {
        Self {
            client,
            device_id: device_id.into(),
            enabled,
        }
    }

    pub async fn dispatch(&self, lists: Vec<MemberList>) {
        if !self.enabled {
            debug!("sync disabled, skipping dispatch");
            return;
        }

        let payload = SyncPayload {
            device_id: self.device_id.clone(),
            lists,
            timestamp: Utc::now(),
        };
        let count = payload.lists.len();

        match self.client.send(&payload).await {
            Ok(()) => info!(lists = count, "store synced to backend"),
            Err(err) => warn!(error = %err, "sync failed, continuing"),
        }
    }
}

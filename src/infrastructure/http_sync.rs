//! HTTP sync adapter.
//!
//! Posts the sync payload to the backend's `/api/sync` endpoint. The
//! dispatcher above treats any error as fire-and-forget.

use std::time::Duration;

use async_trait::async_trait;

use crate::domain::errors::{DomainResult, ExtractionError};
use crate::domain::models::SyncConfig;
use crate::domain::ports::{SyncClient, SyncPayload};

/// `SyncClient` over reqwest.
pub struct HttpSyncClient {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpSyncClient {
    pub fn new(config: &SyncConfig) -> DomainResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|err| ExtractionError::SyncFailure(err.to_string()))?;
        Ok(Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl SyncClient for HttpSyncClient {
    async fn send(&self, payload: &SyncPayload) -> DomainResult<()> {
        let url = format!("{}/api/sync", self.endpoint);
        let response = self
            .client
            .post(&url)
            .json(payload)
            .send()
            .await
            .map_err(|err| ExtractionError::SyncFailure(err.to_string()))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(ExtractionError::SyncFailure(format!(
                "backend returned {status}"
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::MemberList;
    use chrono::Utc;

    fn payload() -> SyncPayload {
        SyncPayload {
            device_id: "device-1".to_string(),
            lists: vec![MemberList::new("Family")],
            timestamp: Utc::now(),
        }
    }

    fn config_for(url: &str) -> SyncConfig {
        SyncConfig {
            enabled: true,
            endpoint: url.to_string(),
            timeout_secs: 5,
        }
    }

    #[tokio::test]
    async fn test_send_posts_payload() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/sync")
            .match_header("content-type", "application/json")
            .with_status(200)
            .with_body(r#"{"success": true}"#)
            .create_async()
            .await;

        let client = HttpSyncClient::new(&config_for(&server.url())).unwrap();
        client.send(&payload()).await.unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_send_maps_http_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/sync")
            .with_status(500)
            .create_async()
            .await;

        let client = HttpSyncClient::new(&config_for(&server.url())).unwrap();
        let err = client.send(&payload()).await.unwrap_err();
        assert!(matches!(err, ExtractionError::SyncFailure(_)));
    }

    #[tokio::test]
    async fn test_send_maps_connection_error() {
        // Nothing is listening on this port.
        let client = HttpSyncClient::new(&config_for("http://127.0.0.1:1")).unwrap();
        let err = client.send(&payload()).await.unwrap_err();
        assert!(matches!(err, ExtractionError::SyncFailure(_)));
    }
}

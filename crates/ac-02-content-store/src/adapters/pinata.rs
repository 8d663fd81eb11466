//! # Pinata Content Store
//!
//! Uploads through `POST {api_url}/pinning/pinJSONToIPFS` and retrieves
//! through `GET {gateway_url}/ipfs/{cid}`.
//!
//! | Response | Outcome |
//! |----------|---------|
//! | transport error, 429, 5xx | retried, then `StoreUnavailable` |
//! | 404 / 410 on retrieve | `ContentNotFound` (not retried) |
//! | other 4xx | `Rejected` (not retried) |

use crate::config::ContentStoreConfig;
use crate::errors::StoreError;
use crate::ports::ContentStore;
use async_trait::async_trait;
use reqwest::{Response, StatusCode};
use serde::Deserialize;
use shared_types::{retry_with_backoff, ContentId};
use tracing::{debug, info, instrument};

#[derive(Debug, Deserialize)]
struct PinResponse {
    #[serde(rename = "IpfsHash")]
    ipfs_hash: String,
}

/// Content store backed by the Pinata pinning service.
#[derive(Debug, Clone)]
pub struct PinataContentStore {
    client: reqwest::Client,
    config: ContentStoreConfig,
}

impl PinataContentStore {
    pub fn new(config: ContentStoreConfig) -> Result<Self, StoreError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| StoreError::StoreUnavailable(format!("http client: {e}")))?;
        Ok(Self { client, config })
    }

    fn pin_url(&self) -> String {
        format!(
            "{}/pinning/pinJSONToIPFS",
            self.config.api_url.trim_end_matches('/')
        )
    }

    fn gateway_url(&self, id: &ContentId) -> String {
        format!("{}/ipfs/{}", self.config.gateway_url.trim_end_matches('/'), id)
    }

    async fn upload_once(&self, blob: &serde_json::Value) -> Result<ContentId, StoreError> {
        let response = self
            .client
            .post(self.pin_url())
            .header("pinata_api_key", &self.config.api_key)
            .header("pinata_secret_api_key", &self.config.secret_api_key)
            .json(&serde_json::json!({ "pinataContent": blob }))
            .send()
            .await
            .map_err(|e| StoreError::StoreUnavailable(e.to_string()))?;

        let response = check_status(response, None).await?;
        let body: PinResponse = response
            .json()
            .await
            .map_err(|e| StoreError::InvalidResponse(e.to_string()))?;
        if body.ipfs_hash.is_empty() {
            return Err(StoreError::InvalidResponse("empty IpfsHash".into()));
        }
        Ok(ContentId::new(body.ipfs_hash))
    }

    async fn retrieve_once(&self, id: &ContentId) -> Result<serde_json::Value, StoreError> {
        let response = self
            .client
            .get(self.gateway_url(id))
            .send()
            .await
            .map_err(|e| StoreError::StoreUnavailable(e.to_string()))?;

        let response = check_status(response, Some(id)).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| StoreError::StoreUnavailable(e.to_string()))?;
        serde_json::from_slice(&bytes)
            .map_err(|e| StoreError::InvalidResponse(format!("content is not JSON: {e}")))
    }
}

/// Classify an HTTP status. `lookup` marks retrieval, where 404 means the
/// id does not exist.
async fn check_status(response: Response, lookup: Option<&ContentId>) -> Result<Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
        return Err(StoreError::StoreUnavailable(format!("HTTP {status}")));
    }
    if let Some(id) = lookup {
        if status == StatusCode::NOT_FOUND || status == StatusCode::GONE {
            return Err(StoreError::ContentNotFound(id.clone()));
        }
    }
    let detail = response.text().await.unwrap_or_default();
    Err(StoreError::Rejected {
        status: status.as_u16(),
        detail,
    })
}

#[async_trait]
impl ContentStore for PinataContentStore {
    #[instrument(skip(self, blob))]
    async fn upload(&self, blob: &serde_json::Value) -> Result<ContentId, StoreError> {
        let id = retry_with_backoff(
            &self.config.retry,
            "pinata.upload",
            StoreError::is_transient,
            move || self.upload_once(blob),
        )
        .await?;
        info!(content_id = %id, "Pinned content");
        Ok(id)
    }

    #[instrument(skip(self), fields(content_id = %id))]
    async fn retrieve(&self, id: &ContentId) -> Result<serde_json::Value, StoreError> {
        let blob = retry_with_backoff(
            &self.config.retry,
            "pinata.retrieve",
            StoreError::is_transient,
            move || self.retrieve_once(id),
        )
        .await?;
        debug!("Retrieved content");
        Ok(blob)
    }
}

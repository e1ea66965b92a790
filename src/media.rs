use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use sha2::{Digest, Sha256};

use crate::{
    config::MediaConfig,
    error::{AppError, AppResult},
};

#[derive(Debug, Clone, Deserialize)]
pub struct UploadedAsset {
    pub secure_url: String,
    pub public_id: String,
    pub asset_id: String,
}

/// External image host. Receives the base64 payload and returns where it lives.
#[async_trait]
pub trait MediaHost: Send + Sync {
    async fn upload(&self, data_base64: &str, folder: &str) -> AppResult<UploadedAsset>;
}

/// Signed uploads against a Cloudinary-compatible API.
pub struct CloudinaryHost {
    client: reqwest::Client,
    config: MediaConfig,
    base_url: String,
}

impl CloudinaryHost {
    pub fn new(config: MediaConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
            base_url: "https://api.cloudinary.com/v1_1".to_string(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/{}/image/upload", self.base_url, self.config.cloud_name)
    }
}

pub fn sign_upload(folder: &str, timestamp: i64, api_secret: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(format!("folder={folder}&timestamp={timestamp}{api_secret}"));
    hex::encode(hasher.finalize())
}

#[async_trait]
impl MediaHost for CloudinaryHost {
    async fn upload(&self, data_base64: &str, folder: &str) -> AppResult<UploadedAsset> {
        let timestamp = Utc::now().timestamp();
        let signature = sign_upload(folder, timestamp, &self.config.api_secret);
        let timestamp = timestamp.to_string();
        let form = [
            ("file", data_base64),
            ("folder", folder),
            ("timestamp", timestamp.as_str()),
            ("api_key", self.config.api_key.as_str()),
            ("signature", signature.as_str()),
            ("signature_algorithm", "sha256"),
        ];

        let response = self
            .client
            .post(self.endpoint())
            .form(&form)
            .send()
            .await
            .map_err(|err| {
                tracing::warn!(error = %err, "media host unreachable");
                AppError::Upstream("Upload to media host failed".into())
            })?;

        if !response.status().is_success() {
            tracing::warn!(status = %response.status(), "media host rejected upload");
            return Err(AppError::Upstream("Upload to media host failed".into()));
        }

        response.json::<UploadedAsset>().await.map_err(|err| {
            tracing::warn!(error = %err, "media host returned an unexpected body");
            AppError::Upstream("Upload to media host failed".into())
        })
    }
}

/// Stand-in used when no media credentials are configured.
pub struct UnconfiguredMediaHost;

#[async_trait]
impl MediaHost for UnconfiguredMediaHost {
    async fn upload(&self, _data_base64: &str, _folder: &str) -> AppResult<UploadedAsset> {
        Err(AppError::Unavailable("Media uploads are not configured".into()))
    }
}

pub fn from_config(config: Option<MediaConfig>) -> Arc<dyn MediaHost> {
    match config {
        Some(config) => {
            tracing::info!(cloud = %config.cloud_name, "media uploads enabled");
            Arc::new(CloudinaryHost::new(config))
        }
        None => {
            tracing::warn!("media credentials missing, uploads disabled");
            Arc::new(UnconfiguredMediaHost)
        }
    }
}

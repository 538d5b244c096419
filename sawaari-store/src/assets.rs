//! HTTP client for the external image host that keeps payment-proof
//! screenshots. The host takes a multipart upload and returns a public
//! URL plus a handle we can delete by later.

use async_trait::async_trait;
use serde::Deserialize;
use uuid::Uuid;

use sawaari_core::notify::{AssetStore, ProofImage, StoredAsset};
use sawaari_core::{Error, Result};

use crate::app_config::AssetStoreConfig;

pub struct HttpAssetStore {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    folder: String,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
    public_id: String,
}

impl HttpAssetStore {
    /// Build from configuration. Returns `None` when no base URL is
    /// configured, signalling the caller to fall back to the in-memory
    /// store.
    pub fn from_config(config: &AssetStoreConfig) -> Option<Self> {
        let base_url = config.base_url.clone()?;
        Some(Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_owned(),
            api_key: config.api_key.clone(),
            folder: config.folder.clone(),
        })
    }
}

#[async_trait]
impl AssetStore for HttpAssetStore {
    async fn upload(&self, image: ProofImage, label: &str) -> Result<StoredAsset> {
        let public_id = format!("{}/{}_{}", self.folder, label, Uuid::new_v4());

        let part = reqwest::multipart::Part::bytes(image.bytes)
            .file_name("proof")
            .mime_str(&image.content_type)
            .map_err(|e| Error::Asset(format!("Bad image content type: {}", e)))?;

        let form = reqwest::multipart::Form::new()
            .text("public_id", public_id)
            .part("file", part);

        let response = self
            .client
            .post(format!("{}/upload", self.base_url))
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| Error::Asset(format!("Upload request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::Asset(format!(
                "Upload rejected with status {}",
                response.status()
            )));
        }

        let body: UploadResponse = response
            .json()
            .await
            .map_err(|e| Error::Asset(format!("Malformed upload response: {}", e)))?;

        Ok(StoredAsset {
            url: body.secure_url,
            handle: body.public_id,
        })
    }

    async fn delete(&self, handle: &str) -> Result<()> {
        let response = self
            .client
            .delete(format!("{}/assets/{}", self.base_url, handle))
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| Error::Asset(format!("Delete request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::Asset(format!(
                "Delete rejected with status {}",
                response.status()
            )));
        }
        Ok(())
    }
}

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

use crate::error::{Error, Result};

/// A templated message for the mail collaborator. Delivery failure is
/// never fatal to the operation that triggered it.
#[derive(Debug, Clone)]
pub struct Notification {
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, notification: Notification) -> Result<()>;
}

/// Mailer that only logs. Used in tests and when SMTP is not configured.
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, notification: Notification) -> Result<()> {
        tracing::info!(
            to = %notification.to,
            subject = %notification.subject,
            "Mail delivery skipped (log-only mailer)"
        );
        Ok(())
    }
}

/// Reference to an uploaded payment-proof image: a publicly fetchable URL
/// plus the handle needed to delete it later.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredAsset {
    pub url: String,
    pub handle: String,
}

/// Raw image bytes as received from the customer.
#[derive(Debug, Clone)]
pub struct ProofImage {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Upload an image and return its public URL and deletable handle.
    async fn upload(&self, image: ProofImage, label: &str) -> Result<StoredAsset>;

    /// Delete a previously uploaded image. Best-effort at call sites.
    async fn delete(&self, handle: &str) -> Result<()>;
}

/// In-memory asset store for tests and local development.
#[derive(Default)]
pub struct MemoryAssetStore {
    uploads: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryAssetStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stored_count(&self) -> usize {
        self.uploads.lock().expect("asset store lock poisoned").len()
    }
}

#[async_trait]
impl AssetStore for MemoryAssetStore {
    async fn upload(&self, image: ProofImage, label: &str) -> Result<StoredAsset> {
        let handle = format!("{}_{}", label, Uuid::new_v4());
        self.uploads
            .lock()
            .expect("asset store lock poisoned")
            .insert(handle.clone(), image.bytes);

        Ok(StoredAsset {
            url: format!("memory://proofs/{}", handle),
            handle,
        })
    }

    async fn delete(&self, handle: &str) -> Result<()> {
        let removed = self
            .uploads
            .lock()
            .expect("asset store lock poisoned")
            .remove(handle);

        match removed {
            Some(_) => Ok(()),
            None => Err(Error::Asset(format!("Unknown asset handle: {}", handle))),
        }
    }
}

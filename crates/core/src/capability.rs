//! Capability seams for the external upload and generation collaborators.
//!
//! The core issues a request and suspends until a result or failure
//! arrives; it never knows whether the provider talks to cloud storage, a
//! diffusion backend, or a local stub. Cancellation and timeouts are the
//! provider's responsibility and surface here only as an `Err`.

use async_trait::async_trait;

use crate::error::CoreError;
use crate::request::AssetGenerationRequest;
use crate::session::{AssetMetadata, GeneratedAsset};
use crate::types::{EntityId, UserId};

/// An uploaded file as received from the HTTP layer, already validated by
/// the upload utilities.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub original_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Descriptor returned by the upload capability.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedAsset {
    pub id: EntityId,
    pub url: String,
    pub thumbnail: String,
    /// Storage filename (collision-free, extension preserved).
    pub name: String,
    pub metadata: AssetMetadata,
}

/// Stores an uploaded file and returns its descriptor.
#[async_trait]
pub trait UploadCapability: Send + Sync {
    async fn store(
        &self,
        file: &UploadFile,
        category: &str,
        user_id: UserId,
    ) -> Result<UploadedAsset, CoreError>;
}

/// Produces one [`GeneratedAsset`] per request, or fails.
#[async_trait]
pub trait GenerationCapability: Send + Sync {
    async fn generate(
        &self,
        request: &AssetGenerationRequest,
    ) -> Result<GeneratedAsset, CoreError>;
}

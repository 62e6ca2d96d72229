//! Stub implementations of the upload and generation capabilities.
//!
//! These mirror the behaviour of the platform's mock storage and
//! generation routes: they fabricate deterministic URLs and metadata
//! without performing any cloud I/O, so the full session flow can run
//! end-to-end locally. Production providers implement the same traits.

use std::io::Cursor;

use async_trait::async_trait;

use brandkit_core::capability::{
    GenerationCapability, UploadCapability, UploadFile, UploadedAsset,
};
use brandkit_core::error::CoreError;
use brandkit_core::request::AssetGenerationRequest;
use brandkit_core::session::{AssetMetadata, GeneratedAsset};
use brandkit_core::types::{EntityId, UserId};
use brandkit_core::upload::generate_unique_filename;

/// Dimensions reported when the uploaded bytes cannot be decoded.
const FALLBACK_DIMENSION: u32 = 1024;

// ---------------------------------------------------------------------------
// Upload stub
// ---------------------------------------------------------------------------

/// Upload provider that fabricates storage URLs under `/static/uploads`.
#[derive(Debug, Default, Clone)]
pub struct StubUploadCapability;

#[async_trait]
impl UploadCapability for StubUploadCapability {
    async fn store(
        &self,
        file: &UploadFile,
        category: &str,
        user_id: UserId,
    ) -> Result<UploadedAsset, CoreError> {
        let name = generate_unique_filename(&file.original_name);

        // Header-only dimension extraction; declared metadata wins when the
        // bytes are not decodable (e.g. SVG or truncated test fixtures).
        let (width, height) = image_dimensions(&file.bytes)
            .unwrap_or((FALLBACK_DIMENSION, FALLBACK_DIMENSION));

        let format = file
            .content_type
            .rsplit_once('/')
            .map(|(_, sub)| sub.to_string())
            .unwrap_or_else(|| "bin".to_string());

        tracing::info!(
            %user_id,
            category,
            name = %name,
            size = file.bytes.len(),
            "Stored uploaded file",
        );

        Ok(UploadedAsset {
            id: EntityId::new_v4(),
            url: format!("/static/uploads/{user_id}/{name}"),
            thumbnail: format!("/static/uploads/{user_id}/thumbs/{name}"),
            name,
            metadata: AssetMetadata {
                width,
                height,
                format,
                size: Some(file.bytes.len() as u64),
            },
        })
    }
}

fn image_dimensions(bytes: &[u8]) -> Option<(u32, u32)> {
    image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .ok()?
        .into_dimensions()
        .ok()
}

// ---------------------------------------------------------------------------
// Generation stub
// ---------------------------------------------------------------------------

/// Generation provider that fabricates placeholder assets.
#[derive(Debug, Default, Clone)]
pub struct StubGenerationCapability;

#[async_trait]
impl GenerationCapability for StubGenerationCapability {
    async fn generate(
        &self,
        request: &AssetGenerationRequest,
    ) -> Result<GeneratedAsset, CoreError> {
        let id = EntityId::new_v4();

        tracing::debug!(
            asset_id = %id,
            kind = request.kind.as_str(),
            style = %request.style,
            "Fabricated generated asset",
        );

        Ok(GeneratedAsset {
            id,
            kind: request.kind,
            url: format!("/static/generated/{id}.png"),
            prompt: request.prompt.clone(),
            style: request.style.clone(),
            created_at: chrono::Utc::now(),
            metadata: AssetMetadata {
                width: 1024,
                height: 1024,
                format: "png".to_string(),
                size: None,
            },
        })
    }
}

// ---------------------------------------------------------------------------
// Failing stubs (tests)
// ---------------------------------------------------------------------------

/// Generation provider that always fails; used to exercise session
/// failure paths in tests.
#[derive(Debug, Default, Clone)]
pub struct FailingGenerationCapability;

#[async_trait]
impl GenerationCapability for FailingGenerationCapability {
    async fn generate(
        &self,
        _request: &AssetGenerationRequest,
    ) -> Result<GeneratedAsset, CoreError> {
        Err(CoreError::Internal(
            "generation backend unavailable".to_string(),
        ))
    }
}

/// Upload provider that always fails; used to exercise the upload
/// endpoint's internal-error path in tests.
#[derive(Debug, Default, Clone)]
pub struct FailingUploadCapability;

#[async_trait]
impl UploadCapability for FailingUploadCapability {
    async fn store(
        &self,
        _file: &UploadFile,
        _category: &str,
        _user_id: UserId,
    ) -> Result<UploadedAsset, CoreError> {
        Err(CoreError::Internal("storage backend unavailable".to_string()))
    }
}

//! Upload validation utilities and collision-free filename generation.
//!
//! These functions are the required pre-check before any file reaches the
//! external upload capability. All of them are total: bad input yields
//! `false` from the predicates and a best-effort name from the generator,
//! never an error.

use rand::distr::Alphanumeric;
use rand::Rng;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// MIME types accepted for image uploads. Membership is checked against the
/// *declared* type only; no content sniffing is performed.
pub const SUPPORTED_IMAGE_TYPES: &[&str] = &[
    "image/jpeg",
    "image/png",
    "image/webp",
    "image/gif",
    "image/svg+xml",
];

/// Default size ceiling for image uploads (10 MiB).
pub const MAX_IMAGE_BYTES: u64 = 10 * 1024 * 1024;

/// Default size ceiling for any other upload category (50 MiB).
pub const MAX_FILE_BYTES: u64 = 50 * 1024 * 1024;

/// Length of the random suffix appended to generated filenames.
const FILENAME_SUFFIX_LEN: usize = 8;

// ---------------------------------------------------------------------------
// Predicates
// ---------------------------------------------------------------------------

/// Returns `true` iff `content_type` is a member of [`SUPPORTED_IMAGE_TYPES`].
pub fn is_valid_image_file(content_type: &str) -> bool {
    SUPPORTED_IMAGE_TYPES.contains(&content_type)
}

/// Returns `true` iff `size_bytes <= limit_bytes`.
///
/// The boundary is strict: a file exactly at the limit passes, one byte
/// over fails.
pub fn is_valid_file_size(size_bytes: u64, limit_bytes: u64) -> bool {
    size_bytes <= limit_bytes
}

// ---------------------------------------------------------------------------
// Unique filename generation
// ---------------------------------------------------------------------------

/// Produce a new filename that preserves the original extension (the
/// substring after the final `.`, case preserved).
///
/// The name combines a nanosecond timestamp with a random alphanumeric
/// suffix, so two calls with the same input never collide for practical
/// purposes and the function is safe to call concurrently without any
/// coordination. An input with no extension yields a name with no
/// extension.
pub fn generate_unique_filename(original_name: &str) -> String {
    let now = chrono::Utc::now();
    let nanos = now
        .timestamp_nanos_opt()
        .unwrap_or_else(|| now.timestamp_micros());

    let suffix: String = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(FILENAME_SUFFIX_LEN)
        .map(char::from)
        .collect();

    match original_name.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() => format!("{nanos}-{suffix}.{ext}"),
        _ => format!("{nanos}-{suffix}"),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

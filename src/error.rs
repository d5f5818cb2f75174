// In: src/error.rs

//! This module defines the single, unified error type for the entire npz-bundle library.
//! It uses the `thiserror` crate to provide ergonomic, context-aware error handling.
//!
//! Only hard failures live here. Lenient conditions (a bad magic signature, a
//! missing `shape` or `descr` field, a payload shorter than its declared shape)
//! are reported through `log` and never surface as errors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BundleError {
    // =========================================================================
    // === High-Level, Semantic Errors (Specific to our library's logic)
    // =========================================================================
    #[error("Declared header needs {needed} bytes but only {available} are available")]
    TruncatedHeader { needed: usize, available: usize },

    #[error("Declared header length ({declared}) exceeds maximum allowed size ({limit})")]
    HeaderTooLarge { declared: usize, limit: usize },

    #[error("Mask conversion requires a rank 2 or rank 3 array, got rank {0}")]
    UnsupportedRank(usize),

    #[error("Unsupported element descriptor: {0}")]
    UnsupportedDtype(String),

    #[error("Shape expects {expected} elements but the buffer holds {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error("Entry decompresses past the {limit}-byte limit")]
    EntryTooLarge { limit: u64 },

    #[error("Invalid decoder configuration: {0}")]
    Config(String),

    #[error("Failed to decode entry '{entry}': {source}")]
    Entry {
        entry: String,
        #[source]
        source: Box<BundleError>,
    },

    // =========================================================================
    // === External Error Wrappers (Using #[from] for automatic conversion)
    // =========================================================================
    /// The supplied bytes are not a readable zip container.
    #[error("Archive format error: {0}")]
    ArchiveFormat(#[from] zip::result::ZipError),

    /// An error while reading a decompressed entry or writing an archive.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An error from the Serde JSON library, typically during config or summary serialization.
    #[error("Serde JSON error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    /// An error from ndarray while building a shaped view of a decoded buffer.
    #[error("ndarray shape error: {0}")]
    Ndarray(#[from] ndarray::ShapeError),

    /// An error from a safe byte-casting operation failing.
    #[error("Byte slice casting error: {0}")]
    PodCast(String), // Manual `From` impl is needed as bytemuck::PodCastError doesn't impl Error
}

// =============================================================================
// === Manual `From` Implementations ===
// =============================================================================

impl From<bytemuck::PodCastError> for BundleError {
    fn from(err: bytemuck::PodCastError) -> Self {
        BundleError::PodCast(err.to_string())
    }
}

impl BundleError {
    /// Wraps an error with the name of the archive entry that produced it.
    pub(crate) fn in_entry(self, entry: &str) -> Self {
        BundleError::Entry {
            entry: entry.to_string(),
            source: Box::new(self),
        }
    }
}

// In: src/config.rs

//! The single source of truth for all decoder configuration.
//!
//! `DecoderConfig` is created once at the application boundary (from a JSON
//! document or `Default`) and passed down through the system as a shared,
//! read-only `Arc<DecoderConfig>`.

use serde::{Deserialize, Serialize};

use crate::error::BundleError;
use crate::format::{
    DEFAULT_ENTRY_SUFFIX, MAX_REASONABLE_ENTRY_LEN, MAX_REASONABLE_HEADER_LEN,
    MAX_REASONABLE_MASK_FILL,
};

//==================================================================================
// I. Core Configuration Enums & Structs
//==================================================================================

/// What a bundle decode does when a single array entry fails to decode.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MalformedEntryPolicy {
    /// **Default:** The first failing entry aborts the whole bundle. The returned
    /// error names the entry.
    #[default]
    Abort,

    /// The failing entry is logged at `warn` and left out of the bundle; every
    /// other entry is still returned.
    Skip,
}

/// The two output levels written into a mask buffer.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaskLevels {
    /// Written where the source value is zero, negative or missing.
    #[serde(default)]
    pub low: u8,
    /// Written where the source value is strictly positive.
    #[serde(default = "default_high")]
    pub high: u8,
}

impl Default for MaskLevels {
    fn default() -> Self {
        Self {
            low: 0,
            high: default_high(),
        }
    }
}

//==================================================================================
// II. The Unified DecoderConfig
//==================================================================================

/// The single, unified configuration for bundle decoding and mask conversion.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct DecoderConfig {
    /// Archive entries are decoded only when their name ends with this suffix
    /// (case-sensitive). The suffix is stripped to form the array name.
    #[serde(default = "default_entry_suffix")]
    pub entry_suffix: String,

    /// Behaviour when one entry inside a multi-entry archive is malformed.
    #[serde(default)]
    pub on_malformed_entry: MalformedEntryPolicy,

    /// Upper bound on the declared header length of a single entry.
    #[serde(default = "default_max_header_len")]
    pub max_header_len: usize,

    /// Upper bound on the decompressed size of a single archive entry, in bytes.
    #[serde(default = "default_max_entry_len")]
    pub max_entry_len: u64,

    /// If false, big-endian (`>`) element data is reinterpreted as little-endian,
    /// byte for byte.
    #[serde(default = "default_true")]
    pub honor_byte_order: bool,

    /// Levels used by the bundled `NdarrayMasks` adapter.
    #[serde(default)]
    pub mask_levels: MaskLevels,

    /// How many elements mask conversion may fill with the low level past the
    /// end of a truncated buffer before the declared shape is rejected.
    #[serde(default = "default_max_mask_fill")]
    pub max_mask_fill: usize,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            entry_suffix: default_entry_suffix(),
            on_malformed_entry: MalformedEntryPolicy::default(),
            max_header_len: default_max_header_len(),
            max_entry_len: default_max_entry_len(),
            honor_byte_order: true,
            mask_levels: MaskLevels::default(),
            max_mask_fill: default_max_mask_fill(),
        }
    }
}

impl DecoderConfig {
    /// Parses a configuration from a JSON document. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, BundleError> {
        let config: DecoderConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serializes the configuration back to a JSON document.
    pub fn to_json(&self) -> Result<String, BundleError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Rejects settings that would make every decode fail or match nothing.
    pub fn validate(&self) -> Result<(), BundleError> {
        if self.entry_suffix.is_empty() {
            return Err(BundleError::Config(
                "entry_suffix must not be empty".to_string(),
            ));
        }
        if self.max_header_len == 0 {
            return Err(BundleError::Config(
                "max_header_len must be greater than zero".to_string(),
            ));
        }
        if self.max_entry_len == 0 {
            return Err(BundleError::Config(
                "max_entry_len must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

fn default_entry_suffix() -> String {
    DEFAULT_ENTRY_SUFFIX.to_string()
}

fn default_max_header_len() -> usize {
    MAX_REASONABLE_HEADER_LEN
}

fn default_max_entry_len() -> u64 {
    MAX_REASONABLE_ENTRY_LEN
}

fn default_max_mask_fill() -> usize {
    MAX_REASONABLE_MASK_FILL
}

/// Helper for `serde` to default a boolean field to true.
fn default_true() -> bool {
    true
}

fn default_high() -> u8 {
    255
}

//==================================================================================
// III. Unit Tests
//==================================================================================

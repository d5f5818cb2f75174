// In: src/bundle/summary.rs

//! Per-entry metadata for a whole archive, gathered without decoding payloads.

use serde::Serialize;

use crate::error::BundleError;
use crate::kernels::npy::HeaderInfo;

/// What a host UI needs to describe one array entry.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ArrayInfo {
    pub name: String,
    pub shape: Vec<usize>,
    pub dtype: String,
    pub fortran_order: bool,
    /// `"major.minor"` from the entry prefix.
    pub format_version: String,
    pub magic_ok: bool,
    pub declared_elements: usize,
    /// Whole elements actually present, capped at `declared_elements`.
    pub available_elements: usize,
    pub truncated: bool,
}

impl ArrayInfo {
    pub(crate) fn from_header(name: String, info: HeaderInfo, byte_width: usize) -> Self {
        let present = if byte_width == 0 {
            0
        } else {
            info.payload_bytes / byte_width
        };
        let available_elements = present.min(info.declared_elements);

        Self {
            name,
            shape: info.fields.shape,
            dtype: info.fields.descr,
            fortran_order: info.fields.fortran_order,
            format_version: format!("{}.{}", info.major_version, info.minor_version),
            magic_ok: info.magic_ok,
            declared_elements: info.declared_elements,
            available_elements,
            truncated: available_elements < info.declared_elements,
        }
    }
}

/// The result of `analyze_bundle`: entries sorted by name, plus the names of
/// entries that were skipped as malformed.
#[derive(Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct BundleSummary {
    pub arrays: Vec<ArrayInfo>,
    pub skipped: Vec<String>,
}

impl BundleSummary {
    pub fn get(&self, name: &str) -> Option<&ArrayInfo> {
        self.arrays.iter().find(|info| info.name == name)
    }

    pub fn to_json(&self) -> Result<String, BundleError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

// In: src/bundle/stateless_api.rs

//! One-call entry points using the default `DecoderConfig`. Hosts that need a
//! different suffix, policy or mask levels build a `BundleDecoder` instead.

use ndarray::Array2;

use crate::bundle::decoder::BundleDecoder;
use crate::bundle::summary::BundleSummary;
use crate::error::BundleError;
use crate::kernels::{mask, npy};
use crate::traits::NdarrayMasks;
use crate::types::{ArchiveBundle, DecodedArray, MaskSet};

/// Decodes every `.npy` entry of a zip archive. The first malformed entry aborts
/// the call.
pub fn decode_bundle(archive_bytes: &[u8]) -> Result<ArchiveBundle, BundleError> {
    BundleDecoder::new().decode(archive_bytes)
}

/// Decodes a single `.npy` payload.
pub fn decode_array(payload: &[u8]) -> Result<DecodedArray, BundleError> {
    npy::decode_array(payload)
}

/// Converts a rank-2 or rank-3 array into 0/255 `Array2<u8>` masks.
pub fn to_mask_set(decoded: &DecodedArray) -> Result<MaskSet<Array2<u8>>, BundleError> {
    mask::to_mask_set(decoded, &NdarrayMasks::default())
}

/// Summarizes every `.npy` entry of a zip archive without decoding payloads.
pub fn analyze_bundle(archive_bytes: &[u8]) -> Result<BundleSummary, BundleError> {
    BundleDecoder::new().analyze(archive_bytes)
}

// In: src/bundle/mod.rs

// ====================================================================================
// ARCHITECTURAL OVERVIEW: The Bundle Layer
// ====================================================================================
//
// The `bundle` is the public-facing API for whole archives. It owns everything
// that touches the zip container and composes the pure `kernels` for each entry.
//
// Data Flow (Decoding):
//
//   1. [Stateless API (decode_bundle) / BundleDecoder::decode] -> Receives archive `&[u8]`
//         |
//         `-> a. `archive::ArchiveReader` opens the zip and lists `<name>.npy` entries
//         |
//         `-> b. For each entry, the decompressed bytes go to `kernels::npy::decode_array_with`
//         |
//         `-> c. Failures are aborted or skipped per `MalformedEntryPolicy`
//
//   2. [ArchiveBundle] -> name -> `DecodedArray`, returned to the caller
//
//   3. [Optional: kernels::mask::to_mask_set] -> `MaskSet` through a `MaskAdapter`
//
// Data Flow (Encoding):
//
//   1. [writer::encode_bundle] -> `kernels::writer::encode_array` per array
//         |
//         `-> `writer::write_archive` deflates them into a new zip
//
// ====================================================================================
pub(crate) mod archive;
pub mod decoder;
pub mod stateless_api;
pub mod summary;
pub mod writer;

// --- High-Level Configured API ---
pub use decoder::BundleDecoder;
pub use summary::{ArrayInfo, BundleSummary};

// --- Stateless API ---
pub use stateless_api::{analyze_bundle, decode_array, decode_bundle, to_mask_set};

// --- Archive Writing ---
pub use writer::{encode_bundle, write_archive};

#[cfg(test)]
mod tests;

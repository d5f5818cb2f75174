//! This file is the root of the `npz_bundle` Rust crate.
//!
//! The crate decodes zip-bundled NumPy arrays (`.npz` archives of `.npy`
//! entries) into typed, shaped buffers, and turns rank-2 or rank-3 arrays into
//! binary visualization masks. Its responsibilities here are limited to:
//! 1.  Declaring the top-level modules (`bundle`, `kernels`, etc.).
//! 2.  Re-exporting the small public surface most hosts need.

//==================================================================================
// 0. Constants
//==================================================================================
/// The crate version, automatically set from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
//==================================================================================
// 1. Module Declarations
//==================================================================================
#[macro_use]
mod observability; // Make macros available throughout the crate

pub mod bundle;
pub mod config;
pub mod format;
pub mod kernels;
pub mod logging;
pub mod traits;
pub mod types;

mod error;

//==================================================================================
// 2. Public API
//==================================================================================
pub use bundle::{
    analyze_bundle, decode_array, decode_bundle, encode_bundle, to_mask_set, ArrayInfo,
    BundleDecoder, BundleSummary,
};
pub use config::{DecoderConfig, MalformedEntryPolicy, MaskLevels};
pub use error::BundleError;
pub use traits::{MaskAdapter, NdarrayMasks, NpyElement};
pub use types::{ArchiveBundle, ArrayData, DecodedArray, Dtype, ElementKind, MaskSet};

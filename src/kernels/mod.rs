//! This module serves as the home of the pure, stateless kernels behind the
//! decoder. None of them touch archives or shared state; the `bundle` layer
//! composes them.

//==================================================================================
// 1. Module Declarations
//==================================================================================

/// Header text: tolerant field extraction.
pub mod header;

/// Element payload: bounded typed reinterpretation.
pub mod payload;

/// A whole entry: prefix, header and payload.
pub mod npy;

/// Entry encoding.
pub mod writer;

/// Mask conversion for the visualization boundary.
pub mod mask;

//==================================================================================
// 2. Public API
//==================================================================================

pub use header::{parse_header, HeaderFields};
pub use mask::{to_mask_set, to_mask_set_bounded};
pub use npy::{decode_array, decode_array_with, peek_header, HeaderInfo};
pub use writer::encode_array;

//! This module defines the core, strongly-typed data representations produced by
//! the decoder: element descriptors, typed buffers, decoded arrays, bundles and
//! mask sets.

pub mod array;
pub mod bundle;
pub mod dtype;
pub mod mask;

// Re-export the main types for easier access.
pub use array::{declared_elements, ArrayData, DecodedArray};
pub use bundle::ArchiveBundle;
pub use dtype::{ByteOrder, Dtype, ElementKind};
pub use mask::MaskSet;

// In: src/format.rs

//! Defines all on-disk constants and decoding limits for `.npy` entries and the
//! `.npz` archives that bundle them. Both the decoder and the writer read their
//! layout from here.

//==================================================================================
// I. Entry Prefix Layout
//==================================================================================

/// The two signature bytes every conforming entry starts with (`\x93N`).
pub const NPY_MAGIC: [u8; 2] = [0x93, 0x4E];
/// The full six-byte signature emitted by the writer.
pub const NPY_FULL_MAGIC: &[u8; 6] = b"\x93NUMPY";

/// Offset of the one-byte major version.
pub const MAJOR_VERSION_OFFSET: usize = 6;
/// Offset of the one-byte minor version (read, never interpreted).
pub const MINOR_VERSION_OFFSET: usize = 7;
/// Offset of the little-endian header length field.
pub const HEADER_LEN_OFFSET: usize = 8;

/// The minimum possible size of an entry: signature(6) + version(2) + header_len(2).
pub const MIN_ENTRY_SIZE: usize = 10;
/// Prefix size when the header length is a 4-byte field (major version >= 2).
pub const MIN_ENTRY_SIZE_V2: usize = 12;

/// Writers pad the header so element data starts on this boundary. The decoder
/// never skips padding on its own; it trusts the declared header length.
pub const HEADER_ALIGNMENT: usize = 64;

/// A reasonable limit to prevent OOM from malformed header lengths. (16MB)
pub const MAX_REASONABLE_HEADER_LEN: usize = 16 * 1024 * 1024;

/// Default ceiling on the decompressed size of one archive entry. (1GB)
pub const MAX_REASONABLE_ENTRY_LEN: u64 = 1024 * 1024 * 1024;

/// Default ceiling on mask elements synthesized past the end of a short
/// buffer. (16M elements)
pub const MAX_REASONABLE_MASK_FILL: usize = 16 * 1024 * 1024;

//==================================================================================
// II. Header Defaults & Archive Conventions
//==================================================================================

/// The descriptor assumed when a header carries no `descr` field.
pub const DEFAULT_DESCR: &str = "<f4";

/// The suffix that marks an archive entry as an array.
pub const DEFAULT_ENTRY_SUFFIX: &str = ".npy";

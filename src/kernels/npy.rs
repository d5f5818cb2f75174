//! Decoding of a single `.npy` entry: prefix, header and element payload.
//!
//! Parsing is lenient where the format allows it. A bad signature is logged and
//! ignored, missing header fields take defaults, and a short payload yields a
//! short array. Only a prefix or header that runs past the end of the input is an
//! error.

use crate::config::DecoderConfig;
use crate::error::BundleError;
use serde::Serialize;

use crate::format::{
    HEADER_LEN_OFFSET, MAJOR_VERSION_OFFSET, MINOR_VERSION_OFFSET, MIN_ENTRY_SIZE,
    MIN_ENTRY_SIZE_V2, NPY_MAGIC,
};
use crate::kernels::header::{normalize_header_text, parse_header, HeaderFields};
use crate::kernels::payload::decode_payload;
use crate::types::{declared_elements, DecodedArray, Dtype};

//==================================================================================
// 1. Peek Results
//==================================================================================

/// The metadata extracted from an entry's prefix and header, without touching
/// the element payload.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct HeaderInfo {
    /// `false` when the first two bytes were not `NPY_MAGIC`.
    pub magic_ok: bool,
    pub major_version: u8,
    pub minor_version: u8,
    /// The declared header length in bytes.
    pub header_len: usize,
    /// Offset of the first payload byte (prefix + declared header length).
    pub data_offset: usize,
    pub fields: HeaderFields,
    /// Element count declared by the shape (1 for an empty shape).
    pub declared_elements: usize,
    /// Bytes present after the header.
    pub payload_bytes: usize,
}

//==================================================================================
// 2. Public API
//==================================================================================

/// Parses an entry's prefix and header without converting the payload.
///
/// # Errors
/// * `TruncatedHeader` if the input is shorter than the fixed prefix, or shorter
///   than the prefix plus the declared header length.
/// * `HeaderTooLarge` if the declared header length exceeds `config.max_header_len`.
pub fn peek_header(bytes: &[u8], config: &DecoderConfig) -> Result<HeaderInfo, BundleError> {
    let available = bytes.len();
    if available < MIN_ENTRY_SIZE {
        return Err(BundleError::TruncatedHeader {
            needed: MIN_ENTRY_SIZE,
            available,
        });
    }

    let magic_ok = bytes[..NPY_MAGIC.len()] == NPY_MAGIC;
    if !magic_ok {
        log::warn!(
            "Magic number mismatch: expected {:02X?}, found {:02X?}; continuing",
            NPY_MAGIC,
            &bytes[..NPY_MAGIC.len()]
        );
    }

    let major_version = bytes[MAJOR_VERSION_OFFSET];
    let minor_version = bytes[MINOR_VERSION_OFFSET];

    let (header_len, header_start) = if major_version == 1 {
        let field = [bytes[HEADER_LEN_OFFSET], bytes[HEADER_LEN_OFFSET + 1]];
        (u16::from_le_bytes(field) as usize, HEADER_LEN_OFFSET + 2)
    } else {
        if available < MIN_ENTRY_SIZE_V2 {
            return Err(BundleError::TruncatedHeader {
                needed: MIN_ENTRY_SIZE_V2,
                available,
            });
        }
        let field = [
            bytes[HEADER_LEN_OFFSET],
            bytes[HEADER_LEN_OFFSET + 1],
            bytes[HEADER_LEN_OFFSET + 2],
            bytes[HEADER_LEN_OFFSET + 3],
        ];
        (u32::from_le_bytes(field) as usize, HEADER_LEN_OFFSET + 4)
    };

    // SECURITY: bound the declared length before trusting it.
    if header_len > config.max_header_len {
        return Err(BundleError::HeaderTooLarge {
            declared: header_len,
            limit: config.max_header_len,
        });
    }

    let data_offset = header_start + header_len;
    if data_offset > available {
        return Err(BundleError::TruncatedHeader {
            needed: data_offset,
            available,
        });
    }

    // The declared length is authoritative: alignment padding is part of it.
    let text = normalize_header_text(&bytes[header_start..data_offset]);
    let fields = parse_header(&text);
    let declared = declared_elements(&fields.shape);

    Ok(HeaderInfo {
        magic_ok,
        major_version,
        minor_version,
        header_len,
        data_offset,
        fields,
        declared_elements: declared,
        payload_bytes: available - data_offset,
    })
}

/// Decodes one entry with the default configuration.
pub fn decode_array(bytes: &[u8]) -> Result<DecodedArray, BundleError> {
    decode_array_with(bytes, &DecoderConfig::default())
}

/// Decodes one entry into a typed, shaped array.
///
/// The rank is not constrained here; only mask conversion cares about it.
pub fn decode_array_with(
    bytes: &[u8],
    config: &DecoderConfig,
) -> Result<DecodedArray, BundleError> {
    let info = peek_header(bytes, config)?;
    let dtype = Dtype::parse(&info.fields.descr)?;

    let data = decode_payload(
        &bytes[info.data_offset..],
        &dtype,
        info.declared_elements,
        config.honor_byte_order,
    )?;

    log_metric!(
        "event" = "decode_array",
        "version" = info.major_version,
        "dtype" = &dtype,
        "declared" = info.declared_elements,
        "decoded" = data.len()
    );

    Ok(DecodedArray {
        data,
        shape: info.fields.shape,
        dtype,
        fortran_order: info.fields.fortran_order,
    })
}

//==================================================================================
// 3. Unit Tests
//==================================================================================

//! The `.npy` entry writer.
//!
//! Output is always little-endian with the header padded so the element data
//! starts on a `HEADER_ALIGNMENT` boundary, newline-terminated as NumPy writes
//! it. The padding is counted in the declared header length, which is what lets
//! the decoder trust that length without skipping anything itself.

use crate::error::BundleError;
use crate::format::{HEADER_ALIGNMENT, MIN_ENTRY_SIZE, MIN_ENTRY_SIZE_V2, NPY_FULL_MAGIC};
use crate::types::{declared_elements, ByteOrder, DecodedArray};

//==================================================================================
// 1. Public API
//==================================================================================

/// Serializes a decoded array as a `.npy` entry.
///
/// # Errors
/// Returns `BundleError::ShapeMismatch` if the buffer length differs from the
/// shape product. Truncated arrays are not re-encoded.
pub fn encode_array(array: &DecodedArray) -> Result<Vec<u8>, BundleError> {
    let expected = declared_elements(&array.shape);
    if array.len() != expected {
        return Err(BundleError::ShapeMismatch {
            expected,
            actual: array.len(),
        });
    }

    let dict = header_dict(&descr_for(array), array.fortran_order, &array.shape);
    let (major_version, header) = pad_header(&dict);
    Ok(assemble(major_version, &header, &array.data.to_le_bytes()))
}

/// Writes an entry whose header text is taken verbatim (no padding is added).
///
/// A `major_version` of 1 uses the 2-byte length field; any other version uses
/// the 4-byte field. Headers longer than `u16::MAX` always use the 4-byte field
/// and are written as version 2.
pub fn encode_raw(major_version: u8, header: &str, payload: &[u8]) -> Vec<u8> {
    let major_version = if major_version == 1 && header.len() > u16::MAX as usize {
        2
    } else {
        major_version
    };
    assemble(major_version, header, payload)
}

//==================================================================================
// 2. Private Helpers
//==================================================================================

/// The descriptor to emit: the stored code when it names the buffer's element
/// type in little-endian order (so `<b1` survives), else the canonical code.
fn descr_for(array: &DecodedArray) -> String {
    let kind = array.data.kind();
    let stored = &array.dtype;
    match stored.element_kind() {
        Ok(stored_kind) if stored_kind == kind && stored.byte_order() == ByteOrder::Little => {
            stored.code().to_string()
        }
        _ => kind.descr(),
    }
}

fn header_dict(descr: &str, fortran_order: bool, shape: &[usize]) -> String {
    let shape_str = match shape {
        [] => "()".to_string(),
        [single] => format!("({},)", single),
        dims => {
            let dims: Vec<String> = dims.iter().map(|d| d.to_string()).collect();
            format!("({})", dims.join(", "))
        }
    };
    let fortran = if fortran_order { "True" } else { "False" };
    format!(
        "{{'descr': '{}', 'fortran_order': {}, 'shape': {}, }}",
        descr, fortran, shape_str
    )
}

/// Pads `dict` with spaces and a trailing newline so that prefix + header is a
/// multiple of `HEADER_ALIGNMENT`. Returns the major version the length needs.
fn pad_header(dict: &str) -> (u8, String) {
    let padded = |prefix_len: usize| {
        let unpadded = prefix_len + dict.len() + 1;
        let padding = (HEADER_ALIGNMENT - unpadded % HEADER_ALIGNMENT) % HEADER_ALIGNMENT;
        format!("{}{}\n", dict, " ".repeat(padding))
    };

    let v1 = padded(MIN_ENTRY_SIZE);
    if v1.len() <= u16::MAX as usize {
        (1, v1)
    } else {
        (2, padded(MIN_ENTRY_SIZE_V2))
    }
}

fn assemble(major_version: u8, header: &str, payload: &[u8]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(MIN_ENTRY_SIZE_V2 + header.len() + payload.len());
    bytes.extend_from_slice(NPY_FULL_MAGIC);
    bytes.push(major_version);
    bytes.push(0);
    if major_version == 1 {
        bytes.extend_from_slice(&(header.len() as u16).to_le_bytes());
    } else {
        bytes.extend_from_slice(&(header.len() as u32).to_le_bytes());
    }
    bytes.extend_from_slice(header.as_bytes());
    bytes.extend_from_slice(payload);
    bytes
}

//==================================================================================
// 3. Unit Tests
//==================================================================================

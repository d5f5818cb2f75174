//! This module contains the pure, stateless kernel that turns the raw element
//! bytes of an entry into a typed buffer.
//!
//! The read is bounded by both the declared shape and the bytes actually present:
//! `min(declared * width, available)`, rounded down to whole elements. A short
//! payload produces a short buffer and a warning, never an error. The kernel is
//! panic-free and relies on `bytemuck` for the reinterpretation.

use bytemuck::PodCastError;

use crate::error::BundleError;
use crate::traits::NpyElement;
use crate::types::{ArrayData, Dtype, ElementKind};

//==================================================================================
// 1. Private Core Logic
//==================================================================================

/// Reinterprets `bytes` (a whole number of elements) as a `Vec<T>`.
fn read_elements<T: NpyElement>(bytes: &[u8], swap: bool) -> Result<Vec<T>, BundleError> {
    let mut values: Vec<T> = match bytemuck::try_cast_slice::<u8, T>(bytes) {
        Ok(aligned) => aligned.to_vec(),
        // Entry payloads start wherever the header ends, so misalignment is normal.
        Err(PodCastError::TargetAlignmentGreaterAndInputNotAligned) => bytes
            .chunks_exact(std::mem::size_of::<T>())
            .map(bytemuck::pod_read_unaligned::<T>)
            .collect(),
        Err(e) => return Err(e.into()),
    };

    if swap {
        for value in values.iter_mut() {
            *value = value.swap_bytes();
        }
    }
    Ok(values)
}

//==================================================================================
// 2. Public API
//==================================================================================

/// Number of payload bytes the decoder consumes for a given declaration.
pub fn bytes_to_read(declared_elements: usize, byte_width: usize, available: usize) -> usize {
    if byte_width == 0 {
        return 0;
    }
    let expected = declared_elements.saturating_mul(byte_width);
    let bounded = expected.min(available);
    bounded - bounded % byte_width
}

/// Decodes the element payload that follows an entry's header.
///
/// # Args
/// * `payload`: every byte after the header.
/// * `dtype`: the parsed descriptor; selects element type and byte order.
/// * `declared_elements`: the shape product (1 for a scalar).
/// * `honor_byte_order`: when false, `>` data is read as little-endian.
///
/// # Errors
/// Returns `BundleError::UnsupportedDtype` if the descriptor names no supported
/// element type.
pub fn decode_payload(
    payload: &[u8],
    dtype: &Dtype,
    declared_elements: usize,
    honor_byte_order: bool,
) -> Result<ArrayData, BundleError> {
    let kind = dtype.element_kind()?;
    let width = kind.byte_width();
    let len = bytes_to_read(declared_elements, width, payload.len());

    if len / width < declared_elements {
        log::warn!(
            "Payload holds {} of {} declared {} elements; returning a short array",
            len / width,
            declared_elements,
            dtype
        );
    }

    let swap = if honor_byte_order {
        dtype.byte_order().needs_swap()
    } else {
        cfg!(target_endian = "big")
    };

    let bytes = &payload[..len];
    let data = match kind {
        ElementKind::UInt8 => ArrayData::UInt8(read_elements::<u8>(bytes, swap)?),
        ElementKind::UInt16 => ArrayData::UInt16(read_elements::<u16>(bytes, swap)?),
        ElementKind::UInt32 => ArrayData::UInt32(read_elements::<u32>(bytes, swap)?),
        ElementKind::UInt64 => ArrayData::UInt64(read_elements::<u64>(bytes, swap)?),
        ElementKind::Int8 => ArrayData::Int8(read_elements::<i8>(bytes, swap)?),
        ElementKind::Int16 => ArrayData::Int16(read_elements::<i16>(bytes, swap)?),
        ElementKind::Int32 => ArrayData::Int32(read_elements::<i32>(bytes, swap)?),
        ElementKind::Int64 => ArrayData::Int64(read_elements::<i64>(bytes, swap)?),
        ElementKind::Float32 => ArrayData::Float32(read_elements::<f32>(bytes, swap)?),
        ElementKind::Float64 => ArrayData::Float64(read_elements::<f64>(bytes, swap)?),
    };
    Ok(data)
}

//==================================================================================
// 3. Unit Tests
//==================================================================================

//! This module contains the kernel that turns a decoded rank-2 or rank-3 array
//! into two-level masks for overlay visualization.
//!
//! The kernel only thresholds and slices. Resizing, colour conversion and
//! compositing belong to whoever consumes the masks through a `MaskAdapter`.

use crate::error::BundleError;
use crate::format::MAX_REASONABLE_MASK_FILL;
use crate::traits::MaskAdapter;
use crate::types::{DecodedArray, MaskSet};

/// Converts `decoded` into masks built by `adapter`, with the default fill limit.
///
/// * Rank 2 `(rows, cols)`: one mask.
/// * Rank 3 `(n, rows, cols)`: one mask per slice along axis 0, in order. Slice
///   `k` reads elements `k * rows * cols ..`.
///
/// Values `> 0` map to the adapter's high level, everything else to low. Reads
/// are bounds-checked against the actual buffer, so elements missing from a
/// truncated payload come out low.
///
/// # Errors
/// * `UnsupportedRank` for any other rank.
/// * `ShapeMismatch` when the declared shape needs more than
///   `MAX_REASONABLE_MASK_FILL` elements beyond what the buffer holds.
pub fn to_mask_set<A: MaskAdapter>(
    decoded: &DecodedArray,
    adapter: &A,
) -> Result<MaskSet<A::Mask>, BundleError> {
    to_mask_set_bounded(decoded, adapter, MAX_REASONABLE_MASK_FILL)
}

/// As `to_mask_set`, but at most `max_fill` elements may be synthesized past the
/// end of a short buffer. The check runs before any mask is allocated.
pub fn to_mask_set_bounded<A: MaskAdapter>(
    decoded: &DecodedArray,
    adapter: &A,
    max_fill: usize,
) -> Result<MaskSet<A::Mask>, BundleError> {
    let levels = adapter.levels();
    let available = decoded.len();

    match decoded.shape.as_slice() {
        &[rows, cols] => {
            let plane = plane_len(rows, cols, available)?;
            check_fill(plane, available, max_fill)?;
            let values = decoded.data.threshold_range(0, plane, levels);
            Ok(MaskSet::Single(adapter.build_mask(rows, cols, values)?))
        }
        &[count, rows, cols] => {
            let plane = plane_len(rows, cols, available)?;
            // Every mask costs at least one unit, so empty planes still bound `count`.
            let cost = plane
                .max(1)
                .checked_mul(count)
                .ok_or(BundleError::ShapeMismatch {
                    expected: usize::MAX,
                    actual: available,
                })?;
            check_fill(cost, available, max_fill)?;
            if available < plane.saturating_mul(count) {
                log::warn!(
                    "Mask stack declares {} slices of {}x{} but only {} values are present",
                    count,
                    rows,
                    cols,
                    available
                );
            }
            let masks = (0..count)
                .map(|index| {
                    let values = decoded.data.threshold_range(index * plane, plane, levels);
                    adapter.build_mask(rows, cols, values)
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok(MaskSet::Stack(masks))
        }
        other => Err(BundleError::UnsupportedRank(other.len())),
    }
}

/// Elements per mask; an overflowing plane can never be backed by a real buffer.
fn plane_len(rows: usize, cols: usize, available: usize) -> Result<usize, BundleError> {
    rows.checked_mul(cols).ok_or(BundleError::ShapeMismatch {
        expected: usize::MAX,
        actual: available,
    })
}

/// Rejects shapes whose low-level padding would exceed `max_fill` elements.
fn check_fill(needed: usize, available: usize, max_fill: usize) -> Result<(), BundleError> {
    if needed.saturating_sub(available) > max_fill {
        log::warn!(
            "Mask shape needs {} elements but only {} are present; refusing to pad",
            needed,
            available
        );
        return Err(BundleError::ShapeMismatch {
            expected: needed,
            actual: available,
        });
    }
    Ok(())
}

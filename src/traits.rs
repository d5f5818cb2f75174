//! This module defines shared traits used across the kernels and the bundle layer.
//!
//! * `NpyElement` ties each supported primitive to its `ElementKind` and to its
//!   `ArrayData` variant.
//! * `MaskAdapter` is the boundary to whatever image/visualization library
//!   consumes masks. The decoder itself never depends on one.

use bytemuck::Pod;
use ndarray::Array2;
use num_traits::Zero;

use crate::config::MaskLevels;
use crate::error::BundleError;
use crate::types::{ArrayData, ElementKind};

//==================================================================================
// 1. Element Trait
//==================================================================================

/// A primitive that can be stored in a `.npy` payload.
pub trait NpyElement: Pod + Zero + PartialOrd + Send + Sync + 'static {
    const KIND: ElementKind;

    /// Reverses the byte order of the value's bit pattern.
    fn swap_bytes(self) -> Self;

    /// Widens the value for display or generic numeric consumers.
    fn to_f64(self) -> f64;

    /// Moves a typed buffer into the matching `ArrayData` variant.
    fn wrap(data: Vec<Self>) -> ArrayData;

    /// Borrows the typed buffer if `data` holds this element type.
    fn view(data: &ArrayData) -> Option<&[Self]>;

    /// The mask threshold: strictly greater than zero. `NaN` is never positive.
    fn is_positive(&self) -> bool {
        *self > Self::zero()
    }
}

// Implement the trait for all supported primitive types.
macro_rules! impl_npy_element {
    ($T:ty, $kind:ident, |$v:ident| $swap:expr) => {
        impl NpyElement for $T {
            const KIND: ElementKind = ElementKind::$kind;

            fn swap_bytes(self) -> Self {
                let $v = self;
                $swap
            }

            fn to_f64(self) -> f64 {
                self as f64
            }

            fn wrap(data: Vec<Self>) -> ArrayData {
                ArrayData::$kind(data)
            }

            fn view(data: &ArrayData) -> Option<&[Self]> {
                match data {
                    ArrayData::$kind(values) => Some(values),
                    _ => None,
                }
            }
        }
    };
}

impl_npy_element!(u8, UInt8, |v| v);
impl_npy_element!(u16, UInt16, |v| v.swap_bytes());
impl_npy_element!(u32, UInt32, |v| v.swap_bytes());
impl_npy_element!(u64, UInt64, |v| v.swap_bytes());
impl_npy_element!(i8, Int8, |v| v);
impl_npy_element!(i16, Int16, |v| v.swap_bytes());
impl_npy_element!(i32, Int32, |v| v.swap_bytes());
impl_npy_element!(i64, Int64, |v| v.swap_bytes());
impl_npy_element!(f32, Float32, |v| f32::from_bits(v.to_bits().swap_bytes()));
impl_npy_element!(f64, Float64, |v| f64::from_bits(v.to_bits().swap_bytes()));

//==================================================================================
// 2. Visualization Boundary
//==================================================================================

/// Builds one 2D mask from a row-major buffer of two-level values.
///
/// Implementations wrap the consumer's own image type; the mask kernel hands over
/// buffers already thresholded to `levels()`.
pub trait MaskAdapter {
    type Mask;

    /// The low/high values the kernel writes into each buffer.
    fn levels(&self) -> MaskLevels;

    fn build_mask(&self, rows: usize, cols: usize, values: Vec<u8>)
        -> Result<Self::Mask, BundleError>;
}

/// The bundled adapter: masks are `ndarray::Array2<u8>` of shape `(rows, cols)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NdarrayMasks {
    pub levels: MaskLevels,
}

impl NdarrayMasks {
    pub fn new(levels: MaskLevels) -> Self {
        Self { levels }
    }
}

impl MaskAdapter for NdarrayMasks {
    type Mask = Array2<u8>;

    fn levels(&self) -> MaskLevels {
        self.levels
    }

    fn build_mask(
        &self,
        rows: usize,
        cols: usize,
        values: Vec<u8>,
    ) -> Result<Self::Mask, BundleError> {
        Ok(Array2::from_shape_vec((rows, cols), values)?)
    }
}

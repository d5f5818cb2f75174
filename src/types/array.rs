//! The decoded, in-memory representation of a single `.npy` entry.

use ndarray::{ArrayD, IxDyn, ShapeBuilder};
use serde::Serialize;

use crate::config::MaskLevels;
use crate::error::BundleError;
use crate::traits::NpyElement;
use crate::types::dtype::{Dtype, ElementKind};

/// A flat, typed element buffer.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "kind", content = "values")]
pub enum ArrayData {
    UInt8(Vec<u8>),
    UInt16(Vec<u16>),
    UInt32(Vec<u32>),
    UInt64(Vec<u64>),
    Int8(Vec<i8>),
    Int16(Vec<i16>),
    Int32(Vec<i32>),
    Int64(Vec<i64>),
    Float32(Vec<f32>),
    Float64(Vec<f64>),
}

/// Runs `$body` with `$values` bound to the typed slice of whichever variant is present.
macro_rules! with_values {
    ($data:expr, $values:ident => $body:expr) => {
        match $data {
            ArrayData::UInt8($values) => $body,
            ArrayData::UInt16($values) => $body,
            ArrayData::UInt32($values) => $body,
            ArrayData::UInt64($values) => $body,
            ArrayData::Int8($values) => $body,
            ArrayData::Int16($values) => $body,
            ArrayData::Int32($values) => $body,
            ArrayData::Int64($values) => $body,
            ArrayData::Float32($values) => $body,
            ArrayData::Float64($values) => $body,
        }
    };
}

impl ArrayData {
    pub fn kind(&self) -> ElementKind {
        match self {
            ArrayData::UInt8(_) => ElementKind::UInt8,
            ArrayData::UInt16(_) => ElementKind::UInt16,
            ArrayData::UInt32(_) => ElementKind::UInt32,
            ArrayData::UInt64(_) => ElementKind::UInt64,
            ArrayData::Int8(_) => ElementKind::Int8,
            ArrayData::Int16(_) => ElementKind::Int16,
            ArrayData::Int32(_) => ElementKind::Int32,
            ArrayData::Int64(_) => ElementKind::Int64,
            ArrayData::Float32(_) => ElementKind::Float32,
            ArrayData::Float64(_) => ElementKind::Float64,
        }
    }

    pub fn len(&self) -> usize {
        with_values!(self, values => values.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bounds-checked read of element `index`, widened to `f64`.
    pub fn get_f64(&self, index: usize) -> Option<f64> {
        with_values!(self, values => values.get(index).map(|v| v.to_f64()))
    }

    /// Serializes the buffer as little-endian element bytes.
    pub fn to_le_bytes(&self) -> Vec<u8> {
        with_values!(self, values => le_bytes(values))
    }

    /// Thresholds `len` elements starting at `start`: positive values become
    /// `levels.high`, everything else (including indices past the end of the
    /// buffer) becomes `levels.low`.
    pub(crate) fn threshold_range(&self, start: usize, len: usize, levels: MaskLevels) -> Vec<u8> {
        with_values!(self, values => threshold(values, start, len, levels))
    }
}

fn le_bytes<T: NpyElement>(values: &[T]) -> Vec<u8> {
    if cfg!(target_endian = "big") {
        let swapped: Vec<T> = values.iter().map(|v| v.swap_bytes()).collect();
        bytemuck::cast_slice(&swapped).to_vec()
    } else {
        bytemuck::cast_slice(values).to_vec()
    }
}

fn threshold<T: NpyElement>(values: &[T], start: usize, len: usize, levels: MaskLevels) -> Vec<u8> {
    (start..start.saturating_add(len))
        .map(|i| match values.get(i) {
            Some(v) if v.is_positive() => levels.high,
            _ => levels.low,
        })
        .collect()
}

/// A decoded array entry: typed data plus the metadata parsed from its header.
///
/// `data` may hold fewer elements than `shape` declares when the payload was
/// truncated. Index it by `data.len()`, not by the shape product.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct DecodedArray {
    pub data: ArrayData,
    pub shape: Vec<usize>,
    pub dtype: Dtype,
    /// Column-major flag from the header. Descriptive only; data is never transposed.
    pub fortran_order: bool,
}

impl DecodedArray {
    /// Builds a row-major array with the canonical little-endian descriptor for `T`.
    pub fn from_vec<T: NpyElement>(data: Vec<T>, shape: Vec<usize>) -> Self {
        Self {
            data: T::wrap(data),
            shape,
            dtype: Dtype::from_kind(T::KIND),
            fortran_order: false,
        }
    }

    /// Number of elements actually present.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    /// Element count declared by `shape` (1 for an empty shape).
    pub fn declared_len(&self) -> usize {
        declared_elements(&self.shape)
    }

    /// `true` when the payload held fewer elements than the shape declares.
    pub fn is_truncated(&self) -> bool {
        self.len() < self.declared_len()
    }

    pub fn get_f64(&self, index: usize) -> Option<f64> {
        self.data.get_f64(index)
    }

    /// Borrows the buffer as `&[T]`, or `None` if it holds another element type.
    pub fn as_slice<T: NpyElement>(&self) -> Option<&[T]> {
        T::view(&self.data)
    }

    /// Builds an `ndarray::ArrayD` with this array's shape and memory order.
    ///
    /// # Errors
    /// * `UnsupportedDtype` if `T` is not the stored element type.
    /// * `ShapeMismatch` if the buffer is shorter than the declared shape.
    pub fn to_ndarray<T: NpyElement>(&self) -> Result<ArrayD<T>, BundleError> {
        let values = self.as_slice::<T>().ok_or_else(|| {
            BundleError::UnsupportedDtype(format!(
                "array holds {} but {} was requested",
                self.data.kind(),
                T::KIND
            ))
        })?;

        let expected = self.declared_len();
        if values.len() != expected {
            return Err(BundleError::ShapeMismatch {
                expected,
                actual: values.len(),
            });
        }

        let shape = IxDyn(&self.shape).set_f(self.fortran_order);
        Ok(ArrayD::from_shape_vec(shape, values.to_vec())?)
    }
}

/// Product of all extents; an empty shape declares a single scalar element.
/// Saturates instead of overflowing so that absurd shapes only ever shorten reads.
pub fn declared_elements(shape: &[usize]) -> usize {
    shape
        .iter()
        .try_fold(1usize, |acc, &dim| acc.checked_mul(dim))
        .unwrap_or(usize::MAX)
}

//! This module defines the canonical, type-safe representation of NumPy element
//! descriptors (`'<f4'`, `'|u1'`, `'>i8'`, ...).

use crate::error::BundleError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The byte order declared by the first character of a descriptor.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ByteOrder {
    Little,
    Big,
}

impl ByteOrder {
    /// `true` when values in this order must be swapped to become native values.
    pub fn needs_swap(&self) -> bool {
        match self {
            ByteOrder::Little => cfg!(target_endian = "big"),
            ByteOrder::Big => cfg!(target_endian = "little"),
        }
    }
}

/// The concrete element types the decoder can materialize.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ElementKind {
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Int8,
    Int16,
    Int32,
    Int64,
    Float32,
    Float64,
}

impl ElementKind {
    /// Resolves a category letter and byte width to an element kind.
    ///
    /// NumPy booleans (`b1`) are one byte of 0/1 and are carried as `UInt8`.
    pub fn from_category(category: char, byte_width: usize) -> Option<Self> {
        match (category, byte_width) {
            ('u', 1) | ('b', 1) => Some(Self::UInt8),
            ('u', 2) => Some(Self::UInt16),
            ('u', 4) => Some(Self::UInt32),
            ('u', 8) => Some(Self::UInt64),
            ('i', 1) => Some(Self::Int8),
            ('i', 2) => Some(Self::Int16),
            ('i', 4) => Some(Self::Int32),
            ('i', 8) => Some(Self::Int64),
            ('f', 4) => Some(Self::Float32),
            ('f', 8) => Some(Self::Float64),
            _ => None,
        }
    }

    pub fn byte_width(&self) -> usize {
        match self {
            Self::UInt8 | Self::Int8 => 1,
            Self::UInt16 | Self::Int16 => 2,
            Self::UInt32 | Self::Int32 | Self::Float32 => 4,
            Self::UInt64 | Self::Int64 | Self::Float64 => 8,
        }
    }

    /// The NumPy category letter for this kind.
    pub fn category(&self) -> char {
        if self.is_float() {
            'f'
        } else if self.is_signed_int() {
            'i'
        } else {
            'u'
        }
    }

    /// The little-endian descriptor a writer emits for this kind, e.g. `<i2`.
    pub fn descr(&self) -> String {
        format!("<{}{}", self.category(), self.byte_width())
    }

    /// Returns `true` if the data type is a signed integer.
    pub fn is_signed_int(&self) -> bool {
        matches!(self, Self::Int8 | Self::Int16 | Self::Int32 | Self::Int64)
    }

    /// Returns `true` if the data type is a floating-point number.
    pub fn is_float(&self) -> bool {
        matches!(self, Self::Float32 | Self::Float64)
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// A parsed element descriptor.
///
/// `code` keeps the descriptor text exactly as stored in the decoded array (after
/// `|` has been rewritten to `<`); the remaining fields are derived from it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct Dtype {
    code: String,
    byte_order: ByteOrder,
    category: char,
    byte_width: usize,
}

impl Dtype {
    /// Parses a descriptor code.
    ///
    /// * A leading `<`, `|` or `=` reads as little-endian and `>` as big-endian. A
    ///   code with no order marker is treated as little-endian.
    /// * A missing category letter defaults to `u`.
    /// * The width is the leading digit run after the category; when there are no
    ///   digits the width defaults to 1.
    pub fn parse(code: &str) -> Result<Self, BundleError> {
        let code = normalize_code(code);
        let mut chars = code.chars().peekable();

        let byte_order = match chars.peek() {
            Some('>') => {
                chars.next();
                ByteOrder::Big
            }
            Some('<') | Some('|') | Some('=') => {
                chars.next();
                ByteOrder::Little
            }
            _ => ByteOrder::Little,
        };

        let category = chars.next().unwrap_or('u');
        let digits: String = chars.take_while(|c| c.is_ascii_digit()).collect();
        let byte_width = if digits.is_empty() {
            1
        } else {
            digits
                .parse::<usize>()
                .map_err(|_| BundleError::UnsupportedDtype(code.clone()))?
        };

        Ok(Self {
            code,
            byte_order,
            category,
            byte_width,
        })
    }

    /// Builds the canonical little-endian descriptor for an element kind.
    pub fn from_kind(kind: ElementKind) -> Self {
        Self {
            code: kind.descr(),
            byte_order: ByteOrder::Little,
            category: kind.category(),
            byte_width: kind.byte_width(),
        }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    pub fn category(&self) -> char {
        self.category
    }

    pub fn byte_width(&self) -> usize {
        self.byte_width
    }

    /// Resolves the descriptor to a concrete element kind.
    pub fn element_kind(&self) -> Result<ElementKind, BundleError> {
        ElementKind::from_category(self.category, self.byte_width)
            .ok_or_else(|| BundleError::UnsupportedDtype(self.code.clone()))
    }
}

impl fmt::Display for Dtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.code)
    }
}

/// Rewrites the "not applicable" byte-order marker `|` to `<`.
pub fn normalize_code(code: &str) -> String {
    match code.strip_prefix('|') {
        Some(rest) => format!("<{}", rest),
        None => code.to_string(),
    }
}

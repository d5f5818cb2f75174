//! This module contains the pure, stateless kernel that extracts `shape`, `descr`
//! and `fortran_order` from the textual header of a `.npy` entry.
//!
//! The header is a Python dict literal, but producers vary in quoting, spacing
//! and padding. It is a tolerant field extractor rather than a
//! parser: each field has an ordered list of patterns and the first match wins.
//! Missing fields fall back to defaults and never fail.

use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use crate::format::DEFAULT_DESCR;
use crate::types::dtype::normalize_code;

//==================================================================================
// 1. Public Structs
//==================================================================================

/// The fields extracted from a header.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct HeaderFields {
    /// Extents in header order. Empty when the field is missing or unparseable.
    pub shape: Vec<usize>,
    /// The element descriptor with `|` rewritten to `<`. `<f4` when missing.
    pub descr: String,
    pub fortran_order: bool,
}

impl Default for HeaderFields {
    fn default() -> Self {
        Self {
            shape: Vec::new(),
            descr: DEFAULT_DESCR.to_string(),
            fortran_order: false,
        }
    }
}

//==================================================================================
// 2. Pattern Table
//==================================================================================

struct HeaderPatterns {
    shape: [Regex; 2],
    descr: [Regex; 3],
}

fn patterns() -> &'static HeaderPatterns {
    static PATTERNS: OnceLock<HeaderPatterns> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        let compile = |pattern: &str| Regex::new(pattern).expect("header pattern is a valid regex");
        HeaderPatterns {
            shape: [
                // 'shape': (2, 3)
                compile(r#"['"]?shape['"]?\s*:\s*\(([^)]*)\)"#),
                // shape: 2, 3
                compile(r#"['"]?shape['"]?\s*:\s*([^\s,}]+(?:,\s*[^\s,}]+)*)"#),
            ],
            descr: [
                compile(r"'descr'\s*:\s*'([^']+)'"),
                compile(r#""descr"\s*:\s*"([^"]+)""#),
                compile(r#"descr\s*:\s*['"]([^'"]+)['"]"#),
            ],
        }
    })
}

//==================================================================================
// 3. Public API
//==================================================================================

/// Decodes raw header bytes into the text the field extractor works on.
///
/// Invalid UTF-8 is replaced rather than rejected. The text is trimmed and then
/// cut after the last `}`, which drops padding a producer left inside the
/// declared header region.
pub fn normalize_header_text(raw: &[u8]) -> String {
    let text = String::from_utf8_lossy(raw);
    let trimmed = text.trim();
    match trimmed.rfind('}') {
        Some(pos) => trimmed[..=pos].to_string(),
        None => trimmed.to_string(),
    }
}

/// Extracts the header fields from normalized header text.
pub fn parse_header(text: &str) -> HeaderFields {
    let patterns = patterns();

    let shape = match first_capture(&patterns.shape, text) {
        Some(list) => parse_extents(list),
        None => {
            log::debug!("Header has no shape field; treating the array as a scalar");
            Vec::new()
        }
    };

    let descr = match first_capture(&patterns.descr, text) {
        Some(code) => normalize_code(code),
        None => {
            log::debug!("Header has no descr field; defaulting to {}", DEFAULT_DESCR);
            DEFAULT_DESCR.to_string()
        }
    };

    let fortran_order =
        text.contains("fortran_order': True") || text.contains("fortran_order\": True");

    HeaderFields {
        shape,
        descr,
        fortran_order,
    }
}

//==================================================================================
// 4. Private Helpers
//==================================================================================

fn first_capture<'t>(candidates: &[Regex], text: &'t str) -> Option<&'t str> {
    candidates
        .iter()
        .find_map(|re| re.captures(text).and_then(|c| c.get(1)))
        .map(|m| m.as_str())
}

/// Splits a comma list into extents. Each token contributes its leading digit
/// run (so `3L` reads as 3); tokens without one are dropped.
fn parse_extents(list: &str) -> Vec<usize> {
    list.split(',')
        .filter_map(|token| {
            let token = token.trim();
            let token = token.strip_prefix('+').unwrap_or(token);
            let end = token
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(token.len());
            token[..end].parse::<usize>().ok()
        })
        .collect()
}

//==================================================================================
// 5. Unit Tests
//==================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numpy_header() {
        let fields =
            parse_header("{'descr': '<i2', 'fortran_order': False, 'shape': (3, 480, 640), }");
        assert_eq!(fields.shape, vec![3, 480, 640]);
        assert_eq!(fields.descr, "<i2");
        assert!(!fields.fortran_order);
    }

    #[test]
    fn test_one_dimensional_and_scalar_shapes() {
        assert_eq!(parse_header("{'shape': (5,), 'descr': '<u1'}").shape, vec![5]);
        assert_eq!(parse_header("{'shape': (), 'descr': '<u1'}").shape, Vec::<usize>::new());
    }

    #[test]
    fn test_bare_shape_fallback() {
        let fields = parse_header("{descr: '<f8', shape: 4, 2}");
        assert_eq!(fields.shape, vec![4, 2]);
        assert_eq!(fields.descr, "<f8");
    }

    #[test]
    fn test_non_numeric_tokens_are_dropped() {
        assert_eq!(parse_header("{'shape': (2L, x, 3)}").shape, vec![2, 3]);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let fields = parse_header("{'fortran_order': False}");
        assert!(fields.shape.is_empty());
        assert_eq!(fields.descr, "<f4");
        assert!(!fields.fortran_order);
        assert_eq!(parse_header(""), HeaderFields::default());
    }

    #[test]
    fn test_descr_quoting_variants() {
        assert_eq!(parse_header(r#"{"descr": ">i4"}"#).descr, ">i4");
        assert_eq!(parse_header(r#"{descr: "<u2"}"#).descr, "<u2");
        // The single-quoted form is preferred when both are present.
        assert_eq!(parse_header(r#"{'descr': '<u1', "descr": "<f8"}"#).descr, "<u1");
    }

    #[test]
    fn test_pipe_descr_is_normalized() {
        assert_eq!(parse_header("{'descr': '|u1', 'shape': (2,)}").descr, "<u1");
    }

    #[test]
    fn test_fortran_order_detection() {
        assert!(parse_header("{'descr': '<f4', 'fortran_order': True, 'shape': (2, 2)}").fortran_order);
        assert!(parse_header(r#"{"descr": "<f4", "fortran_order": True}"#).fortran_order);
        assert!(!parse_header("{'fortran_order': true}").fortran_order);
    }

    #[test]
    fn test_normalize_header_text_cuts_padding() {
        let raw = b"  {'descr': '<u1', 'shape': (1,), }    \n\x00\x00";
        assert_eq!(
            normalize_header_text(raw),
            "{'descr': '<u1', 'shape': (1,), }"
        );
        assert_eq!(normalize_header_text(b"  no braces "), "no braces");
    }

    #[test]
    fn test_normalize_header_text_is_lossy_on_bad_utf8() {
        let raw = [b'{', 0xFF, b'}'];
        assert_eq!(normalize_header_text(&raw), "{\u{FFFD}}");
    }
}

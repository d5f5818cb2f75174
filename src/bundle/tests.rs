use super::*;
use crate::config::{DecoderConfig, MalformedEntryPolicy, MaskLevels};
use crate::error::BundleError;
use crate::kernels::writer::{encode_array, encode_raw};
use crate::types::{ArrayData, DecodedArray};
use ndarray::array;
use std::sync::Arc;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A 3-mask stack as a segmentation model would export it, plus a score vector.
fn create_mask_archive() -> (Vec<u8>, DecodedArray, DecodedArray) {
    let masks = DecodedArray::from_vec(
        vec![
            1u8, 0, 0, //
            0, 1, 0, //
            0, 0, 1, //
            1, 1, 0, //
            0, 0, 0, //
            1, 0, 1,
        ],
        vec![3, 2, 3],
    );
    let scores = DecodedArray::from_vec(vec![0.9f32, 0.8, 0.1], vec![3]);
    let archive = encode_bundle([("masks", &masks), ("scores", &scores)]).unwrap();
    (archive, masks, scores)
}

/// An archive with one good entry, one entry whose header overruns its bytes,
/// and one unrelated file.
fn create_archive_with_bad_entry() -> Vec<u8> {
    let good = encode_array(&DecodedArray::from_vec(vec![1i32, 2, 3], vec![3])).unwrap();
    let mut bad = encode_raw(1, "{'descr': '<u1', 'shape': (2,), }", &[1, 2]);
    bad.truncate(20);
    write_archive([
        ("good.npy", good.as_slice()),
        ("bad.npy", bad.as_slice()),
        ("notes.txt", &b"not an array"[..]),
    ])
    .unwrap()
}

#[test]
fn test_decode_bundle_roundtrip() {
    init_logger();
    let (archive, masks, scores) = create_mask_archive();

    let bundle = decode_bundle(&archive).unwrap();

    assert_eq!(bundle.len(), 2);
    assert_eq!(bundle.names(), vec!["masks", "scores"]);
    assert_eq!(bundle.get("masks").unwrap(), &masks);
    assert_eq!(bundle.get("scores").unwrap(), &scores);
}

#[test]
fn test_unrelated_entries_are_ignored() {
    let masks = encode_array(&DecodedArray::from_vec(vec![0u8, 1, 1, 0], vec![2, 2])).unwrap();
    let archive = write_archive([
        ("masks.npy", masks.as_slice()),
        ("readme.txt", &b"hello"[..]),
    ])
    .unwrap();

    let bundle = decode_bundle(&archive).unwrap();
    assert_eq!(bundle.names(), vec!["masks"]);
    assert!(!bundle.contains("readme"));
    assert!(!bundle.contains("readme.txt"));
}

#[test]
fn test_empty_archive_yields_empty_bundle() {
    let archive = write_archive(Vec::<(&str, &[u8])>::new()).unwrap();
    let bundle = decode_bundle(&archive).unwrap();
    assert!(bundle.is_empty());
}

#[test]
fn test_invalid_container_is_an_archive_error() {
    init_logger();
    let result = decode_bundle(b"PK but not really a zip archive");
    assert!(matches!(result, Err(BundleError::ArchiveFormat(_))));

    // A bare .npy payload is not an archive either.
    let npy = encode_array(&DecodedArray::from_vec(vec![1u8], vec![1])).unwrap();
    assert!(matches!(
        decode_bundle(&npy),
        Err(BundleError::ArchiveFormat(_))
    ));
}

#[test]
fn test_abort_policy_names_failing_entry() {
    init_logger();
    let archive = create_archive_with_bad_entry();

    let result = decode_bundle(&archive);

    match result {
        Err(BundleError::Entry { entry, source }) => {
            assert_eq!(entry, "bad");
            assert!(matches!(*source, BundleError::TruncatedHeader { .. }));
        }
        other => panic!("Expected an Entry error for 'bad', got {:?}", other),
    }
}

#[test]
fn test_skip_policy_returns_remaining_entries() {
    init_logger();
    let archive = create_archive_with_bad_entry();
    let config = DecoderConfig {
        on_malformed_entry: MalformedEntryPolicy::Skip,
        ..DecoderConfig::default()
    };
    let decoder = BundleDecoder::with_config(Arc::new(config));

    let bundle = decoder.decode(&archive).unwrap();

    assert_eq!(bundle.names(), vec!["good"]);
    assert_eq!(
        bundle.get("good").unwrap().data,
        ArrayData::Int32(vec![1, 2, 3])
    );

    let summary = decoder.analyze(&archive).unwrap();
    assert_eq!(summary.arrays.len(), 1);
    assert_eq!(summary.skipped, vec!["bad".to_string()]);
}

#[test]
fn test_magic_corruption_inside_archive() {
    init_logger();
    let original = DecodedArray::from_vec(vec![3u16, 1, 4, 1, 5, 9], vec![2, 3]);
    let mut payload = encode_array(&original).unwrap();
    payload[0] = b'X';
    payload[1] = b'Y';
    let archive = write_archive([("pi.npy", payload.as_slice())]).unwrap();

    let bundle = decode_bundle(&archive).unwrap();
    assert_eq!(bundle.get("pi").unwrap(), &original);

    let summary = analyze_bundle(&archive).unwrap();
    assert!(!summary.get("pi").unwrap().magic_ok);
}

#[test]
fn test_truncated_entry_is_short_not_an_error() {
    init_logger();
    let header = "{'descr': '<f8', 'fortran_order': False, 'shape': (4,), }";
    let mut payload = Vec::new();
    payload.extend_from_slice(&1.5f64.to_le_bytes());
    payload.extend_from_slice(&2.5f64.to_le_bytes());
    payload.extend_from_slice(&[0u8; 3]);
    let entry = encode_raw(1, header, &payload);
    let archive = write_archive([("partial.npy", entry.as_slice())]).unwrap();

    let bundle = decode_bundle(&archive).unwrap();
    let partial = bundle.get("partial").unwrap();
    assert_eq!(partial.shape, vec![4]);
    assert_eq!(partial.data, ArrayData::Float64(vec![1.5, 2.5]));
    assert!(partial.is_truncated());

    let summary = analyze_bundle(&archive).unwrap();
    let info = summary.get("partial").unwrap();
    assert_eq!(info.declared_elements, 4);
    assert_eq!(info.available_elements, 2);
    assert!(info.truncated);
}

#[test]
fn test_custom_suffix() {
    let data = encode_array(&DecodedArray::from_vec(vec![1u8, 2], vec![2])).unwrap();
    let archive = write_archive([
        ("a.arr", data.as_slice()),
        ("b.npy", data.as_slice()),
    ])
    .unwrap();
    let config = DecoderConfig {
        entry_suffix: ".arr".to_string(),
        ..DecoderConfig::default()
    };

    let bundle = BundleDecoder::with_config(Arc::new(config))
        .decode(&archive)
        .unwrap();
    assert_eq!(bundle.names(), vec!["a"]);
}

#[test]
fn test_mask_stack_from_bundle() {
    let (archive, _, _) = create_mask_archive();
    let bundle = decode_bundle(&archive).unwrap();

    let masks = to_mask_set(bundle.get("masks").unwrap()).unwrap().into_vec();

    assert_eq!(masks.len(), 3);
    assert_eq!(masks[0], array![[255u8, 0, 0], [0, 255, 0]]);
    assert_eq!(masks[1], array![[0u8, 0, 255], [255, 255, 0]]);
    assert_eq!(masks[2], array![[0u8, 0, 0], [255, 0, 255]]);
}

#[test]
fn test_decoder_masks_use_configured_levels() {
    let (archive, _, _) = create_mask_archive();
    let config = DecoderConfig {
        mask_levels: MaskLevels { low: 0, high: 1 },
        ..DecoderConfig::default()
    };
    let decoder = BundleDecoder::with_config(Arc::new(config));
    let bundle = decoder.decode(&archive).unwrap();

    let masks = decoder.masks(bundle.get("masks").unwrap()).unwrap();
    assert_eq!(masks.len(), 3);
    assert!(masks.into_vec().iter().all(|m| m.iter().all(|&v| v <= 1)));

    // The score vector is rank 1 and cannot become a mask.
    assert!(matches!(
        decoder.masks(bundle.get("scores").unwrap()),
        Err(BundleError::UnsupportedRank(1))
    ));
}

#[test]
fn test_bool_masks_decode_as_u8() {
    let header = "{'descr': '|b1', 'fortran_order': False, 'shape': (1, 2, 2), }";
    let entry = encode_raw(1, header, &[1, 0, 0, 1]);
    let archive = write_archive([("masks.npy", entry.as_slice())]).unwrap();

    let bundle = decode_bundle(&archive).unwrap();
    let masks = bundle.get("masks").unwrap();
    assert_eq!(masks.dtype.code(), "<b1");
    assert_eq!(masks.data, ArrayData::UInt8(vec![1, 0, 0, 1]));

    let set = to_mask_set(masks).unwrap().into_vec();
    assert_eq!(set, vec![array![[255u8, 0], [0, 255]]]);
}

#[test]
fn test_oversized_entry_is_malformed() {
    init_logger();
    let small = encode_array(&DecodedArray::from_vec(vec![1u8, 2], vec![2])).unwrap();
    let large = encode_array(&DecodedArray::from_vec(vec![0u8; 8192], vec![8192])).unwrap();
    let archive = write_archive([
        ("small.npy", small.as_slice()),
        ("large.npy", large.as_slice()),
    ])
    .unwrap();

    let abort = BundleDecoder::with_config(Arc::new(DecoderConfig {
        max_entry_len: 1024,
        ..DecoderConfig::default()
    }));
    match abort.decode(&archive) {
        Err(BundleError::Entry { entry, source }) => {
            assert_eq!(entry, "large");
            assert!(matches!(*source, BundleError::EntryTooLarge { limit: 1024 }));
        }
        other => panic!("Expected an Entry error for 'large', got {:?}", other),
    }

    let skip = BundleDecoder::with_config(Arc::new(DecoderConfig {
        max_entry_len: 1024,
        on_malformed_entry: MalformedEntryPolicy::Skip,
        ..DecoderConfig::default()
    }));
    assert_eq!(skip.decode(&archive).unwrap().names(), vec!["small"]);
    assert_eq!(skip.analyze(&archive).unwrap().skipped, vec!["large".to_string()]);
}

#[test]
fn test_tiny_archive_with_huge_mask_shape_fails_cleanly() {
    init_logger();
    let header = "{'descr': '|u1', 'fortran_order': False, 'shape': (1073741824, 1073741824), }";
    let entry = encode_raw(1, header, &[1, 0, 1, 0]);
    let archive = write_archive([("masks.npy", entry.as_slice())]).unwrap();

    let bundle = decode_bundle(&archive).unwrap();
    let masks = bundle.get("masks").unwrap();
    assert!(masks.is_truncated());

    assert!(matches!(
        to_mask_set(masks),
        Err(BundleError::ShapeMismatch { actual: 4, .. })
    ));
    assert!(matches!(
        BundleDecoder::new().masks(masks),
        Err(BundleError::ShapeMismatch { actual: 4, .. })
    ));
}

#[test]
fn test_decoder_mask_fill_limit_is_configurable() {
    // 2x2x2 declared, 5 present.
    let entry = encode_raw(
        1,
        "{'descr': '<u1', 'fortran_order': False, 'shape': (2, 2, 2), }",
        &[1, 1, 1, 1, 1],
    );
    let archive = write_archive([("masks.npy", entry.as_slice())]).unwrap();
    let strict = BundleDecoder::with_config(Arc::new(DecoderConfig {
        max_mask_fill: 0,
        ..DecoderConfig::default()
    }));

    let bundle = strict.decode(&archive).unwrap();
    let masks = bundle.get("masks").unwrap();
    assert!(matches!(
        strict.masks(masks),
        Err(BundleError::ShapeMismatch {
            expected: 8,
            actual: 5
        })
    ));
    assert_eq!(BundleDecoder::new().masks(masks).unwrap().len(), 2);
}

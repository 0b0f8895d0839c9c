//! Tests for reading and writing sequential record files.

use record_codec::{
    decode, decode_bytes, encode, encode_bytes, CodecError, Endian, Framing, Precision,
    RecordLayout,
};

fn layout(precision: Precision, endian: Endian, framing: Framing) -> RecordLayout {
    RecordLayout::new(precision, endian, framing)
}

// ============================================================================
// Framing tests
// ============================================================================

#[test]
fn test_encode_sequential_layout() {
    let bytes = encode_bytes(&[1.0, 2.0], &RecordLayout::default()).unwrap();
    assert_eq!(bytes.len(), 4 + 8 + 4);
    assert_eq!(&bytes[0..4], &8u32.to_le_bytes());
    assert_eq!(&bytes[4..8], &1.0f32.to_le_bytes());
    assert_eq!(&bytes[12..16], &8u32.to_le_bytes());
}

#[test]
fn test_encode_raw_has_no_markers() {
    let raw = layout(Precision::Single, Endian::Little, Framing::Raw);
    let bytes = encode_bytes(&[1.0, 2.0, 3.0], &raw).unwrap();
    assert_eq!(bytes.len(), 12);
}

#[test]
fn test_big_endian_double_precision() {
    let be = layout(Precision::Double, Endian::Big, Framing::Sequential);
    let bytes = encode_bytes(&[0.5, -4.0], &be).unwrap();
    assert_eq!(&bytes[0..4], &16u32.to_be_bytes());
    assert_eq!(&bytes[4..12], &0.5f64.to_be_bytes());

    let samples = decode_bytes(bytes, &be).unwrap();
    assert_eq!(samples, vec![0.5, -4.0]);
}

#[test]
fn test_auto_framing_detects_sequential() {
    let bytes = encode_bytes(&[7.0, 8.0, 9.0], &RecordLayout::default()).unwrap();
    let auto = layout(Precision::Single, Endian::Little, Framing::Auto);
    assert_eq!(decode_bytes(bytes, &auto).unwrap(), vec![7.0, 8.0, 9.0]);
}

#[test]
fn test_auto_framing_falls_back_to_raw() {
    let raw = layout(Precision::Single, Endian::Little, Framing::Raw);
    let bytes = encode_bytes(&[7.0, 8.0, 9.0], &raw).unwrap();
    let auto = layout(Precision::Single, Endian::Little, Framing::Auto);
    assert_eq!(decode_bytes(bytes, &auto).unwrap(), vec![7.0, 8.0, 9.0]);
}

// ============================================================================
// Malformed input tests
// ============================================================================

#[test]
fn test_truncated_record() {
    let mut bytes = encode_bytes(&[1.0, 2.0, 3.0], &RecordLayout::default()).unwrap();
    bytes.truncate(bytes.len() - 6);
    let err = decode_bytes(bytes, &RecordLayout::default()).unwrap_err();
    assert!(matches!(err, CodecError::Truncated { record: 0, .. }));
}

#[test]
fn test_marker_mismatch() {
    let mut bytes = encode_bytes(&[1.0, 2.0], &RecordLayout::default()).unwrap();
    let n = bytes.len();
    bytes[n - 4..].copy_from_slice(&4u32.to_le_bytes());
    let err = decode_bytes(bytes, &RecordLayout::default()).unwrap_err();
    assert!(matches!(
        err,
        CodecError::MarkerMismatch {
            record: 0,
            leading: 8,
            trailing: 4
        }
    ));
}

#[test]
fn test_record_not_multiple_of_sample_size() {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&6u32.to_le_bytes());
    bytes.extend_from_slice(&[0u8; 6]);
    bytes.extend_from_slice(&6u32.to_le_bytes());
    let err = decode_bytes(bytes, &RecordLayout::default()).unwrap_err();
    assert!(matches!(err, CodecError::RecordSize { bytes: 6, element: 4, .. }));
}

#[test]
fn test_dangling_bytes_after_record() {
    let mut bytes = encode_bytes(&[1.0], &RecordLayout::default()).unwrap();
    bytes.extend_from_slice(&[0u8, 1]);
    let err = decode_bytes(bytes, &RecordLayout::default()).unwrap_err();
    assert!(matches!(err, CodecError::Truncated { record: 1, .. }));
}

#[test]
fn test_raw_stream_size_mismatch() {
    let raw = layout(Precision::Double, Endian::Little, Framing::Raw);
    let err = decode_bytes(vec![0u8; 12], &raw).unwrap_err();
    assert!(matches!(err, CodecError::StreamSize { bytes: 12, element: 8 }));
}

// ============================================================================
// File I/O tests
// ============================================================================

#[test]
fn test_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("proc000000_vs.bin");
    let values: Vec<f32> = (0..1000).map(|i| (i as f32 * 0.01).sin()).collect();

    encode(&path, &values, &RecordLayout::default()).unwrap();
    let decoded = decode(&path, &RecordLayout::default()).unwrap();
    assert_eq!(decoded, values);
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = decode(dir.path().join("absent.bin"), &RecordLayout::default()).unwrap_err();
    assert!(matches!(err, CodecError::Io(_)));
}

use std::collections::HashMap;

use super::*;
use crate::utils::error::JmsError;

#[test]
fn test_every_scalar_type_round_trips() {
    let values = vec![
        Value::Null,
        Value::Boolean(true),
        Value::Byte(-7),
        Value::Char('Z'),
        Value::Short(-300),
        Value::Int(123_456),
        Value::Long(i64::MIN),
        Value::Float(1.5),
        Value::Double(-2.25e10),
        Value::String("héllo wörld".into()),
        Value::Bytes(vec![0, 1, 254, 255]),
    ];
    for value in values {
        let bytes = encode_value(&value).unwrap();
        assert_eq!(bytes[0], value.object_type().tag());
        assert_eq!(decode_value(&bytes).unwrap(), value);
    }
}

#[test]
fn test_scalars_are_big_endian_after_the_tag() {
    assert_eq!(encode_value(&Value::Int(1)).unwrap(), vec![5, 0, 0, 0, 1]);
    assert_eq!(encode_value(&Value::Short(0x0102)).unwrap(), vec![4, 1, 2]);
    assert_eq!(encode_value(&Value::Boolean(true)).unwrap(), vec![1, 1]);
    assert_eq!(encode_value(&Value::Null).unwrap(), vec![0]);
    assert_eq!(
        encode_value(&Value::Float(1.0)).unwrap(),
        vec![7, 0x3F, 0x80, 0x00, 0x00]
    );
    assert_eq!(
        encode_value(&Value::Bytes(vec![9, 8])).unwrap(),
        vec![10, 0, 0, 0, 2, 9, 8]
    );
}

#[test]
fn test_strings_use_modified_utf8() {
    assert_eq!(
        encode_value(&Value::from("A")).unwrap(),
        vec![9, 0, 1, b'A']
    );
    // NUL takes the two-byte form.
    assert_eq!(
        encode_value(&Value::from("\0")).unwrap(),
        vec![9, 0, 2, 0xC0, 0x80]
    );
    // Supplementary characters become two three-byte surrogates.
    let emoji = encode_value(&Value::from("😀")).unwrap();
    assert_eq!(&emoji[..3], &[9, 0, 6]);
    assert_eq!(emoji[3] & 0xF0, 0xE0);
    assert_eq!(decode_value(&emoji).unwrap(), Value::from("😀"));
}

#[test]
fn test_oversized_strings_are_rejected_without_writing() {
    let mut w = WireWriter::new();
    let long = "x".repeat(io::MAX_UTF_LENGTH + 1);
    assert!(matches!(w.write_utf(&long), Err(JmsError::Format(_))));
    assert!(w.is_empty());
}

#[test]
fn test_non_bmp_char_is_a_format_error() {
    assert!(matches!(
        encode_value(&Value::Char('😀')),
        Err(JmsError::Format(_))
    ));
}

#[test]
fn test_lone_surrogate_char_is_a_format_error() {
    assert!(matches!(
        decode_value(&[3, 0xD8, 0x00]),
        Err(JmsError::Format(_))
    ));
}

#[test]
fn test_unknown_tag_is_a_format_error() {
    let err = decode_value(&[11]).unwrap_err();
    assert!(matches!(err, JmsError::Format(_)));
    assert!(!err.is_eof());
}

#[test]
fn test_truncated_value_is_eof() {
    assert!(decode_value(&[5, 0, 0]).unwrap_err().is_eof());
    assert!(decode_value(&[]).unwrap_err().is_eof());
    assert!(decode_value(&[10, 0, 0, 0, 4, 1]).unwrap_err().is_eof());
    assert!(decode_value(&[9, 0, 5, b'a']).unwrap_err().is_eof());
}

#[test]
fn test_negative_byte_array_length_is_a_format_error() {
    assert!(matches!(
        decode_value(&[10, 0xFF, 0xFF, 0xFF, 0xFF]),
        Err(JmsError::Format(_))
    ));
}

#[test]
fn test_map_round_trips_regardless_of_insertion_order() {
    let mut map = HashMap::new();
    map.insert("b".to_string(), Value::Int(2));
    map.insert("a".to_string(), Value::from("one"));
    map.insert("z".to_string(), Value::Null);
    map.insert("bytes".to_string(), Value::Bytes(vec![1, 2, 3]));

    let bytes = encode_map(&map).unwrap();
    assert_eq!(&bytes[..4], &[0, 0, 0, 4]);
    assert_eq!(decode_map(&bytes).unwrap(), map);
}

#[test]
fn test_negative_map_count_is_a_format_error() {
    assert!(matches!(
        decode_map(&[0xFF, 0xFF, 0xFF, 0xFE]),
        Err(JmsError::Format(_))
    ));
}

#[test]
fn test_map_missing_entries_is_eof() {
    // Claims two entries, carries one.
    let mut w = WireWriter::new();
    w.write_i32(2);
    w.write_utf("k").unwrap();
    write_value(&mut w, &Value::Int(1)).unwrap();
    assert!(decode_map(w.as_slice()).unwrap_err().is_eof());
}

#[test]
fn test_reader_does_not_advance_on_eof() {
    let data = [0u8, 1, 2];
    let mut r = WireReader::new(&data);
    assert!(r.read_i32().unwrap_err().is_eof());
    assert_eq!(r.position(), 0);
    assert_eq!(r.read_u16().unwrap(), 1);
}

#[test]
fn test_short_reads_leave_every_width_unconsumed() {
    let data = [0x3Fu8, 0x80, 0x00];
    let mut r = WireReader::new(&data);
    assert!(r.read_i64().unwrap_err().is_eof());
    assert!(r.read_f64().unwrap_err().is_eof());
    assert!(r.read_f32().unwrap_err().is_eof());
    assert!(r.read_exact(4).unwrap_err().is_eof());
    assert_eq!(r.position(), 0);
    assert_eq!(r.remaining(), 3);

    // a length prefix promising more than is there rewinds past the prefix too
    let mut r = WireReader::new(&[0x00, 0x05, b'a', b'b']);
    assert!(r.read_utf().unwrap_err().is_eof());
    assert_eq!(r.position(), 0);

    let mut r = WireReader::new(&data);
    r.seek(1);
    assert_eq!(r.read_u16().unwrap(), 0x8000);
    assert!(r.is_exhausted());
    r.seek(10);
    assert_eq!(r.position(), 3);
}

#[test]
fn test_writer_lays_out_big_endian_bit_patterns() {
    let mut w = WireWriter::new();
    w.write_i16(-2);
    w.write_f32(1.0);
    w.write_char('A').unwrap();
    w.write_utf("\0").unwrap();
    assert_eq!(
        w.as_slice(),
        &[0xFF, 0xFE, 0x3F, 0x80, 0x00, 0x00, 0x00, 0x41, 0x00, 0x02, 0xC0, 0x80]
    );
    assert_eq!(w.len(), 12);
    assert_eq!(w.into_inner().len(), 12);
}

#[test]
fn test_read_into_reports_end_of_data() {
    let data = [1u8, 2, 3];
    let mut r = WireReader::new(&data);
    let mut buf = [0u8; 2];
    assert_eq!(r.read_into(&mut buf), Some(2));
    assert_eq!(r.read_into(&mut buf), Some(1));
    assert_eq!(buf[0], 3);
    assert_eq!(r.read_into(&mut buf), None);
    assert_eq!(r.read_into(&mut []), Some(0));
}

#[test]
fn test_malformed_utf8_is_a_format_error() {
    assert!(matches!(
        io::decode_modified_utf8(&[0xC0]),
        Err(JmsError::Format(_))
    ));
    assert!(matches!(
        io::decode_modified_utf8(&[0xF8, 0x80]),
        Err(JmsError::Format(_))
    ));
}

use pbj_runtime::field::WireType;
use pbj_runtime::io::BufferedData;
use pbj_runtime::io::SequentialData;
use pbj_runtime::io::WritableSequentialData;
use pbj_runtime::size;
use pbj_runtime::varint::*;
use pbj_runtime::{MalformedProtobufReason, ProtobufError};

fn roundtrip_varint(value: u64) {
    let mut buf = BufferedData::with_capacity(16);
    write_varint64(&mut buf, value).unwrap();
    let written = buf.position();
    assert_eq!(written, size::size_of_varint64(value) as u64);
    let mut reader = BufferedData::wrap(buf.into_vec());
    let got = read_varint64(&mut reader).unwrap();
    assert_eq!(got, value);
}

#[test]
fn varint_roundtrip_small_and_large() {
    for v in [0u64, 1, 127, 128, 300, u32::MAX as u64, u64::MAX] {
        roundtrip_varint(v);
    }
}

#[test]
fn varint_too_long_fails() {
    // 10 bytes, every one with the continuation bit set: never terminates.
    let bytes = vec![0xffu8; 10];
    let mut reader = BufferedData::wrap(bytes);
    let err = read_varint64(&mut reader).unwrap_err();
    match err {
        ProtobufError::MalformedProtobuf(MalformedProtobufReason::VarintTooLong) => {}
        other => panic!("expected VarintTooLong, got {:?}", other),
    }
}

#[test]
fn zigzag_roundtrip() {
    for v in [0i64, -1, 1, i32::MIN as i64, i32::MAX as i64, i64::MIN, i64::MAX] {
        let encoded = zigzag_encode64(v);
        assert_eq!(zigzag_decode64(encoded), v);
    }
    // Small magnitudes, positive or negative, encode short.
    assert_eq!(zigzag_encode64(-1), 1);
    assert_eq!(zigzag_encode64(1), 2);
}

#[test]
fn fixed_width_roundtrip() {
    let mut buf = BufferedData::with_capacity(16);
    write_fixed32(&mut buf, 0xdeadbeef).unwrap();
    write_fixed64(&mut buf, 0x0102030405060708).unwrap();
    let mut reader = BufferedData::wrap(buf.into_vec());
    assert_eq!(read_fixed32(&mut reader).unwrap(), 0xdeadbeef);
    assert_eq!(read_fixed64(&mut reader).unwrap(), 0x0102030405060708);
}

#[test]
fn tag_roundtrip_and_rejects_zero_field_number() {
    let mut buf = BufferedData::with_capacity(16);
    write_tag(&mut buf, 5, WireType::LengthDelimited).unwrap();
    let mut reader = BufferedData::wrap(buf.into_vec());
    let (field_number, wire_type) = read_tag(&mut reader).unwrap();
    assert_eq!(field_number, 5);
    assert_eq!(wire_type, WireType::LengthDelimited);

    // field number 0, wire type 2 -> tag value 2
    let mut zero_field = BufferedData::wrap(vec![0x02]);
    let err = read_tag(&mut zero_field).unwrap_err();
    assert!(matches!(
        err,
        ProtobufError::MalformedProtobuf(MalformedProtobufReason::ZeroFieldNumber)
    ));
}

#[test]
fn tag_rejects_legacy_group_wire_types() {
    // field 1, wire type 3 (start group) -> tag value (1<<3)|3 = 11
    let mut buf = BufferedData::wrap(vec![11]);
    let err = read_tag(&mut buf).unwrap_err();
    assert!(matches!(
        err,
        ProtobufError::MalformedProtobuf(MalformedProtobufReason::InvalidWireType(3))
    ));
}

#[test]
fn string_roundtrip_rejects_invalid_utf8() {
    let mut buf = BufferedData::with_capacity(16);
    buf.write_bytes(&[0xff, 0xfe]).unwrap();
    let mut reader = BufferedData::wrap(buf.into_vec());
    let err = read_string(&mut reader, 2).unwrap_err();
    assert!(matches!(
        err,
        ProtobufError::MalformedProtobuf(MalformedProtobufReason::InvalidUtf8)
    ));
}

#[test]
fn negative_int32_encodes_as_ten_byte_varint() {
    // A negative int32 is sign-extended to 64 bits before varint encoding,
    // so it always takes the full 10 bytes.
    let mut buf = BufferedData::with_capacity(16);
    write_tag(&mut buf, 1, WireType::Varint).unwrap();
    write_varint64(&mut buf, -5i64 as u64).unwrap();
    let bytes = buf.into_vec();
    assert_eq!(bytes[0], 0x08);
    assert_eq!(bytes.len(), 1 + 10);
}

#[test]
fn packed_repeated_int32_matches_unpacked_list() {
    let values = [1i64, 2, 3];
    let mut packed_body = BufferedData::with_capacity(16);
    for &v in &values {
        write_varint64(&mut packed_body, v as u64).unwrap();
    }
    let packed_bytes = packed_body.into_vec();
    assert_eq!(packed_bytes, vec![1, 2, 3]);

    let mut packed_field = BufferedData::with_capacity(16);
    write_tag(&mut packed_field, 1, WireType::LengthDelimited).unwrap();
    write_varint64(&mut packed_field, packed_bytes.len() as u64).unwrap();
    packed_field.write_bytes(&packed_bytes).unwrap();
    let wire = packed_field.into_vec();
    assert_eq!(wire, vec![0x0a, 3, 1, 2, 3]);

    // Unpacked equivalent: three tag+value pairs, same field number,
    // varint wire type.
    let mut unpacked = BufferedData::with_capacity(16);
    for &v in &values {
        write_tag(&mut unpacked, 1, WireType::Varint).unwrap();
        write_varint64(&mut unpacked, v as u64).unwrap();
    }
    let unpacked_wire = unpacked.into_vec();
    assert_eq!(unpacked_wire, vec![0x08, 1, 0x08, 2, 0x08, 3]);

    // Both decode to the same list of values when read back.
    let mut reader = BufferedData::wrap(wire);
    let (fnum, wt) = read_tag(&mut reader).unwrap();
    assert_eq!((fnum, wt), (1, WireType::LengthDelimited));
    let len = read_varint64(&mut reader).unwrap();
    let limit = reader.push_limit(len).unwrap();
    let mut decoded = Vec::new();
    while reader.has_remaining() {
        decoded.push(read_varint64(&mut reader).unwrap() as i64);
    }
    reader.pop_limit(limit);
    assert_eq!(decoded, values);

    let mut reader2 = BufferedData::wrap(unpacked_wire);
    let mut decoded2 = Vec::new();
    while reader2.has_remaining() {
        let (fnum, wt) = read_tag(&mut reader2).unwrap();
        assert_eq!((fnum, wt), (1, WireType::Varint));
        decoded2.push(read_varint64(&mut reader2).unwrap() as i64);
    }
    assert_eq!(decoded2, values);
}

#[test]
fn skip_field_consumes_exact_bytes_for_every_wire_type() {
    let mut buf = BufferedData::with_capacity(64);
    write_varint64(&mut buf, 1234).unwrap();
    write_fixed64(&mut buf, 0xaaaaaaaaaaaaaaaa).unwrap();
    write_fixed32(&mut buf, 0xbbbbbbbb).unwrap();
    write_varint64(&mut buf, 3).unwrap();
    buf.write_bytes(&[1, 2, 3]).unwrap();
    let bytes = buf.into_vec();
    let total_len = bytes.len() as u64;

    let mut reader = BufferedData::wrap(bytes);
    skip_field(&mut reader, WireType::Varint).unwrap();
    skip_field(&mut reader, WireType::Fixed64).unwrap();
    skip_field(&mut reader, WireType::Fixed32).unwrap();
    skip_field(&mut reader, WireType::LengthDelimited).unwrap();
    assert_eq!(reader.position(), total_len);
}

#[test]
fn read_string_rejects_declared_length_past_remaining_bytes_without_allocating() {
    // A declared length far larger than what's actually buffered must fail
    // bounded against `remaining()`, not attempt a multi-gigabyte allocation.
    let mut buf = BufferedData::with_capacity(16);
    buf.write_bytes(&[b'h', b'i']).unwrap();
    let mut reader = BufferedData::wrap(buf.into_vec());
    let err = read_string(&mut reader, 4 * 1024 * 1024 * 1024).unwrap_err();
    assert!(matches!(
        err,
        ProtobufError::MalformedProtobuf(MalformedProtobufReason::TruncatedLengthDelimited { .. })
    ));
}

#[test]
fn skip_field_rejects_packed_length_past_remaining_bytes() {
    let mut buf = BufferedData::with_capacity(16);
    write_varint64(&mut buf, 100).unwrap(); // declares 100 bytes, none follow
    let mut reader = BufferedData::wrap(buf.into_vec());
    let err = skip_field(&mut reader, WireType::LengthDelimited).unwrap_err();
    assert!(matches!(
        err,
        ProtobufError::MalformedProtobuf(MalformedProtobufReason::TruncatedLengthDelimited { .. })
    ));
}

//! Size measurement functions.
//!
//! Every function here returns the exact byte count that the matching
//! `write_*` call in [`crate::varint`] would produce. The size-then-write
//! pair is the load-bearing invariant of the whole codec: `measure(x) ==
//! length(write(x))` must hold for every value.

use crate::field::WireType;

/// Bytes a varint-encoded `u64` occupies: 7 bits per byte, continuation
/// bit aside.
pub fn size_of_varint64(value: u64) -> u32 {
    let mut value = value;
    let mut size = 1;
    while value >= 0x80 {
        value >>= 7;
        size += 1;
    }
    size
}

/// Separate from [`size_of_varint64`]: 32-bit varints never
/// exceed 5 bytes, but a negative `i32` stored as a plain (non-zigzag)
/// varint sign-extends to 64 bits on the wire and so must be measured
/// with the 64-bit function. This function is for values already known
/// to be unsigned 32-bit.
pub fn size_of_varint32(value: u32) -> u32 {
    size_of_varint64(value as u64)
}

/// Size of a possibly-negative `int32`/`int64` field: sign-extended to 64
/// bits before varint measurement, matching how `write_varint32`/
/// `write_varint64` encode a negative value on the wire.
pub fn size_of_int32(value: i32) -> u32 {
    size_of_varint64(value as i64 as u64)
}

pub fn size_of_int64(value: i64) -> u32 {
    size_of_varint64(value as u64)
}

pub fn size_of_zigzag32(value: i32) -> u32 {
    size_of_varint32(crate::varint::zigzag_encode32(value))
}

pub fn size_of_zigzag64(value: i64) -> u32 {
    size_of_varint64(crate::varint::zigzag_encode64(value))
}

pub fn size_of_tag(field_number: u32, wire_type: WireType) -> u32 {
    let tag = ((field_number as u64) << 3) | wire_type.as_u8() as u64;
    size_of_varint64(tag)
}

pub fn size_of_fixed32() -> u32 {
    4
}

pub fn size_of_fixed64() -> u32 {
    8
}

pub fn size_of_bytes(bytes: &[u8]) -> u32 {
    let len = bytes.len() as u32;
    size_of_varint32(len) + len
}

pub fn size_of_string(s: &str) -> u32 {
    size_of_bytes(s.as_bytes())
}

/// Size of a sub-message field's tag + length-prefix + body, given the
/// already-measured size of the body.
pub fn size_of_message(body_size: u32) -> u32 {
    size_of_varint32(body_size) + body_size
}

/// Size of a packed-repeated field: tag + varint length + concatenated
/// element bytes, given the pre-summed element byte count.
pub fn size_of_packed_list(field_number: u32, packed_body_size: u32) -> u32 {
    size_of_tag(field_number, WireType::LengthDelimited) + size_of_varint32(packed_body_size) + packed_body_size
}

/// Whether a scalar numeric/bool/string/bytes value at its canonical
/// default should be elided from the wire. Strings that are empty or
/// all-whitespace, and zero-length
/// byte fields, are elided the same way.
pub fn is_default_string(s: &str) -> bool {
    s.trim().is_empty()
}

pub fn is_default_bytes(b: &[u8]) -> bool {
    b.is_empty()
}

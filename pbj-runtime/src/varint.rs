//! Varint, zigzag, fixed-width, and tag codec primitives.
//!
//! Every function here takes a [`ReadableSequentialData`]/
//! [`WritableSequentialData`] rather than a concrete type, so the same
//! code serves `BufferedData` and the streaming adapters alike.

use crate::error::MalformedProtobufReason;
use crate::error::ProtobufError;
use crate::error::ProtobufResult;
use crate::field::WireType;
use crate::io::ReadableSequentialData;
use crate::io::WritableSequentialData;

const MAX_VARINT_BYTES: u32 = 10;

/// Reads an unsigned LEB128 varint. Consumes up to 10 bytes; fails
/// if the 10th byte still has its continuation bit set.
pub fn read_varint64(input: &mut dyn ReadableSequentialData) -> ProtobufResult<u64> {
    let mut result: u64 = 0;
    for i in 0..MAX_VARINT_BYTES {
        let b = input.read_byte()?;
        if i == MAX_VARINT_BYTES - 1 && (b & 0x80) != 0 {
            return Err(ProtobufError::malformed(MalformedProtobufReason::VarintTooLong));
        }
        result |= ((b & 0x7f) as u64) << (7 * i);
        if b & 0x80 == 0 {
            return Ok(result);
        }
    }
    Err(ProtobufError::malformed(MalformedProtobufReason::VarintTooLong))
}

/// Same as [`read_varint64`] truncated to 32 bits, matching the reference
/// implementation's behavior of silently discarding the unused high bits
/// of an over-long 32-bit varint.
pub fn read_varint32(input: &mut dyn ReadableSequentialData) -> ProtobufResult<u32> {
    Ok(read_varint64(input)? as u32)
}

/// Writes an unsigned LEB128 varint: base-128 little-endian, continuation bit set
/// on every byte but the last.
pub fn write_varint64(output: &mut dyn WritableSequentialData, mut value: u64) -> ProtobufResult<()> {
    loop {
        let byte = (value & 0x7f) as u8;
        value >>= 7;
        if value == 0 {
            output.write_byte(byte)?;
            return Ok(());
        } else {
            output.write_byte(byte | 0x80)?;
        }
    }
}

pub fn write_varint32(output: &mut dyn WritableSequentialData, value: u32) -> ProtobufResult<()> {
    write_varint64(output, value as u64)
}

/// ZigZag: `(n << 1) ^ (n >> 63)` so small magnitudes (positive or
/// negative) encode short (spec glossary).
pub fn zigzag_encode64(n: i64) -> u64 {
    ((n << 1) ^ (n >> 63)) as u64
}

pub fn zigzag_decode64(v: u64) -> i64 {
    ((v >> 1) as i64) ^ -((v & 1) as i64)
}

pub fn zigzag_encode32(n: i32) -> u32 {
    ((n << 1) ^ (n >> 31)) as u32
}

pub fn zigzag_decode32(v: u32) -> i32 {
    ((v >> 1) as i32) ^ -((v & 1) as i32)
}

pub fn read_zigzag64(input: &mut dyn ReadableSequentialData) -> ProtobufResult<i64> {
    Ok(zigzag_decode64(read_varint64(input)?))
}

pub fn write_zigzag64(output: &mut dyn WritableSequentialData, value: i64) -> ProtobufResult<()> {
    write_varint64(output, zigzag_encode64(value))
}

pub fn read_zigzag32(input: &mut dyn ReadableSequentialData) -> ProtobufResult<i32> {
    Ok(zigzag_decode32(read_varint32(input)?))
}

pub fn write_zigzag32(output: &mut dyn WritableSequentialData, value: i32) -> ProtobufResult<()> {
    write_varint32(output, zigzag_encode32(value))
}

/// Little-endian fixed-width reads/writes.
pub fn read_fixed32(input: &mut dyn ReadableSequentialData) -> ProtobufResult<u32> {
    let mut buf = [0u8; 4];
    input.read_exact(&mut buf)?;
    Ok(u32::from_le_bytes(buf))
}

pub fn write_fixed32(output: &mut dyn WritableSequentialData, value: u32) -> ProtobufResult<()> {
    output.write_bytes(&value.to_le_bytes())
}

pub fn read_fixed64(input: &mut dyn ReadableSequentialData) -> ProtobufResult<u64> {
    let mut buf = [0u8; 8];
    input.read_exact(&mut buf)?;
    Ok(u64::from_le_bytes(buf))
}

pub fn write_fixed64(output: &mut dyn WritableSequentialData, value: u64) -> ProtobufResult<()> {
    output.write_bytes(&value.to_le_bytes())
}

/// Reads `length` bytes and validates them as UTF-8 eagerly, on every read.
pub fn read_string(input: &mut dyn ReadableSequentialData, length: usize) -> ProtobufResult<String> {
    let bytes = input.read_vec(length)?;
    String::from_utf8(bytes)
        .map_err(|_| ProtobufError::malformed(MalformedProtobufReason::InvalidUtf8))
}

/// Reads a tag and splits it into `(fieldNumber, wireType)`. Rejects
/// `fieldNumber == 0` and `wireType > 5`; wire types 3 and 4 (legacy
/// groups) are rejected by [`WireType::from_u8`] returning `None`, which
/// this function turns into `InvalidWireType`.
pub fn read_tag(input: &mut dyn ReadableSequentialData) -> ProtobufResult<(u32, WireType)> {
    let tag = read_varint64(input)?;
    let field_number = (tag >> 3) as u32;
    let wire_type_raw = (tag & 0b111) as u8;
    if field_number == 0 {
        return Err(ProtobufError::malformed(MalformedProtobufReason::ZeroFieldNumber));
    }
    let wire_type = WireType::from_u8(wire_type_raw)
        .ok_or_else(|| ProtobufError::malformed(MalformedProtobufReason::InvalidWireType(wire_type_raw)))?;
    Ok((field_number, wire_type))
}

/// Writes a tag: `(fieldNumber << 3) | wireType` as a varint.
pub fn write_tag(
    output: &mut dyn WritableSequentialData,
    field_number: u32,
    wire_type: WireType,
) -> ProtobufResult<()> {
    let tag = ((field_number as u64) << 3) | wire_type.as_u8() as u64;
    write_varint64(output, tag)
}

/// Consumes exactly the bytes of a field of the given wire type, without
/// materializing them. Every length prefix is bounded against the
/// remaining readable bytes before any allocation.
pub fn skip_field(input: &mut dyn ReadableSequentialData, wire_type: WireType) -> ProtobufResult<()> {
    match wire_type {
        WireType::Varint => {
            read_varint64(input)?;
            Ok(())
        }
        WireType::Fixed64 => input.skip_n_bytes(8),
        WireType::Fixed32 => input.skip_n_bytes(4),
        WireType::LengthDelimited => {
            let len = read_varint64(input)?;
            if len > input.remaining() {
                return Err(ProtobufError::malformed(
                    MalformedProtobufReason::TruncatedLengthDelimited {
                        declared: len as usize,
                        remaining: input.remaining() as usize,
                    },
                ));
            }
            input.skip_n_bytes(len)
        }
    }
}

//! The `google.protobuf.*Value` wrapper messages used to carry a
//! proto3 `optional` scalar field's "explicitly present, even at the
//! default value" semantics on the wire. Narrowed to just the nine
//! scalar wrappers this compiler needs to recognize for `optional`
//! field emission.

use pbj_runtime::field::FieldType;

/// Returns the wrapper message name (e.g. `Int32Value`) an `optional`
/// field of this scalar type is encoded through, or `None` for types
/// that cannot appear in an `optional` declaration (message/enum/
/// bytes/string already support presence natively via their own
/// wrapper or nullability and are handled elsewhere).
pub fn wrapper_type_name(field_type: FieldType) -> Option<&'static str> {
    Some(match field_type {
        FieldType::Double => "DoubleValue",
        FieldType::Float => "FloatValue",
        FieldType::Int32 | FieldType::Sint32 | FieldType::Sfixed32 => "Int32Value",
        FieldType::Int64 | FieldType::Sint64 | FieldType::Sfixed64 => "Int64Value",
        FieldType::Uint32 | FieldType::Fixed32 => "UInt32Value",
        FieldType::Uint64 | FieldType::Fixed64 => "UInt64Value",
        FieldType::Bool => "BoolValue",
        FieldType::String => "StringValue",
        FieldType::Bytes => "BytesValue",
        FieldType::Enum | FieldType::Message => return None,
    })
}

/// The field number a wrapper message's single `value` field always
/// carries on the wire (every wrapper in `wrappers.proto` declares it
/// as field 1).
pub const WRAPPER_VALUE_FIELD_NUMBER: u32 = 1;

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn maps_signed_and_unsigned_variants_to_their_wrapper() {
        assert_eq!(wrapper_type_name(FieldType::Int32), Some("Int32Value"));
        assert_eq!(wrapper_type_name(FieldType::Sint32), Some("Int32Value"));
        assert_eq!(wrapper_type_name(FieldType::Uint64), Some("UInt64Value"));
    }

    #[test]
    fn message_and_enum_have_no_wrapper() {
        assert_eq!(wrapper_type_name(FieldType::Message), None);
        assert_eq!(wrapper_type_name(FieldType::Enum), None);
    }
}

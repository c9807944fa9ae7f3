//! Maps a resolved field type to the Rust type its model-emitted
//! struct field carries.

use pbj_runtime::field::FieldType;

use crate::naming::fqn_to_rust_path;

/// A field's type once cross-file resolution has run: either a scalar
/// (already concrete) or a named message/enum resolved to its fully
/// qualified `.pkg.Name` path.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedFieldType {
    Scalar(FieldType),
    Message(String),
    Enum(String),
}

impl ResolvedFieldType {
    /// The bare Rust type this field holds, ignoring `repeated`/
    /// `optional` wrapping (callers apply `Vec<_>`/`Option<_>`
    /// themselves, since both can apply independently).
    pub fn base_rust_type(&self) -> String {
        match self {
            ResolvedFieldType::Scalar(t) => scalar_rust_type(*t).to_owned(),
            ResolvedFieldType::Message(fqn) => fqn_to_rust_path(fqn),
            ResolvedFieldType::Enum(fqn) => fqn_to_rust_path(fqn),
        }
    }

    pub fn is_message(&self) -> bool {
        matches!(self, ResolvedFieldType::Message(_))
    }

    pub fn is_enum(&self) -> bool {
        matches!(self, ResolvedFieldType::Enum(_))
    }
}

pub fn scalar_rust_type(field_type: FieldType) -> &'static str {
    match field_type {
        FieldType::Double => "f64",
        FieldType::Float => "f32",
        FieldType::Int32 | FieldType::Sint32 | FieldType::Sfixed32 => "i32",
        FieldType::Int64 | FieldType::Sint64 | FieldType::Sfixed64 => "i64",
        FieldType::Uint32 | FieldType::Fixed32 => "u32",
        FieldType::Uint64 | FieldType::Fixed64 => "u64",
        FieldType::Bool => "bool",
        FieldType::String => "String",
        FieldType::Bytes => "pbj_runtime::Bytes",
        FieldType::Enum | FieldType::Message => {
            panic!("scalar_rust_type called on a non-scalar FieldType")
        }
    }
}

/// A field's full declared Rust type, honoring `repeated` (`Vec<T>`)
/// and `optional` (`Option<T>`); the two are mutually exclusive with
/// `one_of` membership at the model level (a oneof variant's "optional"
/// quality is the variant itself being absent from the enum).
pub fn declared_rust_type(resolved: &ResolvedFieldType, repeated: bool, optional: bool) -> String {
    let base = resolved.base_rust_type();
    if repeated {
        format!("Vec<{}>", base)
    } else if optional || resolved.is_message() {
        // Message fields are always nullable on the wire (proto3 has no
        // default-instance sentinel the way scalars do), so every
        // singular message field is `Option<T>` regardless of an
        // explicit `optional` keyword.
        format!("Option<{}>", base)
    } else {
        base
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn repeated_wraps_in_vec() {
        let t = ResolvedFieldType::Scalar(FieldType::Int32);
        assert_eq!(declared_rust_type(&t, true, false), "Vec<i32>");
    }

    #[test]
    fn optional_scalar_wraps_in_option() {
        let t = ResolvedFieldType::Scalar(FieldType::String);
        assert_eq!(declared_rust_type(&t, false, true), "Option<String>");
    }

    #[test]
    fn message_field_is_always_optional() {
        let t = ResolvedFieldType::Message(".example.Account".to_owned());
        assert_eq!(declared_rust_type(&t, false, false), "Option<example::Account>");
    }

    #[test]
    fn plain_scalar_is_unwrapped() {
        let t = ResolvedFieldType::Scalar(FieldType::Bool);
        assert_eq!(declared_rust_type(&t, false, false), "bool");
    }
}

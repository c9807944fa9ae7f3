use std::fmt;

/// Wire type, the low 3 bits of a tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum WireType {
    Varint = 0,
    Fixed64 = 1,
    LengthDelimited = 2,
    Fixed32 = 5,
}

impl WireType {
    pub fn from_u8(v: u8) -> Option<WireType> {
        match v {
            0 => Some(WireType::Varint),
            1 => Some(WireType::Fixed64),
            2 => Some(WireType::LengthDelimited),
            5 => Some(WireType::Fixed32),
            _ => None,
        }
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

/// The closed set of protobuf 3 scalar/message field types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Double,
    Float,
    Int32,
    Int64,
    Uint32,
    Uint64,
    Sint32,
    Sint64,
    Fixed32,
    Fixed64,
    Sfixed32,
    Sfixed64,
    Bool,
    String,
    Bytes,
    Enum,
    Message,
}

impl FieldType {
    /// Canonical wire type used to encode a scalar value of this type.
    /// For `String`/`Bytes`/`Message` this is also the wire type used for
    /// the length-delimited payload; for packed-repeated numeric fields
    /// the *outer* tag uses `LengthDelimited` regardless of this value.
    pub fn wire_type(self) -> WireType {
        match self {
            FieldType::Double | FieldType::Fixed64 | FieldType::Sfixed64 => WireType::Fixed64,
            FieldType::Float | FieldType::Fixed32 | FieldType::Sfixed32 => WireType::Fixed32,
            FieldType::String | FieldType::Bytes | FieldType::Message => {
                WireType::LengthDelimited
            }
            FieldType::Int32
            | FieldType::Int64
            | FieldType::Uint32
            | FieldType::Uint64
            | FieldType::Sint32
            | FieldType::Sint64
            | FieldType::Bool
            | FieldType::Enum => WireType::Varint,
        }
    }

    /// True for the numeric/bool/enum types that may be packed when
    /// repeated.
    pub fn is_packable(self) -> bool {
        !matches!(self, FieldType::String | FieldType::Bytes | FieldType::Message)
    }

    /// One of the eight well-known optional-wrapper primitives that this
    /// field type would use when declared `optional`.
    pub fn wrapper_type_name(self) -> Option<&'static str> {
        Some(match self {
            FieldType::Int32 => "Int32Value",
            FieldType::Uint32 => "UInt32Value",
            FieldType::Int64 => "Int64Value",
            FieldType::Uint64 => "UInt64Value",
            FieldType::Float => "FloatValue",
            FieldType::Double => "DoubleValue",
            FieldType::Bool => "BoolValue",
            FieldType::String => "StringValue",
            FieldType::Bytes => "BytesValue",
            _ => return None,
        })
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldType::Double => "double",
            FieldType::Float => "float",
            FieldType::Int32 => "int32",
            FieldType::Int64 => "int64",
            FieldType::Uint32 => "uint32",
            FieldType::Uint64 => "uint64",
            FieldType::Sint32 => "sint32",
            FieldType::Sint64 => "sint64",
            FieldType::Fixed32 => "fixed32",
            FieldType::Fixed64 => "fixed64",
            FieldType::Sfixed32 => "sfixed32",
            FieldType::Sfixed64 => "sfixed64",
            FieldType::Bool => "bool",
            FieldType::String => "string",
            FieldType::Bytes => "bytes",
            FieldType::Enum => "enum",
            FieldType::Message => "message",
        };
        write!(f, "{}", name)
    }
}

/// An immutable `(name, type, repeated, optional, oneOf, fieldNumber)`
/// tuple. Constructed only via [`FieldDefinition::new`], which
/// enforces the cross-field invariants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDefinition {
    name: String,
    field_type: FieldType,
    repeated: bool,
    optional: bool,
    one_of: Option<String>,
    field_number: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldDefinitionError {
    EmptyName,
    ZeroFieldNumber,
    RepeatedAndOneOf,
}

impl fmt::Display for FieldDefinitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldDefinitionError::EmptyName => write!(f, "field name must not be empty"),
            FieldDefinitionError::ZeroFieldNumber => {
                write!(f, "field number must be >= 1")
            }
            FieldDefinitionError::RepeatedAndOneOf => {
                write!(f, "a field cannot be both repeated and part of a oneof")
            }
        }
    }
}

impl FieldDefinition {
    pub fn new(
        name: impl Into<String>,
        field_type: FieldType,
        repeated: bool,
        optional: bool,
        one_of: Option<String>,
        field_number: u32,
    ) -> Result<FieldDefinition, FieldDefinitionError> {
        let name = name.into();
        if name.is_empty() {
            return Err(FieldDefinitionError::EmptyName);
        }
        if field_number < 1 {
            return Err(FieldDefinitionError::ZeroFieldNumber);
        }
        if repeated && one_of.is_some() {
            return Err(FieldDefinitionError::RepeatedAndOneOf);
        }
        Ok(FieldDefinition {
            name,
            field_type,
            repeated,
            optional,
            one_of,
            field_number,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn field_type(&self) -> FieldType {
        self.field_type
    }

    pub fn repeated(&self) -> bool {
        self.repeated
    }

    pub fn optional(&self) -> bool {
        self.optional
    }

    pub fn one_of(&self) -> Option<&str> {
        self.one_of.as_deref()
    }

    pub fn field_number(&self) -> u32 {
        self.field_number
    }

    pub fn tag_value(&self, wire_type: WireType) -> u64 {
        ((self.field_number as u64) << 3) | wire_type.as_u8() as u64
    }
}

/// A `const`-constructible field descriptor, used by generated
/// per-message schema tables (`pub const FIELD_X: RawFieldInfo = ...`)
/// where a runtime-validated [`FieldDefinition`] cannot appear in const
/// position. `one_of` is tracked separately by the generated oneof
/// enum rather than carried here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawFieldInfo {
    pub name: &'static str,
    pub field_type: FieldType,
    pub repeated: bool,
    pub field_number: u32,
}

impl RawFieldInfo {
    pub fn to_field_definition(&self) -> FieldDefinition {
        FieldDefinition::new(self.name, self.field_type, self.repeated, false, None, self.field_number)
            .expect("generated RawFieldInfo must satisfy FieldDefinition::new's invariants")
    }
}

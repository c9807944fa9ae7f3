//! The in-memory Protobuf 3 schema model: `FileDescriptor` / `Message` /
//! `Field` / `Enumeration`, narrowed to the proto3-only,
//! no-groups-or-extensions subset this compiler accepts.

use std::path::PathBuf;

use pbj_runtime::field::FieldType as ScalarType;

use crate::lexer::Loc;

/// A field's declared type before cross-file resolution. Scalars are
/// already concrete; `Named` is an unqualified or partially-qualified
/// reference to a message or enum, resolved in a later pass.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldTypeRef {
    Scalar(ScalarType),
    Named(String),
}

impl FieldTypeRef {
    pub fn is_scalar(&self) -> bool {
        matches!(self, FieldTypeRef::Scalar(_))
    }
}

/// A single field declaration. `one_of` is
/// `Some(name)` for a variant nested inside a `oneof` block.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub ty: FieldTypeRef,
    pub repeated: bool,
    pub optional: bool,
    pub one_of: Option<String>,
    pub number: u32,
    pub loc: Loc,
}

/// A `oneof` block: a name plus its variant fields, each carrying a back
/// reference to this oneof's name via `Field::one_of`. Field numbers are
/// unique within the message, checked at resolve time.
#[derive(Debug, Clone, PartialEq)]
pub struct OneOf {
    pub name: String,
    pub variants: Vec<Field>,
    pub loc: Loc,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldOrOneOf {
    Field(Field),
    OneOf(OneOf),
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumValue {
    pub name: String,
    pub number: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Enum {
    pub name: String,
    pub values: Vec<EnumValue>,
    pub loc: Loc,
}

impl Enum {
    /// `fromOrdinal` lookup used by the generated enum type.
    pub fn value_by_number(&self, number: i32) -> Option<&EnumValue> {
        self.values.iter().find(|v| v.number == number)
    }
}

/// A protobuf message. Field numbers are
/// unique; nested names are unique within scope (checked at resolve
/// time).
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub name: String,
    pub fields: Vec<FieldOrOneOf>,
    pub nested_messages: Vec<Message>,
    pub nested_enums: Vec<Enum>,
    /// `pbj.comparable = "f1, f2, ..."` directive, if present, in
    /// declaration order.
    pub comparable: Option<Vec<String>>,
    pub loc: Loc,
}

impl Message {
    pub fn all_fields(&self) -> Vec<&Field> {
        self.fields
            .iter()
            .flat_map(|fo| match fo {
                FieldOrOneOf::Field(f) => vec![f],
                FieldOrOneOf::OneOf(o) => o.variants.iter().collect(),
            })
            .collect()
    }

    pub fn oneofs(&self) -> Vec<&OneOf> {
        self.fields
            .iter()
            .filter_map(|fo| match fo {
                FieldOrOneOf::OneOf(o) => Some(o),
                _ => None,
            })
            .collect()
    }

    pub fn field_by_name(&self, name: &str) -> Option<&Field> {
        self.all_fields().into_iter().find(|f| f.name == name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Method {
    pub name: String,
    pub input_type: String,
    pub output_type: String,
}

/// Parsed but never emitted: service/gRPC generation is out of scope.
/// Kept on the model purely so the parser accepts the grammar
/// production the `.proto` language requires.
#[derive(Debug, Clone, PartialEq)]
pub struct Service {
    pub name: String,
    pub methods: Vec<Method>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Syntax {
    Proto3,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Import {
    pub path: String,
    pub public: bool,
}

/// A parsed `.proto` file.
#[derive(Debug, Clone, PartialEq)]
pub struct FileDescriptor {
    /// Normalized path this file was read from, used for import matching
    /// and error messages.
    pub path: PathBuf,
    pub package: Option<String>,
    pub syntax: Syntax,
    pub imports: Vec<Import>,
    pub messages: Vec<Message>,
    pub enums: Vec<Enum>,
    pub services: Vec<Service>,
    /// `pbj.java_package` override recognized above the `package`
    /// statement (or above the first top-level definition if there is no
    /// `package` statement).
    pub java_package_override: Option<String>,
}

impl FileDescriptor {
    pub fn top_level_messages(&self) -> &[Message] {
        &self.messages
    }
}

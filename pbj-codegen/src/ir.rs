//! The emitter-facing intermediate representation: a schema `Message`/
//! `Enum` plus every field's type already resolved to a concrete Rust
//! type. Built once per file by [`crate::pipeline`] from
//! `pbj_schema::model` + `pbj_schema::resolver`, then handed to each of
//! the four emitters so none of them has to re-resolve anything.

use crate::naming::escape_rust_ident;
use crate::naming::to_pascal_case;
use crate::naming::to_snake_case;
use crate::rust_type::ResolvedFieldType;

#[derive(Debug, Clone)]
pub struct IrField {
    pub proto_name: String,
    pub rust_name: String,
    pub ty: ResolvedFieldType,
    pub repeated: bool,
    pub optional: bool,
    pub number: u32,
}

impl IrField {
    pub fn new(proto_name: String, ty: ResolvedFieldType, repeated: bool, optional: bool, number: u32) -> IrField {
        IrField {
            rust_name: escape_rust_ident(&to_snake_case(&proto_name)),
            proto_name,
            ty,
            repeated,
            optional,
            number,
        }
    }

    pub fn is_packable(&self) -> bool {
        self.repeated
            && match &self.ty {
                ResolvedFieldType::Scalar(t) => t.is_packable(),
                _ => false,
            }
    }
}

#[derive(Debug, Clone)]
pub struct IrOneOf {
    pub proto_name: String,
    pub rust_name: String,
    pub kind_enum_name: String,
    pub variants: Vec<IrField>,
}

impl IrOneOf {
    pub fn new(proto_name: String, variants: Vec<IrField>, message_name: &str) -> IrOneOf {
        IrOneOf {
            rust_name: escape_rust_ident(&to_snake_case(&proto_name)),
            kind_enum_name: format!("{}{}Kind", message_name, to_pascal_case(&proto_name)),
            proto_name,
            variants,
        }
    }
}

#[derive(Debug, Clone)]
pub enum IrFieldOrOneOf {
    Field(IrField),
    OneOf(IrOneOf),
}

#[derive(Debug, Clone)]
pub struct IrMessage {
    pub name: String,
    pub fields: Vec<IrFieldOrOneOf>,
    pub comparable: Option<Vec<String>>,
}

impl IrMessage {
    pub fn all_fields(&self) -> Vec<&IrField> {
        self.fields
            .iter()
            .flat_map(|fo| match fo {
                IrFieldOrOneOf::Field(f) => vec![f],
                IrFieldOrOneOf::OneOf(o) => o.variants.iter().collect(),
            })
            .collect()
    }

    pub fn oneofs(&self) -> Vec<&IrOneOf> {
        self.fields
            .iter()
            .filter_map(|fo| match fo {
                IrFieldOrOneOf::OneOf(o) => Some(o),
                _ => None,
            })
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct IrEnumValue {
    pub name: String,
    pub number: i32,
}

#[derive(Debug, Clone)]
pub struct IrEnum {
    pub name: String,
    pub values: Vec<IrEnumValue>,
}

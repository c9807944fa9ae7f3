//! Emits the immutable record type for a message: one field per
//! declared component, a `OneOfKind`/value enum per `oneof`, and — for
//! messages carrying a `pbj.comparable` directive — a total-ordering
//! `PartialOrd`/`Ord` implementation over the named fields.

use crate::code_writer::CodeWriter;
use crate::ir::IrEnum;
use crate::ir::IrField;
use crate::ir::IrFieldOrOneOf;
use crate::ir::IrMessage;
use crate::ir::IrOneOf;
use crate::rust_type::declared_rust_type;

fn emit_oneof_kind_enum(w: &mut CodeWriter, oneof: &IrOneOf) {
    w.derive(&["Debug", "Clone", "PartialEq"]);
    w.pub_enum(&oneof.kind_enum_name, |w| {
        w.write_line("Unset,");
        for variant in &oneof.variants {
            let ty = declared_rust_type(&variant.ty, variant.repeated, false);
            w.write_line(&format!("{}({}),", variant_name(variant), ty));
        }
    });
    w.write_line("");
    w.impl_self_block(&oneof.kind_enum_name, |w| {
        w.pub_fn("ordinal(&self) -> u32", |w| {
            w.match_block("self", |w| {
                w.write_line("Self::Unset => 0,");
                for variant in &oneof.variants {
                    w.write_line(&format!("Self::{}(_) => {},", variant_name(variant), variant.number));
                }
            });
        });
    });
}

fn variant_name(field: &IrField) -> String {
    crate::naming::to_pascal_case(&field.proto_name)
}

fn emit_struct_field(w: &mut CodeWriter, field: &IrField) {
    let ty = declared_rust_type(&field.ty, field.repeated, field.optional);
    w.field_decl(&field.rust_name, &ty);
}

/// Emits the `pub struct MessageName { ... }` body plus any nested
/// `OneOfKind` enums declared alongside it: one component per field,
/// oneof fields become a `OneOfKind` enum.
pub fn emit_message_model(w: &mut CodeWriter, message: &IrMessage) {
    for oneof in message.oneofs() {
        emit_oneof_kind_enum(w, oneof);
        w.write_line("");
    }

    w.derive(&["Debug", "Clone", "PartialEq"]);
    w.pub_struct(&message.name, |w| {
        for fo in &message.fields {
            match fo {
                IrFieldOrOneOf::Field(f) => emit_struct_field(w, f),
                IrFieldOrOneOf::OneOf(o) => w.field_decl(&o.rust_name, &o.kind_enum_name),
            }
        }
    });

    if let Some(keys) = &message.comparable {
        w.write_line("");
        emit_comparable_impl(w, message, keys);
    }
}

/// Emits `PartialOrd`/`Ord` delegating to a tuple of the named fields,
/// in the declared order, for a `pbj.comparable` message.
fn emit_comparable_impl(w: &mut CodeWriter, message: &IrMessage, keys: &[String]) {
    let field_accessors: Vec<String> = keys
        .iter()
        .map(|k| {
            let field = message
                .all_fields()
                .into_iter()
                .find(|f| &f.proto_name == k)
                .unwrap_or_else(|| panic!("pbj.comparable field `{}` missing from resolved model", k));
            format!("self.{}", field.rust_name)
        })
        .collect();

    w.impl_for_block("PartialOrd", &message.name, |w| {
        w.def_fn(
            &format!("partial_cmp(&self, other: &Self) -> Option<::std::cmp::Ordering>"),
            |w| {
                w.write_line("Some(self.cmp(other))");
            },
        );
    });
    w.write_line("");
    w.impl_for_block("Eq", &message.name, |w| {});
    w.write_line("");
    w.impl_for_block("Ord", &message.name, |w| {
        w.def_fn("cmp(&self, other: &Self) -> ::std::cmp::Ordering", |w| {
            let lhs = format!("({})", field_accessors.join(", "));
            let rhs_accessors: Vec<String> = keys
                .iter()
                .map(|k| {
                    let field = message.all_fields().into_iter().find(|f| &f.proto_name == k).unwrap();
                    format!("other.{}", field.rust_name)
                })
                .collect();
            let rhs = format!("({})", rhs_accessors.join(", "));
            w.write_line(&format!("{}.cmp(&{})", lhs, rhs));
        });
    });
}

/// Emits a plain Rust enum with `from_ordinal`/`proto_ordinal`
/// conversions for a proto3 `enum` declaration.
pub fn emit_enum_model(w: &mut CodeWriter, e: &IrEnum) {
    w.derive(&["Debug", "Clone", "Copy", "PartialEq", "Eq"]);
    w.pub_enum(&e.name, |w| {
        for value in &e.values {
            w.write_line(&format!("{},", value.name));
        }
    });
    w.write_line("");
    w.impl_self_block(&e.name, |w| {
        w.pub_fn("from_ordinal(ordinal: i32) -> Option<Self>", |w| {
            w.match_block("ordinal", |w| {
                for value in &e.values {
                    w.write_line(&format!("{} => Some(Self::{}),", value.number, value.name));
                }
                w.write_line("_ => None,");
            });
        });
        w.write_line("");
        w.pub_fn("proto_ordinal(&self) -> i32", |w| {
            w.match_block("self", |w| {
                for value in &e.values {
                    w.write_line(&format!("Self::{} => {},", value.name, value.number));
                }
            });
        });
    });
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::ir::IrEnumValue;
    use crate::rust_type::ResolvedFieldType;
    use pbj_runtime::field::FieldType;

    #[test]
    fn emits_struct_fields_for_scalars() {
        let message = IrMessage {
            name: "Account".to_owned(),
            fields: vec![
                IrFieldOrOneOf::Field(IrField::new("id".to_owned(), ResolvedFieldType::Scalar(FieldType::String), false, false, 1)),
                IrFieldOrOneOf::Field(IrField::new("balance".to_owned(), ResolvedFieldType::Scalar(FieldType::Int64), false, false, 2)),
            ],
            comparable: None,
        };
        let mut w = CodeWriter::new();
        emit_message_model(&mut w, &message);
        let out = w.finish();
        assert!(out.contains("pub struct Account {"));
        assert!(out.contains("pub id: String,"));
        assert!(out.contains("pub balance: i64,"));
    }

    #[test]
    fn emits_oneof_kind_enum_with_unset_variant() {
        let oneof = IrOneOf::new(
            "payload".to_owned(),
            vec![IrField::new("text".to_owned(), ResolvedFieldType::Scalar(FieldType::String), false, false, 1)],
            "Event",
        );
        let message = IrMessage {
            name: "Event".to_owned(),
            fields: vec![IrFieldOrOneOf::OneOf(oneof)],
            comparable: None,
        };
        let mut w = CodeWriter::new();
        emit_message_model(&mut w, &message);
        let out = w.finish();
        assert!(out.contains("pub enum EventPayloadKind {"));
        assert!(out.contains("Unset,"));
        assert!(out.contains("Text(String),"));
        assert!(out.contains("pub payload: EventPayloadKind,"));
    }

    #[test]
    fn emits_enum_from_and_to_ordinal() {
        let e = IrEnum {
            name: "Status".to_owned(),
            values: vec![
                IrEnumValue { name: "UNKNOWN".to_owned(), number: 0 },
                IrEnumValue { name: "ACTIVE".to_owned(), number: 1 },
            ],
        };
        let mut w = CodeWriter::new();
        emit_enum_model(&mut w, &e);
        let out = w.finish();
        assert!(out.contains("pub enum Status {"));
        assert!(out.contains("fn from_ordinal(ordinal: i32) -> Option<Self> {"));
        assert!(out.contains("1 => Some(Self::ACTIVE),"));
        assert!(out.contains("fn proto_ordinal(&self) -> i32 {"));
    }
}

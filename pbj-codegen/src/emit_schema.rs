//! Emits the field-number-indexed `FieldDefinition` table a message's
//! parser/writer consult for wire-type and packability information,
//! plus a `field_definition(number)` lookup function.

use crate::code_writer::CodeWriter;
use crate::ir::IrField;
use crate::ir::IrMessage;
use pbj_runtime::field::FieldType;

fn field_type_variant(ty: &pbj_runtime::field::FieldType) -> &'static str {
    match ty {
        FieldType::Double => "Double",
        FieldType::Float => "Float",
        FieldType::Int32 => "Int32",
        FieldType::Int64 => "Int64",
        FieldType::Uint32 => "Uint32",
        FieldType::Uint64 => "Uint64",
        FieldType::Sint32 => "Sint32",
        FieldType::Sint64 => "Sint64",
        FieldType::Fixed32 => "Fixed32",
        FieldType::Fixed64 => "Fixed64",
        FieldType::Sfixed32 => "Sfixed32",
        FieldType::Sfixed64 => "Sfixed64",
        FieldType::Bool => "Bool",
        FieldType::String => "String",
        FieldType::Bytes => "Bytes",
        FieldType::Enum => "Enum",
        FieldType::Message => "Message",
    }
}

fn const_name(field: &IrField) -> String {
    format!("FIELD_{}", field.proto_name.to_uppercase())
}

fn emit_field_definition_const(w: &mut CodeWriter, message_name: &str, field: &IrField) {
    let scalar = match &field.ty {
        crate::rust_type::ResolvedFieldType::Scalar(t) => field_type_variant(t),
        crate::rust_type::ResolvedFieldType::Message(_) => "Message",
        crate::rust_type::ResolvedFieldType::Enum(_) => "Enum",
    };
    w.write_line(&format!(
        "pub const {}: pbj_runtime::field::RawFieldInfo = pbj_runtime::field::RawFieldInfo {{",
        const_name(field)
    ));
    w.indented(|w| {
        w.write_line(&format!("name: \"{}\",", field.proto_name));
        w.write_line(&format!("field_type: pbj_runtime::field::FieldType::{},", scalar));
        w.write_line(&format!("repeated: {},", field.repeated));
        w.write_line(&format!("field_number: {},", field.number));
    });
    w.write_line("};");
    let _ = message_name;
}

/// Emits one `pub const FIELD_<NAME>` per declared field (including
/// oneof variants, each keeping its own field number) and a
/// `field_definition(field_number)` table lookup used by the writer to
/// decide packed-vs-unpacked encoding and by the parser's unknown-field
/// path.
pub fn emit_message_schema(w: &mut CodeWriter, message: &IrMessage) {
    let fields = message.all_fields();
    for field in &fields {
        emit_field_definition_const(w, &message.name, field);
        w.write_line("");
    }

    w.pub_fn(
        "field_definition(field_number: u32) -> Option<pbj_runtime::field::RawFieldInfo>",
        |w| {
            w.match_block("field_number", |w| {
                for field in &fields {
                    w.write_line(&format!("{} => Some({}),", field.number, const_name(field)));
                }
                w.write_line("_ => None,");
            });
        },
    );
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::ir::IrFieldOrOneOf;
    use crate::ir::IrMessage;
    use crate::rust_type::ResolvedFieldType;

    #[test]
    fn emits_one_const_per_field_and_a_lookup_fn() {
        let message = IrMessage {
            name: "Account".to_owned(),
            fields: vec![
                IrFieldOrOneOf::Field(IrField::new("id".to_owned(), ResolvedFieldType::Scalar(FieldType::String), false, false, 1)),
                IrFieldOrOneOf::Field(IrField::new("balance".to_owned(), ResolvedFieldType::Scalar(FieldType::Int64), false, false, 2)),
            ],
            comparable: None,
        };
        let mut w = CodeWriter::new();
        emit_message_schema(&mut w, &message);
        let out = w.finish();
        assert!(out.contains("pub const FIELD_ID"));
        assert!(out.contains("pub const FIELD_BALANCE"));
        assert!(out.contains("1 => Some(FIELD_ID),"));
        assert!(out.contains("2 => Some(FIELD_BALANCE),"));
        assert!(out.contains("fn field_definition(field_number: u32) -> Option<pbj_runtime::field::RawFieldInfo> {"));
    }
}

//! Emits `parse(input: &mut impl ReadableSequentialData) -> ProtobufResult<Model>`:
//! a tag-dispatch loop that reads one field at a time, buffering each
//! decoded component into a local `Option`/`Vec`, then assembles the
//! immutable model once the input is exhausted.
//!
//! Dispatch is on the literal `(field_number << 3) | wire_type` integer
//! computed once per expected tag at code-generation time, not on the
//! field number alone — a repeated packable field contributes two
//! literal arms (packed and unpacked), every other field contributes
//! one, and a field number seen with the wrong wire type falls through
//! to the unknown-field arm, which distinguishes "unknown to the
//! schema" (skip) from "known, wrong shape" (fail).

use crate::code_writer::CodeWriter;
use crate::ir::IrField;
use crate::ir::IrFieldOrOneOf;
use crate::ir::IrMessage;
use crate::ir::IrOneOf;
use crate::rust_type::ResolvedFieldType;
use pbj_runtime::field::FieldType;
use pbj_runtime::field::WireType;

fn wire_type_of(ty: &ResolvedFieldType) -> WireType {
    match ty {
        ResolvedFieldType::Scalar(t) => t.wire_type(),
        ResolvedFieldType::Enum(_) => WireType::Varint,
        ResolvedFieldType::Message(_) => WireType::LengthDelimited,
    }
}

fn tag_literal(field_number: u32, wire_type: WireType) -> u32 {
    (field_number << 3) | wire_type.as_u8() as u32
}

fn scalar_read_expr(ty: FieldType) -> String {
    match ty {
        FieldType::Double => "f64::from_bits(pbj_runtime::varint::read_fixed64(input)?)".to_owned(),
        FieldType::Float => "f32::from_bits(pbj_runtime::varint::read_fixed32(input)?)".to_owned(),
        FieldType::Int32 => "pbj_runtime::varint::read_varint32(input)? as i32".to_owned(),
        FieldType::Int64 => "pbj_runtime::varint::read_varint64(input)? as i64".to_owned(),
        FieldType::Uint32 => "pbj_runtime::varint::read_varint32(input)?".to_owned(),
        FieldType::Uint64 => "pbj_runtime::varint::read_varint64(input)?".to_owned(),
        FieldType::Sint32 => "pbj_runtime::varint::read_zigzag32(input)?".to_owned(),
        FieldType::Sint64 => "pbj_runtime::varint::read_zigzag64(input)?".to_owned(),
        FieldType::Fixed32 => "pbj_runtime::varint::read_fixed32(input)?".to_owned(),
        FieldType::Fixed64 => "pbj_runtime::varint::read_fixed64(input)?".to_owned(),
        FieldType::Sfixed32 => "pbj_runtime::varint::read_fixed32(input)? as i32".to_owned(),
        FieldType::Sfixed64 => "pbj_runtime::varint::read_fixed64(input)? as i64".to_owned(),
        FieldType::Bool => "pbj_runtime::varint::read_varint32(input)? != 0".to_owned(),
        FieldType::String => {
            "{ let len = pbj_runtime::varint::read_varint32(input)? as usize; pbj_runtime::varint::read_string(input, len)? }".to_owned()
        }
        FieldType::Bytes => {
            "{ let len = pbj_runtime::varint::read_varint32(input)? as usize; pbj_runtime::Bytes::from_vec(input.read_vec(len)?) }".to_owned()
        }
        FieldType::Enum | FieldType::Message => {
            unreachable!("scalar_read_expr called on a non-scalar FieldType")
        }
    }
}

fn scalar_default_expr(ty: FieldType) -> String {
    match ty {
        FieldType::String => "String::new()".to_owned(),
        FieldType::Bytes => "pbj_runtime::Bytes::empty()".to_owned(),
        _ => "Default::default()".to_owned(),
    }
}

fn local_var(field: &IrField) -> String {
    format!("field_{}", field.rust_name.trim_start_matches("r#"))
}

fn emit_field_locals(w: &mut CodeWriter, field: &IrField) {
    if field.repeated {
        w.write_line(&format!("let mut {}: Vec<{}> = Vec::new();", local_var(field), field.ty.base_rust_type()));
    } else {
        w.write_line(&format!("let mut {}: Option<{}> = None;", local_var(field), field.ty.base_rust_type()));
    }
}

fn emit_single_value_read(w: &mut CodeWriter, field: &IrField) {
    match &field.ty {
        ResolvedFieldType::Scalar(t) => {
            w.write_line(&format!("let value = {};", scalar_read_expr(*t)));
        }
        ResolvedFieldType::Message(_) => {
            let ty = field.ty.base_rust_type();
            w.write_line("let len = pbj_runtime::varint::read_varint32(input)? as usize;");
            w.write_line("let old_limit = input.push_limit(len as u64)?;");
            w.write_line(&format!("let value = {}::parse(input)?;", ty));
            w.write_line("input.pop_limit(old_limit);");
        }
        ResolvedFieldType::Enum(_) => {
            let ty = field.ty.base_rust_type();
            w.write_line("let raw = pbj_runtime::varint::read_varint32(input)? as i32;");
            w.write_line(&format!(
                "let value = {}::from_ordinal(raw).ok_or_else(|| pbj_runtime::ProtobufError::malformed(pbj_runtime::MalformedProtobufReason::Other(format!(\"unknown enum ordinal {{}}\", raw))))?;",
                ty
            ));
        }
    }
}

/// Reads an `optional` scalar field's well-known wrapper sub-message: a
/// zero-length payload means present-at-default, otherwise the payload
/// is a single inner tag+value at field number 1.
fn emit_optional_value_read(w: &mut CodeWriter, field: &IrField) {
    let scalar_ty = match &field.ty {
        ResolvedFieldType::Scalar(t) => *t,
        _ => unreachable!("optional fields are always scalar"),
    };
    w.write_line("let wrapper_len = pbj_runtime::varint::read_varint32(input)? as usize;");
    w.write_line("let old_limit = input.push_limit(wrapper_len as u64)?;");
    w.if_stmt("wrapper_len == 0", |w| {
        w.write_line(&format!("{} = Some({});", local_var(field), scalar_default_expr(scalar_ty)));
    });
    w.write_line("else {");
    w.indented(|w| {
        w.write_line("let (inner_field_number, inner_wire_type) = pbj_runtime::varint::read_tag(input)?;");
        w.if_stmt("inner_field_number != 1", |w| {
            w.write_line(
                "return Err(pbj_runtime::ProtobufError::malformed(pbj_runtime::MalformedProtobufReason::UnexpectedWrapperField(inner_field_number)));",
            );
        });
        let expected = scalar_ty.wire_type().as_u8();
        w.if_stmt(&format!("inner_wire_type.as_u8() != {}", expected), |w| {
            w.write_line(&format!(
                "return Err(pbj_runtime::ProtobufError::malformed(pbj_runtime::MalformedProtobufReason::UnexpectedWireType {{ field_number: 1, expected: {}, actual: inner_wire_type.as_u8() }}));",
                expected
            ));
        });
        w.write_line(&format!("let value = {};", scalar_read_expr(scalar_ty)));
        w.write_line(&format!("{} = Some(value);", local_var(field)));
    });
    w.write_line("}");
    w.write_line("input.pop_limit(old_limit);");
}

fn emit_field_case(w: &mut CodeWriter, field: &IrField) {
    if field.optional {
        let tag = tag_literal(field.number, WireType::LengthDelimited);
        w.case_block(&tag.to_string(), |w| emit_optional_value_read(w, field));
        return;
    }

    if field.is_packable() {
        let scalar_ty = match &field.ty {
            ResolvedFieldType::Scalar(t) => *t,
            _ => unreachable!("packable field is always a scalar"),
        };
        let packed_tag = tag_literal(field.number, WireType::LengthDelimited);
        w.case_block(&packed_tag.to_string(), |w| {
            w.write_line("let len = pbj_runtime::varint::read_varint32(input)? as usize;");
            w.write_line("let old_limit = input.push_limit(len as u64)?;");
            w.while_block("input.has_remaining()", |w| {
                w.write_line(&format!("let value = {};", scalar_read_expr(scalar_ty)));
                w.write_line(&format!("{}.push(value);", local_var(field)));
            });
            w.write_line("input.pop_limit(old_limit);");
        });
        let unpacked_tag = tag_literal(field.number, scalar_ty.wire_type());
        w.case_block(&unpacked_tag.to_string(), |w| {
            emit_single_value_read(w, field);
            w.write_line(&format!("{}.push(value);", local_var(field)));
        });
        return;
    }

    if field.repeated {
        // String/bytes/message elements are always their own tag+length+value
        // pair, never packed.
        let tag = tag_literal(field.number, WireType::LengthDelimited);
        w.case_block(&tag.to_string(), |w| {
            emit_single_value_read(w, field);
            w.write_line(&format!("{}.push(value);", local_var(field)));
        });
        return;
    }

    let tag = tag_literal(field.number, wire_type_of(&field.ty));
    w.case_block(&tag.to_string(), |w| {
        emit_single_value_read(w, field);
        w.write_line(&format!("{} = Some(value);", local_var(field)));
    });
}

fn emit_oneof_case(w: &mut CodeWriter, oneof: &IrOneOf, local: &str) {
    for variant in &oneof.variants {
        let tag = tag_literal(variant.number, wire_type_of(&variant.ty));
        w.case_block(&tag.to_string(), |w| {
            emit_single_value_read(w, variant);
            let variant_name = crate::naming::to_pascal_case(&variant.proto_name);
            w.write_line(&format!("{} = {}::{}(value);", local, oneof.kind_enum_name, variant_name));
        });
    }
}

fn field_assembly_expr(field: &IrField) -> String {
    let local = local_var(field);
    if field.repeated {
        local
    } else if field.optional || field.ty.is_message() {
        local
    } else {
        let default = match &field.ty {
            ResolvedFieldType::Scalar(FieldType::String) => "String::new()".to_owned(),
            ResolvedFieldType::Scalar(FieldType::Bytes) => "pbj_runtime::Bytes::empty()".to_owned(),
            ResolvedFieldType::Scalar(_) => "Default::default()".to_owned(),
            ResolvedFieldType::Enum(_) => format!("{}::from_ordinal(0).expect(\"enum must declare a zero value\")", field.ty.base_rust_type()),
            ResolvedFieldType::Message(_) => unreachable!("message fields are always Option, handled above"),
        };
        format!("{}.unwrap_or_else(|| {})", local, default)
    }
}

/// Emits `pub fn parse(input: &mut impl ReadableSequentialData) -> pbj_runtime::ProtobufResult<Self>`.
pub fn emit_message_parser(w: &mut CodeWriter, message: &IrMessage) {
    let known_field_numbers: Vec<u32> = message.all_fields().iter().map(|f| f.number).collect();

    w.impl_self_block(&message.name, |w| {
        w.pub_fn(
            "parse(input: &mut impl pbj_runtime::io::ReadableSequentialData) -> pbj_runtime::ProtobufResult<Self>",
            |w| {
                for fo in &message.fields {
                    match fo {
                        IrFieldOrOneOf::Field(f) => emit_field_locals(w, f),
                        IrFieldOrOneOf::OneOf(o) => {
                            w.write_line(&format!("let mut {} = {}::Unset;", o.rust_name, o.kind_enum_name));
                        }
                    }
                }
                w.write_line("");
                w.while_block("input.has_remaining()", |w| {
                    w.write_line("let (field_number, wire_type) = pbj_runtime::varint::read_tag(input)?;");
                    w.write_line("let tag = (field_number << 3) | (wire_type.as_u8() as u32);");
                    w.match_block("tag", |w| {
                        for fo in &message.fields {
                            match fo {
                                IrFieldOrOneOf::Field(f) => emit_field_case(w, f),
                                IrFieldOrOneOf::OneOf(o) => emit_oneof_case(w, o, &o.rust_name),
                            }
                        }
                        w.case_block("_", |w| {
                            if !known_field_numbers.is_empty() {
                                let pattern = known_field_numbers.iter().map(u32::to_string).collect::<Vec<_>>().join(" | ");
                                w.if_stmt(&format!("matches!(field_number, {})", pattern), |w| {
                                    w.write_line(
                                        "return Err(pbj_runtime::ProtobufError::malformed(pbj_runtime::MalformedProtobufReason::Other(format!(\"field {} has unexpected wire type {}\", field_number, wire_type.as_u8()))));",
                                    );
                                });
                            }
                            w.write_line("pbj_runtime::varint::skip_field(input, wire_type)?;");
                        });
                    });
                });
                w.write_line("");
                w.write_line(&format!("Ok({} {{", message.name));
                w.indented(|w| {
                    for fo in &message.fields {
                        match fo {
                            IrFieldOrOneOf::Field(f) => {
                                w.field_entry(&f.rust_name, &field_assembly_expr(f));
                            }
                            IrFieldOrOneOf::OneOf(o) => {
                                w.field_entry(&o.rust_name, &o.rust_name);
                            }
                        }
                    }
                });
                w.write_line("})");
            },
        );
    });
}

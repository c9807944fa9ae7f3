//! Emits `write(&self, sink: &mut impl WritableSequentialData)` and
//! `measure(&self) -> usize` from the same per-field template, so the
//! two stay in lock-step by construction. A `debug_assert_eq!` at the
//! end of `write` checks `measure(self) == bytes actually written`
//! in debug builds only.

use crate::code_writer::CodeWriter;
use crate::ir::IrField;
use crate::ir::IrFieldOrOneOf;
use crate::ir::IrMessage;
use crate::ir::IrOneOf;
use crate::rust_type::ResolvedFieldType;
use pbj_runtime::field::FieldType;

/// True when `v` (the scalar value inside a present `optional` field) is
/// the type's canonical default — the wrapper is still written, but with
/// a zero-length payload.
fn optional_is_default_expr(ty: FieldType, value_expr: &str) -> String {
    match ty {
        FieldType::String => format!("{}.is_empty()", value_expr),
        FieldType::Bytes => format!("{}.is_empty()", value_expr),
        FieldType::Bool => format!("!{}", deref_scalar(ty, value_expr)),
        _ => format!("{} == Default::default()", deref_scalar(ty, value_expr)),
    }
}

/// `if let Some(ref v) = ...` and a reference match pattern on a `oneof`
/// enum both bind `v: &T`. Every scalar type routed through an `as` cast
/// or a raw comparison (everything but `String`/`Bytes`, which go
/// through by-reference methods that auto-deref) needs that reference
/// peeled back off before it reaches `scalar_write_stmt`/`scalar_size_expr`.
fn deref_scalar(ty: FieldType, raw: &str) -> String {
    match ty {
        FieldType::String | FieldType::Bytes => raw.to_owned(),
        _ => format!("*{}", raw),
    }
}

fn deref_ref_binding(ty: &ResolvedFieldType, raw: &str) -> String {
    match ty {
        ResolvedFieldType::Scalar(t) => deref_scalar(*t, raw),
        ResolvedFieldType::Enum(_) => raw.to_owned(),
        ResolvedFieldType::Message(_) => raw.to_owned(),
    }
}

fn scalar_write_stmt(ty: FieldType, value_expr: &str) -> String {
    match ty {
        FieldType::Double => format!("pbj_runtime::varint::write_fixed64(sink, {}.to_bits())?;", value_expr),
        FieldType::Float => format!("pbj_runtime::varint::write_fixed32(sink, {}.to_bits())?;", value_expr),
        FieldType::Fixed64 | FieldType::Sfixed64 => {
            format!("pbj_runtime::varint::write_fixed64(sink, {} as u64)?;", value_expr)
        }
        FieldType::Fixed32 | FieldType::Sfixed32 => {
            format!("pbj_runtime::varint::write_fixed32(sink, {} as u32)?;", value_expr)
        }
        FieldType::Int32 => {
            format!("pbj_runtime::varint::write_varint64(sink, {} as i64 as u64)?;", value_expr)
        }
        FieldType::Uint32 => {
            format!("pbj_runtime::varint::write_varint32(sink, {} as u32)?;", value_expr)
        }
        FieldType::Int64 | FieldType::Uint64 => {
            format!("pbj_runtime::varint::write_varint64(sink, {} as u64)?;", value_expr)
        }
        FieldType::Sint32 => format!("pbj_runtime::varint::write_zigzag32(sink, {})?;", value_expr),
        FieldType::Sint64 => format!("pbj_runtime::varint::write_zigzag64(sink, {})?;", value_expr),
        FieldType::Bool => format!("pbj_runtime::varint::write_varint32(sink, {} as u32)?;", value_expr),
        FieldType::String => format!(
            "pbj_runtime::varint::write_varint32(sink, {v}.len() as u32)?; sink.write_bytes({v}.as_bytes())?;",
            v = value_expr
        ),
        FieldType::Bytes => format!("{}.write_length_delimited(sink)?;", value_expr),
        FieldType::Enum | FieldType::Message => unreachable!(),
    }
}

/// A size expression that evaluates to `usize`, so callers can sum or
/// add it into a `usize` accumulator without further casting.
fn scalar_size_expr(ty: FieldType, value_expr: &str) -> String {
    match ty {
        FieldType::Double | FieldType::Fixed64 | FieldType::Sfixed64 => "pbj_runtime::size::size_of_fixed64() as usize".to_owned(),
        FieldType::Float | FieldType::Fixed32 | FieldType::Sfixed32 => "pbj_runtime::size::size_of_fixed32() as usize".to_owned(),
        FieldType::Int32 => format!("pbj_runtime::size::size_of_int32({} as i32) as usize", value_expr),
        FieldType::Int64 => format!("pbj_runtime::size::size_of_int64({} as i64) as usize", value_expr),
        FieldType::Uint32 => format!("pbj_runtime::size::size_of_varint32({} as u32) as usize", value_expr),
        FieldType::Uint64 => format!("pbj_runtime::size::size_of_varint64({} as u64) as usize", value_expr),
        FieldType::Sint32 => format!("pbj_runtime::size::size_of_zigzag32({}) as usize", value_expr),
        FieldType::Sint64 => format!("pbj_runtime::size::size_of_zigzag64({}) as usize", value_expr),
        FieldType::Bool => "1usize".to_owned(),
        FieldType::String => format!("pbj_runtime::size::size_of_string({}) as usize", value_expr),
        FieldType::Bytes => format!("pbj_runtime::size::size_of_bytes({}.as_slice()) as usize", value_expr),
        FieldType::Enum | FieldType::Message => unreachable!(),
    }
}

fn is_default_check(field: &IrField, value_expr: &str) -> Option<String> {
    match &field.ty {
        ResolvedFieldType::Scalar(FieldType::String) => Some(format!("!pbj_runtime::size::is_default_string({})", value_expr)),
        ResolvedFieldType::Scalar(FieldType::Bytes) => {
            Some(format!("!pbj_runtime::size::is_default_bytes({}.as_slice())", value_expr))
        }
        ResolvedFieldType::Scalar(FieldType::Bool) => Some(value_expr.to_owned()),
        ResolvedFieldType::Scalar(FieldType::Enum) | ResolvedFieldType::Enum(_) => {
            Some(format!("{}.proto_ordinal() != 0", value_expr))
        }
        ResolvedFieldType::Scalar(_) => Some(format!("{} != Default::default()", value_expr)),
        ResolvedFieldType::Message(_) => None,
    }
}

fn emit_field_write(w: &mut CodeWriter, field: &IrField) {
    let name = &field.rust_name;
    if field.repeated {
        if field.is_packable() {
            let scalar_ty = match &field.ty {
                ResolvedFieldType::Scalar(t) => *t,
                _ => unreachable!(),
            };
            w.if_stmt(&format!("!self.{}.is_empty()", name), |w| {
                w.write_line(&format!(
                    "let packed_len: usize = self.{}.iter().map(|v| {}).sum();",
                    name,
                    scalar_size_expr(scalar_ty, "*v")
                ));
                w.write_line(&format!(
                    "pbj_runtime::varint::write_tag(sink, {}, pbj_runtime::field::WireType::LengthDelimited)?;",
                    field.number
                ));
                w.write_line("pbj_runtime::varint::write_varint32(sink, packed_len as u32)?;");
                w.write_line(&format!("for v in &self.{} {{", name));
                w.indented(|w| {
                    w.write_line(&scalar_write_stmt(scalar_ty, "*v"));
                });
                w.write_line("}");
            });
        } else {
            w.write_line(&format!("for v in &self.{} {{", name));
            w.indented(|w| {
                w.write_line(&format!(
                    "pbj_runtime::varint::write_tag(sink, {}, {})?;",
                    field.number,
                    wire_type_expr(&field.ty)
                ));
                match &field.ty {
                    ResolvedFieldType::Message(_) => {
                        w.write_line("pbj_runtime::varint::write_varint32(sink, v.measure() as u32)?;");
                        w.write_line("v.write(sink)?;");
                    }
                    _ => emit_single_value_write(w, &field.ty, "v"),
                }
            });
            w.write_line("}");
        }
        return;
    }

    let value_expr = format!("self.{}", name);
    match &field.ty {
        ResolvedFieldType::Message(_) => {
            w.if_let_stmt("Some(ref v)", &value_expr, |w| {
                w.write_line(&format!(
                    "pbj_runtime::varint::write_tag(sink, {}, pbj_runtime::field::WireType::LengthDelimited)?;",
                    field.number
                ));
                w.write_line("pbj_runtime::varint::write_varint32(sink, v.measure() as u32)?;");
                w.write_line("v.write(sink)?;");
            });
        }
        _ if field.optional => {
            let scalar_ty = match &field.ty {
                ResolvedFieldType::Scalar(t) => *t,
                _ => unreachable!("optional fields are always scalar"),
            };
            w.if_let_stmt("Some(ref v)", &value_expr, |w| {
                w.write_line(&format!(
                    "pbj_runtime::varint::write_tag(sink, {}, pbj_runtime::field::WireType::LengthDelimited)?;",
                    field.number
                ));
                w.if_stmt(&optional_is_default_expr(scalar_ty, "v"), |w| {
                    w.write_line("pbj_runtime::varint::write_varint32(sink, 0)?;");
                });
                w.write_line("else {");
                w.indented(|w| {
                    w.write_line(&format!(
                        "let inner_len = pbj_runtime::size::size_of_tag(1, {}) as usize + {};",
                        wire_type_expr(&field.ty),
                        element_size_expr(&field.ty, &deref_ref_binding(&field.ty, "v"))
                    ));
                    w.write_line("pbj_runtime::varint::write_varint32(sink, inner_len as u32)?;");
                    w.write_line(&format!(
                        "pbj_runtime::varint::write_tag(sink, 1, {})?;",
                        wire_type_expr(&field.ty)
                    ));
                    emit_single_value_write(w, &field.ty, &deref_ref_binding(&field.ty, "v"));
                });
                w.write_line("}");
            });
        }
        _ => {
            let condition = is_default_check(field, &value_expr).unwrap_or_else(|| "true".to_owned());
            w.if_stmt(&condition, |w| {
                w.write_line(&format!(
                    "pbj_runtime::varint::write_tag(sink, {}, {})?;",
                    field.number,
                    wire_type_expr(&field.ty)
                ));
                emit_single_value_write(w, &field.ty, &value_expr);
            });
        }
    }
}

fn emit_single_value_write(w: &mut CodeWriter, ty: &ResolvedFieldType, value_expr: &str) {
    match ty {
        ResolvedFieldType::Scalar(t) => w.write_line(&scalar_write_stmt(*t, value_expr)),
        ResolvedFieldType::Enum(_) => {
            w.write_line(&format!("pbj_runtime::varint::write_varint32(sink, {}.proto_ordinal() as u32)?;", value_expr));
        }
        ResolvedFieldType::Message(_) => unreachable!("message fields are written via their own branch"),
    }
}

fn wire_type_expr(ty: &ResolvedFieldType) -> String {
    match ty {
        ResolvedFieldType::Scalar(t) => format!("pbj_runtime::field::FieldType::{:?}.wire_type()", t),
        ResolvedFieldType::Enum(_) => "pbj_runtime::field::WireType::Varint".to_owned(),
        ResolvedFieldType::Message(_) => "pbj_runtime::field::WireType::LengthDelimited".to_owned(),
    }
}

fn emit_oneof_write(w: &mut CodeWriter, oneof: &IrOneOf) {
    w.match_block(&format!("&self.{}", oneof.rust_name), |w| {
        w.case_block(&format!("{}::Unset", oneof.kind_enum_name), |_w| {});
        for variant in &oneof.variants {
            let variant_name = crate::naming::to_pascal_case(&variant.proto_name);
            w.case_block(&format!("{}::{}(v)", oneof.kind_enum_name, variant_name), |w| {
                w.write_line(&format!(
                    "pbj_runtime::varint::write_tag(sink, {}, {})?;",
                    variant.number,
                    wire_type_expr(&variant.ty)
                ));
                match &variant.ty {
                    ResolvedFieldType::Message(_) => {
                        w.write_line("pbj_runtime::varint::write_varint32(sink, v.measure() as u32)?;");
                        w.write_line("v.write(sink)?;");
                    }
                    _ => emit_single_value_write(w, &variant.ty, &deref_ref_binding(&variant.ty, "v")),
                }
            });
        }
    });
}

/// Emits `pub fn write` and `pub fn measure` together.
pub fn emit_message_writer(w: &mut CodeWriter, message: &IrMessage) {
    w.impl_self_block(&message.name, |w| {
        w.pub_fn(
            "write(&self, sink: &mut impl pbj_runtime::io::WritableSequentialData) -> pbj_runtime::ProtobufResult<()>",
            |w| {
                w.write_line("#[cfg(debug_assertions)]");
                w.write_line("let start_position = sink.position();");
                for fo in &message.fields {
                    match fo {
                        IrFieldOrOneOf::Field(f) => emit_field_write(w, f),
                        IrFieldOrOneOf::OneOf(o) => emit_oneof_write(w, o),
                    }
                }
                w.write_line("#[cfg(debug_assertions)]");
                w.write_line("debug_assert_eq!(sink.position() - start_position, self.measure() as u64);");
                w.write_line("Ok(())");
            },
        );
        w.write_line("");
        w.pub_fn("measure(&self) -> usize", |w| {
            w.write_line("let mut size = 0usize;");
            for fo in &message.fields {
                match fo {
                    IrFieldOrOneOf::Field(f) => emit_field_size(w, f),
                    IrFieldOrOneOf::OneOf(o) => emit_oneof_size(w, o),
                }
            }
            w.write_line("size");
        });
    });
}

fn emit_field_size(w: &mut CodeWriter, field: &IrField) {
    let name = &field.rust_name;
    if field.repeated {
        if field.is_packable() {
            let scalar_ty = match &field.ty {
                ResolvedFieldType::Scalar(t) => *t,
                _ => unreachable!(),
            };
            w.if_stmt(&format!("!self.{}.is_empty()", name), |w| {
                w.write_line(&format!(
                    "let packed_len: usize = self.{}.iter().map(|v| {}).sum();",
                    name,
                    scalar_size_expr(scalar_ty, "*v")
                ));
                w.write_line(&format!(
                    "size += pbj_runtime::size::size_of_packed_list({}, packed_len as u32) as usize;",
                    field.number
                ));
            });
        } else {
            w.write_line(&format!("for v in &self.{} {{", name));
            w.indented(|w| {
                w.write_line(&format!(
                    "size += pbj_runtime::size::size_of_tag({}, {}) as usize;",
                    field.number,
                    wire_type_expr(&field.ty)
                ));
                match &field.ty {
                    ResolvedFieldType::Message(_) => w.write_line("size += pbj_runtime::size::size_of_message(v.measure() as u32) as usize;"),
                    _ => w.write_line(&format!("size += {};", element_size_expr(&field.ty, "v"))),
                }
            });
            w.write_line("}");
        }
        return;
    }

    let value_expr = format!("self.{}", name);
    match &field.ty {
        ResolvedFieldType::Message(_) => {
            w.if_let_stmt("Some(ref v)", &value_expr, |w| {
                w.write_line(&format!(
                    "size += pbj_runtime::size::size_of_tag({}, pbj_runtime::field::WireType::LengthDelimited) as usize;",
                    field.number
                ));
                w.write_line("size += pbj_runtime::size::size_of_message(v.measure() as u32) as usize;");
            });
        }
        _ if field.optional => {
            let scalar_ty = match &field.ty {
                ResolvedFieldType::Scalar(t) => *t,
                _ => unreachable!("optional fields are always scalar"),
            };
            w.if_let_stmt("Some(ref v)", &value_expr, |w| {
                w.write_line(&format!(
                    "size += pbj_runtime::size::size_of_tag({}, pbj_runtime::field::WireType::LengthDelimited) as usize;",
                    field.number
                ));
                w.if_stmt(&optional_is_default_expr(scalar_ty, "v"), |w| {
                    w.write_line("size += pbj_runtime::size::size_of_varint32(0) as usize;");
                });
                w.write_line("else {");
                w.indented(|w| {
                    w.write_line(&format!(
                        "let inner_len = pbj_runtime::size::size_of_tag(1, {}) as usize + {};",
                        wire_type_expr(&field.ty),
                        element_size_expr(&field.ty, &deref_ref_binding(&field.ty, "v"))
                    ));
                    w.write_line("size += pbj_runtime::size::size_of_varint32(inner_len as u32) as usize;");
                    w.write_line("size += inner_len;");
                });
                w.write_line("}");
            });
        }
        _ => {
            let condition = is_default_check(field, &value_expr).unwrap_or_else(|| "true".to_owned());
            w.if_stmt(&condition, |w| {
                w.write_line(&format!(
                    "size += pbj_runtime::size::size_of_tag({}, {}) as usize;",
                    field.number,
                    wire_type_expr(&field.ty)
                ));
                w.write_line(&format!("size += {};", element_size_expr(&field.ty, &value_expr)));
            });
        }
    }
}

fn element_size_expr(ty: &ResolvedFieldType, value_expr: &str) -> String {
    match ty {
        ResolvedFieldType::Scalar(t) => scalar_size_expr(*t, value_expr),
        ResolvedFieldType::Enum(_) => format!("pbj_runtime::size::size_of_varint32({}.proto_ordinal() as u32) as usize", value_expr),
        ResolvedFieldType::Message(_) => unreachable!("message fields are sized via their own branch"),
    }
}

fn emit_oneof_size(w: &mut CodeWriter, oneof: &IrOneOf) {
    w.match_block(&format!("&self.{}", oneof.rust_name), |w| {
        w.case_block(&format!("{}::Unset", oneof.kind_enum_name), |_w| {});
        for variant in &oneof.variants {
            let variant_name = crate::naming::to_pascal_case(&variant.proto_name);
            w.case_block(&format!("{}::{}(v)", oneof.kind_enum_name, variant_name), |w| {
                let wire_type = match &variant.ty {
                    ResolvedFieldType::Message(_) => "pbj_runtime::field::WireType::LengthDelimited".to_owned(),
                    other => wire_type_expr(other),
                };
                w.write_line(&format!(
                    "size += pbj_runtime::size::size_of_tag({}, {}) as usize;",
                    variant.number, wire_type
                ));
                match &variant.ty {
                    ResolvedFieldType::Message(_) => w.write_line("size += pbj_runtime::size::size_of_message(v.measure() as u32) as usize;"),
                    _ => w.write_line(&format!("size += {};", element_size_expr(&variant.ty, &deref_ref_binding(&variant.ty, "v")))),
                }
            });
        }
    });
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::ir::IrField;

    #[test]
    fn emits_write_and_measure_in_lock_step_for_a_scalar() {
        let message = IrMessage {
            name: "Account".to_owned(),
            fields: vec![IrFieldOrOneOf::Field(IrField::new(
                "id".to_owned(),
                ResolvedFieldType::Scalar(FieldType::String),
                false,
                false,
                1,
            ))],
            comparable: None,
        };
        let mut w = CodeWriter::new();
        emit_message_writer(&mut w, &message);
        let out = w.finish();
        assert!(out.contains("fn write(&self, sink: &mut impl pbj_runtime::io::WritableSequentialData) -> pbj_runtime::ProtobufResult<()> {"));
        assert!(out.contains("fn measure(&self) -> usize {"));
        assert!(out.contains("is_default_string"));
    }

    #[test]
    fn message_field_is_always_written_under_a_presence_check() {
        let message = IrMessage {
            name: "Wallet".to_owned(),
            fields: vec![IrFieldOrOneOf::Field(IrField::new(
                "owner".to_owned(),
                ResolvedFieldType::Message(".example.Account".to_owned()),
                false,
                false,
                1,
            ))],
            comparable: None,
        };
        let mut w = CodeWriter::new();
        emit_message_writer(&mut w, &message);
        let out = w.finish();
        assert!(out.contains("if let Some(ref v) = self.owner {"));
        assert!(out.contains("size_of_message(v.measure() as u32)"));
    }

    #[test]
    fn repeated_message_field_writes_each_element_length_delimited() {
        let message = IrMessage {
            name: "Ledger".to_owned(),
            fields: vec![IrFieldOrOneOf::Field(IrField::new(
                "entries".to_owned(),
                ResolvedFieldType::Message(".example.Entry".to_owned()),
                true,
                false,
                1,
            ))],
            comparable: None,
        };
        let mut w = CodeWriter::new();
        emit_message_writer(&mut w, &message);
        let out = w.finish();
        assert!(out.contains("for v in &self.entries {"));
        assert!(out.contains("v.write(sink)?;"));
        assert!(out.contains("size_of_message(v.measure() as u32)"));
    }

    #[test]
    fn optional_scalar_field_writes_a_wrapper_message() {
        let message = IrMessage {
            name: "Profile".to_owned(),
            fields: vec![IrFieldOrOneOf::Field(IrField::new(
                "age".to_owned(),
                ResolvedFieldType::Scalar(FieldType::Int32),
                false,
                true,
                1,
            ))],
            comparable: None,
        };
        let mut w = CodeWriter::new();
        emit_message_writer(&mut w, &message);
        let out = w.finish();
        assert!(out.contains("if let Some(ref v) = self.age {"));
        assert!(out.contains("write_varint32(sink, 0)?;"));
        assert!(out.contains("write_tag(sink, 1,"));
        assert!(out.contains("write_varint64(sink, *v as i64 as u64)?;"));
    }

    #[test]
    fn oneof_scalar_variant_dereferences_before_casting() {
        let oneof = IrOneOf::new(
            "payload".to_owned(),
            vec![IrField::new("count".to_owned(), ResolvedFieldType::Scalar(FieldType::Int32), false, false, 1)],
            "Event",
        );
        let message = IrMessage {
            name: "Event".to_owned(),
            fields: vec![IrFieldOrOneOf::OneOf(oneof)],
            comparable: None,
        };
        let mut w = CodeWriter::new();
        emit_message_writer(&mut w, &message);
        let out = w.finish();
        assert!(out.contains("write_varint64(sink, *v as i64 as u64)?;"));
    }

    #[test]
    fn negative_int32_scalar_field_writes_ten_byte_sign_extended_varint() {
        let message = IrMessage {
            name: "Account".to_owned(),
            fields: vec![IrFieldOrOneOf::Field(IrField::new(
                "delta".to_owned(),
                ResolvedFieldType::Scalar(FieldType::Int32),
                false,
                false,
                4,
            ))],
            comparable: None,
        };
        let mut w = CodeWriter::new();
        emit_message_writer(&mut w, &message);
        let out = w.finish();
        assert!(out.contains("write_varint64(sink, self.delta as i64 as u64)?;"));
        assert!(out.contains("size_of_int32(self.delta as i32) as usize"));
    }
}

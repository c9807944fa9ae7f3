//! Per-message emitter orchestration: resolves every field of a parsed
//! schema against the global symbol table, builds the emitter-facing
//! IR, and runs the four emitters to produce one Rust source string per
//! output kind. Callers (the `pbj-compiler` binary) own writing the
//! results to the four `.model`/`.schemas`/`.parsers`/`.writers`
//! sub-package directories.

use pbj_schema::model::Enum as SchemaEnum;
use pbj_schema::model::Field as SchemaField;
use pbj_schema::model::FieldOrOneOf as SchemaFieldOrOneOf;
use pbj_schema::model::FieldTypeRef;
use pbj_schema::model::FileDescriptor;
use pbj_schema::model::Message as SchemaMessage;
use pbj_schema::resolver::ResolverContext;
use pbj_schema::resolver::SymbolKind;
use pbj_schema::resolver::SymbolTable;
use pbj_schema::SchemaResult;

use crate::code_writer::CodeWriter;
use crate::error::EmitError;
use crate::error::EmitResult;
use crate::emit_model::emit_enum_model;
use crate::emit_model::emit_message_model;
use crate::emit_parser::emit_message_parser;
use crate::emit_schema::emit_message_schema;
use crate::emit_writer::emit_message_writer;
use crate::ir::IrEnum;
use crate::ir::IrEnumValue;
use crate::ir::IrField;
use crate::ir::IrFieldOrOneOf;
use crate::ir::IrMessage;
use crate::ir::IrOneOf;
use crate::naming::to_pascal_case;
use crate::rust_type::ResolvedFieldType;

/// The four generated sources for one message, ready to be written
/// under their respective sub-package directories.
pub struct GeneratedMessage {
    pub message_name: String,
    pub model_source: String,
    pub schema_source: String,
    pub parser_source: String,
    pub writer_source: String,
}

pub struct GeneratedEnum {
    pub enum_name: String,
    pub model_source: String,
}

fn resolve_field_type(
    ty: &FieldTypeRef,
    ctx: &ResolverContext,
    table: &SymbolTable,
    enclosing_scopes: &[&str],
) -> SchemaResult<ResolvedFieldType> {
    match ty {
        FieldTypeRef::Scalar(scalar) => Ok(ResolvedFieldType::Scalar(*scalar)),
        FieldTypeRef::Named(_) => {
            let fqn = ctx.resolve(ty, enclosing_scopes)?;
            let symbol = table
                .lookup_fqn(&fqn)
                .expect("resolve() only returns fully-qualified names present in the symbol table");
            Ok(match symbol.kind {
                SymbolKind::Message => ResolvedFieldType::Message(fqn),
                SymbolKind::Enum => ResolvedFieldType::Enum(fqn),
            })
        }
    }
}

fn build_ir_field(field: &SchemaField, ctx: &ResolverContext, table: &SymbolTable, scopes: &[&str]) -> SchemaResult<IrField> {
    let ty = resolve_field_type(&field.ty, ctx, table, scopes)?;
    if field.optional {
        // `optional` is carried through a well-known wrapper message,
        // and only nine scalar primitives have one — message fields are
        // already nullable without a wrapper, and no `EnumValue` wrapper
        // exists upstream.
        let has_wrapper = matches!(&ty, ResolvedFieldType::Scalar(t) if t.wrapper_type_name().is_some());
        if !has_wrapper {
            return Err(pbj_schema::SchemaError::UnsupportedFeature {
                feature: format!("optional field `{}` of a type with no well-known wrapper", field.name),
                file: ctx.file_path().to_path_buf(),
                loc: field.loc,
            });
        }
    }
    Ok(IrField::new(field.name.clone(), ty, field.repeated, field.optional, field.number))
}

fn build_ir_message(
    message: &SchemaMessage,
    ctx: &ResolverContext,
    table: &SymbolTable,
    enclosing_scopes: &[&str],
) -> SchemaResult<IrMessage> {
    let mut scopes: Vec<&str> = enclosing_scopes.to_vec();
    scopes.push(&message.name);

    let mut fields = Vec::new();
    for fo in &message.fields {
        match fo {
            SchemaFieldOrOneOf::Field(f) => {
                fields.push(IrFieldOrOneOf::Field(build_ir_field(f, ctx, table, &scopes)?));
            }
            SchemaFieldOrOneOf::OneOf(o) => {
                let mut variants = Vec::new();
                for v in &o.variants {
                    variants.push(build_ir_field(v, ctx, table, &scopes)?);
                }
                fields.push(IrFieldOrOneOf::OneOf(IrOneOf::new(o.name.clone(), variants, &message.name)));
            }
        }
    }

    Ok(IrMessage {
        name: message.name.clone(),
        fields,
        comparable: message.comparable.clone(),
    })
}

fn build_ir_enum(e: &SchemaEnum) -> IrEnum {
    IrEnum {
        name: e.name.clone(),
        values: e
            .values
            .iter()
            .map(|v| IrEnumValue {
                name: v.name.clone(),
                number: v.number,
            })
            .collect(),
    }
}

/// Parser/writer bodies call default trait methods (`has_remaining`,
/// `push_limit`, `write_bytes`, `position`, ...) on a generic `impl
/// Trait` parameter, which resolves only with the trait itself in
/// scope — hence each output file carries the `use` its method calls
/// need, rather than fully-qualified `<T as Trait>::method(...)` calls.
const PARSER_IMPORTS: &str = "use pbj_runtime::io::ReadableSequentialData;\nuse pbj_runtime::io::SequentialData;\n\n";
const WRITER_IMPORTS: &str = "use pbj_runtime::io::WritableSequentialData;\nuse pbj_runtime::io::SequentialData;\n\n";

fn emit_message(message: &IrMessage) -> GeneratedMessage {
    let mut model_w = CodeWriter::new();
    emit_message_model(&mut model_w, message);

    let mut schema_w = CodeWriter::new();
    emit_message_schema(&mut schema_w, message);

    let mut parser_w = CodeWriter::new();
    emit_message_parser(&mut parser_w, message);

    let mut writer_w = CodeWriter::new();
    emit_message_writer(&mut writer_w, message);

    GeneratedMessage {
        message_name: message.name.clone(),
        model_source: model_w.finish(),
        schema_source: schema_w.finish(),
        parser_source: format!("{}{}", PARSER_IMPORTS, parser_w.finish()),
        writer_source: format!("{}{}", WRITER_IMPORTS, writer_w.finish()),
    }
}

/// Walks a message's nested messages/enums depth-first, collecting a
/// flat list of every message (including nested ones) alongside the
/// enclosing-scope path each needs for resolution.
fn collect_messages<'a>(message: &'a SchemaMessage, scopes: Vec<&'a str>, out: &mut Vec<(&'a SchemaMessage, Vec<&'a str>)>) {
    out.push((message, scopes.clone()));
    let mut nested_scopes = scopes;
    nested_scopes.push(&message.name);
    for nested in &message.nested_messages {
        collect_messages(nested, nested_scopes.clone(), out);
    }
}

fn collect_enums<'a>(message: &'a SchemaMessage, out: &mut Vec<&'a SchemaEnum>) {
    out.extend(message.nested_enums.iter());
    for nested in &message.nested_messages {
        collect_enums(nested, out);
    }
}

/// Generates all four sources for every message (including nested
/// messages) and every enum declared in `file`, given the whole run's
/// frozen symbol table.
pub fn generate_file(
    file: &FileDescriptor,
    all_files: &[FileDescriptor],
    table: &SymbolTable,
) -> EmitResult<(Vec<GeneratedMessage>, Vec<GeneratedEnum>)> {
    let ctx = ResolverContext::new(table, file, all_files).map_err(|e| EmitError {
        file: file.path.clone(),
        message_name: String::new(),
        source: e,
    })?;

    let mut top_level_messages = Vec::new();
    for m in &file.messages {
        collect_messages(m, Vec::new(), &mut top_level_messages);
    }

    let mut generated_messages = Vec::new();
    for (message, scopes) in &top_level_messages {
        let ir = build_ir_message(message, &ctx, table, scopes).map_err(|e| EmitError {
            file: file.path.clone(),
            message_name: message.name.clone(),
            source: e,
        })?;
        generated_messages.push(emit_message(&ir));
    }

    let mut enums: Vec<&SchemaEnum> = file.enums.iter().collect();
    for m in &file.messages {
        collect_enums(m, &mut enums);
    }
    let generated_enums = enums
        .into_iter()
        .map(|e| {
            let ir = build_ir_enum(e);
            let mut w = CodeWriter::new();
            emit_enum_model(&mut w, &ir);
            GeneratedEnum {
                enum_name: e.name.clone(),
                model_source: w.finish(),
            }
        })
        .collect();

    Ok((generated_messages, generated_enums))
}

/// The package-relative sub-directory a generated source of `kind`
/// lives under, per the four-emitter pipeline's output layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputKind {
    Model,
    Schema,
    Parser,
    Writer,
}

impl OutputKind {
    pub fn sub_package(self) -> &'static str {
        match self {
            OutputKind::Model => "model",
            OutputKind::Schema => "schemas",
            OutputKind::Parser => "parsers",
            OutputKind::Writer => "writers",
        }
    }
}

pub fn file_name_for(message_or_enum_name: &str) -> String {
    format!("{}.rs", to_pascal_case(message_or_enum_name))
}

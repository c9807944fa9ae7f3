//! Four-emitter code-generation pipeline: turns a resolved
//! `pbj_schema::model::FileDescriptor` into Rust source for a message's
//! immutable model, its field-schema table, its wire parser, and its
//! wire writer/size-measurer.

pub mod code_writer;
pub mod emit_model;
pub mod emit_parser;
pub mod emit_schema;
pub mod emit_writer;
pub mod error;
pub mod ir;
pub mod naming;
pub mod pipeline;
pub mod rust_type;
pub mod well_known;

pub use error::EmitError;
pub use error::EmitResult;
pub use pipeline::generate_file;
pub use pipeline::GeneratedEnum;
pub use pipeline::GeneratedMessage;
pub use pipeline::OutputKind;

//! Emitter-pipeline error: a resolution failure that surfaced while
//! building one specific message's IR, annotated with which message and
//! which file it was. The underlying cause is always a [`SchemaError`]
//! — the emitters themselves are infallible functions over an
//! already-validated IR.

use std::fmt;
use std::path::PathBuf;

use pbj_schema::SchemaError;

#[derive(Debug)]
pub struct EmitError {
    pub file: PathBuf,
    pub message_name: String,
    pub source: SchemaError,
}

impl fmt::Display for EmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: failed emitting `{}`: {}", self.file.display(), self.message_name, self.source)
    }
}

impl std::error::Error for EmitError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

pub type EmitResult<T> = Result<T, EmitError>;

//! Driver-level error taxonomy: parse/resolve failures from the schema
//! front end, emit failures from the codegen pipeline (already carrying
//! the offending file/message name), and plain I/O failure reading
//! sources or writing the output tree.

use std::fmt;
use std::io;

use pbj_codegen::EmitError;
use pbj_schema::SchemaError;

#[derive(Debug)]
pub enum DriverError {
    /// Parse error, unresolved type, missing import, or unsupported
    /// feature (`map<>`, proto2 groups/extensions/services) encountered
    /// before emission — reading sources or building the symbol table.
    Schema(SchemaError),
    /// A resolution failure that surfaced while building one specific
    /// message's IR, after its file already parsed and resolved.
    Emit(EmitError),
    Io(io::Error),
}

impl fmt::Display for DriverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DriverError::Schema(e) => write!(f, "{}", e),
            DriverError::Emit(e) => write!(f, "{}", e),
            DriverError::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for DriverError {}

impl From<SchemaError> for DriverError {
    fn from(e: SchemaError) -> DriverError {
        DriverError::Schema(e)
    }
}

impl From<EmitError> for DriverError {
    fn from(e: EmitError) -> DriverError {
        DriverError::Emit(e)
    }
}

impl From<io::Error> for DriverError {
    fn from(e: io::Error) -> DriverError {
        DriverError::Io(e)
    }
}

pub type DriverResult<T> = Result<T, DriverError>;

/// Exit codes per the CLI surface: success, compilation error, I/O error.
impl DriverError {
    pub fn exit_code(&self) -> i32 {
        match self {
            DriverError::Schema(_) | DriverError::Emit(_) => 1,
            DriverError::Io(_) => 2,
        }
    }
}

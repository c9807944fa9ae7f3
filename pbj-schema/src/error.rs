use std::fmt;
use std::path::PathBuf;

use crate::lexer::Loc;

/// Compiler-surfaced errors: malformed source, unresolved
/// references, missing imports, and use of unsupported proto2/grouping
/// features. Every variant is hand-written with a manual `Display`,
/// in the vein of `ProtobufError`/JSON `ParseErrorWithoutLoc`, rather
/// than a derive-macro error crate.
#[derive(Debug)]
pub enum SchemaError {
    /// Malformed `.proto` source; carries the file and position.
    SchemaParseError {
        file: PathBuf,
        loc: Loc,
        message: String,
    },
    /// A referenced message/enum name could not be resolved.
    UnresolvedType {
        name: String,
        file: PathBuf,
        imports: Vec<String>,
    },
    /// An `import` statement does not map to any known source file.
    MissingImport { import: String, file: PathBuf },
    /// `map<>`, proto2 groups, extensions, or services were encountered.
    UnsupportedFeature { feature: String, file: PathBuf, loc: Loc },
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaError::SchemaParseError { file, loc, message } => write!(
                f,
                "{}:{}:{}: {}",
                file.display(),
                loc.line,
                loc.col,
                message
            ),
            SchemaError::UnresolvedType { name, file, imports } => write!(
                f,
                "{}: could not resolve type `{}` (imports searched: {})",
                file.display(),
                name,
                if imports.is_empty() {
                    "none".to_owned()
                } else {
                    imports.join(", ")
                }
            ),
            SchemaError::MissingImport { import, file } => write!(
                f,
                "{}: import `{}` does not match any input source file (use forward slashes)",
                file.display(),
                import
            ),
            SchemaError::UnsupportedFeature { feature, file, loc } => write!(
                f,
                "{}:{}:{}: {} not supported",
                file.display(),
                loc.line,
                loc.col,
                feature
            ),
        }
    }
}

impl std::error::Error for SchemaError {}

pub type SchemaResult<T> = Result<T, SchemaError>;

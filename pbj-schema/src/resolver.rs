//! Cross-file symbol resolution: a global pass over every input file
//! builds a table from fully-qualified name to its declaring file and
//! kind, then each file resolves its own field types against that table
//! through its own package and import list.

use std::collections::HashMap;
use std::path::Path;
use std::path::PathBuf;

use crate::error::SchemaError;
use crate::error::SchemaResult;
use crate::model::Enum;
use crate::model::FieldTypeRef;
use crate::model::FileDescriptor;
use crate::model::Message;
use crate::parser::normalize_import_path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Message,
    Enum,
}

#[derive(Debug, Clone)]
pub struct Symbol {
    pub kind: SymbolKind,
    pub declaring_file: PathBuf,
    pub java_package_override: Option<String>,
}

/// The frozen, whole-run symbol table (global pass). Built once over
/// every input file before any per-file resolution happens, so that
/// resolution order among files never matters.
pub struct SymbolTable {
    by_fqn: HashMap<String, Symbol>,
    files_by_normalized_path: HashMap<String, PathBuf>,
}

fn walk_messages(
    fqn_prefix: &str,
    messages: &[Message],
    file: &Path,
    java_package_override: Option<&str>,
    out: &mut HashMap<String, Symbol>,
) {
    for message in messages {
        let fqn = format!("{}.{}", fqn_prefix, message.name);
        out.insert(
            fqn.clone(),
            Symbol {
                kind: SymbolKind::Message,
                declaring_file: file.to_path_buf(),
                java_package_override: java_package_override.map(str::to_owned),
            },
        );
        walk_messages(&fqn, &message.nested_messages, file, java_package_override, out);
        walk_enums(&fqn, &message.nested_enums, file, java_package_override, out);
    }
}

fn walk_enums(
    fqn_prefix: &str,
    enums: &[Enum],
    file: &Path,
    java_package_override: Option<&str>,
    out: &mut HashMap<String, Symbol>,
) {
    for e in enums {
        let fqn = format!("{}.{}", fqn_prefix, e.name);
        out.insert(
            fqn,
            Symbol {
                kind: SymbolKind::Enum,
                declaring_file: file.to_path_buf(),
                java_package_override: java_package_override.map(str::to_owned),
            },
        );
    }
}

impl SymbolTable {
    /// Builds the global symbol table from every parsed file. Qualifies
    /// each message/enum's name by its file's package, recursing into
    /// nested types with dotted names.
    pub fn build(files: &[FileDescriptor]) -> SymbolTable {
        let mut by_fqn = HashMap::new();
        let mut files_by_normalized_path = HashMap::new();

        for file in files {
            let root = file.package.clone().unwrap_or_default();
            let prefix = if root.is_empty() {
                String::new()
            } else {
                format!(".{}", root)
            };
            walk_messages(&prefix, &file.messages, &file.path, file.java_package_override.as_deref(), &mut by_fqn);
            walk_enums(&prefix, &file.enums, &file.path, file.java_package_override.as_deref(), &mut by_fqn);

            let normalized = normalize_import_path(&file.path.to_string_lossy()).to_string_lossy().to_lowercase();
            files_by_normalized_path.insert(normalized, file.path.clone());
        }

        SymbolTable {
            by_fqn,
            files_by_normalized_path,
        }
    }

    pub fn lookup_fqn(&self, fqn: &str) -> Option<&Symbol> {
        self.by_fqn.get(fqn)
    }

    /// Resolves an `import` path against the set of known input files.
    /// Matching is case-insensitive on the normalized (forward-slash)
    /// path, per the relaxed matching rule.
    pub fn resolve_import_path(&self, import_path: &str) -> Option<&Path> {
        let normalized = normalize_import_path(import_path).to_string_lossy().to_lowercase();
        self.files_by_normalized_path.get(&normalized).map(PathBuf::as_path)
    }
}

/// Per-file resolution context: resolves an unqualified or
/// partially-qualified type name first against the file's own package,
/// then against each imported file's package, in declaration order.
pub struct ResolverContext<'a> {
    table: &'a SymbolTable,
    file: &'a FileDescriptor,
    import_packages: Vec<String>,
}

impl<'a> ResolverContext<'a> {
    /// The source file this context resolves field types for, used by
    /// callers that need to attach a location to an error raised after
    /// resolution (e.g. an unsupported `optional` field type).
    pub fn file_path(&self) -> &Path {
        &self.file.path
    }

    pub fn new(table: &'a SymbolTable, file: &'a FileDescriptor, all_files: &'a [FileDescriptor]) -> SchemaResult<ResolverContext<'a>> {
        let mut import_packages = Vec::new();
        for import in &file.imports {
            let resolved_path = table.resolve_import_path(&import.path).ok_or_else(|| SchemaError::MissingImport {
                import: import.path.clone(),
                file: file.path.clone(),
            })?;
            let imported_file = all_files
                .iter()
                .find(|f| f.path == resolved_path)
                .expect("resolve_import_path only returns paths present in all_files");
            import_packages.push(imported_file.package.clone().unwrap_or_default());
        }
        Ok(ResolverContext {
            table,
            file,
            import_packages,
        })
    }

    /// Resolves a `Named` field type reference to its fully-qualified
    /// name. Tries: (1) own package, by appending the name to each
    /// enclosing scope from innermost to the file's root package, (2)
    /// each import's package, in declaration order, (3) the name already
    /// being fully qualified (leading `.`).
    pub fn resolve(&self, ty: &FieldTypeRef, enclosing_scopes: &[&str]) -> SchemaResult<String> {
        let name = match ty {
            FieldTypeRef::Scalar(_) => panic!("resolve() called on a scalar field type"),
            FieldTypeRef::Named(n) => n,
        };

        if let Some(stripped) = name.strip_prefix('.') {
            let fqn = format!(".{}", stripped);
            if self.table.lookup_fqn(&fqn).is_some() {
                return Ok(fqn);
            }
            return Err(self.unresolved(name));
        }

        let own_package = self.file.package.clone().unwrap_or_default();

        // innermost enclosing scope outward, then own package, then root.
        for depth in (0..=enclosing_scopes.len()).rev() {
            let mut scope_parts: Vec<&str> = Vec::new();
            if !own_package.is_empty() {
                scope_parts.push(own_package.as_str());
            }
            scope_parts.extend(enclosing_scopes[..depth].iter().copied());
            let candidate = if scope_parts.is_empty() {
                format!(".{}", name)
            } else {
                format!(".{}.{}", scope_parts.join("."), name)
            };
            if self.table.lookup_fqn(&candidate).is_some() {
                return Ok(candidate);
            }
        }

        for import_package in &self.import_packages {
            let candidate = if import_package.is_empty() {
                format!(".{}", name)
            } else {
                format!(".{}.{}", import_package, name)
            };
            if self.table.lookup_fqn(&candidate).is_some() {
                return Ok(candidate);
            }
        }

        Err(self.unresolved(name))
    }

    fn unresolved(&self, name: &str) -> SchemaError {
        SchemaError::UnresolvedType {
            name: name.to_owned(),
            file: self.file.path.clone(),
            imports: self.file.imports.iter().map(|i| i.path.clone()).collect(),
        }
    }
}

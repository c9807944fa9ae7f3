//! Wires the schema front end to the emitter pipeline and writes the
//! output tree.
//!
//! 1. Walk every source root for `.proto` files and parse each one.
//! 2. Run the global symbol pass over every parsed file.
//! 3. For every file, for every top-level message and enum, run all
//!    emitters and write the results under the package-mirroring
//!    output directory.
//!
//! Errors from one file are logged and that file is skipped so the
//! driver can report as many failures as possible in one run; the
//! process still exits non-zero if any file failed.

use std::fs;
use std::path::Path;
use std::path::PathBuf;

use pbj_schema::model::FileDescriptor;
use pbj_schema::resolver::SymbolTable;

use crate::error::DriverError;
use crate::error::DriverResult;
use pbj_codegen::pipeline::generate_file;
use pbj_codegen::pipeline::file_name_for;
use pbj_codegen::pipeline::GeneratedEnum;
use pbj_codegen::pipeline::GeneratedMessage;
use pbj_codegen::pipeline::OutputKind;

pub struct Options {
    pub sources: Vec<PathBuf>,
    pub out: PathBuf,
    pub base_package: Option<String>,
}

/// Returns `Ok(())` if every discovered file emitted cleanly, or the
/// first-collated error otherwise, after logging every failure seen.
pub fn run(opts: &Options) -> DriverResult<()> {
    let proto_paths = discover_proto_files(&opts.sources)?;
    log::info!("discovered {} .proto file(s)", proto_paths.len());
    if proto_paths.is_empty() {
        log::warn!("no .proto files found under the given source roots");
    }

    let mut files = Vec::with_capacity(proto_paths.len());
    let mut read_errors: Vec<DriverError> = Vec::new();
    for path in &proto_paths {
        match read_and_parse(path) {
            Ok(file) => files.push(file),
            Err(e) => {
                log::error!("{}", e);
                read_errors.push(e);
            }
        }
    }

    if let Some(first) = read_errors.into_iter().next() {
        return Err(first);
    }

    log::info!("resolving symbol table over {} file(s)", files.len());
    let table = SymbolTable::build(&files);

    let mut first_error: Option<DriverError> = None;
    for file in &files {
        if let Err(e) = emit_and_write_file(file, &files, &table, opts) {
            log::error!("{}", e);
            if first_error.is_none() {
                first_error = Some(e);
            }
        }
    }

    match first_error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

fn discover_proto_files(sources: &[PathBuf]) -> DriverResult<Vec<PathBuf>> {
    let mut found = Vec::new();
    for root in sources {
        for entry in walkdir::WalkDir::new(root) {
            let entry = entry.map_err(|e| DriverError::Io(io_error_from_walkdir(e)))?;
            if entry.file_type().is_file() && entry.path().extension().map(|e| e == "proto").unwrap_or(false) {
                found.push(entry.path().to_path_buf());
            }
        }
    }
    found.sort();
    Ok(found)
}

fn io_error_from_walkdir(e: walkdir::Error) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
}

fn read_and_parse(path: &Path) -> DriverResult<FileDescriptor> {
    log::info!("parsing {}", path.display());
    let source = fs::read_to_string(path)?;
    let file = pbj_schema::parse_file(path, &source)?;
    Ok(file)
}

/// The effective package a file's generated code lands under: a
/// `pbj.java_package` override replaces the declared package outright;
/// otherwise `--base-package`, if given, is prepended to it.
fn effective_package(file: &FileDescriptor, base_package: Option<&str>) -> String {
    if let Some(override_pkg) = &file.java_package_override {
        return override_pkg.clone();
    }
    match (base_package, &file.package) {
        (Some(base), Some(pkg)) if !pkg.is_empty() => format!("{}.{}", base, pkg),
        (Some(base), _) => base.to_owned(),
        (None, Some(pkg)) => pkg.clone(),
        (None, None) => String::new(),
    }
}

fn package_dir(out: &Path, package: &str) -> PathBuf {
    let mut dir = out.to_path_buf();
    for segment in package.split('.').filter(|s| !s.is_empty()) {
        dir.push(segment);
    }
    dir
}

fn write_source(dir: &Path, kind: OutputKind, file_name: &str, source: &str) -> DriverResult<()> {
    let sub_dir = dir.join(kind.sub_package());
    fs::create_dir_all(&sub_dir)?;
    let path = sub_dir.join(file_name);
    fs::write(&path, source)?;
    log::info!("wrote {}", path.display());
    Ok(())
}

fn write_message(dir: &Path, message: &GeneratedMessage) -> DriverResult<()> {
    let file_name = file_name_for(&message.message_name);
    write_source(dir, OutputKind::Model, &file_name, &message.model_source)?;
    write_source(dir, OutputKind::Schema, &file_name, &message.schema_source)?;
    write_source(dir, OutputKind::Parser, &file_name, &message.parser_source)?;
    write_source(dir, OutputKind::Writer, &file_name, &message.writer_source)?;
    Ok(())
}

fn write_enum(dir: &Path, e: &GeneratedEnum) -> DriverResult<()> {
    let file_name = file_name_for(&e.enum_name);
    write_source(dir, OutputKind::Model, &file_name, &e.model_source)
}

fn emit_and_write_file(file: &FileDescriptor, all_files: &[FileDescriptor], table: &SymbolTable, opts: &Options) -> DriverResult<()> {
    let (messages, enums) = generate_file(file, all_files, table)?;

    let package = effective_package(file, opts.base_package.as_deref());
    let dir = package_dir(&opts.out, &package);

    for message in &messages {
        log::info!("{}: emitting message `{}`", file.path.display(), message.message_name);
        write_message(&dir, message).map_err(|e| log_emit_failure(file, &message.message_name, e))?;
    }
    for e in &enums {
        log::info!("{}: emitting enum `{}`", file.path.display(), e.enum_name);
        write_enum(&dir, e).map_err(|err| log_emit_failure(file, &e.enum_name, err))?;
    }
    Ok(())
}

/// Logs which file/message was being written when `e` happened, then
/// passes it through unchanged — an I/O failure stays an I/O failure
/// (exit code 2) even though it surfaced while emitting a message.
fn log_emit_failure(file: &FileDescriptor, name: &str, e: DriverError) -> DriverError {
    log::error!("{}: failed writing output for `{}`", file.path.display(), name);
    e
}

#[cfg(test)]
mod test {
    use super::*;
    use pbj_schema::model::Syntax;

    fn file_with(package: Option<&str>, java_package_override: Option<&str>) -> FileDescriptor {
        FileDescriptor {
            path: PathBuf::from("a.proto"),
            package: package.map(str::to_owned),
            syntax: Syntax::Proto3,
            imports: Vec::new(),
            messages: Vec::new(),
            enums: Vec::new(),
            services: Vec::new(),
            java_package_override: java_package_override.map(str::to_owned),
        }
    }

    #[test]
    fn java_package_override_replaces_the_declared_package_outright() {
        let file = file_with(Some("example.v1"), Some("com.acme.example"));
        assert_eq!(effective_package(&file, Some("ignored")), "com.acme.example");
    }

    #[test]
    fn base_package_is_prepended_when_no_override_is_set() {
        let file = file_with(Some("example.v1"), None);
        assert_eq!(effective_package(&file, Some("com.acme")), "com.acme.example.v1");
    }

    #[test]
    fn declared_package_is_used_verbatim_without_a_base_package() {
        let file = file_with(Some("example.v1"), None);
        assert_eq!(effective_package(&file, None), "example.v1");
    }

    #[test]
    fn package_dotted_path_becomes_nested_directories() {
        let dir = package_dir(Path::new("/out"), "com.acme.example");
        assert_eq!(dir, PathBuf::from("/out/com/acme/example"));
    }

    #[test]
    fn empty_package_writes_directly_under_the_output_root() {
        let dir = package_dir(Path::new("/out"), "");
        assert_eq!(dir, PathBuf::from("/out"));
    }
}

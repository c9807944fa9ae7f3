//! CLI entry point. Parses source directories, a required output root,
//! and an optional base package, then hands off to
//! [`pbj_compiler::driver::run`].

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use pbj_compiler::driver;

/// Generates PBJ model/schema/parser/writer Rust sources from Protobuf 3
/// schema files.
#[derive(Parser, Debug)]
#[command(name = "pbjc", version, about)]
struct Cli {
    /// One or more source directories to search for `.proto` files.
    #[arg(required = true)]
    sources: Vec<PathBuf>,

    /// Output root directory for generated sources.
    #[arg(long)]
    out: PathBuf,

    /// Prefix prepended to a file's package when it does not set
    /// `pbj.java_package`.
    #[arg(long = "base-package")]
    base_package: Option<String>,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let opts = driver::Options {
        sources: cli.sources,
        out: cli.out,
        base_package: cli.base_package,
    };

    match driver::run(&opts) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::from(e.exit_code() as u8)
        }
    }
}

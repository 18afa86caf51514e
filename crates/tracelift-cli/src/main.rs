//! Command-line entry point
//!
//! `tracelift migrate` walks trace files up to the latest schema version and
//! rewrites them in place; `tracelift validate` checks one file against the
//! JSON schema and its own cross-references. Both log through `tracing` to
//! stderr; the exit code reports whether every file came through clean.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgAction, Command};
use tracing::{debug, error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use tracelift_format::TraceDocument;
use tracelift_migrate::{MigrationOutcome, Migrator};
use tracelift_validate::{check_document, SchemaSource, SchemaValidator};

fn cli() -> Command {
    Command::new("tracelift")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Migration and validation for workflow trace documents")
        .arg_required_else_help(true)
        .subcommand(
            Command::new("migrate")
                .about("Migrate trace files to the latest schema version, in place")
                .arg(
                    Arg::new("path")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Trace file, or a directory walked recursively for .json files"),
                )
                .arg(
                    Arg::new("debug")
                        .long("debug")
                        .action(ArgAction::SetTrue)
                        .help("Enable debug logging"),
                ),
        )
        .subcommand(
            Command::new("validate")
                .about("Validate a trace file against the schema and its own references")
                .arg(
                    Arg::new("file")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Trace file to validate"),
                )
                .arg(
                    Arg::new("schema")
                        .short('s')
                        .long("schema")
                        .value_parser(value_parser!(PathBuf))
                        .help("Schema file (defaults to a local copy, then the published schema)"),
                )
                .arg(
                    Arg::new("debug")
                        .long("debug")
                        .action(ArgAction::SetTrue)
                        .help("Enable debug logging"),
                ),
        )
}

fn main() {
    let matches = cli().get_matches();

    let result = match matches.subcommand() {
        Some(("migrate", args)) => {
            let path = args.get_one::<PathBuf>("path").unwrap();
            init_logging(args.get_flag("debug")).map(|()| run_migrate(path))
        }
        Some(("validate", args)) => {
            let file = args.get_one::<PathBuf>("file").unwrap();
            let source = match args.get_one::<PathBuf>("schema") {
                Some(path) => SchemaSource::File(path.clone()),
                None => SchemaSource::Auto,
            };
            init_logging(args.get_flag("debug")).map(|()| run_validate(file, &source))
        }
        _ => Ok(2),
    };

    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("{err:#}");
            std::process::exit(1);
        }
    }
}

/// Honors `RUST_LOG` when set; otherwise `--debug` picks the level.
fn init_logging(debug: bool) -> Result<()> {
    let fallback = if debug { "debug" } else { "info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .try_init()
        .context("failed to initialize logging")?;
    Ok(())
}

/// Migrate every trace file under the path. Per-file failures are logged and
/// counted; the batch keeps going.
fn run_migrate(path: &Path) -> i32 {
    let mut files = Vec::new();
    if let Err(err) = collect_json_files(path, &mut files) {
        error!("{err:#}");
        return 1;
    }
    if files.is_empty() {
        warn!(path = %path.display(), "no trace files found");
        return 0;
    }
    files.sort();

    let migrator = Migrator::new();
    let mut migrated = 0_usize;
    let mut failed = 0_usize;

    for file in &files {
        match migrate_file(&migrator, file) {
            Ok(true) => migrated += 1,
            Ok(false) => {}
            Err(err) => {
                failed += 1;
                error!(file = %file.display(), "{err:#}");
            }
        }
    }

    info!("Successfully migrated {migrated} instance file(s).");
    if failed > 0 {
        error!("{failed} file(s) failed to migrate");
        1
    } else {
        0
    }
}

/// Migrate one file in place. Returns whether the file was rewritten; an
/// unsupported version is a skip, not a failure.
fn migrate_file(migrator: &Migrator, path: &Path) -> Result<bool> {
    let doc =
        TraceDocument::load(path).with_context(|| format!("loading {}", path.display()))?;

    match migrator.migrate(doc)? {
        MigrationOutcome::Migrated { document, from } => {
            document
                .save(path)
                .with_context(|| format!("writing {}", path.display()))?;
            debug!(file = %path.display(), %from, "migrated");
            Ok(true)
        }
        MigrationOutcome::UpToDate { document } => {
            document
                .save(path)
                .with_context(|| format!("writing {}", path.display()))?;
            debug!(file = %path.display(), "already at the latest version, cleaned only");
            Ok(true)
        }
        MigrationOutcome::Skipped { version, .. } => {
            warn!("unable to migrate from version {version}: {}", path.display());
            Ok(false)
        }
    }
}

/// Gather trace files: the path itself, or every `.json` under a directory,
/// recursively.
fn collect_json_files(path: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    let meta =
        std::fs::metadata(path).with_context(|| format!("cannot access {}", path.display()))?;
    if !meta.is_dir() {
        files.push(path.to_path_buf());
        return Ok(());
    }

    let entries = std::fs::read_dir(path)
        .with_context(|| format!("cannot read directory {}", path.display()))?;
    for entry in entries {
        let entry =
            entry.with_context(|| format!("cannot read directory {}", path.display()))?;
        let child = entry.path();
        if child.is_dir() {
            collect_json_files(&child, files)?;
        } else if child.extension().is_some_and(|ext| ext == "json") {
            files.push(child);
        }
    }
    Ok(())
}

fn run_validate(file: &Path, source: &SchemaSource) -> i32 {
    match validate_file(file, source) {
        Ok(true) => 0,
        Ok(false) => 1,
        Err(err) => {
            error!("{err:#}");
            1
        }
    }
}

/// Run both passes over one file, logging every violation. The schema pass
/// reports first, so a document too malformed for the reference pass still
/// gets its schema diagnostics. Returns whether the file is valid.
fn validate_file(file: &Path, source: &SchemaSource) -> Result<bool> {
    let doc =
        TraceDocument::load(file).with_context(|| format!("loading {}", file.display()))?;

    let schema = source.load().context("resolving the schema")?;
    let validator = SchemaValidator::compile(&schema).context("compiling the schema")?;

    let syntax = validator.validate(&doc.clone().into_value());
    for violation in syntax.violations() {
        error!("{violation}");
    }

    let semantics = check_document(&doc)
        .with_context(|| format!("checking references in {}", file.display()))?;
    for violation in semantics.violations() {
        error!("{violation}");
    }

    if syntax.is_valid() && semantics.is_valid() {
        info!("The instance file has a valid trace format.");
        Ok(true)
    } else {
        Ok(false)
    }
}

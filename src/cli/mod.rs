//! The `verdict` command-line interface.
//!
//! Replays recorded test snapshots through the same teardown path a host
//! adapter uses, and lists the taxonomy vocabularies.

use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;

use clap::Parser;
use miette::Report;

use crate::cli::args::{Command, VerdictArgs};
use crate::config::{ReportFormat, ReportPolicy, ReporterConfig};
use crate::diagnostics::{Result, VerdictError};
use crate::hook::TeardownHook;
use crate::report::StdoutSink;
use crate::taxonomy::{Priority, TestArea, TestLevel, TestType};

pub mod args;
pub mod snapshot;

pub use snapshot::{discover_snapshot_files, Snapshot};

// ============================================================================
// MAIN ENTRY POINT
// ============================================================================

/// The main entry point for the CLI.
pub fn run() {
    let args = VerdictArgs::parse();

    let result = match args.command {
        Command::Render {
            path,
            format,
            config,
            all,
        } => render(&path, format, config, all),
        Command::Taxonomy => {
            print_taxonomy();
            Ok(())
        }
    };

    if let Err(e) = result {
        print_error(e);
        process::exit(1);
    }
}

pub fn print_error(error: VerdictError) {
    let report = Report::new(error);
    eprintln!("{report:?}");
}

// ============================================================================
// RENDER
// ============================================================================

/// Builds the effective configuration: file (or defaults), then environment,
/// then command-line flags.
pub fn resolve_config(
    config_path: Option<&Path>,
    format: Option<ReportFormat>,
    all: bool,
) -> Result<ReporterConfig> {
    let mut config = match config_path {
        Some(path) => ReporterConfig::load(path)?,
        None => ReporterConfig::default(),
    }
    .with_env_overrides()?;

    if let Some(format) = format {
        config = config.with_format(format);
    }
    if all {
        config = config.with_policy(ReportPolicy::Always);
    }
    Ok(config)
}

fn render(
    path: &Path,
    format: Option<ReportFormat>,
    config_path: Option<PathBuf>,
    all: bool,
) -> Result<()> {
    let config = resolve_config(config_path.as_deref(), format, all)?;
    let sink = Arc::new(StdoutSink::new(config.use_colors));
    let hook = TeardownHook::new(config, sink);

    for file in discover_snapshot_files(path)? {
        let snapshot = Snapshot::load(&file)?;
        hook.on_teardown(&snapshot.properties, &snapshot.identity, &snapshot.outcome)?;
    }
    Ok(())
}

// ============================================================================
// TAXONOMY
// ============================================================================

fn print_taxonomy() {
    println!("Priority");
    for priority in Priority::all() {
        println!("  {:<14}{}", priority.as_str(), priority.ordinal());
    }
    print_vocabulary("Test Level", TestLevel::all().map(|v| v.as_str()));
    print_vocabulary("Test Type", TestType::all().map(|v| v.as_str()));
    print_vocabulary("Test Area", TestArea::all().map(|v| v.as_str()));
}

fn print_vocabulary<'a>(title: &str, labels: impl Iterator<Item = &'a str>) {
    println!("{}", title);
    for label in labels {
        println!("  {}", label);
    }
}

//! Command-line arguments and subcommands for the `verdict` binary.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::ReportFormat;

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "verdict",
    version,
    about = "Normalize test metadata and report test outcomes."
)]
pub struct VerdictArgs {
    #[command(subcommand)]
    pub command: Command,
}

/// An enumeration of all available CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Normalize and report recorded test snapshots.
    Render {
        /// A snapshot file (YAML or JSON) or a directory of snapshots.
        #[arg(required = true)]
        path: PathBuf,
        /// Output format: tabular, json or json-lines.
        #[arg(long, short)]
        format: Option<ReportFormat>,
        /// YAML reporter configuration file.
        #[arg(long, short)]
        config: Option<PathBuf>,
        /// Report passing tests too.
        #[arg(long)]
        all: bool,
    },
    /// List the priority and category vocabularies.
    Taxonomy,
}

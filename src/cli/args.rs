//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::Parser;
use std::path::PathBuf;

/// gaedeploy - Deployment helpers for app.yaml-described applications.
///
/// Tasks run left to right. A leading `production[:version]` or
/// `staging[:version]` selects the deployment target for the tasks after it:
///
///   gaedeploy staging deploy:tag
///   gaedeploy production:v2 shell
///   gaedeploy shell:cmd="print 1"
#[derive(Debug, Parser)]
#[command(name = "gaedeploy")]
#[command(author, version, verbatim_doc_comment)]
pub struct Cli {
    /// Tasks to run, as `name[:arg,key=value,...]`
    #[arg(value_name = "TASK")]
    pub tasks: Vec<String>,

    /// Path to project root (overrides app.yaml discovery)
    #[arg(short, long, env = "GAEDEPLOY_PROJECT")]
    pub project: Option<PathBuf>,

    /// Path to settings file (overrides .gaedeploy.yml merging)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Show verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Print commands instead of running them
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Skip the production confirmation
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// List available tasks and exit
    #[arg(short, long)]
    pub list: bool,
}

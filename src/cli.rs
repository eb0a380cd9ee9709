// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines all subcommands and their arguments.

use clap::{Parser, Subcommand};
use rapidctl::output::OutputMode;

#[derive(Parser)]
#[command(name = "rapidctl")]
#[command(about = "Pin, update and fetch the container image behind a CLI tool")]
#[command(version)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print final results
    #[arg(short, long, global = true, conflicts_with = "json")]
    pub quiet: bool,

    /// Print JSON lines for scripting
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn output_mode(&self) -> OutputMode {
        if self.json {
            OutputMode::Json
        } else if self.quiet {
            OutputMode::Quiet
        } else {
            OutputMode::Normal
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new rapidctl.yml configuration file
    Init {
        /// Image repository to manage (without a tag)
        #[arg(short, long)]
        repository: Option<String>,

        /// Baseline version used until a version is pinned
        #[arg(short = 'b', long)]
        baseline_version: Option<String>,

        /// Overwrite an existing rapidctl.yml
        #[arg(short, long)]
        force: bool,
    },

    /// Show the repository and the version in use
    Status,

    /// List locally available versions, newest first
    Versions,

    /// Report whether a newer version is available locally
    Check {
        /// Pin the newer version when one is found
        #[arg(long)]
        apply: bool,
    },

    /// Pin a version for this repository
    Use {
        /// Tag to pin
        tag: String,
    },

    /// Make sure the pinned version is present, pulling it if needed
    Ensure,
}

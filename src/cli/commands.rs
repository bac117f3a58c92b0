//! CLI command definitions.
//!
//! This module defines all CLI commands and their arguments using clap.

use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::{DesiredState, TaskFile};

/// asg-standby - Move autoscaling group instances in and out of standby.
#[derive(Parser, Debug)]
#[command(name = "asg-standby")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to a YAML task file.
    #[arg(short, long, global = true, env = "ASG_STANDBY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format (text, json).
    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Move the requested instances into the desired state.
    Apply {
        /// Task parameters.
        #[command(flatten)]
        task: TaskArgs,
    },

    /// Show which instances would change, without changing them.
    Plan {
        /// Task parameters.
        #[command(flatten)]
        task: TaskArgs,
    },

    /// Show the lifecycle state of every instance in a group.
    Status {
        /// Autoscaling group name.
        #[arg(long)]
        name: String,

        /// Alternate credential profile (`none` for the default).
        #[arg(long)]
        profile: Option<String>,

        /// Provider region.
        #[arg(long)]
        region: Option<String>,
    },

    /// Validate the task without contacting the provider.
    Validate {
        /// Task parameters.
        #[command(flatten)]
        task: TaskArgs,

        /// Show warnings as well as errors.
        #[arg(short, long)]
        warnings: bool,
    },
}

/// Task parameters accepted on the command line.
///
/// Anything left unset falls back to the task file.
#[derive(Args, Debug, Clone, Default)]
pub struct TaskArgs {
    /// Autoscaling group name.
    #[arg(long)]
    pub name: Option<String>,

    /// Instance ids to reconcile (comma-separated or repeated).
    #[arg(long = "instance-ids", value_delimiter = ',', num_args = 1..)]
    pub instance_ids: Vec<String>,

    /// Desired lifecycle state (standby, inservice).
    #[arg(long, value_parser = str::parse::<DesiredState>)]
    pub state: Option<DesiredState>,

    /// Lower desired capacity when entering standby [default: true].
    #[arg(long, action = ArgAction::Set, value_name = "BOOL")]
    pub should_decrement: Option<bool>,

    /// Alternate credential profile (`none` for the default).
    #[arg(long)]
    pub profile: Option<String>,

    /// Provider region.
    #[arg(long)]
    pub region: Option<String>,
}

impl From<TaskArgs> for TaskFile {
    fn from(args: TaskArgs) -> Self {
        Self {
            name: args.name,
            instance_ids: args.instance_ids,
            state: args.state,
            should_decrement: args.should_decrement,
            profile: args.profile,
            region: args.region,
        }
    }
}

/// Output format options.
#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

//! CLI module for the standby reconciler.
//!
//! This module provides the command-line interface for moving
//! autoscaling group instances in and out of standby.

mod commands;
mod output;

pub use commands::{Cli, Commands, OutputFormat, TaskArgs};
pub use output::OutputFormatter;

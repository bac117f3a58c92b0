//! Configuration module for the standby reconciler.
//!
//! This module handles all task-related functionality:
//! - Parsing the optional YAML task file and merging command-line values
//! - Translating user-facing state tokens into typed values
//! - Validation of task parameters before any provider access

mod spec;
mod parser;
mod validator;

pub use spec::{normalize_profile, DesiredState, StandbyConfig, TaskFile, NO_PROFILE};
pub use parser::{ConfigParser, ENV_PROFILE, ENV_REGION};
pub use validator::{ConfigValidator, ValidationError, ValidationResult};

//! Error types for the standby reconciler.
//!
//! The hierarchy follows the lifecycle of one invocation: resolving the
//! task configuration, talking to the autoscaling provider, and applying
//! the batched lifecycle transition.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for the standby reconciler.
#[derive(Debug, Error)]
pub enum StandbyError {
    /// Configuration-related errors.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Errors reading from the autoscaling provider.
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// The batched lifecycle transition was not accepted.
    #[error("Transition failed: {0}")]
    Transition(#[from] TransitionError),

}

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The task file was not found.
    #[error("Task file not found: {path}")]
    FileNotFound {
        /// Path to the missing file.
        path: PathBuf,
    },

    /// The task file could not be parsed.
    #[error("Failed to parse task: {message}")]
    ParseError {
        /// Description of the parse error.
        message: String,
        /// Optional source location.
        location: Option<String>,
    },

    /// A required parameter was not supplied by the file or the command line.
    #[error("Missing required parameter: {name}")]
    MissingParameter {
        /// Name of the missing parameter.
        name: String,
    },

    /// The desired state token is not one of the accepted choices.
    #[error("Invalid state '{token}': expected one of standby, inservice")]
    InvalidState {
        /// The rejected token.
        token: String,
    },

    /// Validation failed.
    #[error("Task validation failed: {message}")]
    ValidationError {
        /// Description of the validation error.
        message: String,
        /// Field that failed validation.
        field: Option<String>,
    },
}

/// Errors raised while reading from the autoscaling provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The provider client is not available on this host.
    #[error("Required dependency unavailable: {dependency} ({message})")]
    DependencyMissing {
        /// Name of the missing dependency.
        dependency: String,
        /// Why it could not be used.
        message: String,
    },

    /// The named group is not in the provider listing.
    #[error("Autoscaling group not found: {name}")]
    GroupNotFound {
        /// Name of the missing group.
        name: String,
    },

    /// A provider command exited unsuccessfully.
    #[error(
        "Provider command '{command}' failed (exit code {}): {diagnostic}",
        exit_code_label(.exit_code)
    )]
    CommandFailed {
        /// Short description of the command.
        command: String,
        /// Exit code if the process exited normally.
        exit_code: Option<i32>,
        /// Raw diagnostic output.
        diagnostic: String,
    },

    /// The provider returned output that could not be understood.
    #[error("Invalid response from provider: {message}")]
    InvalidResponse {
        /// Description of the response issue.
        message: String,
    },
}

/// Errors raised by a [`crate::planner::TransitionExecutor`].
#[derive(Debug, Error)]
pub enum TransitionError {
    /// A transition was requested for an empty change-set.
    #[error("Refusing to apply a transition with an empty change-set")]
    EmptyChangeSet,

    /// The provider could not be invoked at all.
    #[error("Provider unavailable for transition: {message}")]
    Unavailable {
        /// Why the provider could not be invoked.
        message: String,
    },

    /// The provider rejected or failed the batched request.
    #[error(
        "Provider rejected transition of {instances} instance(s) in '{group}' (exit code {}): {diagnostic}",
        exit_code_label(.exit_code)
    )]
    Rejected {
        /// Target group name.
        group: String,
        /// Number of instances in the batch.
        instances: usize,
        /// Exit code if the process exited normally.
        exit_code: Option<i32>,
        /// Raw provider diagnostic.
        diagnostic: String,
    },
}

/// Result type alias for standby operations.
pub type Result<T> = std::result::Result<T, StandbyError>;

#[allow(clippy::ref_option)]
fn exit_code_label(code: &Option<i32>) -> String {
    code.map_or_else(|| String::from("none"), |c| c.to_string())
}

impl StandbyError {
    /// Returns true if no work was attempted because the provider client is missing.
    #[must_use]
    pub const fn is_dependency_missing(&self) -> bool {
        matches!(self, Self::Provider(ProviderError::DependencyMissing { .. }))
    }

    /// Returns true if the named group could not be found.
    #[must_use]
    pub const fn is_group_not_found(&self) -> bool {
        matches!(self, Self::Provider(ProviderError::GroupNotFound { .. }))
    }
}

impl ConfigError {
    /// Creates a validation error for a specific field.
    #[must_use]
    pub fn validation(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Creates a missing-parameter error.
    #[must_use]
    pub fn missing(name: impl Into<String>) -> Self {
        Self::MissingParameter { name: name.into() }
    }
}

impl ProviderError {
    /// Creates a dependency-missing error.
    #[must_use]
    pub fn dependency_missing(dependency: impl Into<String>, message: impl Into<String>) -> Self {
        Self::DependencyMissing {
            dependency: dependency.into(),
            message: message.into(),
        }
    }

    /// Creates an invalid-response error.
    #[must_use]
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            message: message.into(),
        }
    }
}

impl TransitionError {
    /// Returns the raw provider diagnostic, if the provider produced one.
    #[must_use]
    pub fn diagnostic(&self) -> Option<&str> {
        match self {
            Self::Rejected { diagnostic, .. } => Some(diagnostic),
            Self::EmptyChangeSet | Self::Unavailable { .. } => None,
        }
    }
}

//! Task validation.
//!
//! Errors stop the invocation before the provider is contacted; warnings
//! are reported but never change what gets reconciled.

use crate::error::{ConfigError, Result, StandbyError};
use std::collections::HashSet;
use tracing::debug;

use super::spec::{DesiredState, StandbyConfig};

/// Maximum length of an autoscaling group name.
const MAX_GROUP_NAME_LEN: usize = 255;

/// Maximum length of an instance identifier.
const MAX_INSTANCE_ID_LEN: usize = 19;

/// Validator for standby tasks.
#[derive(Debug, Default)]
pub struct ConfigValidator;

/// Validation result containing all errors found.
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// List of validation errors.
    pub errors: Vec<ValidationError>,
    /// List of warnings (non-fatal issues).
    pub warnings: Vec<String>,
}

/// A single validation error.
#[derive(Debug)]
pub struct ValidationError {
    /// The field path that failed validation.
    pub field: String,
    /// The error message.
    pub message: String,
}

impl ConfigValidator {
    /// Creates a new validator.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Validates a resolved task.
    ///
    /// # Errors
    ///
    /// Returns the first validation error if any were found.
    pub fn validate(&self, config: &StandbyConfig) -> Result<ValidationResult> {
        let result = self.check(config);

        if result.errors.is_empty() {
            debug!("Task validation passed");
            Ok(result)
        } else {
            let first_error = &result.errors[0];
            Err(StandbyError::Config(ConfigError::validation(
                first_error.message.clone(),
                first_error.field.clone(),
            )))
        }
    }

    /// Collects every error and warning without failing.
    #[must_use]
    pub fn check(&self, config: &StandbyConfig) -> ValidationResult {
        let mut result = ValidationResult::default();

        Self::validate_name(&config.name, &mut result);
        Self::validate_instance_ids(&config.instance_ids, &mut result);
        Self::validate_options(config, &mut result);

        result
    }

    /// Validates the group name.
    fn validate_name(name: &str, result: &mut ValidationResult) {
        if name.is_empty() {
            result.errors.push(ValidationError {
                field: String::from("name"),
                message: String::from("Group name cannot be empty"),
            });
        } else if name.chars().count() > MAX_GROUP_NAME_LEN {
            result.errors.push(ValidationError {
                field: String::from("name"),
                message: format!("Group name exceeds {MAX_GROUP_NAME_LEN} characters"),
            });
        } else if name.chars().any(char::is_control) {
            result.errors.push(ValidationError {
                field: String::from("name"),
                message: String::from("Group name cannot contain control characters"),
            });
        }
    }

    /// Validates the requested instance identifiers.
    fn validate_instance_ids(ids: &[String], result: &mut ValidationResult) {
        if ids.is_empty() {
            result.errors.push(ValidationError {
                field: String::from("instance_ids"),
                message: String::from("At least one instance id is required"),
            });
            return;
        }

        let mut seen = HashSet::new();

        for (i, id) in ids.iter().enumerate() {
            let field = format!("instance_ids[{i}]");

            if id.is_empty() {
                result.errors.push(ValidationError {
                    field,
                    message: String::from("Instance id cannot be empty"),
                });
                continue;
            }

            if id.chars().any(char::is_whitespace) {
                result.errors.push(ValidationError {
                    field,
                    message: format!("Instance id '{id}' contains whitespace"),
                });
                continue;
            }

            if !seen.insert(id.as_str()) {
                result.warnings.push(format!("{field}: duplicate instance id '{id}'"));
            }

            if !is_instance_id(id) {
                result
                    .warnings
                    .push(format!("{field}: '{id}' does not look like an EC2 instance id"));
            }
        }
    }

    /// Validates profile, region and the capacity flag.
    fn validate_options(config: &StandbyConfig, result: &mut ValidationResult) {
        if let Some(profile) = &config.profile
            && profile.chars().any(char::is_whitespace)
        {
            result.errors.push(ValidationError {
                field: String::from("profile"),
                message: format!("Profile '{profile}' cannot contain whitespace"),
            });
        }

        if let Some(region) = &config.region
            && !is_region(region)
        {
            result.errors.push(ValidationError {
                field: String::from("region"),
                message: format!("Region '{region}' is invalid. Expected a form like eu-west-1."),
            });
        }

        if config.state == DesiredState::InService && !config.should_decrement {
            result.warnings.push(String::from(
                "should_decrement: ignored when state is inservice",
            ));
        }
    }
}

impl ValidationResult {
    /// Returns true if validation passed (no errors).
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Checks for the `i-` prefix followed by 8 or 17 lowercase hex digits.
fn is_instance_id(id: &str) -> bool {
    if id.len() > MAX_INSTANCE_ID_LEN {
        return false;
    }

    id.strip_prefix("i-").is_some_and(|hex| {
        matches!(hex.len(), 8 | 17)
            && hex
                .chars()
                .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
    })
}

/// Checks for a region shaped like `eu-west-1` or `us-gov-east-1`.
fn is_region(region: &str) -> bool {
    let parts: Vec<&str> = region.split('-').collect();

    parts.len() >= 3
        && parts
            .last()
            .is_some_and(|n| !n.is_empty() && n.chars().all(|c| c.is_ascii_digit()))
        && parts[..parts.len() - 1]
            .iter()
            .all(|p| !p.is_empty() && p.chars().all(|c| c.is_ascii_lowercase()))
}

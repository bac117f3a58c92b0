//! Output formatting for CLI commands.
//!
//! This module provides formatting utilities for displaying
//! information to the user in various formats.

use colored::Colorize;
use std::fmt::Write;
use tabled::{Table, Tabled};

use crate::config::{StandbyConfig, ValidationResult};
use crate::provider::{AutoscalingGroup, LifecycleState};
use crate::reconciler::{ReconcileOutcome, ReconcilePlan};

use super::commands::OutputFormat;

/// Output formatter for CLI.
#[derive(Debug)]
pub struct OutputFormatter {
    /// Output format.
    format: OutputFormat,
}

/// Instance row for table display.
#[derive(Tabled)]
struct InstanceRow {
    #[tabled(rename = "Instance")]
    id: String,
    #[tabled(rename = "Lifecycle")]
    lifecycle: String,
    #[tabled(rename = "Health")]
    health: String,
    #[tabled(rename = "Launch config")]
    launch_configuration: String,
    #[tabled(rename = "Zone")]
    zone: String,
}

impl OutputFormatter {
    /// Creates a new output formatter.
    #[must_use]
    pub const fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats the result of a reconciliation.
    #[must_use]
    pub fn format_outcome(&self, outcome: &ReconcileOutcome) -> String {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(outcome).unwrap_or_default(),
            OutputFormat::Text => {
                let mut output = if outcome.changed {
                    format!("{} {outcome}\n", "✓".green())
                } else {
                    format!("{} {outcome}\n", "=".dimmed())
                };

                if let Some(decrement) = outcome.decrement_capacity {
                    let _ = writeln!(output, "   Desired capacity decremented: {decrement}");
                }
                output
            }
        }
    }

    /// Formats a plan (check mode).
    #[must_use]
    pub fn format_plan(&self, plan: &ReconcilePlan) -> String {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(plan).unwrap_or_default(),
            OutputFormat::Text => Self::format_plan_text(plan),
        }
    }

    /// Formats a plan as text.
    fn format_plan_text(plan: &ReconcilePlan) -> String {
        let mut output = String::new();

        if plan.is_converged() {
            let _ = writeln!(
                output,
                "{} No changes required - requested instances in {} are already {}.",
                "✓".green(),
                plan.group,
                plan.state
            );
        } else {
            let _ = writeln!(
                output,
                "\nPlan: move {} instance(s) in {} to {}",
                plan.change_set.len().to_string().yellow(),
                plan.group,
                plan.state
            );
            for id in plan.change_set.instance_ids() {
                let _ = writeln!(output, "   ~ {id}");
            }
            if let Some(decrement) = plan.decrement_capacity {
                let _ = writeln!(output, "   Decrement desired capacity: {decrement}");
            }
        }

        if !plan.missing.is_empty() {
            let _ = writeln!(
                output,
                "\n{} Not members of {} (ignored): {}",
                "⚠".yellow(),
                plan.group,
                plan.missing.join(", ")
            );
        }

        output
    }

    /// Formats a group snapshot.
    #[must_use]
    pub fn format_group(&self, group: &AutoscalingGroup) -> String {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(group).unwrap_or_default(),
            OutputFormat::Text => Self::format_group_text(group),
        }
    }

    /// Formats a group snapshot as text.
    fn format_group_text(group: &AutoscalingGroup) -> String {
        let mut output = String::new();

        let _ = write!(output, "\nGroup: {}\n", group.name);
        let _ = write!(
            output,
            "   Capacity: desired {} (min {}, max {})\n\n",
            Self::counter(group.desired_capacity),
            Self::counter(group.min_size),
            Self::counter(group.max_size)
        );

        if group.instances.is_empty() {
            output.push_str("   No instances.\n");
            return output;
        }

        let rows: Vec<InstanceRow> = group
            .instances
            .iter()
            .map(|i| InstanceRow {
                id: i.id.clone(),
                lifecycle: Self::format_lifecycle(&i.lifecycle_state),
                health: i.health_status.clone(),
                launch_configuration: i
                    .launch_configuration
                    .clone()
                    .unwrap_or_else(|| String::from("-")),
                zone: i
                    .availability_zone
                    .clone()
                    .unwrap_or_else(|| String::from("-")),
            })
            .collect();

        output.push_str(&Table::new(rows).to_string());
        output.push('\n');

        let _ = write!(
            output,
            "\n{} in service, {} in standby, {} other\n",
            group.count_in(&LifecycleState::InService).to_string().green(),
            group.count_in(&LifecycleState::Standby).to_string().yellow(),
            group.instances.len()
                - group.count_in(&LifecycleState::InService)
                - group.count_in(&LifecycleState::Standby)
        );

        output
    }

    /// Formats a validation report.
    #[must_use]
    pub fn format_validation(
        &self,
        config: &StandbyConfig,
        result: &ValidationResult,
        show_warnings: bool,
    ) -> String {
        match self.format {
            OutputFormat::Json => {
                let json = serde_json::json!({
                    "valid": result.is_valid(),
                    "task": config,
                    "errors": result.errors.iter().map(ToString::to_string).collect::<Vec<_>>(),
                    "warnings": result.warnings,
                });
                serde_json::to_string_pretty(&json).unwrap_or_default()
            }
            OutputFormat::Text => {
                let mut output = if result.is_valid() {
                    format!("{} Task is valid.\n", "✓".green())
                } else {
                    let mut text = format!("{} Task is invalid:\n", "✗".red());
                    for error in &result.errors {
                        let _ = writeln!(text, "   - {error}");
                    }
                    text
                };

                if show_warnings && !result.warnings.is_empty() {
                    let _ = write!(output, "\n{} Warnings:\n", "⚠".yellow());
                    for warning in &result.warnings {
                        let _ = writeln!(output, "   - {warning}");
                    }
                }

                let _ = write!(output, "\nTask summary:\n");
                let _ = writeln!(output, "   Group: {}", config.name);
                let _ = writeln!(output, "   State: {}", config.state);
                let _ = writeln!(output, "   Instances: {}", config.instance_ids.len());
                if let Some(decrement) = config.effective_decrement() {
                    let _ = writeln!(output, "   Decrement capacity: {decrement}");
                }
                let _ = writeln!(
                    output,
                    "   Profile: {}",
                    config.profile.as_deref().unwrap_or("(default)")
                );
                output
            }
        }
    }

    /// Formats a failure.
    #[must_use]
    pub fn format_error(&self, message: &str) -> String {
        match self.format {
            OutputFormat::Json => {
                let json = serde_json::json!({ "failed": true, "changed": false, "msg": message });
                serde_json::to_string_pretty(&json).unwrap_or_default()
            }
            OutputFormat::Text => format!("{} {message}", "✗".red()),
        }
    }

    /// Formats a lifecycle state with color.
    fn format_lifecycle(state: &LifecycleState) -> String {
        match state {
            LifecycleState::InService => state.as_str().green().to_string(),
            LifecycleState::Standby => state.as_str().yellow().to_string(),
            LifecycleState::Other(s) => s.dimmed().to_string(),
        }
    }

    /// Formats an optional capacity counter.
    fn counter(value: Option<u32>) -> String {
        value.map_or_else(|| String::from("?"), |v| v.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DesiredState;
    use crate::provider::Instance;
    use chrono::Utc;

    fn outcome(changed: bool) -> ReconcileOutcome {
        ReconcileOutcome {
            changed,
            group: String::from("web-asg"),
            state: DesiredState::Standby,
            instances: if changed { vec![String::from("i-0aaa")] } else { vec![] },
            missing: vec![],
            decrement_capacity: changed.then_some(true),
            completed_at: Utc::now(),
        }
    }

    #[test]
    fn test_json_outcome_reports_changed() {
        let formatter = OutputFormatter::new(OutputFormat::Json);

        let changed: serde_json::Value =
            serde_json::from_str(&formatter.format_outcome(&outcome(true))).unwrap();
        assert_eq!(changed["changed"], true);
        assert_eq!(changed["state"], "standby");
        assert_eq!(changed["instances"], serde_json::json!(["i-0aaa"]));
        assert_eq!(changed["decrement_capacity"], true);

        let unchanged: serde_json::Value =
            serde_json::from_str(&formatter.format_outcome(&outcome(false))).unwrap();
        assert_eq!(unchanged["changed"], false);
        assert!(unchanged.get("decrement_capacity").is_none());
    }

    #[test]
    fn test_json_error() {
        let formatter = OutputFormatter::new(OutputFormat::Json);
        let value: serde_json::Value =
            serde_json::from_str(&formatter.format_error("aws cli command failed")).unwrap();
        assert_eq!(value["failed"], true);
        assert_eq!(value["msg"], "aws cli command failed");
    }

    #[test]
    fn test_group_table_lists_instances() {
        colored::control::set_override(false);
        let mut group = AutoscalingGroup::new(
            "web-asg",
            vec![
                Instance::new("i-0aaa", LifecycleState::InService),
                Instance::new("i-0bbb", LifecycleState::from("Pending")),
            ],
        );
        group.desired_capacity = Some(2);

        let text = OutputFormatter::new(OutputFormat::Text).format_group(&group);
        assert!(text.contains("i-0aaa"));
        assert!(text.contains("Pending"));
        assert!(text.contains("desired 2"));
        assert!(text.contains("1 in service, 0 in standby, 1 other"));
    }
}

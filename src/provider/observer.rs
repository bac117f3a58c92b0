//! Group observer for reading autoscaling group snapshots.
//!
//! Every call describes the group afresh; snapshots are never cached.

use async_trait::async_trait;
use tracing::{debug, info};

use crate::error::{ProviderError, Result, StandbyError};

use super::cli::AwsCli;
use super::types::{AutoscalingGroup, DescribeGroupsResponse};

/// Source of group snapshots.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GroupSource: Send + Sync {
    /// Fetches the current snapshot of the named group.
    ///
    /// Fails with `GroupNotFound` if the provider does not list the group.
    async fn fetch_group(&self, name: &str) -> Result<AutoscalingGroup>;
}

/// Group observer backed by the AWS CLI.
#[derive(Debug, Clone)]
pub struct GroupObserver {
    /// AWS CLI runner.
    cli: AwsCli,
}

impl GroupObserver {
    /// Creates a new group observer.
    #[must_use]
    pub const fn new(cli: AwsCli) -> Self {
        Self { cli }
    }

    /// Arguments for describing one group.
    #[must_use]
    pub fn describe_args(&self, name: &str) -> Vec<String> {
        self.cli.with_identity(vec![
            String::from("autoscaling"),
            String::from("describe-auto-scaling-groups"),
            String::from("--auto-scaling-group-names"),
            name.to_string(),
            String::from("--output"),
            String::from("json"),
        ])
    }

    /// Picks the named group out of a describe response.
    ///
    /// # Errors
    ///
    /// Returns `InvalidResponse` for unparseable output and `GroupNotFound`
    /// when the listing has no group with that exact name.
    pub fn parse_group(name: &str, stdout: &str) -> Result<AutoscalingGroup> {
        let response: DescribeGroupsResponse = serde_json::from_str(stdout).map_err(|e| {
            StandbyError::Provider(ProviderError::invalid_response(format!(
                "Failed to parse describe-auto-scaling-groups output: {e}"
            )))
        })?;

        response
            .auto_scaling_groups
            .into_iter()
            .find(|g| g.auto_scaling_group_name == name)
            .map(AutoscalingGroup::from)
            .ok_or_else(|| {
                StandbyError::Provider(ProviderError::GroupNotFound {
                    name: name.to_string(),
                })
            })
    }
}

#[async_trait]
impl GroupSource for GroupObserver {
    async fn fetch_group(&self, name: &str) -> Result<AutoscalingGroup> {
        info!("Describing autoscaling group: {name}");

        let output = self.cli.run(&self.describe_args(name)).await.map_err(|e| {
            StandbyError::Provider(ProviderError::dependency_missing(
                self.cli.binary().display().to_string(),
                format!("failed to run: {e}"),
            ))
        })?;

        if !output.success {
            return Err(StandbyError::Provider(ProviderError::CommandFailed {
                command: String::from("describe-auto-scaling-groups"),
                exit_code: output.exit_code,
                diagnostic: output.diagnostic(),
            }));
        }

        let group = Self::parse_group(name, &output.stdout)?;
        debug!("Group {} has {} instances", group.name, group.instances.len());
        Ok(group)
    }
}

//! Autoscaling provider types and data structures.
//!
//! The wire structs mirror the JSON printed by
//! `aws autoscaling describe-auto-scaling-groups`; the domain structs are the
//! read-only snapshot the reconciler works from.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of an instance within its group.
///
/// Only `InService` and `Standby` are interpreted. Every other
/// provider-defined state is carried through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LifecycleState {
    /// Actively serving.
    InService,
    /// Withdrawn from service but still managed by the group.
    Standby,
    /// Any other provider state (`Pending`, `EnteringStandby`, ...).
    Other(String),
}

impl LifecycleState {
    /// Provider string form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::InService => "InService",
            Self::Standby => "Standby",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for LifecycleState {
    fn from(s: String) -> Self {
        match s.as_str() {
            "InService" => Self::InService,
            "Standby" => Self::Standby,
            _ => Self::Other(s),
        }
    }
}

impl From<&str> for LifecycleState {
    fn from(s: &str) -> Self {
        Self::from(s.to_string())
    }
}

impl From<LifecycleState> for String {
    fn from(state: LifecycleState) -> Self {
        match state {
            LifecycleState::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One instance as observed in the group snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Instance {
    /// Instance identifier, unique within the group.
    pub id: String,
    /// Current lifecycle state.
    pub lifecycle_state: LifecycleState,
    /// Provider health status (opaque).
    pub health_status: String,
    /// Launch configuration name, absent for launch-template groups.
    pub launch_configuration: Option<String>,
    /// Availability zone.
    pub availability_zone: Option<String>,
}

impl Instance {
    /// Creates an instance snapshot with only the fields the diff needs.
    #[must_use]
    pub fn new(id: impl Into<String>, lifecycle_state: LifecycleState) -> Self {
        Self {
            id: id.into(),
            lifecycle_state,
            health_status: String::from("Healthy"),
            launch_configuration: None,
            availability_zone: None,
        }
    }
}

/// Snapshot of an autoscaling group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AutoscalingGroup {
    /// Group name.
    pub name: String,
    /// Instances in provider-returned order.
    pub instances: Vec<Instance>,
    /// Desired capacity at the time of the snapshot.
    pub desired_capacity: Option<u32>,
    /// Minimum size.
    pub min_size: Option<u32>,
    /// Maximum size.
    pub max_size: Option<u32>,
}

impl AutoscalingGroup {
    /// Creates a group snapshot without capacity counters.
    #[must_use]
    pub fn new(name: impl Into<String>, instances: Vec<Instance>) -> Self {
        Self {
            name: name.into(),
            instances,
            desired_capacity: None,
            min_size: None,
            max_size: None,
        }
    }

    /// Counts instances in the given lifecycle state.
    #[must_use]
    pub fn count_in(&self, state: &LifecycleState) -> usize {
        self.instances
            .iter()
            .filter(|i| &i.lifecycle_state == state)
            .count()
    }
}

/// `describe-auto-scaling-groups` response body.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeGroupsResponse {
    /// Matching groups.
    #[serde(default)]
    pub auto_scaling_groups: Vec<GroupRecord>,
}

/// A group as returned by the provider.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GroupRecord {
    /// Group name.
    pub auto_scaling_group_name: String,
    /// Desired capacity.
    #[serde(default)]
    pub desired_capacity: Option<u32>,
    /// Minimum size.
    #[serde(default)]
    pub min_size: Option<u32>,
    /// Maximum size.
    #[serde(default)]
    pub max_size: Option<u32>,
    /// Member instances.
    #[serde(default)]
    pub instances: Vec<InstanceRecord>,
}

/// An instance as returned by the provider.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct InstanceRecord {
    /// Instance identifier.
    pub instance_id: String,
    /// Lifecycle state string.
    pub lifecycle_state: String,
    /// Health status string.
    #[serde(default)]
    pub health_status: String,
    /// Launch configuration name.
    #[serde(default)]
    pub launch_configuration_name: Option<String>,
    /// Availability zone.
    #[serde(default)]
    pub availability_zone: Option<String>,
}

impl From<InstanceRecord> for Instance {
    fn from(record: InstanceRecord) -> Self {
        Self {
            id: record.instance_id,
            lifecycle_state: LifecycleState::from(record.lifecycle_state),
            health_status: record.health_status,
            launch_configuration: record.launch_configuration_name,
            availability_zone: record.availability_zone,
        }
    }
}

impl From<GroupRecord> for AutoscalingGroup {
    fn from(record: GroupRecord) -> Self {
        Self {
            name: record.auto_scaling_group_name,
            instances: record.instances.into_iter().map(Instance::from).collect(),
            desired_capacity: record.desired_capacity,
            min_size: record.min_size,
            max_size: record.max_size,
        }
    }
}

//! Autoscaling provider integration module.
//!
//! This module provides everything that talks to the autoscaling provider:
//! locating the AWS CLI, describing groups, and applying lifecycle
//! transitions.

mod cli;
mod types;
mod observer;
mod executor;

pub use cli::{AwsCli, CommandOutput, AWS_BINARY, ENV_AWS_CLI};
pub use types::{
    AutoscalingGroup, DescribeGroupsResponse, GroupRecord, Instance, InstanceRecord,
    LifecycleState,
};
pub use observer::{GroupObserver, GroupSource};
#[cfg(test)]
pub use observer::MockGroupSource;
pub use executor::AwsCliExecutor;

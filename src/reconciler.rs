//! Reconciler for standby/in-service lifecycle state.
//!
//! One reconciliation fetches a fresh group snapshot, computes the
//! change-set, and applies it as a single batched transition when it is not
//! empty.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::config::{DesiredState, StandbyConfig};
use crate::error::Result;
use crate::planner::{ChangeSet, StateDiffer, TransitionExecutor, TransitionRequest};
use crate::provider::GroupSource;

/// Reconciler for instance lifecycle state.
pub struct Reconciler<'a, G: GroupSource, E: TransitionExecutor> {
    /// Group snapshot source.
    source: &'a G,
    /// Transition executor.
    executor: &'a E,
    /// State differ.
    differ: StateDiffer,
}

/// What a reconciliation would do, computed without applying anything.
#[derive(Debug, Clone, Serialize)]
pub struct ReconcilePlan {
    /// Target group.
    pub group: String,
    /// Desired lifecycle state.
    pub state: DesiredState,
    /// Instances that would be transitioned.
    pub change_set: ChangeSet,
    /// Requested ids that are not members of the group.
    pub missing: Vec<String>,
    /// Capacity flag the transition would carry (standby only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decrement_capacity: Option<bool>,
}

/// Result of a reconciliation run.
#[derive(Debug, Clone, Serialize)]
pub struct ReconcileOutcome {
    /// Whether a transition was applied.
    pub changed: bool,
    /// Target group.
    pub group: String,
    /// Desired lifecycle state.
    pub state: DesiredState,
    /// Instances that were transitioned.
    pub instances: Vec<String>,
    /// Requested ids that are not members of the group.
    pub missing: Vec<String>,
    /// Capacity flag sent with the transition, if one was sent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decrement_capacity: Option<bool>,
    /// When the reconciliation finished.
    pub completed_at: DateTime<Utc>,
}

impl ReconcilePlan {
    /// Returns true if the group is already converged.
    #[must_use]
    pub fn is_converged(&self) -> bool {
        self.change_set.is_empty()
    }
}

impl<'a, G: GroupSource, E: TransitionExecutor> Reconciler<'a, G, E> {
    /// Creates a new reconciler.
    #[must_use]
    pub const fn new(source: &'a G, executor: &'a E) -> Self {
        Self {
            source,
            executor,
            differ: StateDiffer::new(),
        }
    }

    /// Computes the change-set from a fresh snapshot without applying it.
    ///
    /// # Errors
    ///
    /// Returns an error if the group cannot be fetched.
    pub async fn plan(&self, config: &StandbyConfig) -> Result<ReconcilePlan> {
        let group = self.source.fetch_group(&config.name).await?;

        let change_set =
            self.differ
                .compute_change_set(&group, &config.requested_ids(), config.state);
        let missing = self.differ.missing_ids(&group, &config.instance_ids);

        info!(
            "{}: {} of {} requested instance(s) need {}",
            group.name,
            change_set.len(),
            config.instance_ids.len(),
            config.state
        );

        Ok(ReconcilePlan {
            group: group.name,
            state: config.state,
            decrement_capacity: if change_set.is_empty() {
                None
            } else {
                config.effective_decrement()
            },
            change_set,
            missing,
        })
    }

    /// Performs a full reconciliation.
    ///
    /// # Errors
    ///
    /// Returns an error if the group cannot be fetched or the provider
    /// rejects the transition. Nothing is retried.
    pub async fn reconcile(&self, config: &StandbyConfig) -> Result<ReconcileOutcome> {
        let plan = self.plan(config).await?;

        if plan.is_converged() {
            info!("No changes required - instances are already {}", config.state);
            return Ok(ReconcileOutcome {
                changed: false,
                group: plan.group,
                state: plan.state,
                instances: Vec::new(),
                missing: plan.missing,
                decrement_capacity: None,
                completed_at: Utc::now(),
            });
        }

        let request = TransitionRequest::new(
            plan.group.clone(),
            plan.change_set,
            config.state,
            config.should_decrement,
            config.profile.clone(),
        );

        if let Err(err) = self.executor.apply_transition(&request).await {
            warn!(
                "Transition via {} failed for {}",
                self.executor.executor_type(),
                request.group
            );
            return Err(err.into());
        }

        Ok(ReconcileOutcome {
            changed: true,
            group: request.group,
            state: request.action.target(),
            decrement_capacity: request.action.decrement_capacity(),
            instances: request.change_set.into_inner(),
            missing: plan.missing,
            completed_at: Utc::now(),
        })
    }
}

impl std::fmt::Display for ReconcileOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.changed {
            write!(
                f,
                "Moved {} instance(s) in {} to {}: {}",
                self.instances.len(),
                self.group,
                self.state,
                self.instances.join(", ")
            )?;
        } else {
            write!(
                f,
                "No change: requested instances in {} are already {}",
                self.group, self.state
            )?;
        }

        if !self.missing.is_empty() {
            write!(f, " (not in group: {})", self.missing.join(", "))?;
        }
        Ok(())
    }
}

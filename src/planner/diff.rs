//! State differ for computing the change-set.
//!
//! Compares each instance's observed lifecycle state with the desired state
//! and keeps the requested ones that do not match yet.

use std::collections::HashSet;
use tracing::{debug, warn};

use crate::config::DesiredState;
use crate::provider::AutoscalingGroup;

use super::plan::ChangeSet;

/// Computes change-sets from group snapshots.
#[derive(Debug, Default, Clone, Copy)]
pub struct StateDiffer;

impl StateDiffer {
    /// Creates a new state differ.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Returns the requested instances whose lifecycle state differs from `desired`.
    ///
    /// Order follows the snapshot. Requested ids that are not members of the
    /// group are skipped; see [`Self::missing_ids`].
    #[must_use]
    pub fn compute_change_set(
        &self,
        group: &AutoscalingGroup,
        requested: &HashSet<String>,
        desired: DesiredState,
    ) -> ChangeSet {
        let target = desired.provider_state();

        let instance_ids: Vec<String> = group
            .instances
            .iter()
            .filter(|instance| requested.contains(&instance.id))
            .filter(|instance| {
                let differs = instance.lifecycle_state != target;
                debug!(
                    "Instance {} is {} (wanted {target}): {}",
                    instance.id,
                    instance.lifecycle_state,
                    if differs { "change" } else { "keep" }
                );
                differs
            })
            .map(|instance| instance.id.clone())
            .collect();

        ChangeSet::new(instance_ids)
    }

    /// Returns the requested ids that are absent from the snapshot, in request order.
    ///
    /// These are tolerated rather than treated as errors: a listing may lag
    /// behind a freshly launched or just-detached instance.
    #[must_use]
    pub fn missing_ids(&self, group: &AutoscalingGroup, requested: &[String]) -> Vec<String> {
        let members: HashSet<&str> = group.instances.iter().map(|i| i.id.as_str()).collect();
        let mut seen = HashSet::new();

        let missing: Vec<String> = requested
            .iter()
            .filter(|id| !members.contains(id.as_str()))
            .filter(|id| seen.insert(id.as_str()))
            .cloned()
            .collect();

        for id in &missing {
            warn!("Instance {id} is not a member of {}; ignoring it", group.name);
        }

        missing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{Instance, LifecycleState};

    fn group(instances: &[(&str, LifecycleState)]) -> AutoscalingGroup {
        AutoscalingGroup::new(
            "web-asg",
            instances
                .iter()
                .map(|(id, state)| Instance::new(*id, state.clone()))
                .collect(),
        )
    }

    fn ids(values: &[&str]) -> HashSet<String> {
        values.iter().map(|v| (*v).to_string()).collect()
    }

    #[test]
    fn test_excludes_instances_already_in_state() {
        let group = group(&[
            ("A", LifecycleState::InService),
            ("B", LifecycleState::Standby),
            ("C", LifecycleState::InService),
        ]);

        let change_set =
            StateDiffer::new().compute_change_set(&group, &ids(&["A", "B"]), DesiredState::Standby);

        assert_eq!(change_set.instance_ids(), ["A"]);
    }

    #[test]
    fn test_converged_group_yields_empty_change_set() {
        let group = group(&[("A", LifecycleState::Standby)]);

        let change_set =
            StateDiffer::new().compute_change_set(&group, &ids(&["A"]), DesiredState::Standby);

        assert!(change_set.is_empty());
    }

    #[test]
    fn test_absent_ids_are_ignored() {
        let group = group(&[("A", LifecycleState::Standby)]);
        let differ = StateDiffer::new();

        let change_set =
            differ.compute_change_set(&group, &ids(&["A", "Z"]), DesiredState::InService);
        assert_eq!(change_set.instance_ids(), ["A"]);

        let missing = differ.missing_ids(
            &group,
            &[String::from("A"), String::from("Z"), String::from("Z")],
        );
        assert_eq!(missing, vec![String::from("Z")]);
    }

    #[test]
    fn test_order_follows_snapshot() {
        let group = group(&[
            ("C", LifecycleState::InService),
            ("A", LifecycleState::InService),
            ("B", LifecycleState::InService),
        ]);

        let change_set = StateDiffer::new().compute_change_set(
            &group,
            &ids(&["A", "B", "C"]),
            DesiredState::Standby,
        );

        assert_eq!(change_set.instance_ids(), ["C", "A", "B"]);
    }

    #[test]
    fn test_transitional_states_are_included() {
        let group = group(&[
            ("A", LifecycleState::from("EnteringStandby")),
            ("B", LifecycleState::from("Pending")),
        ]);
        let differ = StateDiffer::new();

        let to_standby =
            differ.compute_change_set(&group, &ids(&["A", "B"]), DesiredState::Standby);
        assert_eq!(to_standby.len(), 2);

        let to_service =
            differ.compute_change_set(&group, &ids(&["A", "B"]), DesiredState::InService);
        assert_eq!(to_service.len(), 2);
    }

    #[test]
    fn test_unrequested_instances_untouched() {
        let group = group(&[
            ("A", LifecycleState::InService),
            ("B", LifecycleState::InService),
        ]);

        let change_set =
            StateDiffer::new().compute_change_set(&group, &ids(&[]), DesiredState::Standby);
        assert!(change_set.is_empty());
    }
}

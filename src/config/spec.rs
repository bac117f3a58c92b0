//! Task specification types.
//!
//! A task names one autoscaling group, the instances to reconcile and the
//! lifecycle state they should end up in. [`TaskFile`] is the loose,
//! all-optional shape shared by the YAML file and the command line;
//! [`StandbyConfig`] is the resolved form with every required field present.

use serde::de::{self, Deserializer, Unexpected};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;
use crate::provider::LifecycleState;

/// Profile value that means "use the default credential context".
pub const NO_PROFILE: &str = "none";

/// Desired lifecycle state, in its user-facing form.
///
/// The command line parses it through [`FromStr`]; the task file through serde.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum DesiredState {
    /// Withdraw the instances from service.
    Standby,
    /// Return the instances to service.
    InService,
}

impl DesiredState {
    /// Translates the user-facing token into the provider lifecycle state.
    #[must_use]
    pub const fn provider_state(self) -> LifecycleState {
        match self {
            Self::Standby => LifecycleState::Standby,
            Self::InService => LifecycleState::InService,
        }
    }

    /// User-facing token (`standby` / `inservice`).
    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Self::Standby => "standby",
            Self::InService => "inservice",
        }
    }
}

impl FromStr for DesiredState {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "standby" => Ok(Self::Standby),
            "inservice" => Ok(Self::InService),
            other => Err(ConfigError::InvalidState {
                token: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for DesiredState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Task parameters as they appear in a YAML file or on the command line.
///
/// Every field is optional here; [`StandbyConfig::try_from`] enforces the
/// required ones after the sources have been merged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct TaskFile {
    /// Autoscaling group name.
    #[serde(default)]
    pub name: Option<String>,
    /// Candidate instance identifiers, as a list or a comma-separated string.
    #[serde(default, deserialize_with = "deserialize_id_list")]
    pub instance_ids: Vec<String>,
    /// Desired lifecycle state.
    #[serde(default)]
    pub state: Option<DesiredState>,
    /// Whether entering standby lowers the group's desired capacity.
    ///
    /// Accepts `yes`/`no`, `on`/`off` and `1`/`0` as well as booleans.
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub should_decrement: Option<bool>,
    /// Alternate credential profile (`none` means default).
    #[serde(default)]
    pub profile: Option<String>,
    /// Provider region.
    #[serde(default)]
    pub region: Option<String>,
}

impl TaskFile {
    /// Overlays `other` on top of `self`; values present in `other` win.
    #[must_use]
    pub fn merge(self, other: Self) -> Self {
        Self {
            name: other.name.or(self.name),
            instance_ids: if other.instance_ids.is_empty() {
                self.instance_ids
            } else {
                other.instance_ids
            },
            state: other.state.or(self.state),
            should_decrement: other.should_decrement.or(self.should_decrement),
            profile: other.profile.or(self.profile),
            region: other.region.or(self.region),
        }
    }
}

/// Reads an instance id list from a sequence or a comma-separated string.
fn deserialize_id_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum IdList {
        List(Vec<String>),
        Joined(String),
    }

    Ok(match Option::<IdList>::deserialize(deserializer)? {
        Some(IdList::List(ids)) => ids,
        Some(IdList::Joined(joined)) => joined
            .split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(String::from)
            .collect(),
        None => Vec::new(),
    })
}

/// Reads a boolean, also accepting the usual YAML 1.1 spellings as strings.
fn deserialize_flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Text(String),
    }

    match Option::<Flag>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Flag::Bool(value)) => Ok(Some(value)),
        Some(Flag::Text(text)) => match text.trim().to_ascii_lowercase().as_str() {
            "yes" | "y" | "true" | "on" | "1" => Ok(Some(true)),
            "no" | "n" | "false" | "off" | "0" => Ok(Some(false)),
            _ => Err(de::Error::invalid_value(
                Unexpected::Str(&text),
                &"a boolean (true/false, yes/no, on/off, 1/0)",
            )),
        },
    }
}

/// Fully resolved task configuration.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct StandbyConfig {
    /// Autoscaling group name.
    pub name: String,
    /// Candidate instance identifiers, in the order supplied.
    pub instance_ids: Vec<String>,
    /// Desired lifecycle state.
    pub state: DesiredState,
    /// Whether entering standby lowers the group's desired capacity.
    pub should_decrement: bool,
    /// Alternate credential profile, `None` for the default identity.
    pub profile: Option<String>,
    /// Provider region, `None` to let the provider resolve it.
    pub region: Option<String>,
}

impl StandbyConfig {
    /// Returns the requested instance identifiers as a set.
    #[must_use]
    pub fn requested_ids(&self) -> HashSet<String> {
        self.instance_ids.iter().cloned().collect()
    }

    /// Capacity-decrement flag as it applies to the desired state.
    ///
    /// Returns `None` for `inservice`, where the flag has no meaning.
    #[must_use]
    pub const fn effective_decrement(&self) -> Option<bool> {
        match self.state {
            DesiredState::Standby => Some(self.should_decrement),
            DesiredState::InService => None,
        }
    }
}

impl TryFrom<TaskFile> for StandbyConfig {
    type Error = ConfigError;

    fn try_from(task: TaskFile) -> Result<Self, Self::Error> {
        let name = task
            .name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .ok_or_else(|| ConfigError::missing("name"))?;

        if task.instance_ids.is_empty() {
            return Err(ConfigError::missing("instance_ids"));
        }

        let state = task.state.ok_or_else(|| ConfigError::missing("state"))?;

        Ok(Self {
            name,
            instance_ids: task
                .instance_ids
                .into_iter()
                .map(|id| id.trim().to_string())
                .collect(),
            state,
            should_decrement: task.should_decrement.unwrap_or(true),
            profile: task.profile.as_deref().and_then(normalize_profile),
            region: task
                .region
                .map(|r| r.trim().to_string())
                .filter(|r| !r.is_empty()),
        })
    }
}

/// Maps the `none` sentinel (any case) and blank values to `None`.
#[must_use]
pub fn normalize_profile(profile: &str) -> Option<String> {
    let trimmed = profile.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(NO_PROFILE) {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task() -> TaskFile {
        TaskFile {
            name: Some(String::from("web-asg")),
            instance_ids: vec![String::from("i-0abc"), String::from("i-0def")],
            state: Some(DesiredState::Standby),
            ..TaskFile::default()
        }
    }

    #[test]
    fn test_state_translation() {
        assert_eq!(DesiredState::Standby.provider_state(), LifecycleState::Standby);
        assert_eq!(DesiredState::InService.provider_state(), LifecycleState::InService);
        assert_eq!(DesiredState::Standby.provider_state().as_str(), "Standby");
        assert_eq!(DesiredState::InService.provider_state().as_str(), "InService");
    }

    #[test]
    fn test_state_tokens() {
        assert_eq!("standby".parse::<DesiredState>().ok(), Some(DesiredState::Standby));
        assert_eq!("inservice".parse::<DesiredState>().ok(), Some(DesiredState::InService));
        assert!("InService".parse::<DesiredState>().is_err());
        assert_eq!(DesiredState::InService.to_string(), "inservice");
    }

    #[test]
    fn test_defaults_applied() {
        let config = StandbyConfig::try_from(task()).unwrap();
        assert_eq!(config.name, "web-asg");
        assert!(config.should_decrement);
        assert!(config.profile.is_none());
        assert_eq!(config.effective_decrement(), Some(true));
    }

    #[test]
    fn test_required_fields() {
        let missing_name = TaskFile {
            name: None,
            ..task()
        };
        assert!(matches!(
            StandbyConfig::try_from(missing_name),
            Err(ConfigError::MissingParameter { name }) if name == "name"
        ));

        let missing_ids = TaskFile {
            instance_ids: vec![],
            ..task()
        };
        assert!(matches!(
            StandbyConfig::try_from(missing_ids),
            Err(ConfigError::MissingParameter { name }) if name == "instance_ids"
        ));

        let missing_state = TaskFile {
            state: None,
            ..task()
        };
        assert!(matches!(
            StandbyConfig::try_from(missing_state),
            Err(ConfigError::MissingParameter { name }) if name == "state"
        ));
    }

    #[test]
    fn test_profile_sentinel() {
        assert_eq!(normalize_profile("none"), None);
        assert_eq!(normalize_profile("None"), None);
        assert_eq!(normalize_profile("  "), None);
        assert_eq!(normalize_profile("ops"), Some(String::from("ops")));
    }

    #[test]
    fn test_decrement_has_no_meaning_for_inservice() {
        let config = StandbyConfig::try_from(TaskFile {
            state: Some(DesiredState::InService),
            should_decrement: Some(false),
            ..task()
        })
        .unwrap();
        assert_eq!(config.effective_decrement(), None);
    }

    #[test]
    fn test_merge_prefers_overlay() {
        let base = TaskFile {
            profile: Some(String::from("ops")),
            region: Some(String::from("eu-west-1")),
            ..task()
        };
        let overlay = TaskFile {
            state: Some(DesiredState::InService),
            region: Some(String::from("us-east-1")),
            ..TaskFile::default()
        };

        let merged = base.merge(overlay);
        assert_eq!(merged.name.as_deref(), Some("web-asg"));
        assert_eq!(merged.instance_ids.len(), 2);
        assert_eq!(merged.state, Some(DesiredState::InService));
        assert_eq!(merged.profile.as_deref(), Some("ops"));
        assert_eq!(merged.region.as_deref(), Some("us-east-1"));
    }

    #[test]
    fn test_instance_ids_accept_comma_string() {
        let joined: TaskFile = serde_yaml::from_str("instance_ids: i-0aaa, i-0bbb,").unwrap();
        assert_eq!(joined.instance_ids, vec!["i-0aaa", "i-0bbb"]);

        let listed: TaskFile = serde_yaml::from_str("instance_ids: [i-0aaa, i-0bbb]").unwrap();
        assert_eq!(listed.instance_ids, joined.instance_ids);

        let absent: TaskFile = serde_yaml::from_str("name: web-asg").unwrap();
        assert!(absent.instance_ids.is_empty());
    }

    #[test]
    fn test_should_decrement_spellings() {
        for (text, expected) in [
            ("should_decrement: yes", Some(true)),
            ("should_decrement: 'off'", Some(false)),
            ("should_decrement: \"No\"", Some(false)),
            ("should_decrement: true", Some(true)),
            ("should_decrement: false", Some(false)),
            ("should_decrement:", None),
        ] {
            let task: TaskFile = serde_yaml::from_str(text).unwrap();
            assert_eq!(task.should_decrement, expected, "{text}");
        }

        let bad: Result<TaskFile, _> = serde_yaml::from_str("should_decrement: maybe");
        assert!(bad.is_err());
    }
}

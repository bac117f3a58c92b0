//! Task parser for loading and merging task sources.
//!
//! Precedence, lowest to highest: YAML task file, `ASG_STANDBY_*`
//! environment variables, command-line flags.

use crate::error::{ConfigError, Result, StandbyError};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::spec::{StandbyConfig, TaskFile};

/// Environment variable overriding the credential profile.
pub const ENV_PROFILE: &str = "ASG_STANDBY_PROFILE";

/// Environment variable overriding the provider region.
pub const ENV_REGION: &str = "ASG_STANDBY_REGION";

/// Task parser for loading standby tasks.
#[derive(Debug, Default)]
pub struct ConfigParser {
    /// Base path for locating the `.env` file.
    base_path: Option<PathBuf>,
}

impl ConfigParser {
    /// Creates a new task parser.
    #[must_use]
    pub const fn new() -> Self {
        Self { base_path: None }
    }

    /// Sets the base path for locating the `.env` file.
    #[must_use]
    pub fn with_base_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.base_path = Some(path.into());
        self
    }

    /// Loads a task from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<TaskFile> {
        let path = path.as_ref();
        info!("Loading task from: {}", path.display());

        if !path.exists() {
            return Err(StandbyError::Config(ConfigError::FileNotFound {
                path: path.to_path_buf(),
            }));
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            StandbyError::Config(ConfigError::ParseError {
                message: format!("Failed to read file: {e}"),
                location: Some(path.display().to_string()),
            })
        })?;

        self.parse_yaml(&content, Some(path))
    }

    /// Parses a task from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is invalid or contains unknown keys.
    pub fn parse_yaml(&self, content: &str, source: Option<&Path>) -> Result<TaskFile> {
        debug!("Parsing YAML task");

        let task: TaskFile = serde_yaml::from_str(content).map_err(|e| {
            StandbyError::Config(ConfigError::ParseError {
                message: format!("YAML parse error: {e}"),
                location: source.map(|p| p.display().to_string()),
            })
        })?;

        Ok(task)
    }

    /// Resolves the final task from an optional file and command-line values.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be loaded or a required
    /// parameter is missing after merging.
    pub fn resolve(&self, file: Option<&Path>, flags: TaskFile) -> Result<StandbyConfig> {
        let env = Self::overrides_from(
            std::env::var(ENV_PROFILE).ok(),
            std::env::var(ENV_REGION).ok(),
        );
        self.resolve_layers(file, env, flags)
    }

    /// Merges file, environment and flag layers, in that order.
    fn resolve_layers(
        &self,
        file: Option<&Path>,
        env: TaskFile,
        flags: TaskFile,
    ) -> Result<StandbyConfig> {
        let base = match file {
            Some(path) => self.load_file(path)?,
            None => TaskFile::default(),
        };

        let merged = base.merge(env).merge(flags);
        let config = StandbyConfig::try_from(merged)?;

        debug!(
            "Resolved task: group={} state={} instances={}",
            config.name,
            config.state,
            config.instance_ids.len()
        );
        Ok(config)
    }

    /// Builds the environment layer from `ASG_STANDBY_PROFILE` and
    /// `ASG_STANDBY_REGION` values.
    #[must_use]
    pub fn overrides_from(profile: Option<String>, region: Option<String>) -> TaskFile {
        if profile.is_some() {
            debug!("Overriding profile from environment");
        }
        if region.is_some() {
            debug!("Overriding region from environment");
        }

        TaskFile {
            profile,
            region,
            ..TaskFile::default()
        }
    }

    /// Loads the .env file if present.
    ///
    /// # Errors
    ///
    /// Returns an error if the .env file exists but cannot be loaded.
    pub fn load_dotenv(&self) -> Result<()> {
        let env_path = self
            .base_path
            .as_ref()
            .map_or_else(|| PathBuf::from(".env"), |p| p.join(".env"));

        if env_path.exists() {
            info!("Loading environment from: {}", env_path.display());
            dotenvy::from_path(&env_path).map_err(|e| {
                StandbyError::Config(ConfigError::ParseError {
                    message: format!("Failed to load .env file: {e}"),
                    location: Some(env_path.display().to_string()),
                })
            })?;
        } else {
            debug!(".env file not found at: {}", env_path.display());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DesiredState;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_minimal_task() {
        let yaml = r"
name: web-asg
instance_ids:
  - i-0123456789abcdef0
state: standby
";
        let parser = ConfigParser::new();
        let task = parser.parse_yaml(yaml, None).unwrap();

        assert_eq!(task.name.as_deref(), Some("web-asg"));
        assert_eq!(task.instance_ids, vec![String::from("i-0123456789abcdef0")]);
        assert_eq!(task.state, Some(DesiredState::Standby));
        assert_eq!(task.should_decrement, None);
    }

    #[test]
    fn test_parse_full_task() {
        let yaml = r"
name: web-asg
instance_ids: [i-0aaa, i-0bbb]
state: inservice
should_decrement: false
profile: ops
region: eu-west-1
";
        let parser = ConfigParser::new();
        let task = parser.parse_yaml(yaml, None).unwrap();

        assert_eq!(task.state, Some(DesiredState::InService));
        assert_eq!(task.should_decrement, Some(false));
        assert_eq!(task.profile.as_deref(), Some("ops"));
        assert_eq!(task.region.as_deref(), Some("eu-west-1"));
    }

    #[test]
    fn test_rejects_unknown_state_and_keys() {
        let parser = ConfigParser::new();
        assert!(parser.parse_yaml("state: terminated\n", None).is_err());
        assert!(parser.parse_yaml("name: a\nmin_size: 3\n", None).is_err());
    }

    #[test]
    fn test_resolve_flags_override_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "name: from-file\ninstance_ids: [i-0aaa]\nstate: standby\nshould_decrement: true"
        )
        .unwrap();

        let flags = TaskFile {
            instance_ids: vec![String::from("i-0bbb"), String::from("i-0ccc")],
            should_decrement: Some(false),
            ..TaskFile::default()
        };

        let parser = ConfigParser::new();
        let config = parser.resolve(Some(file.path()), flags).unwrap();

        assert_eq!(config.name, "from-file");
        assert_eq!(
            config.instance_ids,
            vec![String::from("i-0bbb"), String::from("i-0ccc")]
        );
        assert_eq!(config.state, DesiredState::Standby);
        assert!(!config.should_decrement);
    }

    #[test]
    fn test_resolve_missing_file() {
        let parser = ConfigParser::new();
        let result =
            parser.resolve(Some(Path::new("/nonexistent/task.yaml")), TaskFile::default());
        assert!(matches!(
            result,
            Err(StandbyError::Config(ConfigError::FileNotFound { .. }))
        ));
    }

    #[test]
    fn test_resolve_without_file_requires_flags() {
        let parser = ConfigParser::new();
        let result = parser.resolve(None, TaskFile::default());
        assert!(matches!(
            result,
            Err(StandbyError::Config(ConfigError::MissingParameter { .. }))
        ));
    }

    #[test]
    fn test_environment_sits_between_file_and_flags() {
        let mut file = NamedTempFile::new().unwrap();
        let yaml = "name: web-asg\ninstance_ids: [i-0aaa]\nstate: inservice\n\
                    profile: file-profile\nregion: eu-west-1\n";
        file.write_all(yaml.as_bytes()).unwrap();

        let env = ConfigParser::overrides_from(
            Some(String::from("env-profile")),
            Some(String::from("us-east-1")),
        );
        let flags = TaskFile {
            region: Some(String::from("ap-southeast-2")),
            ..TaskFile::default()
        };

        let config = ConfigParser::new()
            .resolve_layers(Some(file.path()), env, flags)
            .unwrap();

        assert_eq!(config.profile.as_deref(), Some("env-profile"));
        assert_eq!(config.region.as_deref(), Some("ap-southeast-2"));
    }

    #[test]
    fn test_environment_none_profile_means_default() {
        let flags = TaskFile {
            name: Some(String::from("web-asg")),
            instance_ids: vec![String::from("i-0aaa")],
            state: Some(DesiredState::Standby),
            ..TaskFile::default()
        };
        let env = ConfigParser::overrides_from(Some(String::from("None")), None);

        let config = ConfigParser::new().resolve_layers(None, env, flags).unwrap();
        assert!(config.profile.is_none());
        assert!(config.region.is_none());
    }

    #[test]
    fn test_load_dotenv_from_base_path() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(".env"),
            "ASG_STANDBY_DOTENV_MARKER_7d2e=loaded\n",
        )
        .unwrap();

        ConfigParser::new()
            .with_base_path(dir.path())
            .load_dotenv()
            .unwrap();

        assert_eq!(
            std::env::var("ASG_STANDBY_DOTENV_MARKER_7d2e").as_deref(),
            Ok("loaded")
        );
    }

    #[test]
    fn test_load_dotenv_absent_is_ok() {
        let dir = tempfile::TempDir::new().unwrap();
        assert!(ConfigParser::new().with_base_path(dir.path()).load_dotenv().is_ok());
    }
}

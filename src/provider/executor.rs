//! Transition executor backed by the AWS CLI.
//!
//! Maps a [`TransitionRequest`] onto a single `aws autoscaling enter-standby`
//! or `exit-standby` invocation.

use async_trait::async_trait;
use tracing::{error, info};

use crate::error::TransitionError;
use crate::planner::{TransitionAction, TransitionExecutor, TransitionRequest};

use super::cli::AwsCli;

/// Applies lifecycle transitions with the AWS CLI.
#[derive(Debug, Clone)]
pub struct AwsCliExecutor {
    /// AWS CLI runner.
    cli: AwsCli,
}

impl AwsCliExecutor {
    /// Creates a new executor.
    #[must_use]
    pub const fn new(cli: AwsCli) -> Self {
        Self { cli }
    }

    /// Builds the argument vector for a request.
    ///
    /// The request's profile, when set, replaces the runner's default profile.
    #[must_use]
    pub fn transition_args(&self, request: &TransitionRequest) -> Vec<String> {
        let mut args = vec![
            String::from("autoscaling"),
            request.action.to_string(),
            String::from("--instance-ids"),
        ];
        args.extend(request.change_set.instance_ids().iter().cloned());
        args.push(String::from("--auto-scaling-group-name"));
        args.push(request.group.clone());

        if let TransitionAction::EnterStandby { decrement_capacity } = request.action {
            args.push(String::from(if decrement_capacity {
                "--should-decrement-desired-capacity"
            } else {
                "--no-should-decrement-desired-capacity"
            }));
        }

        match &request.profile {
            Some(profile) => {
                let mut args = self.cli.with_identity(args);
                override_profile(&mut args, profile);
                args
            }
            None => self.cli.with_identity(args),
        }
    }
}

/// Replaces an existing `--profile` value or appends one.
fn override_profile(args: &mut Vec<String>, profile: &str) {
    if let Some(pos) = args.iter().position(|a| a == "--profile")
        && let Some(value) = args.get_mut(pos + 1)
    {
        *value = profile.to_string();
        return;
    }
    args.push(String::from("--profile"));
    args.push(profile.to_string());
}

#[async_trait]
impl TransitionExecutor for AwsCliExecutor {
    async fn apply_transition(&self, request: &TransitionRequest) -> Result<(), TransitionError> {
        if request.change_set.is_empty() {
            return Err(TransitionError::EmptyChangeSet);
        }

        info!("Applying transition: {request}");

        let output = self
            .cli
            .run(&self.transition_args(request))
            .await
            .map_err(|e| TransitionError::Unavailable {
                message: format!("failed to run {}: {e}", self.cli.binary().display()),
            })?;

        if output.success {
            info!(
                "Provider accepted {} for {} instance(s)",
                request.action,
                request.change_set.len()
            );
            Ok(())
        } else {
            let diagnostic = output.diagnostic();
            error!("Provider rejected {}: {diagnostic}", request.action);
            Err(TransitionError::Rejected {
                group: request.group.clone(),
                instances: request.change_set.len(),
                exit_code: output.exit_code,
                diagnostic,
            })
        }
    }

    fn executor_type(&self) -> &'static str {
        "aws-cli"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DesiredState;
    use crate::planner::ChangeSet;
    use std::path::PathBuf;

    fn executor(profile: Option<&str>) -> AwsCliExecutor {
        AwsCliExecutor::new(AwsCli::with_binary(
            PathBuf::from("aws"),
            profile.map(String::from),
            None,
        ))
    }

    fn request(desired: DesiredState, decrement: bool, profile: Option<&str>) -> TransitionRequest {
        TransitionRequest::new(
            "web-asg",
            ChangeSet::new(vec![String::from("i-0aaa"), String::from("i-0bbb")]),
            desired,
            decrement,
            profile.map(String::from),
        )
    }

    #[test]
    fn test_enter_standby_args() {
        let args = executor(None).transition_args(&request(DesiredState::Standby, true, None));
        assert_eq!(
            args,
            vec![
                "autoscaling",
                "enter-standby",
                "--instance-ids",
                "i-0aaa",
                "i-0bbb",
                "--auto-scaling-group-name",
                "web-asg",
                "--should-decrement-desired-capacity",
            ]
        );
    }

    #[test]
    fn test_enter_standby_without_decrement() {
        let args = executor(None).transition_args(&request(DesiredState::Standby, false, None));
        assert!(args.contains(&String::from("--no-should-decrement-desired-capacity")));
        assert!(!args.contains(&String::from("--should-decrement-desired-capacity")));
    }

    #[test]
    fn test_exit_standby_has_no_capacity_option() {
        for decrement in [true, false] {
            let args = executor(None)
                .transition_args(&request(DesiredState::InService, decrement, None));
            assert_eq!(args[1], "exit-standby");
            assert!(!args.iter().any(|a| a.contains("decrement")));
        }
    }

    #[test]
    fn test_request_profile_wins() {
        let args = executor(Some("default-ops"))
            .transition_args(&request(DesiredState::InService, true, Some("break-glass")));
        let profiles: Vec<&String> = args.iter().filter(|a| *a == "--profile").collect();
        assert_eq!(profiles.len(), 1);
        assert_eq!(args.last().map(String::as_str), Some("break-glass"));
    }

    #[tokio::test]
    async fn test_empty_change_set_rejected_before_spawn() {
        let executor = AwsCliExecutor::new(AwsCli::with_binary(
            PathBuf::from("/nonexistent/aws"),
            None,
            None,
        ));
        let empty = TransitionRequest::new(
            "web-asg",
            ChangeSet::default(),
            DesiredState::Standby,
            true,
            None,
        );

        let result = executor.apply_transition(&empty).await;
        assert!(matches!(result, Err(TransitionError::EmptyChangeSet)));
    }

    #[tokio::test]
    async fn test_missing_binary_is_unavailable() {
        let executor = AwsCliExecutor::new(AwsCli::with_binary(
            PathBuf::from("/nonexistent/aws"),
            None,
            None,
        ));

        let result = executor
            .apply_transition(&request(DesiredState::Standby, true, None))
            .await;
        assert!(matches!(result, Err(TransitionError::Unavailable { .. })));
    }

    #[cfg(unix)]
    mod stub_cli {
        use super::*;
        use std::os::unix::fs::PermissionsExt;
        use tempfile::TempDir;

        /// Writes a shell script standing in for `aws` that records its argv.
        fn stub(dir: &TempDir, exit_code: i32) -> (PathBuf, PathBuf) {
            let log = dir.path().join("argv.log");
            let script = dir.path().join("aws");
            let body = format!(
                "#!/bin/sh\nfor a in \"$@\"; do echo \"$a\" >> '{}'; done\n\
                 echo 'An error occurred (ValidationError): boom' >&2\nexit {exit_code}\n",
                log.display()
            );
            std::fs::write(&script, body).unwrap();
            std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
            (script, log)
        }

        #[tokio::test]
        async fn test_single_batched_call() {
            let dir = TempDir::new().unwrap();
            let (script, log) = stub(&dir, 0);
            let executor = AwsCliExecutor::new(AwsCli::with_binary(script, None, None));

            executor
                .apply_transition(&request(DesiredState::Standby, false, None))
                .await
                .unwrap();

            let recorded = std::fs::read_to_string(log).unwrap();
            let argv: Vec<&str> = recorded.lines().collect();
            assert_eq!(argv.iter().filter(|a| **a == "enter-standby").count(), 1);
            assert!(argv.contains(&"i-0aaa"));
            assert!(argv.contains(&"i-0bbb"));
            assert!(argv.contains(&"--no-should-decrement-desired-capacity"));
        }

        #[tokio::test]
        async fn test_failure_surfaces_diagnostic() {
            let dir = TempDir::new().unwrap();
            let (script, _log) = stub(&dir, 254);
            let executor = AwsCliExecutor::new(AwsCli::with_binary(script, None, None));

            let err = executor
                .apply_transition(&request(DesiredState::Standby, false, None))
                .await
                .unwrap_err();

            match err {
                TransitionError::Rejected {
                    instances,
                    exit_code,
                    diagnostic,
                    ..
                } => {
                    assert_eq!(instances, 2);
                    assert_eq!(exit_code, Some(254));
                    assert_eq!(diagnostic, "An error occurred (ValidationError): boom");
                }
                other => panic!("unexpected error: {other}"),
            }
        }
    }
}

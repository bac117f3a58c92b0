//! AWS command-line runner.
//!
//! All provider traffic goes through the `aws` executable. Commands are
//! spawned directly with an argument vector; nothing is passed through a
//! shell.

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, trace};

use crate::error::{ProviderError, Result, StandbyError};

/// Name of the provider executable.
pub const AWS_BINARY: &str = "aws";

/// Environment variable pointing at an explicit `aws` executable.
pub const ENV_AWS_CLI: &str = "ASG_STANDBY_AWS_CLI";

/// Captured output of one provider command.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    /// Whether the command exited with status zero.
    pub success: bool,
    /// Standard output.
    pub stdout: String,
    /// Standard error.
    pub stderr: String,
    /// Exit code if the process exited normally.
    pub exit_code: Option<i32>,
}

impl CommandOutput {
    /// Raw diagnostic for a failed command: stderr, or stdout when stderr is empty.
    #[must_use]
    pub fn diagnostic(&self) -> String {
        let stderr = self.stderr.trim();
        if stderr.is_empty() {
            self.stdout.trim().to_string()
        } else {
            stderr.to_string()
        }
    }
}

/// Handle on the `aws` executable plus the identity options for every call.
#[derive(Debug, Clone)]
pub struct AwsCli {
    /// Path to the executable.
    binary: PathBuf,
    /// Credential profile, `None` for the default identity.
    profile: Option<String>,
    /// Region, `None` to let the CLI resolve it.
    region: Option<String>,
}

impl AwsCli {
    /// Locates the `aws` executable without touching the network.
    ///
    /// `ASG_STANDBY_AWS_CLI` takes precedence over a `PATH` search.
    ///
    /// # Errors
    ///
    /// Returns `DependencyMissing` if no usable executable is found.
    pub fn discover(profile: Option<String>, region: Option<String>) -> Result<Self> {
        let binary = Self::locate(std::env::var_os(ENV_AWS_CLI), std::env::var_os("PATH"))?;
        debug!("Using AWS CLI at {}", binary.display());
        Ok(Self::with_binary(binary, profile, region))
    }

    /// Resolves the executable from an explicit override or a `PATH` value.
    ///
    /// # Errors
    ///
    /// Returns `DependencyMissing` if the override is not a file, or if no
    /// `PATH` entry holds the executable.
    pub fn locate(explicit: Option<OsString>, path: Option<OsString>) -> Result<PathBuf> {
        if let Some(explicit) = explicit {
            let binary = PathBuf::from(explicit);
            if !binary.is_file() {
                return Err(StandbyError::Provider(ProviderError::dependency_missing(
                    AWS_BINARY,
                    format!(
                        "{ENV_AWS_CLI} points at {}, which is not a file",
                        binary.display()
                    ),
                )));
            }
            return Ok(binary);
        }

        path.and_then(|paths| find_in_path(AWS_BINARY, &paths))
            .ok_or_else(|| {
                StandbyError::Provider(ProviderError::dependency_missing(
                    AWS_BINARY,
                    "the AWS CLI is required but was not found on PATH",
                ))
            })
    }

    /// Creates a runner for an explicit executable.
    #[must_use]
    pub const fn with_binary(
        binary: PathBuf,
        profile: Option<String>,
        region: Option<String>,
    ) -> Self {
        Self {
            binary,
            profile,
            region,
        }
    }

    /// Path to the executable in use.
    #[must_use]
    pub fn binary(&self) -> &Path {
        &self.binary
    }

    /// Appends the identity options shared by every command.
    #[must_use]
    pub fn with_identity(&self, mut args: Vec<String>) -> Vec<String> {
        if let Some(profile) = &self.profile {
            args.push(String::from("--profile"));
            args.push(profile.clone());
        }
        if let Some(region) = &self.region {
            args.push(String::from("--region"));
            args.push(region.clone());
        }
        args
    }

    /// Runs the executable with the given arguments and captures its output.
    ///
    /// A non-zero exit is reported through [`CommandOutput::success`], not as
    /// an error.
    ///
    /// # Errors
    ///
    /// Returns an IO error if the process cannot be spawned.
    pub async fn run(&self, args: &[String]) -> std::io::Result<CommandOutput> {
        debug!("Running: {} {}", self.binary.display(), args.join(" "));

        let output = Command::new(&self.binary)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await?;

        let result = CommandOutput {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            exit_code: output.status.code(),
        };

        trace!("Command exited with {:?}", result.exit_code);
        Ok(result)
    }
}

/// File names the executable may have on this platform.
fn candidate_names(name: &str) -> Vec<String> {
    if cfg!(windows) {
        vec![format!("{name}.exe"), format!("{name}.cmd"), name.to_string()]
    } else {
        vec![name.to_string()]
    }
}

/// Searches a `PATH` value for an executable file.
fn find_in_path(name: &str, paths: &OsStr) -> Option<PathBuf> {
    let names = candidate_names(name);
    std::env::split_paths(paths)
        .flat_map(|dir| names.iter().map(move |n| dir.join(n)))
        .find(|candidate| candidate.is_file())
}

//! asg-standby CLI entrypoint.
//!
//! This is the main entrypoint for the asg-standby command-line tool.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use asg_standby::cli::{Cli, Commands, OutputFormatter, TaskArgs};
use asg_standby::config::{normalize_profile, ConfigParser, ConfigValidator, StandbyConfig};
use asg_standby::error::{ConfigError, Result, StandbyError};
use asg_standby::provider::{AwsCli, AwsCliExecutor, GroupObserver, GroupSource};
use asg_standby::reconciler::Reconciler;

use clap::Parser;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

/// Main entrypoint.
fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let formatter = OutputFormatter::new(cli.output);

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to create async runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(cli, &formatter)) {
        Ok(code) => code,
        Err(e) => {
            let message = if e.is_dependency_missing() {
                format!("{e} (install the AWS CLI or set ASG_STANDBY_AWS_CLI)")
            } else {
                e.to_string()
            };
            emit(&formatter.format_error(&message));
            ExitCode::FAILURE
        }
    }
}

/// Initializes the logging system.
///
/// `RUST_LOG` wins over `--verbose`. Logs go to stderr so stdout stays
/// parseable in JSON mode.
fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Writes a rendered result to stdout.
fn emit(text: &str) {
    let mut stdout = std::io::stdout().lock();
    let _ = stdout.write_all(text.as_bytes());
    if !text.ends_with('\n') {
        let _ = stdout.write_all(b"\n");
    }
    let _ = stdout.flush();
}

/// Main async entry point.
async fn run(cli: Cli, formatter: &OutputFormatter) -> Result<ExitCode> {
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Apply { task } => cmd_apply(config_path, task, formatter).await,
        Commands::Plan { task } => cmd_plan(config_path, task, formatter).await,
        Commands::Status {
            name,
            profile,
            region,
        } => cmd_status(&name, profile, region, formatter).await,
        Commands::Validate { task, warnings } => {
            cmd_validate(config_path, task, warnings, formatter)
        }
    }
}

/// Resolves the task from file, environment and flags.
fn load_task(config_path: Option<&Path>, task: TaskArgs) -> Result<StandbyConfig> {
    let base = config_path
        .and_then(Path::parent)
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf);

    let parser = ConfigParser::new().with_base_path(base);
    parser.load_dotenv()?;

    if let Some(path) = config_path {
        debug!("Loading task file: {}", path.display());
    }

    parser.resolve(config_path, task.into())
}

/// Resolves and validates the task, then locates the AWS CLI.
fn prepare(config_path: Option<&Path>, task: TaskArgs) -> Result<(StandbyConfig, AwsCli)> {
    let config = load_task(config_path, task)?;
    let result = ConfigValidator::new().validate(&config)?;
    for warning in &result.warnings {
        warn!("{warning}");
    }

    let cli = AwsCli::discover(config.profile.clone(), config.region.clone())?;
    debug!("Using AWS CLI at {}", cli.binary().display());
    Ok((config, cli))
}

/// Reconcile the requested instances.
async fn cmd_apply(
    config_path: Option<&Path>,
    task: TaskArgs,
    formatter: &OutputFormatter,
) -> Result<ExitCode> {
    let (config, cli) = prepare(config_path, task)?;
    info!("Reconciling {} toward {}", config.name, config.state);

    let observer = GroupObserver::new(cli.clone());
    let executor = AwsCliExecutor::new(cli);
    let reconciler = Reconciler::new(&observer, &executor);

    let outcome = reconciler.reconcile(&config).await?;
    emit(&formatter.format_outcome(&outcome));

    Ok(ExitCode::SUCCESS)
}

/// Show what apply would change.
async fn cmd_plan(
    config_path: Option<&Path>,
    task: TaskArgs,
    formatter: &OutputFormatter,
) -> Result<ExitCode> {
    let (config, cli) = prepare(config_path, task)?;

    let observer = GroupObserver::new(cli.clone());
    let executor = AwsCliExecutor::new(cli);
    let reconciler = Reconciler::new(&observer, &executor);

    let plan = reconciler.plan(&config).await?;
    emit(&formatter.format_plan(&plan));

    Ok(ExitCode::SUCCESS)
}

/// Show the group's current instances.
async fn cmd_status(
    name: &str,
    profile: Option<String>,
    region: Option<String>,
    formatter: &OutputFormatter,
) -> Result<ExitCode> {
    if name.trim().is_empty() {
        return Err(StandbyError::Config(ConfigError::missing("name")));
    }

    let profile = profile.as_deref().and_then(normalize_profile);
    let cli = AwsCli::discover(profile, region)?;
    let observer = GroupObserver::new(cli);

    let group = observer.fetch_group(name).await?;
    emit(&formatter.format_group(&group));

    Ok(ExitCode::SUCCESS)
}

/// Validate the task without contacting the provider.
fn cmd_validate(
    config_path: Option<&Path>,
    task: TaskArgs,
    show_warnings: bool,
    formatter: &OutputFormatter,
) -> Result<ExitCode> {
    let config = load_task(config_path, task)?;
    info!("Validating task for group: {}", config.name);

    let result = ConfigValidator::new().check(&config);
    emit(&formatter.format_validation(&config, &result, show_warnings));

    Ok(if result.is_valid() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

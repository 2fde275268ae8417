//! One build attempt: resolve inputs, run the toolchain, chime

use crate::command::BuildCommand;
use crate::config::AppConfig;
use crate::env::BuildEnvironment;
use crate::error::{AppBuildError, Result};
use crate::runner::CommandRunner;
use crate::sound::Notifier;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Per-invocation switches
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// Config file; defaults to `<workspace>/cmd/app/app_config.json`
    pub config_path: Option<PathBuf>,
    /// Print the command line and stop
    pub dry_run: bool,
    /// Interpolate `None` for missing `Name`/`Version` instead of failing
    pub lenient: bool,
    /// Extra `-X symbol=value` pairs
    pub defines: Vec<(String, String)>,
    /// Compiler driver override
    pub program: Option<String>,
}

/// Summary of a finished build attempt
#[derive(Debug, Clone)]
pub struct BuildReport {
    pub output_path: PathBuf,
    pub command_line: String,
    /// `None` for dry runs
    pub exit_code: Option<i32>,
    pub duration: Duration,
}

/// Load the app config and assemble the command without running anything
pub fn plan(environment: &BuildEnvironment, options: &BuildOptions) -> Result<BuildCommand> {
    let config_path = options
        .config_path
        .clone()
        .unwrap_or_else(|| AppConfig::default_path(&environment.workspace));
    let config = AppConfig::load(&config_path)?;

    let identity = if options.lenient {
        let identity = config.identity_lenient();
        if config.name.is_none() || config.version.is_none() {
            warn!(
                "App config {:?} is missing Name or Version, continuing with placeholders",
                config_path
            );
        }
        identity
    } else {
        config.identity()?
    };

    info!("App: {} {}", identity.name, identity.version);
    info!("Environment: {}", environment.env);

    let mut command = BuildCommand::new(environment, identity);
    if let Some(program) = &options.program {
        command = command.with_program(program.clone());
    }
    for (symbol, value) in &options.defines {
        command = command.define(symbol.clone(), value.clone());
    }
    command.validate()?;
    Ok(command)
}

/// Run a single build.
///
/// The notifier fires after the toolchain returns, whatever its exit status.
/// A notifier failure is logged and never changes the result.
pub async fn build_once(
    environment: &BuildEnvironment,
    options: &BuildOptions,
    runner: &dyn CommandRunner,
    notifier: &dyn Notifier,
) -> Result<BuildReport> {
    let started = Instant::now();
    let command = plan(environment, options)?;
    let command_line = command.command_line();
    info!("Build command: {}", command_line);

    if options.dry_run {
        debug!("Dry run, toolchain not invoked");
        return Ok(BuildReport {
            output_path: command.output_path(),
            command_line,
            exit_code: None,
            duration: started.elapsed(),
        });
    }

    let outcome = runner.run(&command).await;

    let success = matches!(&outcome, Ok(o) if o.is_success());
    if let Err(e) = notifier.notify(success).await {
        warn!("Failed to play completion sound: {}", e);
    }

    let outcome = outcome?;
    if !outcome.is_success() {
        return Err(AppBuildError::BuildFailed { code: outcome.code });
    }

    let report = BuildReport {
        output_path: command.output_path(),
        command_line,
        exit_code: outcome.code,
        duration: started.elapsed(),
    };
    info!(
        "Built {} in {:.2}s",
        report.output_path.display(),
        report.duration.as_secs_f64()
    );
    Ok(report)
}

mod cli;
mod logging;
mod watch;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{Cli, Commands, Target};
use crate::watch::watch_and_rebuild;
use appbuild_core::build::{BuildOptions, build_once, plan};
use appbuild_core::config::constants;
use appbuild_core::env::BuildEnvironment;
use appbuild_core::runner::ProcessRunner;
use appbuild_core::sound::{Notifier, Silent, SystemSound};

#[tokio::main]
async fn main() {
    constants::init_constants();

    let log_file = logging::create_log_file().expect("Failed to create log file");

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_level(true)
                .with_filter(
                    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
                ),
        )
        .with(
            fmt::layer()
                .with_writer(log_file)
                .with_ansi(false)
                .with_target(false)
                .with_thread_ids(false)
                .with_level(true)
                .with_filter(EnvFilter::new("debug")),
        )
        .init();

    if let Err(e) = run().await {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn resolve(target: &Target) -> appbuild_core::Result<(BuildEnvironment, BuildOptions)> {
    let environment = BuildEnvironment::resolve(
        target.workspace.as_deref(),
        target.env.as_deref(),
        |key| std::env::var(key).ok(),
    )?;
    let options = BuildOptions {
        config_path: target.config.clone(),
        lenient: target.lenient,
        defines: target.defines.clone(),
        program: target.toolchain.clone(),
        ..Default::default()
    };
    Ok((environment, options))
}

async fn run() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let args = Cli::parse();
    match args.cmd {
        Commands::Build {
            target,
            dry_run,
            quiet,
            watch,
        } => {
            let (environment, mut options) = resolve(&target)?;
            options.dry_run = dry_run;

            let notifier: Box<dyn Notifier> = if quiet || dry_run {
                Box::new(Silent)
            } else {
                Box::new(SystemSound)
            };
            let runner = ProcessRunner;

            let report = build_once(&environment, &options, &runner, notifier.as_ref()).await;
            match (&report, watch && !dry_run) {
                (Ok(report), _) if dry_run => println!("{}", report.command_line),
                (Err(e), true) => error!("Initial build failed: {}", e),
                _ => {}
            }
            if watch && !dry_run {
                watch_and_rebuild(&environment, &options, &runner, notifier.as_ref()).await?;
            } else {
                report?;
            }
        }
        Commands::Info { target } => {
            let (environment, options) = resolve(&target)?;
            let command = plan(&environment, &options)?;
            info!("Resolved build for workspace {:?}", environment.workspace);

            println!("name:       {}", command.identity().name);
            println!("version:    {}", command.identity().version);
            println!(
                "env:        {} (ENV={})",
                command.env(),
                environment.signal.as_deref().unwrap_or("<unset>")
            );
            println!("rebuild:    {}", command.rebuild().flag());
            println!("output:     {}", command.output_path().display());
            println!("command:    {}", command.command_line());
        }
    }
    Ok(())
}

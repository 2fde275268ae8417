//! Executes a [`BuildCommand`] and reports how the toolchain exited

use crate::command::BuildCommand;
use crate::error::{AppBuildError, Result};
use async_trait::async_trait;
use std::process::Stdio;
use tracing::{debug, info};

/// How the toolchain process ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOutcome {
    /// `None` when the process was terminated by a signal
    pub code: Option<i32>,
}

impl RunOutcome {
    pub fn is_success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Runs build commands
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, command: &BuildCommand) -> Result<RunOutcome>;
}

/// Spawns the real toolchain with inherited stdout/stderr
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessRunner;

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(&self, command: &BuildCommand) -> Result<RunOutcome> {
        let output_dir = command
            .output_path()
            .parent()
            .map(|p| p.to_path_buf())
            .ok_or("Artifact path has no parent directory")?;
        tokio::fs::create_dir_all(&output_dir).await?;

        let package_dir = command.package_dir();
        if !tokio::fs::metadata(&package_dir)
            .await
            .is_ok_and(|m| m.is_dir())
        {
            return Err(AppBuildError::PackageDirNotFound(package_dir));
        }

        info!("Running {}", command.program());
        debug!("Working directory: {:?}", package_dir);

        let status = command
            .to_process()
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|source| AppBuildError::Spawn {
                program: command.program().to_string(),
                source,
            })?;

        debug!("Toolchain exited with {:?}", status);
        Ok(RunOutcome {
            code: status.code(),
        })
    }
}

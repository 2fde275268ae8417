//! Completion chime played after every build attempt

use crate::error::{AppBuildError, Result};
use async_trait::async_trait;
use std::io::Write;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// Plays a notification once a build attempt has finished
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, success: bool) -> Result<()>;
}

/// Platform notification sound.
///
/// Windows plays the `SystemAsterisk` alias through PowerShell, macOS uses
/// `afplay` on a system sound, everything else rings the terminal bell.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemSound;

impl SystemSound {
    fn player() -> Option<(&'static str, Vec<&'static str>)> {
        if cfg!(target_os = "windows") {
            Some((
                "powershell",
                vec![
                    "-NoProfile",
                    "-Command",
                    "[System.Media.SystemSounds]::Asterisk.Play(); Start-Sleep -Milliseconds 500",
                ],
            ))
        } else if cfg!(target_os = "macos") {
            Some(("afplay", vec!["/System/Library/Sounds/Glass.aiff"]))
        } else {
            None
        }
    }
}

#[async_trait]
impl Notifier for SystemSound {
    async fn notify(&self, success: bool) -> Result<()> {
        debug!("Playing completion sound (success: {})", success);

        let Some((program, args)) = Self::player() else {
            let mut stderr = std::io::stderr();
            stderr.write_all(b"\x07")?;
            stderr.flush()?;
            return Ok(());
        };

        let status = Command::new(program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map_err(|e| AppBuildError::notify(format!("{program}: {e}")))?;

        if status.success() {
            Ok(())
        } else {
            Err(AppBuildError::notify(format!("{program} exited with {status}")))
        }
    }
}

/// Does nothing; used for `--quiet` and dry runs
#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

#[async_trait]
impl Notifier for Silent {
    async fn notify(&self, _success: bool) -> Result<()> {
        Ok(())
    }
}

//! Environment signals: workspace root, deployment tier and rebuild scope

use crate::config::constants;
use crate::error::{AppBuildError, Result};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Deployment tier embedded into the binary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnvName {
    Dev,
    Prod,
    Stg,
}

impl EnvName {
    /// Anything other than `dev` or `prod`, including no signal, is staging
    pub fn classify(signal: Option<&str>) -> Self {
        match signal {
            Some("dev") => Self::Dev,
            Some("prod") => Self::Prod,
            _ => Self::Stg,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dev => "dev",
            Self::Prod => "prod",
            Self::Stg => "stg",
        }
    }

    pub fn rebuild_scope(&self) -> RebuildScope {
        match self {
            Self::Dev => RebuildScope::Incremental,
            Self::Prod | Self::Stg => RebuildScope::Full,
        }
    }
}

impl fmt::Display for EnvName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether the toolchain may reuse cached packages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RebuildScope {
    Incremental,
    Full,
}

impl RebuildScope {
    /// `""` for incremental builds, `-a` for full rebuilds
    pub fn flag(&self) -> &'static str {
        match self {
            Self::Incremental => "",
            Self::Full => "-a",
        }
    }
}

/// Resolved inputs from the process environment and CLI overrides
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildEnvironment {
    pub workspace: PathBuf,
    pub env: EnvName,
    /// Raw `ENV` value, kept for diagnostics
    pub signal: Option<String>,
}

impl BuildEnvironment {
    pub fn new(workspace: impl Into<PathBuf>, signal: Option<&str>) -> Self {
        Self {
            workspace: workspace.into(),
            env: EnvName::classify(signal),
            signal: signal.map(str::to_string),
        }
    }

    /// Merge CLI overrides with an environment lookup.
    ///
    /// An override always wins. The workspace must resolve to a non-empty
    /// value; the tier signal may be absent.
    pub fn resolve<F>(
        workspace_override: Option<&Path>,
        env_override: Option<&str>,
        lookup: F,
    ) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let workspace = match workspace_override {
            Some(path) => path.to_path_buf(),
            None => lookup(constants::WORKSPACE_ENV)
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from)
                .ok_or_else(|| AppBuildError::missing_env(constants::WORKSPACE_ENV))?,
        };

        let signal = match env_override {
            Some(value) => Some(value.to_string()),
            None => lookup(constants::ENV_VAR),
        };

        let resolved = Self::new(workspace, signal.as_deref());
        debug!(
            "Resolved environment: workspace={:?} signal={:?} tier={}",
            resolved.workspace, resolved.signal, resolved.env
        );
        Ok(resolved)
    }

    pub fn rebuild_scope(&self) -> RebuildScope {
        self.env.rebuild_scope()
    }
}

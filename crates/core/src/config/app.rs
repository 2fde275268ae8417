use crate::config::constants;
use crate::error::{AppBuildError, Result};
use indexmap::IndexMap;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Application config as stored in `cmd/app/app_config.json`.
///
/// Only `Name` and `Version` drive the build. Every other key is kept in
/// document order so `info` can show it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(rename = "Name")]
    pub name: Option<String>,
    #[serde(rename = "Version")]
    pub version: Option<String>,
    #[serde(flatten)]
    pub extra: IndexMap<String, serde_json::Value>,
}

/// Validated name and version used for the artifact file name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppIdentity {
    pub name: String,
    pub version: String,
}

impl AppConfig {
    /// Default config location under a workspace root
    pub fn default_path(workspace: &Path) -> PathBuf {
        workspace.join(constants::APP_CONFIG_FILE)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Read and parse the config file
    pub fn load(path: &Path) -> Result<Self> {
        debug!("Loading app config from {:?}", path);
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => AppBuildError::ConfigNotFound(path.to_path_buf()),
            _ => AppBuildError::Io(e),
        })?;
        let config = Self::from_json(&content)?;
        debug!(
            "App config: name={:?} version={:?} extra_keys={}",
            config.name,
            config.version,
            config.extra.len()
        );
        Ok(config)
    }

    /// Require both `Name` and `Version` to be present and non-empty
    pub fn identity(&self) -> Result<AppIdentity> {
        let name = required(self.name.as_deref(), "Name")?;
        let version = required(self.version.as_deref(), "Version")?;
        Ok(AppIdentity {
            name: name.to_string(),
            version: version.to_string(),
        })
    }

    /// Substitute the `None` placeholder for absent keys instead of failing
    pub fn identity_lenient(&self) -> AppIdentity {
        let placeholder = || constants::MISSING_PLACEHOLDER.to_string();
        AppIdentity {
            name: self.name.clone().unwrap_or_else(placeholder),
            version: self.version.clone().unwrap_or_else(placeholder),
        }
    }
}

fn required<'a>(value: Option<&'a str>, key: &str) -> Result<&'a str> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(AppBuildError::missing_key(key)),
    }
}

impl AppIdentity {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }

    /// `<Name>_<Version>.exe`
    pub fn artifact_file_name(&self) -> String {
        format!(
            "{}_{}.{}",
            self.name,
            self.version,
            constants::ARTIFACT_EXTENSION
        )
    }
}

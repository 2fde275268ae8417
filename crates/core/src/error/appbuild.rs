/// Unified error type for appbuild
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppBuildError {
    // I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Configuration errors
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Missing required key '{0}' in app config")]
    MissingKey(String),

    #[error("Environment variable {0} is not set")]
    MissingEnv(String),

    #[error("App config not found: {}", .0.display())]
    ConfigNotFound(PathBuf),

    #[error("Path contains a single quote, which the linker flags cannot carry: {}", .0.display())]
    UnsupportedPath(PathBuf),

    // Toolchain errors
    #[error("Main package directory not found: {}", .0.display())]
    PackageDirNotFound(PathBuf),

    #[error("Failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Build failed with exit code {}", .code.map_or_else(|| "none".to_string(), |c| c.to_string()))]
    BuildFailed { code: Option<i32> },

    // Side channels
    #[error("Notification error: {0}")]
    Notify(String),

    #[error("Watch error: {0}")]
    Watch(String),

    // Generic error for compatibility
    #[error("{0}")]
    Other(String),
}

/// Result type alias using AppBuildError
pub type Result<T> = std::result::Result<T, AppBuildError>;

impl AppBuildError {
    /// Create a missing key error
    pub fn missing_key(key: impl Into<String>) -> Self {
        Self::MissingKey(key.into())
    }

    /// Create a missing environment variable error
    pub fn missing_env(name: impl Into<String>) -> Self {
        Self::MissingEnv(name.into())
    }

    pub fn notify(msg: impl Into<String>) -> Self {
        Self::Notify(msg.into())
    }

    pub fn watch(msg: impl Into<String>) -> Self {
        Self::Watch(msg.into())
    }
}

impl From<&str> for AppBuildError {
    fn from(msg: &str) -> Self {
        Self::Other(msg.to_string())
    }
}

impl From<serde_json::Error> for AppBuildError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

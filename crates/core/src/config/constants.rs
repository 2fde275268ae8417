//! Constants for appbuild

use std::path::PathBuf;
use std::sync::OnceLock;

/// Full path of the executable file
pub static EXECUTABLE_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Log directory, next to the executable
pub const LOG_DIR: &str = "logs";

/// Prefix of per-run log file names
pub const LOG_FILE_PREFIX: &str = "appbuild";

/// App config location, relative to the workspace root
pub const APP_CONFIG_FILE: &str = "cmd/app/app_config.json";

/// Windows resource object linked into the binary
pub const RESOURCE_FILE: &str = "cmd/app/app.res";

/// Artifact directory, relative to the workspace root
pub const BUILD_DIR: &str = "build";

pub const ARTIFACT_EXTENSION: &str = "exe";

/// Directory holding the `main` package; the toolchain runs from here
pub const MAIN_PACKAGE_DIR: &str = "cmd";

/// Compiler driver
pub const TOOLCHAIN: &str = "go";

/// Workspace root variable
pub const WORKSPACE_ENV: &str = "WORKSPACE_FOLDER";

/// Deployment tier variable
pub const ENV_VAR: &str = "ENV";

/// Linker symbol receiving the environment tag
pub const ENV_SYMBOL: &str = "main.env";

/// Interpolated in lenient mode for absent config keys
pub const MISSING_PLACEHOLDER: &str = "None";

/// Source directories watched for rebuilds
pub const WATCH_DIRS: &[&str] = &["cmd", "pkg"];

/// Extensions that trigger a rebuild in watch mode
pub const WATCH_EXTENSIONS: &[&str] = &["go", "json", "res"];

pub fn init_constants() {
    let exe_path = std::env::current_exe().expect("Failed to get executable path");
    EXECUTABLE_PATH
        .set(exe_path)
        .expect("EXECUTABLE_PATH has already been initialized");
}

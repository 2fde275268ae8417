//! Toolchain invocation for a versioned release binary

use crate::config::AppIdentity;
use crate::config::constants;
use crate::env::{BuildEnvironment, EnvName, RebuildScope};
use crate::error::{AppBuildError, Result};
use indexmap::IndexMap;
use std::path::PathBuf;
use tokio::process::Command;

/// A fully parameterised `go build` invocation
#[derive(Debug, Clone)]
pub struct BuildCommand {
    program: String,
    workspace: PathBuf,
    identity: AppIdentity,
    env: EnvName,
    rebuild: RebuildScope,
    /// `-X` linker symbols; `main.env` always comes first
    symbols: IndexMap<String, String>,
}

impl BuildCommand {
    pub fn new(environment: &BuildEnvironment, identity: AppIdentity) -> Self {
        let mut symbols = IndexMap::new();
        symbols.insert(
            constants::ENV_SYMBOL.to_string(),
            environment.env.as_str().to_string(),
        );

        Self {
            program: constants::TOOLCHAIN.to_string(),
            workspace: environment.workspace.clone(),
            identity,
            env: environment.env,
            rebuild: environment.rebuild_scope(),
            symbols,
        }
    }

    /// Replace the compiler driver, e.g. a pinned `go1.22.4` wrapper
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Add an extra `-X symbol=value`. The environment tag cannot be overridden.
    pub fn define(mut self, symbol: impl Into<String>, value: impl Into<String>) -> Self {
        let symbol = symbol.into();
        if symbol != constants::ENV_SYMBOL {
            self.symbols.insert(symbol, value.into());
        }
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn identity(&self) -> &AppIdentity {
        &self.identity
    }

    pub fn env(&self) -> EnvName {
        self.env
    }

    pub fn rebuild(&self) -> RebuildScope {
        self.rebuild
    }

    pub fn symbols(&self) -> &IndexMap<String, String> {
        &self.symbols
    }

    /// `<workspace>/build/<Name>_<Version>.exe`
    pub fn output_path(&self) -> PathBuf {
        self.workspace
            .join(constants::BUILD_DIR)
            .join(self.identity.artifact_file_name())
    }

    pub fn resource_path(&self) -> PathBuf {
        self.workspace.join(constants::RESOURCE_FILE)
    }

    /// Directory the toolchain runs in
    pub fn package_dir(&self) -> PathBuf {
        self.workspace.join(constants::MAIN_PACKAGE_DIR)
    }

    /// The toolchain splits `-extldflags '...'` itself and has no escape for a
    /// quote inside the single-quoted resource path.
    pub fn validate(&self) -> Result<()> {
        let resource = self.resource_path();
        if resource.to_string_lossy().contains('\'') {
            return Err(AppBuildError::UnsupportedPath(resource));
        }
        Ok(())
    }

    /// Value of the `-ldflags` argument
    pub fn ldflags(&self) -> String {
        let symbols = self
            .symbols
            .iter()
            .map(|(symbol, value)| format!("-X {symbol}={value}"))
            .collect::<Vec<_>>()
            .join(" ");

        format!(
            "-s -w -H=windowsgui {} -linkmode external -extldflags '-static -Wl,{}'",
            symbols,
            self.resource_path().display()
        )
    }

    /// Arguments passed to the toolchain, without the program name.
    /// An incremental build has no rebuild flag at all.
    pub fn args(&self) -> Vec<String> {
        let mut args = vec![
            "build".to_string(),
            "-o".to_string(),
            self.output_path().display().to_string(),
            "-trimpath".to_string(),
            "-v".to_string(),
        ];
        let flag = self.rebuild.flag();
        if !flag.is_empty() {
            args.push(flag.to_string());
        }
        args.push("-buildmode=exe".to_string());
        args.push("-ldflags".to_string());
        args.push(self.ldflags());
        args
    }

    /// Single-line shell form, as printed to the log and by `--dry-run`.
    ///
    /// Keeps the historical layout: the rebuild slot is always present, so an
    /// incremental build shows two spaces after `-v`, and the line ends with a
    /// trailing space.
    pub fn command_line(&self) -> String {
        format!(
            "{} build -o {} -trimpath -v {} -buildmode=exe -ldflags \"{}\" ",
            self.program,
            self.output_path().display(),
            self.rebuild.flag(),
            self.ldflags()
        )
    }

    /// Process ready to spawn. Arguments are passed directly, no shell involved.
    pub fn to_process(&self) -> Command {
        let mut command = Command::new(&self.program);
        command.args(self.args()).current_dir(self.package_dir());
        command
    }
}

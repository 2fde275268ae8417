pub mod build;
pub mod command;
pub mod config;
pub mod env;
pub mod error;
pub mod runner;
pub mod sound;
pub mod util;

pub use build::{BuildOptions, BuildReport, build_once};
pub use command::BuildCommand;
pub use config::AppConfig;
pub use env::{BuildEnvironment, EnvName, RebuildScope};
pub use error::{AppBuildError, Result};

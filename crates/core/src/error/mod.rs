/// Centralized error handling for appbuild
pub mod appbuild;

pub use appbuild::{AppBuildError, Result};

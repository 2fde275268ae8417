/// Static paths and the app config document
pub mod app;
pub mod constants;

pub use app::{AppConfig, AppIdentity};

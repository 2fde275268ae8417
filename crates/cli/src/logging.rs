//! Per-run log file for appbuild

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use appbuild_core::config::constants::{EXECUTABLE_PATH, LOG_DIR, LOG_FILE_PREFIX};

/// `appbuild_<cwd folder>_<pid>_<unix secs>.log`
fn log_file_name(current_dir: &Path, pid: u32, timestamp: u64) -> String {
    let folder_name = current_dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "unknown".to_string());
    format!("{LOG_FILE_PREFIX}_{folder_name}_{pid}_{timestamp}.log")
}

/// Log path under `<exe dir>/logs`, created on demand
pub fn get_log_file_path() -> Result<PathBuf, Box<dyn std::error::Error>> {
    let current_dir = std::env::current_dir()?;
    let timestamp = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs();

    let logs_dir = EXECUTABLE_PATH
        .get()
        .ok_or("EXECUTABLE_PATH not initialized")?
        .parent()
        .ok_or("Cannot get executable parent directory")?
        .join(LOG_DIR);
    std::fs::create_dir_all(&logs_dir)?;

    Ok(logs_dir.join(log_file_name(&current_dir, std::process::id(), timestamp)))
}

pub fn create_log_file() -> Result<std::fs::File, Box<dyn std::error::Error>> {
    let log_path = get_log_file_path()?;

    let log_file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(&log_path)?;

    eprintln!("Log file: {}", log_path.display());

    Ok(log_file)
}

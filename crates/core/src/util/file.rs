use crate::config::constants;
use std::path::{Path, PathBuf};

/// Check if a changed file should trigger a rebuild
pub fn is_watched_file(path: &Path) -> bool {
    if let Some(extension) = path.extension() {
        let ext_str = extension.to_string_lossy().to_lowercase();
        return constants::WATCH_EXTENSIONS.contains(&ext_str.as_str());
    }
    false
}

/// Files under the artifact directory never trigger a rebuild
pub fn is_build_output(path: &Path, workspace: &Path) -> bool {
    path.starts_with(workspace.join(constants::BUILD_DIR))
}

/// Existing source directories to watch under the workspace root
pub fn watch_roots(workspace: &Path) -> Vec<PathBuf> {
    constants::WATCH_DIRS
        .iter()
        .map(|dir| workspace.join(dir))
        .filter(|dir| dir.is_dir())
        .collect()
}

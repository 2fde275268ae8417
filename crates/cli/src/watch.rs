use appbuild_core::build::{BuildOptions, build_once};
use appbuild_core::env::BuildEnvironment;
use appbuild_core::error::{AppBuildError, Result};
use appbuild_core::runner::CommandRunner;
use appbuild_core::sound::Notifier;
use appbuild_core::util::file::{is_build_output, is_watched_file, watch_roots};
use notify::{Config, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

/// Quiet period after the last event before a rebuild starts
const DEBOUNCE: Duration = Duration::from_millis(200);
const POLL: Duration = Duration::from_millis(100);

/// Paths from a create/modify event that should trigger a rebuild
pub fn relevant_paths(kind: &EventKind, paths: &[PathBuf], workspace: &Path) -> Vec<PathBuf> {
    match kind {
        EventKind::Create(_) | EventKind::Modify(_) => paths
            .iter()
            .filter(|path| is_watched_file(path) && !is_build_output(path, workspace))
            .cloned()
            .collect(),
        _ => Vec::new(),
    }
}

/// Directory to watch for an explicit config file, unless a source root
/// already covers it. The parent is watched so rename-on-save keeps working.
pub fn config_watch_dir(config: &Path, roots: &[PathBuf]) -> Option<PathBuf> {
    if roots.iter().any(|root| config.starts_with(root)) {
        return None;
    }
    match config.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => Some(parent.to_path_buf()),
        _ => Some(PathBuf::from(".")),
    }
}

/// Watch source directories and rebuild on change. Runs until the watcher
/// channel closes; a failed rebuild is logged and watching continues.
pub async fn watch_and_rebuild(
    environment: &BuildEnvironment,
    options: &BuildOptions,
    runner: &dyn CommandRunner,
    notifier: &dyn Notifier,
) -> Result<()> {
    let (tx, rx) = mpsc::channel();

    let mut watcher = RecommendedWatcher::new(
        move |res| {
            if let Err(e) = tx.send(res) {
                error!("Failed to send watch event: {}", e);
            }
        },
        Config::default(),
    )
    .map_err(|e| AppBuildError::watch(e.to_string()))?;

    let roots = watch_roots(&environment.workspace);
    if roots.is_empty() {
        return Err(AppBuildError::watch(format!(
            "no source directories to watch under {}",
            environment.workspace.display()
        )));
    }
    for root in &roots {
        watcher
            .watch(root, RecursiveMode::Recursive)
            .map_err(|e| AppBuildError::watch(e.to_string()))?;
        debug!("Watching directory: {:?}", root);
    }
    if let Some(config_dir) = options
        .config_path
        .as_deref()
        .and_then(|config| config_watch_dir(config, &roots))
    {
        watcher
            .watch(&config_dir, RecursiveMode::NonRecursive)
            .map_err(|e| AppBuildError::watch(e.to_string()))?;
        debug!("Watching config directory: {:?}", config_dir);
    }

    info!("Watching for changes...");

    let mut pending_changes: HashSet<PathBuf> = HashSet::new();
    let mut last_event_time = Instant::now();

    loop {
        match rx.recv_timeout(POLL) {
            Ok(Ok(event)) => {
                let paths = relevant_paths(&event.kind, &event.paths, &environment.workspace);
                if !paths.is_empty() {
                    pending_changes.extend(paths);
                    last_event_time = Instant::now();
                }
            }
            Ok(Err(e)) => {
                warn!("Watch error: {}", e);
            }
            Err(mpsc::RecvTimeoutError::Timeout) => {
                if !pending_changes.is_empty() && last_event_time.elapsed() >= DEBOUNCE {
                    let changed_files: Vec<_> = pending_changes.drain().collect();
                    info!("Detected changes: {:?}", changed_files);

                    match build_once(environment, options, runner, notifier).await {
                        Ok(report) => debug!("Rebuild finished: {}", report.output_path.display()),
                        Err(e) => error!("Rebuild failed: {}", e),
                    }
                }
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                error!("Watch channel disconnected");
                break;
            }
        }
    }

    Ok(())
}

// Build orchestration with a recording runner and notifier
use appbuild_core::build::{BuildOptions, build_once, plan};
use appbuild_core::error::{AppBuildError, Result};
use appbuild_core::runner::{CommandRunner, ProcessRunner, RunOutcome};
use appbuild_core::sound::Notifier;
use appbuild_core::{BuildCommand, BuildEnvironment};
use async_trait::async_trait;
use std::path::Path;
use std::sync::Mutex;
use tempfile::TempDir;

struct FakeRunner {
    code: Option<i32>,
    calls: Mutex<Vec<String>>,
}

impl FakeRunner {
    fn exiting(code: Option<i32>) -> Self {
        Self {
            code,
            calls: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CommandRunner for FakeRunner {
    async fn run(&self, command: &BuildCommand) -> Result<RunOutcome> {
        self.calls.lock().unwrap().push(command.command_line());
        Ok(RunOutcome { code: self.code })
    }
}

struct SpawnFailure;

#[async_trait]
impl CommandRunner for SpawnFailure {
    async fn run(&self, command: &BuildCommand) -> Result<RunOutcome> {
        Err(AppBuildError::Spawn {
            program: command.program().to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        })
    }
}

#[derive(Default)]
struct RecordingNotifier {
    events: Mutex<Vec<bool>>,
    fail: bool,
}

impl RecordingNotifier {
    fn events(&self) -> Vec<bool> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, success: bool) -> Result<()> {
        self.events.lock().unwrap().push(success);
        if self.fail {
            return Err(AppBuildError::notify("no audio device"));
        }
        Ok(())
    }
}

fn workspace(config: &str) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let app_dir = dir.path().join("cmd/app");
    std::fs::create_dir_all(&app_dir).unwrap();
    std::fs::write(app_dir.join("app_config.json"), config).unwrap();
    dir
}

fn environment(dir: &Path, signal: Option<&str>) -> BuildEnvironment {
    BuildEnvironment::new(dir, signal)
}

#[tokio::test]
async fn test_successful_build_notifies_once() {
    let dir = workspace(r#"{"Name":"MyApp","Version":"1.2.0","Description":"x"}"#);
    let runner = FakeRunner::exiting(Some(0));
    let notifier = RecordingNotifier::default();

    let report = build_once(
        &environment(dir.path(), Some("dev")),
        &BuildOptions::default(),
        &runner,
        &notifier,
    )
    .await
    .unwrap();

    assert_eq!(report.output_path, dir.path().join("build/MyApp_1.2.0.exe"));
    assert_eq!(report.exit_code, Some(0));
    assert_eq!(runner.calls(), vec![report.command_line.clone()]);
    assert!(report.command_line.contains("-X main.env=dev"));
    assert_eq!(notifier.events(), vec![true]);
}

#[tokio::test]
async fn test_failed_build_still_notifies() {
    let dir = workspace(r#"{"Name":"MyApp","Version":"1.2.0"}"#);
    let runner = FakeRunner::exiting(Some(1));
    let notifier = RecordingNotifier::default();

    let err = build_once(
        &environment(dir.path(), None),
        &BuildOptions::default(),
        &runner,
        &notifier,
    )
    .await
    .unwrap_err();

    assert!(matches!(err, AppBuildError::BuildFailed { code: Some(1) }));
    assert_eq!(notifier.events(), vec![false]);
}

#[tokio::test]
async fn test_spawn_failure_notifies_and_propagates() {
    let dir = workspace(r#"{"Name":"MyApp","Version":"1.2.0"}"#);
    let notifier = RecordingNotifier::default();

    let err = build_once(
        &environment(dir.path(), Some("prod")),
        &BuildOptions::default(),
        &SpawnFailure,
        &notifier,
    )
    .await
    .unwrap_err();

    assert!(matches!(err, AppBuildError::Spawn { .. }));
    assert_eq!(notifier.events(), vec![false]);
}

#[tokio::test]
async fn test_notifier_failure_does_not_fail_build() {
    let dir = workspace(r#"{"Name":"MyApp","Version":"1.2.0"}"#);
    let runner = FakeRunner::exiting(Some(0));
    let notifier = RecordingNotifier {
        fail: true,
        ..Default::default()
    };

    let result = build_once(
        &environment(dir.path(), Some("dev")),
        &BuildOptions::default(),
        &runner,
        &notifier,
    )
    .await;

    assert!(result.is_ok());
    assert_eq!(notifier.events(), vec![true]);
}

#[tokio::test]
async fn test_dry_run_skips_runner_and_sound() {
    let dir = workspace(r#"{"Name":"MyApp","Version":"1.2.0"}"#);
    let runner = FakeRunner::exiting(Some(0));
    let notifier = RecordingNotifier::default();
    let options = BuildOptions {
        dry_run: true,
        ..Default::default()
    };

    let report = build_once(&environment(dir.path(), None), &options, &runner, &notifier)
        .await
        .unwrap();

    assert_eq!(report.exit_code, None);
    assert!(report.command_line.contains(" -a "));
    assert!(runner.calls().is_empty());
    assert!(notifier.events().is_empty());
}

#[tokio::test]
async fn test_missing_version_is_rejected_before_running() {
    let dir = workspace(r#"{"Name":"MyApp"}"#);
    let runner = FakeRunner::exiting(Some(0));
    let notifier = RecordingNotifier::default();

    let err = build_once(
        &environment(dir.path(), Some("dev")),
        &BuildOptions::default(),
        &runner,
        &notifier,
    )
    .await
    .unwrap_err();

    assert!(matches!(err, AppBuildError::MissingKey(ref key) if key == "Version"));
    assert!(runner.calls().is_empty());
    assert!(notifier.events().is_empty());
}

#[test]
fn test_lenient_plan_uses_placeholder() {
    let dir = workspace(r#"{"Name":"MyApp"}"#);
    let options = BuildOptions {
        lenient: true,
        ..Default::default()
    };

    let command = plan(&environment(dir.path(), Some("dev")), &options).unwrap();
    assert_eq!(command.output_path(), dir.path().join("build/MyApp_None.exe"));
}

#[test]
fn test_plan_applies_defines_and_config_override() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("release.json");
    std::fs::write(&config_path, r#"{"Name":"Tool","Version":"0.9"}"#).unwrap();

    let options = BuildOptions {
        config_path: Some(config_path),
        defines: vec![("main.commit".to_string(), "abc123".to_string())],
        ..Default::default()
    };

    let command = plan(&environment(dir.path(), Some("prod")), &options).unwrap();
    assert_eq!(command.output_path(), dir.path().join("build/Tool_0.9.exe"));
    assert!(
        command
            .ldflags()
            .contains("-X main.env=prod -X main.commit=abc123")
    );
}

#[test]
fn test_plan_missing_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = plan(&environment(dir.path(), None), &BuildOptions::default()).unwrap_err();
    assert!(matches!(err, AppBuildError::ConfigNotFound(_)));
}

#[test]
fn test_plan_invalid_json() {
    let dir = workspace("{ not json");
    let err = plan(&environment(dir.path(), None), &BuildOptions::default()).unwrap_err();
    assert!(matches!(err, AppBuildError::Parse(_)));
}

fn with_program(program: &str) -> BuildOptions {
    BuildOptions {
        program: Some(program.to_string()),
        ..Default::default()
    }
}

#[cfg(unix)]
#[tokio::test]
async fn test_process_runner_success() {
    let dir = workspace(r#"{"Name":"MyApp","Version":"1.2.0"}"#);
    let notifier = RecordingNotifier::default();

    let report = build_once(
        &environment(dir.path(), Some("dev")),
        &with_program("true"),
        &ProcessRunner,
        &notifier,
    )
    .await
    .unwrap();

    assert_eq!(report.exit_code, Some(0));
    assert!(dir.path().join("build").is_dir());
    assert_eq!(notifier.events(), vec![true]);
}

#[cfg(unix)]
#[tokio::test]
async fn test_process_runner_nonzero_exit_is_build_failed() {
    let dir = workspace(r#"{"Name":"MyApp","Version":"1.2.0"}"#);
    let notifier = RecordingNotifier::default();

    let err = build_once(
        &environment(dir.path(), Some("prod")),
        &with_program("false"),
        &ProcessRunner,
        &notifier,
    )
    .await
    .unwrap_err();

    assert!(matches!(err, AppBuildError::BuildFailed { code: Some(1) }));
    assert_eq!(notifier.events(), vec![false]);
}

#[cfg(unix)]
#[tokio::test]
async fn test_process_runner_missing_package_dir() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("app_config.json");
    std::fs::write(&config_path, r#"{"Name":"MyApp","Version":"1.2.0"}"#).unwrap();
    let options = BuildOptions {
        config_path: Some(config_path),
        ..with_program("true")
    };

    let err = build_once(
        &environment(dir.path(), Some("dev")),
        &options,
        &ProcessRunner,
        &RecordingNotifier::default(),
    )
    .await
    .unwrap_err();

    assert!(
        matches!(err, AppBuildError::PackageDirNotFound(ref p) if p == &dir.path().join("cmd"))
    );
    assert!(err.to_string().contains("Main package directory not found"));
}

#[test]
fn test_plan_rejects_quoted_workspace() {
    let root = tempfile::tempdir().unwrap();
    let ws = root.path().join("it's");
    std::fs::create_dir_all(ws.join("cmd/app")).unwrap();
    std::fs::write(
        ws.join("cmd/app/app_config.json"),
        r#"{"Name":"MyApp","Version":"1.2.0"}"#,
    )
    .unwrap();

    let err = plan(&environment(&ws, Some("dev")), &BuildOptions::default()).unwrap_err();
    assert!(matches!(err, AppBuildError::UnsupportedPath(_)));
}

//! Process launcher tests using a shell script standing in for `java`
#![cfg(unix)]

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use minem::core::error::MinemError;
use minem::core::launch::{launch, LaunchOptions, LaunchOutcome};

fn fake_java(dir: &Path, body: &str) -> PathBuf {
    let path = dir.join("fake-java");
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    let mut perms = std::fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).unwrap();
    path
}

fn options(server_dir: &Path, java: PathBuf, detach: bool) -> LaunchOptions {
    std::fs::write(server_dir.join("server.jar"), b"jar").unwrap();
    LaunchOptions {
        server_dir: server_dir.to_path_buf(),
        server_file: "server.jar".into(),
        mem_min: "1G".into(),
        mem_max: "2G".into(),
        java_args: vec!["-Dlog4j2.formatMsgNoLookups=true".into()],
        args: vec!["--world".into(), "lobby".into()],
        java_path: Some(java),
        detach,
    }
}

#[tokio::test]
async fn attached_launch_reports_child_exit_code() {
    let bin = tempfile::tempdir().unwrap();
    let server = tempfile::tempdir().unwrap();
    let java = fake_java(bin.path(), "exit 3");

    let outcome = launch(&options(server.path(), java, false)).await.unwrap();
    assert_eq!(outcome, LaunchOutcome::Exited(3));
}

#[tokio::test]
async fn attached_launch_runs_in_server_dir_with_ordered_args() {
    let bin = tempfile::tempdir().unwrap();
    let server = tempfile::tempdir().unwrap();
    let java = fake_java(bin.path(), "printf '%s\\n' \"$@\" > args.txt\nexit 0");

    let outcome = launch(&options(server.path(), java, false)).await.unwrap();
    assert_eq!(outcome, LaunchOutcome::Exited(0));

    let recorded = std::fs::read_to_string(server.path().join("args.txt")).unwrap();
    assert_eq!(
        recorded.lines().collect::<Vec<_>>(),
        vec![
            "-Xmx2G",
            "-Xms1G",
            "-Dlog4j2.formatMsgNoLookups=true",
            "-jar",
            "server.jar",
            "nogui",
            "--world",
            "lobby"
        ]
    );
}

#[tokio::test]
async fn detached_launch_returns_before_child_exits() {
    let bin = tempfile::tempdir().unwrap();
    let server = tempfile::tempdir().unwrap();
    let java = fake_java(bin.path(), "sleep 5");

    let started = Instant::now();
    let outcome = launch(&options(server.path(), java, true)).await.unwrap();

    assert!(matches!(outcome, LaunchOutcome::Detached { pid } if pid > 0));
    assert!(started.elapsed() < Duration::from_secs(3));
}

#[tokio::test]
async fn non_executable_runtime_is_spawn_failure() {
    let bin = tempfile::tempdir().unwrap();
    let server = tempfile::tempdir().unwrap();
    let java = bin.path().join("not-executable");
    std::fs::write(&java, b"plain file").unwrap();

    let err = launch(&options(server.path(), java, false)).await.unwrap_err();
    assert!(matches!(err, MinemError::SpawnFailed { .. }));
}

#[tokio::test]
async fn missing_jar_points_at_download() {
    let bin = tempfile::tempdir().unwrap();
    let server = tempfile::tempdir().unwrap();
    let java = fake_java(bin.path(), "exit 0");

    let mut opts = options(server.path(), java, false);
    opts.server_file = "paper.jar".into();

    let err = launch(&opts).await.unwrap_err();
    assert!(matches!(err, MinemError::ArtifactMissing { .. }));
    assert!(err.to_string().contains("minem download"));
}

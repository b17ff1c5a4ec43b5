use bucket_deploy_core::build::{build_dir, clean_build_dir, CommandBuildRunner};
use bucket_deploy_core::contract::BuildRunner;
use bucket_deploy_core::DeployError;
use std::fs;
use tempfile::tempdir;

fn sh(script: &str) -> CommandBuildRunner {
    CommandBuildRunner::new("sh", vec!["-c".to_string(), script.to_string()])
}

#[test]
fn clean_build_dir_removes_previous_output() {
    let dir = tempdir().unwrap();
    let build = build_dir(dir.path());
    fs::create_dir_all(build.join("static/js")).unwrap();
    fs::write(build.join("static/js/old.js"), "old").unwrap();

    clean_build_dir(dir.path()).unwrap();
    assert!(!build.exists());
}

#[test]
fn clean_build_dir_without_build_is_a_noop() {
    let dir = tempdir().unwrap();
    clean_build_dir(dir.path()).unwrap();
    assert!(!build_dir(dir.path()).exists());
}

#[cfg(unix)]
#[test]
fn command_runs_in_working_dir() {
    let dir = tempdir().unwrap();
    sh("mkdir -p build && echo ok > build/index.html")
        .build(dir.path())
        .expect("build should succeed");
    assert_eq!(
        fs::read_to_string(dir.path().join("build/index.html")).unwrap(),
        "ok\n"
    );
}

#[cfg(unix)]
#[test]
fn non_zero_exit_is_a_build_error() {
    let dir = tempdir().unwrap();
    let err = sh("exit 3").build(dir.path()).unwrap_err();
    match err {
        DeployError::Build(msg) => assert!(msg.contains("code 3"), "message was: {msg}"),
        other => panic!("expected build error, got {other:?}"),
    }
}

#[test]
fn missing_program_is_a_build_error() {
    let dir = tempdir().unwrap();
    let runner = CommandBuildRunner::new("definitely-not-a-real-build-tool-4821", vec![]);
    let err = runner.build(dir.path()).unwrap_err();
    assert!(matches!(err, DeployError::Build(_)), "got {err:?}");
}

#[test]
fn command_line_is_split_into_program_and_args() {
    let cmd = vec!["npm".to_string(), "run".to_string(), "build".to_string()];
    let runner = CommandBuildRunner::from_command_line(&cmd).unwrap();
    assert_eq!(runner.program(), "npm");
    assert_eq!(runner.args(), ["run".to_string(), "build".to_string()]);

    let err = CommandBuildRunner::from_command_line(&[]).unwrap_err();
    assert!(matches!(err, DeployError::Config(_)));
}

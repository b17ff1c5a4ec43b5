use assert_cmd::Command;
use predicates::prelude::*;
use std::fs::write;
use tempfile::TempDir;

/// A project directory with the given deployment.json contents.
fn project_with_config(config: &str) -> TempDir {
    let dir = tempfile::tempdir().expect("Creating temp project dir failed");
    write(dir.path().join("deployment.json"), config).expect("Writing deployment.json failed");
    dir
}

fn deploy_cmd(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("bucket-deploy").expect("Binary exists");
    cmd.arg("deploy")
        .arg("--working-dir")
        .arg(dir.path())
        .env("AWS_ACCESS_KEY_ID", "test-access-key")
        .env("AWS_SECRET_ACCESS_KEY", "test-secret-key")
        .env("AWS_EC2_METADATA_DISABLED", "true");
    cmd
}

#[test]
fn help_lists_deploy_subcommand() {
    Command::cargo_bin("bucket-deploy")
        .expect("Binary exists")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("deploy"));
}

#[test]
fn missing_deployment_json_fails() {
    let dir = tempfile::tempdir().unwrap();
    deploy_cmd(&dir)
        .assert()
        .failure()
        .stderr(predicate::str::contains("deployment.json"));
}

#[test]
fn config_without_bucket_name_fails() {
    let dir = project_with_config(r#"{ "region": "us-east-1" }"#);
    deploy_cmd(&dir)
        .assert()
        .failure()
        .stderr(predicate::str::contains("bucket_name"));
}

#[cfg(unix)]
#[test]
fn failing_build_aborts_with_non_zero_exit() {
    let dir = project_with_config(
        r#"{
            "bucket_name": "never-touched",
            "region": "us-east-1",
            "build_command": ["sh", "-c", "exit 7"]
        }"#,
    );
    deploy_cmd(&dir)
        .assert()
        .failure()
        .stdout(predicate::str::contains("Bucket: never-touched"))
        .stderr(predicate::str::contains("build failed").and(predicate::str::contains("code 7")));
}

use bucket_deploy_core::artifacts::{collect_artifacts, object_key};
use bucket_deploy_core::DeployError;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

#[test]
fn keys_are_relative_and_forward_slashed() {
    let root = Path::new("/work/build");
    let path = root.join("static").join("js").join("main.js");
    assert_eq!(object_key(root, &path).unwrap(), "static/js/main.js");
    assert_eq!(object_key(root, &root.join("index.html")).unwrap(), "index.html");
}

#[test]
fn key_outside_build_root_is_rejected() {
    let err = object_key(Path::new("/work/build"), Path::new("/elsewhere/a.js")).unwrap_err();
    assert!(matches!(err, DeployError::Filesystem { .. }), "got {err:?}");
}

#[test]
fn collects_nested_files_sorted_by_key() {
    let dir = tempdir().unwrap();
    let build = dir.path().join("build");
    fs::create_dir_all(build.join("static/media")).unwrap();
    fs::create_dir_all(build.join("empty-dir")).unwrap();
    fs::write(build.join("static/media/logo.svg"), "<svg/>").unwrap();
    fs::write(build.join("robots.txt"), "User-agent: *").unwrap();
    fs::write(build.join("index.html"), "<html/>").unwrap();
    fs::write(build.join("favicon.ico"), [0u8; 4]).unwrap();

    let artifacts = collect_artifacts(&build).unwrap();
    let keys: Vec<&str> = artifacts.iter().map(|a| a.key.as_str()).collect();
    assert_eq!(
        keys,
        vec!["favicon.ico", "index.html", "robots.txt", "static/media/logo.svg"]
    );

    let svg = &artifacts[3];
    assert_eq!(svg.path, build.join("static/media/logo.svg"));
    assert_eq!(svg.content_type, "image/svg+xml");
    assert_eq!(artifacts[1].content_type, "text/html");
}

#[test]
fn missing_build_dir_yields_no_artifacts() {
    let dir = tempdir().unwrap();
    let artifacts = collect_artifacts(&dir.path().join("build")).unwrap();
    assert!(artifacts.is_empty());
}

#[cfg(unix)]
#[test]
fn symlinked_directories_are_not_followed() {
    use std::os::unix::fs::symlink;

    let dir = tempdir().unwrap();
    let build = dir.path().join("build");
    let secrets = dir.path().join("secrets");
    fs::create_dir_all(&build).unwrap();
    fs::create_dir_all(&secrets).unwrap();
    fs::write(build.join("index.html"), "<html/>").unwrap();
    fs::write(secrets.join(".env"), "TOKEN=hunter2").unwrap();
    symlink(&build, build.join("loop")).unwrap();
    symlink(&secrets, build.join("linked")).unwrap();

    let artifacts = collect_artifacts(&build).unwrap();
    let keys: Vec<&str> = artifacts.iter().map(|a| a.key.as_str()).collect();
    assert_eq!(keys, vec!["index.html"]);
}

#[cfg(unix)]
#[test]
fn symlinked_files_are_still_collected() {
    use std::os::unix::fs::symlink;

    let dir = tempdir().unwrap();
    let build = dir.path().join("build");
    fs::create_dir_all(&build).unwrap();
    fs::write(dir.path().join("shared.css"), "body{}").unwrap();
    fs::write(build.join("index.html"), "<html/>").unwrap();
    symlink(dir.path().join("shared.css"), build.join("shared.css")).unwrap();

    let artifacts = collect_artifacts(&build).unwrap();
    let keys: Vec<&str> = artifacts.iter().map(|a| a.key.as_str()).collect();
    assert_eq!(keys, vec!["index.html", "shared.css"]);
    assert_eq!(artifacts[1].content_type, "text/css");
}

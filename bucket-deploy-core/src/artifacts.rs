//! Enumerating the build output into uploadable artifacts.

use std::fs;
use std::path::{Component, Path, PathBuf};

use tracing::{debug, error, info};

use crate::content_type::content_type_for;
use crate::error::DeployError;

/// A file under the build output directory, ready to be uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildArtifact {
    /// Location on disk.
    pub path: PathBuf,
    /// Object key: the path relative to the build root, `/`-separated.
    pub key: String,
    pub content_type: String,
}

/// Compute the object key for `path` relative to `root`.
///
/// Components are joined with `/` whatever the platform separator is.
pub fn object_key(root: &Path, path: &Path) -> Result<String, DeployError> {
    let rel = path.strip_prefix(root).map_err(|_| {
        DeployError::filesystem(
            path,
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("not inside build directory {}", root.display()),
            ),
        )
    })?;

    let mut segments = Vec::new();
    for comp in rel.components() {
        match comp {
            Component::Normal(part) => match part.to_str() {
                Some(s) => segments.push(s),
                None => {
                    return Err(DeployError::filesystem(
                        path,
                        std::io::Error::new(
                            std::io::ErrorKind::InvalidData,
                            "file name is not valid UTF-8",
                        ),
                    ))
                }
            },
            Component::CurDir => {}
            _ => {
                return Err(DeployError::filesystem(
                    path,
                    std::io::Error::new(
                        std::io::ErrorKind::InvalidInput,
                        "unexpected path component in build output",
                    ),
                ))
            }
        }
    }
    Ok(segments.join("/"))
}

/// Recursively list every regular file under `build_dir`, sorted by key.
///
/// A missing `build_dir` is not an error: it yields no artifacts.
pub fn collect_artifacts(build_dir: &Path) -> Result<Vec<BuildArtifact>, DeployError> {
    if !build_dir.is_dir() {
        info!(path = %build_dir.display(), "Build output directory not found, nothing to upload");
        return Ok(Vec::new());
    }

    fn visit_dir(
        dir: &Path,
        root: &Path,
        results: &mut Vec<BuildArtifact>,
    ) -> Result<(), DeployError> {
        let entries = fs::read_dir(dir).map_err(|e| DeployError::filesystem(dir, e))?;
        for entry_res in entries {
            let entry = entry_res.map_err(|e| DeployError::filesystem(dir, e))?;
            let path = entry.path();
            // file_type() does not follow symlinks
            let file_type = entry
                .file_type()
                .map_err(|e| DeployError::filesystem(&path, e))?;
            if file_type.is_dir() {
                visit_dir(&path, root, results)?;
            } else if file_type.is_symlink() && path.is_dir() {
                debug!(path = %path.display(), "Skipping symlinked directory");
            } else if path.is_file() {
                let key = object_key(root, &path)?;
                let content_type = content_type_for(&path);
                debug!(key = %key, content_type = %content_type, "Found build artifact");
                results.push(BuildArtifact {
                    path,
                    key,
                    content_type,
                });
            }
        }
        Ok(())
    }

    let mut artifacts = Vec::new();
    if let Err(e) = visit_dir(build_dir, build_dir, &mut artifacts) {
        error!(error = ?e, "Error occurred while enumerating build output");
        return Err(e);
    }
    artifacts.sort_by(|a, b| a.key.cmp(&b.key));

    info!(
        count = artifacts.len(),
        path = %build_dir.display(),
        "Collected build artifacts"
    );
    Ok(artifacts)
}

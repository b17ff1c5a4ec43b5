use std::path::PathBuf;

use crate::contract::StoreError;

/// Every way a deployment run can fail. None of these are recovered from:
/// the pipeline stops at the first one.
#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    /// `deployment.json` is missing, unreadable, not JSON, or lacks a required key.
    #[error("configuration error: {0}")]
    Config(String),

    #[error("filesystem error at {}: {source}", .path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The build process could not be spawned or exited unsuccessfully.
    #[error("build failed: {0}")]
    Build(String),

    #[error("remote storage error during {operation}: {source}")]
    Remote {
        operation: &'static str,
        #[source]
        source: StoreError,
    },
}

impl DeployError {
    pub fn filesystem(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DeployError::Filesystem {
            path: path.into(),
            source,
        }
    }

    pub fn remote(operation: &'static str, source: StoreError) -> Self {
        DeployError::Remote { operation, source }
    }
}

//! # contract: seams between the deploy pipeline and the outside world
//!
//! Two traits live here:
//! - [`BucketStore`]: the remote object store (list, delete, put).
//! - [`BuildRunner`]: whatever produces the `build/` directory.
//!
//! Both are annotated for `mockall`, so tests (in this crate and in dependents
//! with the `test-export-mocks` feature) get `MockBucketStore` and
//! `MockBuildRunner` for free. The real S3 client lives in the CLI crate.

use std::path::Path;

use async_trait::async_trait;
use mockall::automock;

use crate::error::DeployError;

/// Error type returned by storage backends.
pub type StoreError = Box<dyn std::error::Error + Send + Sync>;

/// Access control applied to an uploaded object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectAcl {
    /// Anonymous clients may fetch the object.
    PublicRead,
}

impl ObjectAcl {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectAcl::PublicRead => "public-read",
        }
    }
}

/// A single object upload request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PutObject {
    pub bucket: String,
    /// Key relative to the bucket root, always `/`-separated.
    pub key: String,
    pub body: Vec<u8>,
    pub content_type: String,
    pub acl: ObjectAcl,
}

/// Trait for the bucket the site is deployed to.
///
/// Implementations talk to a real storage API; the pipeline never assumes
/// anything about transport, credentials, or retries.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait BucketStore: Send + Sync {
    /// List every object key currently in the bucket.
    async fn list_keys(&self, bucket: &str) -> Result<Vec<String>, StoreError>;

    /// Delete the given keys. Callers keep batches within the backend's limit.
    async fn delete_keys(&self, bucket: &str, keys: &[String]) -> Result<(), StoreError>;

    /// Upload one object, replacing any existing object under the same key.
    async fn put_object(&self, req: PutObject) -> Result<(), StoreError>;
}

/// Trait for producing the build output inside a working directory.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
pub trait BuildRunner: Send + Sync {
    /// Run the build to completion. Must fail if the build did not succeed.
    fn build(&self, working_dir: &Path) -> Result<(), DeployError>;
}

//! High-level pipeline: build → enumerate → empty bucket → upload.
//!
//! [`deploy`] runs the whole sequence for one working directory and one
//! bucket. Each step finishes before the next starts and the first failure
//! stops the run.
//!
//! # Ordering
//! 1. remove the stale local `build/` directory
//! 2. run the build via [`BuildRunner`]
//! 3. enumerate the fresh build output
//! 4. delete every object in the bucket
//! 5. upload each artifact with public-read ACL and its content type
//!
//! Nothing remote is touched until steps 1–3 have succeeded. If an upload
//! fails in step 5 the bucket is left partially populated; nothing is rolled
//! back.
//!
//! # Major Types
//! - [`DeployOptions`]: what to deploy and where
//! - [`DeployReport`]: what was deleted and uploaded

use std::path::PathBuf;

use tracing::{debug, error, info, warn};

use crate::artifacts::{collect_artifacts, BuildArtifact};
use crate::build::{build_dir, clean_build_dir};
use crate::contract::{BucketStore, BuildRunner, ObjectAcl, PutObject};
use crate::error::DeployError;

/// Most keys a single batch delete may carry (S3 `DeleteObjects` limit).
pub const DELETE_BATCH_SIZE: usize = 1000;

#[derive(Debug, Clone)]
pub struct DeployOptions {
    pub working_dir: PathBuf,
    pub bucket: String,
    /// Build and plan, but leave the bucket untouched.
    pub dry_run: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployReport {
    pub bucket: String,
    /// Number of keys removed from the bucket (or that would be, in a dry run).
    pub deleted: usize,
    pub uploaded: Vec<UploadedObject>,
    pub dry_run: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedObject {
    pub key: String,
    pub content_type: String,
    pub size: u64,
}

/// Entrypoint: deploy the working directory's build output to the bucket.
pub async fn deploy<B, S>(
    options: &DeployOptions,
    builder: &B,
    store: &S,
) -> Result<DeployReport, DeployError>
where
    B: BuildRunner + ?Sized,
    S: BucketStore + ?Sized,
{
    deploy_with_progress(options, builder, store, |_| {}).await
}

/// Same as [`deploy`], calling `on_upload` after each object reaches the
/// bucket. Objects reported before an error are the ones the bucket holds.
pub async fn deploy_with_progress<B, S, F>(
    options: &DeployOptions,
    builder: &B,
    store: &S,
    on_upload: F,
) -> Result<DeployReport, DeployError>
where
    B: BuildRunner + ?Sized,
    S: BucketStore + ?Sized,
    F: FnMut(&UploadedObject),
{
    info!(
        bucket = %options.bucket,
        working_dir = %options.working_dir.display(),
        dry_run = options.dry_run,
        "[DEPLOY] Starting deployment pipeline"
    );

    clean_build_dir(&options.working_dir)?;

    if let Err(e) = builder.build(&options.working_dir) {
        error!(error = %e, "[DEPLOY][ERROR] Build failed, bucket left untouched");
        return Err(e);
    }
    info!("[DEPLOY] Build succeeded");

    let artifacts = collect_artifacts(&build_dir(&options.working_dir))?;

    if options.dry_run {
        let existing = list_bucket_keys(store, &options.bucket).await?;
        info!(
            would_delete = existing.len(),
            would_upload = artifacts.len(),
            "[DEPLOY][DRY-RUN] Skipping bucket changes"
        );
        let uploaded = artifacts
            .iter()
            .map(planned_object)
            .collect::<Result<Vec<_>, _>>()?;
        return Ok(DeployReport {
            bucket: options.bucket.clone(),
            deleted: existing.len(),
            uploaded,
            dry_run: true,
        });
    }

    let deleted = empty_bucket(store, &options.bucket).await?;
    info!(deleted, "[DEPLOY] Emptied bucket");

    let uploaded = upload_artifacts(store, &options.bucket, &artifacts, on_upload).await?;

    info!(
        bucket = %options.bucket,
        deleted,
        uploaded = uploaded.len(),
        "[DEPLOY] Deployment complete"
    );
    Ok(DeployReport {
        bucket: options.bucket.clone(),
        deleted,
        uploaded,
        dry_run: false,
    })
}

/// Removes every object in the bucket. Returns how many keys were deleted.
pub async fn empty_bucket<S>(store: &S, bucket: &str) -> Result<usize, DeployError>
where
    S: BucketStore + ?Sized,
{
    let keys = list_bucket_keys(store, bucket).await?;
    if keys.is_empty() {
        debug!(bucket, "Bucket already empty");
        return Ok(0);
    }

    for batch in keys.chunks(DELETE_BATCH_SIZE) {
        if let Err(e) = store.delete_keys(bucket, batch).await {
            error!(bucket, error = ?e, batch = batch.len(), "[DEPLOY][ERROR] Failed to delete objects");
            return Err(DeployError::remote("delete objects", e));
        }
        debug!(bucket, batch = batch.len(), "Deleted batch of objects");
    }
    Ok(keys.len())
}

/// Upload each artifact in order, stopping at the first failure.
pub async fn upload_artifacts<S, F>(
    store: &S,
    bucket: &str,
    artifacts: &[BuildArtifact],
    mut on_upload: F,
) -> Result<Vec<UploadedObject>, DeployError>
where
    S: BucketStore + ?Sized,
    F: FnMut(&UploadedObject),
{
    let mut uploaded = Vec::with_capacity(artifacts.len());

    for (index, artifact) in artifacts.iter().enumerate() {
        let body = tokio::fs::read(&artifact.path)
            .await
            .map_err(|e| DeployError::filesystem(&artifact.path, e))?;
        let size = body.len() as u64;

        let req = PutObject {
            bucket: bucket.to_string(),
            key: artifact.key.clone(),
            body,
            content_type: artifact.content_type.clone(),
            acl: ObjectAcl::PublicRead,
        };

        if let Err(e) = store.put_object(req).await {
            error!(key = %artifact.key, error = ?e, "[DEPLOY][ERROR] Upload failed");
            if index > 0 {
                warn!(
                    uploaded = index,
                    remaining = artifacts.len() - index,
                    "[DEPLOY] Bucket is only partially populated"
                );
            }
            return Err(DeployError::remote("upload object", e));
        }
        info!(
            key = %artifact.key,
            content_type = %artifact.content_type,
            acl = ObjectAcl::PublicRead.as_str(),
            size,
            "[DEPLOY][UPLOAD] Uploaded object"
        );

        let object = UploadedObject {
            key: artifact.key.clone(),
            content_type: artifact.content_type.clone(),
            size,
        };
        on_upload(&object);
        uploaded.push(object);
    }
    Ok(uploaded)
}

async fn list_bucket_keys<S>(store: &S, bucket: &str) -> Result<Vec<String>, DeployError>
where
    S: BucketStore + ?Sized,
{
    match store.list_keys(bucket).await {
        Ok(keys) => {
            debug!(bucket, count = keys.len(), "Listed bucket contents");
            Ok(keys)
        }
        Err(e) => {
            error!(bucket, error = ?e, "[DEPLOY][ERROR] Failed to list bucket contents");
            Err(DeployError::remote("list objects", e))
        }
    }
}

fn planned_object(artifact: &BuildArtifact) -> Result<UploadedObject, DeployError> {
    let size = std::fs::metadata(&artifact.path)
        .map_err(|e| DeployError::filesystem(&artifact.path, e))?
        .len();
    Ok(UploadedObject {
        key: artifact.key.clone(),
        content_type: artifact.content_type.clone(),
        size,
    })
}

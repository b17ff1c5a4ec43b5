#![doc = "S3 implementation of the core `BucketStore` trait."]
//
//! # S3 store
//!
//! [`S3Store`] wires [`bucket_deploy_core::contract::BucketStore`] to the AWS
//! SDK. It is built from an explicit [`StoreSettings`] value: region,
//! endpoint and credentials are passed in rather than discovered from
//! process-wide state. Only when no credentials are given does the SDK's
//! default provider chain (profiles, instance metadata) take over.

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::config::{Credentials, Region};
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{Delete, ObjectCannedAcl, ObjectIdentifier};
use aws_sdk_s3::Client;

use bucket_deploy_core::config::DeploymentConfig;
use bucket_deploy_core::contract::{BucketStore, ObjectAcl, PutObject, StoreError};

/// Static credentials handed to the store.
#[derive(Clone)]
pub struct StaticCredentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: Option<String>,
}

impl std::fmt::Debug for StaticCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticCredentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .field("session_token", &self.session_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl StaticCredentials {
    /// Read `AWS_ACCESS_KEY_ID`, `AWS_SECRET_ACCESS_KEY` and the optional
    /// `AWS_SESSION_TOKEN` from the given lookup. `None` unless both keys are set.
    pub fn from_lookup<F>(lookup: F) -> Option<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let access_key_id = lookup("AWS_ACCESS_KEY_ID").filter(|v| !v.is_empty())?;
        let secret_access_key = lookup("AWS_SECRET_ACCESS_KEY").filter(|v| !v.is_empty())?;
        Some(Self {
            access_key_id,
            secret_access_key,
            session_token: lookup("AWS_SESSION_TOKEN").filter(|v| !v.is_empty()),
        })
    }
}

/// Everything needed to reach the bucket.
#[derive(Debug, Clone, Default)]
pub struct StoreSettings {
    pub region: Option<String>,
    pub endpoint_url: Option<String>,
    /// Path-style addressing, needed by most S3-compatible services.
    pub force_path_style: bool,
    pub credentials: Option<StaticCredentials>,
}

impl StoreSettings {
    pub fn from_config(config: &DeploymentConfig, credentials: Option<StaticCredentials>) -> Self {
        Self {
            region: config.region.clone(),
            endpoint_url: config.endpoint_url.clone(),
            force_path_style: config.endpoint_url.is_some(),
            credentials,
        }
    }
}

pub struct S3Store {
    client: Client,
}

impl S3Store {
    pub async fn new(settings: &StoreSettings) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = &settings.region {
            loader = loader.region(Region::new(region.clone()));
        }
        if let Some(endpoint) = &settings.endpoint_url {
            loader = loader.endpoint_url(endpoint.clone());
        }
        if let Some(creds) = &settings.credentials {
            loader = loader.credentials_provider(Credentials::new(
                creds.access_key_id.clone(),
                creds.secret_access_key.clone(),
                creds.session_token.clone(),
                None,
                "bucket-deploy",
            ));
        }
        let sdk_config = loader.load().await;

        let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(settings.force_path_style)
            .build();

        tracing::info!(
            region = settings.region.as_deref().unwrap_or("<default>"),
            endpoint = settings.endpoint_url.as_deref().unwrap_or("<default>"),
            explicit_credentials = settings.credentials.is_some(),
            "Initialized S3 client"
        );
        Self {
            client: Client::from_conf(s3_config),
        }
    }
}

fn canned_acl(acl: ObjectAcl) -> ObjectCannedAcl {
    match acl {
        ObjectAcl::PublicRead => ObjectCannedAcl::PublicRead,
    }
}

#[async_trait]
impl BucketStore for S3Store {
    async fn list_keys(&self, bucket: &str) -> Result<Vec<String>, StoreError> {
        tracing::info!(bucket, "Listing objects in bucket");
        let mut keys = Vec::new();
        let mut pages = self
            .client
            .list_objects_v2()
            .bucket(bucket)
            .into_paginator()
            .send();

        while let Some(page) = pages.next().await {
            match page {
                Ok(page) => {
                    keys.extend(page.contents().iter().filter_map(|o| o.key().map(str::to_string)));
                }
                Err(e) => {
                    tracing::error!(bucket, error = %DisplayErrorContext(&e), "Failed to list objects");
                    return Err(format!("listing {bucket}: {}", DisplayErrorContext(&e)).into());
                }
            }
        }

        tracing::info!(bucket, count = keys.len(), "Fetched all keys in bucket");
        Ok(keys)
    }

    async fn delete_keys(&self, bucket: &str, keys: &[String]) -> Result<(), StoreError> {
        tracing::info!(bucket, count = keys.len(), "Deleting objects");
        let objects = keys
            .iter()
            .map(|key| ObjectIdentifier::builder().key(key).build())
            .collect::<Result<Vec<_>, _>>()?;
        let delete = Delete::builder()
            .set_objects(Some(objects))
            .quiet(true)
            .build()?;

        let output = match self
            .client
            .delete_objects()
            .bucket(bucket)
            .delete(delete)
            .send()
            .await
        {
            Ok(output) => output,
            Err(e) => {
                tracing::error!(bucket, error = %DisplayErrorContext(&e), "Failed to delete objects");
                return Err(format!("deleting from {bucket}: {}", DisplayErrorContext(&e)).into());
            }
        };

        // Quiet mode only reports the keys that could not be deleted.
        let failures = output.errors();
        if let Some(first) = failures.first() {
            tracing::error!(
                bucket,
                failed = failures.len(),
                key = first.key().unwrap_or_default(),
                code = first.code().unwrap_or_default(),
                "Some objects could not be deleted"
            );
            return Err(format!(
                "{} object(s) in {bucket} could not be deleted, first: {} ({})",
                failures.len(),
                first.key().unwrap_or_default(),
                first.message().unwrap_or_default()
            )
            .into());
        }
        Ok(())
    }

    async fn put_object(&self, req: PutObject) -> Result<(), StoreError> {
        tracing::debug!(
            bucket = %req.bucket,
            key = %req.key,
            content_type = %req.content_type,
            size = req.body.len(),
            "Uploading object"
        );
        let result = self
            .client
            .put_object()
            .bucket(&req.bucket)
            .key(&req.key)
            .acl(canned_acl(req.acl))
            .content_type(&req.content_type)
            .body(ByteStream::from(req.body))
            .send()
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(e) => {
                tracing::error!(key = %req.key, error = %DisplayErrorContext(&e), "Failed to upload object");
                Err(format!("uploading {}: {}", req.key, DisplayErrorContext(&e)).into())
            }
        }
    }
}

#![doc = "bucket-deploy-core: core pipeline for bucket-deploy."]

//! Builds a single-page application and publishes its `build/` output to a
//! static-website bucket. Everything here is backend-agnostic: the storage
//! API and the build step are reached through the traits in [`contract`].
//!
//! # Usage
//! Construct a [`contract::BucketStore`] and a [`contract::BuildRunner`],
//! then call [`synchronise::deploy`].

pub mod artifacts;
pub mod build;
pub mod config;
pub mod content_type;
pub mod contract;
pub mod error;
pub mod synchronise;

pub use error::DeployError;

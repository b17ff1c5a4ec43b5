///
/// This module implements the CLI interface for bucket-deploy: command
/// parsing, resolving the working directory and config file, and wiring the
/// real S3 store and build command into the core pipeline.
///
/// All pipeline logic lives in [`bucket-deploy-core`]; this module is glue.
///
/// ## How To Use
/// - From the shell: `bucket-deploy deploy` inside the project directory.
/// - Programmatically: call [`run`] with a constructed [`Cli`], or
///   [`deploy_with_store`] to supply your own storage backend.
///
/// [`bucket-deploy-core`]: ../../bucket-deploy-core/
use crate::load_config::{config_path, load_config};
use crate::store::{S3Store, StaticCredentials, StoreSettings};
use anyhow::{Context, Result};
use bucket_deploy_core::build::CommandBuildRunner;
use bucket_deploy_core::config::DeploymentConfig;
use bucket_deploy_core::contract::BucketStore;
use bucket_deploy_core::synchronise::{
    deploy_with_progress, DeployOptions, DeployReport, UploadedObject,
};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

/// CLI for bucket-deploy: build a single-page app and publish it to a bucket.
#[derive(Parser)]
#[clap(
    name = "bucket-deploy",
    version,
    about = "Build a single-page application and publish it to a static-website bucket"
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Rebuild the project and replace the bucket's contents with the build output
    Deploy {
        /// Project directory (defaults to the current directory)
        #[clap(long)]
        working_dir: Option<PathBuf>,
        /// Path to the deployment config (defaults to <working-dir>/deployment.json)
        #[clap(long)]
        config: Option<PathBuf>,
        /// Build and list what would change, without touching the bucket
        #[clap(long)]
        dry_run: bool,
    },
}

/// Extracted async CLI logic entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<()> {
    tracing::info!("trace_initialised");

    match cli.command {
        Commands::Deploy {
            working_dir,
            config,
            dry_run,
        } => {
            let working_dir = match working_dir {
                Some(dir) => dir,
                None => std::env::current_dir().context("cannot determine working directory")?,
            };
            println!("Working directory: {}", working_dir.display());

            let config_file = config.unwrap_or_else(|| config_path(&working_dir));
            let deployment = load_config(&config_file)?;
            println!("Bucket: {}", deployment.bucket_name);
            println!("Config: {:?}", deployment);

            let credentials = StaticCredentials::from_lookup(|key| std::env::var(key).ok());
            let settings = StoreSettings::from_config(&deployment, credentials);
            let store = S3Store::new(&settings).await;

            tracing::info!(command = "deploy", bucket = %deployment.bucket_name, "Starting deployment");
            match deploy_with_store(&working_dir, &deployment, dry_run, &store).await {
                Ok(report) => {
                    print_report(&report);
                    tracing::info!(command = "deploy", ?report, "Deployment complete");
                    Ok(())
                }
                Err(e) => {
                    tracing::error!(command = "deploy", error = %e, "Deployment failed");
                    Err(e)
                }
            }
        }
    }
}

/// Run the pipeline for an already loaded config against any store.
pub async fn deploy_with_store<S>(
    working_dir: &Path,
    deployment: &DeploymentConfig,
    dry_run: bool,
    store: &S,
) -> Result<DeployReport>
where
    S: BucketStore + ?Sized,
{
    let builder = CommandBuildRunner::from_command_line(&deployment.build_command())?;
    let options = DeployOptions {
        working_dir: working_dir.to_path_buf(),
        bucket: deployment.bucket_name.clone(),
        dry_run,
    };
    let report = deploy_with_progress(&options, &builder, store, print_uploaded)
        .await
        .with_context(|| format!("deploying to bucket {}", deployment.bucket_name))?;
    Ok(report)
}

fn print_uploaded(object: &UploadedObject) {
    println!(
        "Uploaded {} ({}, {} bytes)",
        object.key, object.content_type, object.size
    );
}

fn print_report(report: &DeployReport) {
    if report.dry_run {
        println!("Dry run for bucket {}: nothing was changed.", report.bucket);
        println!("Would delete {} existing object(s).", report.deleted);
        for object in &report.uploaded {
            println!(
                "  {} ({}, {} bytes)",
                object.key, object.content_type, object.size
            );
        }
    } else {
        println!("Deployed to bucket {}.", report.bucket);
        println!("Deleted {} existing object(s).", report.deleted);
    }
    let verb = if report.dry_run { "would be uploaded" } else { "uploaded" };
    println!("{} object(s) {}.", report.uploaded.len(), verb);
}

//! This module implements the CLI interface for raw-uploader: command parsing, the async
//! `run` entrypoint and user-visible output.
//!
//! All pipeline logic (discovery, bucket handling, uploading, verification) lives in the
//! [`raw-uploader-core`] crate. This module only loads configuration, builds the S3 store
//! and prints what happened.
//!
//! ## How To Use
//! - For command-line users: use the installed `raw-uploader` binary with `--help`.
//! - For programmatic/integration use: call [`run`] with a constructed [`Cli`], or
//!   [`run_with_store`] to drive the same flow against any [`ObjectStore`].
//!
//! [`raw-uploader-core`]: ../../raw-uploader-core/

use crate::load_config::{load_config, AppConfig, Overrides};
use crate::report::{ProgressLine, UploadSummary, VerifySummary};
use crate::s3_store::S3Store;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use raw_uploader_core::contract::ObjectStore;
use raw_uploader_core::upload::{upload_data_with_progress, UploadOutcome};
use raw_uploader_core::verify::{verify_upload, VerifyReport};
use std::path::PathBuf;

/// CLI for raw-uploader: push raw CSV data to S3 and verify it landed.
#[derive(Parser)]
#[clap(
    name = "raw-uploader",
    version,
    about = "Upload raw CSV files to an S3 bucket and verify the upload"
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Upload every matching file from the data directory, then verify the bucket contents.
    ///
    /// Each file is reported on stdout as soon as its upload finishes; the log on stderr
    /// carries the same steps in more detail.
    Upload {
        /// Optional YAML config file
        #[clap(long)]
        config: Option<PathBuf>,
        /// Directory holding the files; replaces the default ../../data/raw, data/raw lookup
        #[clap(long)]
        data_dir: Option<PathBuf>,
        /// File extension to upload (default: csv)
        #[clap(long)]
        extension: Option<String>,
        /// Key prefix for uploaded objects (default: raw-data/)
        #[clap(long)]
        key_prefix: Option<String>,
        /// Prefix listed by the verification step (default: raw_data/)
        #[clap(long)]
        verify_prefix: Option<String>,
        /// Skip the verification step
        #[clap(long)]
        no_verify: bool,
        /// Print the reports as JSON instead of text
        #[clap(long)]
        json: bool,
    },
    /// List the objects under the verify prefix and report their total size
    Verify {
        /// Optional YAML config file
        #[clap(long)]
        config: Option<PathBuf>,
        /// Prefix to list (default: raw_data/)
        #[clap(long)]
        prefix: Option<String>,
        /// Print the report as JSON instead of text
        #[clap(long)]
        json: bool,
    },
}

fn warn_on_prefix_mismatch(config: &AppConfig) {
    if config.upload.key_prefix != config.verify.prefix {
        tracing::warn!(
            key_prefix = %config.upload.key_prefix,
            verify_prefix = %config.verify.prefix,
            "Upload and verify prefixes differ; verification will not see the uploaded files"
        );
    }
}

fn print_json(value: &serde_json::Value) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize report")?;
    println!("{json}");
    Ok(())
}

/// Loads the configuration for `command`, applying its flags as overrides.
fn load_command_config(command: &Commands) -> Result<AppConfig> {
    match command {
        Commands::Upload {
            config,
            data_dir,
            extension,
            key_prefix,
            verify_prefix,
            ..
        } => {
            let overrides = Overrides {
                data_dir: data_dir.clone(),
                extension: extension.clone(),
                key_prefix: key_prefix.clone(),
                verify_prefix: verify_prefix.clone(),
            };
            load_config(config.as_deref(), &overrides)
        }
        Commands::Verify { config, prefix, .. } => {
            let overrides = Overrides {
                verify_prefix: prefix.clone(),
                ..Overrides::default()
            };
            load_config(config.as_deref(), &overrides)
        }
    }
}

async fn verify_step<S>(config: &AppConfig, store: &S, json: bool) -> Result<VerifyReport>
where
    S: ObjectStore + ?Sized,
{
    if !json {
        println!("\nVerify uploads...");
    }
    match verify_upload(&config.verify, store).await {
        Ok(report) => {
            if !json {
                print!("{}", VerifySummary(&report));
            }
            Ok(report)
        }
        Err(e) => {
            tracing::error!(command = "verify", error = %e, "Verification failed");
            Err(anyhow::Error::new(e).context("Verification failed"))
        }
    }
}

async fn upload_command<S>(config: &AppConfig, store: &S, no_verify: bool, json: bool) -> Result<()>
where
    S: ObjectStore + ?Sized,
{
    config.upload.trace_loaded();
    warn_on_prefix_mismatch(config);

    if !json {
        println!("Starting data upload to S3...");
        println!("Bucket: {}", config.upload.bucket_name);
        println!("Region: {}", config.upload.region);
    }

    let upload = upload_data_with_progress(&config.upload, store, |event| {
        if !json {
            println!("{}", ProgressLine(event));
        }
    })
    .await;
    let report = match upload {
        Ok(report) => report,
        Err(e) => {
            tracing::error!(command = "upload", error = %e, "Upload failed");
            return Err(anyhow::Error::new(e)
                .context("Upload failed; check AWS credentials and bucket permissions"));
        }
    };
    if !json {
        print!("{}", UploadSummary(&report));
    }

    if report.outcome() != UploadOutcome::Complete {
        if json {
            print_json(&serde_json::json!({ "upload": report }))?;
        }
        anyhow::bail!(
            "{} of {} files failed to upload: {}",
            report.total() - report.succeeded(),
            report.total(),
            report.failed_files().join(", ")
        );
    }

    if no_verify {
        tracing::info!(command = "upload", "Verification skipped");
        if json {
            print_json(&serde_json::json!({ "upload": report }))?;
        }
        return Ok(());
    }

    let verified = verify_step(config, store, json).await;
    if json {
        let verify = verified.as_ref().ok();
        print_json(&serde_json::json!({ "upload": report, "verify": verify }))?;
    }
    verified?;
    tracing::info!(command = "upload", "Upload and verification complete");
    Ok(())
}

async fn execute<S>(command: &Commands, config: &AppConfig, store: &S) -> Result<()>
where
    S: ObjectStore + ?Sized,
{
    match command {
        Commands::Upload {
            no_verify, json, ..
        } => upload_command(config, store, *no_verify, *json).await,
        Commands::Verify { json, .. } => {
            let report = verify_step(config, store, *json).await?;
            if *json {
                print_json(&serde_json::json!({ "verify": report }))?;
            }
            Ok(())
        }
    }
}

/// Extracted async CLI logic entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<()> {
    // Emit a top-level 'trace_initialised' event at the very start
    tracing::info!("trace_initialised");

    let config = load_command_config(&cli.command)?;
    let store = S3Store::for_region(&config.upload.region).await;
    execute(&cli.command, &config, &store).await
}

/// Runs `cli` against `store` instead of a client built from the AWS environment.
pub async fn run_with_store<S>(cli: Cli, store: &S) -> Result<()>
where
    S: ObjectStore + ?Sized,
{
    tracing::info!("trace_initialised");

    let config = load_command_config(&cli.command)?;
    execute(&cli.command, &config, store).await
}

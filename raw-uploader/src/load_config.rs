//! `load_config` module: builds the upload and verify configuration from the environment,
//! an optional static YAML file and command-line overrides.
//!
//! # Responsibilities
//! - Read the bucket name (`AWS_S3_BUCKET_NAME`, required) and region
//!   (`AWS_DEFAULT_REGION`, defaults to `us-east-2`) from the environment
//! - Parse the optional YAML file into [`FileConfig`] (no secrets live there)
//! - Layer the values: built-in defaults, then the YAML file, then CLI flags
//!
//! Loading `.env` is left to `main`, so tests can drive the environment directly.
//!
//! # Errors
//! All errors use `anyhow::Error` and are surfaced at the CLI boundary. A missing bucket
//! name fails here, before any storage client is built.

use anyhow::{Context, Result};
use raw_uploader_core::config::{UploadConfig, VerifyConfig, DEFAULT_REGION};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info};

pub const BUCKET_ENV: &str = "AWS_S3_BUCKET_NAME";
pub const REGION_ENV: &str = "AWS_DEFAULT_REGION";

/// Optional settings read from the YAML file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub data_dir: Option<PathBuf>,
    pub extension: Option<String>,
    pub key_prefix: Option<String>,
    pub verify_prefix: Option<String>,
}

/// Values given on the command line; `None` means "not given".
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub data_dir: Option<PathBuf>,
    pub extension: Option<String>,
    pub key_prefix: Option<String>,
    pub verify_prefix: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub upload: UploadConfig,
    pub verify: VerifyConfig,
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Reads a YAML config file into [`FileConfig`].
pub fn read_file_config<P: AsRef<Path>>(path: P) -> Result<FileConfig> {
    let path_ref = path.as_ref();
    info!(config_path = ?path_ref, "Loading configuration from file");

    let content = fs::read_to_string(path_ref).map_err(|e| {
        error!(error = ?e, config_path = ?path_ref, "Failed to read config file");
        anyhow::anyhow!("Failed to read config file {:?}: {}", path_ref, e)
    })?;

    match serde_yaml::from_str::<Option<FileConfig>>(&content) {
        Ok(conf) => {
            info!(config_path = ?path_ref, "Parsed config YAML successfully");
            Ok(conf.unwrap_or_default())
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to parse config YAML");
            Err(anyhow::anyhow!("Failed to parse config YAML: {e}"))
        }
    }
}

/// Builds the full configuration. Fails fast when the bucket name is not set.
pub fn load_config(config_path: Option<&Path>, overrides: &Overrides) -> Result<AppConfig> {
    let bucket_name = match non_empty_env(BUCKET_ENV) {
        Some(name) => name,
        None => {
            error!(var = BUCKET_ENV, "Bucket name not set in environment");
            anyhow::bail!("{BUCKET_ENV} not found in environment or .env file");
        }
    };
    let region = non_empty_env(REGION_ENV).unwrap_or_else(|| {
        info!(default = DEFAULT_REGION, "{REGION_ENV} not set, using default region");
        DEFAULT_REGION.to_string()
    });

    let file = match config_path {
        Some(path) => read_file_config(path)
            .with_context(|| format!("while loading {}", path.display()))?,
        None => FileConfig::default(),
    };

    let mut upload = UploadConfig::new(bucket_name.clone(), region);
    if let Some(dir) = overrides.data_dir.clone().or(file.data_dir) {
        upload.data_dirs = vec![dir];
    }
    if let Some(extension) = overrides.extension.clone().or(file.extension) {
        upload.extension = extension.trim_start_matches('.').to_string();
    }
    if let Some(prefix) = overrides.key_prefix.clone().or(file.key_prefix) {
        upload.key_prefix = prefix;
    }

    let mut verify = VerifyConfig::new(bucket_name);
    if let Some(prefix) = overrides.verify_prefix.clone().or(file.verify_prefix) {
        verify.prefix = prefix;
    }

    info!(
        bucket = %upload.bucket_name,
        region = %upload.region,
        verify_prefix = %verify.prefix,
        "Config loaded and merged successfully"
    );
    Ok(AppConfig { upload, verify })
}

use serde::Serialize;
use std::path::PathBuf;
use tracing::{debug, info};

/// Region whose buckets are created without a location constraint.
pub const REFERENCE_REGION: &str = "us-east-2";

/// Region used when none is configured.
pub const DEFAULT_REGION: &str = REFERENCE_REGION;

/// Key prefix every uploaded file is stored under.
pub const DEFAULT_KEY_PREFIX: &str = "raw-data/";

/// Prefix the verifier lists by default.
///
/// NOTE: this is spelled with an underscore while uploads use a hyphen, so a
/// default verify run does not see the files a default upload run wrote. Both
/// are configurable; the mismatch is kept on purpose and warned about at
/// runtime.
pub const DEFAULT_VERIFY_PREFIX: &str = "raw_data/";

pub const DEFAULT_EXTENSION: &str = "csv";

/// Candidate data directories, tried in order when none is given explicitly.
pub fn default_data_dirs() -> Vec<PathBuf> {
    vec![PathBuf::from("../../data/raw"), PathBuf::from("data/raw")]
}

#[derive(Debug, Clone, Serialize)]
pub struct UploadConfig {
    pub bucket_name: String,
    pub region: String,
    pub data_dirs: Vec<PathBuf>,
    pub extension: String,
    pub key_prefix: String,
}

impl UploadConfig {
    /// Config with every optional setting at its default.
    pub fn new(bucket_name: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            bucket_name: bucket_name.into(),
            region: region.into(),
            data_dirs: default_data_dirs(),
            extension: DEFAULT_EXTENSION.to_string(),
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
        }
    }

    pub fn trace_loaded(&self) {
        info!(
            bucket = %self.bucket_name,
            region = %self.region,
            key_prefix = %self.key_prefix,
            candidates = self.data_dirs.len(),
            "Loaded UploadConfig"
        );
        debug!(?self, "UploadConfig loaded (full debug)");
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct VerifyConfig {
    pub bucket_name: String,
    pub prefix: String,
}

impl VerifyConfig {
    pub fn new(bucket_name: impl Into<String>) -> Self {
        Self {
            bucket_name: bucket_name.into(),
            prefix: DEFAULT_VERIFY_PREFIX.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_config_dumps_as_json_with_defaults() {
        let config = UploadConfig::new("lake", "eu-west-1");

        let value = serde_json::to_value(&config).expect("config serializes");

        assert_eq!(value["bucket_name"], "lake");
        assert_eq!(value["region"], "eu-west-1");
        assert_eq!(value["key_prefix"], DEFAULT_KEY_PREFIX);
        assert_eq!(value["extension"], DEFAULT_EXTENSION);
        assert_eq!(value["data_dirs"].as_array().map(Vec::len), Some(2));
    }

    #[test]
    fn verify_config_defaults_to_underscore_prefix() {
        let config = VerifyConfig::new("lake");

        let value = serde_json::to_value(&config).expect("config serializes");

        assert_eq!(value["prefix"], "raw_data/");
    }
}

//! Post-upload verification: list what is stored under a prefix and add up the sizes.

use serde::Serialize;
use tracing::{error, info};

use crate::config::VerifyConfig;
use crate::contract::{ObjectStore, RemoteObject, StoreError};

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

#[derive(Debug, thiserror::Error)]
pub enum VerifyError {
    #[error("no files found in bucket '{bucket}' under prefix '{prefix}'")]
    NoObjects { bucket: String, prefix: String },
    #[error("could not list bucket contents: {0}")]
    List(#[source] StoreError),
}

#[derive(Debug, Clone, Serialize)]
pub struct VerifyReport {
    pub bucket: String,
    pub prefix: String,
    pub objects: Vec<RemoteObject>,
    pub total_bytes: i64,
}

impl VerifyReport {
    pub fn total_mb(&self) -> f64 {
        bytes_to_mb(self.total_bytes)
    }
}

pub fn bytes_to_mb(bytes: i64) -> f64 {
    bytes as f64 / BYTES_PER_MB
}

/// Lists `config.prefix` in `config.bucket_name` and sums the reported sizes.
///
/// An empty listing is an error: either nothing was uploaded or the prefix
/// does not match the keys that were written.
pub async fn verify_upload<S>(config: &VerifyConfig, store: &S) -> Result<VerifyReport, VerifyError>
where
    S: ObjectStore + ?Sized,
{
    info!(bucket = %config.bucket_name, prefix = %config.prefix, "[VERIFY] Listing uploaded objects");

    let objects = store
        .list_objects(&config.bucket_name, &config.prefix)
        .await
        .map_err(|e| {
            error!(error = %e, "[VERIFY] Listing failed");
            VerifyError::List(e)
        })?;

    if objects.is_empty() {
        error!(bucket = %config.bucket_name, prefix = %config.prefix, "[VERIFY] No files found");
        return Err(VerifyError::NoObjects {
            bucket: config.bucket_name.clone(),
            prefix: config.prefix.clone(),
        });
    }

    let total_bytes = objects.iter().map(|o| o.size).sum();
    let report = VerifyReport {
        bucket: config.bucket_name.clone(),
        prefix: config.prefix.clone(),
        objects,
        total_bytes,
    };
    info!(
        count = report.objects.len(),
        total_mb = report.total_mb(),
        "[VERIFY] Upload verification complete"
    );
    Ok(report)
}

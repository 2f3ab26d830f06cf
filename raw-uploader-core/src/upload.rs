//! Upload pipeline: ensure bucket → discover local files → upload each file.
//!
//! The pipeline runs strictly in sequence against an [`ObjectStore`]:
//!   - Probes the bucket and creates it when (and only when) the store reports it missing
//!   - Resolves the data directory and lists the matching files
//!   - Uploads every file under `key_prefix + file name`, one at a time
//!   - Aggregates a per-file report of what succeeded and what failed
//!
//! # Error Handling
//! Anything that goes wrong before the first upload (bucket probe, bucket creation,
//! discovery) aborts with an [`UploadError`]. A failed file upload does not abort
//! the run; it is recorded in [`UploadReport::failed`] and the next file is attempted.
//!
//! # Navigation
//! - Main entrypoint: [`upload_data`], or [`upload_data_with_progress`] to observe each
//!   step as it happens
//! - Building blocks: [`ensure_bucket`], [`upload_files`], [`object_key`]

use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::config::{UploadConfig, REFERENCE_REGION};
use crate::contract::{BucketLocation, BucketState, ObjectStore, StoreError};
use crate::discover::{discover_files, DiscoverError, LocalFile};

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("could not check whether bucket exists: {0}")]
    BucketProbe(#[source] StoreError),
    #[error("could not create bucket: {0}")]
    BucketCreate(#[source] StoreError),
    #[error(transparent)]
    Discover(#[from] DiscoverError),
}

/// What [`ensure_bucket`] had to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BucketAction {
    AlreadyExisted,
    Created,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UploadOutcome {
    /// Every file was uploaded.
    Complete,
    /// Some files were uploaded, some failed.
    Partial,
    /// No file was uploaded.
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadedObject {
    pub file_name: String,
    pub key: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedUpload {
    pub file_name: String,
    pub key: String,
    pub error: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct UploadReport {
    pub bucket: String,
    pub bucket_action: BucketAction,
    pub uploaded: Vec<UploadedObject>,
    pub failed: Vec<FailedUpload>,
}

impl UploadReport {
    pub fn succeeded(&self) -> usize {
        self.uploaded.len()
    }

    pub fn total(&self) -> usize {
        self.uploaded.len() + self.failed.len()
    }

    pub fn outcome(&self) -> UploadOutcome {
        match (self.uploaded.is_empty(), self.failed.is_empty()) {
            (_, true) => UploadOutcome::Complete,
            (true, false) => UploadOutcome::Failed,
            (false, false) => UploadOutcome::Partial,
        }
    }

    pub fn failed_files(&self) -> Vec<&str> {
        self.failed.iter().map(|f| f.file_name.as_str()).collect()
    }
}

/// Step reported to the progress callback of [`upload_data_with_progress`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadProgress<'a> {
    BucketReady {
        bucket: &'a str,
        action: BucketAction,
    },
    FilesFound {
        count: usize,
    },
    /// Sent before the file is handed to the store; `index` starts at 1.
    Uploading {
        file_name: &'a str,
        index: usize,
        total: usize,
    },
    Uploaded {
        bucket: &'a str,
        object: &'a UploadedObject,
    },
    Failed(&'a FailedUpload),
}

/// Destination key for a local file name.
pub fn object_key(key_prefix: &str, file_name: &str) -> String {
    format!("{key_prefix}{file_name}")
}

/// Location to create a bucket with in `region`.
pub fn bucket_location(region: &str) -> BucketLocation {
    if region == REFERENCE_REGION {
        BucketLocation::Default
    } else {
        BucketLocation::Constraint(region.to_string())
    }
}

/// Makes sure `bucket` exists, creating it in `region` if the store reports it missing.
///
/// A probe failure other than "missing" is returned as [`UploadError::BucketProbe`]
/// without attempting a create.
pub async fn ensure_bucket<S>(
    store: &S,
    bucket: &str,
    region: &str,
) -> Result<BucketAction, UploadError>
where
    S: ObjectStore + ?Sized,
{
    match store.head_bucket(bucket).await {
        Ok(BucketState::Exists) => {
            info!(bucket, "Bucket exists");
            Ok(BucketAction::AlreadyExisted)
        }
        Ok(BucketState::Missing) => {
            let location = bucket_location(region);
            info!(bucket, region, ?location, "Creating bucket");
            store.create_bucket(bucket, location).await.map_err(|e| {
                error!(bucket, error = %e, "Bucket creation failed");
                UploadError::BucketCreate(e)
            })?;
            info!(bucket, "Bucket created");
            Ok(BucketAction::Created)
        }
        Err(e) => {
            error!(bucket, error = %e, "Bucket probe failed");
            Err(UploadError::BucketProbe(e))
        }
    }
}

/// Uploads `files` one after another. A failure is recorded and the loop moves on.
///
/// `on_progress` sees every file before and after its upload.
pub async fn upload_files<S, F>(
    store: &S,
    bucket: &str,
    key_prefix: &str,
    files: &[LocalFile],
    mut on_progress: F,
) -> (Vec<UploadedObject>, Vec<FailedUpload>)
where
    S: ObjectStore + ?Sized,
    F: FnMut(UploadProgress<'_>),
{
    let mut uploaded = Vec::new();
    let mut failed = Vec::new();

    for (index, file) in files.iter().enumerate() {
        let key = object_key(key_prefix, &file.name);
        info!(
            file = %file.name,
            key = %key,
            progress = %format!("{}/{}", index + 1, files.len()),
            "Uploading file"
        );
        on_progress(UploadProgress::Uploading {
            file_name: &file.name,
            index: index + 1,
            total: files.len(),
        });
        match store.put_object(bucket, &key, &file.path).await {
            Ok(()) => {
                info!(uri = %format!("s3://{bucket}/{key}"), "Uploaded file");
                let object = UploadedObject {
                    file_name: file.name.clone(),
                    key,
                };
                on_progress(UploadProgress::Uploaded {
                    bucket,
                    object: &object,
                });
                uploaded.push(object);
            }
            Err(e) => {
                error!(file = %file.name, key = %key, error = %e, "Upload failed, continuing with next file");
                let failure = FailedUpload {
                    file_name: file.name.clone(),
                    key,
                    error: e.to_string(),
                };
                on_progress(UploadProgress::Failed(&failure));
                failed.push(failure);
            }
        }
    }

    (uploaded, failed)
}

/// Runs the full upload pipeline described by `config`.
pub async fn upload_data<S>(config: &UploadConfig, store: &S) -> Result<UploadReport, UploadError>
where
    S: ObjectStore + ?Sized,
{
    upload_data_with_progress(config, store, |_| {}).await
}

/// Same as [`upload_data`], calling `on_progress` as each step completes.
pub async fn upload_data_with_progress<S, F>(
    config: &UploadConfig,
    store: &S,
    mut on_progress: F,
) -> Result<UploadReport, UploadError>
where
    S: ObjectStore + ?Sized,
    F: FnMut(UploadProgress<'_>),
{
    info!(bucket = %config.bucket_name, region = %config.region, "[UPLOAD] Starting upload pipeline");

    let bucket_action = ensure_bucket(store, &config.bucket_name, &config.region).await?;
    on_progress(UploadProgress::BucketReady {
        bucket: &config.bucket_name,
        action: bucket_action,
    });
    let files = discover_files(&config.data_dirs, &config.extension)?;
    on_progress(UploadProgress::FilesFound { count: files.len() });
    let (uploaded, failed) = upload_files(
        store,
        &config.bucket_name,
        &config.key_prefix,
        &files,
        &mut on_progress,
    )
    .await;

    let report = UploadReport {
        bucket: config.bucket_name.clone(),
        bucket_action,
        uploaded,
        failed,
    };

    match report.outcome() {
        UploadOutcome::Complete => {
            info!(count = report.succeeded(), "[UPLOAD] All files uploaded")
        }
        UploadOutcome::Partial => warn!(
            uploaded = report.succeeded(),
            total = report.total(),
            failed = ?report.failed_files(),
            "[UPLOAD] Partial success"
        ),
        UploadOutcome::Failed => {
            error!(total = report.total(), "[UPLOAD] No file could be uploaded")
        }
    }
    match serde_json::to_string_pretty(&report) {
        Ok(json) => debug!(json = %json, "[UPLOAD][DEBUG] Upload report as JSON"),
        Err(e) => error!(error = ?e, "[UPLOAD][DEBUG] Failed to serialize upload report"),
    }

    Ok(report)
}

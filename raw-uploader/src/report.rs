//! Human-readable rendering of upload progress and of the upload and verify reports.
//!
//! [`ProgressLine`] is printed while the upload runs; [`UploadSummary`] and
//! [`VerifySummary`] once the corresponding step has finished.

use raw_uploader_core::upload::{BucketAction, UploadOutcome, UploadProgress, UploadReport};
use raw_uploader_core::verify::{bytes_to_mb, VerifyReport};
use std::fmt;

/// One stdout line for an [`UploadProgress`] event.
pub struct ProgressLine<'a>(pub UploadProgress<'a>);

impl fmt::Display for ProgressLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            UploadProgress::BucketReady {
                bucket,
                action: BucketAction::AlreadyExisted,
            } => write!(f, "Bucket '{bucket}' exists"),
            UploadProgress::BucketReady {
                bucket,
                action: BucketAction::Created,
            } => write!(f, "Bucket '{bucket}' created"),
            UploadProgress::FilesFound { count } => write!(f, "Found {count} files to upload ..."),
            UploadProgress::Uploading {
                file_name,
                index,
                total,
            } => write!(f, "Uploading {file_name} ({index}/{total}) ..."),
            UploadProgress::Uploaded { bucket, object } => {
                write!(f, "Successfully uploaded to s3://{bucket}/{}", object.key)
            }
            UploadProgress::Failed(failure) => write!(
                f,
                "ERROR: Failed to upload {}: {}",
                failure.file_name, failure.error
            ),
        }
    }
}

/// Closing line of an upload run.
pub struct UploadSummary<'a>(pub &'a UploadReport);

impl fmt::Display for UploadSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.0;
        match report.outcome() {
            UploadOutcome::Complete => writeln!(
                f,
                "\nAll {} files successfully uploaded to data lake!",
                report.succeeded()
            ),
            UploadOutcome::Partial | UploadOutcome::Failed => writeln!(
                f,
                "\nPartial success, {} / {} uploaded. Failed: {}",
                report.succeeded(),
                report.total(),
                report.failed_files().join(", ")
            ),
        }
    }
}

pub struct VerifySummary<'a>(pub &'a VerifyReport);

impl fmt::Display for VerifySummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.0;
        writeln!(f, "Found {} files in S3:", report.objects.len())?;
        for object in &report.objects {
            writeln!(f, " {} ({:.2} MB)", object.key, bytes_to_mb(object.size))?;
        }
        writeln!(f, "Total data size: {:.2} MB", report.total_mb())?;
        writeln!(f, "Upload verification complete!")
    }
}

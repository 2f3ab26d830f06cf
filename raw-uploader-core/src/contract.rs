//! # contract: the object store seam
//!
//! This module defines a single trait ([`ObjectStore`]) and the plain data types
//! that cross it. The pipeline in [`crate::upload`] and [`crate::verify`] only
//! ever talks to storage through this trait, so the real S3 client and test
//! mocks are interchangeable.
//!
//! ## Mocking & Testing
//! - The trait is annotated for `mockall`; with the `test-export-mocks` feature
//!   (on by default) `MockObjectStore` is exported for integration tests.
//!
//! ## Error contract
//! - `head_bucket` must tell "bucket absent" apart from every other failure:
//!   absent is `Ok(BucketState::Missing)`, anything else is a [`StoreError`].

use async_trait::async_trait;
use std::path::{Path, PathBuf};

#[cfg(any(test, feature = "test-export-mocks"))]
use mockall::automock;

/// Result of probing a bucket for existence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BucketState {
    Exists,
    Missing,
}

/// Where a new bucket should be placed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BucketLocation {
    /// Plain create call, no location constraint.
    Default,
    /// Create call carrying a location constraint for the given region.
    Constraint(String),
}

/// An object as reported by a prefixed listing.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct RemoteObject {
    pub key: String,
    /// Size in bytes, as reported by the store.
    pub size: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The remote call itself failed (auth, network, throttling, service error).
    #[error("{operation} failed for bucket '{bucket}': {message}")]
    Request {
        operation: &'static str,
        bucket: String,
        message: String,
    },
    /// The local file could not be opened as an upload body.
    #[error("failed to read {}: {message}", .path.display())]
    Body { path: PathBuf, message: String },
}

/// Capability-level operations the uploader and verifier need from a bucket store.
///
/// Implementations are expected to be cheap to call repeatedly; no caching
/// happens on this side of the trait.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Probe whether `bucket` exists.
    async fn head_bucket(&self, bucket: &str) -> Result<BucketState, StoreError>;

    /// Create `bucket` at the given location.
    async fn create_bucket(&self, bucket: &str, location: BucketLocation)
        -> Result<(), StoreError>;

    /// Upload the file at `path` to `bucket` under `key`, overwriting any existing object.
    async fn put_object(&self, bucket: &str, key: &str, path: &Path) -> Result<(), StoreError>;

    /// List every object in `bucket` whose key starts with `prefix`.
    async fn list_objects(&self, bucket: &str, prefix: &str)
        -> Result<Vec<RemoteObject>, StoreError>;
}

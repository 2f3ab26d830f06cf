#![doc = "S3 implementation of the core ObjectStore trait, backed by aws-sdk-s3."]
//
//! # S3 store (CLI <-> Core)
//!
//! This module wires the [`ObjectStore`] trait from `raw-uploader-core` to a real
//! `aws_sdk_s3::Client`. Credentials come from the usual AWS provider chain; only the
//! region is set explicitly.
//!
//! - `HeadBucket` answering "not found" maps to [`BucketState::Missing`]; every other
//!   failure is a [`StoreError`].
//! - Listing follows continuation tokens until the listing is complete.

use async_trait::async_trait;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::operation::head_bucket::HeadBucketError;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{BucketLocationConstraint, CreateBucketConfiguration};
use raw_uploader_core::contract::{
    BucketLocation, BucketState, ObjectStore, RemoteObject, StoreError,
};
use std::path::Path;

pub struct S3Store {
    client: aws_sdk_s3::Client,
}

fn request_error<E>(operation: &'static str, bucket: &str, err: E) -> StoreError
where
    E: std::error::Error,
{
    StoreError::Request {
        operation,
        bucket: bucket.to_string(),
        message: DisplayErrorContext(err).to_string(),
    }
}

impl S3Store {
    pub fn new(client: aws_sdk_s3::Client) -> Self {
        Self { client }
    }

    /// Builds a client from the default AWS configuration, pinned to `region`.
    pub async fn for_region(region: &str) -> Self {
        let aws_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(region.to_string()))
            .load()
            .await;
        tracing::info!(region, "Initialized S3 client");
        Self::new(aws_sdk_s3::Client::new(&aws_config))
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn head_bucket(&self, bucket: &str) -> Result<BucketState, StoreError> {
        match self.client.head_bucket().bucket(bucket).send().await {
            Ok(_) => Ok(BucketState::Exists),
            Err(err) => {
                if err
                    .as_service_error()
                    .is_some_and(HeadBucketError::is_not_found)
                {
                    tracing::debug!(bucket, "HeadBucket reported bucket as not found");
                    return Ok(BucketState::Missing);
                }
                Err(request_error("HeadBucket", bucket, err))
            }
        }
    }

    async fn create_bucket(
        &self,
        bucket: &str,
        location: BucketLocation,
    ) -> Result<(), StoreError> {
        let mut request = self.client.create_bucket().bucket(bucket);
        if let BucketLocation::Constraint(region) = location {
            let configuration = CreateBucketConfiguration::builder()
                .location_constraint(BucketLocationConstraint::from(region.as_str()))
                .build();
            request = request.create_bucket_configuration(configuration);
        }
        request
            .send()
            .await
            .map_err(|e| request_error("CreateBucket", bucket, e))?;
        Ok(())
    }

    async fn put_object(&self, bucket: &str, key: &str, path: &Path) -> Result<(), StoreError> {
        let body = ByteStream::from_path(path)
            .await
            .map_err(|e| StoreError::Body {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(body)
            .send()
            .await
            .map_err(|e| request_error("PutObject", bucket, e))?;
        Ok(())
    }

    async fn list_objects(
        &self,
        bucket: &str,
        prefix: &str,
    ) -> Result<Vec<RemoteObject>, StoreError> {
        let mut objects = Vec::new();
        let mut continuation_token: Option<String> = None;

        loop {
            let output = self
                .client
                .list_objects_v2()
                .bucket(bucket)
                .prefix(prefix)
                .set_continuation_token(continuation_token.take())
                .send()
                .await
                .map_err(|e| request_error("ListObjectsV2", bucket, e))?;

            for obj in output.contents() {
                if let Some(key) = obj.key() {
                    objects.push(RemoteObject {
                        key: key.to_string(),
                        size: obj.size().unwrap_or(0),
                    });
                }
            }

            match output.next_continuation_token() {
                Some(token) if output.is_truncated() == Some(true) => {
                    continuation_token = Some(token.to_string());
                }
                _ => break,
            }
        }

        tracing::debug!(bucket, prefix, count = objects.len(), "Listed objects");
        Ok(objects)
    }
}

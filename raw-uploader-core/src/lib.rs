#![doc = "raw-uploader-core: core logic library for raw-uploader."]

//! Everything that does not talk to AWS directly lives here: configuration
//! types, the [`contract::ObjectStore`] seam, local file discovery, the upload
//! pipeline and the verifier.
//!
//! # Usage
//! The CLI crate supplies a concrete `ObjectStore` (backed by `aws-sdk-s3`);
//! tests supply `MockObjectStore`.

pub mod config;
pub mod contract;
pub mod discover;
pub mod upload;
pub mod verify;

//! piggin-s3: AWS S3 adapter for piggin
//!
//! This crate implements the listing and transfer traits from piggin-core
//! using the aws-sdk-s3 crate. It is the only crate that directly depends
//! on the AWS SDK.

pub mod client;

pub use client::S3Client;

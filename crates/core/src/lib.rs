//! piggin-core: Core library for the piggin S3 command line utility
//!
//! This crate provides:
//! - Path parsing (`s3:bucket/key` vs local paths)
//! - Recursive S3 → local copy with per-object failure reporting
//! - Guards for destructive operations
//! - Collaborator traits for listing and transfers
//! - Configuration and credentials
//!
//! Nothing here depends on the AWS SDK; see `piggin-s3` for the adapter.

pub mod config;
pub mod copy;
pub mod credentials;
pub mod error;
pub mod guard;
pub mod path;
pub mod pattern;
pub mod traits;

pub use config::{Config, ConfigManager};
pub use copy::{copy_object, CopyReport, CopyTask, FailedTransfer, RecursiveCopier, Transferred};
pub use credentials::Credentials;
pub use error::{Error, Result};
pub use guard::{make_bucket, make_dir, remove, RemoveOutcome, RemoveRequest, RemoveTarget};
pub use path::{parse_path, parse_remote_path, ParsedPath, RemotePath};
pub use pattern::NamePattern;
pub use traits::{BucketSettings, ConfirmationPrompt, ListingClient, TransferClient};

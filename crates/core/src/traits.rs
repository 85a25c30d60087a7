//! Collaborator traits
//!
//! The copier and the removal guard only talk to storage through these
//! traits, so the CLI can plug in the S3 adapter and tests can plug in mocks.

use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Default canned ACL for new buckets
pub const DEFAULT_ACL: &str = "private";

/// Default location constraint for new buckets
pub const DEFAULT_LOCATION: &str = "us-west-1";

/// Settings applied when creating a bucket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketSettings {
    /// Canned ACL, e.g. "private" or "public-read"
    pub acl: String,
    /// Location constraint (region)
    pub location: String,
}

impl BucketSettings {
    /// Build settings from optional user input
    ///
    /// Surrounding quotes are stripped and empty values fall back to
    /// `private` / `us-west-1`.
    pub fn new(acl: Option<&str>, location: Option<&str>) -> Self {
        Self {
            acl: normalize(acl, DEFAULT_ACL),
            location: normalize(location, DEFAULT_LOCATION),
        }
    }
}

impl Default for BucketSettings {
    fn default() -> Self {
        Self::new(None, None)
    }
}

fn normalize(value: Option<&str>, default: &str) -> String {
    let value = value
        .map(|v| v.trim().trim_matches('"').trim_matches('\''))
        .unwrap_or_default();
    if value.is_empty() {
        default.to_string()
    } else {
        value.to_string()
    }
}

/// Delimited listing of a bucket
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ListingClient: Send + Sync {
    /// List one level under `prefix`
    ///
    /// Returns object keys and common prefixes; common prefixes end in `/`.
    async fn list(&self, bucket: &str, prefix: &str) -> Result<Vec<String>>;

    /// List bucket names
    async fn list_buckets(&self) -> Result<Vec<String>>;
}

/// Object and bucket mutations
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TransferClient: Send + Sync {
    /// Download an object to a local file, returning the bytes written
    async fn download(&self, bucket: &str, key: &str, local: &Path) -> Result<u64>;

    /// Upload a local file, returning the bytes sent
    async fn upload(&self, bucket: &str, key: &str, local: &Path) -> Result<u64>;

    /// Create an empty object
    async fn touch(&self, bucket: &str, key: &str) -> Result<()>;

    /// Delete a single object
    async fn delete(&self, bucket: &str, key: &str) -> Result<()>;

    /// Delete every object under `prefix`, returning how many were removed
    async fn delete_all(&self, bucket: &str, prefix: &str) -> Result<usize>;

    /// Create a bucket
    async fn create_bucket(&self, bucket: &str, settings: &BucketSettings) -> Result<()>;

    /// Delete a bucket together with any objects left in it
    async fn delete_bucket(&self, bucket: &str) -> Result<()>;
}

/// Yes/no question asked before destructive operations
#[cfg_attr(test, mockall::automock)]
pub trait ConfirmationPrompt {
    /// Ask `message`, returning true when the user agrees
    fn ask(&self, message: &str) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_settings_defaults() {
        let settings = BucketSettings::default();
        assert_eq!(settings.acl, "private");
        assert_eq!(settings.location, "us-west-1");
    }

    #[test]
    fn test_bucket_settings_strip_quotes() {
        let settings = BucketSettings::new(Some("\"public-read\""), Some("'eu-west-1'"));
        assert_eq!(settings.acl, "public-read");
        assert_eq!(settings.location, "eu-west-1");
    }

    #[test]
    fn test_bucket_settings_empty_falls_back() {
        let settings = BucketSettings::new(Some(""), Some("\"\""));
        assert_eq!(settings, BucketSettings::default());
    }
}

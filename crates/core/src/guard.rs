//! Guards around destructive and creating operations
//!
//! Removal refuses to cascade into non-empty prefixes unless asked to, and
//! asks for confirmation before anything is deleted.

use serde::Serialize;

use crate::error::{Error, Result};
use crate::path::RemotePath;
use crate::traits::{BucketSettings, ConfirmationPrompt, ListingClient, TransferClient};

/// What to remove and how
#[derive(Debug, Clone)]
pub struct RemoveRequest {
    pub path: RemotePath,
    /// Delete everything under the prefix instead of refusing when not empty
    pub recursive: bool,
    /// Skip the confirmation prompt
    pub confirmed: bool,
}

/// What was removed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RemoveTarget {
    /// A whole bucket
    Bucket { bucket: String },
    /// Everything under a prefix
    Prefix { bucket: String, prefix: String },
    /// A single object
    Object { bucket: String, key: String },
}

/// Result of a removal
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed(RemoveTarget),
    /// The user declined at the prompt; nothing was deleted
    Aborted,
}

/// Remove a bucket, prefix, or object
///
/// Without `recursive`, one level under the path is listed first and any
/// entry other than the directory marker itself refuses the removal with
/// [`Error::NotEmpty`].
pub async fn remove(
    lister: &dyn ListingClient,
    transfer: &dyn TransferClient,
    prompt: &dyn ConfirmationPrompt,
    request: &RemoveRequest,
) -> Result<RemoveOutcome> {
    let RemotePath { bucket, key } = &request.path;
    if bucket.is_empty() {
        return Err(Error::InvalidPath("missing bucket name".into()));
    }

    if !request.recursive {
        let marker = request.path.dir_prefix();
        let residual: Vec<String> = lister
            .list(bucket, &marker)
            .await?
            .into_iter()
            .filter(|entry| *entry != marker)
            .collect();
        if !residual.is_empty() {
            tracing::debug!(bucket = %bucket, prefix = %marker, entries = residual.len(), "refusing removal");
            return Err(Error::NotEmpty(request.path.to_string()));
        }
    }

    if !request.confirmed {
        let message = if key.is_empty() {
            format!("are you sure to delete bucket {bucket}")
        } else {
            format!("are you sure to delete {key} in {bucket}")
        };
        if !prompt.ask(&message) {
            return Ok(RemoveOutcome::Aborted);
        }
    }

    let target = if key.is_empty() {
        transfer.delete_bucket(bucket).await?;
        RemoveTarget::Bucket {
            bucket: bucket.clone(),
        }
    } else if key.ends_with('/') {
        let removed = transfer.delete_all(bucket, key).await?;
        tracing::debug!(bucket = %bucket, prefix = %key, removed, "prefix removed");
        RemoveTarget::Prefix {
            bucket: bucket.clone(),
            prefix: key.clone(),
        }
    } else {
        transfer.delete(bucket, key).await?;
        if request.recursive {
            transfer.delete_all(bucket, &request.path.dir_prefix()).await?;
        }
        RemoveTarget::Object {
            bucket: bucket.clone(),
            key: key.clone(),
        }
    };

    Ok(RemoveOutcome::Removed(target))
}

/// Create a directory marker, adding the trailing `/` when missing
pub async fn make_dir(transfer: &dyn TransferClient, path: &RemotePath) -> Result<RemotePath> {
    if path.bucket.is_empty() {
        return Err(Error::InvalidPath("missing bucket name".into()));
    }
    if path.key.is_empty() {
        return Err(Error::InvalidPath("missing key name".into()));
    }

    let marker = RemotePath::new(path.bucket.as_str(), path.dir_prefix());
    transfer.touch(&marker.bucket, &marker.key).await?;
    Ok(marker)
}

/// Create a bucket
pub async fn make_bucket(
    transfer: &dyn TransferClient,
    bucket: &str,
    settings: &BucketSettings,
) -> Result<()> {
    if bucket.is_empty() {
        return Err(Error::InvalidPath("missing bucket name".into()));
    }
    transfer.create_bucket(bucket, settings).await
}

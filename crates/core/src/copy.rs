//! Copying between S3 and the local filesystem
//!
//! [`RecursiveCopier`] walks an S3 prefix one delimited level at a time and
//! downloads matching objects into a single local directory. Per-object
//! failures are collected in the [`CopyReport`] instead of aborting the walk.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::error::{Error, Result};
use crate::path::{ParsedPath, RemotePath};
use crate::pattern::NamePattern;
use crate::traits::{ListingClient, TransferClient};

/// A validated S3 prefix → local directory copy
#[derive(Debug, Clone)]
pub struct CopyTask {
    /// Remote prefix to walk
    pub source: RemotePath,
    /// Existing local directory receiving the files
    pub dest_dir: PathBuf,
    /// Optional filter on object base names
    pub pattern: Option<NamePattern>,
    /// Descend into common prefixes
    pub recursive: bool,
}

impl CopyTask {
    /// Validate the source and destination before any I/O against S3
    pub fn new(
        source: &ParsedPath,
        dest: &ParsedPath,
        pattern: Option<NamePattern>,
        recursive: bool,
    ) -> Result<Self> {
        let ParsedPath::Remote(source) = source else {
            return Err(Error::Precondition(format!(
                "source {source} must be an S3 location"
            )));
        };
        let ParsedPath::Local(dest_dir) = dest else {
            return Err(Error::Precondition(format!(
                "destination {dest} must be a local path"
            )));
        };
        if source.bucket.is_empty() {
            return Err(Error::Precondition("source is missing a bucket name".into()));
        }
        if !dest_dir.exists() {
            return Err(Error::Precondition(format!(
                "destination {} does not exist",
                dest_dir.display()
            )));
        }
        if !dest_dir.is_dir() {
            return Err(Error::Precondition(format!(
                "destination {} must be a directory",
                dest_dir.display()
            )));
        }

        Ok(Self {
            source: source.clone(),
            dest_dir: dest_dir.clone(),
            pattern,
            recursive,
        })
    }
}

/// One completed transfer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transferred {
    pub source: String,
    pub target: String,
    pub size_bytes: u64,
}

/// One failed transfer or listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedTransfer {
    pub key: String,
    pub error: String,
}

/// Tally of a recursive copy
#[derive(Debug, Clone, Default, Serialize)]
pub struct CopyReport {
    pub copied: Vec<Transferred>,
    pub skipped: Vec<String>,
    pub failed: Vec<FailedTransfer>,
    pub cancelled: bool,
}

impl CopyReport {
    /// True when nothing failed and the walk ran to completion
    pub fn is_success(&self) -> bool {
        self.failed.is_empty() && !self.cancelled
    }

    /// Total bytes downloaded
    pub fn total_bytes(&self) -> u64 {
        self.copied.iter().map(|t| t.size_bytes).sum()
    }

    fn record_failure(&mut self, key: &str, err: &Error) {
        tracing::warn!(key, error = %err, "transfer failed, continuing");
        self.failed.push(FailedTransfer {
            key: key.to_string(),
            error: err.to_string(),
        });
    }
}

/// Walks an S3 prefix and downloads what it finds
pub struct RecursiveCopier<'a> {
    lister: &'a dyn ListingClient,
    transfer: &'a dyn TransferClient,
    cancel: CancellationToken,
}

impl<'a> RecursiveCopier<'a> {
    pub fn new(lister: &'a dyn ListingClient, transfer: &'a dyn TransferClient) -> Self {
        Self {
            lister,
            transfer,
            cancel: CancellationToken::new(),
        }
    }

    /// Use `cancel` to stop the walk between entries
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Run the copy, returning the tally
    ///
    /// Errors from individual downloads or sub-listings are recorded in the
    /// report; the walk always continues past them.
    pub async fn copy(&self, task: &CopyTask) -> Result<CopyReport> {
        let mut report = CopyReport::default();
        self.walk(task, &task.source.key, &mut report).await;
        tracing::debug!(
            copied = report.copied.len(),
            skipped = report.skipped.len(),
            failed = report.failed.len(),
            cancelled = report.cancelled,
            "copy finished"
        );
        Ok(report)
    }

    async fn walk(&self, task: &CopyTask, prefix: &str, report: &mut CopyReport) {
        let bucket = &task.source.bucket;
        tracing::debug!(bucket = %bucket, prefix, "listing");

        let entries = match self.lister.list(bucket, prefix).await {
            Ok(entries) => entries,
            Err(e) => {
                report.record_failure(prefix, &e);
                return;
            }
        };

        for entry in entries {
            if self.cancel.is_cancelled() {
                report.cancelled = true;
                return;
            }

            // Only a directory marker is skipped; a plain-key prefix lists the object itself.
            if entry == prefix && prefix.ends_with('/') {
                continue;
            }

            if entry.ends_with('/') {
                if task.recursive {
                    Box::pin(self.walk(task, &entry, report)).await;
                    if report.cancelled {
                        return;
                    }
                } else {
                    report.skipped.push(entry);
                }
                continue;
            }

            let name = entry.rsplit('/').next().unwrap_or(&entry);
            if task.pattern.as_ref().is_some_and(|p| !p.matches(name)) {
                report.skipped.push(entry);
                continue;
            }

            let target = task.dest_dir.join(name);
            match self.transfer.download(bucket, &entry, &target).await {
                Ok(size_bytes) => report.copied.push(Transferred {
                    source: RemotePath::new(bucket.as_str(), entry.as_str()).to_string(),
                    target: target.display().to_string(),
                    size_bytes,
                }),
                Err(e) => report.record_failure(&entry, &e),
            }
        }
    }
}

/// Copy a single object in either direction
///
/// Remote → local downloads (joining the object name when the target is an
/// existing directory); local → remote uploads (appending the file name when
/// the key is empty or ends in `/`).
pub async fn copy_object(
    transfer: &dyn TransferClient,
    source: &ParsedPath,
    target: &ParsedPath,
) -> Result<Transferred> {
    match (source, target) {
        (ParsedPath::Remote(src), ParsedPath::Local(dst)) => download_object(transfer, src, dst).await,
        (ParsedPath::Local(src), ParsedPath::Remote(dst)) => upload_object(transfer, src, dst).await,
        _ => Err(Error::Precondition(format!(
            "cannot copy {source} to {target}: one side must be S3 and the other local"
        ))),
    }
}

async fn download_object(
    transfer: &dyn TransferClient,
    src: &RemotePath,
    dst: &Path,
) -> Result<Transferred> {
    if src.bucket.is_empty() {
        return Err(Error::InvalidPath("missing bucket name".into()));
    }
    if src.is_dir() {
        return Err(Error::Precondition(format!(
            "{src} is a prefix; copy it recursively into a directory"
        )));
    }

    let target = if dst.is_dir() {
        dst.join(src.name())
    } else {
        dst.to_path_buf()
    };

    let size_bytes = transfer.download(&src.bucket, &src.key, &target).await?;
    Ok(Transferred {
        source: src.to_string(),
        target: target.display().to_string(),
        size_bytes,
    })
}

async fn upload_object(
    transfer: &dyn TransferClient,
    src: &Path,
    dst: &RemotePath,
) -> Result<Transferred> {
    if dst.bucket.is_empty() {
        return Err(Error::InvalidPath("missing bucket name".into()));
    }
    if !src.exists() {
        return Err(Error::NotFound(src.display().to_string()));
    }
    if !src.is_file() {
        return Err(Error::Precondition(format!(
            "{} is not a regular file",
            src.display()
        )));
    }

    let target = if dst.is_dir() {
        let file_name = src
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        RemotePath::new(dst.bucket.as_str(), format!("{}{file_name}", dst.key))
    } else {
        dst.clone()
    };

    let size_bytes = transfer.upload(&target.bucket, &target.key, src).await?;
    Ok(Transferred {
        source: src.display().to_string(),
        target: target.to_string(),
        size_bytes,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::{HashMap, HashSet};
    use std::sync::Mutex;

    use async_trait::async_trait;
    use tempfile::TempDir;

    use super::*;
    use crate::traits::{BucketSettings, MockTransferClient};

    /// Listing backed by a prefix → entries map
    #[derive(Default)]
    struct FakeListing {
        levels: HashMap<String, Vec<String>>,
        broken: HashSet<String>,
    }

    impl FakeListing {
        fn with(mut self, prefix: &str, entries: &[&str]) -> Self {
            self.levels.insert(
                prefix.to_string(),
                entries.iter().map(|e| e.to_string()).collect(),
            );
            self
        }

        fn broken(mut self, prefix: &str) -> Self {
            self.broken.insert(prefix.to_string());
            self
        }
    }

    #[async_trait]
    impl ListingClient for FakeListing {
        async fn list(&self, _bucket: &str, prefix: &str) -> Result<Vec<String>> {
            if self.broken.contains(prefix) {
                return Err(Error::Network("listing refused".into()));
            }
            Ok(self.levels.get(prefix).cloned().unwrap_or_default())
        }

        async fn list_buckets(&self) -> Result<Vec<String>> {
            Ok(vec![])
        }
    }

    /// Transfer client that remembers downloads and fails on chosen keys
    #[derive(Default)]
    struct RecordingTransfer {
        downloads: Mutex<Vec<(String, PathBuf)>>,
        failing: HashSet<String>,
    }

    impl RecordingTransfer {
        fn failing(keys: &[&str]) -> Self {
            Self {
                failing: keys.iter().map(|k| k.to_string()).collect(),
                ..Default::default()
            }
        }

        fn keys(&self) -> HashSet<String> {
            self.downloads
                .lock()
                .unwrap()
                .iter()
                .map(|(k, _)| k.clone())
                .collect()
        }
    }

    #[async_trait]
    impl TransferClient for RecordingTransfer {
        async fn download(&self, _bucket: &str, key: &str, local: &Path) -> Result<u64> {
            if self.failing.contains(key) {
                return Err(Error::transfer(key, "connection reset"));
            }
            self.downloads
                .lock()
                .unwrap()
                .push((key.to_string(), local.to_path_buf()));
            Ok(10)
        }

        async fn upload(&self, _bucket: &str, _key: &str, _local: &Path) -> Result<u64> {
            unreachable!("copier never uploads")
        }

        async fn touch(&self, _bucket: &str, _key: &str) -> Result<()> {
            unreachable!()
        }

        async fn delete(&self, _bucket: &str, _key: &str) -> Result<()> {
            unreachable!()
        }

        async fn delete_all(&self, _bucket: &str, _prefix: &str) -> Result<usize> {
            unreachable!()
        }

        async fn create_bucket(&self, _bucket: &str, _settings: &BucketSettings) -> Result<()> {
            unreachable!()
        }

        async fn delete_bucket(&self, _bucket: &str) -> Result<()> {
            unreachable!()
        }
    }

    fn task(dir: &TempDir, source: &str, pattern: Option<&str>, recursive: bool) -> CopyTask {
        let source = crate::path::parse_path(source).unwrap();
        let dest = ParsedPath::Local(dir.path().to_path_buf());
        let pattern = pattern.map(|p| NamePattern::parse(p).unwrap());
        CopyTask::new(&source, &dest, pattern, recursive).unwrap()
    }

    fn nested_listing() -> FakeListing {
        FakeListing::default()
            .with("", &["a.txt", "sub/"])
            .with("sub/", &["sub/", "sub/b.txt"])
    }

    #[tokio::test]
    async fn test_recursive_copy_descends() {
        let dir = TempDir::new().unwrap();
        let lister = nested_listing();
        let transfer = RecordingTransfer::default();

        let report = RecursiveCopier::new(&lister, &transfer)
            .copy(&task(&dir, "s3:bucket", None, true))
            .await
            .unwrap();

        assert!(report.is_success());
        assert_eq!(
            transfer.keys(),
            HashSet::from(["a.txt".to_string(), "sub/b.txt".to_string()])
        );
        let targets: HashSet<PathBuf> = transfer
            .downloads
            .lock()
            .unwrap()
            .iter()
            .map(|(_, p)| p.clone())
            .collect();
        assert!(targets.contains(&dir.path().join("a.txt")));
        assert!(targets.contains(&dir.path().join("b.txt")));
        assert_eq!(report.total_bytes(), 20);
    }

    #[tokio::test]
    async fn test_non_recursive_copy_skips_prefixes() {
        let dir = TempDir::new().unwrap();
        let lister = nested_listing();
        let transfer = RecordingTransfer::default();

        let report = RecursiveCopier::new(&lister, &transfer)
            .copy(&task(&dir, "s3:bucket", None, false))
            .await
            .unwrap();

        assert!(report.is_success());
        assert_eq!(transfer.keys(), HashSet::from(["a.txt".to_string()]));
        assert_eq!(report.skipped, vec!["sub/".to_string()]);
    }

    #[tokio::test]
    async fn test_prefix_marker_is_ignored() {
        let dir = TempDir::new().unwrap();
        let lister = FakeListing::default().with("data/", &["data/", "data/x.bin"]);
        let transfer = RecordingTransfer::default();

        let report = RecursiveCopier::new(&lister, &transfer)
            .copy(&task(&dir, "s3:bucket/data/", None, true))
            .await
            .unwrap();

        assert_eq!(transfer.keys(), HashSet::from(["data/x.bin".to_string()]));
        assert!(report.skipped.is_empty());
    }

    #[tokio::test]
    async fn test_plain_key_source_copies_the_object() {
        let dir = TempDir::new().unwrap();
        let lister = FakeListing::default().with("logs/a.txt", &["logs/a.txt"]);
        let transfer = RecordingTransfer::default();

        let report = RecursiveCopier::new(&lister, &transfer)
            .copy(&task(&dir, "s3:bucket/logs/a.txt", Some("a"), false))
            .await
            .unwrap();

        assert!(report.is_success());
        assert_eq!(report.copied.len(), 1);
        assert_eq!(report.copied[0].target, dir.path().join("a.txt").display().to_string());
        assert_eq!(transfer.keys(), HashSet::from(["logs/a.txt".to_string()]));
    }

    #[tokio::test]
    async fn test_pattern_filters_names() {
        let dir = TempDir::new().unwrap();
        let lister = FakeListing::default().with(
            "",
            &["report_jan.csv", "report_feb.csv", "notes.txt"],
        );
        let transfer = RecordingTransfer::default();

        let report = RecursiveCopier::new(&lister, &transfer)
            .copy(&task(&dir, "s3:bucket", Some("report"), false))
            .await
            .unwrap();

        assert_eq!(
            transfer.keys(),
            HashSet::from(["report_jan.csv".to_string(), "report_feb.csv".to_string()])
        );
        assert_eq!(report.skipped, vec!["notes.txt".to_string()]);
    }

    #[tokio::test]
    async fn test_failures_are_recorded_and_walk_continues() {
        let dir = TempDir::new().unwrap();
        let lister = FakeListing::default()
            .with("", &["a.txt", "b.txt", "c.txt", "sub/"])
            .broken("sub/");
        let transfer = RecordingTransfer::failing(&["b.txt"]);

        let report = RecursiveCopier::new(&lister, &transfer)
            .copy(&task(&dir, "s3:bucket", None, true))
            .await
            .unwrap();

        assert!(!report.is_success());
        assert_eq!(
            transfer.keys(),
            HashSet::from(["a.txt".to_string(), "c.txt".to_string()])
        );
        let failed: HashSet<&str> = report.failed.iter().map(|f| f.key.as_str()).collect();
        assert_eq!(failed, HashSet::from(["b.txt", "sub/"]));
    }

    #[tokio::test]
    async fn test_cancelled_copy_stops_early() {
        let dir = TempDir::new().unwrap();
        let lister = nested_listing();
        let transfer = RecordingTransfer::default();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let report = RecursiveCopier::new(&lister, &transfer)
            .with_cancellation(cancel)
            .copy(&task(&dir, "s3:bucket", None, true))
            .await
            .unwrap();

        assert!(report.cancelled);
        assert!(!report.is_success());
        assert!(transfer.keys().is_empty());
    }

    #[test]
    fn test_task_requires_remote_source() {
        let dir = TempDir::new().unwrap();
        let source = ParsedPath::Local(PathBuf::from("local"));
        let dest = ParsedPath::Local(dir.path().to_path_buf());
        let err = CopyTask::new(&source, &dest, None, false).unwrap_err();
        assert!(matches!(err, Error::Precondition(_)));
    }

    #[test]
    fn test_task_requires_local_dest() {
        let source = ParsedPath::Remote(RemotePath::new("bucket", ""));
        let dest = ParsedPath::Remote(RemotePath::new("other", ""));
        let err = CopyTask::new(&source, &dest, None, false).unwrap_err();
        assert!(matches!(err, Error::Precondition(_)));
    }

    #[test]
    fn test_task_requires_existing_directory() {
        let dir = TempDir::new().unwrap();
        let source = ParsedPath::Remote(RemotePath::new("bucket", ""));

        let missing = ParsedPath::Local(dir.path().join("missing"));
        let err = CopyTask::new(&source, &missing, None, false).unwrap_err();
        assert!(err.to_string().contains("does not exist"));

        let file = dir.path().join("file.txt");
        std::fs::write(&file, b"x").unwrap();
        let err = CopyTask::new(&source, &ParsedPath::Local(file), None, false).unwrap_err();
        assert!(err.to_string().contains("must be a directory"));
    }

    #[tokio::test]
    async fn test_copy_object_download_into_directory() {
        let dir = TempDir::new().unwrap();
        let expected = dir.path().join("c.txt");
        let mut transfer = MockTransferClient::new();
        transfer
            .expect_download()
            .withf(move |bucket, key, local| bucket == "bucket" && key == "a/c.txt" && local == expected)
            .times(1)
            .returning(|_, _, _| Ok(3));

        let source = ParsedPath::Remote(RemotePath::new("bucket", "a/c.txt"));
        let target = ParsedPath::Local(dir.path().to_path_buf());
        let done = copy_object(&transfer, &source, &target).await.unwrap();
        assert_eq!(done.size_bytes, 3);
        assert_eq!(done.source, "s3:bucket/a/c.txt");
    }

    #[tokio::test]
    async fn test_copy_object_upload_appends_file_name() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("data.csv");
        std::fs::write(&file, b"1,2,3").unwrap();

        let mut transfer = MockTransferClient::new();
        transfer
            .expect_upload()
            .withf(|bucket, key, _| bucket == "bucket" && key == "in/data.csv")
            .times(1)
            .returning(|_, _, _| Ok(5));

        let source = ParsedPath::Local(file);
        let target = ParsedPath::Remote(RemotePath::new("bucket", "in/"));
        let done = copy_object(&transfer, &source, &target).await.unwrap();
        assert_eq!(done.target, "s3:bucket/in/data.csv");
    }

    #[tokio::test]
    async fn test_copy_object_rejects_same_side() {
        let transfer = MockTransferClient::new();
        let a = ParsedPath::Local(PathBuf::from("a"));
        let b = ParsedPath::Local(PathBuf::from("b"));
        let err = copy_object(&transfer, &a, &b).await.unwrap_err();
        assert!(matches!(err, Error::Precondition(_)));

        let a = ParsedPath::Remote(RemotePath::new("x", "a"));
        let b = ParsedPath::Remote(RemotePath::new("y", "b"));
        assert!(copy_object(&transfer, &a, &b).await.is_err());
    }

    #[tokio::test]
    async fn test_copy_object_missing_upload_source() {
        let dir = TempDir::new().unwrap();
        let transfer = MockTransferClient::new();
        let source = ParsedPath::Local(dir.path().join("nope.txt"));
        let target = ParsedPath::Remote(RemotePath::new("bucket", "k"));
        let err = copy_object(&transfer, &source, &target).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }
}

//! Path parsing and resolution
//!
//! Handles parsing of remote paths in the format `s3:bucket[/key]`.
//! Anything without the `s3` scheme is a local path and is passed through as-is.

use std::path::PathBuf;

use crate::error::{Error, Result};

/// Scheme that marks a path as remote
pub const SCHEME: &str = "s3";

/// A parsed remote path pointing to an S3 location
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RemotePath {
    /// Bucket name (empty means "all buckets")
    pub bucket: String,
    /// Object key (empty for bucket root)
    pub key: String,
}

impl RemotePath {
    /// Create a new RemotePath
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
        }
    }

    /// Whether the path names a bucket root or a directory marker
    pub fn is_dir(&self) -> bool {
        self.key.is_empty() || self.key.ends_with('/')
    }

    /// Whether the path names a bucket root
    pub fn is_bucket_root(&self) -> bool {
        self.key.is_empty()
    }

    /// The last key segment, ignoring a trailing slash
    pub fn name(&self) -> &str {
        let key = self.key.trim_end_matches('/');
        key.rsplit('/').next().unwrap_or(key)
    }

    /// The key as a directory prefix: empty stays empty, otherwise ends with `/`
    pub fn dir_prefix(&self) -> String {
        if self.key.is_empty() || self.key.ends_with('/') {
            self.key.clone()
        } else {
            format!("{}/", self.key)
        }
    }

    /// Get the full path as a string (`s3:bucket/key`)
    pub fn to_full_path(&self) -> String {
        format!("{SCHEME}:{}/{}", self.bucket, self.key)
    }
}

impl std::fmt::Display for RemotePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_full_path())
    }
}

/// Parsed path that can be either local or remote
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedPath {
    /// Local filesystem path
    Local(PathBuf),
    /// Remote S3 path
    Remote(RemotePath),
}

impl std::fmt::Display for ParsedPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParsedPath::Local(p) => write!(f, "{}", p.display()),
            ParsedPath::Remote(r) => write!(f, "{r}"),
        }
    }
}

/// Parse a path string into a ParsedPath
///
/// - `s3:bucket/key` (scheme matched case-insensitively, leading slashes after
///   the colon and after the bucket ignored) is remote; a key never starts
///   with `/`
/// - a single colon with any other prefix is local and kept verbatim, so
///   `C:\Users\x` survives
/// - no colon at all is local
/// - two or more colons is an error
pub fn parse_path(raw: &str) -> Result<ParsedPath> {
    let parts: Vec<&str> = raw.split(':').collect();

    match parts.as_slice() {
        [local] => Ok(ParsedPath::Local(PathBuf::from(*local))),
        [scheme, rest] if scheme.eq_ignore_ascii_case(SCHEME) => {
            let rest = rest.trim_start_matches('/');
            let (bucket, key) = rest.split_once('/').unwrap_or((rest, ""));
            Ok(ParsedPath::Remote(RemotePath::new(
                bucket,
                key.trim_start_matches('/'),
            )))
        }
        [_, _] => Ok(ParsedPath::Local(PathBuf::from(raw))),
        _ => Err(Error::InvalidPath(format!(
            "'{raw}' has more than one ':' separator"
        ))),
    }
}

/// Parse a path that must be remote
///
/// Input without the `s3:` scheme is read as `s3:///` + input, so a bare
/// `bucket/key` names a remote location.
pub fn parse_remote_path(raw: &str) -> Result<RemotePath> {
    let has_scheme = raw
        .get(..SCHEME.len() + 1)
        .is_some_and(|p| p.eq_ignore_ascii_case("s3:"));
    let qualified = if has_scheme {
        raw.to_string()
    } else {
        format!("{SCHEME}:///{raw}")
    };

    match parse_path(&qualified)? {
        ParsedPath::Remote(remote) => Ok(remote),
        ParsedPath::Local(_) => Err(Error::InvalidPath(format!("'{raw}' is not an S3 path"))),
    }
}

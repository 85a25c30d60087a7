//! Object name filters

use crate::error::{Error, Result};

/// Filter applied to the base name of each listed object
///
/// Plain text matches anywhere in the name; text with glob metacharacters
/// must match the whole name.
#[derive(Debug, Clone)]
pub enum NamePattern {
    /// Substring match
    Contains(String),
    /// Whole-name glob match
    Glob(glob::Pattern),
}

impl NamePattern {
    /// Parse a user-supplied pattern
    pub fn parse(raw: &str) -> Result<Self> {
        if raw.contains(['*', '?', '[']) {
            let pattern = glob::Pattern::new(raw)
                .map_err(|e| Error::InvalidPath(format!("bad pattern '{raw}': {e}")))?;
            Ok(NamePattern::Glob(pattern))
        } else {
            Ok(NamePattern::Contains(raw.to_string()))
        }
    }

    /// Check whether `name` passes the filter
    pub fn matches(&self, name: &str) -> bool {
        match self {
            NamePattern::Contains(needle) => name.contains(needle.as_str()),
            NamePattern::Glob(pattern) => pattern.matches(name),
        }
    }
}

impl std::fmt::Display for NamePattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NamePattern::Contains(needle) => write!(f, "{needle}"),
            NamePattern::Glob(pattern) => write!(f, "{}", pattern.as_str()),
        }
    }
}

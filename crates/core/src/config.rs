//! Core runtime configuration.
//!
//! This module defines configuration that should be resolved once at process startup and then
//! passed into core services. Library code never reads environment variables; the binaries do
//! that and hand the values to [`CoreConfig::new`].

use crate::author::CommitAuthor;
use crate::constants::{DEFAULT_AUTHOR_EMAIL, DEFAULT_AUTHOR_NAME, DEFAULT_PAGES_DIR};
use crate::error::{CmsError, CmsResult};
use crate::store::normalise_dir;
use std::path::{Path, PathBuf};

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    content_root: PathBuf,
    pages_dir: String,
    author: CommitAuthor,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// `pages_dir` must be a repository-relative directory (no leading `/`, no `..`).
    pub fn new(content_root: PathBuf, pages_dir: &str, author: CommitAuthor) -> CmsResult<Self> {
        let pages_dir = normalise_dir(pages_dir)?;
        if pages_dir.is_empty() {
            return Err(CmsError::InvalidInput(
                "pages directory cannot be the repository root".into(),
            ));
        }

        Ok(Self {
            content_root,
            pages_dir,
            author,
        })
    }

    /// Directory whose immediate subdirectories are content repositories.
    pub fn content_root(&self) -> &Path {
        &self.content_root
    }

    pub fn pages_dir(&self) -> &str {
        &self.pages_dir
    }

    pub fn author(&self) -> &CommitAuthor {
        &self.author
    }
}

/// Resolve the pages directory from an optional override value.
///
/// `None` or a blank value yields [`DEFAULT_PAGES_DIR`].
pub fn pages_dir_from_env_value(value: Option<String>) -> String {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_PAGES_DIR.to_string())
}

/// Resolve the commit author from optional override values, falling back to the defaults.
pub fn commit_author_from_env_values(
    name: Option<String>,
    email: Option<String>,
) -> CmsResult<CommitAuthor> {
    let name = name
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_AUTHOR_NAME.to_string());
    let email = email
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_AUTHOR_EMAIL.to_string());

    CommitAuthor::new(name, email)
}

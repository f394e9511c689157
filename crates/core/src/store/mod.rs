//! Content stores.
//!
//! A content store is a flat namespace of UTF-8 text files addressed by repository-relative
//! paths (`content/pages/home.md`). Every write carries the revision the caller last read, which
//! gives optimistic concurrency without locks held across requests:
//!
//! - `put` with no revision creates a file and fails with [`CmsError::Conflict`] if it exists;
//! - `put` or `delete` with a revision fails with [`CmsError::Conflict`] unless it is the
//!   current revision of that path.
//!
//! Revisions are git blob ids (hex), so the git store and the in-memory store agree on them.

mod git;
mod memory;

pub use git::{GitContentStore, GitWorkspace};
pub use memory::{MemoryContentStore, MemoryWorkspace};

use crate::error::{CmsError, CmsResult};
use cms_types::NonEmptyText;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// Opaque version token of a stored file.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Revision(String);

impl Revision {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Revision of `content` as a git blob id.
    pub fn of_content(content: &[u8]) -> CmsResult<Self> {
        git2::Oid::hash_object(git2::ObjectType::Blob, content)
            .map(Self::from)
            .map_err(CmsError::GitBlob)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<git2::Oid> for Revision {
    fn from(oid: git2::Oid) -> Self {
        Self(oid.to_string())
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A file read from a store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StoredFile {
    pub path: String,
    pub content: String,
    pub revision: Revision,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Dir,
}

/// One entry of a directory listing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DirEntry {
    pub name: String,
    pub path: String,
    pub kind: EntryKind,
    /// Always set for files. Directories carry one only where the backend has a tree id.
    pub revision: Option<Revision>,
}

/// A repository known to a [`RepositoryHost`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RepoEntry {
    pub name: String,
    pub path: String,
}

/// Single-line commit subject.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommitMessage(String);

impl CommitMessage {
    pub fn new(summary: impl AsRef<str>) -> CmsResult<Self> {
        let summary = summary.as_ref().trim();
        if summary.contains(['\n', '\r']) {
            return Err(CmsError::InvalidInput(
                "commit message must be single-line".into(),
            ));
        }
        NonEmptyText::new(summary)
            .map(|text| Self(text.as_str().to_string()))
            .map_err(|_| CmsError::InvalidInput("commit message must be non-empty".into()))
    }

    pub fn create(path: &str) -> Self {
        Self::for_path("Create", path)
    }

    pub fn update(path: &str) -> Self {
        Self::for_path("Update", path)
    }

    pub fn delete(path: &str) -> Self {
        Self::for_path("Delete", path)
    }

    /// The caller's message if it is usable, otherwise `fallback`.
    pub fn or_default(message: Option<&str>, fallback: Self) -> CmsResult<Self> {
        match message.map(str::trim).filter(|m| !m.is_empty()) {
            Some(m) => Self::new(m),
            None => Ok(fallback),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn for_path(verb: &str, path: &str) -> Self {
        Self(format!("{verb} {path}"))
    }
}

impl fmt::Display for CommitMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Versioned text file storage.
pub trait ContentStore: Send + Sync {
    /// Read the current content and revision of a file.
    fn get(&self, path: &str) -> CmsResult<StoredFile>;

    /// Create (`revision = None`) or replace (`revision = Some(current)`) a file.
    fn put(
        &self,
        path: &str,
        content: &str,
        revision: Option<&Revision>,
        message: &CommitMessage,
    ) -> CmsResult<Revision>;

    /// Remove a file at its current revision.
    fn delete(&self, path: &str, revision: &Revision, message: &CommitMessage) -> CmsResult<()>;

    /// List the immediate children of a directory (`""` is the repository root), sorted by name.
    ///
    /// A missing directory is [`CmsError::NotFound`].
    fn list(&self, dir: &str) -> CmsResult<Vec<DirEntry>>;
}

/// A set of named content repositories.
pub trait RepositoryHost: Send + Sync {
    fn list_repos(&self) -> CmsResult<Vec<RepoEntry>>;

    fn open(&self, name: &str) -> CmsResult<Arc<dyn ContentStore>>;
}

/// Check a revision against the current one, as `put` and `delete` require.
pub(crate) fn check_revision(
    path: &str,
    current: Option<&Revision>,
    expected: Option<&Revision>,
) -> CmsResult<()> {
    match (current, expected) {
        (None, None) => Ok(()),
        (Some(_), None) => Err(CmsError::Conflict(format!(
            "'{path}' already exists; pass its revision to replace it"
        ))),
        (None, Some(_)) => Err(CmsError::Conflict(format!(
            "'{path}' does not exist at the given revision"
        ))),
        (Some(current), Some(expected)) if current != expected => Err(CmsError::Conflict(
            format!("'{path}' has changed (current revision {current}, given {expected})"),
        )),
        (Some(_), Some(_)) => Ok(()),
    }
}

/// Validate a repository-relative file path and return it in canonical form.
///
/// Rejects empty paths, absolute paths, backslashes, empty, `.` and `..` segments and anything
/// under `.git`.
pub fn normalise_path(path: &str) -> CmsResult<String> {
    let invalid = |reason| CmsError::InvalidPath {
        path: path.to_string(),
        reason,
    };

    let trimmed = path.trim();
    if trimmed.is_empty() {
        return Err(invalid("path is empty"));
    }
    if trimmed.starts_with('/') {
        return Err(invalid("path must be relative to the repository"));
    }
    if trimmed.contains('\\') {
        return Err(invalid("path must use '/' separators"));
    }

    for segment in trimmed.split('/') {
        match segment {
            "" => return Err(invalid("path must not contain empty segments")),
            "." | ".." => return Err(invalid("path must not contain '.' or '..' segments")),
            ".git" => return Err(invalid("path must not reach into .git")),
            _ => {}
        }
    }

    Ok(trimmed.to_string())
}

/// Like [`normalise_path`], but a blank path (or `/`) means the repository root and a trailing
/// `/` is dropped.
pub fn normalise_dir(dir: &str) -> CmsResult<String> {
    let trimmed = dir.trim();
    if trimmed.is_empty() || trimmed == "/" {
        return Ok(String::new());
    }
    normalise_path(trimmed.strip_suffix('/').unwrap_or(trimmed))
}

/// Last segment of a normalised path.
pub(crate) fn file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Join a normalised directory (possibly root) and a child name.
pub(crate) fn join(dir: &str, name: &str) -> String {
    if dir.is_empty() {
        name.to_string()
    } else {
        format!("{dir}/{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalise_path_accepts_relative_paths() {
        assert_eq!(
            normalise_path("content/pages/home.md").unwrap(),
            "content/pages/home.md"
        );
        assert_eq!(normalise_path(" home.md ").unwrap(), "home.md");
    }

    #[test]
    fn normalise_path_rejects_escapes() {
        for bad in [
            "",
            "/etc/passwd",
            "../outside.md",
            "content/../../x",
            "content//pages",
            "./home.md",
            ".git/config",
            "content/.git/HEAD",
            "content\\pages",
        ] {
            assert!(
                matches!(normalise_path(bad), Err(CmsError::InvalidPath { .. })),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn normalise_dir_allows_root_and_trailing_slash() {
        assert_eq!(normalise_dir("").unwrap(), "");
        assert_eq!(normalise_dir("/").unwrap(), "");
        assert_eq!(normalise_dir("content/pages/").unwrap(), "content/pages");
        assert!(normalise_dir("../x").is_err());
    }

    #[test]
    fn revision_of_content_matches_git_blob_id() {
        // `printf 'hello\n' | git hash-object --stdin`
        let revision = Revision::of_content(b"hello\n").unwrap();
        assert_eq!(revision.as_str(), "ce013625030ba8dba906f756967f9e9ca394464a");
    }

    #[test]
    fn check_revision_enforces_optimistic_concurrency() {
        let a = Revision::new("a");
        let b = Revision::new("b");

        assert!(check_revision("p", None, None).is_ok());
        assert!(check_revision("p", Some(&a), Some(&a)).is_ok());
        assert!(matches!(
            check_revision("p", Some(&a), None),
            Err(CmsError::Conflict(_))
        ));
        assert!(matches!(
            check_revision("p", None, Some(&a)),
            Err(CmsError::Conflict(_))
        ));
        assert!(matches!(
            check_revision("p", Some(&a), Some(&b)),
            Err(CmsError::Conflict(_))
        ));
    }

    #[test]
    fn commit_message_defaults_and_validation() {
        assert_eq!(
            CommitMessage::update("content/pages/a.md").as_str(),
            "Update content/pages/a.md"
        );
        assert!(CommitMessage::new("two\nlines").is_err());
        assert!(CommitMessage::new("  ").is_err());

        let msg = CommitMessage::or_default(Some(""), CommitMessage::delete("x.md")).unwrap();
        assert_eq!(msg.as_str(), "Delete x.md");
        let msg = CommitMessage::or_default(Some("Tidy"), CommitMessage::delete("x.md")).unwrap();
        assert_eq!(msg.as_str(), "Tidy");
    }
}

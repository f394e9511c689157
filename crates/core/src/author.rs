//! Commit author identity.

use crate::error::{CmsError, CmsResult};
use cms_types::NonEmptyText;

/// Author (and committer) recorded on every commit a store creates.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommitAuthor {
    pub name: NonEmptyText,
    pub email: NonEmptyText,
}

impl CommitAuthor {
    /// Validate and build an author.
    ///
    /// Both values must be single-line; the email must contain `@`.
    pub fn new(name: impl AsRef<str>, email: impl AsRef<str>) -> CmsResult<Self> {
        let name = name.as_ref().trim();
        let email = email.as_ref().trim();

        if name.contains(['\n', '\r']) || email.contains(['\n', '\r']) {
            return Err(CmsError::InvalidInput(
                "commit author name and email must be single-line".into(),
            ));
        }
        if !email.contains('@') {
            return Err(CmsError::InvalidInput(format!(
                "commit author email '{email}' is not an email address"
            )));
        }

        let name = NonEmptyText::new(name)
            .map_err(|_| CmsError::InvalidInput("commit author name must be non-empty".into()))?;
        let email = NonEmptyText::new(email)
            .map_err(|_| CmsError::InvalidInput("commit author email must be non-empty".into()))?;

        Ok(Self { name, email })
    }

    pub(crate) fn signature(&self) -> CmsResult<git2::Signature<'static>> {
        git2::Signature::now(self.name.as_str(), self.email.as_str())
            .map_err(CmsError::GitSignature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_and_trims_valid_author() {
        let author = CommitAuthor::new("  Jane Editor ", "jane@example.com").unwrap();
        assert_eq!(author.name.as_str(), "Jane Editor");
        assert_eq!(author.email.as_str(), "jane@example.com");
    }

    #[test]
    fn rejects_empty_name() {
        let err = CommitAuthor::new("   ", "jane@example.com").unwrap_err();
        assert!(matches!(err, CmsError::InvalidInput(_)));
    }

    #[test]
    fn rejects_email_without_at() {
        assert!(CommitAuthor::new("Jane", "jane.example.com").is_err());
    }

    #[test]
    fn rejects_multiline_values() {
        assert!(CommitAuthor::new("Jane\nEditor", "jane@example.com").is_err());
    }

    #[test]
    fn builds_git_signature() {
        let author = CommitAuthor::new("Jane", "jane@example.com").unwrap();
        let sig = author.signature().unwrap();
        assert_eq!(sig.name(), Some("Jane"));
        assert_eq!(sig.email(), Some("jane@example.com"));
    }
}

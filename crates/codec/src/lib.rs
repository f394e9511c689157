//! Page document codec.
//!
//! This crate translates between the in-memory page model ([`PageContent`]) and the on-disk,
//! git-backed page file format: Markdown with YAML front matter, where the whole page (blocks
//! included) lives in the front matter and the Markdown body is empty.
//!
//! ```text
//! ---
//! title: Home
//! slug: /
//! blocks:
//! - type: hero
//!   id: block_1700000000000_ab12cd3ef
//!   heading: Welcome
//! ---
//! ```
//!
//! Parsing is lenient about *absent* fields (they are defaulted) and strict about a header that
//! cannot be decoded at all.

pub mod markdown;
pub mod page;

pub use cms_blocks::{Block, BlockType, PageBlock};
pub use page::{PageContent, PageMetadata};

/// Errors returned by the `cms-codec` crate.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("invalid YAML front matter: {0}")]
    InvalidYaml(#[from] serde_yaml::Error),

    #[error("unterminated YAML front matter (missing closing '---' line)")]
    UnterminatedFrontMatter,

    #[error("front matter must be a YAML mapping")]
    FrontMatterNotMapping,

    #[error("page front matter schema mismatch at {path}: {message}")]
    SchemaMismatch { path: String, message: String },

    #[error("failed to serialise page: {0}")]
    Serialization(serde_yaml::Error),
}

/// Type alias for Results that can fail with a [`CodecError`].
pub type CodecResult<T> = Result<T, CodecError>;

/// Serialise a page to Markdown with YAML front matter.
///
/// No validation is performed; malformed (raw) blocks are written back as they were read.
pub fn serialize_to_markdown(content: &PageContent) -> CodecResult<String> {
    markdown::write_markdown(content)
}

/// Parse a page from Markdown with YAML front matter.
///
/// The Markdown body is ignored. Missing `title`, `slug` and `blocks` are defaulted to
/// `"Untitled"`, `"/"` and an empty list; `description` and `metadata` stay absent.
pub fn parse_markdown(input: &str) -> CodecResult<PageContent> {
    markdown::read_markdown(input)
}

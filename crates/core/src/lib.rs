//! # CMS Core
//!
//! Core business logic for the git-backed CMS.
//!
//! This crate contains storage and page operations:
//! - content stores: a local git repository per site, or an in-memory store
//! - the page service (load, list, find by slug, save, delete, duplicate slug report)
//! - the page editing session
//! - HTML rendering of blocks
//!
//! **No API concerns**: authentication and HTTP belong in `api-shared` and `api-rest`. Page
//! file parsing and writing live in `cms-codec`.

pub mod author;
pub mod config;
pub mod constants;
pub mod editor;
pub mod error;
pub mod pages;
pub mod render;
pub mod store;

pub use author::CommitAuthor;
pub use config::CoreConfig;
pub use editor::{MoveDirection, PageEditor};
pub use error::{CmsError, CmsResult};
pub use pages::{LoadedPage, PageService, PageSummary, SlugConflict};
pub use render::{render_block, render_page};
pub use store::{
    CommitMessage, ContentStore, DirEntry, EntryKind, GitContentStore, GitWorkspace,
    MemoryContentStore, MemoryWorkspace, RepoEntry, RepositoryHost, Revision, StoredFile,
};

pub use cms_blocks::{create_default_block, generate_block_id, Block, BlockType, PageBlock};
pub use cms_codec::{parse_markdown, serialize_to_markdown, PageContent, PageMetadata};
pub use cms_types::{NonEmptyText, Slug};

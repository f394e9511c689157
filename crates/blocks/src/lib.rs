//! Content block schema for git CMS pages.
//!
//! A page is an ordered list of *blocks*. Each block is one of a closed set of variants
//! (`hero`, `banner`, `usp`, `video`, `image`, `text`) discriminated by its `type` tag and
//! identified by a caller-assigned `id`.
//!
//! This crate owns:
//! - the typed block model ([`Block`] and the per-variant structs),
//! - [`PageBlock`], which also carries block records that do not fit any variant so that page
//!   files round-trip losslessly,
//! - the default-block factory ([`create_default_block`]),
//! - block id generation ([`generate_block_id`]),
//! - the minimal structural gate ([`validate_block`]).
//!
//! It has no knowledge of files, front matter or storage. See `cms-codec` for the page document
//! format.

pub mod block;
pub mod factory;
pub mod id;
pub mod validation;

pub use block::{
    BannerBlock, BannerVariant, Block, BlockType, HeroBlock, ImageBlock, PageBlock, TextBlock,
    TextVariant, UspBlock, UspItem, VideoBlock,
};
pub use factory::create_default_block;
pub use id::{generate_block_id, is_generated_block_id};
pub use validation::validate_block;

/// Errors returned by the `cms-blocks` crate.
#[derive(Debug, thiserror::Error)]
pub enum BlockError {
    #[error("unknown block type: '{0}'")]
    UnknownVariant(String),
}

/// Type alias for Results that can fail with a [`BlockError`].
pub type BlockResult<T> = Result<T, BlockError>;

//! Default block construction.
//!
//! New blocks are created with placeholder values in every required field so that they render
//! meaningfully before a user edits them.

use crate::block::{
    BannerBlock, BannerVariant, Block, BlockType, HeroBlock, ImageBlock, TextBlock, TextVariant,
    UspBlock, UspItem, VideoBlock,
};
use crate::BlockResult;

/// Placeholder source for new video blocks.
pub const PLACEHOLDER_VIDEO_URL: &str = "https://example.com/video.mp4";

/// Placeholder source for new image blocks.
pub const PLACEHOLDER_IMAGE_URL: &str = "https://example.com/image.jpg";

/// Create a default block for a variant tag.
///
/// `id` is used verbatim: uniqueness is neither generated nor checked here, and two blocks with
/// the same id are allowed.
///
/// # Errors
///
/// Returns [`crate::BlockError::UnknownVariant`] if `tag` is not one of the six block types.
pub fn create_default_block(tag: &str, id: impl Into<String>) -> BlockResult<Block> {
    let block_type = tag.parse::<BlockType>()?;
    Ok(Block::new_default(block_type, id))
}

impl Block {
    /// Typed counterpart of [`create_default_block`]; cannot fail.
    pub fn new_default(block_type: BlockType, id: impl Into<String>) -> Self {
        let id = id.into();

        match block_type {
            BlockType::Hero => Self::Hero(HeroBlock {
                id,
                heading: "New Hero Section".into(),
                subheading: Some("Add your subheading here".into()),
                cta_text: None,
                cta_url: None,
                background_image: None,
            }),
            BlockType::Banner => Self::Banner(BannerBlock {
                id,
                text: "Important announcement".into(),
                variant: BannerVariant::Info,
                dismissible: None,
            }),
            BlockType::Usp => Self::Usp(UspBlock {
                id,
                title: Some("Why Choose Us".into()),
                items: vec![
                    UspItem::new("Fast", "Lightning quick performance"),
                    UspItem::new("Secure", "Enterprise-grade security"),
                    UspItem::new("Scalable", "Grows with your needs"),
                ],
            }),
            BlockType::Video => Self::Video(VideoBlock {
                id,
                url: PLACEHOLDER_VIDEO_URL.into(),
                title: Some("Video Title".into()),
                description: None,
                autoplay: None,
            }),
            BlockType::Image => Self::Image(ImageBlock {
                id,
                url: PLACEHOLDER_IMAGE_URL.into(),
                alt: "Image description".into(),
                caption: None,
                width: None,
                height: None,
            }),
            BlockType::Text => Self::Text(TextBlock {
                id,
                content: "Start writing your content here...".into(),
                variant: Some(TextVariant::Prose),
            }),
        }
    }
}

//! In-memory editing session for one page.

use crate::error::{CmsError, CmsResult};
use crate::pages::LoadedPage;
use crate::store::Revision;
use cms_blocks::{generate_block_id, Block, BlockType, PageBlock};
use cms_codec::PageContent;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveDirection {
    Up,
    Down,
}

/// A page being edited, plus the path and revision it was loaded from.
///
/// Edits only touch memory; nothing is written until the session is saved through
/// [`crate::PageService::save`].
#[derive(Clone, Debug)]
pub struct PageEditor {
    content: PageContent,
    path: Option<String>,
    revision: Option<Revision>,
}

impl Default for PageEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl PageEditor {
    /// Start a new, unsaved page ("New Page" at `/new-page`, no blocks).
    pub fn new() -> Self {
        Self {
            content: PageContent::new_page(),
            path: None,
            revision: None,
        }
    }

    pub fn open(page: LoadedPage) -> Self {
        Self {
            content: page.content,
            path: Some(page.path),
            revision: Some(page.revision),
        }
    }

    pub fn content(&self) -> &PageContent {
        &self.content
    }

    pub fn into_content(self) -> PageContent {
        self.content
    }

    /// True until the page has been saved once.
    pub fn is_new(&self) -> bool {
        self.path.is_none()
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    pub fn revision(&self) -> Option<&Revision> {
        self.revision.as_ref()
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.content.title = title.into();
    }

    pub fn set_slug(&mut self, slug: impl Into<String>) {
        self.content.slug = slug.into();
    }

    pub fn set_description(&mut self, description: Option<String>) {
        self.content.description = description;
    }

    /// Append a default block of `block_type` with a freshly generated id.
    pub fn add_block(&mut self, block_type: BlockType) -> &PageBlock {
        let block = Block::new_default(block_type, generate_block_id());
        self.push_block(block.into())
    }

    pub fn push_block(&mut self, block: PageBlock) -> &PageBlock {
        self.content.blocks.push(block);
        let last = self.content.blocks.len() - 1;
        &self.content.blocks[last]
    }

    /// Replace the block at `index` with an edited copy. The block id cannot change.
    pub fn update_block(&mut self, index: usize, block: PageBlock) -> CmsResult<()> {
        let slot = self
            .content
            .blocks
            .get_mut(index)
            .ok_or_else(|| out_of_range(index))?;
        if slot.id() != block.id() {
            return Err(CmsError::InvalidInput(format!(
                "block {index} has id {:?}; an update cannot change it to {:?}",
                slot.id().unwrap_or_default(),
                block.id().unwrap_or_default()
            )));
        }
        *slot = block;
        Ok(())
    }

    pub fn remove_block(&mut self, index: usize) -> CmsResult<PageBlock> {
        if index >= self.content.blocks.len() {
            return Err(out_of_range(index));
        }
        Ok(self.content.blocks.remove(index))
    }

    /// Swap the block at `index` with its neighbour. Returns false (and changes nothing) when
    /// the block is already first (`Up`) or last (`Down`).
    pub fn move_block(&mut self, index: usize, direction: MoveDirection) -> CmsResult<bool> {
        let len = self.content.blocks.len();
        if index >= len {
            return Err(out_of_range(index));
        }

        let target = match direction {
            MoveDirection::Up if index == 0 => return Ok(false),
            MoveDirection::Up => index - 1,
            MoveDirection::Down if index + 1 == len => return Ok(false),
            MoveDirection::Down => index + 1,
        };
        self.content.blocks.swap(index, target);
        Ok(true)
    }

    pub(crate) fn mark_saved(&mut self, path: String, revision: Revision) {
        self.path = Some(path);
        self.revision = Some(revision);
    }
}

fn out_of_range(index: usize) -> CmsError {
    CmsError::InvalidInput(format!("block index {index} is out of range"))
}

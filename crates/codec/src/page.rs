//! Page envelope.

use cms_blocks::PageBlock;
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};

/// Title used when a page file has no (or an empty) `title`.
pub const DEFAULT_TITLE: &str = "Untitled";

/// Slug used when a page file has no (or an empty) `slug`.
pub const DEFAULT_SLUG: &str = "/";

/// Title of a page started in the editor and not yet saved.
pub const NEW_PAGE_TITLE: &str = "New Page";

/// Slug of a page started in the editor and not yet saved.
pub const NEW_PAGE_SLUG: &str = "/new-page";

/// A page document: envelope fields plus an ordered list of blocks.
///
/// Block order is meaningful and is preserved exactly through serialisation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PageContent {
    pub title: String,
    /// "/"-rooted public address. Not the file name.
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub blocks: Vec<PageBlock>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<PageMetadata>,
}

impl PageContent {
    pub fn new(title: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            slug: slug.into(),
            description: None,
            blocks: Vec::new(),
            metadata: None,
        }
    }

    /// A fresh, unsaved page as the editor starts it.
    pub fn new_page() -> Self {
        Self::new(NEW_PAGE_TITLE, NEW_PAGE_SLUG)
    }

    /// Index of the first block with `id`.
    pub fn position_of(&self, id: &str) -> Option<usize> {
        self.blocks.iter().position(|b| b.id() == Some(id))
    }
}

/// Page metadata (`createdAt`, `updatedAt`, `author`, and anything else a producer wrote).
///
/// Opaque to the codec: the mapping is carried through unchanged, including unknown keys and
/// values that are not strings.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageMetadata(Mapping);

impl PageMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn created_at(&self) -> Option<&str> {
        self.get_str("createdAt")
    }

    pub fn updated_at(&self) -> Option<&str> {
        self.get_str("updatedAt")
    }

    pub fn author(&self) -> Option<&str> {
        self.get_str("author")
    }

    pub fn set_created_at(&mut self, value: impl Into<String>) {
        self.insert("createdAt", Value::String(value.into()));
    }

    pub fn set_updated_at(&mut self, value: impl Into<String>) {
        self.insert("updatedAt", Value::String(value.into()));
    }

    pub fn set_author(&mut self, value: impl Into<String>) {
        self.insert("author", Value::String(value.into()));
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn insert(&mut self, key: &str, value: Value) {
        self.0.insert(Value::String(key.to_string()), value);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }
}

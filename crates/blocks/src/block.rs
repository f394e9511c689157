//! Block variants (wire model).
//!
//! Field names follow the page file format: camelCase keys, a `type` tag, and optional fields
//! omitted when absent. Every variant struct uses `deny_unknown_fields` so that a typed block
//! only ever carries its own fields; anything else is kept as [`PageBlock::Raw`].

use crate::validation::validate_block;
use crate::BlockError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The closed set of block variant tags.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockType {
    Hero,
    Banner,
    Usp,
    Video,
    Image,
    Text,
}

impl BlockType {
    /// All variants, in the order the editor offers them.
    pub const ALL: [BlockType; 6] = [
        Self::Hero,
        Self::Banner,
        Self::Usp,
        Self::Video,
        Self::Image,
        Self::Text,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Hero => "hero",
            Self::Banner => "banner",
            Self::Usp => "usp",
            Self::Video => "video",
            Self::Image => "image",
            Self::Text => "text",
        }
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BlockType {
    type Err = BlockError;

    /// Parses a block tag. Matching is exact (`"Hero"` is not `hero`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| BlockError::UnknownVariant(s.to_string()))
    }
}

/// Large introductory section with a heading and optional call to action.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct HeroBlock {
    pub id: String,
    pub heading: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subheading: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cta_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cta_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_image: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BannerVariant {
    Info,
    Warning,
    Success,
}

impl BannerVariant {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Success => "success",
        }
    }
}

/// Single-line announcement strip.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct BannerBlock {
    pub id: String,
    pub text: String,
    pub variant: BannerVariant,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dismissible: Option<bool>,
}

/// One selling point inside a [`UspBlock`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UspItem {
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl UspItem {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            icon: None,
        }
    }
}

/// Ordered list of unique selling points.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UspBlock {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub items: Vec<UspItem>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct VideoBlock {
    pub id: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub autoplay: Option<bool>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ImageBlock {
    pub id: String,
    pub url: String,
    pub alt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    /// Any YAML number; kept as written so `640` and `1.5` both survive a save.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<serde_yaml::Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<serde_yaml::Number>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextVariant {
    Prose,
    Heading,
    Paragraph,
}

impl TextVariant {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Prose => "prose",
            Self::Heading => "heading",
            Self::Paragraph => "paragraph",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TextBlock {
    pub id: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<TextVariant>,
}

/// A typed content block, tagged by `type` on the wire.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Block {
    Hero(HeroBlock),
    Banner(BannerBlock),
    Usp(UspBlock),
    Video(VideoBlock),
    Image(ImageBlock),
    Text(TextBlock),
}

impl Block {
    /// The block's id. Assigned once at creation; there is no setter.
    pub fn id(&self) -> &str {
        match self {
            Self::Hero(b) => &b.id,
            Self::Banner(b) => &b.id,
            Self::Usp(b) => &b.id,
            Self::Video(b) => &b.id,
            Self::Image(b) => &b.id,
            Self::Text(b) => &b.id,
        }
    }

    pub fn block_type(&self) -> BlockType {
        match self {
            Self::Hero(_) => BlockType::Hero,
            Self::Banner(_) => BlockType::Banner,
            Self::Usp(_) => BlockType::Usp,
            Self::Video(_) => BlockType::Video,
            Self::Image(_) => BlockType::Image,
            Self::Text(_) => BlockType::Text,
        }
    }

    /// Names of required fields that hold an empty string (or, for `usp`, an empty item list).
    ///
    /// Typed blocks always *have* their required fields; this reports the ones a user has
    /// blanked out. Field names are reported in their wire form.
    pub fn empty_required_fields(&self) -> Vec<&'static str> {
        let mut empty = Vec::new();
        let mut check = |name: &'static str, value: &str| {
            if value.trim().is_empty() {
                empty.push(name);
            }
        };

        match self {
            Self::Hero(b) => check("heading", &b.heading),
            Self::Banner(b) => check("text", &b.text),
            Self::Usp(b) => {
                if b.items.is_empty() {
                    empty.push("items");
                }
            }
            Self::Video(b) => check("url", &b.url),
            Self::Image(b) => {
                check("url", &b.url);
                check("alt", &b.alt);
            }
            Self::Text(b) => check("content", &b.content),
        }

        empty
    }
}

/// A block as stored in a page: either a typed [`Block`] or a record that did not match any
/// variant exactly, kept verbatim.
///
/// `Raw` covers unknown `type` tags, records missing a required field, records with fields from
/// another variant and records with wrongly-typed values. It is written back unchanged on save.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PageBlock {
    Typed(Block),
    Raw(serde_yaml::Value),
}

impl PageBlock {
    /// The block id, if present as a string.
    pub fn id(&self) -> Option<&str> {
        match self {
            Self::Typed(block) => Some(block.id()),
            Self::Raw(value) => value.get("id").and_then(serde_yaml::Value::as_str),
        }
    }

    /// The `type` tag, if present as a string. Raw blocks may carry tags outside the closed set.
    pub fn type_tag(&self) -> Option<&str> {
        match self {
            Self::Typed(block) => Some(block.block_type().as_str()),
            Self::Raw(value) => value.get("type").and_then(serde_yaml::Value::as_str),
        }
    }

    pub fn as_block(&self) -> Option<&Block> {
        match self {
            Self::Typed(block) => Some(block),
            Self::Raw(_) => None,
        }
    }

    /// Applies the minimal structural gate (non-empty `id` and `type`) to either form.
    pub fn is_structurally_valid(&self) -> bool {
        match self {
            Self::Typed(block) => !block.id().is_empty(),
            Self::Raw(value) => validate_block(value),
        }
    }
}

impl From<Block> for PageBlock {
    fn from(block: Block) -> Self {
        Self::Typed(block)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_type_parses_known_tags() {
        for block_type in BlockType::ALL {
            assert_eq!(block_type.as_str().parse::<BlockType>().unwrap(), block_type);
        }
    }

    #[test]
    fn block_type_rejects_unknown_and_case_variants() {
        assert!(matches!(
            "bogus".parse::<BlockType>(),
            Err(BlockError::UnknownVariant(tag)) if tag == "bogus"
        ));
        assert!("Hero".parse::<BlockType>().is_err());
    }

    #[test]
    fn hero_serialises_with_type_tag_and_camel_case() {
        let block = Block::Hero(HeroBlock {
            id: "h1".into(),
            heading: "Welcome".into(),
            subheading: None,
            cta_text: Some("Go".into()),
            cta_url: None,
            background_image: None,
        });

        let yaml = serde_yaml::to_string(&block).unwrap();
        assert!(yaml.contains("type: hero"));
        assert!(yaml.contains("ctaText: Go"));
        assert!(!yaml.contains("subheading"));
    }

    #[test]
    fn typed_block_deserialises_from_record() {
        let yaml = "id: b1\ntype: banner\ntext: Sale\nvariant: warning\ndismissible: true\n";
        let block: PageBlock = serde_yaml::from_str(yaml).unwrap();

        match block {
            PageBlock::Typed(Block::Banner(banner)) => {
                assert_eq!(banner.variant, BannerVariant::Warning);
                assert_eq!(banner.dismissible, Some(true));
            }
            other => panic!("expected banner, got {other:?}"),
        }
    }

    #[test]
    fn cross_variant_fields_fall_back_to_raw() {
        let yaml = "id: b1\ntype: hero\nheading: Hi\ntext: leaked\n";
        let block: PageBlock = serde_yaml::from_str(yaml).unwrap();
        assert!(matches!(block, PageBlock::Raw(_)));
        assert_eq!(block.type_tag(), Some("hero"));
        assert_eq!(block.id(), Some("b1"));
    }

    #[test]
    fn missing_required_field_falls_back_to_raw() {
        let block: PageBlock = serde_yaml::from_str("id: '1'\ntype: hero\n").unwrap();
        assert!(matches!(block, PageBlock::Raw(_)));
        assert!(block.is_structurally_valid());
    }

    #[test]
    fn unknown_tag_is_kept_as_raw() {
        let block: PageBlock =
            serde_yaml::from_str("id: c1\ntype: carousel\nslides: [a, b]\n").unwrap();
        assert!(block.as_block().is_none());
        assert_eq!(block.type_tag(), Some("carousel"));
    }

    #[test]
    fn empty_required_fields_reports_blank_values() {
        let block = Block::Image(ImageBlock {
            id: "i1".into(),
            url: String::new(),
            alt: "Alt".into(),
            caption: None,
            width: Some(640.into()),
            height: None,
        });
        assert_eq!(block.empty_required_fields(), vec!["url"]);
    }

    #[test]
    fn image_dimensions_accept_fractional_numbers() {
        let block: PageBlock =
            serde_yaml::from_str("id: i
type: image
url: u
alt: a
width: 1.5
height: 300
")
                .unwrap();
        let Some(Block::Image(image)) = block.as_block() else {
            panic!("expected a typed image block, got {block:?}");
        };
        assert_eq!(image.width.as_ref().and_then(|n| n.as_f64()), Some(1.5));
        assert_eq!(image.height.as_ref().and_then(|n| n.as_u64()), Some(300));
    }
}

//! Page files: Markdown with YAML front matter.
//!
//! The whole page lives in the front matter. The body after the closing `---` is written empty
//! and ignored on read.

use crate::page::{PageContent, PageMetadata, DEFAULT_SLUG, DEFAULT_TITLE};
use crate::{CodecError, CodecResult};
use cms_blocks::PageBlock;
use serde::{Deserialize, Deserializer, Serialize};
use serde_yaml::Value;

const DELIMITER: &str = "---";

/// Front matter as written. Field order here is the key order in the file.
#[derive(Serialize)]
struct PageFrontMatterOut<'a> {
    title: &'a str,
    slug: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    blocks: &'a [PageBlock],
    #[serde(skip_serializing_if = "Option::is_none")]
    metadata: Option<&'a PageMetadata>,
}

/// Front matter as read. Every field may be absent; unknown top-level keys are ignored.
#[derive(Debug, Default, Deserialize)]
struct PageFrontMatterIn {
    #[serde(default, deserialize_with = "lenient_text")]
    title: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    slug: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    description: Option<String>,
    #[serde(default)]
    blocks: Option<Vec<PageBlock>>,
    #[serde(default)]
    metadata: Option<PageMetadata>,
}

impl PageFrontMatterIn {
    fn into_page(self) -> PageContent {
        PageContent {
            title: non_empty_or(self.title, DEFAULT_TITLE),
            slug: non_empty_or(self.slug, DEFAULT_SLUG),
            description: self.description,
            blocks: self.blocks.unwrap_or_default(),
            metadata: self.metadata,
        }
    }
}

fn non_empty_or(value: Option<String>, default: &str) -> String {
    value
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// Accepts strings, plus numbers and booleans in their text form (`title: 2024`).
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(_) => Err(serde::de::Error::custom("expected a string")),
    }
}

/// Write a page to Markdown with YAML front matter.
pub(crate) fn write_markdown(content: &PageContent) -> CodecResult<String> {
    let front_matter = PageFrontMatterOut {
        title: &content.title,
        slug: &content.slug,
        description: content.description.as_deref(),
        blocks: &content.blocks,
        metadata: content.metadata.as_ref(),
    };

    let mut out = String::new();
    out.push_str(DELIMITER);
    out.push('\n');
    let yaml = serde_yaml::to_string(&front_matter).map_err(CodecError::Serialization)?;
    out.push_str(&yaml);
    if !yaml.ends_with('\n') {
        out.push('\n');
    }
    out.push_str(DELIMITER);
    out.push('\n');
    Ok(out)
}

/// Read a page from Markdown with YAML front matter.
pub(crate) fn read_markdown(input: &str) -> CodecResult<PageContent> {
    let input = input.strip_prefix('\u{feff}').unwrap_or(input);

    let Some((front_matter, _body)) = split_yaml_front_matter(input)? else {
        return Ok(PageFrontMatterIn::default().into_page());
    };

    if front_matter.trim().is_empty() {
        return Ok(PageFrontMatterIn::default().into_page());
    }

    let yaml_value: Value = serde_yaml::from_str(front_matter)?;
    let wire = match yaml_value {
        Value::Null => PageFrontMatterIn::default(),
        Value::Mapping(_) => decode_front_matter(yaml_value)?,
        _ => return Err(CodecError::FrontMatterNotMapping),
    };

    Ok(wire.into_page())
}

/// Decode the front matter mapping, reporting the path of the first field with the wrong shape.
fn decode_front_matter(value: Value) -> CodecResult<PageFrontMatterIn> {
    match serde_path_to_error::deserialize::<_, PageFrontMatterIn>(value) {
        Ok(wire) => Ok(wire),
        Err(err) => {
            let path = err.path().to_string();
            let path = if path.is_empty() || path == "." {
                "<root>".to_string()
            } else {
                path
            };
            Err(CodecError::SchemaMismatch {
                path,
                message: err.into_inner().to_string(),
            })
        }
    }
}

/// Split `input` into front matter and body.
///
/// Returns `Ok(None)` when the first line is not `---` (the document has no header).
fn split_yaml_front_matter(input: &str) -> CodecResult<Option<(&str, &str)>> {
    let mut chunks = input.split_inclusive('\n');

    let Some(first) = chunks.next() else {
        return Ok(None);
    };
    if first.trim_end() != DELIMITER {
        return Ok(None);
    }

    let mut offset = first.len();

    // Find closing delimiter line and return slices into the original input.
    for chunk in chunks {
        if chunk.trim_end() == DELIMITER {
            let front = &input[first.len()..offset];
            let body = &input[offset + chunk.len()..];
            return Ok(Some((front, body)));
        }
        offset += chunk.len();
    }

    Err(CodecError::UnterminatedFrontMatter)
}

//! HTML rendering of page blocks.
//!
//! Rendering is a total function: every block produces markup, and records that are not a known
//! block variant produce a visible placeholder instead of an error.

use cms_blocks::{
    BannerBlock, Block, HeroBlock, ImageBlock, PageBlock, TextBlock, TextVariant, UspBlock,
    VideoBlock,
};
use cms_codec::PageContent;
use html_escape::{encode_double_quoted_attribute as attr, encode_text as text};
use std::fmt::Write as _;

/// Render every block of a page, in order, inside a `<main>` element.
pub fn render_page(page: &PageContent) -> String {
    let mut out = format!("<main class=\"page\" data-slug=\"{}\">\n", attr(&page.slug));
    for block in &page.blocks {
        out.push_str(&render_block(block));
        out.push('\n');
    }
    out.push_str("</main>");
    out
}

pub fn render_block(block: &PageBlock) -> String {
    match block {
        PageBlock::Typed(Block::Hero(b)) => render_hero(b),
        PageBlock::Typed(Block::Banner(b)) => render_banner(b),
        PageBlock::Typed(Block::Usp(b)) => render_usp(b),
        PageBlock::Typed(Block::Video(b)) => render_video(b),
        PageBlock::Typed(Block::Image(b)) => render_image(b),
        PageBlock::Typed(Block::Text(b)) => render_text(b),
        PageBlock::Raw(_) => {
            let tag = block.type_tag().unwrap_or("unknown");
            tracing::warn!(
                block_id = block.id().unwrap_or(""),
                "unsupported block type: {tag}"
            );
            format!(
                "<div class=\"block-unsupported\">Unsupported block type: {}</div>",
                text(tag)
            )
        }
    }
}

fn render_hero(b: &HeroBlock) -> String {
    let mut out = format!("<section class=\"block-hero\" id=\"{}\"", attr(&b.id));
    if let Some(image) = &b.background_image {
        let _ = write!(out, " data-background-image=\"{}\"", attr(image));
    }
    out.push('>');
    let _ = write!(out, "<h1>{}</h1>", text(&b.heading));
    if let Some(sub) = &b.subheading {
        let _ = write!(out, "<p class=\"subheading\">{}</p>", text(sub));
    }
    if let (Some(label), Some(url)) = (&b.cta_text, &b.cta_url) {
        let _ = write!(
            out,
            "<a class=\"cta\" href=\"{}\">{}</a>",
            attr(url),
            text(label)
        );
    }
    out.push_str("</section>");
    out
}

fn render_banner(b: &BannerBlock) -> String {
    let mut out = format!(
        "<div class=\"block-banner block-banner-{}\" id=\"{}\" role=\"status\">{}",
        b.variant.as_str(),
        attr(&b.id),
        text(&b.text)
    );
    if b.dismissible == Some(true) {
        out.push_str("<button class=\"banner-dismiss\" aria-label=\"Dismiss\">&times;</button>");
    }
    out.push_str("</div>");
    out
}

fn render_usp(b: &UspBlock) -> String {
    let mut out = format!("<section class=\"block-usp\" id=\"{}\">", attr(&b.id));
    if let Some(title) = &b.title {
        let _ = write!(out, "<h2>{}</h2>", text(title));
    }
    out.push_str("<ul>");
    for item in &b.items {
        out.push_str("<li>");
        if let Some(icon) = &item.icon {
            let _ = write!(out, "<span class=\"usp-icon\">{}</span>", text(icon));
        }
        let _ = write!(
            out,
            "<h3>{}</h3><p>{}</p></li>",
            text(&item.title),
            text(&item.description)
        );
    }
    out.push_str("</ul></section>");
    out
}

fn render_video(b: &VideoBlock) -> String {
    let mut out = format!(
        "<figure class=\"block-video\" id=\"{}\"><video src=\"{}\" controls",
        attr(&b.id),
        attr(&b.url)
    );
    if b.autoplay == Some(true) {
        out.push_str(" autoplay muted");
    }
    out.push_str("></video>");
    if b.title.is_some() || b.description.is_some() {
        out.push_str("<figcaption>");
        if let Some(title) = &b.title {
            let _ = write!(out, "<strong>{}</strong>", text(title));
        }
        if let Some(description) = &b.description {
            let _ = write!(out, "<p>{}</p>", text(description));
        }
        out.push_str("</figcaption>");
    }
    out.push_str("</figure>");
    out
}

fn render_image(b: &ImageBlock) -> String {
    let mut out = format!(
        "<figure class=\"block-image\" id=\"{}\"><img src=\"{}\" alt=\"{}\"",
        attr(&b.id),
        attr(&b.url),
        attr(&b.alt)
    );
    if let Some(width) = &b.width {
        let _ = write!(out, " width=\"{width}\"");
    }
    if let Some(height) = &b.height {
        let _ = write!(out, " height=\"{height}\"");
    }
    out.push('>');
    if let Some(caption) = &b.caption {
        let _ = write!(out, "<figcaption>{}</figcaption>", text(caption));
    }
    out.push_str("</figure>");
    out
}

fn render_text(b: &TextBlock) -> String {
    let id = attr(&b.id);
    match b.variant.unwrap_or(TextVariant::Prose) {
        TextVariant::Heading => {
            format!("<h2 class=\"block-text\" id=\"{id}\">{}</h2>", text(&b.content))
        }
        TextVariant::Paragraph => {
            format!("<p class=\"block-text\" id=\"{id}\">{}</p>", text(&b.content))
        }
        TextVariant::Prose => {
            // Blank lines separate paragraphs.
            let mut out = format!("<div class=\"block-text prose\" id=\"{id}\">");
            for para in b
                .content
                .split("\n\n")
                .map(str::trim)
                .filter(|p| !p.is_empty())
            {
                let _ = write!(out, "<p>{}</p>", text(para));
            }
            out.push_str("</div>");
            out
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cms_blocks::{BannerVariant, BlockType, UspItem};

    fn raw(yaml: &str) -> PageBlock {
        PageBlock::Raw(serde_yaml::from_str(yaml).unwrap())
    }

    #[test]
    fn hero_renders_heading_and_cta() {
        let block = Block::Hero(HeroBlock {
            id: "h1".into(),
            heading: "Welcome".into(),
            subheading: None,
            cta_text: Some("Start".into()),
            cta_url: Some("/start?a=1&b=2".into()),
            background_image: None,
        });

        let html = render_block(&block.into());
        assert!(html.contains("<h1>Welcome</h1>"));
        assert!(html.contains("href=\"/start?a=1&amp;b=2\""));
        assert!(!html.contains("subheading"));
    }

    #[test]
    fn text_is_escaped() {
        let block = Block::Text(TextBlock {
            id: "t".into(),
            content: "<script>alert(1)</script>".into(),
            variant: Some(TextVariant::Paragraph),
        });

        let html = render_block(&block.into());
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn image_dimensions_render_as_written() {
        let block: PageBlock =
            serde_yaml::from_str("{id: i, type: image, url: /a.png, alt: A, width: 1.5, height: 90}")
                .unwrap();

        let html = render_block(&block);
        assert!(html.contains("width=\"1.5\" height=\"90\""));
        assert!(!html.contains("Unsupported"));
    }

    #[test]
    fn prose_splits_paragraphs_on_blank_lines() {
        let block = Block::Text(TextBlock {
            id: "t".into(),
            content: "First.\n\nSecond.".into(),
            variant: None,
        });
        let html = render_block(&block.into());
        assert!(html.contains("<p>First.</p><p>Second.</p>"));
    }

    #[test]
    fn banner_variant_becomes_class() {
        let block = Block::Banner(BannerBlock {
            id: "b".into(),
            text: "Sale".into(),
            variant: BannerVariant::Warning,
            dismissible: Some(true),
        });
        let html = render_block(&block.into());
        assert!(html.contains("block-banner-warning"));
        assert!(html.contains("banner-dismiss"));
    }

    #[test]
    fn usp_items_render_in_order() {
        let block = Block::Usp(UspBlock {
            id: "u".into(),
            title: None,
            items: vec![UspItem::new("One", "1"), UspItem::new("Two", "2")],
        });
        let html = render_block(&block.into());
        let one = html.find("<h3>One</h3>").unwrap();
        let two = html.find("<h3>Two</h3>").unwrap();
        assert!(one < two);
    }

    #[test]
    fn unknown_block_renders_placeholder() {
        let html = render_block(&raw("{id: c1, type: carousel}"));
        assert_eq!(
            html,
            "<div class=\"block-unsupported\">Unsupported block type: carousel</div>"
        );
    }

    #[test]
    fn block_without_type_renders_placeholder() {
        let html = render_block(&raw("{id: c1}"));
        assert!(html.contains("Unsupported block type: unknown"));
    }

    #[test]
    fn every_default_block_renders() {
        for block_type in BlockType::ALL {
            let html = render_block(&Block::new_default(block_type, "x").into());
            assert!(!html.is_empty());
            assert!(!html.contains("block-unsupported"), "{block_type}");
        }
    }

    #[test]
    fn page_wraps_blocks_in_order() {
        let mut page = PageContent::new("Home", "/");
        page.blocks.push(Block::new_default(BlockType::Hero, "a").into());
        page.blocks.push(raw("{id: z, type: map}"));

        let html = render_page(&page);
        assert!(html.starts_with("<main class=\"page\" data-slug=\"/\">"));
        assert!(html.find("block-hero").unwrap() < html.find("block-unsupported").unwrap());
        assert!(html.ends_with("</main>"));
    }
}

use crate::block::{Block, BlockData, Document, ListStyle};
use serde_json::Value as JsonValue;

const BLOCK_SEPARATOR: &str = "\n\n";

/// Serializes a document to markdown.
pub fn serialize_document(document: &Document) -> String {
    join_units(document.blocks.iter().map(|block| block_to_markdown(&block.data)))
}

/// Short alias for [`serialize_document`].
pub fn serialize(document: &Document) -> String {
    serialize_document(document)
}

/// Serializes an untyped editor payload.
///
/// `null`, non-objects and payloads without a `blocks` array produce an empty
/// string. Blocks are decoded one at a time so a single bad entry cannot
/// drop the rest of the document.
pub fn serialize_json(payload: &JsonValue) -> String {
    let Some(blocks) = payload.get("blocks").and_then(JsonValue::as_array) else {
        return String::new();
    };
    join_units(blocks.iter().map(|raw| {
        match serde_json::from_value::<Block>(raw.clone()) {
            Ok(block) => block_to_markdown(&block.data),
            Err(err) => {
                log::debug!("serializing malformed block by its text: {err}");
                text_field(raw.get("data"))
            }
        }
    }))
}

fn join_units(units: impl Iterator<Item = String>) -> String {
    units.collect::<Vec<_>>().join(BLOCK_SEPARATOR)
}

/// Renders one block payload as a markdown unit (no surrounding blank lines).
pub fn block_to_markdown(data: &BlockData) -> String {
    match data {
        BlockData::Heading(heading) => {
            let heading = heading.clone().clamped();
            format!("{} {}", "#".repeat(heading.level as usize), heading.text)
        }
        BlockData::Paragraph(paragraph) => paragraph.text.clone(),
        BlockData::List(list) => list
            .items
            .iter()
            .enumerate()
            .map(|(index, item)| match list.style {
                ListStyle::Ordered => format!("{}. {item}", index + 1),
                ListStyle::Unordered => format!("- {item}"),
            })
            .collect::<Vec<_>>()
            .join("\n"),
        BlockData::Quote(quote) => quote
            .text
            .split('\n')
            .map(|line| format!("> {line}"))
            .collect::<Vec<_>>()
            .join("\n"),
        BlockData::Code(code) => format!(
            "```{}\n{}\n```",
            code.language.as_deref().unwrap_or(""),
            code.code
        ),
        BlockData::Delimiter => "---".to_string(),
        BlockData::Link(link) => {
            let title = link
                .meta
                .as_ref()
                .and_then(|meta| meta.title.as_deref())
                .filter(|title| !title.is_empty())
                .unwrap_or(&link.link);
            format!("[{title}]({})", link.link)
        }
        BlockData::Image(image) => format!(
            "![{}]({})",
            image.caption.as_deref().unwrap_or(""),
            image.resolved_url()
        ),
        BlockData::Embed(embed) => embed
            .source
            .as_deref()
            .filter(|source| !source.is_empty())
            .or(embed.embed.as_deref())
            .unwrap_or("")
            .to_string(),
        BlockData::Unknown { kind, data } => {
            log::debug!("serializing unknown block type `{kind}` by its text");
            text_field(Some(data))
        }
    }
}

fn text_field(data: Option<&JsonValue>) -> String {
    data.and_then(|data| data.get("text"))
        .and_then(JsonValue::as_str)
        .unwrap_or("")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::{Embed, Image, ImageFile, Link, LinkMeta};
    use serde_json::json;

    fn doc(blocks: Vec<BlockData>) -> Document {
        let blocks = blocks
            .into_iter()
            .enumerate()
            .map(|(index, data)| Block::new(index, data))
            .collect();
        Document::new(blocks, 0)
    }

    #[test]
    fn ordered_list_numbers_from_one() {
        let document = doc(vec![BlockData::list(
            ListStyle::Ordered,
            vec!["x".into(), "y".into()],
        )]);
        assert_eq!(serialize_document(&document), "1. x\n2. y");
    }

    #[test]
    fn units_are_separated_by_one_blank_line() {
        let document = doc(vec![
            BlockData::heading("Title", 2),
            BlockData::paragraph("line one\nline two"),
            BlockData::Delimiter,
            BlockData::list(ListStyle::Unordered, vec!["a".into()]),
        ]);
        assert_eq!(
            serialize_document(&document),
            "## Title\n\nline one\nline two\n\n---\n\n- a"
        );
    }

    #[test]
    fn quote_prefixes_every_line() {
        assert_eq!(
            block_to_markdown(&BlockData::quote("one\n\ntwo")),
            "> one\n> \n> two"
        );
    }

    #[test]
    fn code_fence_with_and_without_language() {
        assert_eq!(
            block_to_markdown(&BlockData::code("let x = 1;", Some("rust"))),
            "```rust\nlet x = 1;\n```"
        );
        assert_eq!(
            block_to_markdown(&BlockData::code("plain", None)),
            "```\nplain\n```"
        );
    }

    #[test]
    fn heading_level_is_clamped() {
        let data = BlockData::Heading(crate::block::Heading {
            text: "Deep".into(),
            level: 12,
        });
        assert_eq!(block_to_markdown(&data), "###### Deep");
    }

    #[test]
    fn link_uses_title_or_url() {
        let titled = BlockData::Link(Link {
            link: "https://example.com".into(),
            meta: Some(LinkMeta {
                title: Some("Example".into()),
                ..Default::default()
            }),
        });
        assert_eq!(
            block_to_markdown(&titled),
            "[Example](https://example.com)"
        );

        let bare = BlockData::Link(Link {
            link: "https://example.com".into(),
            meta: None,
        });
        assert_eq!(
            block_to_markdown(&bare),
            "[https://example.com](https://example.com)"
        );
    }

    #[test]
    fn image_prefers_file_url_and_defaults_caption() {
        let image = BlockData::Image(Image {
            file: Some(ImageFile {
                url: "/img/a.png".into(),
            }),
            url: Some("/img/b.png".into()),
            caption: None,
        });
        assert_eq!(block_to_markdown(&image), "![](/img/a.png)");

        let by_url = BlockData::Image(Image {
            url: Some("/img/b.png".into()),
            caption: Some("Bee".into()),
            ..Default::default()
        });
        assert_eq!(block_to_markdown(&by_url), "![Bee](/img/b.png)");
    }

    #[test]
    fn embed_emits_source() {
        let embed = BlockData::Embed(Embed {
            service: Some("youtube".into()),
            source: Some("https://youtu.be/x".into()),
            embed: Some("https://www.youtube.com/embed/x".into()),
            caption: None,
        });
        assert_eq!(block_to_markdown(&embed), "https://youtu.be/x");
    }

    #[test]
    fn unknown_blocks_fall_back_to_text() {
        let payload = json!({
            "blocks": [
                { "id": "1", "type": "warning", "data": { "text": "careful" } },
                { "id": "2", "type": "table", "data": { "rows": [] } },
                { "id": "3", "type": "paragraph", "data": { "text": "end" } }
            ]
        });
        assert_eq!(serialize_json(&payload), "careful\n\n\n\nend");
    }

    #[test]
    fn missing_blocks_serialize_to_empty() {
        assert_eq!(serialize_json(&JsonValue::Null), "");
        assert_eq!(serialize_json(&json!({ "time": 1 })), "");
        assert_eq!(serialize_json(&json!("blocks")), "");
        assert_eq!(serialize_document(&doc(vec![])), "");
    }

    #[test]
    fn malformed_block_entries_do_not_abort() {
        let payload = json!({
            "blocks": [
                { "type": "header", "data": { "text": "Hi", "level": 1 } },
                "not an object",
                { "type": "list", "data": { "style": "sideways", "items": ["a"], "text": "fallback" } }
            ]
        });
        assert_eq!(serialize_json(&payload), "# Hi\n\n\n\nfallback");
    }
}

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value as JsonValue};
use std::time::{SystemTime, UNIX_EPOCH};

/// Schema tag attached to every document.
pub const DOCUMENT_VERSION: &str = "2.28.2";

/// Smallest heading level.
pub const MIN_HEADING_LEVEL: u8 = 1;
/// Largest heading level.
pub const MAX_HEADING_LEVEL: u8 = 6;

/// An ordered block sequence plus document metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Creation time in epoch milliseconds.
    #[serde(default)]
    pub time: i64,
    /// Blocks in document order.
    #[serde(default)]
    pub blocks: Vec<Block>,
    /// Schema version tag.
    #[serde(default = "default_version")]
    pub version: String,
}

fn default_version() -> String {
    DOCUMENT_VERSION.to_string()
}

impl Document {
    /// Creates a document from blocks with the given timestamp.
    pub fn new(blocks: Vec<Block>, time: i64) -> Self {
        Self {
            time,
            blocks,
            version: default_version(),
        }
    }

    /// Document offered for a slug that has no file yet.
    pub fn placeholder(slug: &str, time: i64) -> Self {
        let text = format!("Start writing your content for \"{slug}\"...");
        Self::new(vec![Block::new(0, BlockData::paragraph(text))], time)
    }

    /// Returns true when the document holds no blocks.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

/// Current wall clock in epoch milliseconds.
pub fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as i64)
        .unwrap_or(0)
}

/// A single editable unit of content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawBlock", into = "RawBlock")]
pub struct Block {
    /// Identifier unique within one document.
    pub id: String,
    /// Typed payload.
    pub data: BlockData,
}

impl Block {
    /// Creates a block with a `block_<n>` identifier.
    pub fn new(index: usize, data: BlockData) -> Self {
        Self {
            id: format!("block_{index}"),
            data,
        }
    }

    /// Wire name of the block type.
    pub fn type_name(&self) -> &str {
        self.data.type_name()
    }
}

/// Payload of a block, one variant per supported block type.
#[derive(Debug, Clone, PartialEq)]
pub enum BlockData {
    /// `# Title`
    Heading(Heading),
    /// Plain text run.
    Paragraph(Paragraph),
    /// Ordered or unordered list.
    List(List),
    /// Blockquote.
    Quote(Quote),
    /// Fenced code.
    Code(Code),
    /// Horizontal rule.
    Delimiter,
    /// Link card.
    Link(Link),
    /// Image.
    Image(Image),
    /// Embedded media.
    Embed(Embed),
    /// Any type the converter does not model.
    Unknown {
        /// Wire type name as received.
        kind: String,
        /// Raw `data` object as received.
        data: JsonValue,
    },
}

impl BlockData {
    /// Heading with its level clamped to 1..=6.
    pub fn heading(text: impl Into<String>, level: u8) -> Self {
        BlockData::Heading(Heading {
            text: text.into(),
            level,
        }
        .clamped())
    }

    /// Paragraph block.
    pub fn paragraph(text: impl Into<String>) -> Self {
        BlockData::Paragraph(Paragraph { text: text.into() })
    }

    /// List block.
    pub fn list(style: ListStyle, items: Vec<String>) -> Self {
        BlockData::List(List { style, items })
    }

    /// Quote block with an empty caption.
    pub fn quote(text: impl Into<String>) -> Self {
        BlockData::Quote(Quote {
            text: text.into(),
            caption: String::new(),
        })
    }

    /// Code block; an empty language is dropped.
    pub fn code(code: impl Into<String>, language: Option<&str>) -> Self {
        BlockData::Code(Code {
            code: code.into(),
            language: language
                .filter(|lang| !lang.is_empty())
                .map(str::to_string),
        })
    }

    /// Wire name of this block type.
    pub fn type_name(&self) -> &str {
        match self {
            BlockData::Heading(_) => "heading",
            BlockData::Paragraph(_) => "paragraph",
            BlockData::List(_) => "list",
            BlockData::Quote(_) => "quote",
            BlockData::Code(_) => "code",
            BlockData::Delimiter => "delimiter",
            BlockData::Link(_) => "link",
            BlockData::Image(_) => "image",
            BlockData::Embed(_) => "embed",
            BlockData::Unknown { kind, .. } => kind,
        }
    }

    /// Builds a payload from a wire type name and its `data` value.
    ///
    /// Payloads that do not match the expected shape of a known type are kept
    /// as [`BlockData::Unknown`].
    pub fn from_parts(kind: &str, data: JsonValue) -> Self {
        let payload = if data.is_null() {
            JsonValue::Object(Map::new())
        } else {
            data.clone()
        };

        let parsed = match kind {
            "heading" | "header" => {
                serde_json::from_value::<Heading>(payload).map(|h| BlockData::Heading(h.clamped()))
            }
            "paragraph" => serde_json::from_value(payload).map(BlockData::Paragraph),
            "list" => serde_json::from_value(payload).map(BlockData::List),
            "quote" => serde_json::from_value(payload).map(BlockData::Quote),
            "code" => serde_json::from_value(payload).map(BlockData::Code),
            "delimiter" => Ok(BlockData::Delimiter),
            "link" | "linkTool" => serde_json::from_value(payload).map(BlockData::Link),
            "image" => serde_json::from_value(payload).map(BlockData::Image),
            "embed" => serde_json::from_value(payload).map(BlockData::Embed),
            _ => {
                return BlockData::Unknown {
                    kind: kind.to_string(),
                    data,
                };
            }
        };

        parsed.unwrap_or_else(|err| {
            log::debug!("keeping malformed `{kind}` block as unknown: {err}");
            BlockData::Unknown {
                kind: kind.to_string(),
                data,
            }
        })
    }

    /// Splits the payload into its wire type name and `data` value.
    pub fn into_parts(self) -> (String, JsonValue) {
        let kind = self.type_name().to_string();
        let data = match self {
            BlockData::Heading(h) => to_json(&h),
            BlockData::Paragraph(p) => to_json(&p),
            BlockData::List(l) => to_json(&l),
            BlockData::Quote(q) => to_json(&q),
            BlockData::Code(c) => to_json(&c),
            BlockData::Delimiter => JsonValue::Object(Map::new()),
            BlockData::Link(l) => to_json(&l),
            BlockData::Image(i) => to_json(&i),
            BlockData::Embed(e) => to_json(&e),
            BlockData::Unknown { data, .. } => data,
        };
        (kind, data)
    }
}

fn to_json<T: Serialize>(value: &T) -> JsonValue {
    serde_json::to_value(value).unwrap_or_else(|_| JsonValue::Object(Map::new()))
}

#[derive(Serialize, Deserialize)]
struct RawBlock {
    #[serde(default)]
    id: String,
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    data: JsonValue,
}

impl From<RawBlock> for Block {
    fn from(raw: RawBlock) -> Self {
        Block {
            id: raw.id,
            data: BlockData::from_parts(&raw.kind, raw.data),
        }
    }
}

impl From<Block> for RawBlock {
    fn from(block: Block) -> Self {
        let (kind, data) = block.data.into_parts();
        RawBlock {
            id: block.id,
            kind,
            data,
        }
    }
}

/// Heading payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Heading {
    /// Heading text without the `#` markers.
    #[serde(default)]
    pub text: String,
    /// Level 1..=6.
    #[serde(default = "default_level")]
    pub level: u8,
}

fn default_level() -> u8 {
    MIN_HEADING_LEVEL
}

impl Heading {
    /// Returns the heading with its level forced into 1..=6.
    pub fn clamped(mut self) -> Self {
        self.level = self.level.clamp(MIN_HEADING_LEVEL, MAX_HEADING_LEVEL);
        self
    }
}

/// Paragraph payload. Text may span several lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paragraph {
    /// Paragraph text.
    #[serde(default)]
    pub text: String,
}

/// List marker style, fixed for the whole block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListStyle {
    /// `1.` markers.
    Ordered,
    /// `-` markers.
    #[default]
    Unordered,
}

/// List payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct List {
    /// Marker style.
    #[serde(default)]
    pub style: ListStyle,
    /// Item texts in order.
    #[serde(default, deserialize_with = "deserialize_items")]
    pub items: Vec<String>,
}

// The editor's list tool may send `{ "content": "..." }` objects instead of strings.
fn deserialize_items<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Item {
        Text(String),
        Nested { content: String },
    }

    let items = Vec::<Item>::deserialize(deserializer)?;
    Ok(items
        .into_iter()
        .map(|item| match item {
            Item::Text(text) => text,
            Item::Nested { content } => content,
        })
        .collect())
}

/// Quote payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    /// Newline-joined quote lines without `>` markers.
    #[serde(default)]
    pub text: String,
    /// Attribution; always empty after parsing.
    #[serde(default)]
    pub caption: String,
}

/// Fenced code payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Code {
    /// Code between the fences.
    #[serde(default)]
    pub code: String,
    /// Fence info string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

/// Link card payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    /// Target URL.
    #[serde(default)]
    pub link: String,
    /// Metadata scraped from the target page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<LinkMeta>,
}

/// Page metadata shown on a link card.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LinkMeta {
    /// Page title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Page description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Preview image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageFile>,
}

/// Uploaded or referenced file.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ImageFile {
    /// File URL.
    #[serde(default)]
    pub url: String,
}

/// Image payload; either `file.url` or `url` locates the image.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Image {
    /// Uploaded file reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<ImageFile>,
    /// Direct URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Caption, used as alt text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
}

impl Image {
    /// Resolved image URL: `file.url`, then `url`, then empty.
    pub fn resolved_url(&self) -> &str {
        self.file
            .as_ref()
            .map(|file| file.url.as_str())
            .filter(|url| !url.is_empty())
            .or_else(|| self.url.as_deref().filter(|url| !url.is_empty()))
            .unwrap_or("")
    }
}

/// Embedded media payload.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Embed {
    /// Service name (youtube, codepen, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    /// Original page URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Embeddable URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embed: Option<String>,
    /// Caption.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_with_type_and_data_fields() {
        let block = Block::new(3, BlockData::heading("Title", 2));
        let value = serde_json::to_value(&block).unwrap();
        assert_eq!(
            value,
            json!({ "id": "block_3", "type": "heading", "data": { "text": "Title", "level": 2 } })
        );
    }

    #[test]
    fn accepts_editor_tool_aliases() {
        let header: Block = serde_json::from_value(
            json!({ "id": "a", "type": "header", "data": { "text": "Hi", "level": 3 } }),
        )
        .unwrap();
        assert_eq!(header.data, BlockData::heading("Hi", 3));

        let link: Block = serde_json::from_value(json!({
            "id": "b",
            "type": "linkTool",
            "data": { "link": "https://example.com", "meta": { "title": "Example" } }
        }))
        .unwrap();
        assert_eq!(link.type_name(), "link");
    }

    #[test]
    fn clamps_heading_level() {
        assert_eq!(BlockData::heading("x", 0), BlockData::heading("x", 1));
        let block: Block =
            serde_json::from_value(json!({ "type": "heading", "data": { "text": "x", "level": 9 } }))
                .unwrap();
        assert_eq!(block.data, BlockData::heading("x", 6));
    }

    #[test]
    fn keeps_unrecognized_types() {
        let raw = json!({ "id": "c", "type": "table", "data": { "text": "cells" } });
        let block: Block = serde_json::from_value(raw.clone()).unwrap();
        assert!(matches!(&block.data, BlockData::Unknown { kind, .. } if kind == "table"));
        assert_eq!(serde_json::to_value(&block).unwrap(), raw);
    }

    #[test]
    fn malformed_known_type_degrades_to_unknown() {
        let block: Block =
            serde_json::from_value(json!({ "type": "list", "data": { "items": "not a list" } }))
                .unwrap();
        assert_eq!(block.type_name(), "list");
        assert!(matches!(block.data, BlockData::Unknown { .. }));
    }

    #[test]
    fn list_items_accept_nested_objects() {
        let block: Block = serde_json::from_value(json!({
            "type": "list",
            "data": { "style": "ordered", "items": [{ "content": "one", "items": [] }, "two"] }
        }))
        .unwrap();
        assert_eq!(
            block.data,
            BlockData::list(ListStyle::Ordered, vec!["one".into(), "two".into()])
        );
    }

    #[test]
    fn delimiter_round_trips_as_empty_object() {
        let block = Block::new(0, BlockData::Delimiter);
        let value = serde_json::to_value(&block).unwrap();
        assert_eq!(value["data"], json!({}));
        let back: Block = serde_json::from_value(value).unwrap();
        assert_eq!(back, block);
    }

    #[test]
    fn document_defaults_missing_fields() {
        let doc: Document = serde_json::from_value(json!({})).unwrap();
        assert!(doc.is_empty());
        assert_eq!(doc.version, DOCUMENT_VERSION);
        assert_eq!(doc.time, 0);
    }

    #[test]
    fn placeholder_has_single_paragraph() {
        let doc = Document::placeholder("blog/hello", 42);
        assert_eq!(doc.time, 42);
        assert_eq!(doc.blocks.len(), 1);
        assert_eq!(doc.blocks[0].id, "block_0");
        assert_eq!(
            doc.blocks[0].data,
            BlockData::paragraph("Start writing your content for \"blog/hello\"...")
        );
    }

    #[test]
    fn image_url_prefers_file() {
        let image = Image {
            file: Some(ImageFile {
                url: "/a.png".into(),
            }),
            url: Some("/b.png".into()),
            caption: None,
        };
        assert_eq!(image.resolved_url(), "/a.png");
        assert_eq!(Image::default().resolved_url(), "");
    }
}

#![deny(missing_docs)]
//! arjun core: markdown <-> block document conversion, frontmatter, and content files.

/// Block document model shared with the browser editor.
///
/// On the wire a block is `{ "id", "type", "data" }`. Types the converter
/// does not know are kept as [`BlockData::Unknown`].
pub mod block;
/// Line classification for the block parser.
pub mod classify;
/// Markdown file lookup, reading, writing and discovery. Files are read and
/// parsed on every load and rewritten in full on every save.
pub mod content;
/// Core error types.
pub mod error;
/// Frontmatter extraction and rendering.
pub mod frontmatter;
/// Markdown to block document parsing.
///
/// One forward pass: each block kind consumes the longest run of lines that
/// belongs to it. Parsing never fails, and an unterminated code fence runs
/// to the end of the input.
pub mod parse;
/// Block document to markdown serialization.
///
/// Units are separated by exactly one blank line. Unknown or malformed
/// blocks fall back to their `data.text` string, or to nothing.
pub mod serialize;
/// Route slug utilities.
pub mod slug;

pub use block::{
    Block, BlockData, Code, DOCUMENT_VERSION, Document, Embed, Heading, Image, ImageFile,
    Link, LinkMeta, List, ListStyle, Paragraph, Quote,
};
pub use classify::{LineClass, classify_line, is_fence_line};
pub use content::{
    MarkdownFile, find_markdown_file, list_markdown_files, read_markdown_file,
    write_markdown_file,
};
pub use error::ContentError;
pub use frontmatter::{FrontmatterExtraction, extract_frontmatter, render_frontmatter};
pub use parse::{parse, parse_markdown, parse_markdown_at};
pub use serialize::{block_to_markdown, serialize, serialize_document, serialize_json};
pub use slug::{edit_url, normalize_slug, slug_for_file, slug_from_edit_path};

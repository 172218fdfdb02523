use crate::config::EditorConfig;
use crate::env::RuntimeMode;
use crate::error::HandlerError;
use crate::link_meta::{LinkFetcher, extract_link_meta};
use arjun_core::block::now_millis;
use arjun_core::{
    Document, LinkMeta, MarkdownFile, find_markdown_file, normalize_slug, parse_markdown,
    read_markdown_file, serialize_json, write_markdown_file,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

const FETCH_FAILED: &str = "Failed to fetch URL data";

/// Body of a save request.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SaveRequest {
    /// Slug of the page being edited.
    pub slug: String,
    /// Editor output: `{ time, blocks, version }`.
    #[serde(default)]
    pub content: JsonValue,
}

/// Result of a save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveResponse {
    /// Whether the file was written.
    pub success: bool,
    /// Confirmation for the editor's status line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Failure reason.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SaveResponse {
    fn saved(slug: &str) -> Self {
        Self {
            success: true,
            message: Some(format!("Successfully saved {slug}.md")),
            error: None,
        }
    }
}

/// JSON envelope used by the API routes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Whether the request succeeded.
    pub success: bool,
    /// Payload on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Informational message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Failure reason.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Successful envelope around `data`.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            error: None,
        }
    }

    /// Failed envelope carrying `error`.
    pub fn error(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: None,
            error: Some(error.into()),
        }
    }
}

/// Response shape expected by the editor's link tool: `success` is `1` or `0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkPreview {
    /// `1` when metadata was fetched, `0` otherwise.
    pub success: u8,
    /// Page metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<LinkMeta>,
    /// Failure reason.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl LinkPreview {
    fn found(meta: LinkMeta) -> Self {
        Self {
            success: 1,
            meta: Some(meta),
            error: None,
        }
    }

    fn failed(error: impl Into<String>) -> Self {
        Self {
            success: 0,
            meta: None,
            error: Some(error.into()),
        }
    }
}

fn ensure_development(mode: RuntimeMode) -> Result<(), HandlerError> {
    if mode.is_production() {
        Err(HandlerError::Unavailable)
    } else {
        Ok(())
    }
}

/// Loads the document for `slug`.
///
/// A slug without a file yields a one-paragraph placeholder document so the
/// editor can create the page on first save.
pub fn get_markdown(
    config: &EditorConfig,
    mode: RuntimeMode,
    slug: &str,
) -> Result<Document, HandlerError> {
    ensure_development(mode)?;
    let slug = normalize_slug(slug)?;

    let Some(path) = find_markdown_file(config.root_dir(), &slug) else {
        log::info!("no file for `{slug}` yet, starting from a placeholder");
        return Ok(Document::placeholder(&slug, now_millis()));
    };

    let file = read_markdown_file(&path)?;
    log::debug!("loaded {}", path.display());
    Ok(parse_markdown(&file.content))
}

/// Serializes the editor payload and writes it to the file backing the slug.
///
/// Existing files keep their frontmatter. A slug without a file is written to
/// `{root}/{slug}.md`.
pub fn save_markdown(
    config: &EditorConfig,
    mode: RuntimeMode,
    request: &SaveRequest,
) -> Result<SaveResponse, HandlerError> {
    ensure_development(mode)?;
    let slug = normalize_slug(&request.slug)?;
    let markdown = serialize_json(&request.content);

    let root = config.root_dir();
    let existing = find_markdown_file(root, &slug);
    let frontmatter = match &existing {
        Some(path) => read_markdown_file(path)?.frontmatter,
        None => Map::new(),
    };
    let path = existing.unwrap_or_else(|| root.join(format!("{slug}.md")));

    write_markdown_file(
        &path,
        &MarkdownFile {
            slug: slug.clone(),
            content: markdown,
            frontmatter,
        },
    )?;
    log::info!("saved {}", path.display());
    Ok(SaveResponse::saved(&slug))
}

/// Fetches `url` and extracts a link preview. Never fails; errors become a
/// `success: 0` response.
pub fn fetch_url(mode: RuntimeMode, fetcher: &dyn LinkFetcher, url: &str) -> LinkPreview {
    if let Err(err) = ensure_development(mode) {
        return LinkPreview::failed(err.to_string());
    }
    let url = url.trim();
    if url.is_empty() {
        return LinkPreview::failed(FETCH_FAILED);
    }

    match fetcher.fetch(url) {
        Ok(html) => LinkPreview::found(extract_link_meta(&html, url)),
        Err(err) => {
            log::warn!("link preview failed: {err}");
            LinkPreview::failed(FETCH_FAILED)
        }
    }
}

#![deny(missing_docs)]
//! arjun server: the local editor service, its HTML pages, the page widget,
//! and link previews.

/// Editor configuration.
pub mod config;
/// Development gate. Every entry point refuses to run in production.
pub mod env;
/// Server error types.
pub mod error;
/// Project framework and content directory detection.
pub mod framework;
/// Load, save and link-preview handlers. Each checks the development gate
/// before touching the filesystem or the network.
pub mod handlers;
/// tiny_http listener and worker loop.
pub mod http;
/// Link preview extraction and fetching.
pub mod link_meta;
/// Editor and dashboard pages.
pub mod pages;
/// Request routing, independent of the socket layer.
pub mod router;
/// Floating "Edit" widget injected into site pages.
pub mod widget;

pub use config::{
    DEFAULT_EDITOR_HOST, DEFAULT_EDITOR_PATH, DEFAULT_EDITOR_PORT, EditorConfig, Framework,
    ScanMode,
};
pub use env::RuntimeMode;
pub use error::{HandlerError, ServeError};
pub use framework::{detect_content_dir, detect_framework};
pub use handlers::{
    ApiResponse, LinkPreview, SaveRequest, SaveResponse, fetch_url, get_markdown, save_markdown,
};
pub use http::{bind_available, serve};
pub use link_meta::{
    DEFAULT_FETCH_TIMEOUT, FetchError, HttpLinkFetcher, LinkFetcher, extract_link_meta,
};
pub use pages::{dashboard_page, editor_page};
pub use router::{Reply, Request, Router};
pub use widget::{inject_widget, widget_script, widget_script_tag};

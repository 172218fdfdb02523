use crate::config::EditorConfig;
use crate::env::RuntimeMode;
use crate::error::HandlerError;
use crate::handlers::{ApiResponse, SaveRequest, fetch_url, get_markdown, save_markdown};
use crate::link_meta::LinkFetcher;
use crate::pages::{dashboard_page, editor_page};
use crate::widget::widget_script;
use arjun_core::{list_markdown_files, slug_from_edit_path};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::path::PathBuf;
use tiny_http::Method;

const API_PREFIX: &str = "/api/_edit/";

/// Headers attached to every reply.
pub const CORS_HEADERS: [(&str, &str); 3] = [
    ("Access-Control-Allow-Origin", "*"),
    ("Access-Control-Allow-Methods", "GET, POST, PUT, DELETE, OPTIONS"),
    ("Access-Control-Allow-Headers", "Content-Type"),
];

/// Incoming request, already read off the socket.
#[derive(Debug, Clone)]
pub struct Request {
    /// HTTP method.
    pub method: Method,
    /// Request target: path plus optional query.
    pub url: String,
    /// Raw body.
    pub body: Vec<u8>,
}

impl Request {
    /// Request without a body.
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            body: Vec::new(),
        }
    }

    /// Attaches a body.
    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    fn path(&self) -> Cow<'_, str> {
        let raw = self.url.split(['?', '#']).next().unwrap_or("/");
        urlencoding::decode(raw).unwrap_or(Cow::Borrowed(raw))
    }

    fn query_param(&self, name: &str) -> Option<String> {
        let (_, query) = self.url.split_once('?')?;
        query.split('&').find_map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            if key != name {
                return None;
            }
            let value = value.replace('+', " ");
            let decoded = urlencoding::decode(&value).map(Cow::into_owned);
            Some(decoded.unwrap_or_else(|_| value.clone()))
        })
    }
}

/// Response produced by the router.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    /// HTTP status code.
    pub status: u16,
    /// Header name/value pairs, CORS headers included.
    pub headers: Vec<(String, String)>,
    /// Response body.
    pub body: Vec<u8>,
}

impl Reply {
    fn new(status: u16, content_type: Option<&str>, body: Vec<u8>) -> Self {
        let mut headers: Vec<(String, String)> = CORS_HEADERS
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();
        if let Some(content_type) = content_type {
            headers.push(("Content-Type".to_string(), content_type.to_string()));
        }
        Self {
            status,
            headers,
            body,
        }
    }

    /// Empty reply.
    pub fn empty(status: u16) -> Self {
        Self::new(status, None, Vec::new())
    }

    /// Plain-text reply.
    pub fn text(status: u16, body: impl Into<String>) -> Self {
        Self::new(
            status,
            Some("text/plain; charset=utf-8"),
            body.into().into_bytes(),
        )
    }

    /// HTML reply.
    pub fn html(body: String) -> Self {
        Self::new(200, Some("text/html; charset=utf-8"), body.into_bytes())
    }

    /// JavaScript reply.
    pub fn javascript(body: String) -> Self {
        Self::new(
            200,
            Some("application/javascript; charset=utf-8"),
            body.into_bytes(),
        )
    }

    /// JSON reply.
    pub fn json<T: Serialize>(status: u16, value: &T) -> Self {
        match serde_json::to_vec(value) {
            Ok(body) => Self::new(status, Some("application/json"), body),
            Err(err) => {
                log::warn!("failed to encode json reply: {err}");
                Self::text(500, "Internal server error")
            }
        }
    }

    /// Value of a header, matched case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Body as UTF-8 text.
    pub fn body_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Ping {
    success: bool,
    port: u16,
    content_dir: PathBuf,
    scan_mode: &'static str,
}

#[derive(Debug, Deserialize)]
struct FetchBody {
    #[serde(default)]
    url: String,
}

/// Routes editor requests to handlers.
pub struct Router {
    config: EditorConfig,
    mode: RuntimeMode,
    fetcher: Box<dyn LinkFetcher>,
}

impl Router {
    /// Creates a router over `config`.
    pub fn new(config: EditorConfig, mode: RuntimeMode, fetcher: impl LinkFetcher + 'static) -> Self {
        Self {
            config,
            mode,
            fetcher: Box::new(fetcher),
        }
    }

    /// Configuration the router serves.
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Produces the reply for `request`.
    pub fn route(&self, request: &Request) -> Reply {
        if request.method == Method::Options {
            return Reply::empty(200);
        }

        let path = request.path();
        let api = path.starts_with(API_PREFIX);
        if self.mode.is_production() {
            return if api {
                error_reply(&HandlerError::Unavailable)
            } else {
                Reply::text(403, HandlerError::Unavailable.to_string())
            };
        }
        if api {
            return self.api(request, &path[API_PREFIX.len()..]);
        }

        match (&request.method, &*path) {
            (Method::Get, "/widget.js") => Reply::javascript(widget_script(&self.config)),
            (Method::Get, "/" | "/index.html") => self.dashboard(),
            (Method::Get, pathname) => match slug_from_edit_path(pathname, &self.config.editor_path) {
                Some(slug) => self.editor(slug),
                None => not_found(),
            },
            _ => not_found(),
        }
    }

    fn api(&self, request: &Request, endpoint: &str) -> Reply {
        match (&request.method, endpoint) {
            (Method::Get, "ping") => Reply::json(
                200,
                &Ping {
                    success: true,
                    port: self.config.editor_port,
                    content_dir: self.config.content_dir.clone(),
                    scan_mode: self.config.scan_mode.wire_name(),
                },
            ),
            (Method::Get, endpoint) if endpoint.starts_with("load/") => {
                match get_markdown(&self.config, self.mode, &endpoint["load/".len()..]) {
                    Ok(document) => Reply::json(200, &ApiResponse::ok(document)),
                    Err(err) => error_reply(&err),
                }
            }
            (Method::Post, "save") => {
                let save = serde_json::from_slice::<SaveRequest>(&request.body)
                    .map_err(|err| HandlerError::BadRequest(format!("invalid save request: {err}")))
                    .and_then(|save| save_markdown(&self.config, self.mode, &save));
                match save {
                    Ok(response) => Reply::json(200, &response),
                    Err(err) => error_reply(&err),
                }
            }
            (Method::Post, "fetch" | "fetchUrl") => {
                match serde_json::from_slice::<FetchBody>(&request.body) {
                    Ok(body) => self.preview(&body.url),
                    Err(err) => error_reply(&HandlerError::BadRequest(format!(
                        "invalid fetch request: {err}"
                    ))),
                }
            }
            (Method::Get, "fetch" | "fetchUrl") => {
                self.preview(&request.query_param("url").unwrap_or_default())
            }
            _ => not_found(),
        }
    }

    fn preview(&self, url: &str) -> Reply {
        Reply::json(200, &fetch_url(self.mode, self.fetcher.as_ref(), url))
    }

    fn editor(&self, slug: &str) -> Reply {
        if slug.is_empty() {
            return Reply::text(400, "Invalid file path");
        }
        match get_markdown(&self.config, self.mode, slug) {
            Ok(document) => Reply::html(editor_page(slug, &document, &self.config)),
            Err(HandlerError::InvalidSlug(_)) => Reply::text(400, "Invalid file path"),
            Err(err) => {
                log::warn!("editor page for `{slug}` failed: {err}");
                Reply::text(404, "Markdown file not found")
            }
        }
    }

    fn dashboard(&self) -> Reply {
        let files = list_markdown_files(self.config.root_dir(), &self.config.allowed_extensions);
        Reply::html(dashboard_page(&files, &self.config, self.config.editor_port))
    }
}

fn error_reply(err: &HandlerError) -> Reply {
    if let HandlerError::Content(inner) = err {
        log::warn!("request failed: {inner}");
    }
    Reply::json(err.status(), &ApiResponse::<()>::error(err.to_string()))
}

fn not_found() -> Reply {
    Reply::text(404, "Not found")
}

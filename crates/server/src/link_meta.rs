use arjun_core::{ImageFile, LinkMeta};
use once_cell::sync::Lazy;
use regex::Regex;
use std::time::Duration;
use thiserror::Error;

static TITLE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<title[^>]*>(.*?)</title>").expect("invalid title regex"));

static DESCRIPTION_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)<meta\s+name=["']description["']\s+content=["']([^"']*)["']"#)
        .expect("invalid description regex")
});

static OG_DESCRIPTION_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)<meta\s+property=["']og:description["']\s+content=["']([^"']*)["']"#)
        .expect("invalid og:description regex")
});

static OG_IMAGE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)<meta\s+property=["']og:image["']\s+content=["']([^"']*)["']"#)
        .expect("invalid og:image regex")
});

/// Default time budget for fetching a page.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors fetching a page for a preview.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Only http and https URLs are fetched.
    #[error("unsupported url: {0}")]
    UnsupportedUrl(String),
    /// The HTTP client could not be built.
    #[error("failed to build http client: {0}")]
    Client(#[source] reqwest::Error),
    /// The request failed or returned an error status.
    #[error("request to {url} failed: {source}")]
    Request {
        /// Requested URL.
        url: String,
        /// Underlying client error.
        source: reqwest::Error,
    },
}

/// Source of page HTML for link previews.
pub trait LinkFetcher: Send + Sync {
    /// Returns the body of the page at `url`.
    fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// Fetches pages over HTTP with a blocking client.
#[derive(Debug, Clone)]
pub struct HttpLinkFetcher {
    client: reqwest::blocking::Client,
}

impl HttpLinkFetcher {
    /// Builds a fetcher whose requests give up after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("arjun/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(FetchError::Client)?;
        Ok(Self { client })
    }
}

impl LinkFetcher for HttpLinkFetcher {
    fn fetch(&self, url: &str) -> Result<String, FetchError> {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(FetchError::UnsupportedUrl(url.to_string()));
        }
        let request_error = |source: reqwest::Error| FetchError::Request {
            url: url.to_string(),
            source,
        };
        self.client
            .get(url)
            .send()
            .and_then(|response| response.error_for_status())
            .and_then(|response| response.text())
            .map_err(request_error)
    }
}

/// Extracts title, description and preview image from page HTML.
///
/// The title falls back to `url`; a missing description or image becomes an
/// empty string so the link tool always receives every field.
pub fn extract_link_meta(html: &str, url: &str) -> LinkMeta {
    let title = capture(&TITLE_REGEX, html)
        .filter(|title| !title.is_empty())
        .unwrap_or_else(|| url.to_string());
    let description = capture(&DESCRIPTION_REGEX, html)
        .or_else(|| capture(&OG_DESCRIPTION_REGEX, html))
        .unwrap_or_default();
    let image = capture(&OG_IMAGE_REGEX, html).unwrap_or_default();

    LinkMeta {
        title: Some(title),
        description: Some(description),
        image: Some(ImageFile { url: image }),
    }
}

fn capture(regex: &Regex, html: &str) -> Option<String> {
    regex
        .captures(html)
        .and_then(|caps| caps.get(1))
        .map(|value| html_escape::decode_html_entities(value.as_str().trim()).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_title_description_and_image() {
        let html = r#"<html><head>
            <title>
              Rust &amp; Friends
            </title>
            <meta name="description" content="A page about Rust">
            <meta property="og:description" content="ignored">
            <meta property="og:image" content="https://example.com/card.png">
        </head></html>"#;
        let meta = extract_link_meta(html, "https://example.com");
        assert_eq!(meta.title.as_deref(), Some("Rust & Friends"));
        assert_eq!(meta.description.as_deref(), Some("A page about Rust"));
        assert_eq!(
            meta.image.map(|image| image.url).as_deref(),
            Some("https://example.com/card.png")
        );
    }

    #[test]
    fn falls_back_to_og_description_and_url_title() {
        let html = r#"<meta property="og:description" content="From OG">"#;
        let meta = extract_link_meta(html, "https://example.com/x");
        assert_eq!(meta.title.as_deref(), Some("https://example.com/x"));
        assert_eq!(meta.description.as_deref(), Some("From OG"));
        assert_eq!(meta.image.map(|image| image.url).as_deref(), Some(""));
    }

    #[test]
    fn empty_title_uses_url() {
        let meta = extract_link_meta("<title>  </title>", "https://a.test");
        assert_eq!(meta.title.as_deref(), Some("https://a.test"));
    }

    #[test]
    fn refuses_non_http_urls() {
        let fetcher = HttpLinkFetcher::new(DEFAULT_FETCH_TIMEOUT).unwrap();
        assert!(matches!(
            fetcher.fetch("file:///etc/passwd"),
            Err(FetchError::UnsupportedUrl(_))
        ));
    }
}

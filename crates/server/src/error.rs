use arjun_core::ContentError;
use thiserror::Error;

/// Errors returned by the editor handlers.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// The process runs in production.
    #[error("Editor only available in development mode")]
    Unavailable,
    /// The slug was rejected before any file was touched.
    #[error("Invalid file path: {0}")]
    InvalidSlug(String),
    /// Reading or writing the markdown file failed.
    #[error(transparent)]
    Content(ContentError),
    /// The request could not be decoded.
    #[error("{0}")]
    BadRequest(String),
}

impl HandlerError {
    /// HTTP status for this error.
    pub fn status(&self) -> u16 {
        match self {
            HandlerError::Unavailable => 403,
            HandlerError::InvalidSlug(_) | HandlerError::BadRequest(_) => 400,
            HandlerError::Content(_) => 500,
        }
    }
}

impl From<ContentError> for HandlerError {
    fn from(err: ContentError) -> Self {
        match err {
            ContentError::InvalidSlug(slug) => HandlerError::InvalidSlug(slug),
            other => HandlerError::Content(other),
        }
    }
}

/// Errors starting or running the HTTP listener.
#[derive(Debug, Error)]
pub enum ServeError {
    /// Binding a listener failed.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        /// Address that could not be bound.
        addr: String,
        /// Underlying IO error.
        source: std::io::Error,
    },
    /// No port in the probed range was free.
    #[error("no available port between {first} and {last} on {host}")]
    NoPort {
        /// Host that was probed.
        host: String,
        /// First port tried.
        first: u16,
        /// Last port tried.
        last: u16,
    },
    /// The HTTP server could not take over the listener.
    #[error("failed to start http server: {0}")]
    Start(String),
}

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while locating, reading, or writing content files.
///
/// The converter itself never fails; every variant here comes from the
/// filesystem layer or from rejecting a slug before touching it.
#[derive(Debug, Error)]
pub enum ContentError {
    /// Reading a markdown file failed.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        /// File that could not be read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },
    /// Writing a markdown file failed.
    #[error("failed to write {}: {source}", path.display())]
    Write {
        /// File that could not be written.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },
    /// Creating the parent directory of a file failed.
    #[error("failed to create directory {}: {source}", path.display())]
    CreateDir {
        /// Directory that could not be created.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },
    /// The slug would escape the content directory or is otherwise unusable.
    #[error("invalid slug: {0:?}")]
    InvalidSlug(String),
}

impl ContentError {
    /// Path involved in the failure, if any.
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            ContentError::Read { path, .. }
            | ContentError::Write { path, .. }
            | ContentError::CreateDir { path, .. } => Some(path),
            ContentError::InvalidSlug(_) => None,
        }
    }
}

use crate::error::ContentError;
use crate::frontmatter::{extract_frontmatter, render_frontmatter};
use serde_json::{Map, Value as JsonValue};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Directories never descended into while discovering files.
const SKIPPED_DIRS: &[&str] = &["node_modules", "dist", "build", ".next", "out"];

/// A markdown file split into frontmatter and body.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MarkdownFile {
    /// File stem the file was loaded from, or the slug it is saved under.
    pub slug: String,
    /// Markdown body without frontmatter.
    pub content: String,
    /// Frontmatter mapping, empty when the file has none.
    pub frontmatter: Map<String, JsonValue>,
}

/// Candidate paths for a slug, in lookup order.
pub fn candidate_paths(content_dir: &Path, slug: &str) -> [PathBuf; 4] {
    [
        content_dir.join(format!("{slug}.md")),
        content_dir.join(slug).join("index.md"),
        content_dir.join(format!("{slug}.mdx")),
        content_dir.join(slug).join("index.mdx"),
    ]
}

/// Resolves a slug to an existing file: `{slug}.md`, `{slug}/index.md`,
/// `{slug}.mdx`, then `{slug}/index.mdx`.
pub fn find_markdown_file(content_dir: &Path, slug: &str) -> Option<PathBuf> {
    candidate_paths(content_dir, slug)
        .into_iter()
        .find(|path| path.is_file())
}

/// Reads a markdown file and splits off its frontmatter.
pub fn read_markdown_file(path: &Path) -> Result<MarkdownFile, ContentError> {
    let raw = fs::read_to_string(path).map_err(|source| ContentError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let extracted = extract_frontmatter(&raw);
    let slug = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();

    Ok(MarkdownFile {
        slug,
        content: extracted.body,
        frontmatter: extracted.data,
    })
}

/// Writes frontmatter and body to `path`, creating parent directories and
/// replacing any existing file.
pub fn write_markdown_file(path: &Path, file: &MarkdownFile) -> Result<(), ContentError> {
    if let Some(parent) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| ContentError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let mut text = render_frontmatter(&file.frontmatter);
    text.push_str(&file.content);
    fs::write(path, text).map_err(|source| ContentError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    log::debug!("wrote {}", path.display());
    Ok(())
}

/// Lists markdown files under `root`, relative to it and sorted.
///
/// `extensions` are matched case-insensitively and may be given with or
/// without the leading dot. Hidden directories and build output directories
/// are skipped, as are entries that cannot be read.
pub fn list_markdown_files(root: &Path, extensions: &[String]) -> Vec<PathBuf> {
    let wanted: Vec<String> = extensions
        .iter()
        .map(|ext| ext.trim_start_matches('.').to_ascii_lowercase())
        .collect();

    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_skipped_dir(entry))
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(err) => {
                log::debug!("skipping unreadable entry: {err}");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            entry
                .path()
                .extension()
                .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
                .is_some_and(|ext| wanted.contains(&ext))
        })
        .filter_map(|entry| {
            entry
                .path()
                .strip_prefix(root)
                .ok()
                .map(Path::to_path_buf)
        })
        .collect();

    files.sort();
    files
}

fn is_skipped_dir(entry: &DirEntry) -> bool {
    if !entry.file_type().is_dir() {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    name.starts_with('.') || SKIPPED_DIRS.contains(&name.as_ref())
}

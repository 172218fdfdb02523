use crate::error::ContentError;
use std::path::{Component, Path};

/// Page extensions dropped from a URL before it is used as a slug.
const PAGE_EXTENSIONS: &[&str] = &[".html", ".htm", ".php", ".aspx", ".asp"];

/// Markdown extensions dropped from a file path to form its slug.
const MARKDOWN_EXTENSIONS: &[&str] = &[".mdx", ".md"];

/// Normalizes a page path or slug into a content-relative slug.
///
/// Leading and trailing slashes and page extensions are removed and an empty
/// path becomes `index`. Slugs that could leave the content directory are
/// rejected.
///
/// ```
/// use arjun_core::slug::normalize_slug;
///
/// assert_eq!(normalize_slug("/blog/hello.html").unwrap(), "blog/hello");
/// assert_eq!(normalize_slug("/").unwrap(), "index");
/// assert!(normalize_slug("../secrets").is_err());
/// ```
pub fn normalize_slug(raw: &str) -> Result<String, ContentError> {
    if raw.contains('\0') || raw.contains('\\') {
        return Err(ContentError::InvalidSlug(raw.to_string()));
    }

    let mut slug = raw.trim().trim_matches('/');
    let lower = slug.to_ascii_lowercase();
    if let Some(ext) = PAGE_EXTENSIONS.iter().find(|ext| lower.ends_with(*ext)) {
        slug = &slug[..slug.len() - ext.len()];
    }

    if slug.is_empty() {
        return Ok("index".to_string());
    }

    let escapes = Path::new(slug)
        .components()
        .any(|part| !matches!(part, Component::Normal(_)));
    if escapes || slug.split('/').any(str::is_empty) {
        return Err(ContentError::InvalidSlug(raw.to_string()));
    }

    Ok(slug.to_string())
}

/// Slug for a content-relative markdown file path (`blog/post.md` -> `blog/post`).
pub fn slug_for_file(relative: &Path) -> String {
    let joined = relative
        .components()
        .filter_map(|part| match part {
            Component::Normal(name) => Some(name.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/");

    let lower = joined.to_ascii_lowercase();
    match MARKDOWN_EXTENSIONS.iter().find(|ext| lower.ends_with(*ext)) {
        Some(ext) => joined[..joined.len() - ext.len()].to_string(),
        None => joined,
    }
}

/// Editor URL for a slug (`blog/post` + `/_edit` -> `/blog/post/_edit`).
pub fn edit_url(slug: &str, editor_path: &str) -> String {
    format!("/{}{}", slug.trim_matches('/'), editor_path)
}

/// Extracts the raw slug from an editor URL path, if it is one.
///
/// Returns `Some("")` for a bare editor path so callers can reject it.
pub fn slug_from_edit_path<'a>(pathname: &'a str, editor_path: &str) -> Option<&'a str> {
    let without_suffix = pathname.strip_suffix(editor_path)?;
    Some(without_suffix.trim_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn strips_slashes_and_page_extensions() {
        assert_eq!(normalize_slug("/docs/intro/").unwrap(), "docs/intro");
        assert_eq!(normalize_slug("about.PHP").unwrap(), "about");
        assert_eq!(normalize_slug("page.aspx").unwrap(), "page");
        assert_eq!(normalize_slug("").unwrap(), "index");
    }

    #[test]
    fn rejects_traversal() {
        for raw in ["..", "a/../../b", "./a", "a//b", "a\\b", "a\0b"] {
            assert!(
                matches!(normalize_slug(raw), Err(ContentError::InvalidSlug(_))),
                "{raw:?} should be rejected"
            );
        }
    }

    #[test]
    fn file_slugs_drop_markdown_extension() {
        assert_eq!(slug_for_file(&PathBuf::from("blog/post.md")), "blog/post");
        assert_eq!(slug_for_file(&PathBuf::from("docs/index.MDX")), "docs/index");
        assert_eq!(slug_for_file(&PathBuf::from("notes.txt")), "notes.txt");
    }

    #[test]
    fn edit_urls_round_trip() {
        let url = edit_url("blog/post", "/_edit");
        assert_eq!(url, "/blog/post/_edit");
        assert_eq!(slug_from_edit_path(&url, "/_edit"), Some("blog/post"));
        assert_eq!(slug_from_edit_path("/_edit", "/_edit"), Some(""));
        assert_eq!(slug_from_edit_path("/blog/post", "/_edit"), None);
    }
}

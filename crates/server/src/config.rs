use arjun_core::slug::edit_url;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Route suffix that opens the editor for a page.
pub const DEFAULT_EDITOR_PATH: &str = "/_edit";
/// Port the editor service prefers.
pub const DEFAULT_EDITOR_PORT: u16 = 3456;
/// Host the editor service listens on.
pub const DEFAULT_EDITOR_HOST: &str = "localhost";

/// Site framework the project is built with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Framework {
    /// Next.js
    Nextjs,
    /// SvelteKit
    Sveltekit,
    /// Astro
    Astro,
}

impl Framework {
    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            Framework::Nextjs => "Next.js",
            Framework::Sveltekit => "SvelteKit",
            Framework::Astro => "Astro",
        }
    }
}

/// Where markdown files are looked up and discovered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ScanMode {
    /// Slugs are paths relative to the project root.
    #[default]
    #[serde(rename = "project-wide")]
    ProjectWide,
    /// Slugs are paths relative to the content directory.
    #[serde(rename = "content-only", alias = "content-directory")]
    ContentOnly,
}

impl ScanMode {
    /// Name reported by the ping endpoint.
    pub fn wire_name(self) -> &'static str {
        match self {
            ScanMode::ProjectWide => "project-wide",
            ScanMode::ContentOnly => "content-directory",
        }
    }
}

/// Editor configuration, passed by reference to every handler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditorConfig {
    /// Directory holding the site's markdown content.
    pub content_dir: PathBuf,
    /// Project root used in project-wide mode.
    pub project_root: PathBuf,
    /// Route suffix that opens the editor.
    pub editor_path: String,
    /// Extensions (with leading dot) considered markdown.
    pub allowed_extensions: Vec<String>,
    /// Detected or configured site framework.
    pub framework: Option<Framework>,
    /// Host of the editor service, as site pages should reach it.
    pub editor_host: String,
    /// Port of the editor service.
    pub editor_port: u16,
    /// Slug resolution root.
    pub scan_mode: ScanMode,
    /// Save automatically after edits.
    pub auto_save: bool,
    /// Debounce before an automatic save, in milliseconds.
    #[serde(rename = "saveDelay")]
    pub save_delay_ms: u64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            content_dir: PathBuf::from("content"),
            project_root: PathBuf::from("."),
            editor_path: DEFAULT_EDITOR_PATH.to_string(),
            allowed_extensions: vec![".md".to_string(), ".mdx".to_string()],
            framework: None,
            editor_host: DEFAULT_EDITOR_HOST.to_string(),
            editor_port: DEFAULT_EDITOR_PORT,
            scan_mode: ScanMode::default(),
            auto_save: true,
            save_delay_ms: 50,
        }
    }
}

impl EditorConfig {
    /// Content-only configuration rooted at `content_dir`.
    pub fn for_content_dir(content_dir: impl Into<PathBuf>) -> Self {
        Self {
            content_dir: content_dir.into(),
            scan_mode: ScanMode::ContentOnly,
            ..Self::default()
        }
    }

    /// Directory slugs are resolved against.
    pub fn root_dir(&self) -> &Path {
        match self.scan_mode {
            ScanMode::ProjectWide => &self.project_root,
            ScanMode::ContentOnly => &self.content_dir,
        }
    }

    /// `http://host:port` of the editor service.
    pub fn editor_origin(&self) -> String {
        format!("http://{}:{}", self.editor_host, self.editor_port)
    }

    /// Editor URL for a slug.
    pub fn editor_url(&self, slug: &str) -> String {
        edit_url(slug, &self.editor_path)
    }
}

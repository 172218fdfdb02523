use crate::config::Framework;
use serde::Deserialize;
use serde_json::{Map, Value as JsonValue};
use std::fs;
use std::path::{Path, PathBuf};

/// Content directories probed in order.
const CONTENT_DIR_CANDIDATES: &[&str] = &["content", "src/content", "docs", "posts", "blog", "articles"];

/// Package names identifying each framework, in detection order.
const FRAMEWORK_PACKAGES: &[(&str, Framework)] = &[
    ("next", Framework::Nextjs),
    ("@sveltejs/kit", Framework::Sveltekit),
    ("astro", Framework::Astro),
];

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct PackageJson {
    dependencies: Map<String, JsonValue>,
    dev_dependencies: Map<String, JsonValue>,
}

/// Detects the site framework from `package.json` in `project_root`.
pub fn detect_framework(project_root: &Path) -> Option<Framework> {
    let path = project_root.join("package.json");
    let text = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(err) => {
            log::debug!("no package.json at {}: {err}", path.display());
            return None;
        }
    };
    let package: PackageJson = match serde_json::from_str(&text) {
        Ok(package) => package,
        Err(err) => {
            log::warn!("ignoring unreadable {}: {err}", path.display());
            return None;
        }
    };

    FRAMEWORK_PACKAGES
        .iter()
        .find(|(name, _)| {
            package.dependencies.contains_key(*name) || package.dev_dependencies.contains_key(*name)
        })
        .map(|(_, framework)| *framework)
}

/// First conventional content directory under `project_root`, or `content`.
pub fn detect_content_dir(project_root: &Path) -> PathBuf {
    CONTENT_DIR_CANDIDATES
        .iter()
        .map(|candidate| project_root.join(candidate))
        .find(|dir| dir.is_dir())
        .unwrap_or_else(|| project_root.join(CONTENT_DIR_CANDIDATES[0]))
}

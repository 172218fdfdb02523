use crate::config::EditorConfig;
use crate::pages::{fill, script_json};
use lol_html::html_content::ContentType;
use lol_html::{RewriteStrSettings, element, rewrite_str};

/// Class on the widget container; also marks pages that already carry it.
pub const WIDGET_CLASS: &str = "dev-md-editor-widget";

const WIDGET_TEMPLATE: &str = r#"(function () {
  'use strict';

  var editorOrigin = {{EDITOR_ORIGIN}};
  var editorPath = {{EDITOR_PATH}};

  if (window.__devMdEditorWidgetInjected ||
      window.location.pathname.indexOf(editorPath) !== -1 ||
      document.querySelector('.dev-md-editor-widget')) {
    return;
  }
  window.__devMdEditorWidgetInjected = true;

  function detectSlug() {
    var slug = window.location.pathname.replace(/^\/+|\/+$/g, '');
    slug = slug.replace(/\.(html?|php|aspx?)$/i, '');
    return slug || 'index';
  }

  function createWidget(slug) {
    var container = document.createElement('div');
    container.className = 'dev-md-editor-widget';
    container.style.cssText = 'position:fixed;bottom:24px;right:24px;z-index:10000;';

    var button = document.createElement('button');
    button.type = 'button';
    button.textContent = 'Edit';
    button.title = 'Edit this page';
    button.style.cssText = [
      'background:rgba(0,0,0,0.85)',
      'color:#fff',
      'border:1px solid rgba(255,255,255,0.1)',
      'border-radius:28px',
      'padding:12px 20px',
      'font:500 14px -apple-system,BlinkMacSystemFont,"Segoe UI",Roboto,sans-serif',
      'box-shadow:0 8px 32px rgba(0,0,0,0.3)',
      'cursor:pointer'
    ].join(';');

    button.addEventListener('click', function () {
      var url = editorOrigin + '/' + slug + editorPath;
      window.open(url, '_blank');
    });

    container.appendChild(button);
    document.body.appendChild(container);
  }

  function init() {
    createWidget(detectSlug());
  }

  if (document.readyState === 'loading') {
    document.addEventListener('DOMContentLoaded', init);
  } else {
    init();
  }
})();
"#;

/// Widget script opening editors on the service described by `config`.
pub fn widget_script(config: &EditorConfig) -> String {
    fill(
        WIDGET_TEMPLATE,
        &[
            ("EDITOR_ORIGIN", script_json(&config.editor_origin())),
            ("EDITOR_PATH", script_json(&config.editor_path)),
        ],
    )
}

/// Widget script wrapped in an inline `<script>` tag.
pub fn widget_script_tag(config: &EditorConfig) -> String {
    format!(
        "<script type=\"text/javascript\">{}</script>",
        widget_script(config)
    )
}

/// Adds the widget to an HTML page.
///
/// The tag goes at the end of `<body>`, else at the end of `<html>`, else at
/// the end of the document. Pages that already carry the widget, and editor
/// pages, are returned unchanged.
pub fn inject_widget(html: &str, config: &EditorConfig) -> String {
    if html.contains(WIDGET_CLASS) || html.contains(config.editor_path.as_str()) {
        return html.to_string();
    }

    let tag = widget_script_tag(config);
    let lower = html.to_ascii_lowercase();
    let selector = if lower.contains("<body") {
        "body"
    } else if lower.contains("<html") {
        "html"
    } else {
        return format!("{html}{tag}");
    };

    let rewritten = rewrite_str(
        html,
        RewriteStrSettings {
            element_content_handlers: vec![element!(selector, |el| {
                el.append(&tag, ContentType::Html);
                Ok(())
            })],
            ..RewriteStrSettings::new()
        },
    );

    match rewritten {
        Ok(output) if output.contains(WIDGET_CLASS) => output,
        Ok(_) => format!("{html}{tag}"),
        Err(err) => {
            log::warn!("widget injection fell back to appending: {err}");
            format!("{html}{tag}")
        }
    }
}

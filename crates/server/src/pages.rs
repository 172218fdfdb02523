use crate::config::{EditorConfig, ScanMode};
use arjun_core::{Document, slug_for_file};
use html_escape::{encode_double_quoted_attribute, encode_text};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Endpoint the editor posts documents to.
pub const SAVE_ENDPOINT: &str = "/api/_edit/save";
/// Endpoint the link tool fetches previews from.
pub const FETCH_URL_ENDPOINT: &str = "/api/_edit/fetchUrl";

const EDITOR_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>Editing {{TITLE}} - arjun</title>
  <script src="https://cdn.jsdelivr.net/npm/@editorjs/editorjs@2.28.2"></script>
  <script src="https://cdn.jsdelivr.net/npm/@editorjs/header@latest"></script>
  <script src="https://cdn.jsdelivr.net/npm/@editorjs/list@latest"></script>
  <script src="https://cdn.jsdelivr.net/npm/@editorjs/paragraph@latest"></script>
  <script src="https://cdn.jsdelivr.net/npm/@editorjs/quote@latest"></script>
  <script src="https://cdn.jsdelivr.net/npm/@editorjs/code@latest"></script>
  <script src="https://cdn.jsdelivr.net/npm/@editorjs/delimiter@latest"></script>
  <script src="https://cdn.jsdelivr.net/npm/@editorjs/link@latest"></script>
  <style>
    body { margin: 0; font-family: system-ui, -apple-system, "Segoe UI", sans-serif; background: #f8f9fa; }
    .shell { max-width: 800px; margin: 0 auto; padding: 20px; }
    .bar { display: flex; justify-content: space-between; align-items: center; margin-bottom: 20px; padding: 15px; background: #fff; border: 1px solid #e9ecef; border-radius: 8px; }
    .bar h1 { margin: 0; font-size: 1.5rem; color: #212529; }
    .bar p { margin: 5px 0 0; color: #6c757d; font-size: 0.9rem; }
    .controls { display: flex; align-items: center; gap: 10px; }
    #status { font-size: 0.9rem; }
    #status.ok { color: #28a745; }
    #status.err { color: #dc3545; }
    button { padding: 10px 20px; background: #007bff; color: #fff; border: none; border-radius: 6px; cursor: pointer; font-size: 0.9rem; }
    button:disabled { background: #6c757d; cursor: not-allowed; }
    #editorjs { border: 1px solid #e9ecef; border-radius: 8px; padding: 20px; background: #fff; min-height: 400px; }
    .codex-editor__redactor { padding-bottom: 200px !important; }
  </style>
</head>
<body>
  <div class="shell">
    <div class="bar">
      <div>
        <h1>Editing: {{TITLE}}</h1>
        <p>{{SCOPE}}</p>
      </div>
      <div class="controls">
        <span id="status"></span>
        <button id="save" type="button">Save</button>
      </div>
    </div>
    <div id="editorjs"></div>
  </div>
  <script>
    (function () {
      var slug = {{SLUG_JSON}};
      var initialData = {{DOCUMENT_JSON}};
      var autoSave = {{AUTO_SAVE}};
      var saveDelay = {{SAVE_DELAY}};
      var status = document.getElementById('status');
      var saveButton = document.getElementById('save');
      var timer = null;

      var editor = new EditorJS({
        holder: 'editorjs',
        data: initialData,
        placeholder: 'Start writing your content...',
        minHeight: 300,
        tools: {
          heading: { class: Header, config: { levels: [1, 2, 3, 4, 5, 6], defaultLevel: 2 } },
          list: { class: List, inlineToolbar: true, config: { defaultStyle: 'unordered' } },
          paragraph: { class: Paragraph, inlineToolbar: true },
          quote: { class: Quote, inlineToolbar: true },
          code: { class: CodeTool },
          delimiter: { class: Delimiter },
          link: { class: LinkTool, config: { endpoint: {{FETCH_ENDPOINT_JSON}} } }
        },
        onChange: function () {
          if (!autoSave) { return; }
          clearTimeout(timer);
          timer = setTimeout(save, saveDelay);
        }
      });

      function show(text, ok) {
        status.textContent = text;
        status.className = ok ? 'ok' : 'err';
        setTimeout(function () { status.textContent = ''; }, 3000);
      }

      function save() {
        saveButton.disabled = true;
        return editor.save()
          .then(function (content) {
            return fetch({{SAVE_ENDPOINT_JSON}}, {
              method: 'POST',
              headers: { 'Content-Type': 'application/json' },
              body: JSON.stringify({ slug: slug, content: content })
            });
          })
          .then(function (response) { return response.json(); })
          .then(function (result) {
            if (result.success) { show('Saved', true); }
            else { show('Error: ' + (result.error || 'Unknown error'), false); }
          })
          .catch(function (error) { show('Error: ' + error.message, false); })
          .then(function () { saveButton.disabled = false; });
      }

      saveButton.addEventListener('click', save);
      document.addEventListener('keydown', function (event) {
        if ((event.metaKey || event.ctrlKey) && event.key === 's') {
          event.preventDefault();
          save();
        }
      });
    })();
  </script>
</body>
</html>
"#;

/// Serializes a value for an inline `<script>`, so that no `</script>` inside
/// a string can end the script element early.
pub(crate) fn script_json<T: Serialize + ?Sized>(value: &T) -> String {
    match serde_json::to_string(value) {
        Ok(json) => json.replace("</", "<\\/"),
        Err(err) => {
            log::warn!("failed to serialize inline script data: {err}");
            "null".to_string()
        }
    }
}

fn scope_description(config: &EditorConfig) -> String {
    match config.scan_mode {
        ScanMode::ProjectWide => "Scanning entire project for markdown files".to_string(),
        ScanMode::ContentOnly => format!("Content directory: {}", config.content_dir.display()),
    }
}

/// Replaces every `{{KEY}}` in `template` in a single pass, so substituted
/// values are never scanned for further placeholders.
pub(crate) fn fill(template: &str, values: &[(&str, String)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            out.push_str(&rest[start..]);
            return out;
        };
        let key = &after[..end];
        match values.iter().find(|(name, _)| *name == key) {
            Some((_, value)) => out.push_str(value),
            None => out.push_str(&rest[start..start + end + 4]),
        }
        rest = &after[end + 2..];
    }
    out.push_str(rest);
    out
}

/// Editor page for `slug`, preloaded with `document`.
pub fn editor_page(slug: &str, document: &Document, config: &EditorConfig) -> String {
    fill(
        EDITOR_TEMPLATE,
        &[
            ("TITLE", encode_text(slug).into_owned()),
            ("SCOPE", encode_text(&scope_description(config)).into_owned()),
            ("SLUG_JSON", script_json(slug)),
            ("DOCUMENT_JSON", script_json(document)),
            ("AUTO_SAVE", config.auto_save.to_string()),
            ("SAVE_DELAY", config.save_delay_ms.to_string()),
            ("FETCH_ENDPOINT_JSON", script_json(FETCH_URL_ENDPOINT)),
            ("SAVE_ENDPOINT_JSON", script_json(SAVE_ENDPOINT)),
        ],
    )
}

fn file_item(file: &Path, config: &EditorConfig) -> String {
    let slug = slug_for_file(file);
    let display = file.display().to_string();
    format!(
        r#"      <li class="file-item">
        <div class="file-info">
          <h3 class="file-name">{name}</h3>
          <p class="file-path">{path}</p>
        </div>
        <a href="{href}" class="edit-btn">Edit</a>
      </li>
"#,
        name = encode_text(&slug),
        path = encode_text(&display),
        href = encode_double_quoted_attribute(&config.editor_url(&slug)),
    )
}

/// Dashboard listing `files` (relative to the scan root) with edit links.
pub fn dashboard_page(files: &[PathBuf], config: &EditorConfig, port: u16) -> String {
    let body = if files.is_empty() {
        r#"    <div class="empty">No markdown files found</div>
"#
        .to_string()
    } else {
        let count = format!(
            "    <p class=\"count\">{} markdown file{} found</p>\n",
            files.len(),
            if files.len() == 1 { "" } else { "s" }
        );
        let items: String = files.iter().map(|file| file_item(file, config)).collect();
        format!("{count}    <ul class=\"files\">\n{items}    </ul>\n")
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>arjun - markdown editor</title>
  <style>
    body {{ margin: 0; font-family: system-ui, -apple-system, "Segoe UI", sans-serif; background: #f8f9fa; color: #212529; }}
    main {{ max-width: 800px; margin: 0 auto; padding: 40px 20px; }}
    .scope {{ color: #6c757d; }}
    .files {{ list-style: none; padding: 0; }}
    .file-item {{ display: flex; justify-content: space-between; align-items: center; padding: 15px; margin-bottom: 10px; background: #fff; border: 1px solid #e9ecef; border-radius: 8px; }}
    .file-name {{ margin: 0; font-size: 1rem; }}
    .file-path {{ margin: 4px 0 0; color: #6c757d; font-size: 0.85rem; }}
    .edit-btn {{ padding: 8px 16px; background: #007bff; color: #fff; border-radius: 6px; text-decoration: none; }}
    .empty {{ padding: 40px; text-align: center; color: #6c757d; }}
  </style>
</head>
<body>
  <main>
    <h1>arjun</h1>
    <p class="scope">{scope}</p>
    <p class="scope">Editor running on port {port}</p>
{body}  </main>
</body>
</html>
"#,
        scope = encode_text(&scope_description(config)),
    )
}

use serde_json::{Map, Value as JsonValue};

const FENCE: &str = "---";

/// Frontmatter mapping and the markdown body that follows it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FrontmatterExtraction {
    /// Parsed key/value pairs, in source order.
    pub data: Map<String, JsonValue>,
    /// Markdown after the frontmatter block.
    pub body: String,
}

/// Splits a document into frontmatter and body.
///
/// Frontmatter is only recognized when the very first line is `---` and a
/// later line closes it; otherwise the input is returned untouched as body.
/// The block is read as a YAML mapping. When that fails, each `key: value`
/// line is read on its own, with values parsed as JSON where possible and
/// kept as strings otherwise. Extraction never fails.
pub fn extract_frontmatter(input: &str) -> FrontmatterExtraction {
    match find_block(strip_bom(input)) {
        Some((block, body)) => FrontmatterExtraction {
            data: parse_block(block),
            body: body.trim().to_string(),
        },
        None => FrontmatterExtraction {
            data: Map::new(),
            body: input.to_string(),
        },
    }
}

/// Renders frontmatter as `key: value` lines between `---` fences, followed
/// by a blank line. An empty mapping renders as an empty string.
///
/// Strings are written bare when YAML reads them back as the same string and
/// double-quoted otherwise (`#1 post`, `[draft]`, `true`, multi-line text).
/// Everything else is written as JSON. Either way the output extracts back to
/// the same mapping.
pub fn render_frontmatter(data: &Map<String, JsonValue>) -> String {
    if data.is_empty() {
        return String::new();
    }

    let mut out = String::from(FENCE);
    out.push('\n');
    for (key, value) in data {
        let rendered = match value {
            JsonValue::String(text) if reads_back_bare(text) => text.clone(),
            other => other.to_string(),
        };
        out.push_str(key);
        out.push_str(": ");
        out.push_str(&rendered);
        out.push('\n');
    }
    out.push_str(FENCE);
    out.push_str("\n\n");
    out
}

fn reads_back_bare(text: &str) -> bool {
    if text.contains(['\n', '\r']) {
        return false;
    }
    matches!(
        serde_yaml::from_str::<serde_yaml::Value>(text),
        Ok(serde_yaml::Value::String(read)) if read == text
    )
}

fn parse_block(block: &str) -> Map<String, JsonValue> {
    if block.trim().is_empty() {
        return Map::new();
    }

    match serde_yaml::from_str::<serde_yaml::Value>(block)
        .ok()
        .and_then(|yaml| serde_json::to_value(yaml).ok())
    {
        Some(JsonValue::Object(map)) => map,
        _ => {
            log::debug!("frontmatter is not a YAML mapping; reading it line by line");
            parse_lines(block)
        }
    }
}

fn parse_lines(block: &str) -> Map<String, JsonValue> {
    let mut data = Map::new();
    for line in block.lines() {
        let Some(colon) = line.find(':') else {
            continue;
        };
        if colon == 0 {
            continue;
        }
        let key = line[..colon].trim();
        let raw = line[colon + 1..].trim();
        let value = serde_json::from_str::<JsonValue>(raw)
            .unwrap_or_else(|_| JsonValue::String(raw.to_string()));
        data.insert(key.to_string(), value);
    }
    data
}

fn find_block(input: &str) -> Option<(&str, &str)> {
    let (first, mut cursor) = next_line(input, 0)?;
    if !is_fence(first) {
        return None;
    }

    let block_start = cursor;
    while let Some((line, next_cursor)) = next_line(input, cursor) {
        if is_fence(line) {
            let block = input[block_start..cursor].trim_end_matches(['\r', '\n']);
            return Some((block, &input[next_cursor..]));
        }
        cursor = next_cursor;
    }
    None
}

fn strip_bom(input: &str) -> &str {
    input.strip_prefix('\u{feff}').unwrap_or(input)
}

fn next_line(input: &str, start: usize) -> Option<(&str, usize)> {
    if start >= input.len() {
        return None;
    }

    let rest = &input[start..];
    match rest.find('\n') {
        Some(pos) => Some((&rest[..pos], start + pos + 1)),
        None => Some((rest, input.len())),
    }
}

fn is_fence(line: &str) -> bool {
    line.trim_end_matches('\r') == FENCE
}

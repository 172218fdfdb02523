const FENCE: &str = "```";

/// Classification of a single line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineClass<'a> {
    /// Whitespace only.
    Blank,
    /// ATX heading.
    Heading {
        /// Number of leading `#` characters.
        level: u8,
        /// Text after the markers, trimmed.
        text: &'a str,
    },
    /// Opening code fence.
    FenceOpen {
        /// Info string after the fence, if any.
        language: Option<&'a str>,
    },
    /// Blockquote line.
    Quote {
        /// Text after one `>`, trimmed.
        text: &'a str,
    },
    /// `- item`, `* item` or `+ item`.
    UnorderedItem {
        /// Item text, trimmed.
        text: &'a str,
    },
    /// `1. item`.
    OrderedItem {
        /// Item text, trimmed.
        text: &'a str,
    },
    /// `---`, `***`, `___` and longer runs.
    Delimiter,
    /// Paragraph text.
    Text,
}

impl LineClass<'_> {
    /// True for every class that opens its own block (everything except
    /// blank lines and plain text).
    pub fn starts_block(&self) -> bool {
        !matches!(self, LineClass::Blank | LineClass::Text)
    }
}

/// Classifies one line (without its line terminator).
///
/// Checks run in a fixed order and the first match wins:
///
/// 1. blank
/// 2. ATX heading (`#` to `######` followed by whitespace)
/// 3. code fence (trimmed line starts with three backticks)
/// 4. blockquote (`>` in the first column)
/// 5. unordered list item (`-`, `*` or `+` followed by whitespace)
/// 6. ordered list item (digits, `.`, whitespace)
/// 7. horizontal rule (the whole line is three or more of `-`, `*`, `_`)
/// 8. anything else is paragraph text
pub fn classify_line(line: &str) -> LineClass<'_> {
    if line.trim().is_empty() {
        return LineClass::Blank;
    }
    if let Some((level, text)) = heading(line) {
        return LineClass::Heading { level, text };
    }
    if is_fence_line(line) {
        let info = line.trim()[FENCE.len()..].trim();
        return LineClass::FenceOpen {
            language: (!info.is_empty()).then_some(info),
        };
    }
    if let Some(rest) = line.strip_prefix('>') {
        return LineClass::Quote { text: rest.trim() };
    }
    if let Some(text) = unordered_item(line) {
        return LineClass::UnorderedItem { text };
    }
    if let Some(text) = ordered_item(line) {
        return LineClass::OrderedItem { text };
    }
    if is_rule(line) {
        return LineClass::Delimiter;
    }
    LineClass::Text
}

/// True when the trimmed line starts with a backtick fence. Used both to
/// open and to close code blocks.
pub fn is_fence_line(line: &str) -> bool {
    line.trim().starts_with(FENCE)
}

fn heading(line: &str) -> Option<(u8, &str)> {
    let hashes = line.bytes().take_while(|b| *b == b'#').count();
    if hashes == 0 || hashes > 6 {
        return None;
    }
    let rest = &line[hashes..];
    if !rest.chars().next().is_some_and(char::is_whitespace) {
        return None;
    }
    Some((hashes as u8, rest.trim()))
}

fn unordered_item(line: &str) -> Option<&str> {
    let mut chars = line.chars();
    let marker = chars.next()?;
    if !matches!(marker, '-' | '*' | '+') {
        return None;
    }
    let space = chars.next().filter(|c| c.is_whitespace())?;
    let offset = marker.len_utf8() + space.len_utf8();
    Some(line[offset..].trim())
}

fn ordered_item(line: &str) -> Option<&str> {
    let digits = line.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    let rest = line[digits..].strip_prefix('.')?;
    let space = rest.chars().next().filter(|c| c.is_whitespace())?;
    Some(rest[space.len_utf8()..].trim())
}

fn is_rule(line: &str) -> bool {
    line.len() >= 3 && line.bytes().all(|b| matches!(b, b'-' | b'*' | b'_'))
}

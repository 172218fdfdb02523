use crate::block::{Block, BlockData, Document, ListStyle, now_millis};
use crate::classify::{LineClass, classify_line, is_fence_line};

/// Parses markdown into a block document stamped with the current time.
pub fn parse_markdown(markdown: &str) -> Document {
    parse_markdown_at(markdown, now_millis())
}

/// Short alias for [`parse_markdown`].
pub fn parse(markdown: &str) -> Document {
    parse_markdown(markdown)
}

/// Parses markdown into a block document with an explicit timestamp.
pub fn parse_markdown_at(markdown: &str, time: i64) -> Document {
    let lines: Vec<&str> = markdown
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect();
    let blocks = BlockParser::new(&lines).run();
    Document::new(blocks, time)
}

/// Cursor over the input lines plus the per-call block id counter.
struct BlockParser<'a> {
    lines: &'a [&'a str],
    cursor: usize,
    blocks: Vec<Block>,
}

impl<'a> BlockParser<'a> {
    fn new(lines: &'a [&'a str]) -> Self {
        Self {
            lines,
            cursor: 0,
            blocks: Vec::new(),
        }
    }

    fn run(mut self) -> Vec<Block> {
        while let Some(line) = self.peek() {
            match classify_line(line) {
                LineClass::Blank => self.cursor += 1,
                LineClass::Heading { level, text } => {
                    self.cursor += 1;
                    self.push(BlockData::heading(text, level));
                }
                LineClass::FenceOpen { language } => self.code(language),
                LineClass::Quote { .. } => self.quote(),
                LineClass::UnorderedItem { .. } => self.list(ListStyle::Unordered),
                LineClass::OrderedItem { .. } => self.list(ListStyle::Ordered),
                LineClass::Delimiter => {
                    self.cursor += 1;
                    self.push(BlockData::Delimiter);
                }
                LineClass::Text => self.paragraph(),
            }
        }
        self.blocks
    }

    fn peek(&self) -> Option<&'a str> {
        self.lines.get(self.cursor).copied()
    }

    fn push(&mut self, data: BlockData) {
        let index = self.blocks.len();
        self.blocks.push(Block::new(index, data));
    }

    fn code(&mut self, language: Option<&str>) {
        self.cursor += 1;
        let start = self.cursor;
        while self.peek().is_some_and(|line| !is_fence_line(line)) {
            self.cursor += 1;
        }
        // blank lines before the closing fence are part of the code
        let code = self.lines[start..self.cursor].join("\n");
        if self.peek().is_some() {
            // closing fence
            self.cursor += 1;
        }
        self.push(BlockData::code(code, language));
    }

    fn quote(&mut self) {
        let mut collected: Vec<&str> = Vec::new();
        while let Some(line) = self.peek() {
            match classify_line(line) {
                LineClass::Quote { text } => collected.push(text),
                LineClass::Blank => {
                    if !collected.is_empty() {
                        collected.push("");
                    }
                }
                _ => break,
            }
            self.cursor += 1;
        }
        let text = collected.join("\n");
        self.push(BlockData::quote(text.trim()));
    }

    fn list(&mut self, style: ListStyle) {
        let mut items = Vec::new();
        while let Some(line) = self.peek() {
            match (style, classify_line(line)) {
                (ListStyle::Unordered, LineClass::UnorderedItem { text })
                | (ListStyle::Ordered, LineClass::OrderedItem { text }) => {
                    items.push(text.to_string());
                }
                (_, LineClass::Blank) => {}
                _ => break,
            }
            self.cursor += 1;
        }
        self.push(BlockData::list(style, items));
    }

    fn paragraph(&mut self) {
        let start = self.cursor;
        while self
            .peek()
            .is_some_and(|line| classify_line(line) == LineClass::Text)
        {
            self.cursor += 1;
        }
        // leading indentation stays; dropping it could turn text into a marker
        let text = self.lines[start..self.cursor].join("\n");
        let text = text.trim_end();
        if !text.is_empty() {
            self.push(BlockData::paragraph(text));
        }
    }
}

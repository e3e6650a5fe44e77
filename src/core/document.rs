//! Source text → highlightable blocks → wrapped rows.
//!
//! Deliberately minimal: blank lines separate paragraphs, `#`-prefixed lines
//! are headings, and `-`/`*` list items start their own block.  Everything
//! else is joined into paragraphs and word-wrapped to the pane width.
//! Plain-text scripts skip all of that: every non-blank line is its own block.

use std::borrow::Cow;
use std::path::Path;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Source format of a script, picked from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptFormat {
    Markdown,
    Plain,
}

impl ScriptFormat {
    /// `.md`/`.markdown` or `.txt` (case-insensitive).  Anything else is not a
    /// script.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "md" | "markdown" => Some(Self::Markdown),
            "txt" => Some(Self::Plain),
            _ => None,
        }
    }
}

/// Decoded script text.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedText {
    pub text: String,
    /// Invalid UTF-8 sequences were replaced with U+FFFD.
    pub lossy: bool,
}

/// Decode raw script bytes as UTF-8, dropping a leading byte-order mark.
/// Invalid sequences are replaced rather than rejected.
pub fn decode(bytes: &[u8]) -> DecodedText {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    match String::from_utf8_lossy(bytes) {
        Cow::Borrowed(text) => DecodedText {
            text: text.to_owned(),
            lossy: false,
        },
        Cow::Owned(text) => DecodedText { text, lossy: true },
    }
}

/// Kind of a highlightable block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    /// Heading level 1–6.
    Heading(u8),
    Paragraph,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub kind: BlockKind,
    pub text: String,
}

/// Parsed document: blocks in reading order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    blocks: Vec<Block>,
}

impl Document {
    pub fn parse_as(source: &str, format: ScriptFormat) -> Self {
        match format {
            ScriptFormat::Markdown => Self::parse(source),
            ScriptFormat::Plain => Self::parse_plain(source),
        }
    }

    /// Markdown-ish script.
    pub fn parse(source: &str) -> Self {
        let source = strip_bom(source);
        let mut blocks = Vec::new();
        let mut paragraph = String::new();

        let flush = |paragraph: &mut String, blocks: &mut Vec<Block>| {
            if !paragraph.is_empty() {
                blocks.push(Block {
                    kind: BlockKind::Paragraph,
                    text: std::mem::take(paragraph),
                });
            }
        };

        for line in source.lines() {
            let line = line.trim();
            if line.is_empty() {
                flush(&mut paragraph, &mut blocks);
                continue;
            }
            if let Some((level, text)) = heading(line) {
                flush(&mut paragraph, &mut blocks);
                blocks.push(Block {
                    kind: BlockKind::Heading(level),
                    text: text.to_string(),
                });
                continue;
            }
            if line.starts_with("- ") || line.starts_with("* ") {
                flush(&mut paragraph, &mut blocks);
            }
            if !paragraph.is_empty() {
                paragraph.push(' ');
            }
            paragraph.push_str(line);
        }
        flush(&mut paragraph, &mut blocks);

        Self { blocks }
    }

    /// Plain text: one paragraph block per non-blank line, no markup.
    pub fn parse_plain(source: &str) -> Self {
        let blocks = strip_bom(source)
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| Block {
                kind: BlockKind::Paragraph,
                text: line.to_string(),
            })
            .collect();
        Self { blocks }
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

fn strip_bom(source: &str) -> &str {
    source.strip_prefix('\u{FEFF}').unwrap_or(source)
}

/// `## Title` → `(2, "Title")`.
fn heading(line: &str) -> Option<(u8, &str)> {
    let hashes = line.bytes().take_while(|&b| b == b'#').count();
    if hashes == 0 || hashes > 6 {
        return None;
    }
    let rest = line[hashes..].strip_prefix(' ')?;
    Some((hashes as u8, rest.trim()))
}

/// Greedy word wrap to `width` columns.  Words longer than a line are split.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();

        while word.len() > width {
            if current_len > 0 {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let rest = word.split_off(width);
            lines.push(word.into_iter().collect());
            word = rest;
        }
        if word.is_empty() {
            continue;
        }

        let needed = if current_len == 0 { word.len() } else { current_len + 1 + word.len() };
        if needed > width {
            lines.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if current_len > 0 {
            current.push(' ');
            current_len += 1;
        }
        current.extend(word.iter());
        current_len += word.len();
    }
    if current_len > 0 {
        lines.push(current);
    }
    lines
}

/// One text row of the laid-out document.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    /// Owning block, `None` for spacing rows.
    pub block: Option<usize>,
    pub text: String,
}

/// Row range occupied by one block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockSpan {
    pub kind: BlockKind,
    pub first_row: usize,
    pub row_count: usize,
}

/// A document wrapped to a fixed width.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Layout {
    pub rows: Vec<Row>,
    pub spans: Vec<BlockSpan>,
}

impl Layout {
    /// Wrap `doc` to `width` columns, with `lead_in` blank rows above the first
    /// block and below the last, and one blank row between blocks.
    pub fn build(doc: &Document, width: usize, lead_in: usize) -> Self {
        let mut rows: Vec<Row> = Vec::new();
        let mut spans = Vec::with_capacity(doc.blocks().len());
        let blank = || Row {
            block: None,
            text: String::new(),
        };

        rows.extend(std::iter::repeat_with(blank).take(lead_in));
        for (i, block) in doc.blocks().iter().enumerate() {
            if i > 0 {
                rows.push(blank());
            }
            let first_row = rows.len();
            let mut wrapped = wrap(&block.text, width);
            if wrapped.is_empty() {
                wrapped.push(String::new());
            }
            let row_count = wrapped.len();
            rows.extend(wrapped.into_iter().map(|text| Row {
                block: Some(i),
                text,
            }));
            spans.push(BlockSpan {
                kind: block.kind,
                first_row,
                row_count,
            });
        }
        rows.extend(std::iter::repeat_with(blank).take(lead_in));

        Self { rows, spans }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

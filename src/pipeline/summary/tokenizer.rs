//! Line-oriented tokenizer for summary responses.
//!
//! Markers only count at the very start of a line. A `# ` inside a line is
//! text, and so is `## `. No escaping exists, so a record value that itself
//! starts a line with `# ` will open a new section.

/// Top-level section heading marker.
pub const SECTION_MARKER: &str = "# ";

/// Event card heading marker.
pub const CARD_MARKER: &str = "### ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    SectionHeading,
    CardHeading,
    Text,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line<'a> {
    pub kind: LineKind,
    /// The whole line as written (no line terminator).
    pub raw: &'a str,
    /// Text after the marker for headings; the whole line for text.
    pub rest: &'a str,
}

/// Split text into classified lines. Handles `\n` and `\r\n`.
pub fn tokenize(text: &str) -> Vec<Line<'_>> {
    text.lines().map(classify_line).collect()
}

fn classify_line(raw: &str) -> Line<'_> {
    if let Some(rest) = raw.strip_prefix(SECTION_MARKER) {
        Line {
            kind: LineKind::SectionHeading,
            raw,
            rest,
        }
    } else if let Some(rest) = raw.strip_prefix(CARD_MARKER) {
        Line {
            kind: LineKind::CardHeading,
            raw,
            rest,
        }
    } else {
        Line {
            kind: LineKind::Text,
            raw,
            rest: raw,
        }
    }
}

use std::sync::LazyLock;

use regex::Regex;

use super::document::{Card, Field, ParsedDocument, Section, SectionBody};
use super::labels::{classify, LABEL_TERMINATOR};
use super::tokenizer::{tokenize, Line, LineKind, CARD_MARKER};

/// ISO calendar date inside a card heading. ASCII digits only.
static DATE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]{4}-[0-9]{2}-[0-9]{2}").unwrap());

const BULLET: &str = "- ";
const BOLD: &str = "**";

/// Parse a summary response into sections, cards and fields.
///
/// Total: every input, including the empty string, yields a document.
/// Malformed input degrades instead of failing:
/// - no `# ` headings: the whole text is one section titled by its first line
/// - no `### ` in a section body: the body stays prose, markup untouched
/// - no date in a card heading: the heading is kept as the title
/// - no `**:` in a field line: the line becomes an unlabeled generic field
pub fn parse_summary(text: &str) -> ParsedDocument {
    let lines = tokenize(text);
    let sections = split_blocks(&lines, LineKind::SectionHeading)
        .into_iter()
        .map(parse_section)
        .collect();
    ParsedDocument { sections }
}

/// A heading (or first non-blank line) and the lines under it.
struct Block<'t, 'a> {
    title: &'a str,
    body: &'t [Line<'a>],
}

/// Split `lines` at every line of kind `delimiter`, dropping blank blocks.
/// Lines before the first delimiter form a block titled by their first non-blank line.
fn split_blocks<'t, 'a>(lines: &'t [Line<'a>], delimiter: LineKind) -> Vec<Block<'t, 'a>> {
    let mut blocks = Vec::new();
    let mut heading: Option<&'a str> = None;
    let mut start = 0;

    for (idx, line) in lines.iter().enumerate() {
        if line.kind == delimiter {
            blocks.extend(make_block(heading, &lines[start..idx]));
            heading = Some(line.rest);
            start = idx + 1;
        }
    }
    blocks.extend(make_block(heading, &lines[start..]));
    blocks
}

fn make_block<'t, 'a>(heading: Option<&'a str>, body: &'t [Line<'a>]) -> Option<Block<'t, 'a>> {
    match heading {
        Some(title) => {
            if title.trim().is_empty() && body.iter().all(|l| l.raw.trim().is_empty()) {
                return None;
            }
            Some(Block {
                title: title.trim(),
                body,
            })
        }
        None => {
            let first = body.iter().position(|l| !l.raw.trim().is_empty())?;
            Some(Block {
                title: body[first].raw.trim(),
                body: &body[first + 1..],
            })
        }
    }
}

fn parse_section(block: Block<'_, '_>) -> Section {
    let text = join_lines(block.body);
    let body = if text.contains(CARD_MARKER) {
        SectionBody::Cards(
            split_blocks(block.body, LineKind::CardHeading)
                .into_iter()
                .map(parse_card)
                .collect(),
        )
    } else {
        SectionBody::PlainText(text)
    };

    Section {
        title: block.title.to_string(),
        body,
    }
}

fn parse_card(block: Block<'_, '_>) -> Card {
    let (title, date) = split_title_date(block.title);
    let fields = block
        .body
        .iter()
        .filter_map(|line| parse_field(line.raw))
        .collect();

    Card {
        title,
        date,
        fields,
    }
}

/// Pull the first date out of a card heading.
/// `"2023-10-15 入院记录"` becomes `("入院记录", Some("2023-10-15"))`.
fn split_title_date(title: &str) -> (String, Option<String>) {
    let Some(found) = DATE_PATTERN.find(title) else {
        return (title.to_string(), None);
    };

    let remaining = format!("{}{}", &title[..found.start()], &title[found.end()..]);
    let display = match remaining.trim() {
        "" => title,
        trimmed => trimmed,
    };
    (display.to_string(), Some(found.as_str().to_string()))
}

/// Turn one card body line into a field. Blank lines yield `None`.
fn parse_field(raw: &str) -> Option<Field> {
    let line = raw.trim_start();
    let line = line.strip_prefix(BULLET).unwrap_or(line).trim();
    if line.is_empty() {
        return None;
    }

    let kind = classify(line);
    let field = match line.split_once(LABEL_TERMINATOR) {
        Some((label, value)) => {
            let label = label.replace(BOLD, "");
            let label = label.trim();
            Field {
                kind,
                label: (!label.is_empty()).then(|| label.to_string()),
                value: value.trim().to_string(),
            }
        }
        None => Field {
            kind,
            label: None,
            value: line.replace(BOLD, "").trim().to_string(),
        },
    };
    Some(field)
}

fn join_lines(lines: &[Line<'_>]) -> String {
    lines
        .iter()
        .map(|l| l.raw)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

//! Range-bounded, whole-word symbol search over a document's text.

use lsp_types::Position;
use lspnav_core::constants::CONTEXT_RADIUS_LINES;
use lspnav_core::document::TextDocument;
use lspnav_core::error::QueryError;
use lspnav_core::types::SymbolQuery;
use regex::Regex;
use std::fmt;
use tracing::debug;

/// Inclusive, zero-based line range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineRange {
    pub start: u32,
    pub end: u32,
}

impl LineRange {
    /// Clamp optional 1-based bounds to `[1, line_count]` and convert to zero-based.
    /// Missing bounds default to the whole document.
    pub fn from_one_based(start: Option<i64>, end: Option<i64>, line_count: u32) -> Self {
        let last = i64::from(line_count.max(1));
        let clamp = |value: i64| -> u32 {
            // `last` fits in u32 and the clamp keeps the value within it.
            u32::try_from(value.clamp(1, last) - 1).unwrap_or(0)
        };
        Self {
            start: clamp(start.unwrap_or(1)),
            end: clamp(end.unwrap_or(last)),
        }
    }

    pub fn contains(&self, line: u32) -> bool {
        self.start <= line && line <= self.end
    }
}

impl fmt::Display for LineRange {
    /// Renders as 1-based `start-end`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start + 1, self.end + 1)
    }
}

/// Lines surrounding a located symbol, copied verbatim for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextWindow {
    pub label: String,
    pub language_id: String,
    /// 1-based, inclusive.
    pub start_line: u32,
    /// 1-based, inclusive.
    pub end_line: u32,
    pub lines: Vec<String>,
}

impl ContextWindow {
    /// Capture one line on each side of `line`, clamped to the document.
    pub fn capture(document: &TextDocument, label: &str, line: u32) -> Self {
        let first = line.saturating_sub(CONTEXT_RADIUS_LINES);
        let last = line
            .saturating_add(CONTEXT_RADIUS_LINES)
            .min(document.line_count().saturating_sub(1));
        let lines = (first..=last)
            .map(|l| document.line_text(l).to_string())
            .collect();
        Self {
            label: label.to_string(),
            language_id: document.language_id().to_string(),
            start_line: first + 1,
            end_line: last + 1,
            lines,
        }
    }

    fn range_label(&self) -> String {
        if self.start_line == self.end_line {
            self.start_line.to_string()
        } else {
            format!("{}-{}", self.start_line, self.end_line)
        }
    }
}

impl fmt::Display for ContextWindow {
    /// Fenced code block headed by `label:lines`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "```{}\n{}:{}\n\n{}\n```",
            self.language_id,
            self.label,
            self.range_label(),
            self.lines.join("\n")
        )
    }
}

/// Result of searching for a symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocateOutcome {
    Found {
        position: Position,
        context: ContextWindow,
    },
    NotFound {
        range: LineRange,
    },
}

/// Find the first whole-word occurrence of the query's symbol inside its line range.
pub fn locate_symbol(
    document: &TextDocument,
    query: &SymbolQuery,
) -> Result<LocateOutcome, QueryError> {
    let range = LineRange::from_one_based(
        query.start_line(),
        query.end_line(),
        document.line_count(),
    );
    let pattern = word_pattern(query.symbol())?;

    match first_match_in_range(document, &pattern, range) {
        Some(position) => {
            debug!(
                symbol = query.symbol(),
                uri = query.uri(),
                line = position.line,
                character = position.character,
                "Located symbol"
            );
            let context = ContextWindow::capture(document, query.uri(), position.line);
            Ok(LocateOutcome::Found { position, context })
        }
        None => {
            debug!(
                symbol = query.symbol(),
                uri = query.uri(),
                range = %range,
                "Symbol not found in range"
            );
            Ok(LocateOutcome::NotFound { range })
        }
    }
}

/// Literal, case-sensitive, word-bounded pattern for `symbol`.
fn word_pattern(symbol: &str) -> Result<Regex, QueryError> {
    Regex::new(&format!(r"\b{}\b", regex::escape(symbol))).map_err(|e| {
        QueryError::invalid_parameters(format!("Symbol cannot be searched: {e}"))
    })
}

/// Scan matches in document order and return the first whose line is in `range`.
///
/// The cursor always moves forward: an empty match bumps it by one character.
fn first_match_in_range(
    document: &TextDocument,
    pattern: &Regex,
    range: LineRange,
) -> Option<Position> {
    let text = document.text();
    let mut cursor = 0;
    while cursor <= text.len() {
        let m = pattern.find_at(text, cursor)?;
        let position = document.position_at(m.start());
        if range.contains(position.line) {
            return Some(position);
        }
        if position.line > range.end {
            return None;
        }
        cursor = if m.end() > cursor {
            m.end()
        } else {
            cursor + text[cursor..].chars().next().map_or(1, char::len_utf8)
        };
    }
    None
}

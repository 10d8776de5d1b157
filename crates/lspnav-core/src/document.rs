use lsp_types::Position;
use url::Url;

/// An in-memory snapshot of a text document.
///
/// Lines are split on `\n`; a trailing `\r` belongs to the line terminator and is
/// not part of the line text. Columns are counted in UTF-16 code units, the LSP
/// default position encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextDocument {
    uri: Url,
    language_id: String,
    text: String,
    line_starts: Vec<usize>,
}

impl TextDocument {
    pub fn new(uri: Url, language_id: impl Into<String>, text: impl Into<String>) -> Self {
        let text = text.into();
        let mut line_starts = vec![0];
        line_starts.extend(
            text.bytes()
                .enumerate()
                .filter(|(_, b)| *b == b'\n')
                .map(|(idx, _)| idx + 1),
        );
        Self {
            uri,
            language_id: language_id.into(),
            text,
            line_starts,
        }
    }

    pub fn uri(&self) -> &Url {
        &self.uri
    }

    pub fn language_id(&self) -> &str {
        &self.language_id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Number of lines; an empty document still has one (empty) line.
    pub fn line_count(&self) -> u32 {
        u32::try_from(self.line_starts.len()).unwrap_or(u32::MAX)
    }

    /// Text of a zero-based line without its terminator. Out-of-range lines are empty.
    pub fn line_text(&self, line: u32) -> &str {
        let idx = line as usize;
        let Some(&start) = self.line_starts.get(idx) else {
            return "";
        };
        let end = self
            .line_starts
            .get(idx + 1)
            .map(|next| next - 1)
            .unwrap_or(self.text.len());
        let raw = &self.text[start..end];
        raw.strip_suffix('\r').unwrap_or(raw)
    }

    /// Convert a byte offset into a zero-based position. Offsets past the end clamp
    /// to the end of the document.
    pub fn position_at(&self, offset: usize) -> Position {
        let offset = offset.min(self.text.len());
        let line = self.line_starts.partition_point(|&start| start <= offset) - 1;
        let line_start = self.line_starts[line];
        let prefix = self.text.get(line_start..offset).unwrap_or_default();
        Position {
            line: u32::try_from(line).unwrap_or(u32::MAX),
            character: u32::try_from(prefix.encode_utf16().count()).unwrap_or(u32::MAX),
        }
    }
}

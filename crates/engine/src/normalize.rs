//! Text normalization, run exactly once per document per chunking run.
//!
//! Normalization and separator choice are designed together: whitespace runs
//! collapse to a single space, a single `"\n"`, or a single `"\n\n"`, so the
//! newline separators the split rules depend on survive normalization intact.

use unicode_normalization::UnicodeNormalization;

use ragsplit_core::{ChunkError, LimitsConfig};

/// Cleaned content plus whether the length cap was applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
    pub content: String,
    /// Content exceeded `max_content_length` and was cut. A warning for the
    /// caller to surface, not an error.
    pub truncated: bool,
}

/// Clean raw extracted text: NFKC fold, newline unification, control-character
/// removal, whitespace collapsing, length capping.
///
/// Idempotent: `normalize(normalize(x)) == normalize(x)`.
pub fn normalize(raw: &str, limits: &LimitsConfig) -> Result<Normalized, ChunkError> {
    let folded: String = raw.nfkc().collect();
    let unified = folded.replace("\r\n", "\n").replace('\r', "\n");

    // Collapse each maximal whitespace run: no newline → " ", one newline →
    // "\n", two or more → "\n\n". Leading whitespace is dropped outright.
    let mut content = String::with_capacity(unified.len());
    let mut in_run = false;
    let mut run_newlines = 0usize;
    for ch in unified.chars() {
        if ch == '\n' {
            in_run = true;
            run_newlines += 1;
            continue;
        }
        if ch.is_whitespace() {
            in_run = true;
            continue;
        }
        if is_stripped_control(ch) {
            continue;
        }
        if in_run {
            if !content.is_empty() {
                match run_newlines {
                    0 => content.push(' '),
                    1 => content.push('\n'),
                    _ => content.push_str("\n\n"),
                }
            }
            in_run = false;
            run_newlines = 0;
        }
        content.push(ch);
    }
    // A trailing whitespace run is simply never flushed.

    let mut truncated = false;
    if content.chars().count() > limits.max_content_length {
        content = content.chars().take(limits.max_content_length).collect();
        // The cut may expose trailing whitespace; trim it so a second
        // normalization pass is a no-op.
        content.truncate(content.trim_end().len());
        truncated = true;
        tracing::warn!(
            limit = limits.max_content_length,
            "document content exceeds limit, truncated"
        );
    }

    let min = limits.min_content_length.max(1);
    let length = content.chars().count();
    if length < min {
        return Err(ChunkError::DocumentTooShort { length, min });
    }

    Ok(Normalized { content, truncated })
}

/// Non-printable characters removed during normalization. Tab and newline are
/// whitespace and handled by run collapsing instead.
fn is_stripped_control(ch: char) -> bool {
    (ch.is_control() && ch != '\n' && ch != '\t') || matches!(ch, '\u{FFFE}' | '\u{FFFF}')
}

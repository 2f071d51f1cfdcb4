//! Generic single-level recursive splitter.
//!
//! Turns one string into an ordered sequence of bounded spans given a target
//! size, an overlap amount, and a preferred separator. When a piece between
//! separators is itself too large, a fixed fallback chain of progressively
//! finer separators is walked until the empty separator slices at the size
//! boundary, which always terminates.
//!
//! All sizes and offsets are in characters, not bytes.

/// Fallback separators tried in order after the configured one. The order is
/// load-bearing: changing it moves chunk boundaries and breaks determinism
/// across versions, so it stays fixed.
const FALLBACK_SEPARATORS: &[&str] = &["\n\n", "\n", "。", ". ", " ", ""];

/// One emitted segment of a split pass.
///
/// `start`/`end` are character offsets of the segment's pre-overlap coverage
/// in the input text; `content` additionally carries the overlap prefix
/// copied from the previous segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub content: String,
    pub start: usize,
    pub end: usize,
}

/// Split `text` into ordered spans of at most `max_size` characters.
///
/// Pieces produced by the separator are greedily packed up to the merge
/// budget `max_size - overlap`, so every span stays within `max_size` even
/// after the overlap prefix is applied. Callers must have validated
/// `overlap < max_size` beforehand.
pub fn split(
    text: &str,
    max_size: usize,
    overlap: usize,
    separator: &str,
    keep_separator: bool,
) -> Vec<Span> {
    let chars: Vec<char> = text.chars().collect();
    if chars.is_empty() {
        return Vec::new();
    }
    if chars.len() <= max_size {
        return vec![Span {
            content: text.to_string(),
            start: 0,
            end: chars.len(),
        }];
    }

    let budget = max_size - overlap;
    let chain = separator_chain(separator);
    let mut atoms = Vec::new();
    atomize(&chars, 0, budget, &chain, keep_separator, &mut atoms);
    let packed = pack_atoms(&chars, &atoms, budget);
    apply_overlap(packed, overlap)
}

/// The configured separator followed by the fallbacks, deduplicated. An empty
/// configured separator degenerates to pure fixed-width slicing.
fn separator_chain(configured: &str) -> Vec<&str> {
    if configured.is_empty() {
        return vec![""];
    }
    let mut chain = vec![configured];
    chain.extend(
        FALLBACK_SEPARATORS
            .iter()
            .copied()
            .filter(|s| *s != configured),
    );
    chain
}

/// Reduce `chars` to atoms no longer than `budget`, appending `(start, end)`
/// ranges (absolute, offset by `base`) to `out`. Tries each separator in
/// `chain` in order; pieces still too large recurse with the remainder of the
/// chain; the empty separator slices at the budget width.
fn atomize(
    chars: &[char],
    base: usize,
    budget: usize,
    chain: &[&str],
    keep_separator: bool,
    out: &mut Vec<(usize, usize)>,
) {
    if chars.len() <= budget {
        if !chars.is_empty() {
            out.push((base, base + chars.len()));
        }
        return;
    }

    let mut sep_chars: Vec<char> = Vec::new();
    let mut rest: &[&str] = &[];
    for (i, sep) in chain.iter().enumerate() {
        if sep.is_empty() {
            break;
        }
        let candidate: Vec<char> = sep.chars().collect();
        if find(chars, &candidate, 0).is_some() {
            sep_chars = candidate;
            rest = &chain[i + 1..];
            break;
        }
    }

    if sep_chars.is_empty() {
        // No separator applies: cut at the size boundary regardless of content.
        let mut i = 0;
        while i < chars.len() {
            let end = (i + budget).min(chars.len());
            out.push((base + i, base + end));
            i = end;
        }
        return;
    }

    let sep_len = sep_chars.len();
    let mut piece_start = 0;
    let mut cursor = 0;
    while let Some(pos) = find(chars, &sep_chars, cursor) {
        let piece_end = if keep_separator { pos + sep_len } else { pos };
        emit_piece(chars, base, piece_start, piece_end, budget, rest, keep_separator, out);
        piece_start = pos + sep_len;
        cursor = piece_start;
    }
    emit_piece(chars, base, piece_start, chars.len(), budget, rest, keep_separator, out);
}

/// Emit one piece: as an atom when it fits, otherwise recursing down the
/// remaining chain. Zero-length pieces (consecutive separators with
/// `keep_separator` off) are dropped.
#[allow(clippy::too_many_arguments)]
fn emit_piece(
    chars: &[char],
    base: usize,
    start: usize,
    end: usize,
    budget: usize,
    rest: &[&str],
    keep_separator: bool,
    out: &mut Vec<(usize, usize)>,
) {
    if end <= start {
        return;
    }
    let piece = &chars[start..end];
    if piece.len() <= budget {
        out.push((base + start, base + end));
    } else if rest.is_empty() {
        let mut i = start;
        while i < end {
            let cut = (i + budget).min(end);
            out.push((base + i, base + cut));
            i = cut;
        }
    } else {
        atomize(piece, base + start, budget, rest, keep_separator, out);
    }
}

/// First occurrence of `needle` in `haystack` at or after `from`.
fn find(haystack: &[char], needle: &[char], from: usize) -> Option<usize> {
    if needle.is_empty() || haystack.len() < needle.len() {
        return None;
    }
    (from..=haystack.len() - needle.len()).find(|&i| haystack[i..i + needle.len()] == *needle)
}

/// Greedily accumulate consecutive atoms into buffers of at most `budget`
/// characters. This merges many small semantic pieces into near-full chunks
/// instead of emitting one chunk per piece.
fn pack_atoms(chars: &[char], atoms: &[(usize, usize)], budget: usize) -> Vec<Span> {
    let mut out = Vec::new();
    let mut buf = String::new();
    let mut buf_len = 0usize;
    let mut buf_start = 0usize;
    let mut buf_end = 0usize;

    for &(start, end) in atoms {
        let len = end - start;
        if buf_len > 0 && buf_len + len > budget {
            out.push(Span {
                content: std::mem::take(&mut buf),
                start: buf_start,
                end: buf_end,
            });
            buf_len = 0;
        }
        if buf_len == 0 {
            buf_start = start;
        }
        buf.extend(chars[start..end].iter());
        buf_len += len;
        buf_end = end;
    }
    if buf_len > 0 {
        out.push(Span {
            content: buf,
            start: buf_start,
            end: buf_end,
        });
    }
    out
}

/// Prefix every span after the first with the trailing `overlap` characters
/// of the previous span's content. Pure concatenation: the copied characters
/// are not re-split, and offsets keep describing the pre-overlap coverage.
fn apply_overlap(spans: Vec<Span>, overlap: usize) -> Vec<Span> {
    if overlap == 0 || spans.len() < 2 {
        return spans;
    }
    let mut out: Vec<Span> = Vec::with_capacity(spans.len());
    let mut prev_tail = String::new();
    for (k, mut span) in spans.into_iter().enumerate() {
        if k > 0 {
            span.content = format!("{prev_tail}{}", span.content);
        }
        prev_tail = tail_chars(&span.content, overlap);
        out.push(span);
    }
    out
}

/// Last `n` characters of `s` (all of it when shorter).
fn tail_chars(s: &str, n: usize) -> String {
    let count = s.chars().count();
    if count <= n {
        s.to_string()
    } else {
        s.chars().skip(count - n).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_overlap_property(spans: &[Span], overlap: usize) {
        for pair in spans.windows(2) {
            let tail = tail_chars(&pair[0].content, overlap);
            let head: String = pair[1].content.chars().take(tail.chars().count()).collect();
            assert_eq!(tail, head, "adjacent spans must share {overlap} chars");
        }
    }

    #[test]
    fn short_text_is_a_single_span() {
        let spans = split("short text", 100, 10, "\n\n", true);
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].content, "short text");
        assert_eq!((spans[0].start, spans[0].end), (0, 10));
    }

    #[test]
    fn empty_text_yields_nothing() {
        assert!(split("", 10, 0, " ", true).is_empty());
    }

    #[test]
    fn splits_at_separator_and_discards_it() {
        let spans = split("Alpha beta.\n\nGamma delta epsilon.\n\nZeta.", 20, 0, "\n\n", false);
        let contents: Vec<&str> = spans.iter().map(|s| s.content.as_str()).collect();
        assert_eq!(contents, vec!["Alpha beta.", "Gamma delta epsilon.", "Zeta."]);
        // Spans exclude the dropped separators.
        assert_eq!((spans[0].start, spans[0].end), (0, 11));
        assert_eq!((spans[1].start, spans[1].end), (13, 33));
        assert_eq!((spans[2].start, spans[2].end), (35, 40));
    }

    #[test]
    fn keep_separator_retains_it_as_suffix() {
        let spans = split("aaaa\nbbbb\ncccc", 5, 0, "\n", true);
        let contents: Vec<&str> = spans.iter().map(|s| s.content.as_str()).collect();
        assert_eq!(contents, vec!["aaaa\n", "bbbb\n", "cccc"]);
    }

    #[test]
    fn greedy_packing_merges_small_pieces() {
        let spans = split("a\nbb\ncc\nddddd\ne", 6, 0, "\n", false);
        let contents: Vec<&str> = spans.iter().map(|s| s.content.as_str()).collect();
        // "a"+"bb"+"cc" = 5 fits; "ddddd" would overflow and starts a new buffer.
        assert_eq!(contents, vec!["abbcc", "ddddde"]);
    }

    #[test]
    fn coverage_is_gapless_with_kept_separators() {
        let text = "First paragraph here.\n\nSecond paragraph is a bit longer.\n\nThird one.\nWith a line break.";
        let spans = split(text, 30, 0, "\n\n", true);
        assert!(spans.len() > 1);
        let mut expected_start = 0;
        let mut rebuilt = String::new();
        for span in &spans {
            assert_eq!(span.start, expected_start, "spans must be contiguous");
            expected_start = span.end;
            rebuilt.push_str(&span.content);
        }
        assert_eq!(expected_start, text.chars().count());
        assert_eq!(rebuilt, text);
    }

    #[test]
    fn size_bound_holds_after_overlap() {
        let text = "word ".repeat(100);
        for &(max, overlap) in &[(20, 0), (20, 5), (32, 10), (7, 3)] {
            let spans = split(&text, max, overlap, " ", true);
            for span in &spans {
                assert!(
                    span.content.chars().count() <= max,
                    "span of {} chars exceeds max {max}",
                    span.content.chars().count()
                );
            }
            assert_overlap_property(&spans, overlap);
        }
    }

    #[test]
    fn overlap_prefixes_previous_tail() {
        let spans = split("Gamma delta epsilon.", 8, 2, " ", false);
        let contents: Vec<&str> = spans.iter().map(|s| s.content.as_str()).collect();
        assert_eq!(contents, vec!["Gamma", "madelta", "taepsilo", "lon."]);
        assert_overlap_property(&spans, 2);
    }

    #[test]
    fn first_span_has_no_leading_overlap() {
        let spans = split("aaaa bbbb cccc", 6, 2, " ", false);
        assert_eq!(spans[0].content, "aaaa");
        assert_eq!(spans[0].start, 0);
    }

    #[test]
    fn empty_separator_slices_fixed_width() {
        let spans = split("abcdefghij", 4, 1, "", false);
        // Step is max - overlap = 3.
        let contents: Vec<&str> = spans.iter().map(|s| s.content.as_str()).collect();
        assert_eq!(contents, vec!["abc", "cdef", "fghi", "ij"]);
        assert_eq!((spans[1].start, spans[1].end), (3, 6));
        assert_overlap_property(&spans, 1);
    }

    #[test]
    fn oversized_piece_falls_back_to_finer_separators() {
        // No "\n\n" present; the chain falls through to single newlines.
        let spans = split("one two three\nfour five six\nseven", 15, 0, "\n\n", false);
        assert!(spans.len() > 1);
        for span in &spans {
            assert!(span.content.chars().count() <= 15);
        }
    }

    #[test]
    fn atomic_token_longer_than_limit_is_cut() {
        let spans = split("tiny supercalifragilistic end", 10, 0, " ", false);
        for span in &spans {
            assert!(span.content.chars().count() <= 10);
        }
        let rebuilt: String = spans.iter().map(|s| s.content.as_str()).collect();
        assert!(rebuilt.contains("supercalifragilistic"));
    }

    #[test]
    fn cjk_sentence_separator_is_in_the_chain() {
        let text = "第一句话内容。第二句话内容。第三句话内容。";
        let spans = split(text, 8, 0, "\n\n", true);
        for span in &spans {
            assert!(span.content.chars().count() <= 8);
        }
        let rebuilt: String = spans.iter().map(|s| s.content.as_str()).collect();
        assert_eq!(rebuilt, text);
    }

    #[test]
    fn consecutive_separators_produce_no_empty_spans() {
        let spans = split("a  b  c  d  e  f", 3, 0, " ", false);
        for span in &spans {
            assert!(!span.content.is_empty());
        }
    }

    #[test]
    fn deterministic_across_calls() {
        let text = "Some moderately long text.\n\nWith paragraphs.\nAnd lines. And sentences too.";
        let a = split(text, 24, 6, "\n\n", true);
        let b = split(text, 24, 6, "\n\n", true);
        assert_eq!(a, b);
    }
}

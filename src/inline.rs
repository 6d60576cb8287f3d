use crate::block::Span;

const TICK: u8 = b'`';
const BOLD_DELIMITERS: [&[u8]; 2] = [b"**", b"__"];
const ITALIC_DELIMITERS: [u8; 2] = [b'*', b'_'];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Construct {
    Bold,
    Italic,
    Code,
}

/// A matched construct: `open` and `close` are the byte offsets of the
/// opening and closing delimiters, each `width` bytes long.
#[derive(Debug, Clone, Copy)]
struct Match {
    construct: Construct,
    open: usize,
    close: usize,
    width: usize,
}

/// Tokenize one line of text into inline spans.
///
/// Each iteration looks for a bold span anywhere in the unconsumed rest of
/// the line, then an italic span, then a code span, and takes the first
/// construct kind that matches. Text before the match is kept literally;
/// scanning resumes after the closing delimiter. Unmatched delimiters stay
/// in the surrounding text.
pub fn tokenize_inline(line: &str) -> Vec<Span> {
    let bytes = line.as_bytes();
    let mut spans = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        let Some(m) = find_bold(bytes, pos)
            .or_else(|| find_italic(bytes, pos))
            .or_else(|| find_code(bytes, pos))
        else {
            break;
        };

        if m.open > pos {
            spans.push(Span::Text(line[pos..m.open].to_string()));
        }

        // Delimiters are ASCII, so these offsets are char boundaries.
        let inner = line[m.open + m.width..m.close].to_string();
        spans.push(match m.construct {
            Construct::Bold => Span::Bold(vec![Span::Text(inner)]),
            Construct::Italic => Span::Italic(vec![Span::Text(inner)]),
            Construct::Code => Span::Code(inner),
        });

        pos = m.close + m.width;
    }

    if pos < bytes.len() {
        spans.push(Span::Text(line[pos..].to_string()));
    }

    spans
}

/// If a well-formed code span opens at `i`, returns the offset of its closing backtick.
fn code_span_end(bytes: &[u8], i: usize) -> Option<usize> {
    if bytes.get(i) != Some(&TICK) {
        return None;
    }
    let close = i + 1 + bytes[i + 1..].iter().position(|&b| b == TICK)?;
    (close > i + 1).then_some(close)
}

/// Offsets from `from` onwards, skipping over complete code spans.
fn outside_code(bytes: &[u8], from: usize) -> impl Iterator<Item = usize> + '_ {
    let mut i = from;
    std::iter::from_fn(move || {
        while i < bytes.len() {
            if let Some(end) = code_span_end(bytes, i) {
                i = end + 1;
                continue;
            }
            i += 1;
            return Some(i - 1);
        }
        None
    })
}

fn find_bold(bytes: &[u8], pos: usize) -> Option<Match> {
    for open in outside_code(bytes, pos) {
        let Some(delim) = BOLD_DELIMITERS
            .into_iter()
            .find(|d| bytes[open..].starts_with(d))
        else {
            continue;
        };

        // Shortest non-empty span: the first closer at least one byte past the opener.
        let close = outside_code(bytes, open + delim.len())
            .find(|&i| i > open + delim.len() && bytes[i..].starts_with(delim));
        if let Some(close) = close {
            return Some(Match {
                construct: Construct::Bold,
                open,
                close,
                width: delim.len(),
            });
        }
    }
    None
}

fn find_italic(bytes: &[u8], pos: usize) -> Option<Match> {
    for open in outside_code(bytes, pos) {
        let c = bytes[open];
        if !ITALIC_DELIMITERS.contains(&c) {
            continue;
        }
        // A marker touching another of its kind belongs to a `**`/`__` run.
        if open > pos && bytes[open - 1] == c {
            continue;
        }
        if bytes.get(open + 1) == Some(&c) {
            continue;
        }

        let close = outside_code(bytes, open + 1).find(|&i| i > open + 1 && bytes[i] == c);
        if let Some(close) = close {
            return Some(Match {
                construct: Construct::Italic,
                open,
                close,
                width: 1,
            });
        }
    }
    None
}

fn find_code(bytes: &[u8], pos: usize) -> Option<Match> {
    (pos..bytes.len()).find_map(|open| {
        code_span_end(bytes, open).map(|close| Match {
            construct: Construct::Code,
            open,
            close,
            width: 1,
        })
    })
}

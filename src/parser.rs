use tracing::{debug, trace};

use crate::block::{Block, List};
use crate::inline::tokenize_inline;

const FENCE: &str = "```";

/// Parse document text into a list of blocks.
///
/// Never fails: anything that does not match a block form becomes a
/// paragraph, and an unterminated code fence keeps its buffered lines.
pub fn parse_blocks(text: &str) -> Vec<Block> {
    let mut state = ParseState::default();

    for line in text.split('\n') {
        process_line(line, &mut state);
    }

    state.finish()
}

#[derive(Default)]
struct ParseState {
    blocks: Vec<Block>,

    // Code block state
    in_code_block: bool,
    code_language: Option<String>,
    code_lines: Vec<String>,

    // List state
    pending_list: Option<ListBuilder>,
}

struct ListBuilder {
    ordered: bool,
    items: Vec<String>,
}

impl ParseState {
    fn push(&mut self, block: Block) {
        trace!(kind = ?block.kind(), "emit block");
        self.blocks.push(block);
    }

    fn flush_list(&mut self) {
        if let Some(list) = self.pending_list.take() {
            let items = list.items.iter().map(|item| tokenize_inline(item)).collect();
            self.push(Block::List(List {
                ordered: list.ordered,
                items,
            }));
        }
    }

    fn push_list_item(&mut self, ordered: bool, content: &str) {
        if self.pending_list.as_ref().map(|list| list.ordered) != Some(ordered) {
            self.flush_list();
            self.pending_list = Some(ListBuilder {
                ordered,
                items: Vec::new(),
            });
        }
        if let Some(list) = self.pending_list.as_mut() {
            list.items.push(content.to_string());
        }
    }

    fn open_code_block(&mut self, info: &str) {
        self.flush_list();
        self.in_code_block = true;
        let info = info.trim();
        self.code_language = (!info.is_empty()).then(|| info.to_string());
    }

    fn close_code_block(&mut self) {
        self.flush_list();
        self.in_code_block = false;
        let language = self.code_language.take();
        let lines = std::mem::take(&mut self.code_lines);
        self.push(Block::CodeBlock { language, lines });
    }

    fn finish(mut self) -> Vec<Block> {
        self.flush_list();

        if self.in_code_block && !self.code_lines.is_empty() {
            debug!(
                lines = self.code_lines.len(),
                "unterminated code fence, keeping buffered lines"
            );
            self.close_code_block();
        }

        debug!(blocks = self.blocks.len(), "parsed document");
        self.blocks
    }
}

fn process_line(line: &str, state: &mut ParseState) {
    // Code fences
    if let Some(info) = line.strip_prefix(FENCE) {
        if state.in_code_block {
            state.close_code_block();
        } else {
            state.open_code_block(info);
        }
        return;
    }

    if state.in_code_block {
        state.code_lines.push(line.to_string());
        return;
    }

    // Headings
    if let Some((level, content)) = match_heading(line) {
        state.flush_list();
        state.push(Block::Heading {
            level,
            content: tokenize_inline(content),
        });
        return;
    }

    // List items
    if let Some(content) = match_unordered_item(line) {
        state.push_list_item(false, content);
        return;
    }
    if let Some(content) = match_ordered_item(line) {
        state.push_list_item(true, content);
        return;
    }

    // Horizontal rule
    if is_rule(line) {
        state.flush_list();
        state.push(Block::Rule);
        return;
    }

    // Blank lines only end lists
    if line.trim().is_empty() {
        state.flush_list();
        return;
    }

    state.flush_list();
    state.push(Block::Paragraph {
        content: tokenize_inline(line),
    });
}

/// Whitespace separator then content, the way `\s+.+` splits.
///
/// The run of whitespace is taken greedily. When nothing follows it, the
/// last whitespace char is the content, as long as one char precedes it.
fn after_separator(rest: &str) -> Option<&str> {
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let content = rest.trim_start();
    if !content.is_empty() {
        return Some(content);
    }
    let (last, _) = rest.char_indices().last()?;
    (last > 0).then(|| &rest[last..])
}

/// `#{1,6}`, whitespace, content.
fn match_heading(line: &str) -> Option<(u8, &str)> {
    let level = line.bytes().take_while(|&b| b == b'#').count();
    if !(1..=6).contains(&level) {
        return None;
    }
    let content = after_separator(&line[level..])?;
    Some((level as u8, content))
}

/// Optional indent, `-` or `*`, whitespace, content.
fn match_unordered_item(line: &str) -> Option<&str> {
    let rest = line.trim_start();
    let rest = rest.strip_prefix('-').or_else(|| rest.strip_prefix('*'))?;
    after_separator(rest)
}

/// Optional indent, digits, `.`, whitespace, content.
fn match_ordered_item(line: &str) -> Option<&str> {
    let rest = line.trim_start();
    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    let rest = rest[digits..].strip_prefix('.')?;
    after_separator(rest)
}

/// Three or more of `-`, `*`, `_` (mixed) and nothing else.
fn is_rule(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.len() >= 3 && trimmed.bytes().all(|b| matches!(b, b'-' | b'*' | b'_'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::Span;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn text(s: &str) -> Vec<Span> {
        vec![Span::Text(s.to_string())]
    }

    fn heading(level: u8, s: &str) -> Block {
        Block::Heading {
            level,
            content: text(s),
        }
    }

    fn paragraph(s: &str) -> Block {
        Block::Paragraph { content: text(s) }
    }

    fn list(ordered: bool, items: &[&str]) -> Block {
        Block::List(List {
            ordered,
            items: items.iter().map(|item| text(item)).collect(),
        })
    }

    fn code(language: Option<&str>, lines: &[&str]) -> Block {
        Block::CodeBlock {
            language: language.map(str::to_string),
            lines: lines.iter().map(|line| line.to_string()).collect(),
        }
    }

    #[test]
    fn empty_input() {
        assert_eq!(parse_blocks(""), vec![]);
        assert_eq!(parse_blocks("\n  \n\t\n"), vec![]);
    }

    #[test]
    fn heading_then_paragraph() {
        assert_eq!(
            parse_blocks("# Title\n\nSome text"),
            vec![heading(1, "Title"), paragraph("Some text")]
        );
    }

    #[rstest]
    #[case("# a", 1)]
    #[case("## a", 2)]
    #[case("### a", 3)]
    #[case("#### a", 4)]
    #[case("##### a", 5)]
    #[case("###### a", 6)]
    #[case("##\ta", 2)]
    #[case("#    a", 1)]
    fn heading_levels(#[case] input: &str, #[case] level: u8) {
        assert_eq!(parse_blocks(input), vec![heading(level, "a")]);
    }

    #[rstest]
    #[case::too_deep("####### a")]
    #[case::no_space("#a")]
    #[case::lone_space("## ")]
    fn not_headings(#[case] input: &str) {
        assert_eq!(parse_blocks(input), vec![paragraph(input)]);
    }

    #[test]
    fn heading_content_is_tokenized() {
        assert_eq!(
            parse_blocks("## The `parse` **call**"),
            vec![Block::Heading {
                level: 2,
                content: vec![
                    Span::Text("The `parse` ".to_string()),
                    Span::Bold(text("call")),
                ],
            }]
        );
    }

    #[test]
    fn lists_split_by_blank_line_and_style() {
        assert_eq!(
            parse_blocks("- a\n- b\n\n1. x\n2. y"),
            vec![list(false, &["a", "b"]), list(true, &["x", "y"])]
        );
    }

    #[test]
    fn bullet_style_switch_starts_new_list() {
        assert_eq!(
            parse_blocks("- a\n1. b\n* c\n  - d"),
            vec![list(false, &["a"]), list(true, &["b"]), list(false, &["c", "d"])]
        );
    }

    #[test]
    fn ordered_numbers_are_discarded() {
        assert_eq!(
            parse_blocks("7. x\n3. y\n10. z"),
            vec![list(true, &["x", "y", "z"])]
        );
    }

    #[test]
    fn paragraph_ends_list() {
        assert_eq!(
            parse_blocks("- a\ntext\n- b"),
            vec![list(false, &["a"]), paragraph("text"), list(false, &["b"])]
        );
    }

    #[test]
    fn heading_ends_list() {
        assert_eq!(
            parse_blocks("1. a\n# H"),
            vec![list(true, &["a"]), heading(1, "H")]
        );
    }

    #[test]
    fn list_items_are_tokenized() {
        assert_eq!(
            parse_blocks("* *it* and `c`"),
            vec![Block::List(List {
                ordered: false,
                items: vec![vec![
                    Span::Italic(text("it")),
                    Span::Text(" and ".to_string()),
                    Span::Code("c".to_string()),
                ]],
            })]
        );
    }

    #[test]
    fn code_block() {
        assert_eq!(
            parse_blocks("```rust\nlet x = 1;\n  # not a heading\n- not a list\n```"),
            vec![code(
                Some("rust"),
                &["let x = 1;", "  # not a heading", "- not a list"]
            )]
        );
    }

    #[test]
    fn code_block_keeps_blank_lines_and_whitespace() {
        assert_eq!(
            parse_blocks("```\n  a  \n\n\tb\n```"),
            vec![code(None, &["  a  ", "", "\tb"])]
        );
    }

    #[test]
    fn empty_closed_code_block_is_emitted() {
        assert_eq!(parse_blocks("```\n```"), vec![code(None, &[])]);
    }

    #[test]
    fn fence_ends_list() {
        assert_eq!(
            parse_blocks("- a\n```\nx\n```\n- b"),
            vec![list(false, &["a"]), code(None, &["x"]), list(false, &["b"])]
        );
    }

    #[test]
    fn unterminated_fence_is_recovered() {
        assert_eq!(parse_blocks("```\ncode line"), vec![code(None, &["code line"])]);
    }

    #[test]
    fn unterminated_empty_fence_is_dropped() {
        assert_eq!(parse_blocks("text\n```"), vec![paragraph("text")]);
    }

    #[test]
    fn indented_fence_is_not_a_fence() {
        assert_eq!(parse_blocks("  ```"), vec![paragraph("  ```")]);
    }

    #[rstest]
    #[case("***")]
    #[case("---")]
    #[case("___")]
    #[case("-_*-")]
    #[case("  -----  ")]
    fn rules(#[case] input: &str) {
        assert_eq!(parse_blocks(input), vec![Block::Rule]);
    }

    #[test]
    fn spaced_bullets_are_a_list_not_a_rule() {
        assert_eq!(parse_blocks("- - -"), vec![list(false, &["- -"])]);
    }

    #[test]
    fn bold_line_is_not_a_rule() {
        assert_eq!(
            parse_blocks("** not a rule **"),
            vec![Block::Paragraph {
                content: vec![Span::Bold(text(" not a rule "))],
            }]
        );
    }

    #[test]
    fn rule_ends_list() {
        assert_eq!(
            parse_blocks("- a\n---\n- b"),
            vec![list(false, &["a"]), Block::Rule, list(false, &["b"])]
        );
    }

    #[test]
    fn each_line_is_its_own_paragraph() {
        assert_eq!(
            parse_blocks("one\ntwo"),
            vec![paragraph("one"), paragraph("two")]
        );
    }

    #[test]
    fn whitespace_after_separator_counts_as_content() {
        assert_eq!(parse_blocks("##   "), vec![heading(2, " ")]);
        assert_eq!(parse_blocks("#\t\t"), vec![heading(1, "\t")]);
        assert_eq!(parse_blocks("-  "), vec![list(false, &[" "])]);
        assert_eq!(parse_blocks("1.  "), vec![list(true, &[" "])]);
    }

    #[test]
    fn single_space_after_marker_is_not_content() {
        assert_eq!(parse_blocks("- "), vec![paragraph("- ")]);
        assert_eq!(parse_blocks("1. "), vec![paragraph("1. ")]);
    }

    #[test]
    fn bullet_without_content_is_a_paragraph() {
        assert_eq!(parse_blocks("-"), vec![paragraph("-")]);
        assert_eq!(parse_blocks("1."), vec![paragraph("1.")]);
    }
}

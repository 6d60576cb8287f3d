use docmark::{Block, BlockKind, List, Span, blocks_to_markdown, parse_blocks, tokenize_inline};
use pretty_assertions::assert_eq;
use rstest::rstest;

const GUIDE: &str = "\
# Getting started

Install the tool with `cargo install`, then run it.
It reads **one file** at a time and *never* touches the network.

## Options
- `--output` picks the file
- `--format` picks the renderer
1. first
2. second

```toml
[page]
numbers = true
```
---
* trailing
* list
####### not a heading
";

fn kinds(blocks: &[Block]) -> Vec<BlockKind> {
    blocks.iter().map(Block::kind).collect()
}

#[rstest]
#[case::guide(GUIDE)]
#[case::empty("")]
#[case::lists("- a\n- b\n\n- c\n1. x\n* y")]
#[case::adjacent_headings("# a\n## b\n### c")]
#[case::rules("***\n---\n___")]
#[case::unterminated_fence("text\n```rust\nfn main() {}\n")]
#[case::tricky_inline("**a** *b* `c` ****\n_x_ __y__\n** not a rule **")]
#[case::indented_items("  - a\n    - b\n  3. c")]
#[case::whitespace_only_content("##   \n-  \n\n1.  ")]
fn written_blocks_reparse_to_same_structure(#[case] input: &str) {
    let blocks = parse_blocks(input);
    let reparsed = parse_blocks(&blocks_to_markdown(&blocks));
    assert_eq!(kinds(&reparsed), kinds(&blocks));
}

#[rstest]
#[case(GUIDE)]
#[case("")]
#[case("\n\n\n")]
#[case("a\nb\nc")]
#[case("```")]
#[case("```\n```\n```\n```")]
fn block_count_bounded_by_line_count(#[case] input: &str) {
    let lines = input.split('\n').count();
    assert!(parse_blocks(input).len() <= lines + 1);
}

#[test]
fn guide_structure() {
    assert_eq!(
        kinds(&parse_blocks(GUIDE)),
        vec![
            BlockKind::Heading(1),
            BlockKind::Paragraph,
            BlockKind::Paragraph,
            BlockKind::Heading(2),
            BlockKind::List { ordered: false },
            BlockKind::List { ordered: true },
            BlockKind::CodeBlock,
            BlockKind::Rule,
            BlockKind::List { ordered: false },
            BlockKind::Paragraph,
        ]
    );
}

#[test]
fn mixed_inline_line() {
    assert_eq!(
        tokenize_inline("**bold** and *italic* and `code`"),
        vec![
            Span::Bold(vec![Span::Text("bold".to_string())]),
            Span::Text(" and ".to_string()),
            Span::Italic(vec![Span::Text("italic".to_string())]),
            Span::Text(" and ".to_string()),
            Span::Code("code".to_string()),
        ]
    );
}

#[test]
fn two_lists() {
    let item = |s: &str| vec![Span::Text(s.to_string())];
    assert_eq!(
        parse_blocks("- a\n- b\n\n1. x\n2. y"),
        vec![
            Block::List(List {
                ordered: false,
                items: vec![item("a"), item("b")],
            }),
            Block::List(List {
                ordered: true,
                items: vec![item("x"), item("y")],
            }),
        ]
    );
}

#[test]
fn parses_are_independent() {
    let first = parse_blocks(GUIDE);
    let second = parse_blocks(GUIDE);
    assert_eq!(first, second);
}

#[test]
fn parses_on_many_threads() {
    let expected = parse_blocks(GUIDE);
    let handles: Vec<_> = (0..4)
        .map(|_| std::thread::spawn(|| parse_blocks(GUIDE)))
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}

#[test]
fn json_dump() {
    let json = docmark::markdown_to_json("# Hi\n---").unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value[0]["type"], "heading");
    assert_eq!(value[0]["content"][0]["value"], "Hi");
    assert_eq!(value[1]["type"], "rule");
}

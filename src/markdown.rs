//! Writes a block tree back out in the restricted Markdown dialect.
//!
//! Blocks are separated by one blank line, so a written document parses back
//! into the same sequence of block kinds. Text runs are written verbatim.

use crate::block::{Block, Span};

pub fn blocks_to_markdown(blocks: &[Block]) -> String {
    let mut out = String::new();

    for (i, block) in blocks.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        emit_block(block, &mut out);
    }

    out
}

fn emit_block(block: &Block, out: &mut String) {
    match block {
        Block::Heading { level, content } => {
            out.push_str(&"#".repeat(usize::from(*level)));
            out.push(' ');
            spans_to_markdown(content, out);
            out.push('\n');
        }
        Block::Paragraph { content } => {
            spans_to_markdown(content, out);
            out.push('\n');
        }
        Block::CodeBlock { language, lines } => {
            out.push_str("```");
            if let Some(lang) = language {
                out.push_str(lang);
            }
            out.push('\n');
            for line in lines {
                out.push_str(line);
                out.push('\n');
            }
            out.push_str("```\n");
        }
        Block::List(list) => {
            for (n, item) in list.items.iter().enumerate() {
                if list.ordered {
                    out.push_str(&format!("{}. ", n + 1));
                } else {
                    out.push_str("- ");
                }
                spans_to_markdown(item, out);
                out.push('\n');
            }
        }
        Block::Rule => out.push_str("---\n"),
    }
}

fn spans_to_markdown(spans: &[Span], out: &mut String) {
    for span in spans {
        match span {
            Span::Text(text) => out.push_str(text),
            Span::Bold(inner) => {
                out.push_str("**");
                spans_to_markdown(inner, out);
                out.push_str("**");
            }
            // `_` never reads as a list bullet at the start of a line
            Span::Italic(inner) => {
                out.push('_');
                spans_to_markdown(inner, out);
                out.push('_');
            }
            Span::Code(text) => {
                out.push('`');
                out.push_str(text);
                out.push('`');
            }
        }
    }
}

use serde::Serialize;

/// Inline text spans with formatting
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Span {
    Text(String),
    Bold(Vec<Span>),
    Italic(Vec<Span>),
    /// Verbatim, never re-tokenized
    Code(String),
}

impl Span {
    /// Plain text of the span with all delimiters stripped.
    pub fn plain_text(&self) -> String {
        match self {
            Span::Text(text) | Span::Code(text) => text.clone(),
            Span::Bold(inner) | Span::Italic(inner) => inner.iter().map(Span::plain_text).collect(),
        }
    }
}

/// A list (ordered or unordered). Numbering is never stored; renderers count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct List {
    pub ordered: bool,
    pub items: Vec<Vec<Span>>,
}

/// Block-level elements parsed from the document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Heading {
        level: u8,
        content: Vec<Span>,
    },
    Paragraph {
        content: Vec<Span>,
    },
    CodeBlock {
        /// Info string after the opening fence
        language: Option<String>,
        lines: Vec<String>,
    },
    List(List),
    Rule,
}

/// Discriminant of a [`Block`], for comparing document structure without content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Heading(u8),
    Paragraph,
    CodeBlock,
    List { ordered: bool },
    Rule,
}

impl Block {
    pub fn kind(&self) -> BlockKind {
        match self {
            Block::Heading { level, .. } => BlockKind::Heading(*level),
            Block::Paragraph { .. } => BlockKind::Paragraph,
            Block::CodeBlock { .. } => BlockKind::CodeBlock,
            Block::List(list) => BlockKind::List {
                ordered: list.ordered,
            },
            Block::Rule => BlockKind::Rule,
        }
    }
}

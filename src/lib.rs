mod block;
mod catalog;
mod config;
mod error;
mod inline;
mod markdown;
mod parser;
mod typst;

pub use block::{Block, BlockKind, List, Span};
pub use catalog::{Catalog, MenuEntry, Page, Section, Selection};
pub use config::{Config, LayoutConfig, PageConfig};
pub use error::Error;
pub use inline::tokenize_inline;
pub use markdown::blocks_to_markdown;
pub use parser::parse_blocks;

use typst_as_lib::TypstEngine;
use typst_as_lib::typst_kit_options::TypstKitFontOptions;
use typst_pdf::PdfOptions;

/// Parse document text into a vector of blocks.
pub fn parse(markdown: &str) -> Vec<Block> {
    parse_blocks(markdown)
}

/// Convert markdown to Typst markup using default config.
pub fn markdown_to_typst(markdown: &str) -> String {
    markdown_to_typst_with_config(markdown, &Config::compiled_default())
}

/// Convert markdown to Typst markup with custom config.
pub fn markdown_to_typst_with_config(markdown: &str, config: &Config) -> String {
    let blocks = parse(markdown);
    typst::blocks_to_typst(&blocks, config)
}

/// Convert markdown to PDF bytes using default config.
pub fn markdown_to_pdf(markdown: &str) -> Result<Vec<u8>, Error> {
    markdown_to_pdf_with_config(markdown, &Config::compiled_default())
}

/// Convert markdown to PDF bytes with custom config.
pub fn markdown_to_pdf_with_config(markdown: &str, config: &Config) -> Result<Vec<u8>, Error> {
    use typst_library::layout::PagedDocument;

    let typst_content = markdown_to_typst_with_config(markdown, config);

    let font_options = TypstKitFontOptions::new()
        .include_embedded_fonts(true)
        .include_system_fonts(false);

    let engine = TypstEngine::builder()
        .main_file(typst_content)
        .search_fonts_with(font_options)
        .build();

    let doc: PagedDocument = engine
        .compile()
        .output
        .map_err(|e| Error::Compile(format!("{:?}", e)))?;

    typst_pdf::pdf(&doc, &PdfOptions::default()).map_err(|e| Error::Pdf(format!("{:?}", e)))
}

/// Dump the parsed block tree as pretty-printed JSON.
pub fn markdown_to_json(markdown: &str) -> Result<String, Error> {
    Ok(serde_json::to_string_pretty(&parse(markdown))?)
}

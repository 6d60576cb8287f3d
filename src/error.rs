use std::path::PathBuf;

/// Errors from the surfaces around the parser. Parsing itself never fails.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config: {0}")]
    Config(#[from] toml::de::Error),
    #[error("Invalid page catalog: {0}")]
    Catalog(#[source] serde_json::Error),
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("No page with path {0} in catalog")]
    UnknownPage(String),
    #[error("Page {path} has no section {anchor}")]
    UnknownSection { path: String, anchor: String },
    #[error("Typst compilation failed: {0}")]
    Compile(String),
    #[error("PDF generation failed: {0}")]
    Pdf(String),
}

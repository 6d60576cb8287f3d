//! Page catalog consumed by the page/section picker.
//!
//! The catalog is produced elsewhere and handed over as a JSON array of
//! pages. Nothing here reorders or validates it; rows are listed in catalog
//! order.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub id: String,
    /// Heading tag the section came from, e.g. `h2`
    pub tag: String,
    pub title: String,
    pub anchor: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub path: String,
    pub file: String,
    pub title: String,
    #[serde(default)]
    pub sections: Vec<Section>,
    #[serde(default)]
    pub internal_links: Vec<String>,
}

/// What the picker reports when the user picks a row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Selection {
    pub path: String,
    pub anchor: Option<String>,
}

impl Selection {
    pub fn page(page: &Page) -> Self {
        Self {
            path: page.path.clone(),
            anchor: None,
        }
    }

    pub fn section(page: &Page, section: &Section) -> Self {
        Self {
            path: page.path.clone(),
            anchor: Some(section.anchor.clone()),
        }
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.path, self.anchor.as_deref().unwrap_or_default())
    }
}

/// One row of the flattened picker menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuEntry<'a> {
    Page {
        page: &'a Page,
        current: bool,
    },
    Section {
        page: &'a Page,
        section: &'a Section,
        current: bool,
    },
}

impl MenuEntry<'_> {
    pub fn selection(&self) -> Selection {
        match self {
            MenuEntry::Page { page, .. } => Selection::page(page),
            MenuEntry::Section { page, section, .. } => Selection::section(page, section),
        }
    }

    pub fn is_current(&self) -> bool {
        match self {
            MenuEntry::Page { current, .. } | MenuEntry::Section { current, .. } => *current,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    pub pages: Vec<Page>,
}

impl Catalog {
    pub fn new(pages: Vec<Page>) -> Self {
        Self { pages }
    }

    pub fn from_json(json: &str) -> Result<Self, Error> {
        let catalog: Self = serde_json::from_str(json).map_err(Error::Catalog)?;
        debug!(pages = catalog.pages.len(), "loaded page catalog");
        Ok(catalog)
    }

    pub fn load(path: &Path) -> Result<Self, Error> {
        let content = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn page(&self, path: &str) -> Option<&Page> {
        self.pages.iter().find(|page| page.path == path)
    }

    /// The page matching `path`, falling back to the first page.
    pub fn current_page(&self, path: &str) -> Option<&Page> {
        self.page(path).or_else(|| self.pages.first())
    }

    /// Label for the picker button: the current path plus any anchor.
    pub fn display_text(&self, path: &str, anchor: Option<&str>) -> String {
        let Some(page) = self.current_page(path) else {
            return "/".to_string();
        };
        let mut text = page.path.clone();
        if let Some(anchor) = anchor {
            text.push_str(anchor);
        }
        text
    }

    /// Picker rows in catalog order: each page followed by its sections.
    pub fn entries(&self, path: &str, anchor: Option<&str>) -> Vec<MenuEntry<'_>> {
        let mut entries = Vec::new();
        for page in &self.pages {
            let on_page = page.path == path;
            // A page with sections gives up the mark to a selected section.
            entries.push(MenuEntry::Page {
                page,
                current: on_page && (page.sections.is_empty() || anchor.is_none_or(str::is_empty)),
            });
            for section in &page.sections {
                entries.push(MenuEntry::Section {
                    page,
                    section,
                    current: on_page && anchor == Some(section.anchor.as_str()),
                });
            }
        }
        entries
    }

    /// Pick the page at `path`, or one of its sections when `anchor` is set.
    ///
    /// An empty anchor means the page itself.
    pub fn select(&self, path: &str, anchor: Option<&str>) -> Result<Selection, Error> {
        let page = self
            .page(path)
            .ok_or_else(|| Error::UnknownPage(path.to_string()))?;

        match anchor.filter(|anchor| !anchor.is_empty()) {
            None => Ok(Selection::page(page)),
            Some(anchor) => page
                .sections
                .iter()
                .find(|section| section.anchor == anchor)
                .map(|section| Selection::section(page, section))
                .ok_or_else(|| Error::UnknownSection {
                    path: path.to_string(),
                    anchor: anchor.to_string(),
                }),
        }
    }

    /// The source file of the page at `path`.
    pub fn resolve_file(&self, path: &str) -> Option<&str> {
        self.page(path).map(|page| page.file.as_str())
    }
}

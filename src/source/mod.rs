pub mod bundled;
pub mod cache;
pub mod directory;
pub mod loader;
pub mod remote;

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identifier of a category (study level), e.g. `n5`. Stored lowercase.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CategoryId(String);

impl CategoryId {
    pub fn new(id: &str) -> Self {
        Self(id.trim().to_ascii_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn label(&self) -> String {
        self.0.to_ascii_uppercase()
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub word: String,
    #[serde(default)]
    pub reading: Option<String>,
    pub meaning: String,
    #[serde(default)]
    pub example: Option<String>,
}

/// A category's items in their fixed source order. Reordering the source
/// list reshuffles every past day.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Category {
    pub id: CategoryId,
    pub items: Vec<Item>,
}

impl Category {
    pub fn new(id: CategoryId, items: Vec<Item>) -> Self {
        Self { id, items }
    }

    pub fn empty(id: CategoryId) -> Self {
        Self {
            id,
            items: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("no item list for category `{0}`")]
    NotFound(CategoryId),
    #[error("failed to read item list: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed item list: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("download failed: {0}")]
    Download(String),
}

pub trait ItemSource: Send + Sync {
    fn fetch(&self, id: &CategoryId) -> Result<Vec<Item>, SourceError>;
}

/// Parse a JSON item list and normalize it: trims fields, drops entries
/// without a word or meaning, and turns blank optional fields into `None`.
pub fn parse_items(json: &[u8]) -> Result<Vec<Item>, SourceError> {
    let raw: Vec<Item> = serde_json::from_slice(json)?;
    Ok(raw.into_iter().filter_map(normalize_item).collect())
}

fn normalize_item(item: Item) -> Option<Item> {
    let word = item.word.trim().to_string();
    let meaning = item.meaning.trim().to_string();
    if word.is_empty() || meaning.is_empty() {
        return None;
    }
    let optional = |field: Option<String>| {
        field
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    };
    Some(Item {
        word,
        meaning,
        reading: optional(item.reading),
        example: optional(item.example),
    })
}

/// Fetch a category, degrading any failure to an empty list.
pub fn load_or_empty(source: &dyn ItemSource, id: &CategoryId) -> Category {
    match source.fetch(id) {
        Ok(items) => {
            log::info!("loaded {} items for category {id}", items.len());
            Category::new(id.clone(), items)
        }
        Err(err) => {
            log::warn!("category {id} unavailable, showing it as empty: {err}");
            Category::empty(id.clone())
        }
    }
}

use rust_embed::Embed;

use crate::source::{CategoryId, Item, ItemSource, SourceError, parse_items};

#[derive(Embed)]
#[folder = "assets/items/"]
struct ItemAssets;

/// Item lists compiled into the binary.
pub struct BundledSource;

impl BundledSource {
    pub fn available_categories() -> Vec<CategoryId> {
        let mut ids: Vec<CategoryId> = ItemAssets::iter()
            .filter_map(|f| f.strip_suffix(".json").map(CategoryId::new))
            .collect();
        ids.sort();
        ids
    }
}

impl ItemSource for BundledSource {
    fn fetch(&self, id: &CategoryId) -> Result<Vec<Item>, SourceError> {
        let file = ItemAssets::get(&format!("{id}.json"))
            .ok_or_else(|| SourceError::NotFound(id.clone()))?;
        parse_items(file.data.as_ref())
    }
}

use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::engine::calendar::WeekStart;
use crate::engine::selector::category_salt;
use crate::source::CategoryId;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_epoch")]
    pub epoch: NaiveDate,
    #[serde(default = "default_categories")]
    pub categories: Vec<String>,
    #[serde(default = "default_category")]
    pub default_category: String,
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default)]
    pub week_start: WeekStart,
    #[serde(default = "default_share_base_url")]
    pub share_base_url: String,
    #[serde(default = "default_items_dir")]
    pub items_dir: String,
    #[serde(default)]
    pub items_url: Option<String>,
    #[serde(default = "default_auto_reveal")]
    pub auto_reveal: bool,
    #[serde(default = "default_reveal_delay_ms")]
    pub reveal_delay_ms: u64,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 1, 1).unwrap_or_default()
}
fn default_categories() -> Vec<String> {
    ["n5", "n4", "n3", "n2", "n1"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}
fn default_category() -> String {
    "n5".to_string()
}
fn default_theme() -> String {
    "catppuccin-mocha".to_string()
}
fn default_share_base_url() -> String {
    String::new()
}
fn default_items_dir() -> String {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("dailyword")
        .join("items")
        .to_string_lossy()
        .to_string()
}
fn default_auto_reveal() -> bool {
    true
}
fn default_reveal_delay_ms() -> u64 {
    700
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            epoch: default_epoch(),
            categories: default_categories(),
            default_category: default_category(),
            theme: default_theme(),
            week_start: WeekStart::default(),
            share_base_url: default_share_base_url(),
            items_dir: default_items_dir(),
            items_url: None,
            auto_reveal: default_auto_reveal(),
            reveal_delay_ms: default_reveal_delay_ms(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            let mut config: Config = toml::from_str(&content)?;
            config.normalize();
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("dailyword")
            .join("config.toml")
    }

    pub fn category_ids(&self) -> Vec<CategoryId> {
        self.categories.iter().map(|c| CategoryId::new(c)).collect()
    }

    pub fn default_category_id(&self) -> CategoryId {
        CategoryId::new(&self.default_category)
    }

    /// Resolve a user-supplied category name against the configured list.
    pub fn find_category(&self, name: &str) -> Option<CategoryId> {
        let wanted = CategoryId::new(name);
        self.category_ids().into_iter().find(|id| *id == wanted)
    }

    /// Repair values that would leave the app without a usable category.
    /// Blank or duplicate entries are dropped, as is any entry whose seed
    /// salt is already taken by an earlier one (it would repeat that
    /// category's daily order). An empty list is restored to the defaults
    /// and an unknown default falls back to the first entry.
    pub fn normalize(&mut self) {
        let mut seen: Vec<(CategoryId, u32)> = Vec::new();
        self.categories.retain(|c| {
            let id = CategoryId::new(c);
            if id.as_str().is_empty() || seen.iter().any(|(other, _)| *other == id) {
                return false;
            }
            let salt = category_salt(&id);
            if let Some((other, _)) = seen.iter().find(|(_, s)| *s == salt) {
                log::warn!("dropping category {id}: its seed salt collides with {other}");
                return false;
            }
            seen.push((id, salt));
            true
        });
        if self.categories.is_empty() {
            self.categories = default_categories();
        }
        if self.find_category(&self.default_category).is_none() {
            self.default_category = self.categories[0].clone();
        }
        if self.reveal_delay_ms == 0 {
            self.reveal_delay_ms = default_reveal_delay_ms();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_serde_defaults_from_empty() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.epoch, NaiveDate::from_ymd_opt(2026, 1, 1).unwrap());
        assert_eq!(config.categories, vec!["n5", "n4", "n3", "n2", "n1"]);
        assert_eq!(config.default_category, "n5");
        assert_eq!(config.week_start, WeekStart::Sunday);
        assert!(config.items_url.is_none());
        assert!(config.items_dir.contains("items"));
    }

    #[test]
    fn test_config_partial_file() {
        let toml_str = r#"
epoch = "2025-04-01"
week_start = "monday"
share_base_url = "https://words.example/"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.epoch, NaiveDate::from_ymd_opt(2025, 4, 1).unwrap());
        assert_eq!(config.week_start, WeekStart::Monday);
        assert_eq!(config.share_base_url, "https://words.example/");
        assert_eq!(config.reveal_delay_ms, 700);
        assert!(config.auto_reveal);
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let config = Config::default();
        let serialized = toml::to_string_pretty(&config).unwrap();
        let deserialized: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(config.epoch, deserialized.epoch);
        assert_eq!(config.categories, deserialized.categories);
        assert_eq!(config.items_dir, deserialized.items_dir);
    }

    #[test]
    fn test_normalize_unknown_default_category() {
        let mut config = Config::default();
        config.categories = vec!["N3".to_string(), "n2".to_string()];
        config.default_category = "n9".to_string();
        config.normalize();
        assert_eq!(config.default_category, "N3");
        assert_eq!(config.default_category_id(), CategoryId::new("n3"));
    }

    #[test]
    fn test_normalize_empty_categories_restores_defaults() {
        let mut config = Config::default();
        config.categories = vec![" ".to_string()];
        config.normalize();
        assert_eq!(config.categories, default_categories());
        assert_eq!(config.default_category, "n5");
    }

    #[test]
    fn test_normalize_drops_duplicates() {
        let mut config = Config::default();
        config.categories = vec!["n5".to_string(), "N5".to_string(), "n4".to_string()];
        config.normalize();
        assert_eq!(config.categories, vec!["n5", "n4"]);
    }

    #[test]
    fn test_normalize_drops_salt_collisions() {
        let mut config = Config::default();
        config.categories = vec!["c2x".to_string(), "n5".to_string(), "dmb".to_string()];
        config.default_category = "dmb".to_string();
        config.normalize();
        assert_eq!(config.categories, vec!["c2x", "n5"]);
        assert_eq!(config.default_category, "c2x");
    }

    #[test]
    fn test_find_category_ignores_case() {
        let config = Config::default();
        assert_eq!(config.find_category("N2"), Some(CategoryId::new("n2")));
        assert_eq!(config.find_category("n7"), None);
    }
}

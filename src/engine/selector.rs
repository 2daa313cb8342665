use chrono::NaiveDate;

use crate::engine::cycle::{CycleIndex, index_for};
use crate::engine::navigator::Navigator;
use crate::engine::shuffle::shuffle;
use crate::source::{Category, CategoryId, Item};

/// Multiplier applied to the cycle number. Salts live below it, so two
/// categories with different salts never share a seed within a cycle.
pub const SEED_STRIDE: u32 = 65_536;
/// Salts are the low 16 bits of the hash, `0..SALT_RANGE`.
pub const SALT_RANGE: u32 = SEED_STRIDE;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Selection {
    Item(Item),
    /// The category has no items. A normal display state.
    Unavailable,
}

impl Selection {
    pub fn item(&self) -> Option<&Item> {
        match self {
            Selection::Item(item) => Some(item),
            Selection::Unavailable => None,
        }
    }
}

/// Stable per-category salt: low 16 bits of the 32-bit FNV-1a of the
/// identifier. Distinct ids can still collide; [`Config::normalize`] drops
/// later categories whose salt is already taken.
///
/// [`Config::normalize`]: crate::config::Config::normalize
pub fn category_salt(id: &CategoryId) -> u32 {
    let mut hash: u32 = 0x811C_9DC5;
    for byte in id.as_str().bytes() {
        hash ^= u32::from(byte);
        hash = hash.wrapping_mul(0x0100_0193);
    }
    hash & (SALT_RANGE - 1)
}

pub fn seed_for(cycle: u32, id: &CategoryId) -> u32 {
    cycle
        .wrapping_mul(SEED_STRIDE)
        .wrapping_add(category_salt(id))
}

/// Item shown for `date` in `category`. The date is clamped into the
/// navigator's range first.
pub fn selection_for(nav: &Navigator, date: NaiveDate, category: &Category) -> Selection {
    if category.is_empty() {
        return Selection::Unavailable;
    }
    let date = nav.clamp(date);
    let CycleIndex { cycle, position } = match index_for(date, nav.epoch(), category.items.len())
    {
        Ok(index) => index,
        Err(err) => {
            // clamp() keeps date >= epoch and the list is non-empty here.
            log::warn!("no index for {date} in {}: {err}", category.id);
            return Selection::Unavailable;
        }
    };

    let shuffled = shuffle(&category.items, seed_for(cycle, &category.id));
    shuffled
        .into_iter()
        .nth(position)
        .map(Selection::Item)
        .unwrap_or(Selection::Unavailable)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use std::sync::Arc;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn item(word: &str) -> Item {
        Item {
            word: word.to_string(),
            reading: None,
            meaning: word.to_lowercase(),
            example: None,
        }
    }

    fn category(id: &str, words: &[&str]) -> Category {
        Category::new(CategoryId::new(id), words.iter().map(|w| item(w)).collect())
    }

    fn nav() -> Navigator {
        Navigator::new(d(2026, 1, 1), Arc::new(FixedClock::new(d(2026, 6, 30))))
    }

    #[test]
    fn salts_differ_for_default_levels() {
        let salts: Vec<u32> = ["n1", "n2", "n3", "n4", "n5"]
            .iter()
            .map(|id| category_salt(&CategoryId::new(id)))
            .collect();
        let mut unique = salts.clone();
        unique.sort_unstable();
        unique.dedup();
        assert_eq!(unique.len(), salts.len());
        assert!(salts.iter().all(|&s| s < SALT_RANGE));
    }

    #[test]
    fn seed_combines_cycle_and_salt() {
        let id = CategoryId::new("n3");
        assert_eq!(seed_for(0, &id), 57_126);
        assert_eq!(seed_for(1, &id), SEED_STRIDE + 57_126);
    }

    #[test]
    fn colliding_ids_share_a_salt() {
        // Found by brute force over three-character ids.
        let a = CategoryId::new("c2x");
        let b = CategoryId::new("dmb");
        assert_eq!(category_salt(&a), 19_336);
        assert_eq!(category_salt(&a), category_salt(&b));
    }

    #[test]
    fn short_ids_get_distinct_salts() {
        let a = CategoryId::new("da");
        let b = CategoryId::new("j0");
        assert_ne!(category_salt(&a), category_salt(&b));
    }

    #[test]
    fn empty_category_is_unavailable() {
        let empty = Category::empty(CategoryId::new("n1"));
        assert_eq!(
            selection_for(&nav(), d(2026, 2, 1), &empty),
            Selection::Unavailable
        );
    }

    #[test]
    fn repeated_calls_agree() {
        let cat = category("n5", &["A", "B", "C", "D", "E", "F", "G"]);
        let nav = nav();
        for offset in 0..40 {
            let date = d(2026, 1, 1) + chrono::Duration::days(offset);
            assert_eq!(
                selection_for(&nav, date, &cat),
                selection_for(&nav, date, &cat)
            );
        }
    }

    #[test]
    fn each_cycle_shows_every_item_once() {
        let words = ["A", "B", "C", "D", "E"];
        let cat = category("n4", &words);
        let nav = nav();
        for cycle in 0..4i64 {
            let mut seen: Vec<String> = (0..5)
                .map(|p| {
                    let date = d(2026, 1, 1) + chrono::Duration::days(cycle * 5 + p);
                    selection_for(&nav, date, &cat).item().unwrap().word.clone()
                })
                .collect();
            seen.sort();
            assert_eq!(seen, words.iter().map(|w| w.to_string()).collect::<Vec<_>>());
        }
    }

    #[test]
    fn dates_outside_range_are_clamped() {
        let cat = category("n5", &["A", "B", "C"]);
        let nav = nav();
        assert_eq!(
            selection_for(&nav, d(2025, 12, 25), &cat),
            selection_for(&nav, d(2026, 1, 1), &cat)
        );
        assert_eq!(
            selection_for(&nav, d(2027, 1, 1), &cat),
            selection_for(&nav, d(2026, 6, 30), &cat)
        );
    }

    #[test]
    fn golden_three_item_example() {
        // Day 0 is cycle 0 position 0; day 3 is cycle 1 position 0.
        let cat = category("n5", &["X", "Y", "Z"]);
        let nav = nav();
        let word = |date| selection_for(&nav, date, &cat).item().unwrap().word.clone();
        assert_eq!(word(d(2026, 1, 1)), "X");
        assert_eq!(word(d(2026, 1, 4)), "Y");
    }
}

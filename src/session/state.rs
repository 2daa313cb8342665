use std::collections::HashMap;

use chrono::NaiveDate;

use crate::engine::navigator::Navigator;
use crate::engine::selector::{Selection, selection_for};
use crate::source::{Category, CategoryId};

/// What is on screen for one category and date. Rebuilt from scratch on
/// every change, never patched.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectionState {
    pub category: CategoryId,
    pub date: NaiveDate,
    pub selection: Selection,
    pub day_number: i64,
}

impl SelectionState {
    pub fn resolve(nav: &Navigator, category: &Category, date: NaiveDate) -> Self {
        let date = nav.clamp(date);
        Self {
            category: category.id.clone(),
            date,
            selection: selection_for(nav, date, category),
            day_number: nav.day_number(date),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadState {
    Loading { category: CategoryId, generation: u64 },
    Ready,
}

/// Ask the caller to fetch `category`; answer with
/// [`Session::items_loaded`] carrying the same generation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadRequest {
    pub category: CategoryId,
    pub generation: u64,
}

pub struct Session {
    nav: Navigator,
    loaded: HashMap<CategoryId, Category>,
    load: LoadState,
    generation: u64,
    category: CategoryId,
    date: NaiveDate,
    current: Option<SelectionState>,
}

impl Session {
    /// Starts in the loading state for `category`.
    pub fn new(nav: Navigator, category: CategoryId, date: NaiveDate) -> (Self, LoadRequest) {
        let date = nav.clamp(date);
        let mut session = Self {
            nav,
            loaded: HashMap::new(),
            load: LoadState::Ready,
            generation: 0,
            category: category.clone(),
            date,
            current: None,
        };
        let request = session.begin_load(category);
        (session, request)
    }

    pub fn navigator(&self) -> &Navigator {
        &self.nav
    }

    pub fn category(&self) -> &CategoryId {
        &self.category
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.load, LoadState::Loading { .. })
    }

    /// `None` while the current category is loading.
    pub fn current(&self) -> Option<&SelectionState> {
        self.current.as_ref()
    }

    pub fn is_at_start(&self) -> bool {
        self.nav.is_at_start(self.date)
    }

    pub fn is_at_today(&self) -> bool {
        self.nav.is_at_today(self.date)
    }

    fn begin_load(&mut self, category: CategoryId) -> LoadRequest {
        self.generation += 1;
        self.current = None;
        self.load = LoadState::Loading {
            category: category.clone(),
            generation: self.generation,
        };
        LoadRequest {
            category,
            generation: self.generation,
        }
    }

    fn resolve(&mut self) {
        self.date = self.nav.clamp(self.date);
        if self.is_loading() {
            self.current = None;
            return;
        }
        self.current = self
            .loaded
            .get(&self.category)
            .map(|category| SelectionState::resolve(&self.nav, category, self.date));
    }

    /// Switch category. Returns a load request when its items are not in
    /// memory yet.
    pub fn switch_category(&mut self, id: CategoryId) -> Option<LoadRequest> {
        self.category = id.clone();
        if self.loaded.contains_key(&id) {
            self.load = LoadState::Ready;
            self.resolve();
            None
        } else {
            Some(self.begin_load(id))
        }
    }

    /// Deliver loaded items. Returns true when they belong to the pending
    /// request and the selection was recomputed; stale deliveries are kept
    /// in memory but change nothing on screen.
    pub fn items_loaded(&mut self, generation: u64, category: Category) -> bool {
        let pending = match &self.load {
            LoadState::Loading {
                category: id,
                generation: g,
            } => *g == generation && *id == category.id,
            LoadState::Ready => false,
        };
        if !pending {
            log::debug!(
                "dropping stale load of {} (generation {generation})",
                category.id
            );
            self.loaded.entry(category.id.clone()).or_insert(category);
            return false;
        }

        self.loaded.insert(category.id.clone(), category);
        self.load = LoadState::Ready;
        self.resolve();
        true
    }

    pub fn select_date(&mut self, date: NaiveDate) {
        self.date = date;
        self.resolve();
    }

    pub fn step(&mut self, delta: i64) {
        self.date = self.nav.step(self.date, delta);
        self.resolve();
    }

    pub fn go_today(&mut self) {
        self.select_date(self.nav.today());
    }

    pub fn go_start(&mut self) {
        self.select_date(self.nav.epoch());
    }

    /// Recompute after the clock may have moved past midnight.
    pub fn refresh(&mut self) {
        self.resolve();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::source::Item;
    use std::sync::Arc;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn category(id: &str, n: usize) -> Category {
        let items = (0..n)
            .map(|i| Item {
                word: format!("{id}-{i}"),
                reading: None,
                meaning: format!("meaning {i}"),
                example: None,
            })
            .collect();
        Category::new(CategoryId::new(id), items)
    }

    fn nav() -> Navigator {
        Navigator::new(d(2026, 1, 1), Arc::new(FixedClock::new(d(2026, 4, 1))))
    }

    fn ready_session(id: &str, n: usize, date: NaiveDate) -> Session {
        let (mut session, req) = Session::new(nav(), CategoryId::new(id), date);
        assert!(session.items_loaded(req.generation, category(id, n)));
        session
    }

    #[test]
    fn starts_loading_without_selection() {
        let (session, req) = Session::new(nav(), CategoryId::new("n5"), d(2026, 2, 1));
        assert!(session.is_loading());
        assert!(session.current().is_none());
        assert_eq!(req.category, CategoryId::new("n5"));
    }

    #[test]
    fn initial_date_is_clamped() {
        let (session, _) = Session::new(nav(), CategoryId::new("n5"), d(2025, 12, 25));
        assert_eq!(session.date(), d(2026, 1, 1));
    }

    #[test]
    fn loaded_items_resolve_selection() {
        let session = ready_session("n5", 4, d(2026, 1, 2));
        let current = session.current().unwrap();
        assert_eq!(current.day_number, 2);
        assert_eq!(current.date, d(2026, 1, 2));
        assert!(current.selection.item().is_some());
    }

    #[test]
    fn empty_category_is_unavailable_not_error() {
        let session = ready_session("n1", 0, d(2026, 1, 2));
        assert_eq!(session.current().unwrap().selection, Selection::Unavailable);
    }

    #[test]
    fn stepping_stops_at_both_ends() {
        let mut session = ready_session("n5", 4, d(2026, 1, 1));
        assert!(session.is_at_start());
        session.step(-1);
        assert_eq!(session.date(), d(2026, 1, 1));
        session.go_today();
        assert!(session.is_at_today());
        session.step(1);
        assert_eq!(session.date(), d(2026, 4, 1));
    }

    #[test]
    fn rapid_steps_match_direct_selection() {
        let mut stepped = ready_session("n5", 6, d(2026, 1, 1));
        for _ in 0..20 {
            stepped.step(1);
        }
        let direct = ready_session("n5", 6, d(2026, 1, 21));
        assert_eq!(stepped.current(), direct.current());
    }

    #[test]
    fn switching_to_unloaded_category_requests_load() {
        let mut session = ready_session("n5", 4, d(2026, 1, 10));
        let req = session.switch_category(CategoryId::new("n4")).unwrap();
        assert!(session.is_loading());
        assert!(session.current().is_none());
        assert!(session.items_loaded(req.generation, category("n4", 9)));
        assert_eq!(session.current().unwrap().category, CategoryId::new("n4"));
        assert_eq!(session.date(), d(2026, 1, 10));
    }

    #[test]
    fn switching_back_uses_loaded_items() {
        let mut session = ready_session("n5", 4, d(2026, 1, 10));
        let before = session.current().cloned();
        let req = session.switch_category(CategoryId::new("n4")).unwrap();
        session.items_loaded(req.generation, category("n4", 9));
        assert!(session.switch_category(CategoryId::new("n5")).is_none());
        assert_eq!(session.current().cloned(), before);
    }

    #[test]
    fn stale_load_is_ignored() {
        let mut session = ready_session("n5", 4, d(2026, 1, 10));
        let first = session.switch_category(CategoryId::new("n4")).unwrap();
        let second = session.switch_category(CategoryId::new("n3")).unwrap();
        assert!(!session.items_loaded(first.generation, category("n4", 9)));
        assert!(session.is_loading());
        assert!(session.items_loaded(second.generation, category("n3", 2)));
        assert_eq!(session.current().unwrap().category, CategoryId::new("n3"));
        // the stale list was still kept
        assert!(session.switch_category(CategoryId::new("n4")).is_none());
    }

    #[test]
    fn navigation_while_loading_applies_after_load() {
        let (mut session, req) = Session::new(nav(), CategoryId::new("n5"), d(2026, 2, 1));
        session.step(1);
        assert!(session.current().is_none());
        session.items_loaded(req.generation, category("n5", 3));
        assert_eq!(session.current().unwrap().date, d(2026, 2, 2));
    }
}

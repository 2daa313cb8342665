use std::sync::Arc;
use std::sync::mpsc::Sender;
use std::time::{Duration, Instant};

use chrono::NaiveDate;
use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::clock::Clock;
use crate::config::Config;
use crate::engine::calendar::CalendarView;
use crate::engine::hash_sync::{FragmentAction, HashSync, format_fragment, fragment_of};
use crate::engine::navigator::Navigator;
use crate::engine::reveal::RevealStepper;
use crate::event::AppEvent;
use crate::session::{LoadRequest, Session};
use crate::source::loader::spawn_load;
use crate::source::{Category, CategoryId, ItemSource};
use crate::ui::components::item_card::reveal_lines;
use crate::ui::line_input::LineInput;
use crate::ui::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppScreen {
    Daily,
    Calendar,
    OpenLink,
}

/// Where the first screen starts. `link` is a fragment, a bare date or a
/// URL carrying a fragment.
#[derive(Clone, Debug, Default)]
pub struct StartOptions {
    pub category: Option<CategoryId>,
    pub link: Option<String>,
}

pub struct App {
    pub screen: AppScreen,
    pub theme: &'static Theme,
    pub config: Config,
    pub categories: Vec<CategoryId>,
    pub session: Session,
    pub hash: HashSync,
    pub reveal: RevealStepper,
    pub calendar: Option<CalendarView>,
    pub prompt: Option<LineInput>,
    pub status: Option<String>,
    pub should_quit: bool,
    source: Arc<dyn ItemSource>,
    loads: Sender<AppEvent>,
    last_today: NaiveDate,
    rng: SmallRng,
}

impl App {
    pub fn new(
        mut config: Config,
        theme: &'static Theme,
        source: Arc<dyn ItemSource>,
        clock: Arc<dyn Clock>,
        start: StartOptions,
        loads: Sender<AppEvent>,
    ) -> Self {
        config.normalize();
        let nav = Navigator::new(config.epoch, clock);
        let categories = config.category_ids();
        let category = start
            .category
            .filter(|id| categories.contains(id))
            .unwrap_or_else(|| config.default_category_id());

        let initial = start.link.as_deref().and_then(fragment_of);
        let mut hash = HashSync::new(&config.share_base_url, initial.clone());
        let mut status = None;
        let date = match hash.on_fragment_change(initial.as_deref()) {
            FragmentAction::Navigate(date) => date,
            _ => {
                if initial.is_some() {
                    status = Some("Link has no valid date, showing today".to_string());
                }
                nav.today()
            }
        };

        let last_today = nav.today();
        let (session, request) = Session::new(nav, category, date);
        let reveal = RevealStepper::new(Duration::from_millis(config.reveal_delay_ms));

        let app = Self {
            screen: AppScreen::Daily,
            theme,
            config,
            categories,
            session,
            hash,
            reveal,
            calendar: None,
            prompt: None,
            status,
            should_quit: false,
            source,
            loads,
            last_today,
            rng: SmallRng::from_entropy(),
        };
        app.request_load(request);
        app
    }

    fn request_load(&self, request: LoadRequest) {
        log::debug!(
            "loading {} (generation {})",
            request.category,
            request.generation
        );
        spawn_load(
            Arc::clone(&self.source),
            request.category,
            request.generation,
            self.loads.clone(),
        );
    }

    /// Publish the new selection and restart the reveal for it.
    fn after_selection(&mut self) {
        let Some(state) = self.session.current() else {
            self.reveal.cancel();
            return;
        };
        self.hash.publish(state.date);
        let stages = state
            .selection
            .item()
            .map(|item| reveal_lines(item).len())
            .unwrap_or(0);
        self.reveal.start(stages, Instant::now());
        if !self.config.auto_reveal {
            self.reveal.finish();
        }
    }

    pub fn items_loaded(&mut self, generation: u64, category: Category) {
        if self.session.items_loaded(generation, category) {
            self.after_selection();
        }
    }

    pub fn tick(&mut self, now: Instant) {
        self.reveal.poll(now);

        let today = self.session.navigator().today();
        if today != self.last_today {
            let was_at_today = self.session.date() == self.last_today;
            self.last_today = today;
            log::info!("date rolled over to {today}");
            if was_at_today {
                self.session.go_today();
                self.after_selection();
            } else {
                self.session.refresh();
            }
        }
    }

    pub fn step(&mut self, delta: i64) {
        let before = self.session.date();
        self.session.step(delta);
        if self.session.date() != before {
            self.after_selection();
        }
    }

    pub fn go_today(&mut self) {
        self.session.go_today();
        self.after_selection();
    }

    pub fn go_start(&mut self) {
        self.session.go_start();
        self.after_selection();
    }

    pub fn go_random(&mut self) {
        let date = self.session.navigator().random_date(&mut self.rng);
        self.session.select_date(date);
        self.after_selection();
    }

    pub fn select_category(&mut self, index: usize) {
        let Some(id) = self.categories.get(index).cloned() else {
            return;
        };
        if id == *self.session.category() {
            return;
        }
        self.reveal.cancel();
        match self.session.switch_category(id) {
            Some(request) => self.request_load(request),
            None => self.after_selection(),
        }
    }

    pub fn next_category(&mut self, forward: bool) {
        let count = self.categories.len();
        if count == 0 {
            return;
        }
        let current = self
            .categories
            .iter()
            .position(|id| id == self.session.category())
            .unwrap_or(0);
        let next = if forward {
            (current + 1) % count
        } else {
            (current + count - 1) % count
        };
        self.select_category(next);
    }

    /// Show everything at once; a second press replays the reveal.
    pub fn reveal_all(&mut self) {
        if self.reveal.is_complete() {
            self.after_selection();
            if self.config.auto_reveal {
                return;
            }
        }
        self.reveal.finish();
    }

    // Calendar

    pub fn open_calendar(&mut self) {
        self.reveal.cancel();
        self.calendar = Some(CalendarView::open_at(self.session.date()));
        self.screen = AppScreen::Calendar;
    }

    pub fn close_calendar(&mut self) {
        self.calendar = None;
        self.screen = AppScreen::Daily;
        self.reveal.finish();
    }

    pub fn calendar_move(&mut self, delta: i64) {
        if let Some(ref mut view) = self.calendar {
            view.move_cursor(self.session.navigator(), delta);
        }
    }

    pub fn calendar_month(&mut self, forward: bool) {
        if let Some(ref mut view) = self.calendar {
            let nav = self.session.navigator();
            if forward {
                view.next_month(nav);
            } else {
                view.prev_month(nav);
            }
        }
    }

    pub fn calendar_choose(&mut self) {
        let chosen = self
            .calendar
            .as_ref()
            .and_then(|view| view.choose(self.session.navigator()));
        if let Some(date) = chosen {
            self.calendar = None;
            self.screen = AppScreen::Daily;
            self.session.select_date(date);
            self.after_selection();
        }
    }

    // Links and history

    pub fn open_link_prompt(&mut self) {
        let nav = self.session.navigator();
        let mut suggestions: Vec<String> = Vec::new();
        for candidate in [
            self.hash.current().map(str::to_string),
            Some(format_fragment(nav.today())),
            Some(format_fragment(nav.epoch())),
        ]
        .into_iter()
        .flatten()
        {
            if !suggestions.contains(&candidate) {
                suggestions.push(candidate);
            }
        }
        self.prompt = Some(LineInput::new("#").with_suggestions(suggestions));
        self.screen = AppScreen::OpenLink;
    }

    pub fn close_link_prompt(&mut self) {
        self.prompt = None;
        self.screen = AppScreen::Daily;
    }

    pub fn submit_link(&mut self) {
        let link = self
            .prompt
            .take()
            .map(|input| input.value().trim().to_string())
            .unwrap_or_default();
        self.screen = AppScreen::Daily;
        if link.is_empty() {
            return;
        }
        let action = self.hash.open_link(&link);
        self.apply_fragment_action(action);
    }

    pub fn history_back(&mut self) {
        match self.hash.back() {
            Some(action) => self.apply_fragment_action(action),
            None => self.status = Some("No earlier link".to_string()),
        }
    }

    pub fn history_forward(&mut self) {
        match self.hash.forward() {
            Some(action) => self.apply_fragment_action(action),
            None => self.status = Some("No later link".to_string()),
        }
    }

    pub fn apply_fragment_action(&mut self, action: FragmentAction) {
        match action {
            FragmentAction::Navigate(date) => {
                self.status = None;
                self.session.select_date(date);
                self.after_selection();
            }
            FragmentAction::Today => {
                self.status = Some("Link has no valid date, showing today".to_string());
                self.go_today();
            }
            FragmentAction::Ignore => {}
        }
    }

    pub fn share_link(&self) -> String {
        self.hash.share_link()
    }

    pub fn cycle_theme(&mut self) {
        let themes = Theme::available_themes();
        if themes.is_empty() {
            return;
        }
        let next = themes
            .iter()
            .position(|name| *name == self.config.theme)
            .map(|i| (i + 1) % themes.len())
            .unwrap_or(0);
        let Some(theme) = Theme::load(&themes[next]) else {
            return;
        };
        self.theme = Box::leak(Box::new(theme));
        self.config.theme = themes[next].clone();
        self.status = Some(format!("Theme: {}", self.config.theme));
        if let Err(err) = self.config.save() {
            log::warn!("could not save config: {err}");
        }
    }
}

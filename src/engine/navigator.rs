use std::sync::Arc;

use chrono::{Days, NaiveDate};
use rand::Rng;

use crate::clock::Clock;
use crate::engine::cycle::day_index;

/// Keeps dates inside `[epoch, today]`. Today is read from the clock on every
/// call, so the upper bound moves forward while the program stays open.
///
/// If the epoch is configured in the future the range is empty; the epoch
/// wins and every date clamps to it.
#[derive(Clone)]
pub struct Navigator {
    epoch: NaiveDate,
    clock: Arc<dyn Clock>,
}

impl Navigator {
    pub fn new(epoch: NaiveDate, clock: Arc<dyn Clock>) -> Self {
        Self { epoch, clock }
    }

    pub fn epoch(&self) -> NaiveDate {
        self.epoch
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn clamp(&self, date: NaiveDate) -> NaiveDate {
        date.min(self.today()).max(self.epoch)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.epoch && date <= self.today()
    }

    pub fn step(&self, current: NaiveDate, delta: i64) -> NaiveDate {
        let moved = if delta >= 0 {
            current.checked_add_days(Days::new(delta as u64))
        } else {
            current.checked_sub_days(Days::new(delta.unsigned_abs()))
        };
        self.clamp(moved.unwrap_or(current))
    }

    /// 1-based day number for display; the epoch is day 1.
    pub fn day_number(&self, date: NaiveDate) -> i64 {
        day_index(self.epoch, date) + 1
    }

    pub fn is_at_start(&self, date: NaiveDate) -> bool {
        date == self.epoch
    }

    pub fn is_at_today(&self, date: NaiveDate) -> bool {
        date == self.today()
    }

    pub fn random_date<R: Rng>(&self, rng: &mut R) -> NaiveDate {
        let span = day_index(self.epoch, self.today()).max(0) as u64;
        let offset = rng.gen_range(0..=span);
        self.clamp(
            self.epoch
                .checked_add_days(Days::new(offset))
                .unwrap_or(self.epoch),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn nav(today: NaiveDate) -> (Navigator, Arc<FixedClock>) {
        let clock = Arc::new(FixedClock::new(today));
        (Navigator::new(d(2026, 1, 1), clock.clone()), clock)
    }

    #[test]
    fn clamp_before_epoch_returns_epoch() {
        let (nav, _) = nav(d(2026, 3, 15));
        assert_eq!(nav.clamp(d(2025, 12, 25)), d(2026, 1, 1));
    }

    #[test]
    fn clamp_after_today_returns_today() {
        let (nav, _) = nav(d(2026, 3, 15));
        assert_eq!(nav.clamp(d(2026, 4, 1)), d(2026, 3, 15));
    }

    #[test]
    fn clamp_in_range_unchanged() {
        let (nav, _) = nav(d(2026, 3, 15));
        assert_eq!(nav.clamp(d(2026, 2, 10)), d(2026, 2, 10));
    }

    #[test]
    fn step_stops_at_bounds() {
        let (nav, _) = nav(d(2026, 3, 15));
        assert_eq!(nav.step(d(2026, 1, 1), -1), d(2026, 1, 1));
        assert_eq!(nav.step(d(2026, 3, 15), 1), d(2026, 3, 15));
        assert_eq!(nav.step(d(2026, 1, 31), 1), d(2026, 2, 1));
        assert_eq!(nav.step(d(2026, 3, 1), -1), d(2026, 2, 28));
    }

    #[test]
    fn day_number_is_one_based() {
        let (nav, _) = nav(d(2026, 3, 15));
        assert_eq!(nav.day_number(d(2026, 1, 1)), 1);
        assert_eq!(nav.day_number(d(2026, 1, 2)), 2);
        assert_eq!(nav.day_number(d(2026, 2, 1)), 32);
    }

    #[test]
    fn bound_predicates() {
        let (nav, _) = nav(d(2026, 3, 15));
        assert!(nav.is_at_start(d(2026, 1, 1)));
        assert!(!nav.is_at_start(d(2026, 1, 2)));
        assert!(nav.is_at_today(d(2026, 3, 15)));
        assert!(!nav.is_at_today(d(2026, 3, 14)));
        // exact calendar dates only
        assert!(!nav.is_at_start(d(2025, 12, 31)));
        assert!(!nav.is_at_today(d(2026, 3, 16)));
    }

    #[test]
    fn today_is_reread_after_midnight() {
        let (nav, clock) = nav(d(2026, 3, 15));
        assert_eq!(nav.step(d(2026, 3, 15), 1), d(2026, 3, 15));
        clock.set(d(2026, 3, 16));
        assert_eq!(nav.step(d(2026, 3, 15), 1), d(2026, 3, 16));
        assert!(!nav.is_at_today(d(2026, 3, 15)));
    }

    #[test]
    fn future_epoch_clamps_to_epoch() {
        let clock = Arc::new(FixedClock::new(d(2025, 6, 1)));
        let nav = Navigator::new(d(2026, 1, 1), clock);
        assert_eq!(nav.clamp(d(2025, 6, 1)), d(2026, 1, 1));
    }

    #[test]
    fn random_date_stays_in_range() {
        let (nav, _) = nav(d(2026, 3, 15));
        let mut rng = SmallRng::seed_from_u64(3);
        for _ in 0..200 {
            assert!(nav.contains(nav.random_date(&mut rng)));
        }
    }
}

use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::engine::navigator::Navigator;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekStart {
    #[default]
    Sunday,
    Monday,
}

impl WeekStart {
    /// Column (0..7) of `weekday` in a week starting on `self`.
    pub fn column(self, weekday: Weekday) -> u32 {
        match self {
            WeekStart::Sunday => weekday.num_days_from_sunday(),
            WeekStart::Monday => weekday.num_days_from_monday(),
        }
    }

    pub fn header(self) -> [&'static str; 7] {
        match self {
            WeekStart::Sunday => ["Su", "Mo", "Tu", "We", "Th", "Fr", "Sa"],
            WeekStart::Monday => ["Mo", "Tu", "We", "Th", "Fr", "Sa", "Su"],
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DayCell {
    pub day: u32,
    pub date: NaiveDate,
    pub disabled: bool,
    pub is_today: bool,
    pub is_selected: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cell {
    /// Padding before the 1st of the month.
    Blank,
    Day(DayCell),
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first| first.pred_opt())
        .map(|last| last.day())
        .unwrap_or(31)
}

pub fn month_name(month: u32) -> &'static str {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        12 => "December",
        _ => "",
    }
}

/// Leading blanks, then one cell per day of `year`/`month`. An invalid month
/// yields an empty grid.
pub fn build_month(
    year: i32,
    month: u32,
    nav: &Navigator,
    selected: NaiveDate,
    week_start: WeekStart,
) -> Vec<Cell> {
    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return Vec::new();
    };
    let today = nav.today();
    let blanks = week_start.column(first.weekday());
    let days = days_in_month(year, month);

    let mut cells = Vec::with_capacity((blanks + days) as usize);
    cells.extend((0..blanks).map(|_| Cell::Blank));
    for day in 1..=days {
        let Some(date) = NaiveDate::from_ymd_opt(year, month, day) else {
            continue;
        };
        cells.push(Cell::Day(DayCell {
            day,
            date,
            disabled: !nav.contains(date),
            is_today: date == today,
            is_selected: date == selected,
        }));
    }
    cells
}

fn month_key(date: NaiveDate) -> (i32, u32) {
    (date.year(), date.month())
}

fn shift_month(year: i32, month: u32, delta: i32) -> (i32, u32) {
    let index = year * 12 + month as i32 - 1 + delta;
    (index.div_euclid(12), index.rem_euclid(12) as u32 + 1)
}

/// Month shown by the date picker plus a keyboard cursor. Independent of the
/// selection except when opened.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CalendarView {
    year: i32,
    month: u32,
    cursor: NaiveDate,
}

impl CalendarView {
    pub fn open_at(selected: NaiveDate) -> Self {
        Self {
            year: selected.year(),
            month: selected.month(),
            cursor: selected,
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn cursor(&self) -> NaiveDate {
        self.cursor
    }

    pub fn title(&self) -> String {
        format!("{} {}", month_name(self.month), self.year)
    }

    pub fn cells(&self, nav: &Navigator, selected: NaiveDate, week_start: WeekStart) -> Vec<Cell> {
        build_month(self.year, self.month, nav, selected, week_start)
    }

    pub fn can_go_prev(&self, nav: &Navigator) -> bool {
        (self.year, self.month) > month_key(nav.epoch())
    }

    pub fn can_go_next(&self, nav: &Navigator) -> bool {
        (self.year, self.month) < month_key(nav.today())
    }

    pub fn prev_month(&mut self, nav: &Navigator) {
        if self.can_go_prev(nav) {
            self.show_month(nav, -1);
        }
    }

    pub fn next_month(&mut self, nav: &Navigator) {
        if self.can_go_next(nav) {
            self.show_month(nav, 1);
        }
    }

    /// Keeps the cursor's day-of-month where possible, clamped into range.
    fn show_month(&mut self, nav: &Navigator, delta: i32) {
        let (year, month) = shift_month(self.year, self.month, delta);
        let day = self.cursor.day().min(days_in_month(year, month));
        self.year = year;
        self.month = month;
        if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
            self.cursor = nav.clamp(date);
        }
    }

    /// Move the cursor by whole days inside the valid range; the displayed
    /// month follows it.
    pub fn move_cursor(&mut self, nav: &Navigator, delta: i64) {
        let moved = if delta >= 0 {
            self.cursor.checked_add_days(Days::new(delta as u64))
        } else {
            self.cursor.checked_sub_days(Days::new(delta.unsigned_abs()))
        };
        let Some(moved) = moved else { return };
        if !nav.contains(moved) {
            return;
        }
        self.cursor = moved;
        self.year = moved.year();
        self.month = moved.month();
    }

    /// Cursor date if it can be selected.
    pub fn choose(&self, nav: &Navigator) -> Option<NaiveDate> {
        nav.contains(self.cursor).then_some(self.cursor)
    }
}

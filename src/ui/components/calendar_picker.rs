use chrono::NaiveDate;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Widget};

use crate::engine::calendar::{Cell, DayCell, WeekStart};
use crate::ui::theme::Theme;

const CELL_WIDTH: u16 = 3;

/// Month grid. Day cells come pre-built from the calendar module; this only
/// lays them out and colours them.
pub struct CalendarPicker<'a> {
    title: String,
    cells: &'a [Cell],
    week_start: WeekStart,
    cursor: Option<NaiveDate>,
    can_go_prev: bool,
    can_go_next: bool,
    focused: bool,
    theme: &'a Theme,
}

impl<'a> CalendarPicker<'a> {
    pub fn new(title: String, cells: &'a [Cell], week_start: WeekStart, theme: &'a Theme) -> Self {
        Self {
            title,
            cells,
            week_start,
            cursor: None,
            can_go_prev: false,
            can_go_next: false,
            focused: false,
            theme,
        }
    }

    pub fn cursor(mut self, cursor: NaiveDate) -> Self {
        self.cursor = Some(cursor);
        self.focused = true;
        self
    }

    pub fn bounds(mut self, can_go_prev: bool, can_go_next: bool) -> Self {
        self.can_go_prev = can_go_prev;
        self.can_go_next = can_go_next;
        self
    }

    fn day_style(&self, cell: &DayCell) -> Style {
        let colors = &self.theme.colors;
        let mut style = Style::default().fg(colors.fg());
        if cell.disabled {
            style = style.fg(colors.disabled());
        }
        if cell.is_today {
            style = style.fg(colors.today()).add_modifier(Modifier::BOLD);
        }
        if cell.is_selected {
            style = style
                .fg(colors.selected_fg())
                .bg(colors.selected_bg())
                .add_modifier(Modifier::BOLD);
        }
        if self.cursor == Some(cell.date) {
            style = style.add_modifier(Modifier::REVERSED | Modifier::UNDERLINED);
        }
        style
    }
}

impl Widget for CalendarPicker<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let prev = if self.can_go_prev { "‹ " } else { "  " };
        let next = if self.can_go_next { " ›" } else { "  " };
        let border = if self.focused {
            colors.border_focused()
        } else {
            colors.border()
        };
        let block = Block::bordered()
            .title(format!(" {prev}{}{next} ", self.title))
            .border_style(Style::default().fg(border))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.width < CELL_WIDTH * 7 || inner.height < 2 {
            return;
        }
        let x0 = inner.x + (inner.width - CELL_WIDTH * 7) / 2;

        for (col, label) in self.week_start.header().iter().enumerate() {
            buf.set_string(
                x0 + col as u16 * CELL_WIDTH,
                inner.y,
                label,
                Style::default().fg(colors.muted()),
            );
        }

        for (i, cell) in self.cells.iter().enumerate() {
            let row = (i / 7) as u16 + 1;
            let col = (i % 7) as u16;
            if row >= inner.height {
                break;
            }
            if let Cell::Day(day) = cell {
                buf.set_string(
                    x0 + col * CELL_WIDTH,
                    inner.y + row,
                    format!("{:>2}", day.day),
                    self.day_style(day),
                );
            }
        }
    }
}

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget};

use crate::source::CategoryId;
use crate::ui::theme::Theme;

pub struct CategoryTabs<'a> {
    categories: &'a [CategoryId],
    active: &'a CategoryId,
    loading: bool,
    theme: &'a Theme,
}

impl<'a> CategoryTabs<'a> {
    pub fn new(
        categories: &'a [CategoryId],
        active: &'a CategoryId,
        loading: bool,
        theme: &'a Theme,
    ) -> Self {
        Self {
            categories,
            active,
            loading,
            theme,
        }
    }
}

impl Widget for CategoryTabs<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let mut spans = vec![Span::raw(" ")];
        for (i, id) in self.categories.iter().enumerate() {
            let text = format!(" {} {} ", i + 1, id.label());
            let style = if id == self.active {
                Style::default()
                    .fg(colors.selected_fg())
                    .bg(colors.selected_bg())
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(colors.muted())
            };
            spans.push(Span::styled(text, style));
            spans.push(Span::raw(" "));
        }
        if self.loading {
            spans.push(Span::styled("loading…", Style::default().fg(colors.warning())));
        }
        Paragraph::new(Line::from(spans)).render(area, buf);
    }
}

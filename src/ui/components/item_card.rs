use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::engine::selector::Selection;
use crate::session::SelectionState;
use crate::source::Item;
use crate::ui::theme::Theme;

/// Lines hidden behind the reveal, in the order they appear.
pub fn reveal_lines(item: &Item) -> Vec<(RevealKind, &str)> {
    let mut lines = Vec::with_capacity(3);
    if let Some(ref reading) = item.reading {
        lines.push((RevealKind::Reading, reading.as_str()));
    }
    lines.push((RevealKind::Meaning, item.meaning.as_str()));
    if let Some(ref example) = item.example {
        lines.push((RevealKind::Example, example.as_str()));
    }
    lines
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RevealKind {
    Reading,
    Meaning,
    Example,
}

pub struct ItemCard<'a> {
    state: Option<&'a SelectionState>,
    revealed: usize,
    theme: &'a Theme,
}

impl<'a> ItemCard<'a> {
    pub fn new(state: Option<&'a SelectionState>, revealed: usize, theme: &'a Theme) -> Self {
        Self {
            state,
            revealed,
            theme,
        }
    }
}

impl Widget for ItemCard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let title = match self.state {
            Some(state) => format!(
                " {} · Day {} · {} ",
                state.category.label(),
                state.day_number,
                state.date.format("%a %Y-%m-%d")
            ),
            None => " Loading ".to_string(),
        };
        let block = Block::bordered()
            .title(title)
            .border_style(Style::default().fg(colors.border_focused()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let mut lines = vec![Line::from("")];
        match self.state.map(|s| &s.selection) {
            None => {
                lines.push(Line::from(Span::styled(
                    "Loading words…",
                    Style::default().fg(colors.muted()),
                )));
            }
            Some(Selection::Unavailable) => {
                lines.push(Line::from(Span::styled(
                    "No words available for this level.",
                    Style::default().fg(colors.warning()),
                )));
            }
            Some(Selection::Item(item)) => {
                lines.push(Line::from(Span::styled(
                    item.word.as_str(),
                    Style::default()
                        .fg(colors.word())
                        .add_modifier(Modifier::BOLD),
                )));
                lines.push(Line::from(""));

                for (i, (kind, text)) in reveal_lines(item).into_iter().enumerate() {
                    if i >= self.revealed {
                        lines.push(Line::from(Span::styled(
                            "· · ·",
                            Style::default().fg(colors.accent_dim()),
                        )));
                        break;
                    }
                    let style = match kind {
                        RevealKind::Reading => Style::default().fg(colors.reading()),
                        RevealKind::Meaning => Style::default().fg(colors.meaning()),
                        RevealKind::Example => Style::default()
                            .fg(colors.fg())
                            .add_modifier(Modifier::ITALIC),
                    };
                    if kind == RevealKind::Example {
                        lines.push(Line::from(""));
                    }
                    lines.push(Line::from(Span::styled(text, style)));
                }
            }
        }

        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reveal_order_skips_missing_fields() {
        let item = Item {
            word: "雨".to_string(),
            reading: None,
            meaning: "rain".to_string(),
            example: Some("雨が降る。".to_string()),
        };
        let kinds: Vec<RevealKind> = reveal_lines(&item).into_iter().map(|(k, _)| k).collect();
        assert_eq!(kinds, vec![RevealKind::Meaning, RevealKind::Example]);
    }
}

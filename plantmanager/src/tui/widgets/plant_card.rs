//! Plant card row: icon, name and the hour of the next watering

use crate::config::DELETE_ACTION_WIDTH;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

const ICON: &str = "🌿";
const TRASH: &str = "🗑";

/// One fixed-layout plant row
pub struct PlantCard<'a> {
    name: &'a str,
    hour: &'a str,
    label: &'a str,
    selected: bool,
    revealed: bool,
}

impl<'a> PlantCard<'a> {
    pub fn new(name: &'a str, hour: &'a str) -> Self {
        Self {
            name,
            hour,
            label: "",
            selected: false,
            revealed: false,
        }
    }

    /// Text shown above the hour, e.g. "Water at"
    pub fn label(mut self, label: &'a str) -> Self {
        self.label = label;
        self
    }

    pub fn selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    /// Show the delete action at the right edge
    pub fn revealed(mut self, revealed: bool) -> Self {
        self.revealed = revealed;
        self
    }
}

impl Widget for PlantCard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let (card_area, action_area) = if self.revealed {
            let [card, action] =
                Layout::horizontal([Constraint::Min(0), Constraint::Length(DELETE_ACTION_WIDTH)])
                    .areas(area);
            (card, Some(action))
        } else {
            (area, None)
        };

        let border = if self.selected {
            Style::default().fg(Color::Green)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_set(symbols::border::ROUNDED)
            .border_style(border);
        let inner = block.inner(card_area);
        block.render(card_area, buf);

        let time_width = (self.label.chars().count() + self.hour.chars().count() + 2) as u16;
        let [icon_area, name_area, time_area] = Layout::horizontal([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(time_width),
        ])
        .areas(inner);

        Paragraph::new(ICON).render(icon_area, buf);

        Paragraph::new(Span::styled(
            self.name,
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ))
        .render(name_area, buf);

        Paragraph::new(Line::from(vec![
            Span::styled(self.label, Style::default().fg(Color::DarkGray)),
            Span::raw(" "),
            Span::styled(
                self.hour,
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
        ]))
        .alignment(Alignment::Right)
        .render(time_area, buf);

        if let Some(action_area) = action_area {
            let action = Block::default()
                .borders(Borders::ALL)
                .border_set(symbols::border::ROUNDED)
                .style(Style::default().bg(Color::Red).fg(Color::White));
            let action_inner = action.inner(action_area);
            action.render(action_area, buf);
            Paragraph::new(TRASH)
                .alignment(Alignment::Center)
                .render(action_inner, buf);
        }
    }
}

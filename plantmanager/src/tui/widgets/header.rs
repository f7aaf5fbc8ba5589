//! Greeting header and the next-watering spotlight

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

/// "Hello, <name>" header
pub struct Header<'a> {
    greeting: &'a str,
    user_name: &'a str,
}

impl<'a> Header<'a> {
    pub fn new(greeting: &'a str, user_name: &'a str) -> Self {
        Self {
            greeting,
            user_name,
        }
    }
}

impl Widget for Header<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let content = Line::from(vec![
            Span::styled(
                format!(" {} ", self.greeting),
                Style::default().fg(Color::Gray),
            ),
            Span::styled(
                self.user_name,
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
        ]);

        Paragraph::new(content)
            .block(Block::default().borders(Borders::BOTTOM))
            .render(area, buf);
    }
}

/// Highlighted box with the next-watering message
pub struct Spotlight<'a> {
    message: &'a str,
}

impl<'a> Spotlight<'a> {
    pub fn new(message: &'a str) -> Self {
        Self { message }
    }
}

impl Widget for Spotlight<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_set(symbols::border::ROUNDED)
            .border_style(Style::default().fg(Color::Blue));
        let inner = block.inner(area);
        block.render(area, buf);

        let [icon_area, text_area] =
            Layout::horizontal([Constraint::Length(4), Constraint::Min(0)]).areas(inner);

        Paragraph::new(" 💧").render(icon_area, buf);
        Paragraph::new(self.message)
            .wrap(Wrap { trim: true })
            .style(Style::default().fg(Color::Cyan))
            .render(text_area, buf);
    }
}

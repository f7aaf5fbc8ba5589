//! Modal popups: the two-choice delete confirmation and the alert

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap},
};

/// Calculate centered modal rect
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}

fn modal_block(title: &str, background: Color) -> Block<'_> {
    Block::default()
        .title(format!(" {} ", title))
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_set(symbols::border::ROUNDED)
        .style(Style::default().bg(background))
}

/// Yes/no confirmation dialog
pub struct ConfirmDialog<'a> {
    title: &'a str,
    message: &'a str,
    yes: &'a str,
    no: &'a str,
}

impl<'a> ConfirmDialog<'a> {
    pub fn new(title: &'a str, message: &'a str, yes: &'a str, no: &'a str) -> Self {
        Self {
            title,
            message,
            yes,
            no,
        }
    }
}

impl Widget for ConfirmDialog<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let modal_area = centered_rect(50, 8, area);
        Clear.render(modal_area, buf);

        let block = modal_block(self.title, Color::DarkGray);
        let inner = block.inner(modal_area);
        block.render(modal_area, buf);

        let chunks = Layout::vertical([
            Constraint::Length(1), // Spacer
            Constraint::Length(2), // Message
            Constraint::Length(1), // Spacer
            Constraint::Length(1), // Buttons
            Constraint::Min(0),
        ])
        .split(inner);

        Paragraph::new(self.message)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .style(Style::default().fg(Color::Yellow))
            .render(chunks[1], buf);

        let dim = Style::default().fg(Color::Gray);
        let buttons = Line::from(vec![
            Span::styled("[", dim),
            Span::styled(
                "n",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!("] {}  ", self.no), dim),
            Span::styled("[", dim),
            Span::styled(
                "y",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!("] {}", self.yes), dim),
        ]);

        Paragraph::new(buttons)
            .alignment(Alignment::Center)
            .render(chunks[3], buf);
    }
}

/// Single-message alert, dismissed by any key
pub struct AlertPopup<'a> {
    message: &'a str,
}

impl<'a> AlertPopup<'a> {
    pub fn new(message: &'a str) -> Self {
        Self { message }
    }
}

impl Widget for AlertPopup<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let modal_area = centered_rect(50, 6, area);
        Clear.render(modal_area, buf);

        let block = modal_block("!", Color::Red);
        let inner = block.inner(modal_area);
        block.render(modal_area, buf);

        Paragraph::new(self.message)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .style(Style::default().fg(Color::White))
            .render(inner, buf);
    }
}

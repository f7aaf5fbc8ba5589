//! Screen rendering for the plant list and the plant detail

use super::app::{App, Route};
use super::widgets::{AlertPopup, ConfirmDialog, Header, PlantCard, Spotlight};
use crate::config::CARD_HEIGHT;
use crate::database::DisplayPlant;
use crate::locale::Strings;
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Render the full frame
pub fn view(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let strings = app.strings();

    match app.route() {
        Route::MyPlants => render_my_plants(frame, area, app, strings),
        Route::PlantDetail(plant) => render_detail(frame, area, plant, strings),
    }

    if let Some(pending) = &app.confirm {
        let message = app.locale().remove_prompt(&pending.name);
        frame.render_widget(
            ConfirmDialog::new(
                strings.remove_title,
                &message,
                strings.confirm_yes,
                strings.confirm_no,
            ),
            area,
        );
    }

    if let Some(alert) = &app.alert {
        frame.render_widget(AlertPopup::new(alert), area);
    }
}

fn render_my_plants(frame: &mut Frame, area: Rect, app: &App, strings: &Strings) {
    let [header_area, spotlight_area, title_area, list_area, status_area] = Layout::vertical([
        Constraint::Length(2),
        Constraint::Length(4),
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    frame.render_widget(Header::new(strings.greeting, &app.user_name), header_area);

    if app.loading {
        frame.render_widget(
            Paragraph::new(strings.loading)
                .alignment(Alignment::Center)
                .style(Style::default().fg(Color::Gray)),
            list_area,
        );
        return;
    }

    let spotlight = app.next_watered.as_deref().unwrap_or(strings.no_plants);
    frame.render_widget(Spotlight::new(spotlight), spotlight_area);

    frame.render_widget(
        Paragraph::new(Span::styled(
            format!(" {}", strings.list_title),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )),
        title_area,
    );

    render_cards(frame, list_area, app, strings);

    let status = match &app.last_reminder {
        Some(reminder) => Line::from(Span::styled(
            format!(" {}", reminder),
            Style::default().fg(Color::Cyan),
        )),
        None => Line::from(Span::styled(
            format!(" {}", strings.list_help),
            Style::default().fg(Color::DarkGray),
        )),
    };
    frame.render_widget(Paragraph::new(status), status_area);
}

/// First row to draw so the selection stays visible
fn scroll_offset(selected: usize, visible: usize) -> usize {
    if visible == 0 || selected < visible {
        0
    } else {
        selected + 1 - visible
    }
}

fn render_cards(frame: &mut Frame, area: Rect, app: &App, strings: &Strings) {
    let visible = (area.height / CARD_HEIGHT) as usize;
    let offset = scroll_offset(app.selected, visible);

    for (slot, (index, plant)) in app
        .plants
        .iter()
        .enumerate()
        .skip(offset)
        .take(visible)
        .enumerate()
    {
        let row = Rect::new(
            area.x,
            area.y + slot as u16 * CARD_HEIGHT,
            area.width,
            CARD_HEIGHT,
        );
        let card = PlantCard::new(&plant.name, &plant.hour)
            .label(strings.water_at)
            .selected(index == app.selected)
            .revealed(app.revealed == Some(index));
        frame.render_widget(card, row);
    }
}

fn render_detail(frame: &mut Frame, area: Rect, plant: &DisplayPlant, strings: &Strings) {
    let [body_area, help_area] =
        Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(area);

    let block = Block::default()
        .title(format!(" {} ", plant.name))
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_set(symbols::border::ROUNDED)
        .border_style(Style::default().fg(Color::Green));

    let label = Style::default()
        .fg(Color::Green)
        .add_modifier(Modifier::BOLD);
    let lines = vec![
        Line::from(Span::styled(strings.about_label, label)),
        Line::from(plant.about.as_str()),
        Line::default(),
        Line::from(Span::styled(strings.water_tips_label, label)),
        Line::from(plant.water_tips.as_str()),
        Line::default(),
        Line::from(Span::styled(strings.next_watering_label, label)),
        Line::from(format!("{} {}", plant.day, plant.hour)),
    ];

    frame.render_widget(
        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: true }),
        body_area,
    );
    frame.render_widget(
        Paragraph::new(Span::styled(
            format!(" {}", strings.detail_help),
            Style::default().fg(Color::DarkGray),
        )),
        help_area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PLANTS_KEY, USER_KEY};
    use crate::database::{Frequency, PlantRecord, StoredPlant};
    use crate::locale::Locale;
    use crate::services::scheduler::RecordingScheduler;
    use crate::services::{DateFormatter, PlantsService};
    use crate::storage::MemoryStore;
    use crate::tui::test_utils::TestTerminal;
    use chrono::{Duration, Utc};
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use std::sync::Arc;

    async fn app_with(plants: &[(&str, &str)]) -> App {
        let now = Utc::now();
        let record: PlantRecord = plants
            .iter()
            .enumerate()
            .map(|(i, (id, name))| {
                (
                    id.to_string(),
                    StoredPlant {
                        name: name.to_string(),
                        about: format!("About the {}", name),
                        water_tips: "Keep the soil moist".to_string(),
                        photo: String::new(),
                        date_time_notification: now + Duration::hours(i as i64 + 1),
                        notification_id: format!("n-{}", id),
                        frequency: Frequency::default(),
                    },
                )
            })
            .collect();

        let store = Arc::new(MemoryStore::with_items([
            (PLANTS_KEY.to_string(), record.to_json().unwrap()),
            (USER_KEY.to_string(), "Ana".to_string()),
        ]));
        let formatter = DateFormatter::with_offset_minutes(Locale::EnUs, 0).unwrap();
        let service = PlantsService::new(store, Arc::new(RecordingScheduler::new()), formatter);

        let mut app = App::new(service);
        app.load().await;
        app
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_scroll_offset_keeps_selection_visible() {
        assert_eq!(scroll_offset(0, 4), 0);
        assert_eq!(scroll_offset(3, 4), 0);
        assert_eq!(scroll_offset(4, 4), 1);
        assert_eq!(scroll_offset(9, 4), 6);
        assert_eq!(scroll_offset(2, 0), 0);
    }

    #[tokio::test]
    async fn test_list_shows_greeting_spotlight_and_cards() {
        let app = app_with(&[("p1", "Fern"), ("p2", "Cactus")]).await;
        let mut term = TestTerminal::new();

        term.draw_with(|frame| view(frame, &app));

        assert!(term.buffer_contains("Ana"));
        assert!(term.buffer_contains("Fern"));
        assert!(term.buffer_contains("Cactus"));
        assert!(term.buffer_contains("Water at"));
        assert!(term.buffer_contains(Locale::EnUs.strings().list_help));
    }

    #[tokio::test]
    async fn test_empty_list_shows_no_plants_message() {
        let app = app_with(&[]).await;
        let mut term = TestTerminal::new();

        term.draw_with(|frame| view(frame, &app));

        assert!(term.buffer_contains(Locale::EnUs.strings().no_plants));
    }

    #[tokio::test]
    async fn test_loading_state_hides_spotlight() {
        let app = App::new(PlantsService::new(
            Arc::new(MemoryStore::new()),
            Arc::new(RecordingScheduler::new()),
            DateFormatter::with_offset_minutes(Locale::EnUs, 0).unwrap(),
        ));
        let mut term = TestTerminal::new();

        term.draw_with(|frame| view(frame, &app));

        assert!(term.buffer_contains(Locale::EnUs.strings().loading));
        assert!(!term.buffer_contains(Locale::EnUs.strings().no_plants));
    }

    #[tokio::test]
    async fn test_confirm_dialog_names_the_plant() {
        let mut app = app_with(&[("p1", "Fern")]).await;
        app.handle_key(key(KeyCode::Char('d'))).await;
        let mut term = TestTerminal::new();

        term.draw_with(|frame| view(frame, &app));

        assert!(term.buffer_contains("Fern?"));
        assert!(term.buffer_contains("] Yes"));
    }

    #[tokio::test]
    async fn test_detail_shows_about_and_tips() {
        let mut app = app_with(&[("p1", "Fern")]).await;
        app.handle_key(key(KeyCode::Enter)).await;
        let mut term = TestTerminal::new();

        term.draw_with(|frame| view(frame, &app));

        assert!(term.buffer_contains("About the Fern"));
        assert!(term.buffer_contains("Keep the soil moist"));
        assert!(term.buffer_contains(Locale::EnUs.strings().detail_help));
    }

    #[tokio::test]
    async fn test_selection_scrolls_past_visible_rows() {
        let names: Vec<(String, String)> = (0..10)
            .map(|i| (format!("p{:02}", i), format!("Plant{:02}", i)))
            .collect();
        let refs: Vec<(&str, &str)> = names
            .iter()
            .map(|(id, name)| (id.as_str(), name.as_str()))
            .collect();
        let mut app = app_with(&refs).await;
        for _ in 0..9 {
            app.handle_key(key(KeyCode::Down)).await;
        }
        let mut term = TestTerminal::new();

        term.draw_with(|frame| view(frame, &app));

        // Header, spotlight and title take the first seven rows; the
        // spotlight always names the soonest plant
        let mut card_rows = 7..23;
        assert!(card_rows.clone().any(|y| term.line_contains(y, "Plant09")));
        assert!(card_rows.clone().any(|y| term.line_contains(y, "Plant05")));
        assert!(!card_rows.clone().any(|y| term.line_contains(y, "Plant00")));
        assert!(!card_rows.any(|y| term.line_contains(y, "Plant04")));
    }
}

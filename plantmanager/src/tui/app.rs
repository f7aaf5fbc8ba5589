//! "My plants" screen state and input handling
//!
//! `App` owns the per-screen state: the loaded rows, the selection, the
//! row whose delete action is revealed, the pending confirmation and the
//! alert. It is only mutated from the UI loop.

use crate::database::DisplayPlant;
use crate::locale::{Locale, Strings};
use crate::services::scheduler::FiredNotification;
use crate::services::PlantsService;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Screens reachable from the plant list
#[derive(Debug, Clone, PartialEq)]
pub enum Route {
    MyPlants,
    PlantDetail(DisplayPlant),
}

/// Delete awaiting the user's answer
#[derive(Debug, Clone, PartialEq)]
pub struct PendingDelete {
    pub id: String,
    pub name: String,
}

pub struct App {
    service: PlantsService,
    pub user_name: String,
    pub plants: Vec<DisplayPlant>,
    pub next_watered: Option<String>,
    pub loading: bool,
    pub selected: usize,
    /// Row whose delete action is showing
    pub revealed: Option<usize>,
    pub confirm: Option<PendingDelete>,
    pub alert: Option<String>,
    /// Latest delivered reminder, shown in the status line until the next key
    pub last_reminder: Option<String>,
    routes: Vec<Route>,
    pub should_quit: bool,
}

impl App {
    pub fn new(service: PlantsService) -> Self {
        Self {
            service,
            user_name: String::new(),
            plants: Vec::new(),
            next_watered: None,
            loading: true,
            selected: 0,
            revealed: None,
            confirm: None,
            alert: None,
            last_reminder: None,
            routes: vec![Route::MyPlants],
            should_quit: false,
        }
    }

    pub fn locale(&self) -> Locale {
        self.service.formatter().locale()
    }

    pub fn strings(&self) -> &'static Strings {
        self.locale().strings()
    }

    pub fn route(&self) -> &Route {
        self.routes.last().unwrap_or(&Route::MyPlants)
    }

    pub fn navigate(&mut self, route: Route) {
        tracing::debug!("Navigating to {:?}", route);
        self.routes.push(route);
    }

    pub fn back(&mut self) {
        if self.routes.len() > 1 {
            self.routes.pop();
        }
    }

    pub fn selected_plant(&self) -> Option<&DisplayPlant> {
        self.plants.get(self.selected)
    }

    /// Load the user name and the plants concurrently
    pub async fn load(&mut self) {
        self.loading = true;

        let (user, plants) = tokio::join!(self.service.load_user_name(), self.service.load_plants());

        match user {
            Ok(name) => self.user_name = name,
            Err(e) => {
                tracing::warn!("Failed to load user name: {}", e);
                self.user_name.clear();
            }
        }

        match plants {
            Ok(list) => {
                self.plants = list.plants;
                self.next_watered = list.next_watered;
            }
            Err(e) => {
                tracing::error!("Failed to load plants: {}", e);
                self.plants.clear();
                self.next_watered = None;
                self.alert = Some(self.strings().load_failed.to_string());
            }
        }

        self.selected = self.selected.min(self.plants.len().saturating_sub(1));
        self.revealed = None;
        self.loading = false;
    }

    /// A reminder fired: show it and schedule the plant's next watering
    pub async fn on_reminder(&mut self, fired: FiredNotification) {
        tracing::info!("Reminder delivered for plant {}", fired.plant_id);
        self.last_reminder = Some(format!("{} {}", fired.title, fired.body));

        match self.service.reschedule_plant(&fired.plant_id).await {
            Ok(Some(_)) => self.load().await,
            Ok(None) => {}
            Err(e) => tracing::error!("Failed to reschedule plant {}: {}", fired.plant_id, e),
        }
    }

    pub async fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        self.last_reminder = None;

        if self.alert.is_some() {
            self.alert = None;
            return;
        }

        if self.confirm.is_some() {
            match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') => self.confirm_delete().await,
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => self.cancel_delete(),
                _ => {}
            }
            return;
        }

        if matches!(self.route(), Route::PlantDetail(_)) {
            match key.code {
                KeyCode::Esc | KeyCode::Backspace | KeyCode::Left => self.back(),
                KeyCode::Char('q') => self.should_quit = true,
                _ => {}
            }
        } else {
            self.handle_list_key(key).await;
        }
    }

    async fn handle_list_key(&mut self, key: KeyEvent) {
        if self.loading {
            if key.code == KeyCode::Char('q') {
                self.should_quit = true;
            }
            return;
        }

        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Up | KeyCode::Char('k') => self.move_selection(-1),
            KeyCode::Down | KeyCode::Char('j') => self.move_selection(1),
            // Swipe left reveals the delete action; right swipe is disabled
            KeyCode::Left | KeyCode::Char('h') => {
                if !self.plants.is_empty() {
                    self.revealed = Some(self.selected);
                }
            }
            KeyCode::Right | KeyCode::Char('l') => self.revealed = None,
            KeyCode::Char('d') | KeyCode::Delete => self.request_delete(),
            KeyCode::Enter => {
                if self.revealed == Some(self.selected) {
                    self.request_delete();
                } else if let Some(plant) = self.selected_plant().cloned() {
                    self.navigate(Route::PlantDetail(plant));
                }
            }
            // The runner reloads once the loading view is on screen
            KeyCode::Char('r') => self.loading = true,
            _ => {}
        }
    }

    fn move_selection(&mut self, delta: isize) {
        if self.plants.is_empty() {
            return;
        }
        let last = self.plants.len() - 1;
        self.selected = self.selected.saturating_add_signed(delta).min(last);
        self.revealed = None;
    }

    /// Ask the user to confirm removing the selected plant
    fn request_delete(&mut self) {
        let pending = self.selected_plant().map(|plant| PendingDelete {
            id: plant.id.clone(),
            name: plant.name.clone(),
        });
        if pending.is_some() {
            self.confirm = pending;
        }
    }

    fn cancel_delete(&mut self) {
        if let Some(pending) = self.confirm.take() {
            tracing::debug!("Delete of {} cancelled", pending.id);
        }
        self.revealed = None;
    }

    async fn confirm_delete(&mut self) {
        let Some(pending) = self.confirm.take() else {
            return;
        };
        self.revealed = None;

        match self.service.delete_plant(&pending.id).await {
            Ok(_) => self.remove_plant(&pending.id),
            Err(e) => {
                tracing::error!("Failed to remove plant {}: {}", pending.id, e);
                self.alert = Some(e.alert_message(self.strings()));
            }
        }
    }

    /// Drop a row from the in-memory list, keeping the order of the rest
    fn remove_plant(&mut self, id: &str) {
        self.plants.retain(|plant| plant.id != id);
        self.selected = self.selected.min(self.plants.len().saturating_sub(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PLANTS_KEY;
    use crate::database::{Frequency, PlantRecord, StoredPlant};
    use crate::services::scheduler::RecordingScheduler;
    use crate::services::DateFormatter;
    use crate::storage::{KeyValueStore, MemoryStore};
    use chrono::{Duration, Utc};
    use std::sync::Arc;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn record_with(names: &[(&str, &str, i64)]) -> String {
        let now = Utc::now();
        names
            .iter()
            .map(|(id, name, hours)| {
                (
                    id.to_string(),
                    StoredPlant {
                        name: name.to_string(),
                        about: String::new(),
                        water_tips: String::new(),
                        photo: String::new(),
                        date_time_notification: now + Duration::hours(*hours),
                        notification_id: format!("n-{}", id),
                        frequency: Frequency::default(),
                    },
                )
            })
            .collect::<PlantRecord>()
            .to_json()
            .unwrap()
    }

    async fn loaded_app(
        names: &[(&str, &str, i64)],
    ) -> (App, Arc<MemoryStore>, Arc<RecordingScheduler>) {
        let store = Arc::new(MemoryStore::with_items([
            (PLANTS_KEY.to_string(), record_with(names)),
            (crate::config::USER_KEY.to_string(), "Ana".to_string()),
        ]));
        let scheduler = Arc::new(RecordingScheduler::new());
        let formatter = DateFormatter::with_offset_minutes(Locale::EnUs, 0).unwrap();
        let service = PlantsService::new(store.clone(), scheduler.clone(), formatter);

        let mut app = App::new(service);
        app.load().await;
        (app, store, scheduler)
    }

    fn ids(app: &App) -> Vec<&str> {
        app.plants.iter().map(|p| p.id.as_str()).collect()
    }

    #[tokio::test]
    async fn test_load_fills_screen_state() {
        let (app, _store, _scheduler) =
            loaded_app(&[("p2", "Cactus", 5), ("p1", "Fern", 1)]).await;

        assert!(!app.loading);
        assert_eq!(app.user_name, "Ana");
        assert_eq!(ids(&app), vec!["p1", "p2"]);
        assert!(app.next_watered.as_deref().unwrap().contains("Fern"));
    }

    #[tokio::test]
    async fn test_load_failure_shows_alert_and_empty_list() {
        let store = Arc::new(MemoryStore::with_items([(PLANTS_KEY, "{ broken")]));
        let formatter = DateFormatter::with_offset_minutes(Locale::EnUs, 0).unwrap();
        let service = PlantsService::new(store, Arc::new(RecordingScheduler::new()), formatter);

        let mut app = App::new(service);
        app.load().await;

        assert!(!app.loading);
        assert!(app.plants.is_empty());
        assert_eq!(app.alert.as_deref(), Some(Locale::EnUs.strings().load_failed));
    }

    #[tokio::test]
    async fn test_confirmed_delete_removes_row_and_cancels_reminder() {
        let (mut app, store, scheduler) =
            loaded_app(&[("p1", "Fern", 1), ("p2", "Cactus", 2), ("p3", "Rose", 3)]).await;

        app.handle_key(key(KeyCode::Down)).await;
        app.handle_key(key(KeyCode::Left)).await;
        assert_eq!(app.revealed, Some(1));

        app.handle_key(key(KeyCode::Enter)).await;
        assert_eq!(app.confirm.as_ref().map(|p| p.id.as_str()), Some("p2"));

        app.handle_key(key(KeyCode::Char('y'))).await;

        assert_eq!(ids(&app), vec!["p1", "p3"]);
        assert_eq!(scheduler.cancelled().await, vec!["n-p2".to_string()]);
        let record = PlantRecord::parse(store.snapshot(PLANTS_KEY).await.as_deref()).unwrap();
        assert_eq!(record.len(), 2);
        assert!(app.confirm.is_none());
        assert!(app.alert.is_none());
    }

    #[tokio::test]
    async fn test_cancelled_delete_touches_nothing() {
        let (mut app, store, scheduler) =
            loaded_app(&[("p1", "Fern", 1), ("p2", "Cactus", 2)]).await;
        let writes_before = store.write_count();

        app.handle_key(key(KeyCode::Char('d'))).await;
        assert!(app.confirm.is_some());

        app.handle_key(key(KeyCode::Char('n'))).await;

        assert!(app.confirm.is_none());
        assert_eq!(ids(&app), vec!["p1", "p2"]);
        assert!(scheduler.cancelled().await.is_empty());
        assert_eq!(store.write_count(), writes_before);
    }

    #[tokio::test]
    async fn test_failed_delete_keeps_row_and_shows_alert() {
        let (mut app, store, _scheduler) = loaded_app(&[("p1", "Fern", 1)]).await;
        store.set_fail_writes(true);

        app.handle_key(key(KeyCode::Char('d'))).await;
        app.handle_key(key(KeyCode::Char('y'))).await;

        assert_eq!(ids(&app), vec!["p1"]);
        let alert = app.alert.clone().unwrap();
        assert!(alert.contains(Locale::EnUs.strings().remove_failed));
        assert!(alert.contains(Locale::EnUs.strings().reminder_already_cancelled));

        // Any key dismisses the alert
        app.handle_key(key(KeyCode::Char('x'))).await;
        assert!(app.alert.is_none());
    }

    #[tokio::test]
    async fn test_delete_of_already_removed_plant_shows_alert() {
        let (mut app, store, scheduler) = loaded_app(&[("p1", "Fern", 1)]).await;
        store.set_item(PLANTS_KEY, "{}").await.unwrap();

        app.handle_key(key(KeyCode::Char('d'))).await;
        app.handle_key(key(KeyCode::Char('y'))).await;

        assert_eq!(ids(&app), vec!["p1"]);
        assert_eq!(app.alert.as_deref(), Some(Locale::EnUs.strings().remove_failed));
        assert!(scheduler.cancelled().await.is_empty());
    }

    #[tokio::test]
    async fn test_enter_does_not_answer_delete_prompt() {
        let (mut app, store, scheduler) = loaded_app(&[("p1", "Fern", 1)]).await;
        let writes_before = store.write_count();

        app.handle_key(key(KeyCode::Left)).await;
        app.handle_key(key(KeyCode::Enter)).await;
        assert!(app.confirm.is_some());

        app.handle_key(key(KeyCode::Enter)).await;

        assert!(app.confirm.is_some());
        assert_eq!(ids(&app), vec!["p1"]);
        assert!(scheduler.cancelled().await.is_empty());
        assert_eq!(store.write_count(), writes_before);
    }

    #[tokio::test]
    async fn test_reload_key_shows_loading_until_load_runs() {
        let (mut app, store, _scheduler) = loaded_app(&[("p1", "Fern", 1)]).await;
        store.set_item(PLANTS_KEY, "{}").await.unwrap();

        app.handle_key(key(KeyCode::Char('r'))).await;

        assert!(app.loading);
        assert_eq!(ids(&app), vec!["p1"]);

        app.load().await;

        assert!(!app.loading);
        assert!(app.plants.is_empty());
    }

    #[tokio::test]
    async fn test_reminder_line_clears_on_next_key() {
        let (mut app, _store, _scheduler) = loaded_app(&[("p1", "Fern", 1)]).await;
        app.last_reminder = Some("Heeey, time to water the Fern".to_string());

        app.handle_key(key(KeyCode::Down)).await;

        assert!(app.last_reminder.is_none());
    }

    #[tokio::test]
    async fn test_enter_opens_detail_and_esc_returns() {
        let (mut app, _store, _scheduler) =
            loaded_app(&[("p1", "Fern", 1), ("p2", "Cactus", 2)]).await;

        app.handle_key(key(KeyCode::Down)).await;
        app.handle_key(key(KeyCode::Enter)).await;

        match app.route() {
            Route::PlantDetail(plant) => assert_eq!(plant.id, "p2"),
            other => panic!("expected detail route, got {:?}", other),
        }

        app.handle_key(key(KeyCode::Esc)).await;
        assert_eq!(app.route(), &Route::MyPlants);
    }

    #[tokio::test]
    async fn test_selection_is_clamped_and_hides_revealed_action() {
        let (mut app, _store, _scheduler) =
            loaded_app(&[("p1", "Fern", 1), ("p2", "Cactus", 2)]).await;

        app.handle_key(key(KeyCode::Up)).await;
        assert_eq!(app.selected, 0);

        app.handle_key(key(KeyCode::Left)).await;
        app.handle_key(key(KeyCode::Down)).await;
        app.handle_key(key(KeyCode::Down)).await;

        assert_eq!(app.selected, 1);
        assert_eq!(app.revealed, None);
    }

    #[tokio::test]
    async fn test_quit_keys() {
        let (mut app, _store, _scheduler) = loaded_app(&[]).await;

        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL))
            .await;
        assert!(app.should_quit);
    }

    #[tokio::test]
    async fn test_reminder_reschedules_and_reloads() {
        let (mut app, _store, scheduler) = loaded_app(&[("p1", "Fern", -1)]).await;

        app.on_reminder(FiredNotification {
            handle: "n-p1".to_string(),
            plant_id: "p1".to_string(),
            title: "Heeey,".to_string(),
            body: "Time to take care of your Fern".to_string(),
        })
        .await;

        assert_eq!(scheduler.scheduled().await.len(), 1);
        assert!(app.last_reminder.as_deref().unwrap().contains("Fern"));
        assert!(app.plants[0].date_time_notification > Utc::now());
    }
}

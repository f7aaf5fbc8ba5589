//! Application state and initialization
//!
//! Opens the database, starts the notification scheduler and wires the
//! plants service. Everything the binary needs is held by `AppState`.

use crate::config::{APP_DIR_NAME, DATABASE_FILE, LOG_DIR};
use crate::database::Repository;
use crate::error::{AppError, Result};
use crate::services::scheduler::FiredNotification;
use crate::services::{AppSettings, LocalNotificationScheduler, PlantsService};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Central application state holding all services
#[derive(Clone)]
pub struct AppState {
    pub settings: AppSettings,
    pub plants: PlantsService,
    pub scheduler: Arc<LocalNotificationScheduler>,
}

/// Platform data directory for the application
pub fn default_data_dir() -> Result<PathBuf> {
    dirs::data_dir()
        .map(|dir| dir.join(APP_DIR_NAME))
        .ok_or_else(|| AppError::Generic("Failed to get app data dir".to_string()))
}

/// Application setup - called once on startup
pub async fn setup(
    app_data_dir: &Path,
    settings: AppSettings,
) -> Result<(AppState, mpsc::UnboundedReceiver<FiredNotification>)> {
    tracing::info!("Initializing application");
    tracing::info!("App data directory: {:?}", app_data_dir);

    std::fs::create_dir_all(app_data_dir)?;
    std::fs::create_dir_all(app_data_dir.join(LOG_DIR))?;

    let repository = Arc::new(Repository::open(&app_data_dir.join(DATABASE_FILE)).await?);

    let (scheduler, fired_rx) = LocalNotificationScheduler::new().await?;
    let scheduler = Arc::new(scheduler);
    scheduler.start().await?;

    let formatter = settings.formatter()?;
    let plants = PlantsService::new(repository, scheduler.clone(), formatter);

    tracing::info!("Application initialized successfully");

    Ok((
        AppState {
            settings,
            plants,
            scheduler,
        },
        fired_rx,
    ))
}

//! Settings service
//!
//! Manages application settings persistence using JSON file storage.

use crate::config::{DEFAULT_LOG_FILTER, SETTINGS_FILE};
use crate::error::{AppError, Result};
use crate::locale::Locale;
use crate::services::formatting::DateFormatter;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::fs;

fn default_log_filter() -> String {
    DEFAULT_LOG_FILTER.to_string()
}

/// Application settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppSettings {
    #[serde(default)]
    pub locale: Locale,
    /// Minutes east of UTC; the machine's offset when None
    #[serde(default)]
    pub utc_offset_minutes: Option<i32>,
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            locale: Locale::default(),
            utc_offset_minutes: None,
            log_filter: default_log_filter(),
        }
    }
}

impl AppSettings {
    /// Date formatter for these settings
    pub fn formatter(&self) -> Result<DateFormatter> {
        match self.utc_offset_minutes {
            Some(minutes) => DateFormatter::with_offset_minutes(self.locale, minutes),
            None => Ok(DateFormatter::local(self.locale)),
        }
    }
}

/// Service for managing application settings
#[derive(Clone)]
pub struct SettingsService {
    settings_path: PathBuf,
}

impl SettingsService {
    pub fn new(app_data_dir: PathBuf) -> Self {
        Self {
            settings_path: app_data_dir.join(SETTINGS_FILE),
        }
    }

    /// Load settings from disk or create default if not exists
    pub async fn load(&self) -> Result<AppSettings> {
        if !self.settings_path.exists() {
            tracing::info!("Settings file not found, creating default settings");
            let default = AppSettings::default();
            self.save(&default).await?;
            return Ok(default);
        }

        let content = fs::read_to_string(&self.settings_path).await?;
        let settings: AppSettings = serde_json::from_str(&content)
            .map_err(|e| AppError::Generic(format!("Failed to parse settings: {}", e)))?;

        Ok(settings)
    }

    /// Save settings to disk
    pub async fn save(&self, settings: &AppSettings) -> Result<()> {
        let content = serde_json::to_string_pretty(settings)
            .map_err(|e| AppError::Generic(format!("Failed to serialize settings: {}", e)))?;

        if let Some(parent) = self.settings_path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&self.settings_path, content).await?;
        tracing::info!("Settings saved to {:?}", self.settings_path);

        Ok(())
    }

    /// Save a new display locale, keeping the other settings
    pub async fn update_locale(&self, locale: Locale) -> Result<()> {
        let mut settings = self.load().await?;
        settings.locale = locale;
        self.save(&settings).await
    }
}

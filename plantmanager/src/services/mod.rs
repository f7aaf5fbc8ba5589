//! Services module
//!
//! Business logic services that coordinate between the UI and storage.

pub mod formatting;
pub mod plants;
pub mod scheduler;
pub mod settings;

pub use formatting::DateFormatter;
pub use plants::PlantsService;
pub use scheduler::{LocalNotificationScheduler, NotificationRequest, NotificationScheduler};
pub use settings::{AppSettings, SettingsService};

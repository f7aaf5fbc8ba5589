//! Application configuration constants
//!
//! Central location for storage keys, file names and validation
//! boundaries used throughout the application.

// ===== Storage Keys =====

/// Key holding the user's display name as a plain string
pub const USER_KEY: &str = "@plantmanager:user";

/// Key holding the JSON object of plant id -> stored plant
pub const PLANTS_KEY: &str = "@plantmanager:plants";

// ===== Files and Directories =====

/// Directory name under the platform data dir
pub const APP_DIR_NAME: &str = "plantmanager";

/// SQLite database holding the key/value store
pub const DATABASE_FILE: &str = "plantmanager.db";

/// Settings file inside the data directory
pub const SETTINGS_FILE: &str = "settings.json";

/// Log directory inside the data directory
pub const LOG_DIR: &str = "logs";

/// Log file prefix inside the log directory; a date suffix is added daily
pub const LOG_FILE: &str = "plantmanager.log";

/// Daily log files kept before the oldest is removed
pub const MAX_LOG_FILES: usize = 7;

/// Default tracing filter when neither RUST_LOG nor settings provide one
pub const DEFAULT_LOG_FILTER: &str = "plantmanager=debug,info";

// ===== Frequency Limits =====

/// Maximum waterings per repeat unit.
/// More than one per hour of a day is never a real watering plan.
pub const MAX_WATERINGS_PER_UNIT: u32 = 24;

// ===== Time Zone Limits =====

/// Largest accepted UTC offset in minutes (UTC+14:00)
pub const MAX_UTC_OFFSET_MINUTES: i32 = 14 * 60;

/// Smallest accepted UTC offset in minutes (UTC-12:00)
pub const MIN_UTC_OFFSET_MINUTES: i32 = -12 * 60;

// ===== Terminal UI =====

/// Height of one plant card row in terminal cells
pub const CARD_HEIGHT: u16 = 3;

/// Width of the revealed delete action at the right of a card
pub const DELETE_ACTION_WIDTH: u16 = 7;

/// Event poll interval in milliseconds
pub const UI_POLL_INTERVAL_MS: u64 = 100;

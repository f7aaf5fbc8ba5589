//! Plant manager library
//!
//! Plant records, watering reminders and the terminal screens, exposed
//! for the binary and the integration tests.

pub mod app;
pub mod config;
pub mod database;
pub mod error;
pub mod locale;
pub mod logging;
pub mod services;
pub mod storage;
pub mod tui;

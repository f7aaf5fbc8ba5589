//! Terminal interface for the plant screens

pub mod app;
pub mod render;
pub mod runner;
mod widgets;

#[cfg(test)]
pub mod test_utils;

pub use app::App;
pub use runner::run;

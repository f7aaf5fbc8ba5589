//! Widgets for the plants screens

mod confirm_dialog;
mod header;
mod plant_card;

pub use confirm_dialog::{AlertPopup, ConfirmDialog};
pub use header::{Header, Spotlight};
pub use plant_card::PlantCard;

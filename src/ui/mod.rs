//! Ratatui front-end: a three-field form above a table of every stored user,
//! with Ctrl chords for the add/update/delete/clear triggers.

mod app;
mod forms;
mod helpers;
mod terminal;

pub use app::App;
pub use terminal::run_app;

//! Core library surface for the User Desk TUI application.
//!
//! The form controller is written against the [`UserStore`] trait so the
//! SQLite gateway can be swapped for [`MemoryUserStore`] in tests.
pub mod config;
pub mod controller;
pub mod db;
pub mod error;
pub mod logging;
pub mod models;
pub mod ui;

pub use config::{AppConfig, LoggingConfig, StoreConfig};
pub use controller::{EditBuffer, Outcome, PendingDelete, UserController};
pub use db::{ensure_schema, MemoryUserStore, SqliteUserStore, UserStore};
pub use error::{Action, ActionError, StoreError, ValidationError};
pub use models::User;
pub use ui::{run_app, App};

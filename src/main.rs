//! Binary entry point: load configuration, start file logging, make sure the
//! `users` table exists, then drive the Ratatui event loop until the user
//! exits.
use anyhow::Context;
use user_desk::logging::init_logging;
use user_desk::{ensure_schema, run_app, App, AppConfig, SqliteUserStore, UserController};

fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("failed to load configuration")?;
    let _logger = init_logging(&config.logging.level, &config.log_dir()?)?;

    ensure_schema(&config.store)?;
    let store = SqliteUserStore::new(config.store);

    let mut app = App::new(UserController::new(store));
    app.load();
    let result = run_app(&mut app);
    if let Err(err) = &result {
        log::error!("event=app_exit status=error error={err:#}");
    }
    result
}

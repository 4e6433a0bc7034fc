use std::fs;

use anyhow::{Context, Result};
use log::{debug, info};
use rusqlite::Connection;

use crate::config::StoreConfig;
use crate::error::StoreError;

/// Open a fresh connection for a single store operation. Callers keep the
/// returned value on the stack so it is closed when the operation returns,
/// whichever way it returns.
pub(crate) fn open_connection(config: &StoreConfig) -> Result<Connection, StoreError> {
    let connect_err = |source| StoreError::Connect {
        path: config.path.clone(),
        source,
    };
    let conn = Connection::open(&config.path).map_err(connect_err)?;
    conn.busy_timeout(config.busy_timeout())
        .map_err(connect_err)?;
    debug!("event=connection_open path={}", config.path.display());
    Ok(conn)
}

/// Make sure the database file and the `users` table exist. Runs once at
/// startup; the table layout is fixed so there is nothing to migrate.
pub fn ensure_schema(config: &StoreConfig) -> Result<()> {
    if let Some(parent) = config.path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).context("failed to create data directory")?;
        }
    }

    let conn = open_connection(config).context("failed to open SQLite database")?;
    conn.execute(
        "CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            email TEXT NOT NULL
        )",
        [],
    )
    .context("failed to create users table")?;

    info!("event=schema_ready path={}", config.path.display());
    Ok(())
}

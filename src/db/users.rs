use log::debug;
use rusqlite::params;

use crate::config::StoreConfig;
use crate::error::StoreError;
use crate::models::User;

use super::connection::open_connection;
use super::UserStore;

const INSERT_USER: &str = "INSERT INTO users (name, email) VALUES (?, ?)";
const SELECT_USERS: &str = "SELECT * FROM users";
const UPDATE_USER: &str = "UPDATE users SET name = ?, email = ? WHERE id = ?";
const DELETE_USER: &str = "DELETE FROM users WHERE id = ?";

/// SQLite-backed gateway. It holds only the configuration; every call opens
/// and closes its own connection, so no state is shared between actions.
#[derive(Debug, Clone)]
pub struct SqliteUserStore {
    config: StoreConfig,
}

impl SqliteUserStore {
    pub fn new(config: StoreConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }
}

fn statement_err(statement: &'static str) -> impl Fn(rusqlite::Error) -> StoreError {
    move |source| StoreError::Statement { statement, source }
}

impl UserStore for SqliteUserStore {
    fn create(&self, name: &str, email: &str) -> Result<(), StoreError> {
        let conn = open_connection(&self.config)?;
        conn.execute(INSERT_USER, params![name, email])
            .map_err(statement_err(INSERT_USER))?;
        debug!("event=user_insert status=ok");
        Ok(())
    }

    fn list_all(&self) -> Result<Vec<User>, StoreError> {
        let conn = open_connection(&self.config)?;
        let mut stmt = conn
            .prepare(SELECT_USERS)
            .map_err(statement_err(SELECT_USERS))?;

        let users = stmt
            .query_map([], |row| {
                Ok(User {
                    id: row.get("id")?,
                    name: row.get("name")?,
                    email: row.get("email")?,
                })
            })
            .map_err(statement_err(SELECT_USERS))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(statement_err(SELECT_USERS))?;

        debug!("event=user_list status=ok rows={}", users.len());
        Ok(users)
    }

    // Zero affected rows is not an error: a missing id is a silent no-op.
    fn update_by_id(&self, id: i64, name: &str, email: &str) -> Result<(), StoreError> {
        let conn = open_connection(&self.config)?;
        let updated = conn
            .execute(UPDATE_USER, params![name, email, id])
            .map_err(statement_err(UPDATE_USER))?;
        debug!("event=user_update status=ok id={id} rows={updated}");
        Ok(())
    }

    fn delete_by_id(&self, id: i64) -> Result<(), StoreError> {
        let conn = open_connection(&self.config)?;
        let deleted = conn
            .execute(DELETE_USER, params![id])
            .map_err(statement_err(DELETE_USER))?;
        debug!("event=user_delete status=ok id={id} rows={deleted}");
        Ok(())
    }
}

//! Error taxonomy shared by the gateway and the form controller.
//!
//! Validation problems are caught locally and never reach the store. Store
//! failures are reported as-is; connectivity and constraint failures are not
//! told apart.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Any failure raised by one of the four store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("could not open database at {}: {source}", path.display())]
    Connect {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },
    #[error("{source}")]
    Statement {
        statement: &'static str,
        #[source]
        source: rusqlite::Error,
    },
    /// Raised by stores that are not backed by SQLite (the in-memory fake).
    #[error("{0}")]
    Unavailable(String),
}

impl StoreError {
    /// SQL text of the statement that failed, when the failure came from one.
    pub fn statement(&self) -> Option<&'static str> {
        match self {
            StoreError::Statement { statement, .. } => Some(*statement),
            StoreError::Connect { .. } | StoreError::Unavailable(_) => None,
        }
    }
}

/// Form actions that require a selected row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Update,
    Delete,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Update => f.write_str("update"),
            Action::Delete => f.write_str("delete"),
        }
    }
}

/// Local precondition failures. None of these touch the store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Name and Email cannot be empty.")]
    MissingFields,
    #[error("Please select a user from the table to {0}.")]
    NoSelection(Action),
}

/// Result of a form action that may fail either way.
#[derive(Debug, Error)]
pub enum ActionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Store(#[from] StoreError),
    /// The write committed but the list could not be reloaded afterwards.
    #[error(transparent)]
    Reload(StoreError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_errors_name_the_action() {
        assert_eq!(
            ValidationError::NoSelection(Action::Update).to_string(),
            "Please select a user from the table to update."
        );
        assert_eq!(
            ValidationError::NoSelection(Action::Delete).to_string(),
            "Please select a user from the table to delete."
        );
    }

    #[test]
    fn statement_is_only_known_for_statement_failures() {
        let err = StoreError::Statement {
            statement: "DELETE FROM users WHERE id = ?",
            source: rusqlite::Error::QueryReturnedNoRows,
        };
        assert_eq!(err.statement(), Some("DELETE FROM users WHERE id = ?"));
        assert_eq!(
            StoreError::Unavailable("down".to_string()).statement(),
            None
        );
    }

    #[test]
    fn store_errors_surface_the_driver_message() {
        let err = StoreError::Statement {
            statement: "SELECT * FROM users",
            source: rusqlite::Error::QueryReturnedNoRows,
        };
        assert_eq!(
            err.to_string(),
            rusqlite::Error::QueryReturnedNoRows.to_string()
        );
    }
}

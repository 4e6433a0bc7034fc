//! Persistence module split across logical submodules.

mod connection;
mod memory;
mod users;

pub use connection::ensure_schema;
pub use memory::MemoryUserStore;
pub use users::SqliteUserStore;

use crate::error::StoreError;
use crate::models::User;

/// The four statements the form can issue. Implementations must treat update
/// and delete of an unknown id as success with no effect.
pub trait UserStore {
    fn create(&self, name: &str, email: &str) -> Result<(), StoreError>;
    /// All rows in store order.
    fn list_all(&self) -> Result<Vec<User>, StoreError>;
    fn update_by_id(&self, id: i64, name: &str, email: &str) -> Result<(), StoreError>;
    fn delete_by_id(&self, id: i64) -> Result<(), StoreError>;
}

impl<S: UserStore + ?Sized> UserStore for &S {
    fn create(&self, name: &str, email: &str) -> Result<(), StoreError> {
        (**self).create(name, email)
    }

    fn list_all(&self) -> Result<Vec<User>, StoreError> {
        (**self).list_all()
    }

    fn update_by_id(&self, id: i64, name: &str, email: &str) -> Result<(), StoreError> {
        (**self).update_by_id(id, name, email)
    }

    fn delete_by_id(&self, id: i64) -> Result<(), StoreError> {
        (**self).delete_by_id(id)
    }
}

use std::cell::{Cell, RefCell};

use crate::error::StoreError;
use crate::models::User;

use super::UserStore;

/// In-memory stand-in for the SQLite gateway. Ids are assigned sequentially
/// starting at 1 and never reused, like `AUTOINCREMENT`.
#[derive(Debug)]
pub struct MemoryUserStore {
    rows: RefCell<Vec<User>>,
    next_id: Cell<i64>,
    calls: Cell<usize>,
    fail_next: RefCell<Option<String>>,
}

impl Default for MemoryUserStore {
    fn default() -> Self {
        Self {
            rows: RefCell::new(Vec::new()),
            next_id: Cell::new(1),
            calls: Cell::new(0),
            fail_next: RefCell::new(None),
        }
    }
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with `(name, email)` pairs, bypassing the call counter.
    pub fn with_users<'a>(users: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let store = Self::default();
        for (name, email) in users {
            store.insert(name, email);
        }
        store
    }

    /// Make the next store operation fail with `message`.
    pub fn fail_next(&self, message: impl Into<String>) {
        *self.fail_next.borrow_mut() = Some(message.into());
    }

    /// Number of store operations attempted so far, failed ones included.
    pub fn calls(&self) -> usize {
        self.calls.get()
    }

    pub fn snapshot(&self) -> Vec<User> {
        self.rows.borrow().clone()
    }

    fn insert(&self, name: &str, email: &str) {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.rows.borrow_mut().push(User::new(id, name, email));
    }

    fn begin(&self) -> Result<(), StoreError> {
        self.calls.set(self.calls.get() + 1);
        match self.fail_next.borrow_mut().take() {
            Some(message) => Err(StoreError::Unavailable(message)),
            None => Ok(()),
        }
    }
}

impl UserStore for MemoryUserStore {
    fn create(&self, name: &str, email: &str) -> Result<(), StoreError> {
        self.begin()?;
        self.insert(name, email);
        Ok(())
    }

    fn list_all(&self) -> Result<Vec<User>, StoreError> {
        self.begin()?;
        Ok(self.snapshot())
    }

    fn update_by_id(&self, id: i64, name: &str, email: &str) -> Result<(), StoreError> {
        self.begin()?;
        if let Some(user) = self.rows.borrow_mut().iter_mut().find(|u| u.id == id) {
            user.name = name.to_string();
            user.email = email.to_string();
        }
        Ok(())
    }

    fn delete_by_id(&self, id: i64) -> Result<(), StoreError> {
        self.begin()?;
        self.rows.borrow_mut().retain(|u| u.id != id);
        Ok(())
    }
}

//! Form state and the four user actions.
//!
//! The controller owns the edit buffer and the visible list. Every successful
//! mutation is followed by a full reload, so right after it returns the
//! visible list is exactly what the store holds. A failed write leaves the
//! buffer, the selection and the list as they were. A failed reload after a
//! committed write clears the buffer and keeps the previous list.

use log::{info, warn};

use crate::db::UserStore;
use crate::error::{Action, ActionError, StoreError, ValidationError};
use crate::models::User;

/// Scratch copy of the record being created or edited. `id` is only set after
/// a row has been selected from the list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditBuffer {
    pub id: Option<i64>,
    pub name: String,
    pub email: String,
}

impl EditBuffer {
    fn from_user(user: &User) -> Self {
        Self {
            id: Some(user.id),
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }

    /// Trimmed name and email, or an error when either is blank.
    fn required_fields(&self) -> Result<(String, String), ValidationError> {
        let name = self.name.trim();
        let email = self.email.trim();
        if name.is_empty() || email.is_empty() {
            return Err(ValidationError::MissingFields);
        }
        Ok((name.to_string(), email.to_string()))
    }

    fn selected_id(&self, action: Action) -> Result<i64, ValidationError> {
        self.id.ok_or(ValidationError::NoSelection(action))
    }
}

/// What a successful action did, for the confirmation message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Created { name: String },
    Updated { id: i64 },
    Deleted { id: i64 },
}

impl Outcome {
    pub fn message(&self) -> String {
        match self {
            Outcome::Created { name } => format!("User {name} added successfully!"),
            Outcome::Updated { id } => format!("User #{id} updated successfully!"),
            Outcome::Deleted { id } => format!("User #{id} deleted successfully!"),
        }
    }
}

/// A delete that passed the selection check and now waits for a yes/no.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDelete {
    pub id: i64,
    pub name: String,
}

pub struct UserController<S> {
    store: S,
    buffer: EditBuffer,
    users: Vec<User>,
    selection: Option<usize>,
}

impl<S: UserStore> UserController<S> {
    /// Build a controller with an empty visible list. Call [`Self::load`] to
    /// populate it.
    pub fn new(store: S) -> Self {
        Self {
            store,
            buffer: EditBuffer::default(),
            users: Vec::new(),
            selection: None,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn buffer(&self) -> &EditBuffer {
        &self.buffer
    }

    pub fn selection(&self) -> Option<usize> {
        self.selection
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.buffer.name = name.into();
    }

    pub fn set_email(&mut self, email: impl Into<String>) {
        self.buffer.email = email.into();
    }

    pub fn name_mut(&mut self) -> &mut String {
        &mut self.buffer.name
    }

    pub fn email_mut(&mut self) -> &mut String {
        &mut self.buffer.email
    }

    /// Replace the visible list with the store's current contents. On failure
    /// the previous list stays in place.
    pub fn load(&mut self) -> Result<(), StoreError> {
        match self.store.list_all() {
            Ok(users) => {
                self.users = users;
                Ok(())
            }
            Err(err) => {
                log_store_failure("user_reload", &err);
                Err(err)
            }
        }
    }

    /// Copy the visible row at `index` into the edit buffer. Returns `false`
    /// when the index is out of range.
    pub fn select_row(&mut self, index: usize) -> bool {
        match self.users.get(index) {
            Some(user) => {
                self.buffer = EditBuffer::from_user(user);
                self.selection = Some(index);
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.buffer = EditBuffer::default();
        self.selection = None;
    }

    pub fn create(&mut self) -> Result<Outcome, ActionError> {
        let (name, email) = self.buffer.required_fields()?;
        self.store
            .create(&name, &email)
            .inspect_err(|err| log_store_failure("user_create", err))?;
        self.finish_mutation()?;
        info!("event=user_create status=ok");
        Ok(Outcome::Created { name })
    }

    pub fn update(&mut self) -> Result<Outcome, ActionError> {
        let id = self.buffer.selected_id(Action::Update)?;
        let name = self.buffer.name.trim().to_string();
        let email = self.buffer.email.trim().to_string();
        self.store
            .update_by_id(id, &name, &email)
            .inspect_err(|err| log_store_failure("user_update", err))?;
        self.finish_mutation()?;
        info!("event=user_update status=ok id={id}");
        Ok(Outcome::Updated { id })
    }

    /// First half of a delete: check that a row is selected. Nothing changes
    /// until [`Self::resolve_delete`] is called with the user's answer.
    pub fn request_delete(&self) -> Result<PendingDelete, ValidationError> {
        let id = self.buffer.selected_id(Action::Delete)?;
        Ok(PendingDelete {
            id,
            name: self.buffer.name.clone(),
        })
    }

    /// Second half of a delete. Declining returns `Ok(None)` and leaves all
    /// state untouched.
    pub fn resolve_delete(
        &mut self,
        pending: PendingDelete,
        confirmed: bool,
    ) -> Result<Option<Outcome>, ActionError> {
        if !confirmed {
            info!("event=user_delete status=declined id={}", pending.id);
            return Ok(None);
        }
        let id = pending.id;
        self.store
            .delete_by_id(id)
            .inspect_err(|err| log_store_failure("user_delete", err))?;
        self.finish_mutation()?;
        info!("event=user_delete status=ok id={id}");
        Ok(Some(Outcome::Deleted { id }))
    }

    // The write has committed at this point, so the buffer is cleared even
    // when the reload fails; keeping it would let the same action run twice.
    fn finish_mutation(&mut self) -> Result<(), ActionError> {
        self.clear();
        self.load().map_err(ActionError::Reload)
    }
}

fn log_store_failure(event: &str, err: &StoreError) {
    match err.statement() {
        Some(statement) => {
            warn!("event={event} status=error statement=\"{statement}\" error={err}")
        }
        None => warn!("event={event} status=error error={err}"),
    }
}

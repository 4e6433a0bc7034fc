//! Domain model mirroring the `users` table. The struct stays a plain data
//! holder so the gateway and the form logic can pass it around freely.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
/// One row of the `users` table.
pub struct User {
    /// Store-assigned primary key. The form never invents one; it only echoes
    /// back what a full reload returned.
    pub id: i64,
    pub name: String,
    pub email: String,
}

impl User {
    pub fn new(id: i64, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
        }
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <{}>", self.name, self.email)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_shows_name_and_email() {
        let user = User::new(3, "Ann", "ann@x.com");
        assert_eq!(user.to_string(), "Ann <ann@x.com>");
    }
}

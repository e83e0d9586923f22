use crate::model::Session;

/// Name given to a history created on first completion.
pub const DEFAULT_USER_NAME: &str = "User";

/// A user's permanent session history.
///
/// Sessions are kept in insertion order, which is also chronological order;
/// history grows monotonically and past sessions are never edited or removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    name: String,
    sessions: Vec<Session>,
}

impl User {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sessions: Vec::new(),
        }
    }

    /// Rehydrate a user from persisted storage.
    #[must_use]
    pub fn from_persisted(name: String, sessions: Vec<Session>) -> Self {
        Self { name, sessions }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    /// Returns a new `User` with `session` appended; `self` is left untouched.
    #[must_use]
    pub fn with_session(&self, session: Session) -> Self {
        let mut sessions = self.sessions.clone();
        sessions.push(session);
        Self {
            name: self.name.clone(),
            sessions,
        }
    }
}

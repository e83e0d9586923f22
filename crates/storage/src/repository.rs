use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use thiserror::Error;

use worry_core::model::{AnxietyRating, Session, SessionError, User};

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("io error: {0}")]
    Io(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Persisted shape for a completed session.
///
/// Mirrors the domain `Session` so the store can serialize/deserialize without
/// leaking storage concerns into the domain layer. Ratings round-trip as bare
/// integers and are range-checked again on the way back in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    pub worry: String,
    pub duration_minutes: u32,
    pub initial_anxiety: AnxietyRating,
    pub final_anxiety: AnxietyRating,
    pub answers: Vec<String>,
    pub reflections: Vec<String>,
    pub elapsed_seconds: u64,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
}

impl SessionRecord {
    #[must_use]
    pub fn from_session(session: &Session) -> Self {
        Self {
            worry: session.worry().to_owned(),
            duration_minutes: session.duration_minutes(),
            initial_anxiety: session.initial_anxiety(),
            final_anxiety: session.final_anxiety(),
            answers: session.answers().to_vec(),
            reflections: session.reflections().to_vec(),
            elapsed_seconds: session.elapsed_seconds(),
            started_at: session.started_at(),
            completed_at: session.completed_at(),
        }
    }

    /// Convert the record back into a domain `Session`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if the persisted values fail revalidation.
    pub fn into_session(self) -> Result<Session, SessionError> {
        Session::from_persisted(
            self.worry,
            self.duration_minutes,
            self.initial_anxiety,
            self.final_anxiety,
            self.answers,
            self.reflections,
            self.elapsed_seconds,
            self.started_at,
            self.completed_at,
        )
    }
}

/// Persisted shape for the single user history record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub name: String,
    pub sessions: Vec<SessionRecord>,
}

impl UserRecord {
    #[must_use]
    pub fn from_user(user: &User) -> Self {
        Self {
            name: user.name().to_owned(),
            sessions: user
                .sessions()
                .iter()
                .map(SessionRecord::from_session)
                .collect(),
        }
    }

    /// Convert the record back into a domain `User`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if any persisted session fails revalidation.
    pub fn into_user(self) -> Result<User, SessionError> {
        let sessions = self
            .sessions
            .into_iter()
            .map(SessionRecord::into_session)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(User::from_persisted(self.name, sessions))
    }
}

/// Storage contract for the single persisted user history.
pub trait UserStore: Send + Sync {
    /// Read the persisted history, if one exists.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the record exists but cannot be read or
    /// decoded. An absent record is `Ok(None)`, not an error.
    fn load(&self) -> Result<Option<User>, StorageError>;

    /// Persist the full history, replacing any previous record.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the record cannot be written.
    fn save(&self, user: &User) -> Result<(), StorageError>;
}

/// Simple in-memory store for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryUserStore {
    user: Arc<Mutex<Option<User>>>,
}

impl InMemoryUserStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl UserStore for InMemoryUserStore {
    fn load(&self) -> Result<Option<User>, StorageError> {
        let guard = self.user.lock().map_err(|e| StorageError::Io(e.to_string()))?;
        Ok(guard.clone())
    }

    fn save(&self, user: &User) -> Result<(), StorageError> {
        let mut guard = self.user.lock().map_err(|e| StorageError::Io(e.to_string()))?;
        *guard = Some(user.clone());
        Ok(())
    }
}

use std::sync::Arc;

use tracing::warn;

use storage::UserStore;
use worry_core::model::{DEFAULT_USER_NAME, Session, User};

/// How many recent worries the dashboard lists.
const RECENT_WORRIES: usize = 3;

/// How many sessions feed the anxiety trend chart.
const TREND_WINDOW: usize = 5;

/// One bar of the anxiety trend chart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendPoint {
    /// `initial - final` for the session; positive = anxiety reduction.
    pub delta: i16,
    /// `delta` normalized into 0.0..=1.0 over the representable -4..=4 range,
    /// ready to use as a relative bar height.
    pub bar_height: f32,
}

impl TrendPoint {
    fn from_session(session: &Session) -> Self {
        let delta = session.anxiety_delta();
        let span = f32::from(2 * (i16::from(worry_core::model::AnxietyRating::MAX) - 1));
        Self {
            delta,
            bar_height: (f32::from(delta) + span / 2.0) / span,
        }
    }
}

/// Aggregated view of a user's history, useful for the dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct HistorySummary {
    pub total_sessions: usize,
    pub total_elapsed_seconds: u64,
    /// Most recent worries, newest first.
    pub recent_worries: Vec<String>,
    /// Trend over the most recent sessions, oldest first.
    pub trend: Vec<TrendPoint>,
}

impl HistorySummary {
    #[must_use]
    pub fn empty() -> Self {
        Self {
            total_sessions: 0,
            total_elapsed_seconds: 0,
            recent_worries: Vec::new(),
            trend: Vec::new(),
        }
    }
}

/// Append-only session history over an injected store.
///
/// Persistence is best-effort: a store that cannot be read falls back to a
/// fresh history, and a store that cannot be written never blocks the current
/// run. Both cases are logged rather than propagated, so an in-progress
/// session can always reach the dashboard.
#[derive(Clone)]
pub struct HistoryService {
    store: Arc<dyn UserStore>,
}

impl HistoryService {
    #[must_use]
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    /// Read the persisted history. Fail-soft: an unreadable or corrupt record
    /// is logged and treated as no history.
    #[must_use]
    pub fn load(&self) -> Option<User> {
        match self.store.load() {
            Ok(user) => user,
            Err(err) => {
                warn!(%err, "failed to load history, starting fresh");
                None
            }
        }
    }

    /// Append `session` to `user` (creating a default-named user when history
    /// is absent) and persist the result before returning it.
    ///
    /// The prior `User` value is never mutated. A persistence failure is
    /// logged and the updated in-memory value is still returned, so the
    /// dashboard for the just-completed session always renders.
    #[must_use]
    pub fn append(&self, user: Option<&User>, session: Session) -> User {
        let updated = match user {
            Some(user) => user.with_session(session),
            None => User::new(DEFAULT_USER_NAME).with_session(session),
        };

        if let Err(err) = self.store.save(&updated) {
            warn!(%err, "failed to persist history, keeping in-memory copy");
        }

        updated
    }

    /// Derive dashboard aggregates from a user's sessions. Pure.
    #[must_use]
    pub fn aggregate(user: &User) -> HistorySummary {
        let sessions = user.sessions();

        let recent_worries = sessions
            .iter()
            .rev()
            .take(RECENT_WORRIES)
            .map(|s| s.worry().to_owned())
            .collect();

        let trend_start = sessions.len().saturating_sub(TREND_WINDOW);
        let trend = sessions[trend_start..]
            .iter()
            .map(TrendPoint::from_session)
            .collect();

        HistorySummary {
            total_sessions: sessions.len(),
            total_elapsed_seconds: sessions.iter().map(Session::elapsed_seconds).sum(),
            recent_worries,
            trend,
        }
    }
}

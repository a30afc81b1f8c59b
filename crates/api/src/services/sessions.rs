//! In-memory registry of authenticated report sessions.
//!
//! Each login gets an opaque bearer token. Only the token's SHA-256 digest is
//! kept as the map key. Sessions idle longer than the configured timeout are
//! dropped the next time anyone looks them up.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use domain::models::ReportSession;
use shared::crypto::{generate_session_token, sha256_hex};
use tokio::sync::Mutex;

/// Shared handle to one session's mutable state.
pub type SessionHandle = Arc<Mutex<ReportSession>>;

struct SessionEntry {
    report_id: String,
    handle: SessionHandle,
    last_seen: Instant,
}

/// Token-keyed session registry.
pub struct SessionStore {
    sessions: RwLock<HashMap<String, SessionEntry>>,
    idle_timeout: Duration,
}

impl SessionStore {
    pub fn new(idle_timeout: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            idle_timeout,
        }
    }

    /// Registers a session and returns its bearer token.
    pub fn insert(&self, session: ReportSession) -> String {
        let token = generate_session_token();
        let entry = SessionEntry {
            report_id: session.report_id().to_string(),
            handle: Arc::new(Mutex::new(session)),
            last_seen: Instant::now(),
        };

        let mut sessions = self.write();
        sessions.insert(sha256_hex(&token), entry);
        metrics::gauge!("report_sessions_active").set(sessions.len() as f64);
        token
    }

    /// Looks up a live session and refreshes its idle clock.
    pub fn get(&self, token: &str) -> Option<SessionHandle> {
        let key = sha256_hex(token);
        let mut sessions = self.write();

        match sessions.get_mut(&key) {
            None => return None,
            Some(entry) if entry.last_seen.elapsed() <= self.idle_timeout => {
                entry.last_seen = Instant::now();
                return Some(entry.handle.clone());
            }
            Some(_) => {}
        }

        if let Some(entry) = sessions.remove(&key) {
            tracing::info!(report_id = %entry.report_id, "Session expired");
        }
        metrics::gauge!("report_sessions_active").set(sessions.len() as f64);
        None
    }

    /// Destroys a session. Returns whether it existed.
    pub fn remove(&self, token: &str) -> bool {
        let mut sessions = self.write();
        let removed = sessions.remove(&sha256_hex(token)).is_some();
        metrics::gauge!("report_sessions_active").set(sessions.len() as f64);
        removed
    }

    /// Whether a live session already holds this report id.
    pub fn holds_report(&self, report_id: &str) -> bool {
        self.read()
            .values()
            .any(|entry| entry.report_id == report_id && entry.last_seen.elapsed() <= self.idle_timeout)
    }

    /// Drops every idle session. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let mut sessions = self.write();
        let before = sessions.len();
        sessions.retain(|_, entry| entry.last_seen.elapsed() <= self.idle_timeout);
        let removed = before - sessions.len();
        metrics::gauge!("report_sessions_active").set(sessions.len() as f64);
        removed
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // A poisoned lock only means another request panicked mid-update; the map
    // itself is still consistent.
    fn read(&self) -> std::sync::RwLockReadGuard<'_, HashMap<String, SessionEntry>> {
        self.sessions.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<String, SessionEntry>> {
        self.sessions.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("active_sessions", &self.len())
            .field("idle_timeout", &self.idle_timeout)
            .finish()
    }
}

//! Drops idle report sessions that were never touched again.
//!
//! Expiry is otherwise only noticed when a token is presented, so an officer
//! who walks away would keep an unfinalized draft in memory indefinitely.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use super::scheduler::Job;
use crate::services::sessions::SessionStore;

pub struct SessionSweepJob {
    sessions: Arc<SessionStore>,
}

impl SessionSweepJob {
    pub fn new(sessions: Arc<SessionStore>) -> Self {
        Self { sessions }
    }
}

#[async_trait::async_trait]
impl Job for SessionSweepJob {
    fn name(&self) -> &'static str {
        "session_sweep"
    }

    fn interval(&self) -> Duration {
        Duration::from_secs(60)
    }

    async fn execute(&self) -> Result<(), String> {
        let purged = self.sessions.purge_expired();
        if purged > 0 {
            info!(purged, remaining = self.sessions.len(), "Expired idle sessions");
        }
        Ok(())
    }
}

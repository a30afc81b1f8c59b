//! Forgets login throttle state for badges that are whole again.
//!
//! Login attempts name arbitrary badge numbers, so without this the throttle
//! would hold one entry for every string ever tried.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use super::scheduler::Job;
use crate::services::LoginThrottle;

pub struct ThrottlePruneJob {
    throttle: Arc<LoginThrottle>,
}

impl ThrottlePruneJob {
    pub fn new(throttle: Arc<LoginThrottle>) -> Self {
        Self { throttle }
    }
}

#[async_trait::async_trait]
impl Job for ThrottlePruneJob {
    fn name(&self) -> &'static str {
        "login_throttle_prune"
    }

    fn interval(&self) -> Duration {
        Duration::from_secs(60)
    }

    async fn execute(&self) -> Result<(), String> {
        let pruned = self.throttle.prune();
        let tracked = self.throttle.tracked_badges();
        metrics::gauge!("login_throttle_tracked_badges").set(tracked as f64);
        if pruned > 0 {
            debug!(pruned, tracked, "Pruned login throttle state");
        }
        Ok(())
    }
}

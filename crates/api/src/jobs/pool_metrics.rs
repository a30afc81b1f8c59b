//! Periodic connection pool gauges.

use std::time::Duration;

use sqlx::SqlitePool;

use super::scheduler::Job;

pub struct PoolMetricsJob {
    pool: SqlitePool,
}

impl PoolMetricsJob {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl Job for PoolMetricsJob {
    fn name(&self) -> &'static str {
        "pool_metrics"
    }

    fn interval(&self) -> Duration {
        Duration::from_secs(10)
    }

    async fn execute(&self) -> Result<(), String> {
        persistence::metrics::record_pool_metrics(&self.pool);
        Ok(())
    }
}

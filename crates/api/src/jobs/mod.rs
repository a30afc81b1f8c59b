//! Periodic background maintenance.

mod pool_metrics;
mod scheduler;
mod session_sweep;
mod throttle_prune;

pub use pool_metrics::PoolMetricsJob;
pub use scheduler::{Job, JobScheduler};
pub use session_sweep::SessionSweepJob;
pub use throttle_prune::ThrottlePruneJob;

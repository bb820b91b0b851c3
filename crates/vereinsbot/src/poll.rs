//! Bounded retry-with-delay polling.
//!
//! The multi-step run protocol has no push notification for completion, so the
//! run status has to be polled. This keeps the counting loop out of the
//! provider code and makes the ceiling and interval testable with tokio's
//! paused clock.

use std::future::Future;
use std::time::Duration;

#[derive(Debug, Clone, Copy)]
pub struct PollConfig {
    pub max_attempts: u32,
    pub interval: Duration,
}

impl Default for PollConfig {
    /// 40 attempts at 750ms, roughly a 30 second wall-clock budget.
    fn default() -> Self {
        Self {
            max_attempts: 40,
            interval: Duration::from_millis(750),
        }
    }
}

/// Outcome of one poll attempt.
pub enum PollOutcome<T> {
    Done(T),
    Pending,
}

/// Run `check` up to `max_attempts` times, sleeping `interval` between
/// attempts. Returns `Ok(None)` when the ceiling is reached without a
/// terminal outcome; errors from `check` propagate immediately.
pub async fn poll_until<T, E, F, Fut>(config: PollConfig, mut check: F) -> Result<Option<T>, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<PollOutcome<T>, E>>,
{
    for attempt in 0..config.max_attempts {
        match check().await? {
            PollOutcome::Done(value) => return Ok(Some(value)),
            PollOutcome::Pending => {
                if attempt + 1 < config.max_attempts {
                    tokio::time::sleep(config.interval).await;
                }
            }
        }
    }
    Ok(None)
}

//! Readiness polling against a UI that is slow to settle.
//!
//! "Present" does not always mean "interactive" on the portal (animated
//! transitions run after elements appear), so clicks go through
//! `wait_until` followed by an explicit `settle`.

use std::future::Future;
use std::time::Duration;

use tokio::time::{Instant, sleep};
use tracing::debug;

use crate::error::DriverError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Readiness {
    /// Upper bound for any single wait.
    pub timeout: Duration,
    pub poll_interval: Duration,
    /// Extra delay between an element appearing and interacting with it.
    pub settle: Duration,
}

impl Default for Readiness {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            poll_interval: Duration::from_millis(250),
            settle: Duration::from_secs(3),
        }
    }
}

impl Readiness {
    /// Poll `check` until it returns `true`, or fail with `DriverError::Timeout`.
    pub async fn wait_until<F, Fut>(&self, what: &str, mut check: F) -> Result<(), DriverError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<bool, DriverError>>,
    {
        let started = Instant::now();
        loop {
            if check().await? {
                debug!(what, waited_ms = started.elapsed().as_millis() as u64, "ready");
                return Ok(());
            }

            let waited = started.elapsed();
            if waited >= self.timeout {
                return Err(DriverError::Timeout {
                    what: what.to_string(),
                    waited,
                });
            }

            sleep(self.poll_interval.min(self.timeout - waited)).await;
        }
    }

    pub async fn settle(&self) {
        if !self.settle.is_zero() {
            sleep(self.settle).await;
        }
    }
}

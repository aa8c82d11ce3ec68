use std::time::Duration;

use tokio::time::{Instant, sleep};
use tracing::debug;

pub const DEFAULT_MIN_INTERVAL: Duration = Duration::from_millis(1500);

/// Keeps consecutive outbound requests at least `min_interval` apart.
///
/// Owned by whoever sends the requests; a second caller needs its own.
#[derive(Debug, Clone)]
pub struct RequestThrottle {
    min_interval: Duration,
    last_request: Option<Instant>,
}

impl Default for RequestThrottle {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_INTERVAL)
    }
}

impl RequestThrottle {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_request: None,
        }
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    pub fn last_request(&self) -> Option<Instant> {
        self.last_request
    }

    /// How long a request issued at `now` still has to wait.
    pub fn wait_time(&self, now: Instant) -> Duration {
        match self.last_request {
            Some(last) => (last + self.min_interval).saturating_duration_since(now),
            None => Duration::ZERO,
        }
    }

    /// Suspends until the interval has elapsed, then records the new request time.
    pub async fn acquire(&mut self) -> Instant {
        let wait = self.wait_time(Instant::now());
        if !wait.is_zero() {
            debug!("Throttling outbound request for {} ms", wait.as_millis());
            sleep(wait).await;
        }
        let now = Instant::now();
        self.last_request = Some(now);
        now
    }
}

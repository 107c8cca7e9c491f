use std::time::Duration;

use rand::Rng;
use reqwest::Method;

pub const DEFAULT_MAX_RETRIES: u32 = 4;
pub const DEFAULT_MAX_INTERVAL: Duration = Duration::from_secs(30);

const INITIAL_BACKOFF: Duration = Duration::from_secs(1);

/// automatic retry settings for a client; disabled unless enabled explicitly
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub max_interval: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            max_interval: DEFAULT_MAX_INTERVAL,
        }
    }
}

impl RetryPolicy {
    /// zero for either argument selects its default
    pub fn new(max_retries: u32, max_interval: Duration) -> Self {
        Self {
            max_retries: if max_retries == 0 {
                DEFAULT_MAX_RETRIES
            } else {
                max_retries
            },
            max_interval: if max_interval.is_zero() {
                DEFAULT_MAX_INTERVAL
            } else {
                max_interval
            },
        }
    }

    /// whether a response with this status may be retried for this method
    pub fn should_retry_status(&self, method: &Method, status: u16) -> bool {
        match status {
            429 => true,
            501 => false,
            500..=599 => is_idempotent(method),
            _ => false,
        }
    }

    /// whether a failed send (no response) may be retried for this method
    pub fn should_retry_transport(&self, method: &Method) -> bool {
        is_idempotent(method)
    }

    /// delay before retry number `attempt` (zero based)
    pub fn delay(&self, attempt: u32, retry_after: Option<Duration>) -> Duration {
        if let Some(wait) = retry_after {
            return wait.min(self.max_interval);
        }

        let base = INITIAL_BACKOFF.saturating_mul(2u32.saturating_pow(attempt.min(16)));
        let jitter_ms = rand::thread_rng().gen_range(0..=base.as_millis() as u64 / 2);
        (base + Duration::from_millis(jitter_ms)).min(self.max_interval)
    }
}

fn is_idempotent(method: &Method) -> bool {
    matches!(
        *method,
        Method::GET | Method::HEAD | Method::PUT | Method::DELETE | Method::OPTIONS
    )
}

/// parse a `Retry-After` header given in whole seconds
pub fn parse_retry_after(value: &str) -> Option<Duration> {
    value.trim().parse::<u64>().ok().map(Duration::from_secs)
}

//! Circuit breaker for data provider rate limiting and IP bans.
//!
//! When the provider returns HTTP 403 (IP ban) or keeps failing, the breaker
//! opens and refuses every request until the cooldown has elapsed. Each
//! pipeline run still makes its own request; the breaker only stops a blocked
//! client from hammering the provider.

use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

/// State of the circuit breaker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BreakerState {
    /// Requests are allowed.
    Closed,
    /// Requests are refused until `opened_at + cooldown`.
    Open { opened_at: Instant },
}

#[derive(Debug)]
struct Inner {
    state: BreakerState,
    consecutive_failures: u32,
}

/// Circuit breaker shared by every request a provider makes.
#[derive(Debug)]
pub struct CircuitBreaker {
    inner: Mutex<Inner>,
    cooldown: Duration,
    failure_threshold: u32,
}

impl CircuitBreaker {
    pub fn new(cooldown: Duration, failure_threshold: u32) -> Self {
        Self {
            inner: Mutex::new(Inner {
                state: BreakerState::Closed,
                consecutive_failures: 0,
            }),
            cooldown,
            failure_threshold: failure_threshold.max(1),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // A panic while holding the lock cannot leave Inner half-updated.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Check if requests are currently allowed; closes the breaker once the
    /// cooldown has run out.
    pub fn is_allowed(&self) -> bool {
        let mut inner = self.lock();
        match inner.state {
            BreakerState::Closed => true,
            BreakerState::Open { opened_at } if opened_at.elapsed() >= self.cooldown => {
                tracing::info!("circuit breaker cooldown elapsed, closing");
                inner.state = BreakerState::Closed;
                inner.consecutive_failures = 0;
                true
            }
            BreakerState::Open { .. } => false,
        }
    }

    pub fn record_success(&self) {
        self.lock().consecutive_failures = 0;
    }

    /// Count a failure; opens the breaker when the threshold is reached.
    pub fn record_failure(&self) {
        let mut inner = self.lock();
        inner.consecutive_failures += 1;
        if inner.consecutive_failures >= self.failure_threshold {
            tracing::warn!(
                failures = inner.consecutive_failures,
                "circuit breaker opened after repeated provider failures"
            );
            inner.state = BreakerState::Open {
                opened_at: Instant::now(),
            };
        }
    }

    /// Open immediately (HTTP 403).
    pub fn trip(&self) {
        tracing::warn!("circuit breaker tripped by provider ban");
        self.lock().state = BreakerState::Open {
            opened_at: Instant::now(),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_closed() {
        let cb = CircuitBreaker::new(Duration::from_secs(60), 3);
        assert!(cb.is_allowed());
    }

    #[test]
    fn opens_at_threshold() {
        let cb = CircuitBreaker::new(Duration::from_secs(60), 3);
        cb.record_failure();
        cb.record_failure();
        assert!(cb.is_allowed());
        cb.record_failure();
        assert!(!cb.is_allowed());
    }

    #[test]
    fn success_resets_count() {
        let cb = CircuitBreaker::new(Duration::from_secs(60), 2);
        cb.record_failure();
        cb.record_success();
        cb.record_failure();
        assert!(cb.is_allowed());
    }

    #[test]
    fn trip_is_immediate() {
        let cb = CircuitBreaker::new(Duration::from_secs(60), 3);
        cb.trip();
        assert!(!cb.is_allowed());
    }

    #[test]
    fn zero_cooldown_recloses() {
        let cb = CircuitBreaker::new(Duration::ZERO, 1);
        cb.trip();
        assert!(cb.is_allowed());
        assert!(cb.is_allowed());
    }
}

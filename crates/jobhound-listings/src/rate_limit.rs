//! Request pacing for the listings API.
//!
//! The API's usage policy asks anonymous clients to keep search traffic to
//! roughly one request per second. [`TokenBucket`] models that as a bucket
//! holding `capacity` tokens that refills one token per `interval`; each
//! page fetch spends one token, waiting if none is available.

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

#[derive(Debug)]
struct BucketState {
    tokens: u32,
    last_refill: Instant,
}

/// Token bucket rate limiter.
///
/// Uses `tokio::time::Instant`, so tests can drive it with a paused clock.
#[derive(Debug)]
pub struct TokenBucket {
    capacity: u32,
    interval: Duration,
    state: Mutex<BucketState>,
}

impl TokenBucket {
    /// Creates a full bucket holding `capacity` tokens (minimum 1) that
    /// regains one token per `interval`.
    ///
    /// A zero `interval` never blocks.
    #[must_use]
    pub fn new(capacity: u32, interval: Duration) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            interval,
            state: Mutex::new(BucketState {
                tokens: capacity,
                last_refill: Instant::now(),
            }),
        }
    }

    /// One request per `interval`, no bursting.
    #[must_use]
    pub fn per_interval(interval: Duration) -> Self {
        Self::new(1, interval)
    }

    /// A limiter that never waits.
    #[must_use]
    pub fn unlimited() -> Self {
        Self::new(1, Duration::ZERO)
    }

    /// Waits until a token is available and takes it.
    pub async fn acquire(&self) {
        if self.interval.is_zero() {
            return;
        }

        loop {
            let wait = {
                let mut state = self.state.lock().await;
                let now = Instant::now();
                self.refill(&mut state, now);
                if state.tokens > 0 {
                    state.tokens -= 1;
                    return;
                }
                self.interval
                    .saturating_sub(now.saturating_duration_since(state.last_refill))
            };
            tracing::trace!(?wait, "rate limiter waiting for token");
            tokio::time::sleep(wait).await;
        }
    }

    fn refill(&self, state: &mut BucketState, now: Instant) {
        let elapsed = now.saturating_duration_since(state.last_refill);
        let earned = elapsed.as_nanos() / self.interval.as_nanos();
        if earned == 0 {
            return;
        }

        let missing = self.capacity - state.tokens;
        if earned >= u128::from(missing) {
            state.tokens = self.capacity;
            state.last_refill = now;
        } else {
            // earned < missing <= u32::MAX here
            let earned = u32::try_from(earned).unwrap_or(missing);
            state.tokens += earned;
            state.last_refill += self.interval * earned;
        }
    }
}

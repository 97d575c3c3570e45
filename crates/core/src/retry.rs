//! Bounded-attempt, fixed-delay retry policy.
//!
//! One abstraction covers both retrying loops on the control channel:
//! the firmware version probe (5 attempts, 250 ms apart) and raw read
//! transfers (3 attempts, no delay).

use crate::error::{Error, Result};
use std::time::Duration;
use tracing::debug;

/// Attempts used when probing the firmware version.
pub const PROBE_ATTEMPTS: usize = 5;
/// Delay between firmware probe attempts.
pub const PROBE_DELAY: Duration = Duration::from_millis(250);
/// Attempts used for a single read transfer.
pub const READ_ATTEMPTS: usize = 3;

/// Invoke `op` up to `attempts` times, sleeping `delay` between failed
/// attempts, returning the first success.
///
/// After exhaustion the last observed error propagates.
pub fn with_retries<T>(
    attempts: usize,
    delay: Duration,
    mut op: impl FnMut() -> Result<T>,
) -> Result<T> {
    let mut last_error = None;
    for attempt in 1..=attempts {
        match op() {
            Ok(value) => {
                if attempt > 1 {
                    debug!(attempt, "operation succeeded after retry");
                }
                return Ok(value);
            }
            Err(e) => {
                debug!(attempt, attempts, error = %e, "attempt failed");
                last_error = Some(e);
                if attempt < attempts && !delay.is_zero() {
                    std::thread::sleep(delay);
                }
            }
        }
    }
    Err(last_error.unwrap_or_else(|| Error::Transport("retry loop ran zero attempts".into())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn first_success_returns_immediately() {
        let mut calls = 0;
        let result = with_retries(3, Duration::ZERO, || {
            calls += 1;
            Ok(42)
        });
        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls, 1);
    }

    #[test]
    fn succeeds_after_transient_failures() {
        let mut calls = 0;
        let result = with_retries(3, Duration::ZERO, || {
            calls += 1;
            if calls < 3 {
                Err(Error::Transport("short transfer".into()))
            } else {
                Ok(calls)
            }
        });
        assert_eq!(result.unwrap(), 3);
    }

    #[test]
    fn exhaustion_returns_last_error() {
        let mut calls = 0;
        let result: Result<()> = with_retries(5, Duration::ZERO, || {
            calls += 1;
            Err(Error::Transport(format!("failure {calls}")))
        });
        assert_eq!(calls, 5);
        match result {
            Err(Error::Transport(msg)) => assert_eq!(msg, "failure 5"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn delay_applies_between_attempts_only() {
        let start = Instant::now();
        let _: Result<()> = with_retries(3, Duration::from_millis(10), || {
            Err(Error::Transport("always".into()))
        });
        let elapsed = start.elapsed();
        // Two inter-attempt sleeps, not three.
        assert!(elapsed >= Duration::from_millis(20));
        assert!(elapsed < Duration::from_millis(500));
    }
}

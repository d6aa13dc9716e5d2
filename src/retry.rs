//! Retry policy for transport calls.

use crate::error::{AmsError, AmsResult};

/// Bounded sequential retry for transport failures.
///
/// Only [`AmsError::Transport`] is re-attempted; a non-2xx response
/// ([`AmsError::RequestFailed`]) or any local error surfaces immediately.
/// Attempts run back to back with no delay, and once the budget is exhausted
/// the last transport error is returned unchanged.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_attempts: u32,
}

/// Default total attempt count (initial call included).
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS)
    }
}

impl RetryPolicy {
    /// Create a policy allowing `max_attempts` total calls (minimum 1).
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
        }
    }

    /// Total attempt budget.
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Run `call`, re-attempting on transport errors up to the budget.
    pub fn run<T>(&self, mut call: impl FnMut() -> AmsResult<T>) -> AmsResult<T> {
        let mut attempt = 1;
        loop {
            match call() {
                Ok(value) => return Ok(value),
                Err(error) if error.is_transport() && attempt < self.max_attempts => {
                    tracing::debug!(
                        attempt,
                        max_attempts = self.max_attempts,
                        error = %error,
                        "retrying after transport error"
                    );
                    attempt += 1;
                }
                Err(error) => return Err(error),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn transport_error() -> AmsError {
        // Malformed URL fails inside reqwest before any I/O happens.
        reqwest::blocking::Client::new()
            .get("http://")
            .send()
            .expect_err("an empty host must not resolve")
            .into()
    }

    #[test]
    fn test_succeeds_after_two_transport_failures() {
        let calls = Cell::new(0u32);
        let result = RetryPolicy::default().run(|| {
            calls.set(calls.get() + 1);
            if calls.get() < 3 {
                Err(transport_error())
            } else {
                Ok(42)
            }
        });
        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.get(), 3);
    }

    #[test]
    fn test_exhausts_budget_then_surfaces_transport_error() {
        let calls = Cell::new(0u32);
        let result: AmsResult<()> = RetryPolicy::default().run(|| {
            calls.set(calls.get() + 1);
            Err(transport_error())
        });
        assert_eq!(calls.get(), 3);
        assert!(matches!(result, Err(AmsError::Transport(_))));
    }

    #[test]
    fn test_request_failed_is_not_retried() {
        let calls = Cell::new(0u32);
        let result: AmsResult<()> = RetryPolicy::default().run(|| {
            calls.set(calls.get() + 1);
            Err(AmsError::RequestFailed {
                status: 404,
                body: "not found".to_string(),
            })
        });
        assert_eq!(calls.get(), 1);
        match result {
            Err(AmsError::RequestFailed { status, .. }) => assert_eq!(status, 404),
            other => panic!("expected RequestFailed, got {other:?}"),
        }
    }

    #[test]
    fn test_minimum_one_attempt() {
        assert_eq!(RetryPolicy::new(0).max_attempts(), 1);
    }
}

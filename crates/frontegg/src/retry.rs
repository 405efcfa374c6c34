//! Retry with exponential backoff for transient identity API failures.

use crate::error::{Error, Result};
use std::thread;
use std::time::Duration;

/// Configuration for retry behavior.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// Maximum number of attempts, including the first one
    pub max_attempts: u32,
    /// Delay before the first retry
    pub base_delay: Duration,
    /// Multiplier for exponential backoff
    pub backoff_factor: f64,
    /// Upper bound for any single delay
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
            backoff_factor: 2.0,
            max_delay: Duration::from_secs(30),
        }
    }
}

impl RetryConfig {
    /// Calculate the delay for a given attempt number (0-indexed).
    #[must_use]
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
        let delay = self.base_delay.as_secs_f64() * self.backoff_factor.powi(exponent);
        Duration::from_secs_f64(delay.min(self.max_delay.as_secs_f64()))
    }

    /// A config that never retries.
    #[must_use]
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            ..Default::default()
        }
    }
}

/// Called before each retry.
pub trait RetryCallback {
    fn on_retry(&self, attempt: u32, max_attempts: u32, error: &Error, delay: Duration);
}

/// Logs each retry at warn level.
pub struct LogCallback;

impl RetryCallback for LogCallback {
    fn on_retry(&self, attempt: u32, max_attempts: u32, error: &Error, delay: Duration) {
        log::warn!(
            "identity request attempt {attempt}/{max_attempts} failed: {error}; retrying in {}ms",
            delay.as_millis()
        );
    }
}

/// Run `operation`, retrying while it fails with a retryable error.
///
/// Non-retryable errors are returned immediately. After the last attempt
/// the last error is returned.
pub fn with_retry<T, F>(
    config: &RetryConfig,
    callback: Option<&dyn RetryCallback>,
    mut operation: F,
) -> Result<T>
where
    F: FnMut() -> Result<T>,
{
    let mut last_error: Option<Error> = None;

    for attempt in 0..config.max_attempts {
        match operation() {
            Ok(result) => return Ok(result),
            Err(e) => {
                if !e.is_retryable() || attempt + 1 >= config.max_attempts {
                    return Err(e);
                }

                let delay = config.delay_for_attempt(attempt);
                if let Some(cb) = callback {
                    cb.on_retry(attempt + 1, config.max_attempts, &e, delay);
                }
                thread::sleep(delay);
                last_error = Some(e);
            }
        }
    }

    Err(last_error.unwrap_or_else(|| Error::Other("retry exhausted".to_string())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn fast() -> RetryConfig {
        RetryConfig {
            max_attempts: 3,
            base_delay: Duration::from_millis(1),
            backoff_factor: 1.0,
            max_delay: Duration::from_millis(5),
        }
    }

    #[test]
    fn test_delay_for_attempt() {
        let config = RetryConfig::default();
        assert_eq!(config.delay_for_attempt(0), Duration::from_secs(1));
        assert_eq!(config.delay_for_attempt(1), Duration::from_secs(2));
        assert_eq!(config.delay_for_attempt(10), Duration::from_secs(30));
    }

    #[test]
    fn test_non_retryable_error_returns_immediately() {
        let attempts = Cell::new(0);
        let result: Result<()> = with_retry(&fast(), None, || {
            attempts.set(attempts.get() + 1);
            Err(Error::NotFound("user".into()))
        });
        assert!(result.unwrap_err().is_not_found());
        assert_eq!(attempts.get(), 1);
    }

    #[test]
    fn test_eventual_success() {
        let attempts = Cell::new(0);
        let result = with_retry(&fast(), None, || {
            attempts.set(attempts.get() + 1);
            if attempts.get() < 3 {
                Err(Error::Network("reset".into()))
            } else {
                Ok("done")
            }
        });
        assert_eq!(result.unwrap(), "done");
        assert_eq!(attempts.get(), 3);
    }

    #[test]
    fn test_exhausted_returns_last_error() {
        let attempts = Cell::new(0);
        let result: Result<()> = with_retry(&fast(), None, || {
            attempts.set(attempts.get() + 1);
            Err(Error::Http {
                status: 503,
                message: format!("attempt {}", attempts.get()),
            })
        });
        assert_eq!(attempts.get(), 3);
        assert_eq!(result.unwrap_err().to_string(), "HTTP 503: attempt 3");
    }

    #[test]
    fn test_no_retry() {
        let attempts = Cell::new(0);
        let _ = with_retry(&RetryConfig::no_retry(), None, || {
            attempts.set(attempts.get() + 1);
            Err::<(), _>(Error::Network("down".into()))
        });
        assert_eq!(attempts.get(), 1);
    }
}

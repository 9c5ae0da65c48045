use std::fmt::Display;
use std::thread;
use std::time::Duration;

/// Bounded retry with a fixed pause between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    attempts: u32,
    delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            delay: Duration::from_secs(2),
        }
    }
}

impl RetryPolicy {
    /// At least one attempt is always made.
    pub fn new(attempts: u32, delay: Duration) -> Self {
        Self {
            attempts: attempts.max(1),
            delay,
        }
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Runs `op` until it succeeds or the attempts are used up. Failures are
    /// logged and swallowed; exhaustion yields `None`.
    pub fn run<T, E, F>(&self, what: &str, mut op: F) -> Option<T>
    where
        E: Display,
        F: FnMut() -> Result<T, E>,
    {
        for attempt in 1..=self.attempts {
            match op() {
                Ok(value) => return Some(value),
                Err(e) => {
                    log::warn!(
                        "{} failed (attempt {}/{}): {}",
                        what,
                        attempt,
                        self.attempts,
                        e
                    );
                    if attempt < self.attempts {
                        thread::sleep(self.delay);
                    }
                }
            }
        }
        log::warn!("{}: giving up after {} attempts", what, self.attempts);
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    fn quick(attempts: u32) -> RetryPolicy {
        RetryPolicy::new(attempts, Duration::ZERO)
    }

    #[test]
    fn test_first_success_stops_retrying() {
        let mut calls = 0;
        let result = quick(3).run("op", || {
            calls += 1;
            Ok::<_, String>(42)
        });
        assert_eq!(result, Some(42));
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_recovers_after_transient_failures() {
        let mut calls = 0;
        let result = quick(3).run("op", || {
            calls += 1;
            if calls < 3 {
                Err("connection reset")
            } else {
                Ok("done")
            }
        });
        assert_eq!(result, Some("done"));
        assert_eq!(calls, 3);
    }

    #[test]
    fn test_exhaustion_yields_none() {
        let mut calls = 0;
        let result: Option<()> = quick(3).run("op", || {
            calls += 1;
            Err("timeout")
        });
        assert_eq!(result, None);
        assert_eq!(calls, 3);
    }

    #[test]
    fn test_zero_attempts_still_tries_once() {
        let policy = quick(0);
        assert_eq!(policy.attempts(), 1);
        let mut calls = 0;
        let _: Option<()> = policy.run("op", || {
            calls += 1;
            Err("boom")
        });
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_delay_only_between_attempts() {
        let policy = RetryPolicy::new(2, Duration::from_millis(20));
        let start = Instant::now();
        let _: Option<()> = policy.run("op", || Err("boom"));
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(20));
        assert!(elapsed < Duration::from_millis(40) + Duration::from_millis(500));
    }

    #[test]
    fn test_default_matches_provider_contract() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.attempts(), 3);
        assert_eq!(policy.delay(), Duration::from_secs(2));
    }
}

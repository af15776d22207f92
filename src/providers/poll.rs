use std::time::Duration;

use crate::foundation::error::{ReelError, ReelResult};

/// Bounded polling schedule for asynchronous provider jobs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PollPolicy {
    /// Maximum number of status checks.
    pub max_attempts: u32,
    /// Wait before each check.
    pub interval: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 30,
            interval: Duration::from_secs(5),
        }
    }
}

/// Result of one status check.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PollStatus<T> {
    /// The job finished.
    Ready(T),
    /// Still running; carries the reported status for logging.
    Pending(String),
    /// The provider reported a terminal failure.
    Failed(String),
}

impl PollPolicy {
    /// Run `check` until it is ready, sleeping `interval` before every attempt.
    ///
    /// Exhausting `max_attempts` is an acquisition timeout.
    pub fn run<T>(
        &self,
        what: &str,
        check: impl FnMut(u32) -> ReelResult<PollStatus<T>>,
    ) -> ReelResult<T> {
        self.run_with_sleep(what, std::thread::sleep, check)
    }

    pub(crate) fn run_with_sleep<T>(
        &self,
        what: &str,
        mut sleep: impl FnMut(Duration),
        mut check: impl FnMut(u32) -> ReelResult<PollStatus<T>>,
    ) -> ReelResult<T> {
        for attempt in 1..=self.max_attempts {
            sleep(self.interval);
            match check(attempt)? {
                PollStatus::Ready(v) => return Ok(v),
                PollStatus::Pending(status) => {
                    tracing::debug!(what, attempt, max = self.max_attempts, %status, "still pending");
                }
                PollStatus::Failed(reason) => {
                    return Err(ReelError::acquisition(format!("{what} failed: {reason}")));
                }
            }
        }
        Err(ReelError::acquisition(format!(
            "{what} timed out after {} attempts",
            self.max_attempts
        )))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/providers/poll.rs"]
mod tests;

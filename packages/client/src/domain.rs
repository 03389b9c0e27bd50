//! Reconnect policy for a participant whose session ended with an error.

use std::time::Duration;

use crate::error::ClientError;

/// What the runner does after a failed session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextStep {
    /// Wait, then open a new session (`attempt` counts from 1)
    Retry { attempt: u32, after: Duration },
    /// Stop and report the error
    GiveUp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectPolicy {
    pub max_attempts: u32,
    pub interval: Duration,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            interval: Duration::from_secs(5),
        }
    }
}

impl ReconnectPolicy {
    /// Decide after `failures` consecutive failed sessions (the current one included).
    ///
    /// A refused join is answered identically on every attempt, so it never retries.
    pub fn after_failure(&self, error: &ClientError, failures: u32) -> NextStep {
        match error {
            ClientError::Rejected(_) => NextStep::GiveUp,
            ClientError::ConnectionError(_) if failures < self.max_attempts => NextStep::Retry {
                attempt: failures + 1,
                after: self.interval,
            },
            ClientError::ConnectionError(_) => NextStep::GiveUp,
        }
    }
}

// Wait budgets for the poll engine.

use std::time::Duration;

use crate::error::CoreError;

/// What to do when a `FAILED_*` or `REQUIRES_SUPPORT` state shows up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailureStatePolicy {
    /// Treat it like any other pending state until the budget runs out.
    #[default]
    KeepPolling,
    /// Stop with `CoreError::ConvergenceFailed`.
    FailFast,
}

/// Bounded polling budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitPolicy {
    pub max_wait: Duration,
    pub poll_interval: Duration,
    pub on_failure_state: FailureStatePolicy,
}

impl Default for WaitPolicy {
    fn default() -> Self {
        Self {
            max_wait: Duration::from_secs(600),
            poll_interval: Duration::from_secs(10),
            on_failure_state: FailureStatePolicy::KeepPolling,
        }
    }
}

impl WaitPolicy {
    pub fn new(max_wait: Duration, poll_interval: Duration) -> Self {
        Self {
            max_wait,
            poll_interval,
            ..Self::default()
        }
    }

    /// Defaults for server deploys and reconfiguration.
    pub fn server() -> Self {
        Self::new(Duration::from_secs(1200), Duration::from_secs(60))
    }

    pub fn fail_fast(mut self) -> Self {
        self.on_failure_state = FailureStatePolicy::FailFast;
        self
    }

    /// Same budget with the interval capped at `cap`.
    pub fn with_interval_cap(mut self, cap: Duration) -> Self {
        self.poll_interval = self.poll_interval.min(cap);
        self
    }

    pub(crate) fn validate(&self) -> Result<(), CoreError> {
        if self.poll_interval.is_zero() {
            return Err(CoreError::validation("wait poll interval must be greater than zero"));
        }
        Ok(())
    }
}

/// Interval cap for start, stop and reboot waits.
pub const POWER_POLL_CAP: Duration = Duration::from_secs(15);

/// Interval cap for the shutdown that precedes a server delete.
pub const PRE_DELETE_POLL_CAP: Duration = Duration::from_secs(30);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interval_cap_only_lowers() {
        let policy = WaitPolicy::server().with_interval_cap(POWER_POLL_CAP);
        assert_eq!(policy.poll_interval, Duration::from_secs(15));

        let short = WaitPolicy::new(Duration::from_secs(60), Duration::from_secs(5))
            .with_interval_cap(POWER_POLL_CAP);
        assert_eq!(short.poll_interval, Duration::from_secs(5));
    }

    #[test]
    fn zero_interval_is_rejected() {
        let policy = WaitPolicy::new(Duration::from_secs(60), Duration::ZERO);
        assert!(matches!(policy.validate(), Err(CoreError::Validation { .. })));
    }
}

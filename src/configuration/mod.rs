use std::time::Duration;

use crate::errors::{new_err, Result};
use crate::{ElectionTimer, Messenger};

/// Clock and timeout settings of the quorum. Heartbeat period and term timeout are
/// multiples of the clock period.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct QuorumTimings {
    /// Period of the local clock tick.
    pub clock_period: Duration,

    /// Leader heartbeat period as a multiple of the clock period.
    pub heartbeat_period_multiple: u32,

    /// Follower term timeout as a multiple of the heartbeat period.
    pub term_timeout_multiple: u32,
}

impl Default for QuorumTimings {
    fn default() -> Self {
        QuorumTimings {
            clock_period: Duration::from_secs(20),
            heartbeat_period_multiple: 4,
            term_timeout_multiple: 2,
        }
    }
}

impl QuorumTimings {
    pub fn new(clock_period: Duration) -> QuorumTimings {
        QuorumTimings {
            clock_period,
            ..QuorumTimings::default()
        }
    }

    pub fn heartbeat_period(&self) -> Duration {
        self.clock_period * self.heartbeat_period_multiple
    }

    pub fn term_timeout(&self) -> Duration {
        self.heartbeat_period() * self.term_timeout_multiple
    }

    /// Healthy leaders must not be timed out: the heartbeat period stays below the term timeout.
    pub fn validate(&self) -> Result<()> {
        if self.clock_period == Duration::from_millis(0) {
            return new_err("Invalid quorum timings".to_string(), "clock period is zero".to_string());
        }
        if self.heartbeat_period_multiple == 0 {
            return new_err(
                "Invalid quorum timings".to_string(),
                "heartbeat period multiple is zero".to_string(),
            );
        }
        if self.term_timeout_multiple < 2 {
            return new_err(
                "Invalid quorum timings".to_string(),
                format!(
                    "term timeout multiple must be at least 2, got {}",
                    self.term_timeout_multiple
                ),
            );
        }

        Ok(())
    }
}

/// Everything needed to construct a LeaderQuorum.
#[derive(Clone, Debug)]
pub struct QuorumConfiguration<M, Et>
where
    M: Messenger,
    Et: ElectionTimer,
{
    /// Replica id. Generated by the messenger when empty.
    pub name: Option<String>,
    pub messenger: M,
    pub election_timer: Et,
    pub timings: QuorumTimings,
}

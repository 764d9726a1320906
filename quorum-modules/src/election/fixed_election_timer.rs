use leader_quorum::ElectionTimer;
use std::time::Duration;

/// Always returns the same election timeout. Makes the replica a preferred candidate in tests.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct FixedElectionTimer {
    fixed_duration_ms: u64,
}

impl FixedElectionTimer {
    pub fn new(fixed_duration_ms: u64) -> FixedElectionTimer {
        FixedElectionTimer { fixed_duration_ms }
    }
}

impl ElectionTimer for FixedElectionTimer {
    fn next_elections_timeout(&self) -> Duration {
        Duration::from_millis(self.fixed_duration_ms)
    }
}

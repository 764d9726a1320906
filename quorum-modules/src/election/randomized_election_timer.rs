use leader_quorum::ElectionTimer;
use rand::Rng;
use std::time::Duration;

/// Election timeout with a random addition: `timeout + random(0, variation)`.
/// Randomization keeps the replicas started together from repeating split votes.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct RandomizedElectionTimer {
    election_timeout_ms: u64,
    variation_ms: u64,
}

impl RandomizedElectionTimer {
    /// Creates new RandomizedElectionTimer with the base timeout and its variation in milliseconds.
    pub fn new(election_timeout_ms: u64, variation_ms: u64) -> RandomizedElectionTimer {
        if variation_ms == 0 {
            panic!(
                "Invalid params: election_timeout_ms : {}, variation_ms : {}",
                election_timeout_ms, variation_ms
            )
        }
        RandomizedElectionTimer {
            election_timeout_ms,
            variation_ms,
        }
    }
}

impl ElectionTimer for RandomizedElectionTimer {
    fn next_elections_timeout(&self) -> Duration {
        let mut rng = rand::thread_rng();

        Duration::from_millis(self.election_timeout_ms + rng.gen_range(0, self.variation_ms))
    }
}

use std::thread;
use std::time::Duration;

use leader_quorum::QuorumTimings;
use quorum_modules::RandomizedElectionTimer;

pub mod cluster;

pub fn sleep_ms(milliseconds: u64) {
    thread::sleep(Duration::from_millis(milliseconds));
}

/// Clock of 20 ms: heartbeat every 80 ms, leader expires after 160 ms of silence.
pub fn get_timings() -> QuorumTimings {
    QuorumTimings::new(Duration::from_millis(20))
}

pub fn get_election_timer() -> RandomizedElectionTimer {
    RandomizedElectionTimer::new(100, 400)
}

pub fn get_convergence_timeout() -> Duration {
    Duration::from_secs(15)
}

pub fn replica_name(idx: usize) -> String {
    format!("replica-{}", idx)
}

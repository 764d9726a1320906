use std::time::Duration;

pub mod consensus;
pub mod state;

/// Source of the election timeouts. Randomized timeouts prevent repeated split votes.
pub trait ElectionTimer: Clone + Send + Sync + 'static {
    fn next_elections_timeout(&self) -> Duration;
}

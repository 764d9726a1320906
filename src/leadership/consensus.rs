use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

#[derive(Debug)]
struct ConsensusGeneration {
    generation: u64,
    reached: bool,
}

/// "First consensus reached" gate. Each election round opens a new generation; waiters
/// are released when their generation reaches consensus or is replaced by a newer one.
#[derive(Debug)]
pub struct ConsensusSignal {
    state: Mutex<ConsensusGeneration>,
    condvar: Condvar,
}

impl Default for ConsensusSignal {
    fn default() -> Self {
        ConsensusSignal::new()
    }
}

impl ConsensusSignal {
    pub fn new() -> ConsensusSignal {
        ConsensusSignal {
            state: Mutex::new(ConsensusGeneration {
                generation: 0,
                reached: false,
            }),
            condvar: Condvar::new(),
        }
    }

    /// Marks the current generation as reached.
    pub fn resolve(&self) {
        let mut state = self.state.lock();
        if !state.reached {
            state.reached = true;
            self.condvar.notify_all();
        }
    }

    /// Releases the waiters of the current generation and opens a new, unresolved one.
    pub fn renew(&self) {
        let mut state = self.state.lock();
        state.generation += 1;
        state.reached = false;
        self.condvar.notify_all();
    }

    #[cfg(test)]
    pub fn generation(&self) -> u64 {
        self.state.lock().generation
    }

    #[cfg(test)]
    pub fn is_reached(&self) -> bool {
        self.state.lock().reached
    }

    /// Blocks until the generation current at call time is signaled.
    pub fn wait(&self) {
        let mut state = self.state.lock();
        let generation = state.generation;
        while state.generation == generation && !state.reached {
            self.condvar.wait(&mut state);
        }
    }

    /// Same as `wait` bounded by the timeout. Returns false on timeout.
    pub fn wait_for(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut state = self.state.lock();
        let generation = state.generation;
        while state.generation == generation && !state.reached {
            if self.condvar.wait_until(&mut state, deadline).timed_out() {
                return state.generation != generation || state.reached;
            }
        }

        true
    }
}

use quorum_modules::{FixedElectionTimer, InProcMessenger};

use crate::steps;

// The first replica wins the only election; the rest join an already led quorum.
// No replica ever becomes a candidate afterwards, so every term stays at 1.
pub fn run() {
    let mut cluster = steps::cluster::start_initial_cluster(1, InProcMessenger::new(), FixedElectionTimer::new(200));
    let leader = cluster.wait_for_single_leader(&[], steps::get_convergence_timeout());

    for _ in 0..4 {
        cluster.add_new_replica(FixedElectionTimer::new(200));
    }

    // several heartbeat periods
    for _ in 0..10 {
        steps::sleep_ms(100);

        let current_leader = cluster.wait_for_single_leader(&[], steps::get_convergence_timeout());
        assert_eq!(leader, current_leader);
    }

    for replica in &cluster.replicas {
        assert_eq!(1, replica.term(), "replica {} term", replica.name());
    }

    cluster.terminate();
}

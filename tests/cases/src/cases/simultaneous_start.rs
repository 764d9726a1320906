use quorum_modules::InProcMessenger;

use crate::steps;

// All replicas start together. Split votes may take a few terms, but once a leader
// is accepted by everyone neither the leader nor the term changes.
pub fn run() {
    let cluster = steps::cluster::start_initial_cluster(5, InProcMessenger::new(), steps::get_election_timer());

    cluster.wait_for_single_leader(&[], steps::get_convergence_timeout());
    // let the vote requests of the last split round settle
    steps::sleep_ms(300);
    let leader = cluster.wait_for_single_leader(&[], steps::get_convergence_timeout());
    let term = cluster.replica(&leader).term();

    // several heartbeat periods
    for _ in 0..10 {
        steps::sleep_ms(100);

        let current_leader = cluster.wait_for_single_leader(&[], steps::get_convergence_timeout());
        assert_eq!(leader, current_leader);
    }

    for replica in &cluster.replicas {
        assert_eq!(term, replica.term(), "replica {} term", replica.name());
    }

    cluster.terminate();
}

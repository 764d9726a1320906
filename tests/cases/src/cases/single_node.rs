use quorum_modules::InProcMessenger;

use crate::steps;

pub fn run() {
    let cluster = steps::cluster::start_initial_cluster(1, InProcMessenger::new(), steps::get_election_timer());

    let leader = cluster.wait_for_single_leader(&[], steps::get_convergence_timeout());

    let replica = cluster.replica(&leader);
    assert!(replica.are_we_leader());
    assert_eq!(1, replica.term());

    cluster.terminate();
}

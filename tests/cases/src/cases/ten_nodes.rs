use quorum_modules::InProcMessenger;

use crate::steps;

pub fn run() {
    let cluster = steps::cluster::start_initial_cluster(10, InProcMessenger::new(), steps::get_election_timer());

    let leader = cluster.wait_for_single_leader(&[], steps::get_convergence_timeout());
    info!("Elected leader among ten replicas: {}", leader);

    assert_eq!(1, cluster.count_leaders_by_query(&[]));

    cluster.terminate();
}

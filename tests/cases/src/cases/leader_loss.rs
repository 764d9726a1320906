use quorum_modules::InProcMessenger;

use crate::steps;

pub fn run() {
    let messenger = InProcMessenger::new();
    let cluster = steps::cluster::start_initial_cluster(5, messenger.clone(), steps::get_election_timer());

    let old_leader = cluster.wait_for_single_leader(&[], steps::get_convergence_timeout());
    let old_term = cluster.replica(&old_leader).term();

    messenger.block_sender(&old_leader);
    info!("--Leader {} isolated", old_leader);

    let excluded = vec![old_leader.clone()];
    let new_leader = cluster.wait_for_single_leader(&excluded, steps::get_convergence_timeout());
    info!("--New leader: {}", new_leader);

    assert_ne!(old_leader, new_leader);
    assert!(cluster.replica(&new_leader).term() > old_term);
    assert_eq!(1, cluster.count_leaders_by_query(&excluded));

    messenger.unblock_sender(&old_leader);
    cluster.terminate();
}

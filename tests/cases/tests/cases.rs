use cases::cases::{
    broker_cluster, consensus_reentrancy, leader_loss, simultaneous_start, single_node, stable_leadership, ten_nodes,
};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn single_node_becomes_leader() {
    init_logger();
    single_node::run();
}

#[test]
fn ten_nodes_elect_exactly_one_leader() {
    init_logger();
    ten_nodes::run();
}

#[test]
fn lost_leader_is_replaced() {
    init_logger();
    leader_loss::run();
}

#[test]
fn healthy_leader_keeps_first_term() {
    init_logger();
    stable_leadership::run();
}

#[test]
fn leader_elected_at_simultaneous_start_stays() {
    init_logger();
    simultaneous_start::run();
}

#[test]
fn consensus_waiters_follow_new_round() {
    init_logger();
    consensus_reentrancy::run();
}

#[test]
fn broker_replicas_elect_leader() {
    init_logger();
    broker_cluster::run();
}

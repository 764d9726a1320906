use std::thread;
use std::time::{Duration, Instant};

use leader_quorum::NodeStatus;
use quorum_modules::InProcMessenger;

use crate::steps;

// Two replicas: with the leader isolated the other one cannot win an election,
// so its consensus round stays open until the leader is back.
pub fn run() {
    let messenger = InProcMessenger::new();
    let cluster = steps::cluster::start_initial_cluster(2, messenger.clone(), steps::get_election_timer());

    let leader = cluster.wait_for_single_leader(&[], steps::get_convergence_timeout());
    let follower = cluster
        .replicas
        .iter()
        .find(|replica| replica.name() != leader)
        .cloned()
        .expect("follower exists");

    assert!(follower.await_consensus_timeout(Duration::from_millis(10)));

    messenger.block_sender(&leader);
    while follower.status() != NodeStatus::Candidate {
        steps::sleep_ms(20);
    }

    // each election restart releases the waiter with a negative answer and no leader
    let (answer_tx, answer_rx) = crossbeam_channel::unbounded();
    let waiting_follower = follower.clone();
    let waiter = thread::spawn(move || loop {
        let answer = waiting_follower.are_we_leader();
        let leader = waiting_follower.current_leader();
        let leader_known = leader.is_some();
        answer_tx.send((answer, leader)).expect("can send answer");
        if leader_known {
            break;
        }
    });

    let isolation_ends = Instant::now() + Duration::from_millis(500);
    while Instant::now() < isolation_ends {
        if let Ok((answer, leader)) = answer_rx.recv_timeout(Duration::from_millis(20)) {
            assert!(!answer);
            assert!(leader.is_none());
        }
    }
    assert!(follower.current_leader().is_none());

    messenger.unblock_sender(&leader);

    let deadline = Instant::now() + steps::get_convergence_timeout();
    let mut accepted_leader = None;
    while accepted_leader.is_none() {
        let remaining = deadline
            .checked_duration_since(Instant::now())
            .expect("consensus reached after the leader returned");
        let (_answer, leader) = answer_rx
            .recv_timeout(remaining)
            .expect("consensus reached after the leader returned");
        accepted_leader = leader;
    }
    waiter.join().expect("waiter finished");
    info!("--Round resolved with leader {:?}", accepted_leader);

    cluster.wait_for_single_leader(&[], steps::get_convergence_timeout());

    cluster.terminate();
}

use quorum_modules::{BrokerMessenger, FanoutExchange, MemoryFanoutExchange};

use crate::steps;

// Replicas talk through their own queues bound to a shared fanout exchange.
pub fn run() {
    let exchange = MemoryFanoutExchange::new();
    let messengers: Vec<_> = (0..3)
        .map(|_| BrokerMessenger::new(exchange.clone(), "quorum-case"))
        .collect();

    let mut cluster = steps::cluster::start_initial_cluster(0, messengers[0].clone(), steps::get_election_timer());
    for replica_messenger in &messengers {
        replica_messenger.connect().expect("messenger connected");
        cluster.messenger = replica_messenger.clone();
        cluster.add_new_replica(steps::get_election_timer());
    }

    let leader = cluster.wait_for_single_leader(&[], steps::get_convergence_timeout());
    info!("--Broker quorum leader: {}", leader);
    assert_eq!(3, exchange.queue_count("quorum-case"));
    assert_eq!(1, cluster.count_leaders_by_query(&[]));

    cluster.terminate();
    for replica_messenger in messengers {
        replica_messenger.disconnect().expect("messenger disconnected");
    }
    assert_eq!(0, exchange.queue_count("quorum-case"));
}

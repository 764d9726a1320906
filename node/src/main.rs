#[macro_use]
extern crate log;
extern crate chrono;
extern crate env_logger;

use std::io::Write;
use std::thread;
use std::time::Duration;

use chrono::prelude::{DateTime, Local};

extern crate leader_quorum;
extern crate quorum_modules;

use leader_quorum::{LeaderQuorum, QuorumConfiguration, QuorumError, QuorumTimings};
use quorum_modules::{BrokerMessenger, MemoryFanoutExchange, RandomizedElectionTimer};

type BrokerQuorum = LeaderQuorum<BrokerMessenger<MemoryFanoutExchange>, RandomizedElectionTimer>;

const EXCHANGE_NAME: &str = "leader-quorum";
const REPLICA_COUNT: usize = 3;
const JOB_ROUNDS: usize = 20;

fn init_logger() {
    env_logger::builder()
        .format(|buf, record| {
            let now: DateTime<Local> = Local::now();
            writeln!(buf, "{:5}: {} - {}", record.level(), now.format("%H:%M:%S.%3f").to_string(), record.args())
        })
        .init();
}

fn main() {
    init_logger();

    info!("Server started");
    let exchange = MemoryFanoutExchange::new();

    let mut replicas = Vec::new();
    for idx in 0..REPLICA_COUNT {
        match start_replica(exchange.clone(), idx) {
            Ok(replica) => replicas.push(replica),
            Err(err) => {
                error!("Replica {} failed to start: {}", idx, err);
                return;
            }
        }
    }

    let job_workers: Vec<_> = replicas
        .into_iter()
        .map(|(quorum, messenger)| thread::spawn(move || run_singleton_job(quorum, messenger)))
        .collect();

    for worker in job_workers {
        if worker.join().is_err() {
            panic!("worker panicked!")
        }
    }

    info!("Server stopped");
}

fn start_replica(
    exchange: MemoryFanoutExchange,
    idx: usize,
) -> Result<(BrokerQuorum, BrokerMessenger<MemoryFanoutExchange>), QuorumError> {
    let messenger = BrokerMessenger::new(exchange, EXCHANGE_NAME);
    messenger.connect()?;

    let quorum = LeaderQuorum::new(QuorumConfiguration {
        name: Some(format!("node-{}", idx)),
        messenger: messenger.clone(),
        election_timer: RandomizedElectionTimer::new(1000, 4000),
        timings: get_timings(),
    });
    quorum.start()?;

    Ok((quorum, messenger))
}

// Only the leader performs the job. Other replicas skip the round.
fn run_singleton_job(quorum: BrokerQuorum, messenger: BrokerMessenger<MemoryFanoutExchange>) {
    for round in 0..JOB_ROUNDS {
        if !quorum.await_consensus_timeout(get_consensus_timeout()) {
            debug!("Node {} No consensus in round {}", quorum.name(), round);
            continue;
        }

        if quorum.are_we_leader() {
            info!("Node {} Singleton job round {} in term {}", quorum.name(), round, quorum.term());
        } else {
            trace!("Node {} Follower of {:?}. Job skipped", quorum.name(), quorum.current_leader());
        }

        thread::sleep(get_job_period());
    }

    quorum.dispose();
    if let Err(err) = messenger.disconnect() {
        warn!("Node {} Disconnect failed: {}", quorum.name(), err);
    }
}

fn get_timings() -> QuorumTimings {
    QuorumTimings::new(Duration::from_millis(250))
}

fn get_job_period() -> Duration {
    Duration::from_millis(500)
}

fn get_consensus_timeout() -> Duration {
    Duration::from_secs(10)
}

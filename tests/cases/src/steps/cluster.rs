use std::sync::Arc;
use std::time::{Duration, Instant};

use leader_quorum::{ElectionTimer, LeaderQuorum, Messenger, NodeStatus, QuorumConfiguration};

use crate::steps;

pub type Replica<M, Et> = Arc<LeaderQuorum<M, Et>>;

pub struct CaseCluster<M, Et>
where
    M: Messenger,
    Et: ElectionTimer,
{
    pub messenger: M,
    pub replicas: Vec<Replica<M, Et>>,
}

pub fn start_initial_cluster<M, Et>(replica_count: usize, messenger: M, election_timer: Et) -> CaseCluster<M, Et>
where
    M: Messenger,
    Et: ElectionTimer,
{
    let mut cluster = CaseCluster {
        messenger,
        replicas: Vec::new(),
    };

    for _ in 0..replica_count {
        cluster.add_new_replica(election_timer.clone());
    }

    cluster
}

impl<M, Et> CaseCluster<M, Et>
where
    M: Messenger,
    Et: ElectionTimer,
{
    pub fn add_new_replica(&mut self, election_timer: Et) -> Replica<M, Et> {
        let name = steps::replica_name(self.replicas.len());
        let replica = Arc::new(LeaderQuorum::new(QuorumConfiguration {
            name: Some(name.clone()),
            messenger: self.messenger.clone(),
            election_timer,
            timings: steps::get_timings(),
        }));

        replica.start().expect("replica started");
        info!("Replica {} started", name);

        self.replicas.push(replica.clone());
        replica
    }

    pub fn replica(&self, name: &str) -> Replica<M, Et> {
        self.replicas
            .iter()
            .find(|replica| replica.name() == name)
            .cloned()
            .expect("replica exists")
    }

    /// Returns the leader once exactly one of the replicas (besides the excluded) reports
    /// the leader status and all of them follow it.
    pub fn find_single_leader(&self, excluded: &[String]) -> Option<String> {
        let replicas: Vec<&Replica<M, Et>> = self
            .replicas
            .iter()
            .filter(|replica| !excluded.contains(&replica.name()))
            .collect();

        let leaders: Vec<String> = replicas
            .iter()
            .filter(|replica| replica.status() == NodeStatus::Leader)
            .map(|replica| replica.name())
            .collect();

        if leaders.len() != 1 {
            return None;
        }

        let leader = leaders[0].clone();
        let all_follow = replicas
            .iter()
            .all(|replica| replica.current_leader().as_ref() == Some(&leader));

        if all_follow {
            Some(leader)
        } else {
            None
        }
    }

    pub fn wait_for_single_leader(&self, excluded: &[String], timeout: Duration) -> String {
        let started = Instant::now();
        while started.elapsed() < timeout {
            if let Some(leader) = self.find_single_leader(excluded) {
                info!("--Leader found: {}", leader);
                return leader;
            }

            steps::sleep_ms(20);
        }

        for replica in &self.replicas {
            error!("Replica state: {:?}", replica);
        }
        panic!("cannot get a leader!")
    }

    /// Counts the positive answers of the consumer-facing query across the replicas.
    pub fn count_leaders_by_query(&self, excluded: &[String]) -> usize {
        self.replicas
            .iter()
            .filter(|replica| !excluded.contains(&replica.name()))
            .filter(|replica| replica.are_we_leader())
            .count()
    }

    pub fn terminate(self) {
        for replica in self.replicas {
            replica.dispose();
        }
    }
}

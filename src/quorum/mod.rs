use core::fmt;
use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender};
use parking_lot::Mutex;

use crate::common::{self, WorkerPool};
use crate::communication::messages::QuorumMessage;
use crate::communication::{MessageCallback, MessageKind, Messenger, Subscription};
use crate::configuration::{QuorumConfiguration, QuorumTimings};
use crate::errors::{new_err, Result};
use crate::leadership::consensus::ConsensusSignal;
use crate::leadership::state::{NodeStatus, QuorumState};
use crate::leadership::ElectionTimer;

mod clock;
mod outbox;

use clock::{run_clock, ClockParams};
use outbox::{send_outbound_messages, OutboxParams};

#[derive(Debug)]
struct QuorumRuntime {
    workers: WorkerPool,
    subscriptions: Vec<Subscription>,
}

#[derive(Debug)]
enum Lifecycle {
    Created,
    Running(QuorumRuntime),
    Disposed,
}

/// Per-process leader election participant. Elects a single leader among the replicas
/// sharing the messenger. Consumers gate their singleton duties with `are_we_leader`.
pub struct LeaderQuorum<M, Et>
where
    M: Messenger,
    Et: ElectionTimer,
{
    requested_name: Option<String>,
    messenger: M,
    election_timer: Et,
    timings: QuorumTimings,
    protected_state: Arc<Mutex<QuorumState>>,
    consensus: Arc<ConsensusSignal>,
    lifecycle: Mutex<Lifecycle>,
}

impl<M, Et> LeaderQuorum<M, Et>
where
    M: Messenger,
    Et: ElectionTimer,
{
    pub fn new(config: QuorumConfiguration<M, Et>) -> LeaderQuorum<M, Et> {
        let consensus = Arc::new(ConsensusSignal::new());
        let initial_name = config.name.clone().unwrap_or_default();
        let state = QuorumState::new(initial_name, config.timings, consensus.clone());

        LeaderQuorum {
            requested_name: config.name,
            messenger: config.messenger,
            election_timer: config.election_timer,
            timings: config.timings,
            protected_state: Arc::new(Mutex::new(state)),
            consensus,
            lifecycle: Mutex::new(Lifecycle::Created),
        }
    }

    /// Registers with the messenger, subscribes to all message kinds and starts the clock.
    /// Registration and subscription errors are returned to the caller.
    pub fn start(&self) -> Result<()> {
        let mut lifecycle = self.lifecycle.lock();
        if let Lifecycle::Running(_) | Lifecycle::Disposed = *lifecycle {
            return new_err(
                "Cannot start leader quorum".to_string(),
                format!("already started or disposed: {}", self.name()),
            );
        }

        self.timings.validate()?;

        let node_id = match self.messenger.register(self.requested_name.clone()) {
            Ok(node_id) => node_id,
            Err(err) => {
                return new_err(
                    "Cannot register quorum replica".to_string(),
                    err.to_string(),
                )
            }
        };
        self.protected_state.lock().set_id(node_id.clone());

        let (inbound_tx, inbound_rx): (Sender<QuorumMessage>, Receiver<QuorumMessage>) =
            crossbeam_channel::unbounded();
        let subscriptions = self.subscribe(&node_id, inbound_tx)?;

        let (outbound_tx, outbound_rx): (Sender<QuorumMessage>, Receiver<QuorumMessage>) =
            crossbeam_channel::unbounded();

        let outbox_worker = common::run_worker(
            send_outbound_messages,
            OutboxParams {
                node_id: node_id.clone(),
                messenger: self.messenger.clone(),
                outbound_rx,
            },
        );

        let clock_worker = common::run_worker(
            run_clock,
            ClockParams {
                node_id: node_id.clone(),
                protected_state: self.protected_state.clone(),
                messenger: self.messenger.clone(),
                election_timer: self.election_timer.clone(),
                clock_period: self.timings.clock_period,
                inbound_rx,
                outbound_tx,
            },
        );

        *lifecycle = Lifecycle::Running(QuorumRuntime {
            workers: WorkerPool::new(vec![clock_worker, outbox_worker]),
            subscriptions,
        });

        info!("Node {} Leader quorum started", node_id);
        Ok(())
    }

    fn subscribe(&self, node_id: &str, inbound_tx: Sender<QuorumMessage>) -> Result<Vec<Subscription>> {
        let mut subscriptions = Vec::new();
        for kind in MessageKind::all().iter() {
            let tx = inbound_tx.clone();
            let callback: MessageCallback = Arc::new(move |msg| {
                if tx.send(msg).is_err() {
                    trace!("Inbound channel closed. Message dropped");
                }
            });

            match self.messenger.on(*kind, callback) {
                Ok(subscription) => subscriptions.push(subscription),
                Err(err) => {
                    for subscription in subscriptions {
                        subscription.dispose();
                    }
                    return new_err(
                        format!("Node {} cannot subscribe to {} messages", node_id, kind),
                        err.to_string(),
                    );
                }
            }
        }

        Ok(subscriptions)
    }

    /// Blocks until the current consensus round is signaled. No timeout.
    pub fn await_consensus(&self) {
        self.consensus.wait()
    }

    /// Returns false when the timeout elapsed before the consensus round was signaled.
    pub fn await_consensus_timeout(&self, timeout: Duration) -> bool {
        self.consensus.wait_for(timeout)
    }

    /// Awaits the consensus and reports whether this replica is the leader.
    pub fn are_we_leader(&self) -> bool {
        self.await_consensus();

        self.status() == NodeStatus::Leader
    }

    pub fn name(&self) -> String {
        self.protected_state.lock().id().to_string()
    }

    pub fn term(&self) -> u64 {
        self.protected_state.lock().current_term()
    }

    pub fn status(&self) -> NodeStatus {
        self.protected_state.lock().status()
    }

    pub fn current_leader(&self) -> Option<String> {
        self.protected_state
            .lock()
            .current_leader()
            .map(|leader| leader.to_string())
    }

    /// Unsubscribes from the messenger and stops the clock. In-flight sends are not cancelled.
    pub fn dispose(&self) {
        let mut lifecycle = self.lifecycle.lock();
        let previous = std::mem::replace(&mut *lifecycle, Lifecycle::Disposed);

        if let Lifecycle::Running(runtime) = previous {
            let node_id = self.name();
            info!("Node {} Leader quorum termination requested", node_id);

            for subscription in runtime.subscriptions {
                subscription.dispose();
            }
            runtime.workers.terminate();
            runtime.workers.join();

            info!("Node {} Leader quorum stopped", node_id);
        }
    }
}

impl<M, Et> Drop for LeaderQuorum<M, Et>
where
    M: Messenger,
    Et: ElectionTimer,
{
    fn drop(&mut self) {
        self.dispose();
    }
}

impl<M, Et> fmt::Debug for LeaderQuorum<M, Et>
where
    M: Messenger,
    Et: ElectionTimer,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let state = self.protected_state.lock();
        f.debug_struct("LeaderQuorum")
            .field("name", &state.id())
            .field("term", &state.current_term())
            .field("status", &state.status())
            .field("current_leader", &state.current_leader())
            .finish()
    }
}

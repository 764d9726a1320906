use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender};
use parking_lot::Mutex;

use crate::common;
use crate::communication::messages::QuorumMessage;
use crate::communication::Messenger;
use crate::errors::{new_err, Result};
use crate::leadership::state::{QuorumState, TickContext};
use crate::leadership::ElectionTimer;

pub struct ClockParams<M: Messenger, Et: ElectionTimer> {
    pub node_id: String,
    pub protected_state: Arc<Mutex<QuorumState>>,
    pub messenger: M,
    pub election_timer: Et,
    pub clock_period: Duration,
    pub inbound_rx: Receiver<QuorumMessage>,
    pub outbound_tx: Sender<QuorumMessage>,
}

/// Drives the quorum state machine with a fixed-period tick. Runs on a single thread,
/// so ticks never overlap; a failed tick is logged and the clock keeps going.
pub fn run_clock<M, Et>(params: ClockParams<M, Et>, terminate_worker_rx: Receiver<()>)
where
    M: Messenger,
    Et: ElectionTimer,
{
    info!("Node {} Quorum clock worker started", params.node_id);
    let ticker = crossbeam_channel::tick(params.clock_period);
    loop {
        select!(
            recv(terminate_worker_rx) -> res  => {
                if res.is_err() {
                    error!("Abnormal exit for quorum clock worker");
                }
                break
            },
            recv(ticker) -> _  => {
                if let Err(err) = process_tick(&params) {
                    error!("Node {} Quorum tick failed: {}", params.node_id, err);
                }
            }
        );
    }
    info!("Node {} Quorum clock worker stopped", params.node_id);
}

fn process_tick<M, Et>(params: &ClockParams<M, Et>) -> Result<()>
where
    M: Messenger,
    Et: ElectionTimer,
{
    let inbound: Vec<QuorumMessage> = params.inbound_rx.try_iter().collect();
    debug!(
        "Node {} Tick with {} inbound messages",
        params.node_id,
        inbound.len()
    );

    let peer_count = || params.messenger.peer_count();
    let tick_result = panic::catch_unwind(AssertUnwindSafe(|| {
        let mut state = params.protected_state.lock();
        let ctx = TickContext {
            now: common::now_millis(),
            election_timer: &params.election_timer,
            peer_count: &peer_count,
        };

        state.tick(inbound, &ctx)
    }));

    let outbound = match tick_result {
        Ok(outbound) => outbound,
        Err(_) => {
            return new_err(
                "Quorum state machine panicked".to_string(),
                String::new(),
            )
        }
    };

    for msg in outbound {
        if let Err(err) = params.outbound_tx.send(msg) {
            return new_err(
                "Cannot queue outbound message".to_string(),
                err.to_string(),
            );
        }
    }

    Ok(())
}

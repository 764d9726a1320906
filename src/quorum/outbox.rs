use crossbeam_channel::Receiver;

use crate::communication::messages::QuorumMessage;
use crate::communication::Messenger;

pub struct OutboxParams<M: Messenger> {
    pub node_id: String,
    pub messenger: M,
    pub outbound_rx: Receiver<QuorumMessage>,
}

/// Broadcasts the messages produced by the clock ticks. Send failures are logged and dropped.
pub fn send_outbound_messages<M: Messenger>(params: OutboxParams<M>, terminate_worker_rx: Receiver<()>) {
    info!("Node {} Outbound message sender worker started", params.node_id);
    loop {
        select!(
            recv(terminate_worker_rx) -> res  => {
                if res.is_err() {
                    error!("Abnormal exit for outbound message sender worker");
                }
                break
            },
            recv(params.outbound_rx) -> msg_result => {
                match msg_result {
                    Ok(msg) => send_message(&params.messenger, &params.node_id, msg),
                    Err(_) => {
                        trace!("Node {} Outbound channel closed", params.node_id);
                        break
                    }
                }
            }
        );
    }
    info!("Node {} Outbound message sender worker stopped", params.node_id);
}

fn send_message<M: Messenger>(messenger: &M, node_id: &str, msg: QuorumMessage) {
    trace!("Node {} Sending {}", node_id, msg);
    let send_result = match &msg {
        QuorumMessage::Heartbeat(heartbeat) => messenger.send_heartbeat(&heartbeat.sender, heartbeat.term),
        QuorumMessage::RequestVote(request) => messenger.request_vote(&request.sender, request.term),
        QuorumMessage::CastVote(vote) => {
            messenger.cast_vote(&vote.sender, vote.term, &vote.for_candidate)
        }
    };

    if let Err(err) = send_result {
        warn!("Node {} Cannot send {}: {}", node_id, msg, err);
    }
}

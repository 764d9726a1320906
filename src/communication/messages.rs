use serde::{Deserialize, Serialize};

use super::MessageKind;

/// Leader liveness broadcast. Also announces the victory of a candidate.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Display, Serialize, Deserialize)]
#[display(fmt = "Heartbeat term: {} sender: {}", term, sender)]
pub struct Heartbeat {
    pub term: u64,
    pub sender: String,
}

/// Candidate solicits votes for the term.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Display, Serialize, Deserialize)]
#[display(fmt = "RequestVote term: {} sender: {}", term, sender)]
pub struct RequestVote {
    pub term: u64,
    pub sender: String,
}

/// Vote of the sender for the candidate in the term.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[display(
    fmt = "CastVote term: {} sender: {} for candidate: {}",
    term,
    sender,
    for_candidate
)]
pub struct CastVote {
    pub term: u64,
    pub sender: String,
    pub for_candidate: String,
}

/// Message exchanged between the replicas. The wire format is a flat JSON record
/// tagged with the `type` field.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Display, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum QuorumMessage {
    Heartbeat(Heartbeat),
    RequestVote(RequestVote),
    CastVote(CastVote),
}

impl QuorumMessage {
    pub fn heartbeat(sender: &str, term: u64) -> QuorumMessage {
        QuorumMessage::Heartbeat(Heartbeat {
            term,
            sender: sender.to_string(),
        })
    }

    pub fn request_vote(sender: &str, term: u64) -> QuorumMessage {
        QuorumMessage::RequestVote(RequestVote {
            term,
            sender: sender.to_string(),
        })
    }

    pub fn cast_vote(sender: &str, term: u64, for_candidate: &str) -> QuorumMessage {
        QuorumMessage::CastVote(CastVote {
            term,
            sender: sender.to_string(),
            for_candidate: for_candidate.to_string(),
        })
    }

    pub fn kind(&self) -> MessageKind {
        match self {
            QuorumMessage::Heartbeat(_) => MessageKind::Heartbeat,
            QuorumMessage::RequestVote(_) => MessageKind::RequestVote,
            QuorumMessage::CastVote(_) => MessageKind::CastVote,
        }
    }

    pub fn term(&self) -> u64 {
        match self {
            QuorumMessage::Heartbeat(msg) => msg.term,
            QuorumMessage::RequestVote(msg) => msg.term,
            QuorumMessage::CastVote(msg) => msg.term,
        }
    }

    pub fn sender(&self) -> &str {
        match self {
            QuorumMessage::Heartbeat(msg) => &msg.sender,
            QuorumMessage::RequestVote(msg) => &msg.sender,
            QuorumMessage::CastVote(msg) => &msg.sender,
        }
    }
}

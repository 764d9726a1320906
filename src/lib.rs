//! Leader election quorum: a simplified Raft leader election over a pub/sub messenger.
//! Replicas elect a single leader for the singleton background duties and consumers
//! gate those duties with `LeaderQuorum::are_we_leader`.

#![warn(missing_debug_implementations, unsafe_code)]

#[macro_use]
extern crate log;
#[macro_use]
extern crate crossbeam_channel;
#[macro_use]
extern crate derive_more;

mod common;
mod communication;
mod configuration;
mod errors;
mod leadership;
mod quorum;

pub use communication::messages::{CastVote, Heartbeat, QuorumMessage, RequestVote};
pub use communication::{MessageCallback, MessageKind, Messenger, Subscription};
pub use configuration::{QuorumConfiguration, QuorumTimings};
pub use errors::{new_err, QuorumError};
pub use leadership::state::NodeStatus;
pub use leadership::ElectionTimer;
pub use quorum::LeaderQuorum;

use core::fmt;
use std::sync::Arc;

use crate::errors::QuorumError;

pub mod messages;

/// Kind of the quorum message. Subscriptions are made per kind.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Display)]
pub enum MessageKind {
    #[display(fmt = "heartbeat")]
    Heartbeat,
    #[display(fmt = "requestVote")]
    RequestVote,
    #[display(fmt = "castVote")]
    CastVote,
}

impl MessageKind {
    pub fn all() -> [MessageKind; 3] {
        [
            MessageKind::Heartbeat,
            MessageKind::RequestVote,
            MessageKind::CastVote,
        ]
    }
}

/// Callback invoked once per inbound message of the subscribed kind.
pub type MessageCallback = Arc<dyn Fn(messages::QuorumMessage) + Send + Sync>;

/// Handle of a messenger subscription. Disposing it unsubscribes the callback.
pub struct Subscription {
    description: String,
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    pub fn new<F: FnOnce() + Send + 'static>(description: String, cancel: F) -> Subscription {
        Subscription {
            description,
            cancel: Some(Box::new(cancel)),
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn dispose(mut self) {
        if let Some(cancel) = self.cancel.take() {
            trace!("Subscription disposed: {}", self.description);
            cancel();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("description", &self.description)
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

/// Broadcast channel shared by all the replicas of the quorum. Sends are best-effort:
/// no delivery or ordering guarantee, duplicates are possible.
pub trait Messenger: Clone + Sync + Send + 'static {
    /// Registers the replica. Generates an id when none is supplied. Returns the effective id.
    fn register(&self, uid: Option<String>) -> Result<String, QuorumError>;

    /// Subscribes the callback for the inbound messages of the kind.
    fn on(&self, kind: MessageKind, callback: MessageCallback) -> Result<Subscription, QuorumError>;

    fn request_vote(&self, sender: &str, term: u64) -> Result<(), QuorumError>;

    fn cast_vote(&self, sender: &str, term: u64, for_candidate: &str) -> Result<(), QuorumError>;

    fn send_heartbeat(&self, sender: &str, term: u64) -> Result<(), QuorumError>;

    /// Approximate count of the registered replicas. Can be stale.
    fn peer_count(&self) -> usize;
}

use core::fmt;
use std::collections::HashSet;
use std::sync::Arc;

use leader_quorum::{MessageCallback, MessageKind, Messenger, QuorumError, QuorumMessage, Subscription};
use parking_lot::{Mutex, RwLock};

use crate::communication::SubscriberRegistry;

/// In-process fan-out messenger shared by all the replicas of a test or a single process.
/// Messages of the blocked senders are dropped, which emulates a replica losing its connection.
#[derive(Clone, Default)]
pub struct InProcMessenger {
    subscribers: SubscriberRegistry,
    registered: Arc<Mutex<HashSet<String>>>,
    blocked_senders: Arc<RwLock<HashSet<String>>>,
}

impl InProcMessenger {
    /// Creates new InProcMessenger without registered replicas.
    pub fn new() -> InProcMessenger {
        InProcMessenger::default()
    }

    /// Drops all the further messages sent by the replica.
    pub fn block_sender(&self, uid: &str) {
        info!("InProc messenger: sender {} blocked", uid);
        self.blocked_senders.write().insert(uid.to_string());
    }

    /// Delivers the messages of the replica again.
    pub fn unblock_sender(&self, uid: &str) {
        info!("InProc messenger: sender {} unblocked", uid);
        self.blocked_senders.write().remove(uid);
    }

    fn publish(&self, msg: QuorumMessage) -> Result<(), QuorumError> {
        if self.blocked_senders.read().contains(msg.sender()) {
            trace!("InProc messenger: message from blocked sender dropped: {}", msg);
            return Ok(());
        }

        trace!("InProc messenger: broadcasting {}", msg);
        self.subscribers.dispatch(msg);

        Ok(())
    }
}

impl Messenger for InProcMessenger {
    fn register(&self, uid: Option<String>) -> Result<String, QuorumError> {
        let uid = uid.unwrap_or_else(generate_uid);

        let mut registered = self.registered.lock();
        if !registered.insert(uid.clone()) {
            warn!("InProc messenger: duplicate registration: {}", uid)
        }

        Ok(uid)
    }

    fn on(&self, kind: MessageKind, callback: MessageCallback) -> Result<Subscription, QuorumError> {
        Ok(self
            .subscribers
            .subscribe(kind, callback, format!("InProc {} subscription", kind)))
    }

    fn request_vote(&self, sender: &str, term: u64) -> Result<(), QuorumError> {
        self.publish(QuorumMessage::request_vote(sender, term))
    }

    fn cast_vote(&self, sender: &str, term: u64, for_candidate: &str) -> Result<(), QuorumError> {
        self.publish(QuorumMessage::cast_vote(sender, term, for_candidate))
    }

    fn send_heartbeat(&self, sender: &str, term: u64) -> Result<(), QuorumError> {
        self.publish(QuorumMessage::heartbeat(sender, term))
    }

    fn peer_count(&self) -> usize {
        self.registered.lock().len()
    }
}

impl fmt::Debug for InProcMessenger {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("InProcMessenger")
            .field("registered", &*self.registered.lock())
            .field("blocked_senders", &*self.blocked_senders.read())
            .field("subscriptions", &self.subscribers.subscription_count())
            .finish()
    }
}

fn generate_uid() -> String {
    format!("replica-{:016x}", rand::random::<u64>())
}

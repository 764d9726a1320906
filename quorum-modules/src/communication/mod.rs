use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use leader_quorum::{MessageCallback, MessageKind, QuorumMessage, Subscription};
use parking_lot::RwLock;
use rayon::prelude::*;

pub mod broker;
pub mod inproc;

/// Local callbacks per message kind, shared by the clones of a messenger.
#[derive(Clone, Default)]
pub struct SubscriberRegistry {
    callbacks: Arc<RwLock<HashMap<MessageKind, Vec<(u64, MessageCallback)>>>>,
    next_subscription_id: Arc<AtomicU64>,
}

impl SubscriberRegistry {
    pub fn subscribe(&self, kind: MessageKind, callback: MessageCallback, description: String) -> Subscription {
        let id = self.next_subscription_id.fetch_add(1, Ordering::SeqCst);
        self.callbacks
            .write()
            .entry(kind)
            .or_insert_with(Vec::new)
            .push((id, callback));

        let callbacks = self.callbacks.clone();
        Subscription::new(description, move || {
            if let Some(kind_callbacks) = callbacks.write().get_mut(&kind) {
                kind_callbacks.retain(|(sub_id, _)| *sub_id != id);
            }
        })
    }

    /// Invokes every callback subscribed to the kind of the message.
    pub fn dispatch(&self, msg: QuorumMessage) {
        let callbacks: Vec<MessageCallback> = {
            let all_callbacks = self.callbacks.read();
            match all_callbacks.get(&msg.kind()) {
                Some(kind_callbacks) => kind_callbacks.iter().map(|(_, cb)| cb.clone()).collect(),
                None => Vec::new(),
            }
        };

        callbacks
            .par_iter()
            .for_each(|callback| callback(msg.clone()));
    }

    pub fn subscription_count(&self) -> usize {
        self.callbacks.read().values().map(Vec::len).sum()
    }
}

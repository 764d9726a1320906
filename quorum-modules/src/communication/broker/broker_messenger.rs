use core::fmt;
use std::sync::Arc;

use leader_quorum::{new_err, MessageCallback, MessageKind, Messenger, QuorumError, QuorumMessage, Subscription};
use parking_lot::Mutex;

use super::{FanoutExchange, QueueConsumer};
use crate::communication::SubscriberRegistry;

/// Messenger on top of a fanout message broker. Every replica binds its own queue
/// to the shared exchange and receives all the published messages (its own included).
/// Messages are JSON encoded.
#[derive(Clone)]
pub struct BrokerMessenger<E: FanoutExchange> {
    exchange: E,
    exchange_name: String,
    subscribers: SubscriberRegistry,
    connection: Arc<Mutex<Connection>>,
}

#[derive(Clone, Debug, PartialEq)]
enum Connection {
    Disconnected,
    Connected { queue: Option<String> },
}

impl<E: FanoutExchange> BrokerMessenger<E> {
    pub fn new(exchange: E, exchange_name: &str) -> BrokerMessenger<E> {
        BrokerMessenger {
            exchange,
            exchange_name: exchange_name.to_string(),
            subscribers: SubscriberRegistry::default(),
            connection: Arc::new(Mutex::new(Connection::Disconnected)),
        }
    }

    /// Declares the exchange. Must precede the registration.
    pub fn connect(&self) -> Result<(), QuorumError> {
        let mut connection = self.connection.lock();
        if let Connection::Connected { .. } = *connection {
            return Ok(());
        }

        if let Err(err) = self.exchange.declare_exchange(&self.exchange_name) {
            return new_err(
                format!("Cannot connect to exchange {}", self.exchange_name),
                err.to_string(),
            );
        }

        info!("Broker messenger connected to exchange {}", self.exchange_name);
        *connection = Connection::Connected { queue: None };

        Ok(())
    }

    /// Deletes the replica queue. The replica stops receiving messages and is no longer counted.
    pub fn disconnect(&self) -> Result<(), QuorumError> {
        let mut connection = self.connection.lock();
        if let Connection::Connected { queue: Some(queue) } = &*connection {
            self.exchange.delete_queue(&self.exchange_name, queue)?;
            info!("Broker messenger queue deleted: {}", queue);
        }

        *connection = Connection::Disconnected;

        Ok(())
    }

    pub fn is_connected(&self) -> bool {
        *self.connection.lock() != Connection::Disconnected
    }

    fn queue_name(&self, uid: &str) -> String {
        format!("{}.{}", self.exchange_name, uid)
    }

    fn create_consumer(&self) -> QueueConsumer {
        let subscribers = self.subscribers.clone();
        Arc::new(move |payload: &[u8]| {
            match serde_json::from_slice::<QuorumMessage>(payload) {
                Ok(msg) => {
                    trace!("Broker messenger received: {}", msg);
                    subscribers.dispatch(msg)
                }
                Err(err) => warn!("Broker messenger: malformed message skipped: {}", err),
            }
        })
    }

    fn publish(&self, msg: QuorumMessage) -> Result<(), QuorumError> {
        if !self.is_connected() {
            return new_err(
                format!("Cannot send {}", msg.kind()),
                "messenger is not connected".to_string(),
            );
        }

        let payload = match serde_json::to_vec(&msg) {
            Ok(payload) => payload,
            Err(err) => return new_err(format!("Cannot encode {}", msg.kind()), err.to_string()),
        };

        trace!("Broker messenger publishing: {}", msg);
        self.exchange.publish(&self.exchange_name, &payload)
    }
}

impl<E: FanoutExchange> Messenger for BrokerMessenger<E> {
    fn register(&self, uid: Option<String>) -> Result<String, QuorumError> {
        let mut connection = self.connection.lock();

        let current_queue = match &*connection {
            Connection::Disconnected => {
                return new_err(
                    "Cannot register replica".to_string(),
                    "messenger is not connected".to_string(),
                )
            }
            Connection::Connected { queue } => queue.clone(),
        };

        let uid = uid.unwrap_or_else(|| format!("replica-{:016x}", rand::random::<u64>()));
        let queue = self.queue_name(&uid);
        if current_queue.as_ref() == Some(&queue) {
            return Ok(uid);
        }

        if let Some(previous) = current_queue {
            self.exchange.delete_queue(&self.exchange_name, &previous)?;
        }

        self.exchange
            .bind_queue(&self.exchange_name, &queue, self.create_consumer())?;
        info!("Broker messenger registered replica {} with queue {}", uid, queue);
        *connection = Connection::Connected { queue: Some(queue) };

        Ok(uid)
    }

    fn on(&self, kind: MessageKind, callback: MessageCallback) -> Result<Subscription, QuorumError> {
        Ok(self.subscribers.subscribe(
            kind,
            callback,
            format!("{} {} subscription", self.exchange_name, kind),
        ))
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
        self.exchange.queue_count(&self.exchange_name)
    }
}

impl<E: FanoutExchange + fmt::Debug> fmt::Debug for BrokerMessenger<E> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("BrokerMessenger")
            .field("exchange_name", &self.exchange_name)
            .field("connection", &*self.connection.lock())
            .field("subscriptions", &self.subscribers.subscription_count())
            .field("exchange", &self.exchange)
            .finish()
    }
}

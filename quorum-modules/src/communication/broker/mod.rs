use std::sync::Arc;

use leader_quorum::QuorumError;

pub mod broker_messenger;
pub mod memory_exchange;

/// Consumer of a bound queue. Receives the raw message payload.
pub type QueueConsumer = Arc<dyn Fn(&[u8]) + Send + Sync>;

/// Message broker abstraction: a named fanout exchange delivering every published payload
/// to all the queues bound to it.
pub trait FanoutExchange: Clone + Send + Sync + 'static {
    /// Declares the exchange. Declaring an existing exchange is not an error.
    fn declare_exchange(&self, exchange: &str) -> Result<(), QuorumError>;

    /// Binds the named queue to the exchange and attaches the consumer to it.
    fn bind_queue(&self, exchange: &str, queue: &str, consumer: QueueConsumer) -> Result<(), QuorumError>;

    fn delete_queue(&self, exchange: &str, queue: &str) -> Result<(), QuorumError>;

    fn publish(&self, exchange: &str, payload: &[u8]) -> Result<(), QuorumError>;

    /// Number of the queues bound to the exchange.
    fn queue_count(&self, exchange: &str) -> usize;
}

use core::fmt;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use leader_quorum::{new_err, QuorumError};
use parking_lot::RwLock;
use rayon::prelude::*;

use super::{FanoutExchange, QueueConsumer};

/// In-memory message broker with fanout exchanges. Can be switched to the unavailable mode
/// to emulate a broker outage.
#[derive(Clone, Default)]
pub struct MemoryFanoutExchange {
    exchanges: Arc<RwLock<HashMap<String, HashMap<String, QueueConsumer>>>>,
    unavailable: Arc<AtomicBool>,
}

impl MemoryFanoutExchange {
    pub fn new() -> MemoryFanoutExchange {
        MemoryFanoutExchange::default()
    }

    /// Makes all the broker operations fail until switched back.
    pub fn set_unavailable(&self, unavailable: bool) {
        info!("Memory exchange unavailable: {}", unavailable);
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self, operation: &str) -> Result<(), QuorumError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return new_err(
                format!("Broker operation failed: {}", operation),
                "broker is unavailable".to_string(),
            );
        }

        Ok(())
    }
}

impl FanoutExchange for MemoryFanoutExchange {
    fn declare_exchange(&self, exchange: &str) -> Result<(), QuorumError> {
        self.check_available("declare exchange")?;

        self.exchanges
            .write()
            .entry(exchange.to_string())
            .or_insert_with(HashMap::new);

        Ok(())
    }

    fn bind_queue(&self, exchange: &str, queue: &str, consumer: QueueConsumer) -> Result<(), QuorumError> {
        self.check_available("bind queue")?;

        let mut exchanges = self.exchanges.write();
        match exchanges.get_mut(exchange) {
            Some(queues) => {
                queues.insert(queue.to_string(), consumer);
                trace!("Queue {} bound to exchange {}", queue, exchange);
                Ok(())
            }
            None => new_err(
                format!("Cannot bind queue {}", queue),
                format!("exchange {} is not declared", exchange),
            ),
        }
    }

    fn delete_queue(&self, exchange: &str, queue: &str) -> Result<(), QuorumError> {
        self.check_available("delete queue")?;

        if let Some(queues) = self.exchanges.write().get_mut(exchange) {
            queues.remove(queue);
        }

        Ok(())
    }

    fn publish(&self, exchange: &str, payload: &[u8]) -> Result<(), QuorumError> {
        self.check_available("publish")?;

        let consumers: Vec<QueueConsumer> = {
            let exchanges = self.exchanges.read();
            match exchanges.get(exchange) {
                Some(queues) => queues.values().cloned().collect(),
                None => {
                    return new_err(
                        "Cannot publish message".to_string(),
                        format!("exchange {} is not declared", exchange),
                    )
                }
            }
        };

        consumers.par_iter().for_each(|consumer| consumer(payload));

        Ok(())
    }

    fn queue_count(&self, exchange: &str) -> usize {
        self.exchanges
            .read()
            .get(exchange)
            .map(HashMap::len)
            .unwrap_or(0)
    }
}

impl fmt::Debug for MemoryFanoutExchange {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let exchanges = self.exchanges.read();
        let queues: HashMap<&String, Vec<&String>> = exchanges
            .iter()
            .map(|(exchange, queues)| (exchange, queues.keys().collect()))
            .collect();

        f.debug_struct("MemoryFanoutExchange")
            .field("queues", &queues)
            .field("unavailable", &self.unavailable.load(Ordering::SeqCst))
            .finish()
    }
}

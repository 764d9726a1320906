#[macro_use]
extern crate log;
extern crate leader_quorum;

mod communication;
mod election;

pub use communication::broker::broker_messenger::BrokerMessenger;
pub use communication::broker::memory_exchange::MemoryFanoutExchange;
pub use communication::broker::{FanoutExchange, QueueConsumer};
pub use communication::inproc::inproc_messenger::InProcMessenger;
pub use election::fixed_election_timer::FixedElectionTimer;
pub use election::randomized_election_timer::RandomizedElectionTimer;

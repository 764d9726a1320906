pub mod broker_cluster;
pub mod consensus_reentrancy;
pub mod leader_loss;
pub mod simultaneous_start;
pub mod single_node;
pub mod stable_leadership;
pub mod ten_nodes;

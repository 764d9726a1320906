//! # Leader quorum test cases
//!
//! This subproject provides integration tests for the leader election quorum.

#[macro_use]
extern crate log;
extern crate crossbeam_channel;

pub mod cases;
mod steps;

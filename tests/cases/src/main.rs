#[macro_use]
extern crate log;
extern crate chrono;
extern crate crossbeam_channel;
extern crate env_logger;

pub mod cases;
mod steps;

use chrono::prelude::{DateTime, Local};
use std::io::Write;

extern crate leader_quorum;
extern crate quorum_modules;

fn init_logger() {
    env_logger::builder()
        .format(|buf, record| {
            let now: DateTime<Local> = Local::now();
            let now_str = now.format("%H:%M:%S.%3f").to_string();
            writeln!(buf, "{:5}: {} - {}", record.level(), now_str, record.args())
        })
        .init();
}

fn main() {
    init_logger();

    cases::single_node::run();
    cases::ten_nodes::run();
    cases::leader_loss::run();
    cases::stable_leadership::run();
    cases::simultaneous_start::run();
    cases::consensus_reentrancy::run();
    cases::broker_cluster::run();
}

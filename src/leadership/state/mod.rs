use std::collections::HashSet;
use std::sync::Arc;

use crate::communication::messages::{CastVote, Heartbeat, QuorumMessage, RequestVote};
use crate::configuration::QuorumTimings;
use crate::leadership::consensus::ConsensusSignal;
use crate::leadership::ElectionTimer;


#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Display)]
pub enum NodeStatus {
    Follower,
    Candidate,
    Leader,
}

/// Inputs of a single clock tick besides the inbound messages.
pub struct TickContext<'a, Et: ElectionTimer> {
    /// Epoch milliseconds.
    pub now: u64,
    pub election_timer: &'a Et,
    pub peer_count: &'a dyn Fn() -> usize,
}

/// Raft-style role and term state of a single replica. Mutated only by `tick`.
#[derive(Debug)]
pub struct QuorumState {
    id: String,
    current_term: u64,
    voted_for: Option<String>,
    current_leader: Option<String>,
    status: NodeStatus,
    votes_in_our_favour: HashSet<String>,

    last_heartbeat_sent: Option<u64>,
    last_heartbeat_from_leader: Option<u64>,
    election_deadline: Option<u64>,

    heartbeat_period_ms: u64,
    term_timeout_ms: u64,
    consensus: Arc<ConsensusSignal>,
}

impl QuorumState {
    pub fn new(id: String, timings: QuorumTimings, consensus: Arc<ConsensusSignal>) -> QuorumState {
        QuorumState {
            id,
            current_term: 0,
            voted_for: None,
            current_leader: None,
            status: NodeStatus::Follower,
            votes_in_our_favour: HashSet::new(),
            last_heartbeat_sent: None,
            last_heartbeat_from_leader: None,
            election_deadline: None,
            heartbeat_period_ms: timings.heartbeat_period().as_millis() as u64,
            term_timeout_ms: timings.term_timeout().as_millis() as u64,
            consensus,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }
    pub fn set_id(&mut self, id: String) {
        self.id = id;
    }
    pub fn current_term(&self) -> u64 {
        self.current_term
    }
    #[cfg(test)]
    pub fn voted_for(&self) -> Option<&str> {
        self.voted_for.as_ref().map(String::as_str)
    }
    pub fn current_leader(&self) -> Option<&str> {
        self.current_leader.as_ref().map(String::as_str)
    }
    pub fn status(&self) -> NodeStatus {
        self.status
    }
    #[cfg(test)]
    pub fn votes_in_our_favour(&self) -> usize {
        self.votes_in_our_favour.len()
    }

    /// Processes the inbound messages in FIFO order, then performs the role actions.
    /// Returns the messages to broadcast.
    pub fn tick<Et, I>(&mut self, inbound: I, ctx: &TickContext<Et>) -> Vec<QuorumMessage>
    where
        Et: ElectionTimer,
        I: IntoIterator<Item = QuorumMessage>,
    {
        let mut outbound = Vec::new();

        for message in inbound {
            self.process_message(message, ctx, &mut outbound);
        }

        match self.status {
            NodeStatus::Leader => self.leader_tick(ctx.now, &mut outbound),
            NodeStatus::Follower => self.follower_tick(ctx, &mut outbound),
            NodeStatus::Candidate => self.candidate_tick(ctx, &mut outbound),
        }

        outbound
    }

    fn process_message<Et: ElectionTimer>(
        &mut self,
        message: QuorumMessage,
        ctx: &TickContext<Et>,
        outbound: &mut Vec<QuorumMessage>,
    ) {
        trace!("Node {} Processing {}", self.id, message);
        match message {
            QuorumMessage::Heartbeat(msg) => self.process_heartbeat(msg, ctx.now),
            QuorumMessage::RequestVote(msg) => self.process_request_vote(msg, outbound),
            QuorumMessage::CastVote(msg) => self.process_cast_vote(msg, ctx, outbound),
        }
    }

    fn process_heartbeat(&mut self, msg: Heartbeat, now: u64) {
        let from_current_leader = self.current_leader.as_ref() == Some(&msg.sender);
        if msg.term == self.current_term && from_current_leader {
            // votes of the term are settled once its leader is known
            self.voted_for = None;
            self.last_heartbeat_from_leader = Some(now);
            return;
        }

        if msg.term >= self.current_term || self.status == NodeStatus::Candidate {
            self.accept_leader(msg, now);
        }
    }

    fn accept_leader(&mut self, msg: Heartbeat, now: u64) {
        if msg.term > self.current_term {
            self.set_current_term(msg.term);
        } else {
            self.voted_for = None;
        }

        self.status = if msg.sender == self.id {
            NodeStatus::Leader
        } else {
            NodeStatus::Follower
        };
        self.last_heartbeat_from_leader = Some(now);
        self.election_deadline = None;
        self.votes_in_our_favour.clear();

        info!(
            "Node {} Status changed to {} for term {}. Leader: {}",
            self.id, self.status, self.current_term, msg.sender
        );
        self.current_leader = Some(msg.sender);

        self.consensus.resolve();
    }

    fn process_request_vote(&mut self, msg: RequestVote, outbound: &mut Vec<QuorumMessage>) {
        // self-vote is recorded when the election starts
        if msg.sender == self.id {
            return;
        }

        if msg.term < self.current_term {
            trace!(
                "Node {} Stale vote request from {} for term {} ignored",
                self.id,
                msg.sender,
                msg.term
            );
            return;
        }

        let newer_term = msg.term > self.current_term;
        if newer_term {
            self.set_current_term(msg.term);
        }

        if self.voted_for.is_none() || newer_term {
            info!(
                "Node {} Votes for {} in term {}",
                self.id, msg.sender, self.current_term
            );
            outbound.push(QuorumMessage::cast_vote(
                &self.id,
                self.current_term,
                &msg.sender,
            ));
            self.voted_for = Some(msg.sender);
        }
    }

    fn process_cast_vote<Et: ElectionTimer>(
        &mut self,
        msg: CastVote,
        ctx: &TickContext<Et>,
        outbound: &mut Vec<QuorumMessage>,
    ) {
        if self.status != NodeStatus::Candidate
            || msg.term != self.current_term
            || msg.for_candidate != self.id
        {
            return;
        }

        if !self.votes_in_our_favour.insert(msg.sender) {
            return;
        }

        let peer_count = (ctx.peer_count)();
        let votes = self.votes_in_our_favour.len();
        // announce once, when the majority is first reached
        if has_majority(votes, peer_count) && !has_majority(votes - 1, peer_count) {
            info!(
                "Node {} Quorum gathered ({} of {}) for term {}",
                self.id, votes, peer_count, self.current_term
            );
            outbound.push(QuorumMessage::heartbeat(&self.id, self.current_term));
        }
    }

    fn leader_tick(&mut self, now: u64, outbound: &mut Vec<QuorumMessage>) {
        let heartbeat_due = match self.last_heartbeat_sent {
            None => true,
            Some(sent) => now.saturating_sub(sent) >= self.heartbeat_period_ms,
        };

        if heartbeat_due {
            trace!("Node {} Send heartbeat for term {}", self.id, self.current_term);
            outbound.push(QuorumMessage::heartbeat(&self.id, self.current_term));
            self.last_heartbeat_sent = Some(now);
        }
    }

    fn follower_tick<Et: ElectionTimer>(
        &mut self,
        ctx: &TickContext<Et>,
        outbound: &mut Vec<QuorumMessage>,
    ) {
        let last_heartbeat = match self.last_heartbeat_from_leader {
            Some(last_heartbeat) => last_heartbeat,
            None => {
                self.last_heartbeat_from_leader = Some(ctx.now);
                ctx.now
            }
        };

        let leader_expired = ctx.now.saturating_sub(last_heartbeat) > self.term_timeout_ms;
        if leader_expired && self.voted_for.is_none() {
            info!(
                "Node {} Leader awaiting time elapsed. Starting new election",
                self.id
            );
            self.start_election(ctx, outbound);
        }
    }

    fn candidate_tick<Et: ElectionTimer>(
        &mut self,
        ctx: &TickContext<Et>,
        outbound: &mut Vec<QuorumMessage>,
    ) {
        let deadline = match self.election_deadline {
            Some(deadline) => deadline,
            None => {
                let deadline = next_election_deadline(ctx);
                self.election_deadline = Some(deadline);
                deadline
            }
        };

        if ctx.now >= deadline {
            info!(
                "Node {} Election for term {} timed out. Starting new election",
                self.id, self.current_term
            );
            self.start_election(ctx, outbound);
        }
    }

    fn start_election<Et: ElectionTimer>(
        &mut self,
        ctx: &TickContext<Et>,
        outbound: &mut Vec<QuorumMessage>,
    ) {
        self.election_deadline = Some(next_election_deadline(ctx));
        self.set_current_term(self.current_term + 1);
        self.consensus.renew();

        self.status = NodeStatus::Candidate;
        self.current_leader = None;

        info!(
            "Node {} Status changed to Candidate for term {}",
            self.id, self.current_term
        );

        self.voted_for = Some(self.id.clone());
        outbound.push(QuorumMessage::cast_vote(
            &self.id,
            self.current_term,
            &self.id,
        ));
        outbound.push(QuorumMessage::request_vote(&self.id, self.current_term));
    }

    fn set_current_term(&mut self, new_term: u64) {
        if new_term <= self.current_term {
            return;
        }
        self.current_term = new_term;
        self.voted_for = None;
        self.votes_in_our_favour.clear();
    }
}

fn next_election_deadline<Et: ElectionTimer>(ctx: &TickContext<Et>) -> u64 {
    ctx.now + ctx.election_timer.next_elections_timeout().as_millis() as u64
}

fn has_majority(votes: usize, peer_count: usize) -> bool {
    votes * 2 > peer_count
}

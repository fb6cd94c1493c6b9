// src/pipeline/publisher.rs
//
// Output side of the pipeline. The detector publishes stop waypoints here
// instead of reaching into the transport layer; whatever owns the transport
// drains the queue.

use crate::types::NO_STOP_WAYPOINT;
use std::collections::VecDeque;
use tracing::warn;

pub struct WaypointPublisher {
    pending: VecDeque<i32>,
    max_pending: usize,
}

impl WaypointPublisher {
    pub fn new(max_pending: usize) -> Self {
        Self {
            pending: VecDeque::with_capacity(max_pending),
            max_pending,
        }
    }

    pub fn publish(&mut self, waypoint: i32) {
        if self.pending.len() >= self.max_pending {
            warn!(
                "Output queue full ({} values), dropping oldest",
                self.max_pending
            );
            self.pending.pop_front();
        }
        self.pending.push_back(waypoint);
    }

    pub fn drain(&mut self) -> Vec<i32> {
        self.pending.drain(..).collect()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Most recent value on the channel, "no stop" before any publish.
    pub fn latest(&self) -> i32 {
        self.pending.back().copied().unwrap_or(NO_STOP_WAYPOINT)
    }
}

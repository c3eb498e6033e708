//! Priority queue with a shared request-count capacity.
//!
//! HIGH requests leave before MEDIUM, MEDIUM before LOW; within one priority
//! the order stays FIFO.

use std::collections::VecDeque;

use crate::net::{Priority, RequestId};

use super::{QueuedRequest, RequestQueue};

#[derive(Debug, Clone)]
pub struct PriorityQueue {
    max_len: usize,
    high: VecDeque<QueuedRequest>,
    medium: VecDeque<QueuedRequest>,
    low: VecDeque<QueuedRequest>,
}

impl PriorityQueue {
    pub fn new(max_len: usize) -> Self {
        Self {
            max_len,
            high: VecDeque::new(),
            medium: VecDeque::new(),
            low: VecDeque::new(),
        }
    }

    fn lane_mut(&mut self, priority: Priority) -> &mut VecDeque<QueuedRequest> {
        match priority {
            Priority::High => &mut self.high,
            Priority::Medium => &mut self.medium,
            Priority::Low => &mut self.low,
        }
    }

    fn lanes(&self) -> impl Iterator<Item = &QueuedRequest> {
        self.high.iter().chain(self.medium.iter()).chain(self.low.iter())
    }
}

impl RequestQueue for PriorityQueue {
    fn enqueue(&mut self, entry: QueuedRequest) -> Result<(), QueuedRequest> {
        if self.len() >= self.max_len {
            return Err(entry);
        }
        self.lane_mut(entry.priority).push_back(entry);
        Ok(())
    }

    fn dequeue(&mut self) -> Option<QueuedRequest> {
        self.high
            .pop_front()
            .or_else(|| self.medium.pop_front())
            .or_else(|| self.low.pop_front())
    }

    fn front(&self) -> Option<QueuedRequest> {
        self.lanes().next().copied()
    }

    fn remove(&mut self, id: RequestId) -> bool {
        for lane in [&mut self.high, &mut self.medium, &mut self.low] {
            if let Some(idx) = lane.iter().position(|e| e.id == id) {
                lane.remove(idx);
                return true;
            }
        }
        false
    }

    fn len(&self) -> usize {
        self.high
            .len()
            .saturating_add(self.medium.len())
            .saturating_add(self.low.len())
    }

    fn capacity(&self) -> usize {
        self.max_len
    }

    fn ids(&self) -> Vec<RequestId> {
        self.lanes().map(|e| e.id).collect()
    }

    fn clone_box(&self) -> Box<dyn RequestQueue> {
        Box::new(self.clone())
    }
}

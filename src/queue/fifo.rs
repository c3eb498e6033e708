//! FIFO 队列
//!
//! 容量按请求个数计；队列满时拒绝新到达的请求（尾丢弃）。

use std::collections::VecDeque;

use crate::net::RequestId;

use super::{QueuedRequest, RequestQueue};

#[derive(Debug, Clone)]
pub struct FifoQueue {
    max_len: usize,
    q: VecDeque<QueuedRequest>,
}

impl FifoQueue {
    pub fn new(max_len: usize) -> Self {
        Self {
            max_len,
            q: VecDeque::new(),
        }
    }
}

impl RequestQueue for FifoQueue {
    fn enqueue(&mut self, entry: QueuedRequest) -> Result<(), QueuedRequest> {
        if self.q.len() >= self.max_len {
            return Err(entry);
        }
        self.q.push_back(entry);
        Ok(())
    }

    fn dequeue(&mut self) -> Option<QueuedRequest> {
        self.q.pop_front()
    }

    fn front(&self) -> Option<QueuedRequest> {
        self.q.front().copied()
    }

    fn remove(&mut self, id: RequestId) -> bool {
        match self.q.iter().position(|e| e.id == id) {
            Some(idx) => {
                self.q.remove(idx);
                true
            }
            None => false,
        }
    }

    fn len(&self) -> usize {
        self.q.len()
    }

    fn capacity(&self) -> usize {
        self.max_len
    }

    fn ids(&self) -> Vec<RequestId> {
        self.q.iter().map(|e| e.id).collect()
    }

    fn clone_box(&self) -> Box<dyn RequestQueue> {
        Box::new(self.clone())
    }
}

//! 队列策略（Queue disciplines）
//!
//! 链路传输队列和节点处理队列都只保存请求 id；请求本体留在 Network 的 arena 中。
//! 默认 FIFO，也可以按请求优先级出队。

use serde::{Deserialize, Serialize};

use crate::net::{Priority, RequestId};

mod fifo;
mod priority;

pub use fifo::FifoQueue;
pub use priority::PriorityQueue;

/// 不限容量
pub const UNBOUNDED: usize = usize::MAX;

/// 队列中的一项
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueuedRequest {
    pub id: RequestId,
    pub priority: Priority,
}

/// 请求队列抽象
pub trait RequestQueue: std::fmt::Debug + Send {
    /// 入队：成功返回 Ok；队列已满则原样返回 Err(entry)
    fn enqueue(&mut self, entry: QueuedRequest) -> Result<(), QueuedRequest>;
    /// 出队：按队列策略返回下一个请求
    fn dequeue(&mut self) -> Option<QueuedRequest>;
    /// 查看下一个将出队的请求
    fn front(&self) -> Option<QueuedRequest>;
    /// 从任意位置移除，返回是否存在
    fn remove(&mut self, id: RequestId) -> bool;

    fn len(&self) -> usize;
    fn capacity(&self) -> usize;
    /// 按出队顺序列出所有请求
    fn ids(&self) -> Vec<RequestId>;
    fn clone_box(&self) -> Box<dyn RequestQueue>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn has_room(&self) -> bool {
        self.len() < self.capacity()
    }

    fn contains(&self, id: RequestId) -> bool {
        self.ids().contains(&id)
    }
}

impl Clone for Box<dyn RequestQueue> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// 节点处理队列的出队策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueueDiscipline {
    #[default]
    Fifo,
    Priority,
}

impl QueueDiscipline {
    pub fn make_queue(self, capacity: usize) -> Box<dyn RequestQueue> {
        match self {
            QueueDiscipline::Fifo => Box::new(FifoQueue::new(capacity)),
            QueueDiscipline::Priority => Box::new(PriorityQueue::new(capacity)),
        }
    }
}

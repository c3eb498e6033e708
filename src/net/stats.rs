//! 统计信息
//!
//! 网络层的累计计数，随 Network 一起 clone/reset。

use std::collections::BTreeMap;

use super::request::FailureReason;

/// 网络统计信息
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Stats {
    pub created: u64,
    pub completed: u64,
    /// 完成一跳传输的次数
    pub hops_delivered: u64,
    pub bits_transmitted: f64,
    pub cycles_executed: f64,
    pub failed: BTreeMap<FailureReason, u64>,
}

impl Stats {
    pub fn failed_total(&self) -> u64 {
        self.failed.values().sum()
    }

    pub(crate) fn record_failure(&mut self, reason: FailureReason) {
        *self.failed.entry(reason).or_insert(0) += 1;
    }
}

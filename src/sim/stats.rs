//! 请求状态统计
//!
//! 按状态维护当前请求数；只在开启统计时由状态变化日志增量更新。

use std::collections::BTreeMap;

use serde::Serialize;

use crate::net::{RequestStatus, StatusTransition};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RequestStateStats {
    counts: BTreeMap<RequestStatus, usize>,
}

impl RequestStateStats {
    pub fn from_counts(counts: BTreeMap<RequestStatus, usize>) -> Self {
        Self { counts }
    }

    pub fn get(&self, status: RequestStatus) -> usize {
        self.counts.get(&status).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn as_map(&self) -> &BTreeMap<RequestStatus, usize> {
        &self.counts
    }

    pub(crate) fn apply(&mut self, t: &StatusTransition) {
        if let Some(from) = t.from {
            if let Some(c) = self.counts.get_mut(&from) {
                *c = c.saturating_sub(1);
            }
        }
        *self.counts.entry(t.to).or_insert(0) += 1;
    }
}

//! 运行结果导出
//!
//! 每个请求一行记录，以及标识一次运行的 (电源策略, 分配策略, 用户数) 标签。
//! 写文件由外部工具负责，这里只提供数据和文件名约定。

use serde::Serialize;

use crate::error::ConfigError;
use crate::net::{FailureReason, NodeId, Priority, Request, RequestId, RequestStatus};
use crate::sim::Tick;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestRecord {
    pub id: RequestId,
    pub user: NodeId,
    pub target: Option<NodeId>,
    pub priority: Priority,
    pub size_bits: f64,
    pub qos_limit: f64,
    pub creation_time: Tick,
    pub last_status_change: Tick,
    pub status: RequestStatus,
    pub failure: Option<FailureReason>,
    /// (last_status_change - creation_time) × time_step
    pub elapsed_seconds: f64,
}

impl RequestRecord {
    pub fn from_request(req: &Request, time_step: f64) -> Self {
        Self {
            id: req.id(),
            user: req.origin(),
            target: req.target(),
            priority: req.priority(),
            size_bits: req.size_bits(),
            qos_limit: req.qos_limit(),
            creation_time: req.creation_time(),
            last_status_change: req.last_status_change(),
            status: req.status(),
            failure: req.failure(),
            elapsed_seconds: req.completion_secs(time_step),
        }
    }
}

/// 一次运行的标签；三个字段都不能包含 '_'，因为文件名用 '_' 分段
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunLabel {
    power_strategy: String,
    assignment_strategy: String,
    user_count: usize,
}

impl RunLabel {
    pub fn new(
        power_strategy: impl Into<String>,
        assignment_strategy: impl Into<String>,
        user_count: usize,
    ) -> Result<Self, ConfigError> {
        let power_strategy = power_strategy.into();
        let assignment_strategy = assignment_strategy.into();
        for segment in [&power_strategy, &assignment_strategy] {
            if segment.is_empty() || segment.contains('_') {
                return Err(ConfigError::InvalidLabel(segment.clone()));
            }
        }
        Ok(Self {
            power_strategy,
            assignment_strategy,
            user_count,
        })
    }

    pub fn power_strategy(&self) -> &str {
        &self.power_strategy
    }

    pub fn assignment_strategy(&self) -> &str {
        &self.assignment_strategy
    }

    pub fn user_count(&self) -> usize {
        self.user_count
    }

    pub fn file_name(&self) -> String {
        format!(
            "request_stats_{}_{}_{}.csv",
            self.power_strategy, self.assignment_strategy, self.user_count
        )
    }

    /// 解析 `file_name` 生成的文件名
    pub fn parse_file_name(name: &str) -> Result<Self, ConfigError> {
        let invalid = || ConfigError::InvalidLabel(name.to_string());
        let body = name
            .strip_prefix("request_stats_")
            .and_then(|s| s.strip_suffix(".csv"))
            .ok_or_else(invalid)?;
        let mut parts = body.split('_');
        let (Some(p), Some(a), Some(u), None) = (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(invalid());
        };
        let users = u.parse().map_err(|_| invalid())?;
        Self::new(p, a, users)
    }
}

impl std::fmt::Display for RunLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} / {} / {} users",
            self.power_strategy, self.assignment_strategy, self.user_count
        )
    }
}

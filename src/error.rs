//! 错误类型
//!
//! 配置错误在构造阶段立即返回；仿真过程中的不变量破坏通过 `SimError`
//! 沿 `?` 一路向上，终止当前运行。可恢复的业务失败（路由不可行、QoS 超时、
//! 电池耗尽）不是错误，而是请求状态迁移到 FAILED。

use thiserror::Error;

use crate::net::{LinkId, NodeId, RequestId, RequestStatus};

/// 构造/配置阶段的错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown strategy name: {0}")]
    UnknownStrategy(String),

    #[error("time_step must be positive, got {0}")]
    NonPositiveTimeStep(f64),

    #[error("user_count must be a positive integer")]
    NonPositiveUserCount,

    #[error("max_ticks must be positive when set")]
    ZeroMaxTicks,

    #[error("no stop condition: set max_ticks or enable stop_when_idle")]
    NoStopCondition,

    #[error("timeout must be a non-negative number of seconds, got {0}")]
    InvalidTimeout(f64),

    #[error("MatrixBased assignment requires a decision matrix")]
    MissingDecisionMatrix,

    #[error("label segment {0:?} must be non-empty and must not contain '_'")]
    InvalidLabel(String),

    #[error("no compatible antennas between {a:?} and {b:?}")]
    NoCompatibleAntenna { a: NodeId, b: NodeId },

    #[error("unknown node {0:?}")]
    UnknownNode(NodeId),

    #[error("node {0:?} is not a user device")]
    NotAUserDevice(NodeId),

    #[error("invalid workload: {0}")]
    InvalidWorkload(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// 仿真运行期的不变量破坏（编程错误，不可恢复）
#[derive(Debug, Error)]
pub enum SimError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("request {id:?} is already terminal ({status:?})")]
    TerminalRequest { id: RequestId, status: RequestStatus },

    #[error("illegal transition for request {id:?}: {from:?} -> {to:?}")]
    IllegalTransition {
        id: RequestId,
        from: RequestStatus,
        to: RequestStatus,
    },

    #[error("request {0:?} already has a path")]
    PathAlreadyAssigned(RequestId),

    #[error("request {id:?} is not where it should be: {detail}")]
    Ownership { id: RequestId, detail: String },

    #[error("link {0:?} has zero capacity")]
    InfeasibleLink(LinkId),

    #[error("no link from {from:?} to {to:?}")]
    MissingLink { from: NodeId, to: NodeId },

    #[error("strategy assigned request {id:?} to {node:?}, which is not a feasible candidate")]
    InvalidAssignment { id: RequestId, node: NodeId },

    #[error("unknown request {0:?}")]
    UnknownRequest(RequestId),
}

pub type Result<T, E = SimError> = std::result::Result<T, E>;

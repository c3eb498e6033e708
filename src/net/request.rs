//! 卸载请求及其状态机
//!
//! CREATED → IN_TRANSIT → IN_PROCESSING_QUEUE → PROCESSING → {COMPLETED | FAILED}。
//! 任意非终止状态都可以直接进入 FAILED；终止状态不可再迁移。

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::id::{LinkId, NodeId, RequestId};
use crate::error::{ConfigError, Result, SimError};
use crate::sim::Tick;

/// 浮点时间比较容差（秒）
pub(crate) const TIME_EPS: f64 = 1e-9;

/// 请求状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestStatus {
    Created,
    InTransit,
    InProcessingQueue,
    Processing,
    Completed,
    Failed,
}

impl RequestStatus {
    pub const ALL: [RequestStatus; 6] = [
        RequestStatus::Created,
        RequestStatus::InTransit,
        RequestStatus::InProcessingQueue,
        RequestStatus::Processing,
        RequestStatus::Completed,
        RequestStatus::Failed,
    ];

    pub fn is_terminal(self) -> bool {
        matches!(self, RequestStatus::Completed | RequestStatus::Failed)
    }

    fn stage(self) -> u8 {
        match self {
            RequestStatus::Created => 0,
            RequestStatus::InTransit => 1,
            RequestStatus::InProcessingQueue => 2,
            RequestStatus::Processing => 3,
            RequestStatus::Completed | RequestStatus::Failed => 4,
        }
    }

    /// 只允许前进一步，或从非终止状态进入 FAILED
    pub fn can_transition_to(self, next: RequestStatus) -> bool {
        if self.is_terminal() {
            return false;
        }
        match next {
            RequestStatus::Failed => true,
            RequestStatus::Created => false,
            _ => next.stage() == self.stage() + 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RequestStatus::Created => "CREATED",
            RequestStatus::InTransit => "IN_TRANSIT",
            RequestStatus::InProcessingQueue => "IN_PROCESSING_QUEUE",
            RequestStatus::Processing => "PROCESSING",
            RequestStatus::Completed => "COMPLETED",
            RequestStatus::Failed => "FAILED",
        }
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 请求优先级（有序：LOW < MEDIUM < HIGH）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    /// 该优先级的默认 QoS 时限（秒）
    pub fn qos_limit(self) -> f64 {
        match self {
            Priority::High => 0.2,
            Priority::Medium => 0.5,
            Priority::Low => 1.0,
        }
    }

    /// 该优先级的请求大小范围（Mbit，闭区间）
    pub fn size_range_mbit(self) -> (u32, u32) {
        match self {
            Priority::High => (1, 3),
            Priority::Medium => (4, 6),
            Priority::Low => (7, 10),
        }
    }
}

/// 请求失败原因
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    /// 分配时没有可行节点/路径
    NoFeasibleNode,
    /// 端到端时间超过 qos_limit
    QosExpired,
    /// 所在节点断电
    PowerLost,
    /// 所在节点电池耗尽
    BatteryDepleted,
    /// 链路队列已满，拒绝入队
    LinkRejected,
    /// 目标节点处理队列已满
    QueueFull,
}

impl FailureReason {
    pub fn as_str(self) -> &'static str {
        match self {
            FailureReason::NoFeasibleNode => "no_feasible_node",
            FailureReason::QosExpired => "qos_expired",
            FailureReason::PowerLost => "power_lost",
            FailureReason::BatteryDepleted => "battery_depleted",
            FailureReason::LinkRejected => "link_rejected",
            FailureReason::QueueFull => "queue_full",
        }
    }
}

impl std::fmt::Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 请求当前所在的容器（同一时刻只有一个）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestLocation {
    /// 仍在创建它的用户设备上，尚未路由
    Origin(NodeId),
    Link(LinkId),
    Node(NodeId),
    /// 已终止，不在任何队列中
    Retired,
}

/// 创建请求所需的参数
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RequestSpec {
    pub size_bits: f64,
    pub priority: Priority,
    /// 秒
    pub qos_limit: f64,
}

impl RequestSpec {
    pub fn new(size_bits: f64, priority: Priority, qos_limit: f64) -> Self {
        Self {
            size_bits,
            priority,
            qos_limit,
        }
    }

    /// 使用优先级默认的 QoS 时限
    pub fn for_priority(priority: Priority, size_bits: f64) -> Self {
        Self::new(size_bits, priority, priority.qos_limit())
    }

    /// 大小必须为正，QoS 时限必须是非负有限值（0 表示零容忍）
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if !self.size_bits.is_finite() || self.size_bits <= 0.0 {
            return Err(ConfigError::InvalidRequest(format!(
                "size_bits must be positive, got {}",
                self.size_bits
            )));
        }
        if !self.qos_limit.is_finite() || self.qos_limit < 0.0 {
            return Err(ConfigError::InvalidRequest(format!(
                "qos_limit must be a non-negative number of seconds, got {}",
                self.qos_limit
            )));
        }
        Ok(())
    }
}

/// 一次计算卸载请求
#[derive(Debug, Clone)]
pub struct Request {
    id: RequestId,
    origin: NodeId,
    status: RequestStatus,
    size_bits: f64,
    priority: Priority,
    qos_limit: f64,
    path: Vec<NodeId>,
    /// 当前所在节点在 path 中的索引
    hop: usize,
    processing_progress: f64,
    /// 当前链路上已传输的比特数
    transmitted_bits: f64,
    /// 本 tick 内可开始被处理的时间偏移（秒）
    available_at: f64,
    creation_time: Tick,
    last_status_change: Tick,
    history: Vec<(RequestStatus, Tick)>,
    location: RequestLocation,
    failure: Option<FailureReason>,
}

impl Request {
    pub(crate) fn new(id: RequestId, origin: NodeId, spec: RequestSpec, now: Tick) -> Self {
        Self {
            id,
            origin,
            status: RequestStatus::Created,
            size_bits: spec.size_bits,
            priority: spec.priority,
            qos_limit: spec.qos_limit,
            path: Vec::new(),
            hop: 0,
            processing_progress: 0.0,
            transmitted_bits: 0.0,
            available_at: 0.0,
            creation_time: now,
            last_status_change: now,
            history: vec![(RequestStatus::Created, now)],
            location: RequestLocation::Origin(origin),
            failure: None,
        }
    }

    pub fn id(&self) -> RequestId {
        self.id
    }

    /// 创建该请求的用户设备
    pub fn origin(&self) -> NodeId {
        self.origin
    }

    pub fn status(&self) -> RequestStatus {
        self.status
    }

    pub fn size_bits(&self) -> f64 {
        self.size_bits
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub fn qos_limit(&self) -> f64 {
        self.qos_limit
    }

    pub fn path(&self) -> &[NodeId] {
        &self.path
    }

    /// 路径终点，即负责计算的节点
    pub fn target(&self) -> Option<NodeId> {
        self.path.last().copied()
    }

    pub fn hop(&self) -> usize {
        self.hop
    }

    /// 下一跳节点（如果有）
    pub fn next_node(&self) -> Option<NodeId> {
        self.path.get(self.hop + 1).copied()
    }

    pub fn processing_progress(&self) -> f64 {
        self.processing_progress
    }

    pub fn transmitted_bits(&self) -> f64 {
        self.transmitted_bits
    }

    pub fn creation_time(&self) -> Tick {
        self.creation_time
    }

    pub fn last_status_change(&self) -> Tick {
        self.last_status_change
    }

    /// 每次状态变化的 (状态, tick) 记录，第一项总是 CREATED
    pub fn history(&self) -> &[(RequestStatus, Tick)] {
        &self.history
    }

    pub fn location(&self) -> RequestLocation {
        self.location
    }

    pub fn failure(&self) -> Option<FailureReason> {
        self.failure
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// 处理所需的 CPU 周期数
    pub fn required_cycles(&self, cycles_per_bit: f64) -> f64 {
        self.size_bits * cycles_per_bit
    }

    /// 从创建到 `now` 经过的秒数
    pub fn elapsed_secs(&self, now: Tick, time_step: f64) -> f64 {
        now.secs_since(self.creation_time, time_step)
    }

    /// 到 `now` 为止是否已超过 QoS 时限
    pub fn qos_expired(&self, now: Tick, time_step: f64) -> bool {
        self.elapsed_secs(now, time_step) > self.qos_limit + TIME_EPS
    }

    /// 从创建到最后一次状态变化经过的秒数
    pub fn completion_secs(&self, time_step: f64) -> f64 {
        self.last_status_change
            .secs_since(self.creation_time, time_step)
    }

    /// 是否在 QoS 时限内完成
    pub fn completed_within_qos(&self, time_step: f64) -> bool {
        self.status == RequestStatus::Completed
            && self.completion_secs(time_step) <= self.qos_limit + TIME_EPS
    }

    /// 更新状态并记录时间戳。终止状态或非法迁移返回错误。
    pub fn update_status(&mut self, new_status: RequestStatus, now: Tick) -> Result<()> {
        if self.status.is_terminal() {
            return Err(SimError::TerminalRequest {
                id: self.id,
                status: self.status,
            });
        }
        if !self.status.can_transition_to(new_status) {
            return Err(SimError::IllegalTransition {
                id: self.id,
                from: self.status,
                to: new_status,
            });
        }
        debug!(
            request = self.id.0,
            from = %self.status,
            to = %new_status,
            at = now.0,
            ticks_in_previous = now.ticks_since(self.last_status_change),
            "请求状态变化"
        );
        self.status = new_status;
        self.last_status_change = now.max(self.creation_time);
        self.history.push((new_status, self.last_status_change));
        if new_status.is_terminal() {
            self.location = RequestLocation::Retired;
        }
        Ok(())
    }

    /// 标记为失败并记录原因
    pub fn fail(&mut self, reason: FailureReason, now: Tick) -> Result<()> {
        self.update_status(RequestStatus::Failed, now)?;
        self.failure = Some(reason);
        Ok(())
    }

    /// 分配路径，只允许一次
    pub(crate) fn assign_path(&mut self, path: Vec<NodeId>) -> Result<()> {
        if !self.path.is_empty() {
            return Err(SimError::PathAlreadyAssigned(self.id));
        }
        self.path = path;
        self.hop = 0;
        Ok(())
    }

    pub(crate) fn set_location(&mut self, location: RequestLocation) {
        self.location = location;
    }

    /// 完成一跳传输，前进到下一个节点
    pub(crate) fn advance_hop(&mut self) {
        self.hop += 1;
        self.transmitted_bits = 0.0;
    }

    pub(crate) fn add_transmitted_bits(&mut self, bits: f64) {
        self.transmitted_bits = (self.transmitted_bits + bits).min(self.size_bits);
    }

    pub(crate) fn remaining_bits(&self) -> f64 {
        (self.size_bits - self.transmitted_bits).max(0.0)
    }

    pub(crate) fn available_at(&self) -> f64 {
        self.available_at
    }

    pub(crate) fn set_available_at(&mut self, offset_secs: f64) {
        self.available_at = offset_secs.max(0.0);
    }

    /// 处理进度只增不减，封顶 1.0
    pub(crate) fn set_processing_progress(&mut self, progress: f64) {
        self.processing_progress = progress.clamp(self.processing_progress, 1.0);
    }
}

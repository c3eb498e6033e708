//! 分配策略
//!
//! 请求在路由时（CREATED → IN_TRANSIT）调用一次 `select_compute_node`，
//! 从满足 `can_process` 的候选节点里选出计算节点和路径。
//! 选不出时返回 None，调用方立即把请求标记为 FAILED，不会重试。
//!
//! 所有策略的平局都按 NodeId 升序打破；找不到路径的候选直接跳过。

mod closest_node;
mod energy_greedy;
mod haps_only;
mod matrix_based;
mod random;
mod time_greedy;

pub use closest_node::ClosestNode;
pub use energy_greedy::EnergyGreedy;
pub use haps_only::HapsOnly;
pub use matrix_based::{DecisionMatrix, MatrixBased, ScoreEntry, ScoreTable};
pub use random::RandomAssignment;
pub use time_greedy::TimeGreedy;

use crate::error::ConfigError;
use crate::net::{Network, NodeId, Request};
use crate::sim::AssignmentKind;

/// 一次分配结果
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub node: NodeId,
    /// 从用户设备到 node 的完整路径（含两端）
    pub path: Vec<NodeId>,
    /// 预计端到端时间（秒）：传输 + 排队 + 处理
    pub estimated_delay: f64,
}

/// 分配策略接口
pub trait AssignmentStrategy: std::fmt::Debug + Send {
    fn name(&self) -> String;

    /// `candidates` 已按 NodeId 升序排列，且都满足 `can_process`
    fn select_compute_node(
        &mut self,
        request: &Request,
        candidates: &[NodeId],
        network: &Network,
    ) -> Option<Assignment>;

    /// 恢复到初始状态（例如重新播种）
    fn reset(&mut self) {}
}

/// 根据配置构造策略。MatrixBased 需要决策矩阵。
pub fn from_kind(
    kind: &AssignmentKind,
    matrix: Option<ScoreTable>,
) -> Result<Box<dyn AssignmentStrategy>, ConfigError> {
    Ok(match kind {
        AssignmentKind::TimeGreedy => Box::new(TimeGreedy),
        AssignmentKind::EnergyGreedy => Box::new(EnergyGreedy),
        AssignmentKind::ClosestNode => Box::new(ClosestNode),
        AssignmentKind::MatrixBased => {
            let table = matrix.ok_or(ConfigError::MissingDecisionMatrix)?;
            Box::new(MatrixBased::new(table))
        }
        AssignmentKind::Random { seed } => Box::new(RandomAssignment::new(*seed)),
        AssignmentKind::HapsOnly => Box::new(HapsOnly),
    })
}

/// 规划一个候选：找路径并估计端到端时间；不可达时返回 None
pub fn plan_candidate(network: &Network, request: &Request, node: NodeId) -> Option<Assignment> {
    let path = network.generate_request_path_to(request.origin(), node)?;
    let transfer = network.get_network_delay(&path, request).ok()?;
    let target = network.node(node)?;
    let processing = target.estimated_processing_time(request, network.backlog_cycles(node));
    Some(Assignment {
        node,
        path,
        estimated_delay: transfer + processing,
    })
}

/// 在可达候选里取 `cost` 最小者；cost 相同保留先出现（id 更小）的
pub(crate) fn pick_min(
    network: &Network,
    request: &Request,
    candidates: &[NodeId],
    mut cost: impl FnMut(&Assignment) -> Option<f64>,
) -> Option<Assignment> {
    let mut best: Option<(f64, Assignment)> = None;
    for &node in candidates {
        let Some(plan) = plan_candidate(network, request, node) else {
            continue;
        };
        let Some(c) = cost(&plan) else {
            continue;
        };
        if best.as_ref().is_none_or(|(b, _)| c < *b) {
            best = Some((c, plan));
        }
    }
    best.map(|(_, a)| a)
}

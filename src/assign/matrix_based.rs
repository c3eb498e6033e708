//! 决策矩阵
//!
//! 外部预先计算好 (节点, 请求类别) → 偏好分数，分数越高越优先。
//! 核心只依赖 `DecisionMatrix` 的查表接口；`ScoreTable` 是随配置加载的默认实现。

use serde::{Deserialize, Serialize};

use super::{Assignment, AssignmentStrategy, pick_min};
use crate::net::{Network, Node, NodeId, Priority, Request};

/// 按 (节点, 请求) 查询偏好分数
pub trait DecisionMatrix: std::fmt::Debug + Send {
    fn score(&self, node: &Node, request: &Request) -> f64;
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub node: NodeId,
    pub priority: Priority,
    pub score: f64,
}

/// 以 (NodeId, Priority) 为键的分数表；缺省项取 `default_score`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreTable {
    #[serde(default)]
    pub default_score: f64,
    #[serde(default)]
    pub entries: Vec<ScoreEntry>,
}

impl ScoreTable {
    pub fn new(default_score: f64) -> Self {
        Self {
            default_score,
            entries: Vec::new(),
        }
    }

    /// 设置一项；已存在则覆盖
    pub fn set(&mut self, node: NodeId, priority: Priority, score: f64) -> &mut Self {
        match self
            .entries
            .iter_mut()
            .find(|e| e.node == node && e.priority == priority)
        {
            Some(e) => e.score = score,
            None => self.entries.push(ScoreEntry {
                node,
                priority,
                score,
            }),
        }
        self
    }

    pub fn lookup(&self, node: NodeId, priority: Priority) -> f64 {
        self.entries
            .iter()
            .find(|e| e.node == node && e.priority == priority)
            .map_or(self.default_score, |e| e.score)
    }
}

impl DecisionMatrix for ScoreTable {
    fn score(&self, node: &Node, request: &Request) -> f64 {
        self.lookup(node.id(), request.priority())
    }
}

#[derive(Debug)]
pub struct MatrixBased {
    matrix: Box<dyn DecisionMatrix>,
}

impl MatrixBased {
    pub fn new(matrix: impl DecisionMatrix + 'static) -> Self {
        Self {
            matrix: Box::new(matrix),
        }
    }
}

impl AssignmentStrategy for MatrixBased {
    fn name(&self) -> String {
        "MatrixBased".into()
    }

    #[tracing::instrument(skip_all, fields(strategy = "MatrixBased", request = request.id().0))]
    fn select_compute_node(
        &mut self,
        request: &Request,
        candidates: &[NodeId],
        network: &Network,
    ) -> Option<Assignment> {
        pick_min(network, request, candidates, |plan| {
            let node = network.node(plan.node)?;
            Some(-self.matrix.score(node, request))
        })
    }
}

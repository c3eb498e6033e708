//! 路径搜索
//!
//! 在有向链路图上按最短跳数做 BFS，得到请求从用户设备到计算节点的节点序列。
//! 邻接表按 NodeId 升序保存，因此等跳数的路径总是选中 id 更小的那条，结果可复现。

use std::collections::VecDeque;

use super::id::NodeId;

/// 有向邻接表
#[derive(Debug, Default, Clone)]
pub struct Adjacency {
    /// adj[from] 为从 `from` 出发的所有出边邻居（升序）
    adj: Vec<Vec<NodeId>>,
}

impl Adjacency {
    pub fn ensure_node(&mut self, id: NodeId) {
        if self.adj.len() <= id.0 {
            self.adj.resize_with(id.0 + 1, Vec::new);
        }
    }

    pub fn add_edge(&mut self, from: NodeId, to: NodeId) {
        self.ensure_node(from);
        self.ensure_node(to);
        let out = &mut self.adj[from.0];
        if let Err(pos) = out.binary_search(&to) {
            out.insert(pos, to);
        }
    }

    /// 从 `source` 出发，找到第一个满足 `is_target` 的节点并返回完整路径。
    ///
    /// `can_relay(v)` 决定 v 能否作为中间节点；`can_hop(u, v)` 决定边 u→v 是否可用。
    /// source 本身不参与 is_target 判定。
    pub fn shortest_path(
        &self,
        source: NodeId,
        is_target: impl Fn(NodeId) -> bool,
        can_relay: impl Fn(NodeId) -> bool,
        can_hop: impl Fn(NodeId, NodeId) -> bool,
    ) -> Option<Vec<NodeId>> {
        let n = self.adj.len();
        if source.0 >= n {
            return None;
        }
        let mut prev: Vec<Option<NodeId>> = vec![None; n];
        let mut seen = vec![false; n];
        let mut q: VecDeque<NodeId> = VecDeque::new();
        seen[source.0] = true;
        q.push_back(source);

        while let Some(u) = q.pop_front() {
            for &v in &self.adj[u.0] {
                if seen[v.0] || !can_hop(u, v) {
                    continue;
                }
                seen[v.0] = true;
                prev[v.0] = Some(u);
                if is_target(v) {
                    return Some(unwind(&prev, source, v));
                }
                if can_relay(v) {
                    q.push_back(v);
                }
            }
        }
        None
    }
}

fn unwind(prev: &[Option<NodeId>], source: NodeId, target: NodeId) -> Vec<NodeId> {
    let mut path = vec![target];
    let mut cur = target;
    while cur != source {
        match prev[cur.0] {
            Some(p) => {
                path.push(p);
                cur = p;
            }
            None => break,
        }
    }
    path.reverse();
    path
}

//! 只用 HAPS：候选限定为 HAPS 节点，取距离最近的一个

use super::closest_node::distance_from_origin;
use super::{Assignment, AssignmentStrategy, pick_min};
use crate::net::{Network, NodeClass, NodeId, Request};

#[derive(Debug, Clone, Copy, Default)]
pub struct HapsOnly;

impl AssignmentStrategy for HapsOnly {
    fn name(&self) -> String {
        "HAPSOnly".into()
    }

    #[tracing::instrument(skip_all, fields(strategy = "HAPSOnly", request = request.id().0))]
    fn select_compute_node(
        &mut self,
        request: &Request,
        candidates: &[NodeId],
        network: &Network,
    ) -> Option<Assignment> {
        let haps: Vec<NodeId> = candidates
            .iter()
            .copied()
            .filter(|&id| network.node(id).is_some_and(|n| n.class() == NodeClass::Haps))
            .collect();
        pick_min(network, request, &haps, |plan| {
            distance_from_origin(network, request, plan.node)
        })
    }
}

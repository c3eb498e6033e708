//! 最近节点：只看与用户设备的几何距离，不考虑负载

use super::{Assignment, AssignmentStrategy, pick_min};
use crate::net::{Network, NodeId, Request};

#[derive(Debug, Clone, Copy, Default)]
pub struct ClosestNode;

pub(crate) fn distance_from_origin(network: &Network, request: &Request, node: NodeId) -> Option<f64> {
    let origin = network.node(request.origin())?.position();
    Some(network.node(node)?.position().distance_to(&origin))
}

impl AssignmentStrategy for ClosestNode {
    fn name(&self) -> String {
        "ClosestNode".into()
    }

    #[tracing::instrument(skip_all, fields(strategy = "ClosestNode", request = request.id().0))]
    fn select_compute_node(
        &mut self,
        request: &Request,
        candidates: &[NodeId],
        network: &Network,
    ) -> Option<Assignment> {
        pick_min(network, request, candidates, |plan| {
            distance_from_origin(network, request, plan.node)
        })
    }
}

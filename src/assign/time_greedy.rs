//! 时间贪心：预计端到端时间最短

use super::{Assignment, AssignmentStrategy, pick_min};
use crate::net::{Network, NodeId, Request};

#[derive(Debug, Clone, Copy, Default)]
pub struct TimeGreedy;

impl AssignmentStrategy for TimeGreedy {
    fn name(&self) -> String {
        "TimeGreedy".into()
    }

    #[tracing::instrument(skip_all, fields(strategy = "TimeGreedy", request = request.id().0))]
    fn select_compute_node(
        &mut self,
        request: &Request,
        candidates: &[NodeId],
        network: &Network,
    ) -> Option<Assignment> {
        pick_min(network, request, candidates, |plan| Some(plan.estimated_delay))
    }
}

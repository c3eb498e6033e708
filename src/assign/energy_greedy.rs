//! 能耗贪心
//!
//! 估计该请求的总能耗：沿路径每一跳发送端的发射功率 × 该跳传输时间，
//! 加上目标节点处理所需周期 × 每周期能耗。

use super::{Assignment, AssignmentStrategy, pick_min};
use crate::net::{Network, NodeId, Request};

#[derive(Debug, Clone, Copy, Default)]
pub struct EnergyGreedy;

impl EnergyGreedy {
    /// 估计沿 `plan` 完成请求的能耗（J）
    pub fn estimate_energy(network: &Network, request: &Request, plan: &Assignment) -> Option<f64> {
        let hops = network.hop_delays(&plan.path, request).ok()?;
        let transmission: f64 = hops
            .iter()
            .map(|&(sender, delay)| {
                network
                    .node(sender)
                    .map_or(0.0, |n| n.transmission_power_watts() * delay)
            })
            .sum();
        let target = network.node(plan.node)?;
        let cycles = request.required_cycles(target.profile().cycles_per_bit);
        Some(transmission + target.energy_per_cycle() * cycles)
    }
}

impl AssignmentStrategy for EnergyGreedy {
    fn name(&self) -> String {
        "EnergyGreedy".into()
    }

    #[tracing::instrument(skip_all, fields(strategy = "EnergyGreedy", request = request.id().0))]
    fn select_compute_node(
        &mut self,
        request: &Request,
        candidates: &[NodeId],
        network: &Network,
    ) -> Option<Assignment> {
        pick_min(network, request, candidates, |plan| {
            Self::estimate_energy(network, request, plan)
        })
    }
}

//! 电源策略
//!
//! 每个 tick 对每个节点调用一次 `apply_strategy`，决定它开机还是关机。
//! 用户设备始终在线，策略对它们的操作都是空操作。

mod all_on;
mod on_demand;
mod on_demand_timeout;

pub use all_on::AllOn;
pub use on_demand::OnDemand;
pub use on_demand_timeout::OnDemandWithTimeout;

use crate::error::ConfigError;
use crate::net::{Network, Node, NodeId};
use crate::sim::{PowerKind, Tick};

/// 策略做决定时可见的网络信息
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerContext {
    pub now: Tick,
    pub time_step: f64,
    /// 仍需要该节点的请求数（排队、在途或需要它中继）
    pub demand: usize,
}

pub trait PowerStrategy: std::fmt::Debug + Send {
    fn name(&self) -> String;

    fn apply_strategy(&mut self, node: &mut Node, ctx: &PowerContext);

    /// 关机节点能否作为分配候选（路由时再唤醒）
    fn wakes_on_demand(&self) -> bool {
        false
    }

    /// 请求刚被分配到 `path` 时调用
    fn on_request_routed(&mut self, _path: &[NodeId], _network: &mut Network) {}

    fn reset(&mut self) {}
}

pub fn from_kind(kind: &PowerKind) -> Result<Box<dyn PowerStrategy>, ConfigError> {
    Ok(match *kind {
        PowerKind::AllOn => Box::new(AllOn),
        PowerKind::OnDemand => Box::new(OnDemand),
        PowerKind::OnDemandWithTimeout { timeout } => {
            Box::new(OnDemandWithTimeout::new(timeout)?)
        }
    })
}

/// 打开路径上所有关机的计算节点
pub(crate) fn wake_path(path: &[NodeId], network: &mut Network) {
    for &id in path {
        if let Some(node) = network.node_mut(id) {
            node.set_idle_duration(0.0);
            if !node.is_powered() && !node.is_depleted() {
                node.power_on();
            }
        }
    }
}

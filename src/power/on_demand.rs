//! 按需开关
//!
//! 有请求需要时开机；处理队列为空且没有请求正在路上时立即关机。

use super::{PowerContext, PowerStrategy, wake_path};
use crate::net::{Network, Node, NodeId};

#[derive(Debug, Clone, Copy, Default)]
pub struct OnDemand;

impl PowerStrategy for OnDemand {
    fn name(&self) -> String {
        "OnDemand".into()
    }

    fn apply_strategy(&mut self, node: &mut Node, ctx: &PowerContext) {
        if ctx.demand > 0 {
            node.power_on();
        } else if node.is_idle() {
            node.power_off();
        }
    }

    fn wakes_on_demand(&self) -> bool {
        true
    }

    fn on_request_routed(&mut self, path: &[NodeId], network: &mut Network) {
        wake_path(path, network);
    }
}

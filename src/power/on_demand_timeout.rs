//! 带超时的按需开关
//!
//! 和 OnDemand 一样按需开机，但要连续空闲 `timeout` 秒后才关机，避免频繁开关。
//! 空闲时长记录在节点上，有新需求时清零。

use tracing::trace;

use super::{PowerContext, PowerStrategy, wake_path};
use crate::error::ConfigError;
use crate::net::{Network, Node, NodeId};

const IDLE_EPS: f64 = 1e-9;

#[derive(Debug, Clone, Copy)]
pub struct OnDemandWithTimeout {
    timeout: f64,
}

impl OnDemandWithTimeout {
    pub fn new(timeout: f64) -> Result<Self, ConfigError> {
        if !timeout.is_finite() || timeout < 0.0 {
            return Err(ConfigError::InvalidTimeout(timeout));
        }
        Ok(Self { timeout })
    }

    pub fn timeout(&self) -> f64 {
        self.timeout
    }
}

impl PowerStrategy for OnDemandWithTimeout {
    fn name(&self) -> String {
        format!("OnDemandWithTimeout({})", self.timeout)
    }

    fn apply_strategy(&mut self, node: &mut Node, ctx: &PowerContext) {
        if ctx.demand > 0 {
            node.set_idle_duration(0.0);
            node.power_on();
            return;
        }
        if !node.is_powered() || !node.is_idle() {
            return;
        }
        let idle = node.idle_duration() + ctx.time_step;
        node.set_idle_duration(idle);
        if idle + IDLE_EPS >= self.timeout {
            trace!(node = %node.name(), idle, timeout = self.timeout, "空闲超时");
            node.power_off();
            node.set_idle_duration(0.0);
        }
    }

    fn wakes_on_demand(&self) -> bool {
        true
    }

    fn on_request_routed(&mut self, path: &[NodeId], network: &mut Network) {
        wake_path(path, network);
    }
}

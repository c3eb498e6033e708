//! 用户设备
//!
//! 地面终端：产生请求、始终在线、没有计算能力。

use std::collections::BTreeMap;

use super::{EnergyProfile, Node, NodeVariant};
use crate::net::id::{NodeId, RequestId};
use crate::net::position::Position;
use crate::net::radio::{Antenna, Band};

pub const USER_TX_POWER_DBM: f64 = 23.0;

#[derive(Debug, Clone, PartialEq)]
pub struct UserDevice {
    /// 已创建但尚未终止的请求
    current_requests: Vec<RequestId>,
    /// 请求 -> 分配到的计算节点
    targets: BTreeMap<RequestId, NodeId>,
    pub path_loss_exponent: f64,
    pub attenuation_coefficient: f64,
}

impl Default for UserDevice {
    fn default() -> Self {
        Self {
            current_requests: Vec::new(),
            targets: BTreeMap::new(),
            path_loss_exponent: 3.0,
            attenuation_coefficient: 3.0,
        }
    }
}

impl UserDevice {
    pub fn current_requests(&self) -> &[RequestId] {
        &self.current_requests
    }

    pub fn target_of(&self, request: RequestId) -> Option<NodeId> {
        self.targets.get(&request).copied()
    }

    pub(crate) fn add_request(&mut self, request: RequestId) {
        if !self.current_requests.contains(&request) {
            self.current_requests.push(request);
        }
    }

    pub(crate) fn assign_target_node(&mut self, request: RequestId, node: NodeId) {
        self.targets.insert(request, node);
    }

    /// 请求终止后移出 current_requests（目标记录保留）
    pub(crate) fn remove_request(&mut self, request: RequestId) {
        self.current_requests.retain(|r| *r != request);
    }
}

impl Node {
    pub fn user_device(position: Position) -> Self {
        let profile = EnergyProfile {
            processing_frequency: 0.0,
            k_const: 0.0,
            cycles_per_bit: super::DEFAULT_CYCLES_PER_BIT,
            idle_power: 0.0,
            turn_on_energy_peak: 0.0,
            transmission_power_dbm: USER_TX_POWER_DBM,
            battery_capacity: None,
        };
        Node::with_variant(
            position,
            profile,
            vec![Antenna::new(Band::Vhf, 3.0)],
            NodeVariant::UserDevice(UserDevice::default()),
        )
    }
}

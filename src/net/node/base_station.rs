//! 地面基站

use super::{DEFAULT_CYCLES_PER_BIT, DEFAULT_IDLE_POWER, DEFAULT_TURN_ON_PEAK};
use super::{EnergyProfile, Node, NodeVariant};
use crate::net::position::Position;
use crate::net::radio::{Antenna, Band};

/// 基站专有数据（目前只有天线高度）
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BaseStation {
    pub mast_height_m: f64,
}

impl BaseStation {
    pub const DEFAULT_FREQUENCY: f64 = 3e9;
    pub const DEFAULT_TX_POWER_DBM: f64 = 30.0;
}

impl Node {
    /// 市电供电，没有电池上限
    pub fn base_station(x: f64) -> Self {
        let profile = EnergyProfile {
            processing_frequency: BaseStation::DEFAULT_FREQUENCY,
            k_const: 1e-27,
            cycles_per_bit: DEFAULT_CYCLES_PER_BIT,
            idle_power: DEFAULT_IDLE_POWER,
            turn_on_energy_peak: DEFAULT_TURN_ON_PEAK,
            transmission_power_dbm: BaseStation::DEFAULT_TX_POWER_DBM,
            battery_capacity: None,
        };
        Node::with_variant(
            Position::ground(x),
            profile,
            vec![Antenna::new(Band::Vhf, 10.0)],
            NodeVariant::BaseStation(BaseStation::default()),
        )
    }
}

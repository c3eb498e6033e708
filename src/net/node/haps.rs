//! 高空平台（HAPS）
//!
//! 平流层固定位置，电池供电，同时带 UHF（对 LEO）和 VHF（对地面）天线。

use super::{DEFAULT_CYCLES_PER_BIT, DEFAULT_IDLE_POWER, DEFAULT_TURN_ON_PEAK};
use super::{EnergyProfile, Node, NodeVariant};
use crate::net::position::Position;
use crate::net::radio::{Antenna, Band};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Haps {
    pub altitude_m: f64,
}

impl Haps {
    pub const DEFAULT_ALTITUDE_M: f64 = 20e3;
    pub const DEFAULT_FREQUENCY: f64 = 5e9;
    pub const DEFAULT_BATTERY_J: f64 = 20e3;
    pub const DEFAULT_TX_POWER_DBM: f64 = 33.0;
}

impl Default for Haps {
    fn default() -> Self {
        Self {
            altitude_m: Self::DEFAULT_ALTITUDE_M,
        }
    }
}

impl Node {
    pub fn haps(x: f64) -> Self {
        let haps = Haps::default();
        let profile = EnergyProfile {
            processing_frequency: Haps::DEFAULT_FREQUENCY,
            k_const: 1e-27,
            cycles_per_bit: DEFAULT_CYCLES_PER_BIT,
            idle_power: DEFAULT_IDLE_POWER,
            turn_on_energy_peak: DEFAULT_TURN_ON_PEAK,
            transmission_power_dbm: Haps::DEFAULT_TX_POWER_DBM,
            battery_capacity: Some(Haps::DEFAULT_BATTERY_J),
        };
        Node::with_variant(
            Position::new(x, haps.altitude_m),
            profile,
            vec![Antenna::new(Band::Uhf, 15.0), Antenna::new(Band::Vhf, 15.0)],
            NodeVariant::Haps(haps),
        )
    }
}

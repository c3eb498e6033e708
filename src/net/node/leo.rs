//! 低轨卫星（LEO）
//!
//! 圆轨道上匀速运动，位置由轨道角换算；只有仰角不低于 `min_elevation_deg`
//! 时对地面可见。

use super::{DEFAULT_CYCLES_PER_BIT, DEFAULT_IDLE_POWER, DEFAULT_TURN_ON_PEAK};
use super::{EnergyProfile, Node, NodeVariant};
use crate::net::position::{
    EARTH_RADIUS_M, Position, normalize_angle_deg, orbital_angular_velocity_deg,
};
use crate::net::radio::{Antenna, Band};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Leo {
    /// 轨道角（度），0 表示位于原点正上方
    angle_deg: f64,
    altitude_m: f64,
    /// 度/秒
    angular_velocity_deg: f64,
    min_elevation_deg: f64,
}

impl Leo {
    pub const DEFAULT_ALTITUDE_M: f64 = 500e3;
    pub const DEFAULT_FREQUENCY: f64 = 8e9;
    pub const DEFAULT_BATTERY_J: f64 = 100e3;
    pub const DEFAULT_TX_POWER_DBM: f64 = 33.0;
    pub const DEFAULT_MIN_ELEVATION_DEG: f64 = 10.0;

    pub fn new(angle_deg: f64, altitude_m: f64) -> Self {
        Self {
            angle_deg: normalize_angle_deg(angle_deg),
            altitude_m,
            angular_velocity_deg: orbital_angular_velocity_deg(altitude_m),
            min_elevation_deg: Self::DEFAULT_MIN_ELEVATION_DEG,
        }
    }

    pub fn angle_deg(&self) -> f64 {
        self.angle_deg
    }

    pub fn altitude_m(&self) -> f64 {
        self.altitude_m
    }

    pub fn angular_velocity_deg(&self) -> f64 {
        self.angular_velocity_deg
    }

    pub fn min_elevation_deg(&self) -> f64 {
        self.min_elevation_deg
    }

    pub fn position(&self) -> Position {
        Position::from_orbit_angle(self.angle_deg, EARTH_RADIUS_M + self.altitude_m)
    }

    pub(crate) fn advance(&mut self, time_step: f64) {
        self.angle_deg = normalize_angle_deg(self.angle_deg + self.angular_velocity_deg * time_step);
    }

    /// `position` 处的卫星是否对地面点 `ground` 可见
    pub fn is_visible_from(&self, position: &Position, ground: &Position) -> bool {
        position.elevation_from(ground) >= self.min_elevation_deg
    }
}

impl Node {
    pub fn leo(angle_deg: f64) -> Self {
        Self::leo_at(Leo::new(angle_deg, Leo::DEFAULT_ALTITUDE_M))
    }

    pub fn leo_at(leo: Leo) -> Self {
        let profile = EnergyProfile {
            processing_frequency: Leo::DEFAULT_FREQUENCY,
            k_const: 1e-27,
            cycles_per_bit: DEFAULT_CYCLES_PER_BIT,
            idle_power: DEFAULT_IDLE_POWER,
            turn_on_energy_peak: DEFAULT_TURN_ON_PEAK,
            transmission_power_dbm: Leo::DEFAULT_TX_POWER_DBM,
            battery_capacity: Some(Leo::DEFAULT_BATTERY_J),
        };
        Node::with_variant(
            leo.position(),
            profile,
            vec![Antenna::new(Band::Uhf, 20.0)],
            NodeVariant::Leo(leo),
        )
    }
}

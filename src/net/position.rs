//! 位置与地球模型
//!
//! 二维局部坐标：x 为水平距离（米），y 为海拔高度（米），地面原点在 (0, 0)。
//! LEO 位置由轨道角换算得到。

use serde::{Deserialize, Serialize};

pub const EARTH_RADIUS_M: f64 = 6.371e6;
pub const EARTH_MASS_KG: f64 = 5.972e24;
pub const GRAVITATIONAL_CONSTANT: f64 = 6.67430e-11;
pub const SPEED_OF_LIGHT: f64 = 299_792_458.0;

/// 二维位置（米）
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const ORIGIN: Position = Position { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// 地面位置（高度为 0）
    pub fn ground(x: f64) -> Self {
        Self { x, y: 0.0 }
    }

    pub fn distance_to(&self, other: &Position) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }

    /// 轨道角（度）与轨道半径（地心起算）换算为局部坐标
    pub fn from_orbit_angle(angle_deg: f64, orbit_radius: f64) -> Self {
        let rad = angle_deg.to_radians();
        Self {
            x: orbit_radius * rad.sin(),
            y: orbit_radius * rad.cos() - EARTH_RADIUS_M,
        }
    }

    /// 从 `observer` 看向 `self` 的仰角（度）
    pub fn elevation_from(&self, observer: &Position) -> f64 {
        let dx = (self.x - observer.x).abs();
        let dy = self.y - observer.y;
        dy.atan2(dx).to_degrees()
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.1}, {:.1})", self.x, self.y)
    }
}

/// 圆轨道速度 sqrt(GM / r)（米/秒）
pub fn orbital_speed(altitude_m: f64) -> f64 {
    (GRAVITATIONAL_CONSTANT * EARTH_MASS_KG / (EARTH_RADIUS_M + altitude_m)).sqrt()
}

/// 圆轨道角速度（度/秒）
pub fn orbital_angular_velocity_deg(altitude_m: f64) -> f64 {
    (orbital_speed(altitude_m) / (EARTH_RADIUS_M + altitude_m)).to_degrees()
}

/// 把角度规约到 [-180, 180)
pub fn normalize_angle_deg(angle: f64) -> f64 {
    (angle + 180.0).rem_euclid(360.0) - 180.0
}

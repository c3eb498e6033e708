//! 天线与无线信道模型
//!
//! 容量 = B_eff · log2(1 + SNR)，SNR = P_tx · G / (N0 · B_eff)。
//! 用户→基站使用地面经验模型，其余链路使用 Friis 自由空间模型。

use serde::{Deserialize, Serialize};

use super::position::SPEED_OF_LIGHT;

/// 接收端噪声功率谱密度（dBm/Hz）
pub const NOISE_DENSITY_DBM_PER_HZ: f64 = -174.0;

/// 地面信道的参考增益（dB）
pub const TERRESTRIAL_REFERENCE_GAIN_DB: f64 = 40.0;

/// 计算距离下限（米），避免共址节点出现除零
const MIN_DISTANCE_M: f64 = 1.0;

/// 天线频段，只有同频段天线之间才能通信
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Band {
    Uhf,
    Vhf,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Antenna {
    pub band: Band,
    pub gain_db: f64,
}

impl Antenna {
    pub fn new(band: Band, gain_db: f64) -> Self {
        Self { band, gain_db }
    }

    pub fn is_compatible_with(&self, other: &Antenna) -> bool {
        self.band == other.band
    }
}

/// 按发送端天线顺序找第一对兼容天线
pub fn find_compatible(tx: &[Antenna], rx: &[Antenna]) -> Option<(Antenna, Antenna)> {
    tx.iter().find_map(|a| {
        rx.iter()
            .find(|b| a.is_compatible_with(b))
            .map(|b| (*a, *b))
    })
}

pub fn db_to_linear(db: f64) -> f64 {
    10f64.powf(db / 10.0)
}

pub fn dbm_to_watts(dbm: f64) -> f64 {
    10f64.powf((dbm - 30.0) / 10.0)
}

/// 路径损耗模型
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PathLoss {
    /// Friis：G_tx · G_rx · (c / 4πdf)²
    FreeSpace,
    /// 地面经验模型：10^(ref/10) · |α|² / d^n
    Terrestrial {
        attenuation: f64,
        exponent: f64,
    },
}

impl PathLoss {
    /// 线性信道增益
    pub fn channel_gain(
        &self,
        distance_m: f64,
        carrier_frequency: f64,
        tx_gain_db: f64,
        rx_gain_db: f64,
    ) -> f64 {
        let d = distance_m.max(MIN_DISTANCE_M);
        match *self {
            PathLoss::FreeSpace => {
                let fspl = SPEED_OF_LIGHT / (4.0 * std::f64::consts::PI * d * carrier_frequency);
                db_to_linear(tx_gain_db) * db_to_linear(rx_gain_db) * fspl * fspl
            }
            PathLoss::Terrestrial {
                attenuation,
                exponent,
            } => {
                db_to_linear(TERRESTRIAL_REFERENCE_GAIN_DB) * attenuation.abs().powi(2)
                    / d.powf(exponent)
            }
        }
    }
}

/// 带宽 `bandwidth_hz` 上的热噪声功率（瓦）
pub fn noise_power(bandwidth_hz: f64) -> f64 {
    dbm_to_watts(NOISE_DENSITY_DBM_PER_HZ) * bandwidth_hz
}

/// Shannon 容量（bit/s）
pub fn shannon_capacity(bandwidth_hz: f64, snr: f64) -> f64 {
    if bandwidth_hz <= 0.0 || snr <= 0.0 {
        return 0.0;
    }
    bandwidth_hz * (1.0 + snr).log2()
}

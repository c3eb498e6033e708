//! 仿真时间类型
//!
//! 全局时间轴是离散的 tick 序号；秒数 = tick × time_step。

use serde::{Deserialize, Serialize};

/// 仿真时间（tick 序号）。
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    /// 下一个 tick
    pub fn next(self) -> Tick {
        Tick(self.0.saturating_add(1))
    }

    /// 换算为秒
    pub fn as_secs(self, time_step: f64) -> f64 {
        self.0 as f64 * time_step
    }

    /// 从 `earlier` 到 `self` 经过的 tick 数（不足则为 0）
    pub fn ticks_since(self, earlier: Tick) -> u64 {
        self.0.saturating_sub(earlier.0)
    }

    /// 从 `earlier` 到 `self` 经过的秒数
    pub fn secs_since(self, earlier: Tick, time_step: f64) -> f64 {
        self.ticks_since(earlier) as f64 * time_step
    }

    /// 覆盖 `secs` 秒所需的最少 tick 数（向上取整）
    pub fn ceil_from_secs(secs: f64, time_step: f64) -> u64 {
        if secs <= 0.0 || time_step <= 0.0 {
            return 0;
        }
        (secs / time_step - 1e-9).ceil().max(0.0) as u64
    }
}

impl std::fmt::Display for Tick {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "t{}", self.0)
    }
}

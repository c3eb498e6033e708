//! 仿真配置
//!
//! `SimConfig` 可以从 JSON 读取，也可以在代码里构造。策略类型同时支持
//! 命令行/文件名里使用的字符串形式，例如 `OnDemandWithTimeout(10)`、`Random(42)`。
//! 所有校验都在构造 Simulation 时完成，解析后不会再悄悄补默认值。

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::assign::ScoreTable;
use crate::error::ConfigError;
use crate::queue::QueueDiscipline;
use crate::topo::ntn::NtnTopologyOpts;
use crate::workload::WorkloadOpts;

/// 电源策略
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PowerKind {
    AllOn,
    OnDemand,
    OnDemandWithTimeout { timeout: f64 },
}

/// 分配策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssignmentKind {
    TimeGreedy,
    EnergyGreedy,
    ClosestNode,
    MatrixBased,
    Random { seed: u64 },
    #[serde(rename = "HAPSOnly")]
    HapsOnly,
}

impl PowerKind {
    pub const NAMES: [&'static str; 3] = ["AllOn", "OnDemand", "OnDemandWithTimeout"];
}

impl AssignmentKind {
    pub const NAMES: [&'static str; 6] = [
        "TimeGreedy",
        "EnergyGreedy",
        "ClosestNode",
        "MatrixBased",
        "Random",
        "HAPSOnly",
    ];
}

/// 把 "Name" 或 "Name(arg)" 拆成 (name, arg)
fn split_call(s: &str) -> Result<(&str, Option<&str>), ConfigError> {
    let s = s.trim();
    match s.find('(') {
        None => Ok((s, None)),
        Some(open) => {
            let inner = s[open + 1..]
                .strip_suffix(')')
                .ok_or_else(|| ConfigError::UnknownStrategy(s.to_string()))?;
            Ok((s[..open].trim(), Some(inner.trim())))
        }
    }
}

impl FromStr for PowerKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unknown = || ConfigError::UnknownStrategy(s.to_string());
        match split_call(s)? {
            ("AllOn", None) => Ok(PowerKind::AllOn),
            ("OnDemand", None) => Ok(PowerKind::OnDemand),
            ("OnDemandWithTimeout", Some(arg)) => {
                let timeout: f64 = arg.parse().map_err(|_| unknown())?;
                Ok(PowerKind::OnDemandWithTimeout { timeout })
            }
            _ => Err(unknown()),
        }
    }
}

impl fmt::Display for PowerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PowerKind::AllOn => f.write_str("AllOn"),
            PowerKind::OnDemand => f.write_str("OnDemand"),
            PowerKind::OnDemandWithTimeout { timeout } => {
                write!(f, "OnDemandWithTimeout({timeout})")
            }
        }
    }
}

impl FromStr for AssignmentKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unknown = || ConfigError::UnknownStrategy(s.to_string());
        match split_call(s)? {
            ("TimeGreedy", None) => Ok(AssignmentKind::TimeGreedy),
            ("EnergyGreedy", None) => Ok(AssignmentKind::EnergyGreedy),
            ("ClosestNode", None) => Ok(AssignmentKind::ClosestNode),
            ("MatrixBased", None) => Ok(AssignmentKind::MatrixBased),
            ("HAPSOnly", None) => Ok(AssignmentKind::HapsOnly),
            ("Random", Some(arg)) => {
                let seed: u64 = arg.parse().map_err(|_| unknown())?;
                Ok(AssignmentKind::Random { seed })
            }
            _ => Err(unknown()),
        }
    }
}

impl fmt::Display for AssignmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssignmentKind::TimeGreedy => f.write_str("TimeGreedy"),
            AssignmentKind::EnergyGreedy => f.write_str("EnergyGreedy"),
            AssignmentKind::ClosestNode => f.write_str("ClosestNode"),
            AssignmentKind::MatrixBased => f.write_str("MatrixBased"),
            AssignmentKind::Random { seed } => write!(f, "Random({seed})"),
            AssignmentKind::HapsOnly => f.write_str("HAPSOnly"),
        }
    }
}

pub const DEFAULT_TIME_STEP: f64 = 0.1;
pub const DEFAULT_MAX_TICKS: u64 = 3000;

fn default_time_step() -> f64 {
    DEFAULT_TIME_STEP
}

fn default_max_ticks() -> Option<u64> {
    Some(DEFAULT_MAX_TICKS)
}

fn default_true() -> bool {
    true
}

fn default_seed() -> u64 {
    42
}

/// 运行控制参数（与拓扑、负载无关的部分）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunSettings {
    /// 每个 tick 的秒数
    #[serde(default = "default_time_step")]
    pub time_step: f64,
    /// None 表示不限
    #[serde(default = "default_max_ticks")]
    pub max_ticks: Option<u64>,
    /// 全部请求终止且没有待到达请求时停止
    #[serde(default = "default_true")]
    pub stop_when_idle: bool,
    #[serde(default)]
    pub stats_tracking: bool,
    #[serde(default)]
    pub queue_discipline: QueueDiscipline,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            time_step: DEFAULT_TIME_STEP,
            max_ticks: Some(DEFAULT_MAX_TICKS),
            stop_when_idle: true,
            stats_tracking: false,
            queue_discipline: QueueDiscipline::Fifo,
        }
    }
}

impl RunSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.time_step.is_finite() && self.time_step > 0.0) {
            return Err(ConfigError::NonPositiveTimeStep(self.time_step));
        }
        match self.max_ticks {
            Some(0) => Err(ConfigError::ZeroMaxTicks),
            None if !self.stop_when_idle => Err(ConfigError::NoStopCondition),
            _ => Ok(()),
        }
    }
}

/// 一次仿真的完整配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    pub power_strategy: PowerKind,
    pub assignment_strategy: AssignmentKind,
    pub user_count: usize,
    #[serde(flatten)]
    pub run: RunSettings,
    /// 拓扑（用户位置）与负载的随机种子
    #[serde(default = "default_seed")]
    pub seed: u64,
    #[serde(default)]
    pub topology: NtnTopologyOpts,
    #[serde(default)]
    pub workload: WorkloadOpts,
    #[serde(default)]
    pub decision_matrix: Option<ScoreTable>,
}

impl SimConfig {
    pub fn new(power_strategy: PowerKind, assignment_strategy: AssignmentKind, user_count: usize) -> Self {
        Self {
            power_strategy,
            assignment_strategy,
            user_count,
            run: RunSettings::default(),
            seed: default_seed(),
            topology: NtnTopologyOpts::default(),
            workload: WorkloadOpts::default(),
            decision_matrix: None,
        }
    }

    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let cfg: SimConfig = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.run.validate()?;
        if self.user_count == 0 {
            return Err(ConfigError::NonPositiveUserCount);
        }
        if let PowerKind::OnDemandWithTimeout { timeout } = self.power_strategy {
            if !timeout.is_finite() || timeout < 0.0 {
                return Err(ConfigError::InvalidTimeout(timeout));
            }
        }
        if self.assignment_strategy == AssignmentKind::MatrixBased && self.decision_matrix.is_none()
        {
            return Err(ConfigError::MissingDecisionMatrix);
        }
        self.workload.validate()?;
        Ok(())
    }
}

//! 仿真核心模块
//!
//! 此模块包含离散 tick 仿真的核心组件：仿真时间、配置、仿真器和运行统计。

// 子模块声明
mod config;
mod report;
mod simulation;
mod stats;
mod time;

// 重新导出公共接口
pub use config::{
    AssignmentKind, DEFAULT_MAX_TICKS, DEFAULT_TIME_STEP, PowerKind, RunSettings, SimConfig,
};
pub use report::{RequestRecord, RunLabel};
pub use simulation::{RunState, Simulation};
pub use stats::RequestStateStats;
pub use time::Tick;

//! 网络模拟模块
//!
//! 此模块包含 NTN 网络的核心组件：请求、节点、链路、无线信道和网络拓扑。

// 子模块声明
mod id;
mod link;
mod network;
mod node;
mod position;
mod radio;
mod request;
mod routing;
mod stats;

// 重新导出公共接口
pub use id::{LinkId, NodeId, RequestId};
pub use link::{CommunicationLink, LinkConfig, LinkTickPlan};
pub use network::{Network, StatusTransition};
pub use node::{
    BaseStation, EnergyProfile, Haps, Leo, Node, NodeClass, NodeVariant, ProcessingPlan,
    TickEnergy, UserDevice,
};
pub use position::{
    EARTH_RADIUS_M, Position, SPEED_OF_LIGHT, orbital_angular_velocity_deg, orbital_speed,
};
pub use radio::{Antenna, Band, PathLoss};
pub use request::{FailureReason, Priority, Request, RequestLocation, RequestSpec, RequestStatus};
pub use routing::Adjacency;
pub use stats::Stats;

pub mod channel {
    //! 信道模型的辅助函数
    pub use super::radio::{
        NOISE_DENSITY_DBM_PER_HZ, TERRESTRIAL_REFERENCE_GAIN_DB, db_to_linear, dbm_to_watts,
        find_compatible, noise_power, shannon_capacity,
    };
}

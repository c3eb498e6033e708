//! NTN 拓扑构建
//!
//! 标准布局：地面基站、一架或多架 HAPS、若干 LEO，用户在水平区间内均匀随机分布。
//!
//! 链路：用户 → 每个 HAPS、用户 → 最近基站；基站 ⇄ HAPS；HAPS → 每个 LEO。

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ConfigError;
use crate::net::{LinkConfig, Network, Node, NodeId, PathLoss, Position};
use crate::queue::QueueDiscipline;

/// 所有链路的载波频率（Hz）
pub const CARRIER_FREQUENCY: f64 = 2e9;
pub const ACCESS_BANDWIDTH: f64 = 100e6;
pub const BACKHAUL_BANDWIDTH: f64 = 1e9;

/// NTN 拓扑配置选项
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NtnTopologyOpts {
    /// 基站的水平位置（米）
    pub base_station_xs: Vec<f64>,
    pub haps_xs: Vec<f64>,
    /// LEO 初始轨道角（度）
    pub leo_angles_deg: Vec<f64>,
    /// 用户分布在 [-user_span_m, user_span_m]
    pub user_span_m: f64,
    /// 计算节点处理队列容量；None 表示不限
    pub node_queue_capacity: Option<usize>,
    /// 覆盖 HAPS 电池容量（J）
    pub haps_battery_j: Option<f64>,
    /// 覆盖 LEO 电池容量（J）
    pub leo_battery_j: Option<f64>,
}

impl Default for NtnTopologyOpts {
    fn default() -> Self {
        Self {
            base_station_xs: vec![-7_500.0, -2_500.0, 2_500.0, 7_500.0],
            haps_xs: vec![0.0],
            leo_angles_deg: vec![0.0, -5.0],
            user_span_m: 10_000.0,
            node_queue_capacity: None,
            haps_battery_j: None,
            leo_battery_j: None,
        }
    }
}

/// 构建结果：各类节点的 id
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NtnLayout {
    pub users: Vec<NodeId>,
    pub base_stations: Vec<NodeId>,
    pub haps: Vec<NodeId>,
    pub leos: Vec<NodeId>,
}

/// 用户上行链路
pub fn user_uplink() -> LinkConfig {
    LinkConfig::new(ACCESS_BANDWIDTH, 23.0, CARRIER_FREQUENCY)
}

/// 用户 → 基站使用地面经验模型
pub fn user_to_base_station(path_loss_exponent: f64, attenuation: f64) -> LinkConfig {
    user_uplink().with_path_loss(PathLoss::Terrestrial {
        attenuation,
        exponent: path_loss_exponent,
    })
}

pub fn base_station_to_haps() -> LinkConfig {
    LinkConfig::new(ACCESS_BANDWIDTH, 30.0, CARRIER_FREQUENCY)
}

pub fn haps_to_base_station() -> LinkConfig {
    LinkConfig::new(ACCESS_BANDWIDTH, 33.0, CARRIER_FREQUENCY)
}

pub fn haps_to_leo() -> LinkConfig {
    LinkConfig::new(BACKHAUL_BANDWIDTH, 33.0, CARRIER_FREQUENCY)
}

fn with_queue(node: Node, opts: &NtnTopologyOpts) -> Node {
    match opts.node_queue_capacity {
        Some(cap) => node.with_queue(QueueDiscipline::Fifo, cap),
        None => node,
    }
}

/// 构建 NTN 拓扑
pub fn build_ntn(
    net: &mut Network,
    opts: &NtnTopologyOpts,
    user_count: usize,
    rng: &mut impl Rng,
) -> Result<NtnLayout, ConfigError> {
    let mut layout = NtnLayout::default();

    for &x in &opts.base_station_xs {
        layout
            .base_stations
            .push(net.add_node(with_queue(Node::base_station(x), opts)));
    }
    for &x in &opts.haps_xs {
        let mut haps = Node::haps(x);
        if let Some(cap) = opts.haps_battery_j {
            haps = haps.with_battery_capacity(Some(cap));
        }
        layout.haps.push(net.add_node(with_queue(haps, opts)));
    }
    for &angle in &opts.leo_angles_deg {
        let mut leo = Node::leo(angle);
        if let Some(cap) = opts.leo_battery_j {
            leo = leo.with_battery_capacity(Some(cap));
        }
        layout.leos.push(net.add_node(with_queue(leo, opts)));
    }
    for _ in 0..user_count {
        let x = if opts.user_span_m > 0.0 {
            rng.random_range(-opts.user_span_m..=opts.user_span_m)
        } else {
            0.0
        };
        layout.users.push(net.add_node(Node::user_device(Position::ground(x))));
    }

    connect_ntn(net, &layout)?;
    info!(%net, "🌐 NTN 拓扑构建完成");
    Ok(layout)
}

/// 按标准规则连接已添加的节点
pub fn connect_ntn(net: &mut Network, layout: &NtnLayout) -> Result<(), ConfigError> {
    for &user in &layout.users {
        for &haps in &layout.haps {
            net.connect(user, haps, user_uplink())?;
        }
        let Some(pos) = net.node(user).map(|n| n.position()) else {
            return Err(ConfigError::UnknownNode(user));
        };
        let closest = layout.base_stations.iter().copied().min_by(|a, b| {
            let da = net.node(*a).map_or(f64::INFINITY, |n| n.position().distance_to(&pos));
            let db = net.node(*b).map_or(f64::INFINITY, |n| n.position().distance_to(&pos));
            da.total_cmp(&db)
        });
        if let Some(bs) = closest {
            let (exponent, attenuation) = net
                .node(user)
                .and_then(|n| n.as_user_device())
                .map(|u| (u.path_loss_exponent, u.attenuation_coefficient))
                .ok_or(ConfigError::NotAUserDevice(user))?;
            net.connect(user, bs, user_to_base_station(exponent, attenuation))?;
        }
    }
    for &bs in &layout.base_stations {
        for &haps in &layout.haps {
            net.connect_both(bs, haps, base_station_to_haps(), haps_to_base_station())?;
        }
    }
    for &haps in &layout.haps {
        for &leo in &layout.leos {
            net.connect(haps, leo, haps_to_leo())?;
        }
    }
    Ok(())
}

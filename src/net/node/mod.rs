//! 节点类型
//!
//! 所有节点共享同一个 `Node` 结构（处理队列、能耗、电源状态），
//! 各类节点的专有数据放在 `NodeVariant` 中：用户设备、基站、HAPS、LEO。

mod base_station;
mod haps;
mod leo;
mod user_device;

pub use base_station::BaseStation;
pub use haps::Haps;
pub use leo::Leo;
pub use user_device::UserDevice;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::id::{NodeId, RequestId};
use super::position::Position;
use super::radio::Antenna;
use super::request::{Request, RequestStatus, TIME_EPS};
use crate::queue::{QueueDiscipline, QueuedRequest, RequestQueue, UNBOUNDED};

/// 节点类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeClass {
    UserDevice,
    BaseStation,
    Haps,
    Leo,
}

impl NodeClass {
    pub fn as_str(self) -> &'static str {
        match self {
            NodeClass::UserDevice => "User",
            NodeClass::BaseStation => "Base Station",
            NodeClass::Haps => "HAPS",
            NodeClass::Leo => "LEO",
        }
    }

    /// 是否具备计算能力
    pub fn is_compute(self) -> bool {
        !matches!(self, NodeClass::UserDevice)
    }
}

impl std::fmt::Display for NodeClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 计算与能耗参数
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnergyProfile {
    /// CPU 频率（Hz），0 表示没有处理能力
    pub processing_frequency: f64,
    /// 动态电压模型常数：每周期能耗 = k · f²
    pub k_const: f64,
    pub cycles_per_bit: f64,
    /// 开机待机功率（W）
    pub idle_power: f64,
    /// 每次开机的一次性能耗（J）
    pub turn_on_energy_peak: f64,
    /// 发射功率（dBm）
    pub transmission_power_dbm: f64,
    /// 电池容量（J），None 表示市电供电
    pub battery_capacity: Option<f64>,
}

pub const DEFAULT_CYCLES_PER_BIT: f64 = 200.0;
pub const DEFAULT_IDLE_POWER: f64 = 50.0;
pub const DEFAULT_TURN_ON_PEAK: f64 = 150.0;

/// 各类节点的专有数据
#[derive(Debug, Clone)]
pub enum NodeVariant {
    UserDevice(UserDevice),
    BaseStation(BaseStation),
    Haps(Haps),
    Leo(Leo),
}

/// 本 tick 内的能耗分项（J）
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickEnergy {
    pub transmission: f64,
    pub processing: f64,
    pub idle: f64,
    pub switching: f64,
}

impl TickEnergy {
    pub fn total(&self) -> f64 {
        self.transmission + self.processing + self.idle + self.switching
    }
}

/// 一次能耗扣减的类别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EnergyUse {
    Transmission,
    Processing,
    Idle,
    Switching,
}

/// 一个 tick 的处理计划（尚未提交）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProcessingPlan {
    /// 本 tick 开始处理的请求
    pub started: Vec<RequestId>,
    /// (请求, 本 tick 结束时的进度)
    pub progressed: Vec<(RequestId, f64)>,
    pub completed: Vec<RequestId>,
    /// CPU 实际忙碌时间（秒）
    pub busy_secs: f64,
    pub cycles: f64,
}

/// 网络节点
#[derive(Debug, Clone)]
pub struct Node {
    id: NodeId,
    name: String,
    position: Position,
    powered: bool,
    depleted: bool,
    profile: EnergyProfile,
    antennas: Vec<Antenna>,
    queue: Box<dyn RequestQueue>,
    energy_consumed: f64,
    energy_history: Vec<f64>,
    last_sample: f64,
    tick_energy: TickEnergy,
    idle_duration: f64,
    variant: NodeVariant,
}

impl Node {
    pub(crate) fn with_variant(
        position: Position,
        profile: EnergyProfile,
        antennas: Vec<Antenna>,
        variant: NodeVariant,
    ) -> Self {
        let powered = matches!(variant, NodeVariant::UserDevice(_));
        Self {
            id: NodeId(usize::MAX),
            name: String::new(),
            position,
            powered,
            depleted: false,
            profile,
            antennas,
            queue: QueueDiscipline::Fifo.make_queue(UNBOUNDED),
            energy_consumed: 0.0,
            energy_history: Vec::new(),
            last_sample: 0.0,
            tick_energy: TickEnergy::default(),
            idle_duration: 0.0,
            variant,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_profile(mut self, profile: EnergyProfile) -> Self {
        self.profile = profile;
        self
    }

    pub fn with_battery_capacity(mut self, capacity: Option<f64>) -> Self {
        self.profile.battery_capacity = capacity;
        self
    }

    /// 处理队列的出队策略与容量（请求个数）
    pub fn with_queue(mut self, discipline: QueueDiscipline, capacity: usize) -> Self {
        self.queue = discipline.make_queue(capacity);
        self
    }

    pub(crate) fn set_id(&mut self, id: NodeId) {
        self.id = id;
    }

    pub(crate) fn set_name_if_empty(&mut self, name: String) {
        if self.name.is_empty() {
            self.name = name;
        }
    }

    /// 替换处理队列的出队策略，保留容量（仅在队列为空时调用）
    pub(crate) fn set_queue_discipline(&mut self, discipline: QueueDiscipline) {
        debug_assert!(self.queue.is_empty());
        self.queue = discipline.make_queue(self.queue.capacity());
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn class(&self) -> NodeClass {
        match self.variant {
            NodeVariant::UserDevice(_) => NodeClass::UserDevice,
            NodeVariant::BaseStation(_) => NodeClass::BaseStation,
            NodeVariant::Haps(_) => NodeClass::Haps,
            NodeVariant::Leo(_) => NodeClass::Leo,
        }
    }

    pub fn variant(&self) -> &NodeVariant {
        &self.variant
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn profile(&self) -> &EnergyProfile {
        &self.profile
    }

    pub fn antennas(&self) -> &[Antenna] {
        &self.antennas
    }

    pub fn is_powered(&self) -> bool {
        self.powered
    }

    /// 电池已耗尽，无法再开机
    pub fn is_depleted(&self) -> bool {
        self.depleted
    }

    pub fn energy_consumed(&self) -> f64 {
        self.energy_consumed
    }

    /// 每个 tick 一条的能耗记录（J）
    pub fn energy_history(&self) -> &[f64] {
        &self.energy_history
    }

    pub fn tick_energy(&self) -> TickEnergy {
        self.tick_energy
    }

    /// 本 tick 由链路发送产生的能耗（J）
    pub fn transmission_energy(&self) -> f64 {
        self.tick_energy.transmission
    }

    /// 本 tick 由计算产生的能耗（J），空闲或关机时为 0
    pub fn processing_energy(&self) -> f64 {
        self.tick_energy.processing
    }

    /// 每个 CPU 周期的能耗（J）：k · f²
    pub fn energy_per_cycle(&self) -> f64 {
        self.profile.k_const * self.profile.processing_frequency.powi(2)
    }

    /// 发射功率（W）
    pub fn transmission_power_watts(&self) -> f64 {
        super::radio::dbm_to_watts(self.profile.transmission_power_dbm)
    }

    pub fn battery_headroom(&self) -> f64 {
        match self.profile.battery_capacity {
            Some(cap) => (cap - self.energy_consumed).max(0.0),
            None => f64::INFINITY,
        }
    }

    pub fn has_processor(&self) -> bool {
        self.class().is_compute() && self.profile.processing_frequency > 0.0
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    pub fn queue_capacity(&self) -> usize {
        self.queue.capacity()
    }

    pub fn has_queue_room(&self) -> bool {
        self.queue.has_room()
    }

    /// 处理队列中的请求（按出队顺序）
    pub fn queued(&self) -> Vec<RequestId> {
        self.queue.ids()
    }

    pub fn is_idle(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn idle_duration(&self) -> f64 {
        self.idle_duration
    }

    pub fn set_idle_duration(&mut self, secs: f64) {
        self.idle_duration = secs.max(0.0);
    }

    /// 处理 `cycles` 个周期所需的时间（秒）
    pub fn processing_time(&self, cycles: f64) -> f64 {
        if self.profile.processing_frequency <= 0.0 {
            return f64::INFINITY;
        }
        cycles / self.profile.processing_frequency
    }

    /// 在已有 `backlog_cycles` 积压的情况下，处理完该请求的预计时间（秒）
    pub fn estimated_processing_time(&self, request: &Request, backlog_cycles: f64) -> f64 {
        self.processing_time(backlog_cycles + request.required_cycles(self.profile.cycles_per_bit))
    }

    /// 对来自 `ground` 的新请求是否可见（只有 LEO 会不可见）
    pub fn is_visible_from(&self, ground: &Position) -> bool {
        match &self.variant {
            NodeVariant::Leo(leo) => leo.is_visible_from(&self.position, ground),
            _ => true,
        }
    }

    /// 能否接收该请求：处理能力、电池余量、电源状态、队列容量、可见性与 QoS 时限。
    ///
    /// `require_powered` 为 false 时，关机但未耗尽电池的节点也算可用（按需开机）。
    pub fn can_process(
        &self,
        request: &Request,
        origin: &Position,
        backlog_cycles: f64,
        require_powered: bool,
    ) -> bool {
        if !self.has_processor() || self.depleted {
            return false;
        }
        if require_powered && !self.powered {
            return false;
        }
        if self.battery_headroom() <= 0.0 {
            return false;
        }
        if !self.queue.has_room() || !self.is_visible_from(origin) {
            return false;
        }
        self.estimated_processing_time(request, backlog_cycles) <= request.qos_limit() + TIME_EPS
    }

    pub fn as_user_device(&self) -> Option<&UserDevice> {
        match &self.variant {
            NodeVariant::UserDevice(u) => Some(u),
            _ => None,
        }
    }

    pub(crate) fn as_user_device_mut(&mut self) -> Option<&mut UserDevice> {
        match &mut self.variant {
            NodeVariant::UserDevice(u) => Some(u),
            _ => None,
        }
    }

    pub fn as_leo(&self) -> Option<&Leo> {
        match &self.variant {
            NodeVariant::Leo(l) => Some(l),
            _ => None,
        }
    }

    /// 扣减能耗。超过电池容量时截断在容量处、标记耗尽并关机，返回 false。
    pub(crate) fn draw_energy(&mut self, joules: f64, usage: EnergyUse) -> bool {
        if joules <= 0.0 {
            return true;
        }
        let headroom = self.battery_headroom();
        let (drawn, ok) = if joules > headroom {
            (headroom, false)
        } else {
            (joules, true)
        };
        self.energy_consumed += drawn;
        let slot = match usage {
            EnergyUse::Transmission => &mut self.tick_energy.transmission,
            EnergyUse::Processing => &mut self.tick_energy.processing,
            EnergyUse::Idle => &mut self.tick_energy.idle,
            EnergyUse::Switching => &mut self.tick_energy.switching,
        };
        *slot += drawn;
        if !ok {
            self.deplete();
        }
        ok
    }

    fn deplete(&mut self) {
        if !self.depleted {
            info!(node = %self.name, energy = self.energy_consumed, "🔋 电池耗尽，强制关机");
        }
        self.depleted = true;
        self.powered = false;
    }

    /// 开机；已开机直接返回 true。电池不足以支付开机能耗时节点耗尽。
    pub fn power_on(&mut self) -> bool {
        if self.powered {
            return true;
        }
        if self.depleted {
            return false;
        }
        let peak = self.profile.turn_on_energy_peak;
        if !self.draw_energy(peak, EnergyUse::Switching) {
            return false;
        }
        debug!(node = %self.name, peak, "⚡ 节点开机");
        self.powered = true;
        true
    }

    /// 关机；用户设备始终在线，忽略关机
    pub fn power_off(&mut self) {
        if matches!(self.variant, NodeVariant::UserDevice(_)) || !self.powered {
            return;
        }
        debug!(node = %self.name, "💤 节点关机");
        self.powered = false;
    }

    pub fn set_power(&mut self, on: bool) -> bool {
        if on {
            self.power_on()
        } else {
            self.power_off();
            true
        }
    }

    pub(crate) fn enqueue(&mut self, entry: QueuedRequest) -> Result<(), QueuedRequest> {
        self.queue.enqueue(entry)
    }

    pub(crate) fn remove_queued(&mut self, id: RequestId) -> bool {
        self.queue.remove(id)
    }

    /// 推进轨道位置（只有 LEO 会移动）
    pub(crate) fn advance_motion(&mut self, time_step: f64) {
        if let NodeVariant::Leo(leo) = &mut self.variant {
            leo.advance(time_step);
            self.position = leo.position();
        }
    }

    /// 计算本 tick 的处理：单处理器按队头串行执行，不早于请求到达偏移开始。
    ///
    /// 已处于 PROCESSING 的请求优先继续，避免被优先级队列抢占后悬空。
    pub fn tick(&self, time_step: f64, requests: &[Request]) -> ProcessingPlan {
        let mut plan = ProcessingPlan::default();
        if !self.powered || !self.has_processor() {
            return plan;
        }

        let mut order = self.queue.ids();
        order.sort_by_key(|id| requests[id.0].status() != RequestStatus::Processing);

        let freq = self.profile.processing_frequency;
        let mut cursor = 0.0_f64;
        for id in order {
            let req = &requests[id.0];
            let start = cursor.max(req.available_at());
            if start >= time_step - TIME_EPS {
                break;
            }
            if req.status() != RequestStatus::Processing {
                plan.started.push(id);
            }
            let required = req.required_cycles(self.profile.cycles_per_bit);
            let remaining = (1.0 - req.processing_progress()) * required;
            let need = remaining / freq;
            if start + need <= time_step + TIME_EPS {
                let end = (start + need).min(time_step);
                plan.busy_secs += end - start;
                plan.cycles += remaining;
                plan.progressed.push((id, 1.0));
                plan.completed.push(id);
                cursor = end;
            } else {
                let cycles = (time_step - start) * freq;
                plan.busy_secs += time_step - start;
                plan.cycles += cycles;
                let progress = req.processing_progress() + cycles / required;
                plan.progressed.push((id, progress.min(1.0)));
                break;
            }
        }
        plan
    }

    /// 本 tick 待机与计算的能耗（J）
    pub fn planned_energy(&self, plan: &ProcessingPlan, time_step: f64) -> (f64, f64) {
        let idle = if self.powered {
            self.profile.idle_power * time_step
        } else {
            0.0
        };
        (idle, self.energy_per_cycle() * plan.cycles)
    }

    /// 把本 tick 的能耗写入历史，返回该增量
    pub(crate) fn record_energy_sample(&mut self) -> f64 {
        let delta = self.energy_consumed - self.last_sample;
        self.energy_history.push(delta);
        self.last_sample = self.energy_consumed;
        self.tick_energy = TickEnergy::default();
        delta
    }
}

impl std::fmt::Display for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

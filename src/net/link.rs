//! 链路类型
//!
//! 定义通信链路、容量计算以及按 tick 推进的传输队列。

use serde::{Deserialize, Serialize};

use super::id::{LinkId, NodeId, RequestId};
use super::node::Node;
use super::radio::{self, Antenna, PathLoss};
use super::request::{Request, TIME_EPS};
use crate::error::{Result, SimError};
use crate::queue::{FifoQueue, QueuedRequest, RequestQueue, UNBOUNDED};

/// 链路配置
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinkConfig {
    /// 总带宽（Hz），由同类发送端共享
    pub total_bandwidth: f64,
    /// 发射功率（dBm）
    pub signal_power_dbm: f64,
    /// 载波频率（Hz）
    pub carrier_frequency: f64,
    #[serde(default = "default_path_loss")]
    pub path_loss: PathLoss,
    /// 传输队列容量（请求个数），None 表示不限
    #[serde(default)]
    pub max_queue_len: Option<usize>,
}

fn default_path_loss() -> PathLoss {
    PathLoss::FreeSpace
}

impl LinkConfig {
    pub fn new(total_bandwidth: f64, signal_power_dbm: f64, carrier_frequency: f64) -> Self {
        Self {
            total_bandwidth,
            signal_power_dbm,
            carrier_frequency,
            path_loss: PathLoss::FreeSpace,
            max_queue_len: None,
        }
    }

    pub fn with_path_loss(mut self, path_loss: PathLoss) -> Self {
        self.path_loss = path_loss;
        self
    }

    pub fn with_queue_limit(mut self, max_len: usize) -> Self {
        self.max_queue_len = Some(max_len);
        self
    }
}

/// 一个 tick 的传输计划（尚未提交）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinkTickPlan {
    /// 本 tick 传完的请求及完成时刻（tick 内偏移，秒）
    pub delivered: Vec<(RequestId, f64)>,
    /// 队头未传完的请求及本 tick 传输的比特数
    pub partial: Option<(RequestId, f64)>,
    /// 实际占用信道的时间（秒）
    pub busy_secs: f64,
    pub bits_sent: f64,
}

impl LinkTickPlan {
    pub fn is_idle(&self) -> bool {
        self.busy_secs <= 0.0
    }
}

/// 通信链路：node_a 发送，node_b 接收
#[derive(Debug, Clone)]
pub struct CommunicationLink {
    id: LinkId,
    node_a: NodeId,
    node_b: NodeId,
    config: LinkConfig,
    antennas: (Antenna, Antenna),
    queue: Box<dyn RequestQueue>,
    /// 上一个 tick 的信道占用时间（秒）
    last_busy_secs: f64,
    pub bits_sent_total: f64,
    pub delivered_total: u64,
}

impl CommunicationLink {
    pub(crate) fn new(
        id: LinkId,
        node_a: NodeId,
        node_b: NodeId,
        config: LinkConfig,
        antennas: (Antenna, Antenna),
    ) -> Self {
        Self {
            id,
            node_a,
            node_b,
            config,
            antennas,
            queue: Box::new(FifoQueue::new(config.max_queue_len.unwrap_or(UNBOUNDED))),
            last_busy_secs: 0.0,
            bits_sent_total: 0.0,
            delivered_total: 0,
        }
    }

    pub fn id(&self) -> LinkId {
        self.id
    }

    pub fn node_a(&self) -> NodeId {
        self.node_a
    }

    pub fn node_b(&self) -> NodeId {
        self.node_b
    }

    pub fn config(&self) -> &LinkConfig {
        &self.config
    }

    pub fn antennas(&self) -> (Antenna, Antenna) {
        self.antennas
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    /// 传输队列中的请求（按出队顺序）
    pub fn queued(&self) -> Vec<RequestId> {
        self.queue.ids()
    }

    pub fn is_busy(&self) -> bool {
        !self.queue.is_empty()
    }

    pub fn last_busy_secs(&self) -> f64 {
        self.last_busy_secs
    }

    /// 两端距离（米）
    pub fn link_length(&self, a: &Node, b: &Node) -> f64 {
        a.position().distance_to(&b.position())
    }

    /// 共享后的有效带宽
    pub fn adjusted_bandwidth(&self, sharing: usize) -> f64 {
        self.config.total_bandwidth / sharing.max(1) as f64
    }

    /// 不考虑电源状态的容量（bit/s），用于路径规划
    pub fn nominal_capacity(&self, a: &Node, b: &Node, sharing: usize) -> f64 {
        let bandwidth = self.adjusted_bandwidth(sharing);
        let gain = self.config.path_loss.channel_gain(
            self.link_length(a, b),
            self.config.carrier_frequency,
            self.antennas.0.gain_db,
            self.antennas.1.gain_db,
        );
        let snr = radio::dbm_to_watts(self.config.signal_power_dbm) * gain
            / radio::noise_power(bandwidth);
        radio::shannon_capacity(bandwidth, snr)
    }

    /// 当前瞬时容量（bit/s）；任一端断电时为 0
    pub fn calculate_capacity(&self, a: &Node, b: &Node, sharing: usize) -> f64 {
        if !a.is_powered() || !b.is_powered() {
            return 0.0;
        }
        self.nominal_capacity(a, b, sharing)
    }

    /// 以给定容量传输整个请求所需的时间（秒）
    pub fn calculate_transmission_delay(&self, request: &Request, capacity: f64) -> Result<f64> {
        if capacity <= 0.0 {
            return Err(SimError::InfeasibleLink(self.id));
        }
        Ok(request.size_bits() / capacity)
    }

    pub(crate) fn enqueue(&mut self, entry: QueuedRequest) -> std::result::Result<(), QueuedRequest> {
        self.queue.enqueue(entry)
    }

    pub(crate) fn remove(&mut self, id: RequestId) -> bool {
        self.queue.remove(id)
    }

    /// 计算本 tick 的传输：队头串行发送，剩余预算顺延给下一个请求
    pub fn tick(&self, capacity: f64, time_step: f64, requests: &[Request]) -> LinkTickPlan {
        let mut plan = LinkTickPlan::default();
        if capacity <= 0.0 {
            return plan;
        }

        let mut cursor = 0.0;
        for id in self.queue.ids() {
            if cursor >= time_step - TIME_EPS {
                break;
            }
            let remaining = requests[id.0].remaining_bits();
            let need = remaining / capacity;
            if cursor + need <= time_step + TIME_EPS {
                cursor = (cursor + need).min(time_step);
                plan.bits_sent += remaining;
                plan.delivered.push((id, cursor));
            } else {
                let bits = (time_step - cursor) * capacity;
                plan.bits_sent += bits;
                plan.partial = Some((id, bits));
                cursor = time_step;
            }
        }
        plan.busy_secs = cursor;
        plan
    }

    /// 提交传输计划：更新进度并把传完的请求移出队列
    pub(crate) fn commit(&mut self, plan: &LinkTickPlan, requests: &mut [Request]) {
        for &(id, _) in &plan.delivered {
            let req = &mut requests[id.0];
            let remaining = req.remaining_bits();
            req.add_transmitted_bits(remaining);
            self.queue.remove(id);
            self.delivered_total += 1;
        }
        if let Some((id, bits)) = plan.partial {
            requests[id.0].add_transmitted_bits(bits);
        }
        self.bits_sent_total += plan.bits_sent;
        self.last_busy_secs = plan.busy_secs;
    }

    /// 丢弃本 tick 的计划（发送端电池耗尽）
    pub(crate) fn abort(&mut self) {
        self.last_busy_secs = 0.0;
    }
}

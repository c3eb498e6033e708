//! 仿真器
//!
//! 全局 tick 循环。每次 `step()` 固定按以下顺序推进一个 tick：
//!
//! 1. `Network::tick`：QoS 超时、链路、节点
//! 2. 电源策略作用于每个计算节点
//! 3. 创建本 tick 到达的请求，并为所有未分配的请求选择计算节点
//! 4. 记录能耗、更新统计、推进时间
//!
//! 所有状态都属于 Simulation 实例本身，多个实例之间互不影响，可以放到不同线程并行运行。

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info};

use super::config::{RunSettings, SimConfig};
use super::report::{RequestRecord, RunLabel};
use super::stats::RequestStateStats;
use super::time::Tick;
use crate::assign::{self, AssignmentStrategy};
use crate::error::{ConfigError, Result, SimError};
use crate::net::{Network, NodeId, RequestStatus};
use crate::power::{self, PowerContext, PowerStrategy};
use crate::topo::ntn::build_ntn;
use crate::workload::{self, ScheduledRequest};

/// 运行状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    NotStarted,
    Running,
    Paused,
    Completed,
}

/// 负载种子 = 配置种子 ^ 该常数
const WORKLOAD_SEED_OFFSET: u64 = 0x9E37_79B9_7F4A_7C15;

#[derive(Debug)]
pub struct Simulation {
    settings: RunSettings,
    /// reset 时恢复的初始网络
    pristine: Network,
    network: Network,
    assignment: Box<dyn AssignmentStrategy>,
    power: Box<dyn PowerStrategy>,
    /// 按到达 tick 排序
    arrivals: Vec<ScheduledRequest>,
    next_arrival: usize,
    current_time: Tick,
    state: RunState,
    system_energy_consumed: f64,
    system_energy_history: Vec<f64>,
    stats_tracking: bool,
    request_state_stats: RequestStateStats,
}

impl Simulation {
    /// 按配置构建标准 NTN 拓扑与负载
    pub fn new(config: &SimConfig) -> std::result::Result<Self, ConfigError> {
        config.validate()?;
        let mut rng = StdRng::seed_from_u64(config.seed);
        let mut network = Network::new();
        let layout = build_ntn(&mut network, &config.topology, config.user_count, &mut rng)?;

        let assignment = assign::from_kind(&config.assignment_strategy, config.decision_matrix.clone())?;
        let power = power::from_kind(&config.power_strategy)?;
        let mut sim = Self::from_parts(config.run, network, assignment, power)?;

        let schedule = workload::generate(
            &layout.users,
            &config.workload,
            config.seed ^ WORKLOAD_SEED_OFFSET,
        )?;
        for req in schedule {
            sim.schedule_request(req)?;
        }
        info!(
            power = %config.power_strategy,
            assignment = %config.assignment_strategy,
            users = config.user_count,
            requests = sim.arrivals.len(),
            "🧪 仿真已创建"
        );
        Ok(sim)
    }

    /// 用自定义网络和策略构建；网络中不应已有请求
    pub fn from_parts(
        settings: RunSettings,
        mut network: Network,
        assignment: Box<dyn AssignmentStrategy>,
        power: Box<dyn PowerStrategy>,
    ) -> std::result::Result<Self, ConfigError> {
        settings.validate()?;
        network.set_wake_on_demand(power.wakes_on_demand());
        network.set_queue_discipline(settings.queue_discipline);
        network.set_transition_tracking(settings.stats_tracking);
        let request_state_stats = RequestStateStats::from_counts(network.status_counts());
        Ok(Self {
            settings,
            pristine: network.clone(),
            network,
            assignment,
            power,
            arrivals: Vec::new(),
            next_arrival: 0,
            current_time: Tick::ZERO,
            state: RunState::NotStarted,
            system_energy_consumed: 0.0,
            system_energy_history: Vec::new(),
            stats_tracking: settings.stats_tracking,
            request_state_stats,
        })
    }

    /// 计划一个请求在 `req.at` 由 `req.user` 创建。早于当前时间的请求在下一个 tick 创建。
    pub fn schedule_request(&mut self, req: ScheduledRequest) -> std::result::Result<(), ConfigError> {
        let node = self
            .network
            .node(req.user)
            .ok_or(ConfigError::UnknownNode(req.user))?;
        if node.as_user_device().is_none() {
            return Err(ConfigError::NotAUserDevice(req.user));
        }
        req.spec.validate()?;
        let pos = self
            .arrivals
            .partition_point(|r| r.at <= req.at)
            .max(self.next_arrival);
        self.arrivals.insert(pos, req);
        Ok(())
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    pub fn settings(&self) -> &RunSettings {
        &self.settings
    }

    pub fn current_time(&self) -> Tick {
        self.current_time
    }

    pub fn time_step(&self) -> f64 {
        self.settings.time_step
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn scheduled_requests(&self) -> &[ScheduledRequest] {
        &self.arrivals
    }

    pub fn assignment_name(&self) -> String {
        self.assignment.name()
    }

    pub fn power_name(&self) -> String {
        self.power.name()
    }

    pub fn system_energy_consumed(&self) -> f64 {
        self.system_energy_consumed
    }

    /// 每个 tick 的全网能耗（J）
    pub fn system_energy_history(&self) -> &[f64] {
        &self.system_energy_history
    }

    pub fn is_stats_tracking(&self) -> bool {
        self.stats_tracking
    }

    pub fn request_state_stats(&self) -> &RequestStateStats {
        &self.request_state_stats
    }

    pub fn enable_stats_tracking(&mut self) {
        if self.stats_tracking {
            return;
        }
        self.stats_tracking = true;
        self.network.set_transition_tracking(true);
        self.request_state_stats = RequestStateStats::from_counts(self.network.status_counts());
    }

    /// 关闭后统计不再更新，保留关闭时的值
    pub fn disable_stats_tracking(&mut self) {
        self.stats_tracking = false;
        self.network.set_transition_tracking(false);
    }

    pub fn pause(&mut self) {
        if self.state == RunState::Running {
            info!(now = self.current_time.0, "⏸️  仿真暂停");
            self.state = RunState::Paused;
        }
    }

    /// 推进一个 tick，返回是否应继续运行
    #[tracing::instrument(skip(self), fields(now = self.current_time.0))]
    pub fn step(&mut self) -> Result<bool> {
        match self.state {
            RunState::Completed => return Ok(false),
            RunState::NotStarted => {
                info!(network = %self.network, "▶️  开始运行仿真");
                self.state = RunState::Running;
            }
            RunState::Paused => self.state = RunState::Running,
            RunState::Running => {}
        }

        let now = self.current_time;
        let dt = self.settings.time_step;

        self.network.tick(now, dt)?;
        self.apply_power(now, dt)?;
        self.create_arrivals(now)?;
        self.assign_pending(now)?;

        let delta = self.network.record_energy_samples();
        self.system_energy_history.push(delta);
        self.system_energy_consumed = self.network.get_total_energy_consumed();
        if self.stats_tracking {
            for t in self.network.drain_transitions() {
                self.request_state_stats.apply(&t);
            }
        }
        self.current_time = now.next();

        if self.should_stop() {
            self.state = RunState::Completed;
            info!(
                ticks = self.current_time.0,
                qos = self.evaluate_qos_satisfaction(),
                energy = self.system_energy_consumed,
                completed = self.network.stats.completed,
                failed = self.network.stats.failed_total(),
                "🏁 仿真结束"
            );
            return Ok(false);
        }
        Ok(true)
    }

    fn apply_power(&mut self, now: Tick, time_step: f64) -> Result<()> {
        let demand = self.network.demand_snapshot();
        let compute: Vec<NodeId> = self.network.compute_nodes().to_vec();
        for id in compute {
            let ctx = PowerContext {
                now,
                time_step,
                demand: demand.get(id.0).copied().unwrap_or(0),
            };
            if let Some(node) = self.network.node_mut(id) {
                self.power.apply_strategy(node, &ctx);
            }
        }
        self.network.settle_power(now)
    }

    fn create_arrivals(&mut self, now: Tick) -> Result<()> {
        while let Some(req) = self.arrivals.get(self.next_arrival) {
            if req.at > now {
                break;
            }
            let req = *req;
            self.next_arrival += 1;
            self.network.create_request(req.user, req.spec, now)?;
        }
        Ok(())
    }

    fn assign_pending(&mut self, now: Tick) -> Result<()> {
        for id in self.network.take_unrouted() {
            let request = self
                .network
                .request(id)
                .ok_or(SimError::UnknownRequest(id))?;
            let candidates = self.network.candidates(request);
            let choice = self
                .assignment
                .select_compute_node(request, &candidates, &self.network);

            let Some(assignment) = choice else {
                debug!(request = id.0, candidates = candidates.len(), "没有可行节点");
                self.network.dispatch(id, None, now)?;
                continue;
            };
            if !candidates.contains(&assignment.node) {
                return Err(SimError::InvalidAssignment {
                    id,
                    node: assignment.node,
                });
            }
            debug!(
                request = id.0,
                node = assignment.node.0,
                hops = assignment.path.len().saturating_sub(1),
                estimated_delay = assignment.estimated_delay,
                "🎯 分配计算节点"
            );
            let path = assignment.path;
            if self.network.dispatch(id, Some(path.clone()), now)? {
                self.power.on_request_routed(&path, &mut self.network);
            }
        }
        self.network.settle_power(now)
    }

    fn should_stop(&self) -> bool {
        if let Some(max) = self.settings.max_ticks {
            if self.current_time.0 >= max {
                return true;
            }
        }
        self.settings.stop_when_idle
            && self.next_arrival >= self.arrivals.len()
            && self.network.all_terminal()
    }

    /// 一直运行到停止条件满足，返回 QoS 满足率
    pub fn run(&mut self) -> Result<f64> {
        while self.step()? {}
        Ok(self.evaluate_qos_satisfaction())
    }

    /// 恢复初始网络、策略和计数器，丢弃全部历史；计划的请求保留
    pub fn reset(&mut self) {
        self.network = self.pristine.clone();
        self.network.set_transition_tracking(self.stats_tracking);
        self.assignment.reset();
        self.power.reset();
        self.next_arrival = 0;
        self.current_time = Tick::ZERO;
        self.state = RunState::NotStarted;
        self.system_energy_consumed = 0.0;
        self.system_energy_history.clear();
        self.request_state_stats = RequestStateStats::from_counts(self.network.status_counts());
        debug!("🔄 仿真已重置");
    }

    /// 终止请求中在 qos_limit 内完成的比例；没有终止请求时为 1.0
    pub fn evaluate_qos_satisfaction(&self) -> f64 {
        let dt = self.settings.time_step;
        let (terminal, satisfied) = self
            .network
            .requests()
            .iter()
            .filter(|r| r.is_terminal())
            .fold((0usize, 0usize), |(t, s), r| {
                (t + 1, s + usize::from(r.completed_within_qos(dt)))
            });
        if terminal == 0 {
            return 1.0;
        }
        satisfied as f64 / terminal as f64
    }

    pub fn count_by_status(&self, status: RequestStatus) -> usize {
        self.network
            .requests()
            .iter()
            .filter(|r| r.status() == status)
            .count()
    }

    /// 每个请求一行
    pub fn request_records(&self) -> Vec<RequestRecord> {
        self.network
            .requests()
            .iter()
            .map(|r| RequestRecord::from_request(r, self.settings.time_step))
            .collect()
    }

    pub fn run_label(&self) -> std::result::Result<RunLabel, ConfigError> {
        RunLabel::new(
            self.power.name(),
            self.assignment.name(),
            self.network.user_nodes().len(),
        )
    }
}

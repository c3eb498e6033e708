//! 网络拓扑管理
//!
//! Network 拥有全部节点、链路和请求（arena）。队列里只保存请求 id，
//! 每个请求通过 `RequestLocation` 记录它当前唯一的所在容器。
//!
//! 每个 tick 的推进顺序固定：先处理 QoS 超时，再推进所有链路，最后推进所有节点。

use std::collections::{BTreeMap, BTreeSet, HashMap};

use tracing::{debug, info, trace, warn};

use super::id::{LinkId, NodeId, RequestId};
use super::link::{CommunicationLink, LinkConfig};
use super::node::{EnergyUse, Node, NodeClass, ProcessingPlan};
use super::radio;
use super::request::{FailureReason, Request, RequestLocation, RequestSpec, RequestStatus};
use super::routing::Adjacency;
use super::stats::Stats;
use crate::error::{ConfigError, Result, SimError};
use crate::queue::{QueueDiscipline, QueuedRequest};
use crate::sim::Tick;

/// 一次请求状态变化（供统计使用）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusTransition {
    pub request: RequestId,
    /// None 表示请求刚被创建
    pub from: Option<RequestStatus>,
    pub to: RequestStatus,
}

/// 网络拓扑
#[derive(Debug, Clone, Default)]
pub struct Network {
    nodes: Vec<Node>,
    links: Vec<CommunicationLink>,
    edges: HashMap<(NodeId, NodeId), LinkId>,
    adjacency: Adjacency,
    requests: Vec<Request>,
    /// 尚未终止的请求
    live: BTreeSet<RequestId>,
    /// 已创建、尚未分配路径的请求
    unrouted: Vec<RequestId>,
    compute_nodes: Vec<NodeId>,
    user_nodes: Vec<NodeId>,
    haps_nodes: Vec<NodeId>,
    base_stations: Vec<NodeId>,
    leo_nodes: Vec<NodeId>,
    /// 关机节点能否被路由唤醒（由电源策略决定）
    wake_on_demand: bool,
    track_transitions: bool,
    transitions: Vec<StatusTransition>,
    pub stats: Stats,
}

impl Network {
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加节点；未命名的节点按 "<类别> <序号>" 命名
    pub fn add_node(&mut self, mut node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        let class = node.class();
        let view = match class {
            NodeClass::UserDevice => &mut self.user_nodes,
            NodeClass::BaseStation => &mut self.base_stations,
            NodeClass::Haps => &mut self.haps_nodes,
            NodeClass::Leo => &mut self.leo_nodes,
        };
        node.set_name_if_empty(format!("{} {}", class, view.len()));
        view.push(id);
        if class.is_compute() {
            self.compute_nodes.push(id);
        }
        node.set_id(id);
        debug!(id = id.0, name = %node.name(), position = %node.position(), "➕ 添加节点");
        self.nodes.push(node);
        self.adjacency.ensure_node(id);
        id
    }

    /// 连接两个节点（创建 from → to 的单向链路）。两端必须有同频段天线。
    pub fn connect(
        &mut self,
        from: NodeId,
        to: NodeId,
        config: LinkConfig,
    ) -> std::result::Result<LinkId, ConfigError> {
        let a = self.nodes.get(from.0).ok_or(ConfigError::UnknownNode(from))?;
        let b = self.nodes.get(to.0).ok_or(ConfigError::UnknownNode(to))?;
        if let Some(&existing) = self.edges.get(&(from, to)) {
            warn!(from = from.0, to = to.0, "链路已存在，忽略重复连接");
            return Ok(existing);
        }
        let antennas = radio::find_compatible(a.antennas(), b.antennas())
            .ok_or(ConfigError::NoCompatibleAntenna { a: from, b: to })?;
        let id = LinkId(self.links.len());
        self.links
            .push(CommunicationLink::new(id, from, to, config, antennas));
        self.edges.insert((from, to), id);
        self.adjacency.add_edge(from, to);
        trace!(link = id.0, from = from.0, to = to.0, "🔗 添加链路");
        Ok(id)
    }

    /// 双向连接，两个方向各自使用自己的配置
    pub fn connect_both(
        &mut self,
        a: NodeId,
        b: NodeId,
        a_to_b: LinkConfig,
        b_to_a: LinkConfig,
    ) -> std::result::Result<(LinkId, LinkId), ConfigError> {
        Ok((self.connect(a, b, a_to_b)?, self.connect(b, a, b_to_a)?))
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)
    }

    pub fn links(&self) -> &[CommunicationLink] {
        &self.links
    }

    pub fn link(&self, id: LinkId) -> Option<&CommunicationLink> {
        self.links.get(id.0)
    }

    pub fn link_between(&self, from: NodeId, to: NodeId) -> Option<&CommunicationLink> {
        self.edges.get(&(from, to)).map(|l| &self.links[l.0])
    }

    pub fn compute_nodes(&self) -> &[NodeId] {
        &self.compute_nodes
    }

    pub fn user_nodes(&self) -> &[NodeId] {
        &self.user_nodes
    }

    pub fn haps_nodes(&self) -> &[NodeId] {
        &self.haps_nodes
    }

    pub fn base_stations(&self) -> &[NodeId] {
        &self.base_stations
    }

    pub fn leo_nodes(&self) -> &[NodeId] {
        &self.leo_nodes
    }

    pub fn requests(&self) -> &[Request] {
        &self.requests
    }

    pub fn request(&self, id: RequestId) -> Option<&Request> {
        self.requests.get(id.0)
    }

    /// 尚未终止的请求数
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    pub fn all_terminal(&self) -> bool {
        self.live.is_empty()
    }

    pub fn wakes_on_demand(&self) -> bool {
        self.wake_on_demand
    }

    pub(crate) fn set_wake_on_demand(&mut self, wake: bool) {
        self.wake_on_demand = wake;
    }

    /// 所有计算节点改用 `discipline` 出队（只能在请求进入网络之前调用）
    pub(crate) fn set_queue_discipline(&mut self, discipline: QueueDiscipline) {
        for &id in &self.compute_nodes {
            self.nodes[id.0].set_queue_discipline(discipline);
        }
    }

    pub(crate) fn set_transition_tracking(&mut self, enabled: bool) {
        self.track_transitions = enabled;
        if !enabled {
            self.transitions.clear();
        }
    }

    pub(crate) fn drain_transitions(&mut self) -> Vec<StatusTransition> {
        std::mem::take(&mut self.transitions)
    }

    fn log_transition(&mut self, request: RequestId, from: Option<RequestStatus>, to: RequestStatus) {
        if self.track_transitions {
            self.transitions.push(StatusTransition { request, from, to });
        }
    }

    /// 同一发送端类别、同一接收端上忙碌的链路数
    fn sharing_counts(&self) -> HashMap<(NodeClass, NodeId), usize> {
        let mut counts = HashMap::new();
        for link in self.links.iter().filter(|l| l.is_busy()) {
            let key = (self.nodes[link.node_a().0].class(), link.node_b());
            *counts.entry(key).or_insert(0) += 1;
        }
        counts
    }

    /// 规划用的共享数：假设该链路也会忙碌
    fn planned_sharing(&self, link: &CommunicationLink) -> usize {
        let class = self.nodes[link.node_a().0].class();
        let busy_peers = self
            .links
            .iter()
            .filter(|l| {
                l.id() != link.id()
                    && l.is_busy()
                    && l.node_b() == link.node_b()
                    && self.nodes[l.node_a().0].class() == class
            })
            .count();
        busy_peers + 1
    }

    /// 规划用的链路容量（不考虑电源状态）
    pub fn nominal_capacity(&self, link: &CommunicationLink) -> f64 {
        link.nominal_capacity(
            &self.nodes[link.node_a().0],
            &self.nodes[link.node_b().0],
            self.planned_sharing(link),
        )
    }

    /// 节点能否出现在来自 `origin` 的路径上（作为中继或终点）
    fn is_usable(&self, id: NodeId, origin: NodeId) -> bool {
        let node = &self.nodes[id.0];
        if !node.class().is_compute() || node.is_depleted() {
            return false;
        }
        if !node.is_powered() && !self.wake_on_demand {
            return false;
        }
        node.is_visible_from(&self.nodes[origin.0].position())
    }

    fn hop_usable(&self, from: NodeId, to: NodeId) -> bool {
        self.edges
            .get(&(from, to))
            .is_some_and(|l| self.nominal_capacity(&self.links[l.0]) > 0.0)
    }

    /// 从用户设备到某个 `class` 类可行计算节点的最短路径；找不到返回 None。
    ///
    /// 终点需要对 `request` 满足 `can_process`。
    pub fn generate_request_path(
        &self,
        source: NodeId,
        class: NodeClass,
        request: &Request,
    ) -> Option<Vec<NodeId>> {
        self.nodes.get(source.0)?;
        self.adjacency.shortest_path(
            source,
            |v| self.nodes[v.0].class() == class && self.can_process(v, request),
            |v| self.is_usable(v, source),
            |u, v| self.hop_usable(u, v),
        )
    }

    /// 从 `source` 到指定计算节点 `target` 的最短路径
    pub fn generate_request_path_to(&self, source: NodeId, target: NodeId) -> Option<Vec<NodeId>> {
        self.nodes.get(source.0)?;
        let target_node = self.nodes.get(target.0)?;
        if !target_node.has_processor() || !self.is_usable(target, source) {
            return None;
        }
        self.adjacency.shortest_path(
            source,
            |v| v == target,
            |v| self.is_usable(v, source),
            |u, v| self.hop_usable(u, v),
        )
    }

    /// 沿路径逐跳传输整个请求的总时间（秒），使用规划容量
    pub fn get_network_delay(&self, path: &[NodeId], request: &Request) -> Result<f64> {
        self.hop_delays(path, request)
            .map(|hops| hops.iter().map(|(_, d)| d).sum())
    }

    /// 每一跳的 (发送端, 传输时间)
    pub fn hop_delays(&self, path: &[NodeId], request: &Request) -> Result<Vec<(NodeId, f64)>> {
        path.windows(2)
            .map(|hop| {
                let (from, to) = (hop[0], hop[1]);
                let link = self
                    .link_between(from, to)
                    .ok_or(SimError::MissingLink { from, to })?;
                let delay =
                    link.calculate_transmission_delay(request, self.nominal_capacity(link))?;
                Ok((from, delay))
            })
            .collect()
    }

    /// 已排队以及正在路上的、以该节点为终点的剩余计算量（周期）
    pub fn backlog_cycles(&self, id: NodeId) -> f64 {
        let Some(node) = self.nodes.get(id.0) else {
            return 0.0;
        };
        let cpb = node.profile().cycles_per_bit;
        self.live
            .iter()
            .map(|r| &self.requests[r.0])
            .filter(|r| r.target() == Some(id))
            .map(|r| (1.0 - r.processing_progress()) * r.required_cycles(cpb))
            .sum()
    }

    /// 节点当前能否接收该请求
    pub fn can_process(&self, id: NodeId, request: &Request) -> bool {
        let Some(node) = self.nodes.get(id.0) else {
            return false;
        };
        let Some(origin) = self.nodes.get(request.origin().0) else {
            return false;
        };
        node.can_process(
            request,
            &origin.position(),
            self.backlog_cycles(id),
            !self.wake_on_demand,
        )
    }

    /// 对该请求满足 `can_process` 的计算节点（按 id 升序）
    pub fn candidates(&self, request: &Request) -> Vec<NodeId> {
        self.compute_nodes
            .iter()
            .copied()
            .filter(|&id| self.can_process(id, request))
            .collect()
    }

    /// 在用户设备上创建一个请求，等待分配
    pub fn create_request(
        &mut self,
        user: NodeId,
        spec: RequestSpec,
        now: Tick,
    ) -> std::result::Result<RequestId, ConfigError> {
        spec.validate()?;
        let node = self
            .nodes
            .get_mut(user.0)
            .ok_or(ConfigError::UnknownNode(user))?;
        let device = node
            .as_user_device_mut()
            .ok_or(ConfigError::NotAUserDevice(user))?;
        let id = RequestId(self.requests.len());
        device.add_request(id);
        self.requests.push(Request::new(id, user, spec, now));
        self.live.insert(id);
        self.unrouted.push(id);
        self.stats.created += 1;
        self.log_transition(id, None, RequestStatus::Created);
        trace!(request = id.0, user = user.0, size_bits = spec.size_bits, priority = ?spec.priority, "📝 创建请求");
        Ok(id)
    }

    /// 取出所有等待分配的请求
    pub(crate) fn take_unrouted(&mut self) -> Vec<RequestId> {
        std::mem::take(&mut self.unrouted)
    }

    /// 按分配结果把请求送上第一条链路；`path` 为 None 时请求立即失败。
    ///
    /// 返回请求是否成功进入网络。
    #[tracing::instrument(skip(self, id, path, now), fields(request = id.0, now = now.0))]
    pub fn dispatch(&mut self, id: RequestId, path: Option<Vec<NodeId>>, now: Tick) -> Result<bool> {
        let req = self.requests.get(id.0).ok_or(SimError::UnknownRequest(id))?;
        let origin = req.origin();
        let priority = req.priority();
        if req.status() != RequestStatus::Created {
            return Err(SimError::Ownership {
                id,
                detail: format!("dispatch of a request in state {}", req.status()),
            });
        }
        self.unrouted.retain(|r| *r != id);

        let Some(path) = path else {
            self.fail_request(id, FailureReason::NoFeasibleNode, now)?;
            return Ok(false);
        };
        if path.len() < 2 || path[0] != origin {
            return Err(SimError::Ownership {
                id,
                detail: format!("path {path:?} does not start at origin {origin:?}"),
            });
        }
        let first = *self.edges.get(&(path[0], path[1])).ok_or(SimError::MissingLink {
            from: path[0],
            to: path[1],
        })?;
        let target = path[path.len() - 1];
        self.requests[id.0].assign_path(path)?;
        if let Some(device) = self.nodes[origin.0].as_user_device_mut() {
            device.assign_target_node(id, target);
        }

        if self.links[first.0]
            .enqueue(QueuedRequest { id, priority })
            .is_err()
        {
            self.fail_request(id, FailureReason::LinkRejected, now)?;
            return Ok(false);
        }
        self.requests[id.0].set_location(RequestLocation::Link(first));
        self.transition(id, RequestStatus::InTransit, now)?;
        debug!(target = target.0, link = first.0, "🚀 请求进入网络");
        Ok(true)
    }

    fn transition(&mut self, id: RequestId, to: RequestStatus, now: Tick) -> Result<()> {
        let req = self
            .requests
            .get_mut(id.0)
            .ok_or(SimError::UnknownRequest(id))?;
        let from = req.status();
        req.update_status(to, now)?;
        self.log_transition(id, Some(from), to);
        if to.is_terminal() {
            self.retire(id);
        }
        Ok(())
    }

    fn retire(&mut self, id: RequestId) {
        self.live.remove(&id);
        let origin = self.requests[id.0].origin();
        if let Some(device) = self.nodes[origin.0].as_user_device_mut() {
            device.remove_request(id);
        }
    }

    /// 把请求从所在容器中移出并标记 FAILED
    pub fn fail_request(&mut self, id: RequestId, reason: FailureReason, now: Tick) -> Result<()> {
        let req = self.requests.get(id.0).ok_or(SimError::UnknownRequest(id))?;
        let from = req.status();
        match req.location() {
            RequestLocation::Origin(_) => self.unrouted.retain(|r| *r != id),
            RequestLocation::Link(l) => {
                self.links[l.0].remove(id);
            }
            RequestLocation::Node(n) => {
                self.nodes[n.0].remove_queued(id);
            }
            RequestLocation::Retired => {
                return Err(SimError::TerminalRequest { id, status: from });
            }
        }
        self.requests[id.0].fail(reason, now)?;
        self.log_transition(id, Some(from), RequestStatus::Failed);
        self.retire(id);
        self.stats.record_failure(reason);
        info!(request = id.0, %reason, was = %from, at = now.0, "❌ 请求失败");
        Ok(())
    }

    /// 推进一个 tick：QoS 超时 → 链路 → 节点
    #[tracing::instrument(skip(self, now), fields(now = now.0))]
    pub fn tick(&mut self, now: Tick, time_step: f64) -> Result<()> {
        self.expire_overdue(now, time_step)?;
        self.tick_links(now, time_step)?;
        self.tick_nodes(now, time_step)?;
        for node in &mut self.nodes {
            node.advance_motion(time_step);
        }
        Ok(())
    }

    fn expire_overdue(&mut self, now: Tick, time_step: f64) -> Result<()> {
        let overdue: Vec<RequestId> = self
            .live
            .iter()
            .copied()
            .filter(|id| self.requests[id.0].qos_expired(now, time_step))
            .collect();
        for id in overdue {
            self.fail_request(id, FailureReason::QosExpired, now)?;
        }
        Ok(())
    }

    fn tick_links(&mut self, now: Tick, time_step: f64) -> Result<()> {
        let counts = self.sharing_counts();
        let mut handoffs = Vec::new();

        for li in 0..self.links.len() {
            let link = &self.links[li];
            if !link.is_busy() {
                self.links[li].abort();
                continue;
            }
            let (a, b) = (link.node_a(), link.node_b());
            let sharing = counts
                .get(&(self.nodes[a.0].class(), b))
                .copied()
                .unwrap_or(1);
            let capacity = link.calculate_capacity(&self.nodes[a.0], &self.nodes[b.0], sharing);
            let plan = link.tick(capacity, time_step, &self.requests);
            if plan.is_idle() {
                self.links[li].abort();
                continue;
            }

            let joules = self.nodes[a.0].transmission_power_watts() * plan.busy_secs;
            if !self.nodes[a.0].draw_energy(joules, EnergyUse::Transmission) {
                self.links[li].abort();
                continue;
            }
            trace!(
                link = li,
                capacity,
                sharing,
                bits = plan.bits_sent,
                delivered = plan.delivered.len(),
                "📡 链路传输"
            );
            self.links[li].commit(&plan, &mut self.requests);
            self.stats.bits_transmitted += plan.bits_sent;
            handoffs.extend(plan.delivered.iter().map(|&(id, at)| (id, LinkId(li), at)));
        }

        for (id, link, at) in handoffs {
            self.hand_off(id, link, at, now)?;
        }
        self.settle_power(now)
    }

    /// 请求传完一跳：到达终点则进入处理队列，否则排到下一条链路
    fn hand_off(&mut self, id: RequestId, link: LinkId, offset: f64, now: Tick) -> Result<()> {
        let req = &mut self.requests[id.0];
        if req.location() != RequestLocation::Link(link) {
            return Err(SimError::Ownership {
                id,
                detail: format!("delivered by {link:?} but located at {:?}", req.location()),
            });
        }
        req.advance_hop();
        self.stats.hops_delivered += 1;
        let here = req.path()[req.hop()];
        let entry = QueuedRequest {
            id,
            priority: req.priority(),
        };

        let Some(next) = req.next_node() else {
            let node = &mut self.nodes[here.0];
            if node.is_depleted() {
                return self.fail_request(id, FailureReason::BatteryDepleted, now);
            }
            if !node.is_powered() {
                return self.fail_request(id, FailureReason::PowerLost, now);
            }
            if node.enqueue(entry).is_err() {
                return self.fail_request(id, FailureReason::QueueFull, now);
            }
            let req = &mut self.requests[id.0];
            req.set_location(RequestLocation::Node(here));
            req.set_available_at(offset);
            trace!(request = id.0, node = here.0, offset, "📥 进入处理队列");
            return self.transition(id, RequestStatus::InProcessingQueue, now);
        };

        let next_link = *self
            .edges
            .get(&(here, next))
            .ok_or(SimError::MissingLink { from: here, to: next })?;
        if self.links[next_link.0].enqueue(entry).is_err() {
            return self.fail_request(id, FailureReason::LinkRejected, now);
        }
        self.requests[id.0].set_location(RequestLocation::Link(next_link));
        Ok(())
    }

    fn tick_nodes(&mut self, now: Tick, time_step: f64) -> Result<()> {
        for ni in 0..self.nodes.len() {
            let node = &self.nodes[ni];
            if !node.class().is_compute() || !node.is_powered() {
                continue;
            }
            let plan = node.tick(time_step, &self.requests);
            let (idle, processing) = node.planned_energy(&plan, time_step);
            let node = &mut self.nodes[ni];
            if !node.draw_energy(idle, EnergyUse::Idle)
                || !node.draw_energy(processing, EnergyUse::Processing)
            {
                continue;
            }
            self.commit_processing(NodeId(ni), &plan, now)?;
        }
        self.settle_power(now)
    }

    fn commit_processing(&mut self, node: NodeId, plan: &ProcessingPlan, now: Tick) -> Result<()> {
        for &id in &plan.started {
            if self.requests[id.0].location() != RequestLocation::Node(node) {
                return Err(SimError::Ownership {
                    id,
                    detail: format!("processed by {node:?} but not queued there"),
                });
            }
            self.transition(id, RequestStatus::Processing, now)?;
        }
        for &(id, progress) in &plan.progressed {
            self.requests[id.0].set_processing_progress(progress);
        }
        for &id in &plan.completed {
            self.nodes[node.0].remove_queued(id);
            self.transition(id, RequestStatus::Completed, now)?;
            self.stats.completed += 1;
            debug!(request = id.0, node = node.0, at = now.0, "✅ 请求处理完成");
        }
        self.stats.cycles_executed += plan.cycles;
        for id in self.nodes[node.0].queued() {
            self.requests[id.0].set_available_at(0.0);
        }
        Ok(())
    }

    /// 处理电源变化的后果：耗尽节点途经的请求失败，关机节点上排队的请求失败
    pub(crate) fn settle_power(&mut self, now: Tick) -> Result<()> {
        let mut doomed = Vec::new();
        for &nid in &self.compute_nodes {
            let node = &self.nodes[nid.0];
            if node.is_depleted() {
                doomed.extend(
                    self.live
                        .iter()
                        .copied()
                        .filter(|r| self.remaining_route_contains(*r, nid))
                        .map(|r| (r, FailureReason::BatteryDepleted)),
                );
            } else if !node.is_powered() {
                doomed.extend(node.queued().into_iter().map(|r| (r, FailureReason::PowerLost)));
            }
        }
        for (id, reason) in doomed {
            if !self.requests[id.0].is_terminal() {
                self.fail_request(id, reason, now)?;
            }
        }
        Ok(())
    }

    /// 请求当前所在节点及之后的路径是否经过 `node`
    fn remaining_route_contains(&self, id: RequestId, node: NodeId) -> bool {
        let req = &self.requests[id.0];
        req.path()
            .get(req.hop()..)
            .is_some_and(|rest| rest.contains(&node))
    }

    /// 仍需要该节点（排队、在途或需要它中继）的请求数
    pub fn pending_demand(&self, node: NodeId) -> usize {
        self.live
            .iter()
            .filter(|r| self.remaining_route_contains(**r, node))
            .count()
    }

    /// 所有节点的需求快照（下标为 NodeId）
    pub fn demand_snapshot(&self) -> Vec<usize> {
        let mut demand = vec![0; self.nodes.len()];
        for &id in &self.live {
            let req = &self.requests[id.0];
            if let Some(rest) = req.path().get(req.hop()..) {
                for n in rest {
                    demand[n.0] += 1;
                }
            }
        }
        demand
    }

    /// 写入每个节点本 tick 的能耗记录，返回全网本 tick 能耗
    pub(crate) fn record_energy_samples(&mut self) -> f64 {
        self.nodes
            .iter_mut()
            .map(|n| n.record_energy_sample())
            .sum()
    }

    /// 全网累计能耗（J）
    pub fn get_total_energy_consumed(&self) -> f64 {
        self.nodes.iter().map(|n| n.energy_consumed()).sum()
    }

    pub fn energy_by_class(&self, class: NodeClass) -> f64 {
        self.nodes
            .iter()
            .filter(|n| n.class() == class)
            .map(|n| n.energy_consumed())
            .sum()
    }

    /// 各状态的请求数
    pub fn status_counts(&self) -> BTreeMap<RequestStatus, usize> {
        let mut counts = BTreeMap::new();
        for r in &self.requests {
            *counts.entry(r.status()).or_insert(0) += 1;
        }
        counts
    }
}

impl std::fmt::Display for Network {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Network: {} nodes ({} users, {} base stations, {} HAPS, {} LEO), {} links",
            self.nodes.len(),
            self.user_nodes.len(),
            self.base_stations.len(),
            self.haps_nodes.len(),
            self.leo_nodes.len(),
            self.links.len()
        )
    }
}

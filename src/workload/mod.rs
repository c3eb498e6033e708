//! 请求负载生成
//!
//! 每个用户发出 `requests_per_user` 个请求，到达 tick 由 Poisson 过程给出：
//! 每个 tick 的到达数服从 Poisson(总请求数 / 到达窗口)，反复抽样直到总数恰好相等。
//! 窗口末尾留出 `time_buffer_ticks` 个没有新请求的 tick，让最后的请求有时间完成。

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Poisson};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::ConfigError;
use crate::net::{NodeId, Priority, RequestSpec};
use crate::sim::Tick;

const MAX_DRAWS: usize = 1000;

fn default_requests_per_user() -> usize {
    1
}

fn default_arrival_window() -> u64 {
    100
}

/// 负载参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkloadOpts {
    #[serde(default = "default_requests_per_user")]
    pub requests_per_user: usize,
    /// 到达窗口长度（tick），包含末尾缓冲
    #[serde(default = "default_arrival_window")]
    pub arrival_window_ticks: u64,
    #[serde(default)]
    pub time_buffer_ticks: u64,
    /// 固定优先级；None 时每个请求均匀随机
    #[serde(default)]
    pub priority: Option<Priority>,
}

impl Default for WorkloadOpts {
    fn default() -> Self {
        Self {
            requests_per_user: default_requests_per_user(),
            arrival_window_ticks: default_arrival_window(),
            time_buffer_ticks: 0,
            priority: None,
        }
    }
}

impl WorkloadOpts {
    /// 可以产生到达的 tick 数
    pub fn active_ticks(&self) -> u64 {
        self.arrival_window_ticks.saturating_sub(self.time_buffer_ticks)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.active_ticks() == 0 && self.requests_per_user > 0 {
            return Err(ConfigError::InvalidWorkload(format!(
                "arrival window of {} ticks leaves no room after a buffer of {} ticks",
                self.arrival_window_ticks, self.time_buffer_ticks
            )));
        }
        Ok(())
    }
}

/// 计划在某个 tick 由某个用户创建的请求
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScheduledRequest {
    pub user: NodeId,
    pub at: Tick,
    pub spec: RequestSpec,
}

/// 按优先级类别随机生成请求参数：大小在该类别范围内取整 Mbit
pub fn random_spec(rng: &mut impl Rng, priority: Option<Priority>) -> RequestSpec {
    let priority =
        priority.unwrap_or_else(|| Priority::ALL[rng.random_range(0..Priority::ALL.len())]);
    let (lo, hi) = priority.size_range_mbit();
    let mbit = rng.random_range(lo..=hi);
    RequestSpec::for_priority(priority, f64::from(mbit) * 1e6)
}

/// 每个 tick 的到达数，总和恰好为 `total`
fn arrivals_per_tick(rng: &mut StdRng, total: usize, ticks: u64) -> Result<Vec<usize>, ConfigError> {
    let ticks = ticks as usize;
    let mut counts = vec![0usize; ticks];
    if total == 0 || ticks == 0 {
        return Ok(counts);
    }
    let poisson = Poisson::new(total as f64 / ticks as f64)
        .map_err(|e| ConfigError::InvalidWorkload(e.to_string()))?;

    for attempt in 1..=MAX_DRAWS {
        for c in counts.iter_mut() {
            *c = poisson.sample(rng) as usize;
        }
        let sum: usize = counts.iter().sum();
        if sum == total {
            debug!(attempt, "到达序列抽样成功");
            return Ok(counts);
        }
        if attempt == MAX_DRAWS {
            warn!(sum, total, "到达序列抽样未命中，按总数修正");
        }
    }

    // 多退少补：从后往前削减，或补到随机 tick 上
    let mut sum: usize = counts.iter().sum();
    for c in counts.iter_mut().rev() {
        if sum <= total {
            break;
        }
        let cut = (*c).min(sum - total);
        *c -= cut;
        sum -= cut;
    }
    while sum < total {
        counts[rng.random_range(0..ticks)] += 1;
        sum += 1;
    }
    Ok(counts)
}

/// 为 `users` 生成按到达时间排序的请求计划
pub fn generate(
    users: &[NodeId],
    opts: &WorkloadOpts,
    seed: u64,
) -> Result<Vec<ScheduledRequest>, ConfigError> {
    opts.validate()?;
    let mut rng = StdRng::seed_from_u64(seed);
    let total = users.len() * opts.requests_per_user;
    let counts = arrivals_per_tick(&mut rng, total, opts.active_ticks())?;

    // 第 i 个到达属于第 i / requests_per_user 个用户
    let mut schedule = Vec::with_capacity(total);
    for (tick, &count) in counts.iter().enumerate() {
        for _ in 0..count {
            let user = users[schedule.len() / opts.requests_per_user];
            schedule.push(ScheduledRequest {
                user,
                at: Tick(tick as u64),
                spec: random_spec(&mut rng, opts.priority),
            });
        }
    }
    Ok(schedule)
}

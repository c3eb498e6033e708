use clap::Parser;
use ntn_offload_sim::sim::{AssignmentKind, PowerKind, SimConfig, Simulation};
use serde_json::json;
use std::error::Error;
use std::thread;
use tracing::info;

#[derive(Debug, Parser)]
#[command(
    name = "offload-sweep",
    about = "Run every (power strategy, assignment strategy, user count) combination in parallel"
)]
struct Args {
    /// Comma-separated power strategies
    #[arg(long, default_value = "AllOn,OnDemand,OnDemandWithTimeout(1)")]
    power_strategies: String,

    /// Comma-separated assignment strategies
    #[arg(long, default_value = "TimeGreedy,EnergyGreedy,ClosestNode,HAPSOnly,Random(42)")]
    assignment_strategies: String,

    /// Comma-separated user counts
    #[arg(long, default_value = "5,10,20")]
    user_counts: String,

    #[arg(long, default_value_t = 42)]
    seed: u64,

    #[arg(long, default_value_t = 3000)]
    max_ticks: u64,

    /// Maximum number of simulations running at once
    #[arg(long, default_value_t = 4)]
    jobs: usize,
}

/// 逗号分隔列表，按括号深度切分，保证 "Random(1)" 之类的参数不被拆开
fn split_list(s: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in s.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                out.push(s[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    out.push(s[start..].trim());
    out.retain(|p| !p.is_empty());
    out
}

fn run_one(cfg: &SimConfig) -> Result<serde_json::Value, String> {
    let mut sim = Simulation::new(cfg).map_err(|e| e.to_string())?;
    let qos = sim.run().map_err(|e| e.to_string())?;
    let label = sim.run_label().map_err(|e| e.to_string())?;
    Ok(json!({
        "file_name": label.file_name(),
        "power_strategy": label.power_strategy(),
        "assignment_strategy": label.assignment_strategy(),
        "user_count": label.user_count(),
        "ticks": sim.current_time().0,
        "qos_satisfaction": qos,
        "total_energy": sim.system_energy_consumed(),
    }))
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let mut configs = Vec::new();
    for p in split_list(&args.power_strategies) {
        let power: PowerKind = p.parse()?;
        for a in split_list(&args.assignment_strategies) {
            let assignment: AssignmentKind = a.parse()?;
            for u in split_list(&args.user_counts) {
                let mut cfg = SimConfig::new(power, assignment, u.parse()?);
                cfg.seed = args.seed;
                cfg.run.max_ticks = Some(args.max_ticks);
                cfg.validate()?;
                configs.push(cfg);
            }
        }
    }
    info!(runs = configs.len(), jobs = args.jobs, "🧮 开始参数扫描");

    let jobs = args.jobs.max(1);
    let mut results = Vec::with_capacity(configs.len());
    for batch in configs.chunks(jobs) {
        let batch_results: Vec<Result<serde_json::Value, String>> = thread::scope(|s| {
            let handles: Vec<_> = batch.iter().map(|cfg| s.spawn(move || run_one(cfg))).collect();
            handles
                .into_iter()
                .map(|h| h.join().unwrap_or_else(|_| Err("simulation thread panicked".to_string())))
                .collect()
        });
        results.extend(batch_results);
    }

    for r in results {
        println!("{}", serde_json::to_string(&r?)?);
    }
    Ok(())
}

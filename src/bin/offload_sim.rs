use clap::Parser;
use ntn_offload_sim::net::NodeClass;
use ntn_offload_sim::sim::{AssignmentKind, PowerKind, SimConfig, Simulation};
use serde_json::json;
use std::error::Error;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "offload-sim",
    about = "Run one NTN computation-offloading simulation"
)]
struct Args {
    /// Path to a SimConfig JSON file; command-line strategy flags are ignored when set
    #[arg(long)]
    config: Option<PathBuf>,

    /// AllOn, OnDemand or OnDemandWithTimeout(<seconds>)
    #[arg(long, default_value = "AllOn")]
    power_strategy: String,

    /// TimeGreedy, EnergyGreedy, ClosestNode, Random(<seed>) or HAPSOnly
    #[arg(long, default_value = "TimeGreedy")]
    assignment_strategy: String,

    #[arg(long, default_value_t = 10)]
    user_count: usize,

    /// Seconds per tick
    #[arg(long, default_value_t = 0.1)]
    time_step: f64,

    /// Stop after this many ticks (also stops once every request has finished)
    #[arg(long)]
    max_ticks: Option<u64>,

    /// Seed for user placement and request generation
    #[arg(long, default_value_t = 42)]
    seed: u64,

    #[arg(long, default_value_t = 1)]
    requests_per_user: usize,

    /// Maintain per-status request counts while running
    #[arg(long)]
    stats: bool,

    /// Print the run summary as JSON instead of text
    #[arg(long)]
    json: bool,

    /// Write per-request records and the summary to this JSON file
    #[arg(long)]
    report_json: Option<PathBuf>,
}

fn build_config(args: &Args) -> Result<SimConfig, Box<dyn Error>> {
    if let Some(path) = &args.config {
        return Ok(SimConfig::from_json_file(path)?);
    }
    let power: PowerKind = args.power_strategy.parse()?;
    let assignment: AssignmentKind = args.assignment_strategy.parse()?;
    let mut cfg = SimConfig::new(power, assignment, args.user_count);
    cfg.run.time_step = args.time_step;
    if args.max_ticks.is_some() {
        cfg.run.max_ticks = args.max_ticks;
    }
    cfg.run.stats_tracking = args.stats;
    cfg.seed = args.seed;
    cfg.workload.requests_per_user = args.requests_per_user;
    cfg.validate()?;
    Ok(cfg)
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
    let cfg = build_config(&args)?;
    let mut sim = Simulation::new(&cfg)?;
    let qos = sim.run()?;

    let net = sim.network();
    let label = sim.run_label()?;
    let summary = json!({
        "label": label,
        "file_name": label.file_name(),
        "ticks": sim.current_time().0,
        "qos_satisfaction": qos,
        "total_energy": net.get_total_energy_consumed(),
        "energy_by_class": {
            "base_station": net.energy_by_class(NodeClass::BaseStation),
            "haps": net.energy_by_class(NodeClass::Haps),
            "leo": net.energy_by_class(NodeClass::Leo),
            "user_device": net.energy_by_class(NodeClass::UserDevice),
        },
        "requests": net.requests().len(),
        "status_counts": net.status_counts(),
        "failures": net.stats.failed,
    });

    if args.json {
        println!("{}", serde_json::to_string(&summary)?);
    } else {
        println!("{net}");
        println!("run {label}");
        println!("ticks {}", sim.current_time().0);
        println!("qos_satisfaction {qos:.4}");
        println!("total_energy_j {:.3}", net.get_total_energy_consumed());
        for (status, count) in net.status_counts() {
            println!("status {status} {count}");
        }
    }

    if let Some(path) = &args.report_json {
        let report = json!({
            "summary": summary,
            "records": sim.request_records(),
        });
        fs::write(path, serde_json::to_string_pretty(&report)?)?;
        eprintln!("wrote report to {}", path.display());
    }
    Ok(())
}

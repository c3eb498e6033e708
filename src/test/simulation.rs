use super::fixtures::{HIGH_2MBIT, approx, single_haps};
use crate::assign::{Assignment, AssignmentStrategy, HapsOnly};
use crate::error::{ConfigError, SimError};
use crate::net::{Network, NodeId, Priority, Request, RequestSpec, RequestStatus};
use crate::power::{AllOn, OnDemand};
use crate::sim::{AssignmentKind, PowerKind, RunSettings, RunState, SimConfig, Simulation, Tick};
use crate::workload::ScheduledRequest;

fn small_config(power: PowerKind, assignment: AssignmentKind) -> SimConfig {
    let mut cfg = SimConfig::new(power, assignment, 6);
    cfg.workload.requests_per_user = 2;
    cfg.workload.arrival_window_ticks = 30;
    cfg
}

fn haps_sim(settings: RunSettings) -> (Simulation, NodeId, NodeId) {
    let (net, user, haps) = single_haps(Some(20e3));
    let sim = Simulation::from_parts(settings, net, Box::new(HapsOnly), Box::new(AllOn))
        .expect("simulation");
    (sim, user, haps)
}

#[test]
fn run_state_moves_through_pause_and_completion() {
    let (mut sim, user, _) = haps_sim(RunSettings::default());
    sim.schedule_request(ScheduledRequest {
        user,
        at: Tick::ZERO,
        spec: HIGH_2MBIT,
    })
    .expect("schedule");
    assert_eq!(sim.state(), RunState::NotStarted);
    sim.pause();
    assert_eq!(sim.state(), RunState::NotStarted);

    assert!(sim.step().expect("step"));
    assert_eq!(sim.state(), RunState::Running);
    sim.pause();
    assert_eq!(sim.state(), RunState::Paused);

    assert!(!sim.step().expect("step"));
    assert_eq!(sim.state(), RunState::Completed);
    assert_eq!(sim.current_time(), Tick(2));

    assert!(!sim.step().expect("step after completion"));
    assert_eq!(sim.current_time(), Tick(2));
}

#[test]
fn max_ticks_bounds_the_run() {
    let settings = RunSettings {
        max_ticks: Some(5),
        stop_when_idle: false,
        ..RunSettings::default()
    };
    let (mut sim, _, _) = haps_sim(settings);
    let qos = sim.run().expect("run");
    assert_eq!(qos, 1.0);
    assert_eq!(sim.current_time(), Tick(5));
    assert_eq!(sim.system_energy_history().len(), 5);
}

#[test]
fn invalid_settings_are_rejected_before_running() {
    let (net, _, _) = single_haps(None);
    let settings = RunSettings {
        time_step: -0.1,
        ..RunSettings::default()
    };
    let err = Simulation::from_parts(settings, net, Box::new(HapsOnly), Box::new(AllOn))
        .expect_err("negative time step");
    assert!(matches!(err, ConfigError::NonPositiveTimeStep(_)));

    let mut cfg = small_config(PowerKind::AllOn, AssignmentKind::TimeGreedy);
    cfg.user_count = 0;
    assert!(Simulation::new(&cfg).is_err());
}

#[test]
fn requests_must_come_from_user_devices() {
    let (mut sim, _, haps) = haps_sim(RunSettings::default());
    let err = sim
        .schedule_request(ScheduledRequest {
            user: haps,
            at: Tick::ZERO,
            spec: HIGH_2MBIT,
        })
        .expect_err("haps is not a user");
    assert!(matches!(err, ConfigError::NotAUserDevice(_)));
    assert!(matches!(
        sim.schedule_request(ScheduledRequest {
            user: NodeId(77),
            at: Tick::ZERO,
            spec: HIGH_2MBIT,
        }),
        Err(ConfigError::UnknownNode(_))
    ));
}

#[test]
fn zero_size_request_is_rejected_when_scheduled() {
    let (mut sim, user, _) = haps_sim(RunSettings::default());
    let err = sim
        .schedule_request(ScheduledRequest {
            user,
            at: Tick::ZERO,
            spec: RequestSpec::new(0.0, Priority::High, 1.0),
        })
        .expect_err("zero-size request");
    assert!(matches!(err, ConfigError::InvalidRequest(_)));
    assert!(sim.scheduled_requests().is_empty());

    assert_eq!(sim.run().expect("run"), 1.0);
    assert!(sim.network().requests().is_empty());
}

#[test]
fn new_builds_standard_topology_and_workload() {
    let cfg = small_config(PowerKind::OnDemand, AssignmentKind::ClosestNode);
    let sim = Simulation::new(&cfg).expect("simulation");
    assert_eq!(sim.network().user_nodes().len(), 6);
    assert_eq!(sim.scheduled_requests().len(), 12);
    assert_eq!(sim.power_name(), "OnDemand");
    assert_eq!(sim.assignment_name(), "ClosestNode");
    assert!(sim.network().wakes_on_demand());
    assert_eq!(
        sim.run_label().expect("label").file_name(),
        "request_stats_OnDemand_ClosestNode_6.csv"
    );
}

#[test]
fn every_strategy_pair_runs_to_completion() {
    let powers = [
        PowerKind::AllOn,
        PowerKind::OnDemand,
        PowerKind::OnDemandWithTimeout { timeout: 0.5 },
    ];
    let assignments = [
        AssignmentKind::TimeGreedy,
        AssignmentKind::EnergyGreedy,
        AssignmentKind::ClosestNode,
        AssignmentKind::HapsOnly,
        AssignmentKind::Random { seed: 4 },
    ];
    for power in powers {
        for assignment in assignments {
            let cfg = small_config(power, assignment);
            let mut sim = Simulation::new(&cfg).expect("simulation");
            let qos = sim.run().expect("run");
            assert!((0.0..=1.0).contains(&qos), "{power} {assignment}: {qos}");
            assert_eq!(sim.state(), RunState::Completed);
            assert!(sim.network().all_terminal(), "{power} {assignment}");
            assert_eq!(sim.network().requests().len(), 12);
            assert!(sim.system_energy_consumed() > 0.0);
        }
    }
}

#[test]
fn energy_history_sums_to_system_total() {
    let cfg = small_config(PowerKind::OnDemand, AssignmentKind::TimeGreedy);
    let mut sim = Simulation::new(&cfg).expect("simulation");
    sim.run().expect("run");

    let history: f64 = sim.system_energy_history().iter().sum();
    assert!(approx(history, sim.system_energy_consumed(), 1e-6));
    assert!(approx(
        sim.system_energy_consumed(),
        sim.network().get_total_energy_consumed(),
        1e-9
    ));
    assert_eq!(
        sim.system_energy_history().len() as u64,
        sim.current_time().0
    );
}

#[test]
fn tracked_stats_match_request_states() {
    let mut cfg = small_config(PowerKind::AllOn, AssignmentKind::EnergyGreedy);
    cfg.run.stats_tracking = true;
    let mut sim = Simulation::new(&cfg).expect("simulation");
    assert!(sim.is_stats_tracking());
    for _ in 0..3 {
        sim.step().expect("step");
        for status in RequestStatus::ALL {
            assert_eq!(sim.request_state_stats().get(status), sim.count_by_status(status));
        }
    }
    sim.run().expect("run");
    for status in RequestStatus::ALL {
        assert_eq!(
            sim.request_state_stats().get(status),
            sim.count_by_status(status),
            "{status}"
        );
    }
    assert_eq!(sim.request_state_stats().total(), 12);
}

#[test]
fn stats_enabled_mid_run_start_from_current_counts() {
    let cfg = small_config(PowerKind::AllOn, AssignmentKind::TimeGreedy);
    let mut sim = Simulation::new(&cfg).expect("simulation");
    for _ in 0..10 {
        sim.step().expect("step");
    }
    assert_eq!(sim.request_state_stats().total(), 0);

    sim.enable_stats_tracking();
    let created_so_far = sim.network().requests().len();
    assert_eq!(sim.request_state_stats().total(), created_so_far);
    for _ in 0..5 {
        sim.step().expect("step");
    }
    for status in RequestStatus::ALL {
        assert_eq!(sim.request_state_stats().get(status), sim.count_by_status(status));
    }

    sim.disable_stats_tracking();
    let frozen = sim.request_state_stats().clone();
    sim.run().expect("run");
    assert_eq!(sim.request_state_stats(), &frozen);
}

#[test]
fn same_config_gives_identical_runs() {
    let cfg = small_config(
        PowerKind::OnDemandWithTimeout { timeout: 0.3 },
        AssignmentKind::Random { seed: 9 },
    );
    let mut a = Simulation::new(&cfg).expect("a");
    let mut b = Simulation::new(&cfg).expect("b");
    assert_eq!(a.run().expect("a"), b.run().expect("b"));
    assert_eq!(a.request_records(), b.request_records());
    assert_eq!(a.system_energy_history(), b.system_energy_history());
}

#[test]
fn reset_restores_a_fresh_run() {
    let cfg = small_config(PowerKind::OnDemand, AssignmentKind::Random { seed: 21 });
    let mut sim = Simulation::new(&cfg).expect("simulation");
    let first_qos = sim.run().expect("first");
    let first_records = sim.request_records();
    let first_energy = sim.system_energy_history().to_vec();

    sim.reset();
    assert_eq!(sim.state(), RunState::NotStarted);
    assert_eq!(sim.current_time(), Tick::ZERO);
    assert_eq!(sim.system_energy_consumed(), 0.0);
    assert!(sim.network().requests().is_empty());
    assert_eq!(sim.scheduled_requests().len(), 12);

    assert_eq!(sim.run().expect("second"), first_qos);
    assert_eq!(sim.request_records(), first_records);
    assert_eq!(sim.system_energy_history(), first_energy.as_slice());
}

#[test]
fn parallel_runs_match_sequential_runs() {
    let configs: Vec<SimConfig> = [
        (PowerKind::AllOn, AssignmentKind::TimeGreedy),
        (PowerKind::OnDemand, AssignmentKind::EnergyGreedy),
        (PowerKind::OnDemandWithTimeout { timeout: 1.0 }, AssignmentKind::HapsOnly),
    ]
    .into_iter()
    .map(|(p, a)| small_config(p, a))
    .collect();

    let run = |cfg: &SimConfig| {
        let mut sim = Simulation::new(cfg).expect("simulation");
        let qos = sim.run().expect("run");
        (qos, sim.system_energy_consumed(), sim.request_records())
    };
    let sequential: Vec<_> = configs.iter().map(run).collect();
    let parallel: Vec<_> = std::thread::scope(|s| {
        let handles: Vec<_> = configs.iter().map(|cfg| s.spawn(move || run(cfg))).collect();
        handles
            .into_iter()
            .map(|h| h.join().expect("join"))
            .collect()
    });
    assert_eq!(sequential, parallel);
}

/// 总是把请求分给发起它的用户设备
#[derive(Debug)]
struct BackToSender;

impl AssignmentStrategy for BackToSender {
    fn name(&self) -> String {
        "BackToSender".into()
    }

    fn select_compute_node(
        &mut self,
        request: &Request,
        _candidates: &[NodeId],
        _network: &Network,
    ) -> Option<Assignment> {
        Some(Assignment {
            node: request.origin(),
            path: vec![request.origin()],
            estimated_delay: 0.0,
        })
    }
}

#[test]
fn assignment_outside_candidates_aborts_the_step() {
    let (net, user, _) = single_haps(Some(20e3));
    let mut sim = Simulation::from_parts(
        RunSettings::default(),
        net,
        Box::new(BackToSender),
        Box::new(OnDemand),
    )
    .expect("simulation");
    sim.schedule_request(ScheduledRequest {
        user,
        at: Tick::ZERO,
        spec: HIGH_2MBIT,
    })
    .expect("schedule");
    let err = sim.step().expect_err("invalid assignment");
    assert!(matches!(err, SimError::InvalidAssignment { node, .. } if node == user));
}

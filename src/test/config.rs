use crate::assign::ScoreTable;
use crate::error::ConfigError;
use crate::net::{NodeId, Priority};
use crate::queue::QueueDiscipline;
use crate::sim::{AssignmentKind, PowerKind, RunSettings, SimConfig};

#[test]
fn strategy_names_parse_and_display() {
    assert_eq!("AllOn".parse::<PowerKind>().expect("AllOn"), PowerKind::AllOn);
    assert_eq!(
        " OnDemandWithTimeout( 2.5 ) ".parse::<PowerKind>().expect("timeout"),
        PowerKind::OnDemandWithTimeout { timeout: 2.5 }
    );
    assert_eq!(
        PowerKind::OnDemandWithTimeout { timeout: 10.0 }.to_string(),
        "OnDemandWithTimeout(10)"
    );
    assert_eq!(
        "Random(42)".parse::<AssignmentKind>().expect("random"),
        AssignmentKind::Random { seed: 42 }
    );
    assert_eq!(
        "HAPSOnly".parse::<AssignmentKind>().expect("haps"),
        AssignmentKind::HapsOnly
    );
    for name in AssignmentKind::NAMES.iter().filter(|n| **n != "Random") {
        let kind: AssignmentKind = name.parse().expect("name");
        assert_eq!(kind.to_string(), *name);
    }
}

#[test]
fn malformed_strategy_names_are_rejected() {
    for bad in ["Bogus", "Random", "Random(x)", "OnDemandWithTimeout", "AllOn(1)", "Random(1"] {
        let power = bad.parse::<PowerKind>();
        let assignment = bad.parse::<AssignmentKind>();
        assert!(
            matches!(power, Err(ConfigError::UnknownStrategy(_))),
            "{bad} as power"
        );
        assert!(
            matches!(assignment, Err(ConfigError::UnknownStrategy(_))),
            "{bad} as assignment"
        );
    }
}

#[test]
fn minimal_json_fills_defaults() {
    let cfg = SimConfig::from_json_str(
        r#"{
            "power_strategy": "OnDemand",
            "assignment_strategy": { "Random": { "seed": 7 } },
            "user_count": 3
        }"#,
    )
    .expect("config");
    assert_eq!(cfg.power_strategy, PowerKind::OnDemand);
    assert_eq!(cfg.assignment_strategy, AssignmentKind::Random { seed: 7 });
    assert_eq!(cfg.run, RunSettings::default());
    assert_eq!(cfg.run.time_step, 0.1);
    assert_eq!(cfg.run.max_ticks, Some(3000));
    assert!(cfg.run.stop_when_idle);
    assert_eq!(cfg.seed, 42);
    assert_eq!(cfg.workload.requests_per_user, 1);
    assert_eq!(cfg.topology.haps_xs, vec![0.0]);
}

#[test]
fn json_overrides_run_settings_and_workload() {
    let cfg = SimConfig::from_json_str(
        r#"{
            "power_strategy": { "OnDemandWithTimeout": { "timeout": 1.5 } },
            "assignment_strategy": "HAPSOnly",
            "user_count": 4,
            "time_step": 0.05,
            "max_ticks": 200,
            "queue_discipline": "priority",
            "stats_tracking": true,
            "seed": 9,
            "workload": { "requests_per_user": 2, "arrival_window_ticks": 40, "priority": "HIGH" },
            "topology": { "leo_angles_deg": [], "node_queue_capacity": 8 }
        }"#,
    )
    .expect("config");
    assert_eq!(
        cfg.power_strategy,
        PowerKind::OnDemandWithTimeout { timeout: 1.5 }
    );
    assert_eq!(cfg.assignment_strategy, AssignmentKind::HapsOnly);
    assert_eq!(cfg.run.time_step, 0.05);
    assert_eq!(cfg.run.max_ticks, Some(200));
    assert_eq!(cfg.run.queue_discipline, QueueDiscipline::Priority);
    assert!(cfg.run.stats_tracking);
    assert_eq!(cfg.workload.requests_per_user, 2);
    assert_eq!(cfg.workload.priority, Some(Priority::High));
    assert!(cfg.topology.leo_angles_deg.is_empty());
    assert_eq!(cfg.topology.node_queue_capacity, Some(8));
    assert_eq!(cfg.topology.base_station_xs.len(), 4);
}

#[test]
fn invalid_settings_are_rejected() {
    let mut cfg = SimConfig::new(PowerKind::AllOn, AssignmentKind::TimeGreedy, 5);
    assert!(cfg.validate().is_ok());

    cfg.run.time_step = 0.0;
    assert!(matches!(cfg.validate(), Err(ConfigError::NonPositiveTimeStep(_))));
    cfg.run.time_step = f64::NAN;
    assert!(matches!(cfg.validate(), Err(ConfigError::NonPositiveTimeStep(_))));
    cfg.run.time_step = 0.1;

    cfg.user_count = 0;
    assert!(matches!(cfg.validate(), Err(ConfigError::NonPositiveUserCount)));
    cfg.user_count = 5;

    cfg.run.max_ticks = Some(0);
    assert!(matches!(cfg.validate(), Err(ConfigError::ZeroMaxTicks)));
    cfg.run.max_ticks = None;
    assert!(cfg.validate().is_ok());
    cfg.run.stop_when_idle = false;
    assert!(matches!(cfg.validate(), Err(ConfigError::NoStopCondition)));
    cfg.run.max_ticks = Some(10);

    cfg.power_strategy = PowerKind::OnDemandWithTimeout { timeout: -1.0 };
    assert!(matches!(cfg.validate(), Err(ConfigError::InvalidTimeout(_))));
    cfg.power_strategy = PowerKind::AllOn;

    cfg.assignment_strategy = AssignmentKind::MatrixBased;
    assert!(matches!(cfg.validate(), Err(ConfigError::MissingDecisionMatrix)));
    let mut table = ScoreTable::new(0.0);
    table.set(NodeId(4), Priority::Low, 1.0);
    cfg.decision_matrix = Some(table);
    assert!(cfg.validate().is_ok());

    cfg.workload.time_buffer_ticks = cfg.workload.arrival_window_ticks;
    assert!(matches!(cfg.validate(), Err(ConfigError::InvalidWorkload(_))));
}

#[test]
fn json_errors_are_reported() {
    assert!(matches!(
        SimConfig::from_json_str("{"),
        Err(ConfigError::Json(_))
    ));
    assert!(matches!(
        SimConfig::from_json_str(
            r#"{ "power_strategy": "AllOn", "assignment_strategy": "TimeGreedy", "user_count": 0 }"#
        ),
        Err(ConfigError::NonPositiveUserCount)
    ));
    assert!(matches!(
        SimConfig::from_json_file("/definitely/not/here.json"),
        Err(ConfigError::Io(_))
    ));
}

#[test]
fn config_survives_json_round_trip() {
    let mut cfg = SimConfig::new(PowerKind::OnDemand, AssignmentKind::Random { seed: 5 }, 12);
    cfg.run.max_ticks = Some(500);
    cfg.workload.requests_per_user = 3;
    let raw = serde_json::to_string(&cfg).expect("serialize");
    let back = SimConfig::from_json_str(&raw).expect("parse");
    assert_eq!(back.assignment_strategy, cfg.assignment_strategy);
    assert_eq!(back.run.max_ticks, Some(500));
    assert_eq!(back.workload.requests_per_user, 3);
    assert_eq!(back.user_count, 12);
}

use super::fixtures::single_haps;
use crate::error::ConfigError;
use crate::net::{Node, Position};
use crate::power::{self, AllOn, OnDemand, OnDemandWithTimeout, PowerContext, PowerStrategy};
use crate::sim::{PowerKind, Tick};

fn ctx(demand: usize) -> PowerContext {
    PowerContext {
        now: Tick::ZERO,
        time_step: 0.1,
        demand,
    }
}

#[test]
fn all_on_powers_every_node_that_can_run() {
    let mut haps = Node::haps(0.0);
    AllOn.apply_strategy(&mut haps, &ctx(0));
    assert!(haps.is_powered());
    assert_eq!(haps.energy_consumed(), 150.0);
    AllOn.apply_strategy(&mut haps, &ctx(0));
    assert_eq!(haps.energy_consumed(), 150.0);

    let mut dead = Node::haps(0.0).with_battery_capacity(Some(10.0));
    AllOn.apply_strategy(&mut dead, &ctx(0));
    assert!(dead.is_depleted());
    AllOn.apply_strategy(&mut dead, &ctx(0));
    assert!(!dead.is_powered());
    assert_eq!(dead.energy_consumed(), 10.0);
    assert!(!AllOn.wakes_on_demand());
}

#[test]
fn on_demand_follows_demand() {
    let mut s = OnDemand;
    let mut haps = Node::haps(0.0);
    s.apply_strategy(&mut haps, &ctx(0));
    assert!(!haps.is_powered());
    assert_eq!(haps.energy_consumed(), 0.0);

    s.apply_strategy(&mut haps, &ctx(2));
    assert!(haps.is_powered());
    s.apply_strategy(&mut haps, &ctx(0));
    assert!(!haps.is_powered());
    assert!(s.wakes_on_demand());

    let mut user = Node::user_device(Position::ORIGIN);
    s.apply_strategy(&mut user, &ctx(0));
    assert!(user.is_powered());
}

#[test]
fn timeout_waits_for_idle_period() {
    let mut s = OnDemandWithTimeout::new(0.3).expect("timeout");
    let mut haps = Node::haps(0.0);
    s.apply_strategy(&mut haps, &ctx(1));
    assert!(haps.is_powered());

    s.apply_strategy(&mut haps, &ctx(0));
    s.apply_strategy(&mut haps, &ctx(0));
    assert!(haps.is_powered());
    assert!((haps.idle_duration() - 0.2).abs() < 1e-9);

    // demand resets the idle clock
    s.apply_strategy(&mut haps, &ctx(1));
    assert_eq!(haps.idle_duration(), 0.0);
    for _ in 0..2 {
        s.apply_strategy(&mut haps, &ctx(0));
    }
    assert!(haps.is_powered());
    s.apply_strategy(&mut haps, &ctx(0));
    assert!(!haps.is_powered());
    assert_eq!(haps.energy_consumed(), 150.0);
}

#[test]
fn zero_timeout_behaves_like_on_demand() {
    let mut s = OnDemandWithTimeout::new(0.0).expect("timeout");
    let mut haps = Node::haps(0.0);
    s.apply_strategy(&mut haps, &ctx(1));
    s.apply_strategy(&mut haps, &ctx(0));
    assert!(!haps.is_powered());
}

#[test]
fn negative_timeout_is_rejected() {
    assert!(matches!(
        OnDemandWithTimeout::new(-1.0),
        Err(ConfigError::InvalidTimeout(_))
    ));
    assert!(OnDemandWithTimeout::new(f64::NAN).is_err());
}

#[test]
fn routing_wakes_nodes_on_the_path() {
    let (mut net, user, haps) = single_haps(Some(20e3));
    OnDemand.on_request_routed(&[user, haps], &mut net);
    assert!(net.node(haps).expect("haps").is_powered());
    assert_eq!(net.node(haps).expect("haps").energy_consumed(), 150.0);
    assert_eq!(net.node(user).expect("user").energy_consumed(), 0.0);
}

#[test]
fn from_kind_names_match_display() {
    for kind in [
        PowerKind::AllOn,
        PowerKind::OnDemand,
        PowerKind::OnDemandWithTimeout { timeout: 2.5 },
    ] {
        let s = power::from_kind(&kind).expect("strategy");
        assert_eq!(s.name(), kind.to_string());
    }
    assert!(power::from_kind(&PowerKind::OnDemandWithTimeout { timeout: -0.5 }).is_err());
}

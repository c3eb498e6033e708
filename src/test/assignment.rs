use super::fixtures::{HIGH_2MBIT, power_on};
use crate::assign::{
    self, AssignmentStrategy, ClosestNode, EnergyGreedy, HapsOnly, MatrixBased, RandomAssignment,
    ScoreTable, TimeGreedy, plan_candidate,
};
use crate::error::ConfigError;
use crate::net::{Network, Node, NodeId, Position, Priority, Request};
use crate::sim::{AssignmentKind, Tick};
use crate::topo::ntn;

/// 基站(0, x=100 m) 与 HAPS(1) 都可达；用户为 2
fn mixed() -> (Network, Request) {
    let mut net = Network::new();
    let bs = net.add_node(Node::base_station(100.0));
    let haps = net.add_node(Node::haps(0.0));
    let user = net.add_node(Node::user_device(Position::ORIGIN));
    net.connect(user, bs, ntn::user_to_base_station(3.0, 3.0))
        .expect("user -> bs");
    net.connect(user, haps, ntn::user_uplink())
        .expect("user -> haps");
    power_on(&mut net, bs);
    power_on(&mut net, haps);
    let id = net
        .create_request(user, HIGH_2MBIT, Tick::ZERO)
        .expect("create");
    let req = net.request(id).expect("request").clone();
    (net, req)
}

fn select(strategy: &mut dyn AssignmentStrategy, net: &Network, req: &Request) -> Option<NodeId> {
    let candidates = net.candidates(req);
    strategy
        .select_compute_node(req, &candidates, net)
        .map(|a| a.node)
}

#[test]
fn candidates_are_sorted_by_id() {
    let (net, req) = mixed();
    assert_eq!(net.candidates(&req), vec![NodeId(0), NodeId(1)]);
}

#[test]
fn time_greedy_prefers_faster_haps() {
    // base station: 0.13 s of processing at 3 GHz; HAPS: 0.08 s at 5 GHz plus 5.5 ms uplink
    let (net, req) = mixed();
    let pick = TimeGreedy
        .select_compute_node(&req, &net.candidates(&req), &net)
        .expect("assignment");
    assert_eq!(pick.node, NodeId(1));
    assert_eq!(pick.path, vec![NodeId(2), NodeId(1)]);
    assert!(pick.estimated_delay > 0.08 && pick.estimated_delay < 0.1);
}

#[test]
fn energy_greedy_prefers_lower_frequency() {
    // k·f² per cycle: 3.6 J at the base station, 10 J on the HAPS
    let (net, req) = mixed();
    assert_eq!(select(&mut EnergyGreedy, &net, &req), Some(NodeId(0)));

    let plan = plan_candidate(&net, &req, NodeId(0)).expect("plan");
    let joules = EnergyGreedy::estimate_energy(&net, &req, &plan).expect("energy");
    assert!(joules > 3.6 && joules < 3.7, "{joules}");
}

#[test]
fn closest_node_prefers_base_station() {
    let (net, req) = mixed();
    assert_eq!(select(&mut ClosestNode, &net, &req), Some(NodeId(0)));
}

#[test]
fn haps_only_ignores_other_classes() {
    let (net, req) = mixed();
    assert_eq!(select(&mut HapsOnly, &net, &req), Some(NodeId(1)));
    assert!(HapsOnly
        .select_compute_node(&req, &[NodeId(0)], &net)
        .is_none());
}

#[test]
fn matrix_based_picks_highest_score_and_breaks_ties_by_id() {
    let (net, req) = mixed();
    let mut table = ScoreTable::new(0.0);
    table.set(NodeId(1), Priority::High, 5.0);
    assert_eq!(table.lookup(NodeId(1), Priority::High), 5.0);
    assert_eq!(table.lookup(NodeId(1), Priority::Low), 0.0);
    assert_eq!(select(&mut MatrixBased::new(table), &net, &req), Some(NodeId(1)));

    let flat = ScoreTable::new(1.0);
    assert_eq!(select(&mut MatrixBased::new(flat), &net, &req), Some(NodeId(0)));
}

#[test]
fn random_assignment_is_reproducible() {
    let (net, req) = mixed();
    let mut a = RandomAssignment::new(7);
    let mut b = RandomAssignment::new(7);
    let first: Vec<Option<NodeId>> = (0..16).map(|_| select(&mut a, &net, &req)).collect();
    let second: Vec<Option<NodeId>> = (0..16).map(|_| select(&mut b, &net, &req)).collect();
    assert_eq!(first, second);
    assert!(first.iter().all(|n| n.is_some()));

    a.reset();
    let again: Vec<Option<NodeId>> = (0..16).map(|_| select(&mut a, &net, &req)).collect();
    assert_eq!(first, again);
    assert_eq!(a.name(), "Random(7)");
}

#[test]
fn unreachable_candidates_are_skipped() {
    let mut net = Network::new();
    let lonely = net.add_node(Node::haps(0.0));
    let linked = net.add_node(Node::haps(0.0));
    let user = net.add_node(Node::user_device(Position::ORIGIN));
    net.connect(user, linked, ntn::user_uplink()).expect("uplink");
    power_on(&mut net, lonely);
    power_on(&mut net, linked);
    let id = net
        .create_request(user, HIGH_2MBIT, Tick::ZERO)
        .expect("create");
    let req = net.request(id).expect("request");

    assert!(plan_candidate(&net, req, lonely).is_none());
    assert_eq!(select(&mut TimeGreedy, &net, req), Some(linked));
    assert!(TimeGreedy.select_compute_node(req, &[], &net).is_none());
}

#[test]
fn equal_costs_go_to_lowest_id() {
    let mut net = Network::new();
    let a = net.add_node(Node::haps(0.0));
    let b = net.add_node(Node::haps(0.0));
    let user = net.add_node(Node::user_device(Position::ORIGIN));
    net.connect(user, a, ntn::user_uplink()).expect("a");
    net.connect(user, b, ntn::user_uplink()).expect("b");
    power_on(&mut net, a);
    power_on(&mut net, b);
    let id = net
        .create_request(user, HIGH_2MBIT, Tick::ZERO)
        .expect("create");
    let req = net.request(id).expect("request");

    assert_eq!(select(&mut TimeGreedy, &net, req), Some(a));
    assert_eq!(select(&mut EnergyGreedy, &net, req), Some(a));
    assert_eq!(select(&mut HapsOnly, &net, req), Some(a));
}

#[test]
fn from_kind_builds_named_strategies() {
    for (kind, name) in [
        (AssignmentKind::TimeGreedy, "TimeGreedy"),
        (AssignmentKind::EnergyGreedy, "EnergyGreedy"),
        (AssignmentKind::ClosestNode, "ClosestNode"),
        (AssignmentKind::HapsOnly, "HAPSOnly"),
        (AssignmentKind::Random { seed: 3 }, "Random(3)"),
    ] {
        let s = assign::from_kind(&kind, None).expect("strategy");
        assert_eq!(s.name(), name);
        assert_eq!(s.name(), kind.to_string());
    }
    assert!(matches!(
        assign::from_kind(&AssignmentKind::MatrixBased, None),
        Err(ConfigError::MissingDecisionMatrix)
    ));
    let s = assign::from_kind(&AssignmentKind::MatrixBased, Some(ScoreTable::default()))
        .expect("matrix");
    assert_eq!(s.name(), "MatrixBased");
}

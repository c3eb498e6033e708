use crate::net::{Network, Node, NodeId, Position, Priority, RequestId, RequestSpec};
use crate::sim::Tick;
use crate::topo::ntn;

pub(crate) const HIGH_2MBIT: RequestSpec = RequestSpec {
    size_bits: 2e6,
    priority: Priority::High,
    qos_limit: 0.2,
};

pub(crate) fn approx(a: f64, b: f64, tol: f64) -> bool {
    (a - b).abs() <= tol
}

/// 一个用户 + 正上方一架 HAPS，返回 (network, user, haps)
pub(crate) fn single_haps(battery: Option<f64>) -> (Network, NodeId, NodeId) {
    let mut net = Network::new();
    let haps = net.add_node(Node::haps(0.0).with_battery_capacity(battery));
    let user = net.add_node(Node::user_device(Position::ground(0.0)));
    net.connect(user, haps, ntn::user_uplink())
        .expect("connect user to haps");
    (net, user, haps)
}

pub(crate) fn power_on(net: &mut Network, id: NodeId) {
    assert!(net.node_mut(id).expect("node").power_on(), "power on {id:?}");
}

/// 创建请求并沿 `path` 送出
pub(crate) fn send(net: &mut Network, spec: RequestSpec, path: Vec<NodeId>) -> RequestId {
    let user = path[0];
    let id = net
        .create_request(user, spec, Tick::ZERO)
        .expect("create request");
    assert!(net.dispatch(id, Some(path), Tick::ZERO).expect("dispatch"));
    id
}

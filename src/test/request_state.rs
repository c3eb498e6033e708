use crate::error::SimError;
use crate::net::{
    FailureReason, NodeId, Priority, Request, RequestId, RequestLocation, RequestSpec,
    RequestStatus,
};
use crate::sim::Tick;

fn request_at(tick: u64, spec: RequestSpec) -> Request {
    Request::new(RequestId(0), NodeId(0), spec, Tick(tick))
}

#[test]
fn new_request_starts_created_at_origin() {
    let req = request_at(3, RequestSpec::for_priority(Priority::Medium, 5e6));
    assert_eq!(req.status(), RequestStatus::Created);
    assert_eq!(req.history(), &[(RequestStatus::Created, Tick(3))]);
    assert_eq!(req.location(), RequestLocation::Origin(NodeId(0)));
    assert_eq!(req.qos_limit(), 0.5);
    assert!(req.path().is_empty());
    assert!(req.target().is_none());
    assert_eq!(req.processing_progress(), 0.0);
}

#[test]
fn forward_transitions_record_timestamps() {
    let mut req = request_at(0, RequestSpec::for_priority(Priority::High, 1e6));
    req.update_status(RequestStatus::InTransit, Tick(0)).expect("transit");
    req.update_status(RequestStatus::InProcessingQueue, Tick(2))
        .expect("queue");
    req.update_status(RequestStatus::Processing, Tick(2)).expect("processing");
    req.update_status(RequestStatus::Completed, Tick(4)).expect("complete");

    let statuses: Vec<RequestStatus> = req.history().iter().map(|(s, _)| *s).collect();
    assert_eq!(
        statuses,
        vec![
            RequestStatus::Created,
            RequestStatus::InTransit,
            RequestStatus::InProcessingQueue,
            RequestStatus::Processing,
            RequestStatus::Completed,
        ]
    );
    assert_eq!(req.last_status_change(), Tick(4));
    assert_eq!(req.location(), RequestLocation::Retired);
    assert!(req.is_terminal());
}

#[test]
fn skipping_a_stage_is_rejected() {
    let mut req = request_at(0, RequestSpec::for_priority(Priority::Low, 8e6));
    let err = req
        .update_status(RequestStatus::Processing, Tick(1))
        .expect_err("created -> processing");
    assert!(matches!(
        err,
        SimError::IllegalTransition {
            from: RequestStatus::Created,
            to: RequestStatus::Processing,
            ..
        }
    ));
    assert!(req.update_status(RequestStatus::Created, Tick(1)).is_err());
    assert_eq!(req.status(), RequestStatus::Created);
    assert_eq!(req.history().len(), 1);
}

#[test]
fn terminal_requests_cannot_move() {
    let mut req = request_at(0, RequestSpec::for_priority(Priority::High, 1e6));
    req.fail(FailureReason::NoFeasibleNode, Tick(0)).expect("fail");
    assert_eq!(req.failure(), Some(FailureReason::NoFeasibleNode));

    let err = req
        .update_status(RequestStatus::InTransit, Tick(1))
        .expect_err("terminal");
    assert!(matches!(
        err,
        SimError::TerminalRequest {
            status: RequestStatus::Failed,
            ..
        }
    ));
    assert!(req.fail(FailureReason::QosExpired, Tick(1)).is_err());
    assert_eq!(req.failure(), Some(FailureReason::NoFeasibleNode));
}

#[test]
fn every_live_status_may_fail() {
    for status in RequestStatus::ALL {
        assert_eq!(
            status.can_transition_to(RequestStatus::Failed),
            !status.is_terminal(),
            "{status}"
        );
    }
}

#[test]
fn status_change_never_precedes_creation() {
    let mut req = request_at(5, RequestSpec::for_priority(Priority::High, 1e6));
    req.update_status(RequestStatus::InTransit, Tick(2)).expect("transit");
    assert_eq!(req.last_status_change(), Tick(5));
    assert!(req.history().iter().all(|(_, t)| *t >= req.creation_time()));
}

#[test]
fn processing_progress_is_monotone_and_capped() {
    let mut req = request_at(0, RequestSpec::for_priority(Priority::High, 1e6));
    req.set_processing_progress(0.4);
    req.set_processing_progress(0.2);
    assert_eq!(req.processing_progress(), 0.4);
    req.set_processing_progress(1.7);
    assert_eq!(req.processing_progress(), 1.0);
}

#[test]
fn qos_deadline_is_inclusive() {
    let req = request_at(0, RequestSpec::for_priority(Priority::High, 1e6));
    assert!(!req.qos_expired(Tick(2), 0.1));
    assert!(req.qos_expired(Tick(3), 0.1));
}

#[test]
fn completed_within_qos_uses_last_status_change() {
    let mut req = request_at(0, RequestSpec::for_priority(Priority::High, 1e6));
    req.update_status(RequestStatus::InTransit, Tick(0)).expect("transit");
    req.update_status(RequestStatus::InProcessingQueue, Tick(1))
        .expect("queue");
    req.update_status(RequestStatus::Processing, Tick(1)).expect("processing");
    req.update_status(RequestStatus::Completed, Tick(2)).expect("complete");
    assert!(req.completed_within_qos(0.1));
    assert!(!req.completed_within_qos(0.2));
}

#[test]
fn priority_defaults_match_size_classes() {
    assert!(Priority::Low < Priority::Medium && Priority::Medium < Priority::High);
    assert_eq!(Priority::High.qos_limit(), 0.2);
    assert_eq!(Priority::Low.qos_limit(), 1.0);
    assert_eq!(Priority::High.size_range_mbit(), (1, 3));
    assert_eq!(Priority::Medium.size_range_mbit(), (4, 6));
    assert_eq!(Priority::Low.size_range_mbit(), (7, 10));
}

#[test]
fn path_can_be_assigned_once() {
    let mut req = request_at(0, RequestSpec::for_priority(Priority::High, 1e6));
    req.assign_path(vec![NodeId(0), NodeId(1)]).expect("first path");
    assert_eq!(req.target(), Some(NodeId(1)));
    assert_eq!(req.next_node(), Some(NodeId(1)));
    assert!(matches!(
        req.assign_path(vec![NodeId(0), NodeId(2)]),
        Err(SimError::PathAlreadyAssigned(_))
    ));
    req.advance_hop();
    assert!(req.next_node().is_none());
}

#[test]
fn request_status_names() {
    assert_eq!(RequestStatus::InProcessingQueue.to_string(), "IN_PROCESSING_QUEUE");
    assert_eq!(
        serde_json::to_string(&RequestStatus::InTransit).expect("json"),
        "\"IN_TRANSIT\""
    );
    assert_eq!(FailureReason::BatteryDepleted.to_string(), "battery_depleted");
}

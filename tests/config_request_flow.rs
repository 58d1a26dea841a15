use wellbeingd::model::{RequestStatus, SchoolConfig, SchoolConfigRequest};
use wellbeingd::{Action, Store, TransitionError};

fn request(id: &str) -> SchoolConfigRequest {
    SchoolConfigRequest {
        id: id.to_string(),
        requested_by: "Principal Shaw".to_string(),
        created_at: 1_000,
        config: SchoolConfig {
            checkins_visible_to_parents: true,
            journals_visible_to_counselor: true,
            broadcasts_enabled: true,
            incident_reports_enabled: true,
            emergency_contact: "Front office: 555-0199".to_string(),
        },
        status: RequestStatus::Pending,
        decided_at: None,
    }
}

#[test]
fn approval_copies_the_requested_config_into_the_live_one() {
    let mut store = Store::in_memory();
    store
        .dispatch(Action::RequestConfigChange {
            request: request("cr1"),
        })
        .expect("request");
    assert!(!store.state().config.checkins_visible_to_parents);

    store
        .dispatch(Action::ApproveConfigRequest {
            request_id: "cr1".to_string(),
            at: 2_000,
        })
        .expect("approve");
    let state = store.state();
    assert!(state.config.checkins_visible_to_parents);
    assert_eq!(state.config.emergency_contact, "Front office: 555-0199");
    assert_eq!(state.config_requests[0].status, RequestStatus::Approved);
    assert_eq!(state.config_requests[0].decided_at, Some(2_000));
}

#[test]
fn rejection_only_flags_the_request() {
    let mut store = Store::in_memory();
    let live_before = store.state().config.clone();
    store
        .dispatch(Action::RequestConfigChange {
            request: request("cr1"),
        })
        .expect("request");
    store
        .dispatch(Action::RejectConfigRequest {
            request_id: "cr1".to_string(),
            at: 2_000,
        })
        .expect("reject");
    let state = store.state();
    assert_eq!(state.config, live_before);
    assert_eq!(state.config_requests[0].status, RequestStatus::Rejected);
}

#[test]
fn a_decided_request_cannot_be_decided_again() {
    let mut store = Store::in_memory();
    store
        .dispatch(Action::RequestConfigChange {
            request: request("cr1"),
        })
        .expect("request");
    store
        .dispatch(Action::RejectConfigRequest {
            request_id: "cr1".to_string(),
            at: 2_000,
        })
        .expect("reject");
    let err = store.dispatch(Action::ApproveConfigRequest {
        request_id: "cr1".to_string(),
        at: 3_000,
    });
    assert_eq!(
        err,
        Err(TransitionError::RequestAlreadyDecided("cr1".to_string()))
    );
}

#[test]
fn queued_requests_always_enter_as_pending() {
    let mut store = Store::in_memory();
    let mut forged = request("cr1");
    forged.status = RequestStatus::Approved;
    forged.decided_at = Some(999);
    store
        .dispatch(Action::RequestConfigChange { request: forged })
        .expect("request");
    let r = &store.state().config_requests[0];
    assert_eq!(r.status, RequestStatus::Pending);
    assert_eq!(r.decided_at, None);
    // And the forged approval did not leak into the live config.
    assert!(!store.state().config.checkins_visible_to_parents);
}

#[test]
fn direct_update_replaces_the_live_config() {
    let mut store = Store::in_memory();
    let mut config = store.state().config.clone();
    config.broadcasts_enabled = false;
    store
        .dispatch(Action::UpdateConfig { config })
        .expect("update");
    assert!(!store.state().config.broadcasts_enabled);
}

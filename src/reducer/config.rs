use crate::model::{AppState, RequestStatus, SchoolConfig, SchoolConfigRequest};
use crate::reducer::TransitionError;

pub(super) fn update(state: &mut AppState, config: SchoolConfig) -> Result<(), TransitionError> {
    state.config = config;
    Ok(())
}

/// Queues a change request. Requests always enter as pending, whatever the
/// payload claims.
pub(super) fn request_change(
    state: &mut AppState,
    mut request: SchoolConfigRequest,
) -> Result<(), TransitionError> {
    request.status = RequestStatus::Pending;
    request.decided_at = None;
    state.config_requests.insert(0, request);
    Ok(())
}

/// Approval copies the requested config into the live config in the same
/// transition.
pub(super) fn approve_request(
    state: &mut AppState,
    request_id: &str,
    at: i64,
) -> Result<(), TransitionError> {
    let request = pending_request_mut(state, request_id)?;
    request.status = RequestStatus::Approved;
    request.decided_at = Some(at);
    let approved = request.config.clone();
    state.config = approved;
    Ok(())
}

/// Rejection only flags the request; the live config is untouched.
pub(super) fn reject_request(
    state: &mut AppState,
    request_id: &str,
    at: i64,
) -> Result<(), TransitionError> {
    let request = pending_request_mut(state, request_id)?;
    request.status = RequestStatus::Rejected;
    request.decided_at = Some(at);
    Ok(())
}

fn pending_request_mut<'a>(
    state: &'a mut AppState,
    request_id: &str,
) -> Result<&'a mut SchoolConfigRequest, TransitionError> {
    let request = state
        .config_requests
        .iter_mut()
        .find(|r| r.id == request_id)
        .ok_or_else(|| TransitionError::UnknownConfigRequest(request_id.to_string()))?;
    if request.status != RequestStatus::Pending {
        return Err(TransitionError::RequestAlreadyDecided(request_id.to_string()));
    }
    Ok(request)
}

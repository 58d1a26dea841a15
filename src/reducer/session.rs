use crate::model::{AppState, Role, User};
use crate::reducer::TransitionError;
use crate::seed;

pub(super) fn select_role(state: &mut AppState, role: Role) -> Result<(), TransitionError> {
    state.session.pending_role = Some(role);
    Ok(())
}

/// Binds a new user to the previously selected role. No credentials are
/// checked anywhere: this is identity selection, not authentication.
pub(super) fn login(state: &mut AppState, id: String, name: String) -> Result<(), TransitionError> {
    let role = state.session.pending_role.take().unwrap_or(Role::Student);
    let name = if name.trim().is_empty() {
        "Guest".to_string()
    } else {
        name
    };
    state.session.user = Some(User { id, name, role });
    Ok(())
}

/// Clears the user but preserves all domain data.
pub(super) fn logout(state: &mut AppState) -> Result<(), TransitionError> {
    state.session.user = None;
    Ok(())
}

/// Restores the canonical seed dataset, demo-reset style.
pub(super) fn reset(state: &mut AppState) -> Result<(), TransitionError> {
    *state = seed::initial_state();
    Ok(())
}

use serde_json::json;

use crate::action::Action;
use crate::ipc::error::{err, ok};
use crate::ipc::handlers::core::selected_store;
use crate::ipc::types::{AppHandle, Request};

pub fn try_handle(app: &mut AppHandle, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "state.get" => Some(state_get(app, req)),
        "action.dispatch" => Some(action_dispatch(app, req)),
        _ => None,
    }
}

fn state_get(app: &mut AppHandle, req: &Request) -> serde_json::Value {
    let store = match selected_store(app) {
        Ok(s) => s,
        Err(e) => return e.response(&req.id),
    };
    match serde_json::to_value(store.state()) {
        Ok(state) => ok(&req.id, json!({ "state": state })),
        Err(e) => err(&req.id, "serialize_failed", e.to_string(), None),
    }
}

/// The UI -> core interface: one action from the closed vocabulary, fire and
/// forget. The new tree is read back via `state.get`.
fn action_dispatch(app: &mut AppHandle, req: &Request) -> serde_json::Value {
    let store = match selected_store(app) {
        Ok(s) => s,
        Err(e) => return e.response(&req.id),
    };
    let Some(raw) = req.params.get("action") else {
        return err(&req.id, "bad_params", "missing action", None);
    };
    let action: Action = match serde_json::from_value(raw.clone()) {
        Ok(a) => a,
        Err(e) => {
            return err(
                &req.id,
                "bad_action",
                format!("unparseable action: {}", e),
                None,
            )
        }
    };
    match store.dispatch(action) {
        Ok(()) => ok(&req.id, json!({})),
        Err(e) => err(&req.id, "rejected_transition", e.to_string(), None),
    }
}

use std::path::PathBuf;

use serde_json::json;
use uuid::Uuid;

use crate::action::Action;
use crate::ipc::error::{err, ok};
use crate::ipc::handlers::{get_required_str, HandlerErr};
use crate::ipc::types::{AppHandle, Request};
use crate::store::Store;

pub fn try_handle(app: &mut AppHandle, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "ping" => Some(ok(
            &req.id,
            json!({ "pong": true, "version": env!("CARGO_PKG_VERSION") }),
        )),
        "workspace.select" => Some(workspace_select(app, req)),
        "session.login" => Some(session_login(app, req)),
        _ => None,
    }
}

fn workspace_select(app: &mut AppHandle, req: &Request) -> serde_json::Value {
    let path = match get_required_str(&req.params, "path") {
        Ok(v) => PathBuf::from(v),
        Err(e) => return e.response(&req.id),
    };
    match Store::open(&path) {
        Ok(store) => {
            app.store = Some(store);
            app.workspace = Some(path.clone());
            ok(&req.id, json!({ "workspace": path.to_string_lossy() }))
        }
        Err(e) => err(&req.id, "workspace_open_failed", e.to_string(), None),
    }
}

/// Convenience login: the shell sends only a display name; the id is minted
/// here so the reducer itself stays free of randomness.
fn session_login(app: &mut AppHandle, req: &Request) -> serde_json::Value {
    let store = match selected_store(app) {
        Ok(s) => s,
        Err(e) => return e.response(&req.id),
    };
    let name = req
        .params
        .get("name")
        .and_then(|v| v.as_str())
        .unwrap_or("")
        .to_string();
    let id = format!("user_{}", Uuid::new_v4());
    match store.dispatch(Action::Login { id, name }) {
        Ok(()) => {
            let user = store.state().session.user.clone();
            ok(&req.id, json!({ "user": user }))
        }
        Err(e) => err(&req.id, "rejected_transition", e.to_string(), None),
    }
}

pub(super) fn selected_store(app: &mut AppHandle) -> Result<&mut Store, HandlerErr> {
    app.store.as_mut().ok_or_else(|| HandlerErr {
        code: "no_workspace",
        message: "no workspace selected".to_string(),
        details: None,
    })
}

use super::handlers;
use super::types::{AppHandle, Request};
use crate::ipc::error::err;

pub fn handle_request(app: &mut AppHandle, req: Request) -> serde_json::Value {
    if let Some(resp) = handlers::core::try_handle(app, &req) {
        return resp;
    }
    if let Some(resp) = handlers::state::try_handle(app, &req) {
        return resp;
    }
    if let Some(resp) = handlers::stats::try_handle(app, &req) {
        return resp;
    }
    if let Some(resp) = handlers::snapshot::try_handle(app, &req) {
        return resp;
    }

    err(
        &req.id,
        "not_implemented",
        format!("unknown method: {}", req.method),
        None,
    )
}

use std::path::PathBuf;

use serde_json::json;

use crate::backup;
use crate::ipc::error::{err, ok};
use crate::ipc::handlers::get_required_str;
use crate::ipc::types::{AppHandle, Request};

pub fn try_handle(app: &mut AppHandle, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "snapshot.export" => Some(snapshot_export(app, req)),
        "snapshot.import" => Some(snapshot_import(app, req)),
        _ => None,
    }
}

fn snapshot_export(app: &mut AppHandle, req: &Request) -> serde_json::Value {
    let Some(workspace) = app.workspace.clone() else {
        return err(&req.id, "no_workspace", "no workspace selected", None);
    };
    let out_path = match get_required_str(&req.params, "outPath") {
        Ok(v) => PathBuf::from(v),
        Err(e) => return e.response(&req.id),
    };
    match backup::export_snapshot_bundle(&workspace, &out_path) {
        Ok(summary) => ok(
            &req.id,
            json!({
                "bundleFormat": summary.bundle_format,
                "entryCount": summary.entry_count,
            }),
        ),
        Err(e) => err(&req.id, "export_failed", e.to_string(), None),
    }
}

/// Replaces the workspace snapshot and the live store in one request; the
/// shell re-reads state afterwards.
fn snapshot_import(app: &mut AppHandle, req: &Request) -> serde_json::Value {
    let Some(workspace) = app.workspace.clone() else {
        return err(&req.id, "no_workspace", "no workspace selected", None);
    };
    let in_path = match get_required_str(&req.params, "inPath") {
        Ok(v) => PathBuf::from(v),
        Err(e) => return e.response(&req.id),
    };
    match backup::import_snapshot_bundle(&in_path, &workspace) {
        Ok(summary) => {
            if let Some(store) = app.store.as_mut() {
                store.replace_state(summary.state.clone());
            }
            ok(
                &req.id,
                json!({ "bundleFormatDetected": summary.bundle_format_detected }),
            )
        }
        Err(e) => err(&req.id, "import_failed", e.to_string(), None),
    }
}

use serde_json::json;
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_dir(prefix: &str) -> PathBuf {
    let p = std::env::temp_dir().join(format!(
        "{}-{}",
        prefix,
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos()
    ));
    std::fs::create_dir_all(&p).expect("create temp dir");
    p
}

fn spawn_sidecar() -> (Child, ChildStdin, BufReader<ChildStdout>) {
    let exe = env!("CARGO_BIN_EXE_wellbeingd");
    let mut child = Command::new(exe)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("spawn wellbeingd");
    let stdin = child.stdin.take().expect("child stdin");
    let stdout = child.stdout.take().expect("child stdout");
    (child, stdin, BufReader::new(stdout))
}

fn request(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    method: &str,
    params: serde_json::Value,
) -> serde_json::Value {
    let payload = json!({
        "id": id,
        "method": method,
        "params": params,
    });
    writeln!(stdin, "{}", payload).expect("write request");
    stdin.flush().expect("flush request");

    let mut line = String::new();
    reader.read_line(&mut line).expect("read response line");
    assert!(!line.trim().is_empty(), "empty response for {}", method);
    let value: serde_json::Value = serde_json::from_str(line.trim()).expect("parse response json");
    assert_eq!(value.get("id").and_then(|v| v.as_str()), Some(id));
    value
}

fn request_ok(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    method: &str,
    params: serde_json::Value,
) -> serde_json::Value {
    let value = request(stdin, reader, id, method, params);
    assert!(
        value.get("ok").and_then(|v| v.as_bool()).unwrap_or(false),
        "{} failed: {}",
        method,
        value
    );
    value.get("result").cloned().unwrap_or_else(|| json!({}))
}

#[test]
fn select_workspace_dispatch_and_read_back() {
    let workspace = temp_dir("wellbeing-sidecar");
    let (_child, mut stdin, mut reader) = spawn_sidecar();

    let pong = request_ok(&mut stdin, &mut reader, "1", "ping", json!({}));
    assert_eq!(pong.get("pong").and_then(|v| v.as_bool()), Some(true));

    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "workspace.select",
        json!({ "path": workspace.to_string_lossy() }),
    );

    let login = request_ok(
        &mut stdin,
        &mut reader,
        "3",
        "session.login",
        json!({ "name": "Avery" }),
    );
    assert_eq!(
        login.pointer("/user/name").and_then(|v| v.as_str()),
        Some("Avery")
    );

    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "4",
        "action.dispatch",
        json!({ "action": {
            "type": "student/addCheckIn",
            "checkIn": {
                "id": "c1",
                "studentId": "stu_1",
                "createdAt": 1000,
                "feeling": "worried",
                "ageGroup": "11-17",
                "answers": { "stressors": "math test" }
            }
        }}),
    );

    let state = request_ok(&mut stdin, &mut reader, "5", "state.get", json!({}));
    assert_eq!(
        state.pointer("/state/checkIns/0/id").and_then(|v| v.as_str()),
        Some("c1")
    );
    assert_eq!(
        state
            .pointer("/state/directory/stu_1/latestFeeling")
            .and_then(|v| v.as_str()),
        Some("worried")
    );

    let stressors = request_ok(
        &mut stdin,
        &mut reader,
        "6",
        "stats.topStressors",
        json!({ "studentId": "stu_1" }),
    );
    assert_eq!(
        stressors
            .pointer("/stressors/0/category")
            .and_then(|v| v.as_str()),
        Some("school")
    );
}

#[test]
fn rejected_transitions_and_unknown_methods_reply_with_errors() {
    let workspace = temp_dir("wellbeing-sidecar-err");
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "workspace.select",
        json!({ "path": workspace.to_string_lossy() }),
    );

    let resp = request(
        &mut stdin,
        &mut reader,
        "2",
        "action.dispatch",
        json!({ "action": {
            "type": "reports/resolve",
            "reportId": "r_missing",
            "note": "n",
            "at": 1000
        }}),
    );
    assert_eq!(resp.get("ok").and_then(|v| v.as_bool()), Some(false));
    assert_eq!(
        resp.pointer("/error/code").and_then(|v| v.as_str()),
        Some("rejected_transition")
    );

    let resp = request(&mut stdin, &mut reader, "3", "no.such.method", json!({}));
    assert_eq!(
        resp.pointer("/error/code").and_then(|v| v.as_str()),
        Some("not_implemented")
    );
}

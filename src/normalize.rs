//! Snapshot normalization. Snapshots evolved over time and older ones may
//! lack newer fields entirely, so the load path is total: an explicit
//! version field selects an ordered migration chain over the raw JSON, and
//! the final typed parse substitutes documented defaults field by field.
//! Un-versioned snapshots (the original role-nested shape, where each role
//! held its own mirror arrays) are version 0.

use std::collections::{BTreeMap, BTreeSet};

use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};

use crate::model::{
    caps, AppState, BroadcastItem, CheckIn, Habit, IncidentReport, JournalEntry, Message,
    SafetyEvent, SchoolConfig, SchoolConfigRequest, SessionState, SleepLog, StudentRecord,
};
use crate::seed;

pub const SNAPSHOT_VERSION: i64 = 2;

/// Load path entry point: absent or unreadable snapshots fall back to the
/// seed dataset, everything else normalizes.
pub fn load_or_seed(raw: Option<&str>) -> AppState {
    match raw {
        Some(text) => match serde_json::from_str::<Value>(text) {
            Ok(value) => normalize_snapshot(value),
            Err(_) => seed::initial_state(),
        },
        None => seed::initial_state(),
    }
}

pub fn normalize_snapshot(mut value: Value) -> AppState {
    if !value.is_object() {
        return seed::initial_state();
    }
    let version = value.get("version").and_then(Value::as_i64).unwrap_or(0);
    if version < 1 {
        migrate_v0_to_v1(&mut value);
    }
    if version < 2 {
        migrate_v1_to_v2(&mut value);
    }
    parse_state(&value)
}

// ---------------------------------------------------------------------------
// Migration chain.

/// v0 -> v1: fold the role-nested mirror arrays into canonical collections.
/// Mirrors merge by id, first occurrence wins; flag disagreements between the
/// teacher and counselor copies of a student record resolve to the more
/// severe flag. Records the student wrote without a studentId get stamped
/// with the session user's id.
fn migrate_v0_to_v1(value: &mut Value) {
    let student = section(value, "student");
    let teacher = section(value, "teacher");
    let parent = section(value, "parent");
    let counselor = section(value, "counselor");
    let principal = section(value, "principal");

    let user = value.get("user").cloned().unwrap_or(Value::Null);
    let owner_id = user
        .get("id")
        .and_then(Value::as_str)
        .unwrap_or("")
        .to_string();

    let mut out = Map::new();
    out.insert("version".to_string(), json!(1));
    out.insert(
        "session".to_string(),
        json!({
            "pendingRole": value.get("pendingRole").cloned().unwrap_or(Value::Null),
            "user": user,
        }),
    );

    // Widest mirror first so its ordering survives the merge.
    let check_ins = merge_by_id(&[
        array(&principal, "checkIns"),
        array(&counselor, "checkIns"),
        stamp_student_id(array(&student, "checkIns"), &owner_id),
    ]);
    out.insert("checkIns".to_string(), Value::Array(check_ins));

    let sleep_logs = merge_by_id(&[
        array(&principal, "sleepLogs"),
        array(&counselor, "sleepLogs"),
        stamp_student_id(array(&student, "sleepLogs"), &owner_id),
    ]);
    out.insert("sleepLogs".to_string(), Value::Array(sleep_logs));

    out.insert(
        "journal".to_string(),
        Value::Array(stamp_student_id(array(&student, "journal"), &owner_id)),
    );
    out.insert(
        "habits".to_string(),
        Value::Array(stamp_student_id(array(&student, "habits"), &owner_id)),
    );

    let messages = merge_by_id(&[
        array(&student, "inbox"),
        array(&parent, "inbox"),
        array(&teacher, "inbox"),
        array(&counselor, "inbox"),
        array(&principal, "inbox"),
    ]);
    out.insert("messages".to_string(), Value::Array(messages));
    out.insert(
        "broadcasts".to_string(),
        Value::Array(array(&principal, "broadcasts")),
    );

    let reports = merge_by_id(&[
        array(&principal, "reports"),
        array(&counselor, "reports"),
        stamp_student_id(array(&student, "reports"), &owner_id),
    ]);
    out.insert("reports".to_string(), Value::Array(reports));
    out.insert(
        "safetyEvents".to_string(),
        Value::Array(array(&counselor, "safetyEvents")),
    );

    out.insert(
        "directory".to_string(),
        merge_directory(array(&teacher, "students"), array(&counselor, "students")),
    );

    let mut groups = Map::new();
    let mut crisis = Map::new();
    if !owner_id.is_empty() {
        if let Some(joined) = student.get("joinedGroups").and_then(Value::as_array) {
            groups.insert(owner_id.clone(), Value::Array(joined.clone()));
        }
        if let Some(done) = student.get("crisisActionsDone").and_then(Value::as_array) {
            crisis.insert(owner_id.clone(), Value::Array(done.clone()));
        }
    }
    out.insert("groups".to_string(), Value::Object(groups));
    out.insert("crisisActionsDone".to_string(), Value::Object(crisis));

    if let Some(config) = value.get("schoolConfig") {
        out.insert("config".to_string(), config.clone());
    }

    *value = Value::Object(out);
}

/// v1 -> v2: newer collections arrive with empty defaults.
fn migrate_v1_to_v2(value: &mut Value) {
    let Some(obj) = value.as_object_mut() else {
        return;
    };
    for key in ["sleepLogs", "configRequests"] {
        obj.entry(key.to_string()).or_insert_with(|| json!([]));
    }
    for key in ["groups", "crisisActionsDone"] {
        obj.entry(key.to_string()).or_insert_with(|| json!({}));
    }
    obj.entry("config".to_string())
        .or_insert_with(|| json!({}));
    obj.insert("version".to_string(), json!(2));
}

// ---------------------------------------------------------------------------
// Total typed parse. Malformed array elements are skipped rather than failing
// the load; malformed sections fall back to their defaults.

fn parse_state(value: &Value) -> AppState {
    let mut check_ins: Vec<CheckIn> = vec_of(value, "checkIns");
    dedupe_by(&mut check_ins, |c: &CheckIn| c.id.clone());
    check_ins.truncate(caps::CHECK_INS_CANONICAL);

    let mut sleep_logs: Vec<SleepLog> = vec_of(value, "sleepLogs");
    dedupe_by(&mut sleep_logs, |s: &SleepLog| s.id.clone());
    sleep_logs.truncate(caps::SLEEP_LOGS_CANONICAL);

    let mut journal: Vec<JournalEntry> = vec_of(value, "journal");
    dedupe_by(&mut journal, |e: &JournalEntry| e.id.clone());
    // One entry per student per day also holds for data written before the
    // core enforced it.
    dedupe_by(&mut journal, |e: &JournalEntry| {
        format!("{}\n{}", e.student_id, e.date_key)
    });

    let mut habits: Vec<Habit> = vec_of(value, "habits");
    dedupe_by(&mut habits, |h: &Habit| h.id.clone());

    let mut messages: Vec<Message> = vec_of(value, "messages");
    dedupe_by(&mut messages, |m: &Message| m.id.clone());
    messages.truncate(caps::MESSAGES);
    for message in &mut messages {
        if message.history.is_empty() {
            message.history.push(crate::model::MessageRevision {
                body: message.body.clone(),
                timestamp: message.sent_at,
            });
        }
    }

    let mut broadcasts: Vec<BroadcastItem> = vec_of(value, "broadcasts");
    dedupe_by(&mut broadcasts, |b: &BroadcastItem| b.id.clone());
    broadcasts.truncate(caps::BROADCASTS);

    let mut reports: Vec<IncidentReport> = vec_of(value, "reports");
    dedupe_by(&mut reports, |r: &IncidentReport| r.id.clone());
    reports.truncate(caps::REPORTS);

    let mut safety_events: Vec<SafetyEvent> = vec_of(value, "safetyEvents");
    dedupe_by(&mut safety_events, |e: &SafetyEvent| e.id.clone());
    safety_events.truncate(caps::SAFETY_EVENTS);

    let mut config_requests: Vec<SchoolConfigRequest> = vec_of(value, "configRequests");
    dedupe_by(&mut config_requests, |r: &SchoolConfigRequest| r.id.clone());

    let mut directory: BTreeMap<String, StudentRecord> = BTreeMap::new();
    if let Some(map) = value.get("directory").and_then(Value::as_object) {
        for (id, raw) in map {
            if let Ok(mut record) = serde_json::from_value::<StudentRecord>(raw.clone()) {
                if record.id.is_empty() {
                    record.id = id.clone();
                }
                directory.insert(id.clone(), record);
            }
        }
    }

    AppState {
        version: SNAPSHOT_VERSION,
        session: obj_or_default::<SessionState>(value, "session"),
        directory,
        check_ins,
        sleep_logs,
        journal,
        habits,
        messages,
        broadcasts,
        reports,
        safety_events,
        config: obj_or_default::<SchoolConfig>(value, "config"),
        config_requests,
        groups: string_set_map(value, "groups"),
        crisis_actions_done: string_set_map(value, "crisisActionsDone"),
    }
}

// ---------------------------------------------------------------------------
// Value helpers.

fn section(value: &Value, key: &str) -> Value {
    value.get(key).cloned().unwrap_or_else(|| json!({}))
}

fn array(value: &Value, key: &str) -> Vec<Value> {
    value
        .get(key)
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default()
}

fn merge_by_id(groups: &[Vec<Value>]) -> Vec<Value> {
    let mut seen: BTreeSet<String> = BTreeSet::new();
    let mut out = Vec::new();
    for group in groups {
        for item in group {
            let Some(id) = item.get("id").and_then(Value::as_str) else {
                continue;
            };
            if seen.insert(id.to_string()) {
                out.push(item.clone());
            }
        }
    }
    out
}

fn stamp_student_id(items: Vec<Value>, owner_id: &str) -> Vec<Value> {
    if owner_id.is_empty() {
        return items;
    }
    items
        .into_iter()
        .map(|mut item| {
            if let Some(obj) = item.as_object_mut() {
                let missing = obj
                    .get("studentId")
                    .and_then(Value::as_str)
                    .map(str::is_empty)
                    .unwrap_or(true);
                if missing {
                    obj.insert("studentId".to_string(), json!(owner_id));
                }
            }
            item
        })
        .collect()
}

fn flag_rank(flag: &str) -> u8 {
    match flag {
        "crisis" => 3,
        "red" => 2,
        "orange" => 1,
        _ => 0,
    }
}

fn merge_directory(teacher_students: Vec<Value>, counselor_students: Vec<Value>) -> Value {
    let mut map: Map<String, Value> = Map::new();
    for item in teacher_students.into_iter().chain(counselor_students) {
        let Some(id) = item.get("id").and_then(Value::as_str).map(str::to_string) else {
            continue;
        };
        if let Some(existing) = map.get_mut(&id) {
            let old = existing.get("flags").and_then(Value::as_str).unwrap_or("");
            let new = item.get("flags").and_then(Value::as_str).unwrap_or("");
            if flag_rank(new) > flag_rank(old) {
                let new = new.to_string();
                if let Some(obj) = existing.as_object_mut() {
                    obj.insert("flags".to_string(), json!(new));
                }
            }
        } else {
            map.insert(id, item);
        }
    }
    Value::Object(map)
}

fn vec_of<T: DeserializeOwned>(value: &Value, key: &str) -> Vec<T> {
    value
        .get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| serde_json::from_value(item.clone()).ok())
                .collect()
        })
        .unwrap_or_default()
}

fn obj_or_default<T: DeserializeOwned + Default>(value: &Value, key: &str) -> T {
    value
        .get(key)
        .cloned()
        .and_then(|raw| serde_json::from_value(raw).ok())
        .unwrap_or_default()
}

fn string_set_map(value: &Value, key: &str) -> BTreeMap<String, BTreeSet<String>> {
    let mut out = BTreeMap::new();
    let Some(map) = value.get(key).and_then(Value::as_object) else {
        return out;
    };
    for (id, raw) in map {
        let Some(items) = raw.as_array() else {
            continue;
        };
        let set: BTreeSet<String> = items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect();
        out.insert(id.clone(), set);
    }
    out
}

fn dedupe_by<T, K: Ord>(items: &mut Vec<T>, key: impl Fn(&T) -> K) {
    let mut seen: BTreeSet<K> = BTreeSet::new();
    items.retain(|item| seen.insert(key(item)));
}

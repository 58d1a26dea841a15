use std::collections::BTreeMap;

use crate::model::{
    AppState, BroadcastItem, FlagLevel, Message, MessageRevision, Role, SchoolConfig, StudentRecord,
};
use crate::normalize::SNAPSHOT_VERSION;

// Fixed demo epoch (2026-03-02T09:00:00Z) so the seed is byte-stable across
// runs.
const SEED_AT: i64 = 1_772_442_000_000;

fn record(id: &str, name: &str, grade: &str) -> StudentRecord {
    StudentRecord {
        id: id.to_string(),
        name: name.to_string(),
        grade: grade.to_string(),
        flags: FlagLevel::None,
        latest_feeling: None,
        phq9: None,
        gad7: None,
        cssrs: None,
        notes: String::new(),
    }
}

/// The canonical fallback dataset used when no snapshot exists or the stored
/// one cannot be read.
pub fn initial_state() -> AppState {
    let mut directory = BTreeMap::new();
    for (id, name, grade) in [
        ("stu_1", "Avery Kim", "7"),
        ("stu_2", "Jordan Lee", "8"),
        ("stu_3", "Sam Okafor", "7"),
        ("stu_4", "Riley Park", "6"),
    ] {
        directory.insert(id.to_string(), record(id, name, grade));
    }

    let welcome = BroadcastItem {
        id: "bc_welcome".to_string(),
        created_at: SEED_AT,
        title: "Wellbeing week".to_string(),
        body: "Check in once a day this week and try the breathing exercises.".to_string(),
        sent_at: SEED_AT,
        edited_at: None,
        history: vec![MessageRevision {
            body: "Check in once a day this week and try the breathing exercises.".to_string(),
            timestamp: SEED_AT,
        }],
    };
    let welcome_inbox = Message {
        id: "msg_welcome".to_string(),
        created_at: SEED_AT,
        sent_at: SEED_AT,
        from_role: Role::Principal,
        from_name: "School office".to_string(),
        to_role: Role::Student,
        to_student_id: None,
        subject: welcome.title.clone(),
        body: welcome.body.clone(),
        edited_at: None,
        history: welcome.history.clone(),
        read_at: None,
    };

    AppState {
        version: SNAPSHOT_VERSION,
        directory,
        messages: vec![welcome_inbox],
        broadcasts: vec![welcome],
        config: SchoolConfig {
            emergency_contact: "Front office: 555-0100".to_string(),
            ..SchoolConfig::default()
        },
        ..AppState::default()
    }
}

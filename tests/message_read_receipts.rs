use wellbeingd::model::{Message, Role};
use wellbeingd::{Action, Store};

fn message(id: &str, to_role: Role, to_student_id: Option<&str>) -> Message {
    Message {
        id: id.to_string(),
        created_at: 1_000,
        sent_at: 1_000,
        from_role: Role::Counselor,
        from_name: "Ms. Rivera".to_string(),
        to_role,
        to_student_id: to_student_id.map(str::to_string),
        subject: "Checking in".to_string(),
        body: "How was your week?".to_string(),
        edited_at: None,
        history: Vec::new(),
        read_at: None,
    }
}

#[test]
fn send_seeds_the_history_with_the_creation_body() {
    let mut store = Store::in_memory();
    store
        .dispatch(Action::SendMessage {
            message: message("m1", Role::Student, Some("stu_1")),
        })
        .expect("send");
    let m = store
        .state()
        .messages
        .iter()
        .find(|m| m.id == "m1")
        .expect("message");
    assert_eq!(m.history.len(), 1);
    assert_eq!(m.history[0].body, "How was your week?");
    assert_eq!(m.history[0].timestamp, 1_000);
}

#[test]
fn first_read_wins_and_later_reads_are_noops() {
    let mut store = Store::in_memory();
    store
        .dispatch(Action::SendMessage {
            message: message("m1", Role::Student, Some("stu_1")),
        })
        .expect("send");
    store
        .dispatch(Action::MarkMessageRead {
            message_id: "m1".to_string(),
            at: 5_000,
        })
        .expect("first read");
    store
        .dispatch(Action::MarkMessageRead {
            message_id: "m1".to_string(),
            at: 9_000,
        })
        .expect("second read");
    let m = store
        .state()
        .messages
        .iter()
        .find(|m| m.id == "m1")
        .expect("message");
    assert_eq!(m.read_at, Some(5_000));
}

#[test]
fn edit_appends_to_the_audit_trail() {
    let mut store = Store::in_memory();
    store
        .dispatch(Action::SendMessage {
            message: message("m1", Role::Parent, None),
        })
        .expect("send");
    store
        .dispatch(Action::EditMessage {
            message_id: "m1".to_string(),
            body: "How was your week? (edited)".to_string(),
            at: 2_000,
        })
        .expect("edit");
    let m = store
        .state()
        .messages
        .iter()
        .find(|m| m.id == "m1")
        .expect("message");
    assert_eq!(m.body, "How was your week? (edited)");
    assert_eq!(m.edited_at, Some(2_000));
    assert_eq!(m.history.len(), 2);
    assert_eq!(m.history[0].body, "How was your week?");
    assert_eq!(m.history[1].body, "How was your week? (edited)");
}

#[test]
fn student_inbox_includes_direct_and_all_student_messages() {
    let mut store = Store::in_memory();
    store
        .dispatch(Action::SendMessage {
            message: message("m_direct", Role::Student, Some("stu_1")),
        })
        .expect("send");
    store
        .dispatch(Action::SendMessage {
            message: message("m_all", Role::Student, None),
        })
        .expect("send");
    store
        .dispatch(Action::SendMessage {
            message: message("m_other", Role::Student, Some("stu_2")),
        })
        .expect("send");

    let inbox: Vec<&str> = store
        .state()
        .inbox_for_student("stu_1")
        .iter()
        .map(|m| m.id.as_str())
        .collect();
    assert!(inbox.contains(&"m_direct"));
    assert!(inbox.contains(&"m_all"));
    assert!(!inbox.contains(&"m_other"));
}

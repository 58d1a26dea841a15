use wellbeingd::model::{AgeGroup, CheckIn, Feeling};
use wellbeingd::{Action, Store};

fn check_in(id: &str, student_id: &str, at: i64, feeling: Feeling) -> CheckIn {
    CheckIn {
        id: id.to_string(),
        student_id: student_id.to_string(),
        created_at: at,
        feeling,
        age_group: AgeGroup::Ages11To17,
        answers: Default::default(),
    }
}

#[test]
fn check_in_appears_in_every_role_view_at_once() {
    let mut store = Store::in_memory();
    store
        .dispatch(Action::AddCheckIn {
            check_in: check_in("c1", "stu_1", 1_000, Feeling::Worried),
        })
        .expect("add check-in");

    let state = store.state();
    let own = state.student_check_ins("stu_1");
    let counselor = state.counselor_check_ins();
    let principal = state.principal_check_ins();

    assert_eq!(own[0].id, "c1");
    assert_eq!(counselor[0].id, "c1");
    assert_eq!(principal[0].id, "c1");
    // Views are reads over one canonical entry, so shared fields agree.
    assert_eq!(own[0], counselor[0]);
    assert_eq!(own[0], &principal[0]);
}

#[test]
fn check_in_updates_latest_feeling_on_the_shared_record() {
    let mut store = Store::in_memory();
    store
        .dispatch(Action::AddCheckIn {
            check_in: check_in("c1", "stu_2", 1_000, Feeling::Sad),
        })
        .expect("add check-in");

    // Teacher and counselor read the same directory record.
    let record = store.state().record("stu_2").expect("record");
    assert_eq!(record.latest_feeling, Some(Feeling::Sad));

    store
        .dispatch(Action::AddCheckIn {
            check_in: check_in("c2", "stu_2", 2_000, Feeling::Happy),
        })
        .expect("add check-in");
    let record = store.state().record("stu_2").expect("record");
    assert_eq!(record.latest_feeling, Some(Feeling::Happy));
}

#[test]
fn check_in_for_unknown_student_still_logs() {
    let mut store = Store::in_memory();
    store
        .dispatch(Action::AddCheckIn {
            check_in: check_in("c1", "stu_unlisted", 1_000, Feeling::Flat),
        })
        .expect("add check-in");
    assert_eq!(store.state().student_check_ins("stu_unlisted").len(), 1);
    assert!(store.state().record("stu_unlisted").is_none());
}

#[test]
fn own_view_only_shows_the_students_entries() {
    let mut store = Store::in_memory();
    for (id, student) in [("c1", "stu_1"), ("c2", "stu_2"), ("c3", "stu_1")] {
        store
            .dispatch(Action::AddCheckIn {
                check_in: check_in(id, student, 1_000, Feeling::Neutral),
            })
            .expect("add check-in");
    }
    let own: Vec<&str> = store
        .state()
        .student_check_ins("stu_1")
        .iter()
        .map(|c| c.id.as_str())
        .collect();
    assert_eq!(own, vec!["c3", "c1"]);
    assert_eq!(store.state().counselor_check_ins().len(), 3);
}

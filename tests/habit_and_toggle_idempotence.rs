use wellbeingd::model::Habit;
use wellbeingd::{Action, Store, TransitionError};

fn habit(id: &str, student_id: &str) -> Habit {
    Habit {
        id: id.to_string(),
        student_id: student_id.to_string(),
        name: "Drink water".to_string(),
        emoji: "💧".to_string(),
        created_at: 1_000,
        completed_dates: Default::default(),
    }
}

#[test]
fn toggling_a_day_twice_restores_the_original_set() {
    let mut store = Store::in_memory();
    store
        .dispatch(Action::AddHabit {
            habit: habit("h1", "stu_1"),
        })
        .expect("add habit");

    let toggle = Action::ToggleHabitDay {
        habit_id: "h1".to_string(),
        date_key: "2026-03-02".to_string(),
    };
    store.dispatch(toggle.clone()).expect("toggle on");
    assert!(store.state().habits[0]
        .completed_dates
        .contains("2026-03-02"));

    store.dispatch(toggle).expect("toggle off");
    assert!(store.state().habits[0].completed_dates.is_empty());
}

#[test]
fn group_membership_toggles_symmetrically() {
    let mut store = Store::in_memory();
    let toggle = Action::ToggleGroup {
        student_id: "stu_1".to_string(),
        group: "art-club".to_string(),
    };
    store.dispatch(toggle.clone()).expect("join");
    assert!(store
        .state()
        .groups_for("stu_1")
        .map(|g| g.contains("art-club"))
        .unwrap_or(false));
    store.dispatch(toggle).expect("leave");
    assert!(!store
        .state()
        .groups_for("stu_1")
        .map(|g| g.contains("art-club"))
        .unwrap_or(false));
}

#[test]
fn crisis_action_done_toggles_symmetrically() {
    let mut store = Store::in_memory();
    let toggle = Action::ToggleCrisisAction {
        student_id: "stu_1".to_string(),
        action_id: "call-safe-adult".to_string(),
    };
    store.dispatch(toggle.clone()).expect("done");
    store.dispatch(toggle.clone()).expect("undone");
    store.dispatch(toggle).expect("done again");
    assert!(store
        .state()
        .crisis_actions_for("stu_1")
        .map(|s| s.contains("call-safe-adult"))
        .unwrap_or(false));
}

#[test]
fn habit_rename_and_remove() {
    let mut store = Store::in_memory();
    store
        .dispatch(Action::AddHabit {
            habit: habit("h1", "stu_1"),
        })
        .expect("add habit");
    store
        .dispatch(Action::UpdateHabit {
            habit_id: "h1".to_string(),
            name: "Water bottle".to_string(),
            emoji: "🚰".to_string(),
        })
        .expect("rename");
    assert_eq!(store.state().habits[0].name, "Water bottle");

    store
        .dispatch(Action::RemoveHabit {
            habit_id: "h1".to_string(),
        })
        .expect("remove");
    assert!(store.state().habits_for("stu_1").is_empty());

    let err = store.dispatch(Action::ToggleHabitDay {
        habit_id: "h1".to_string(),
        date_key: "2026-03-02".to_string(),
    });
    assert_eq!(err, Err(TransitionError::UnknownHabit("h1".to_string())));
}

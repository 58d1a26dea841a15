use crate::model::{
    caps, AppState, CssrsResult, FlagLevel, SafetyEvent, SafetyEventKind, ScaleResult,
    StudentRecord,
};
use crate::reducer::{escalate, prepend_capped, TransitionError};

pub const PHQ9_ITEMS: usize = 9;
pub const GAD7_ITEMS: usize = 7;
pub const CSSRS_ITEMS: usize = 6;

/// Explicit staff flag set. The only path that may lower a flag; safety
/// triggers only ever raise one.
pub(super) fn set_student_flag(
    state: &mut AppState,
    student_id: &str,
    flag: FlagLevel,
) -> Result<(), TransitionError> {
    let record = record_mut(state, student_id)?;
    record.flags = flag;
    Ok(())
}

pub(super) fn set_student_notes(
    state: &mut AppState,
    student_id: &str,
    notes: String,
) -> Result<(), TransitionError> {
    let record = record_mut(state, student_id)?;
    record.notes = notes;
    Ok(())
}

pub(super) fn upsert_student(
    state: &mut AppState,
    record: StudentRecord,
) -> Result<(), TransitionError> {
    state.directory.insert(record.id.clone(), record);
    Ok(())
}

pub(super) fn remove_student(
    state: &mut AppState,
    student_id: &str,
) -> Result<(), TransitionError> {
    state
        .directory
        .remove(student_id)
        .ok_or_else(|| TransitionError::UnknownStudent(student_id.to_string()))?;
    Ok(())
}

/// Stores the raw answers verbatim and, when item 9 (self-harm ideation) is
/// answered 1 or higher, logs a safety event and forces the flag to crisis,
/// all inside this one transition.
pub(super) fn save_phq9(
    state: &mut AppState,
    student_id: &str,
    answers: Vec<i64>,
    at: i64,
    event_id: String,
) -> Result<(), TransitionError> {
    check_answer_count(PHQ9_ITEMS, answers.len())?;
    let record = record_mut(state, student_id)?;
    let q9_positive = answers[8] >= 1;
    record.phq9 = Some(ScaleResult {
        answers,
        created_at: at,
    });
    if q9_positive {
        record.flags = escalate(record.flags, FlagLevel::Crisis);
        push_safety_event(
            state,
            event_id,
            at,
            student_id,
            SafetyEventKind::Phq9Q9Positive,
        );
    }
    Ok(())
}

pub(super) fn save_gad7(
    state: &mut AppState,
    student_id: &str,
    answers: Vec<i64>,
    at: i64,
) -> Result<(), TransitionError> {
    check_answer_count(GAD7_ITEMS, answers.len())?;
    let record = record_mut(state, student_id)?;
    record.gad7 = Some(ScaleResult {
        answers,
        created_at: at,
    });
    Ok(())
}

/// C-SSRS risk tiers, highest answered tier wins:
/// items 4 (intent with plan) and 5 (behavior) -> crisis,
/// items 2-3 (active ideation with method) -> red,
/// items 0-1 (passive ideation) -> orange.
pub(super) fn save_cssrs(
    state: &mut AppState,
    student_id: &str,
    answers: Vec<bool>,
    at: i64,
    event_id: String,
) -> Result<(), TransitionError> {
    check_answer_count(CSSRS_ITEMS, answers.len())?;
    let record = record_mut(state, student_id)?;
    let tier = if answers[4] || answers[5] {
        Some(FlagLevel::Crisis)
    } else if answers[2] || answers[3] {
        Some(FlagLevel::Red)
    } else if answers[0] || answers[1] {
        Some(FlagLevel::Orange)
    } else {
        None
    };
    record.cssrs = Some(CssrsResult {
        answers,
        created_at: at,
    });
    if let Some(tier) = tier {
        record.flags = escalate(record.flags, tier);
        push_safety_event(
            state,
            event_id,
            at,
            student_id,
            SafetyEventKind::CssrsPositive,
        );
    }
    Ok(())
}

pub(super) fn add_safety_event(
    state: &mut AppState,
    event: SafetyEvent,
) -> Result<(), TransitionError> {
    prepend_capped(&mut state.safety_events, event, caps::SAFETY_EVENTS);
    Ok(())
}

fn push_safety_event(
    state: &mut AppState,
    id: String,
    at: i64,
    student_id: &str,
    kind: SafetyEventKind,
) {
    prepend_capped(
        &mut state.safety_events,
        SafetyEvent {
            id,
            created_at: at,
            student_id: student_id.to_string(),
            kind,
            shown_helplines: true,
            shown_messages: true,
            shown_suggestions: true,
        },
        caps::SAFETY_EVENTS,
    );
}

fn record_mut<'a>(
    state: &'a mut AppState,
    student_id: &str,
) -> Result<&'a mut StudentRecord, TransitionError> {
    state
        .directory
        .get_mut(student_id)
        .ok_or_else(|| TransitionError::UnknownStudent(student_id.to_string()))
}

fn check_answer_count(expected: usize, got: usize) -> Result<(), TransitionError> {
    if expected != got {
        return Err(TransitionError::InvalidAnswerCount { expected, got });
    }
    Ok(())
}

use crate::model::{
    caps, AppState, CheckIn, Habit, IncidentReport, JournalEntry, ReportStatus, SleepLog,
};
use crate::reducer::{prepend_capped, stamp_once, TransitionError};

/// Appends a check-in and, in the same transition, propagates the feeling to
/// the student's directory record. The counselor and principal aggregates
/// are views over the same canonical log, so every role sees this check-in
/// at once or not at all.
pub(super) fn add_check_in(state: &mut AppState, check_in: CheckIn) -> Result<(), TransitionError> {
    if let Some(record) = state.directory.get_mut(&check_in.student_id) {
        record.latest_feeling = Some(check_in.feeling);
    }
    prepend_capped(&mut state.check_ins, check_in, caps::CHECK_INS_CANONICAL);
    Ok(())
}

pub(super) fn add_sleep_log(state: &mut AppState, log: SleepLog) -> Result<(), TransitionError> {
    prepend_capped(&mut state.sleep_logs, log, caps::SLEEP_LOGS_CANONICAL);
    Ok(())
}

/// One entry per student per calendar day.
pub(super) fn add_journal(state: &mut AppState, entry: JournalEntry) -> Result<(), TransitionError> {
    if state
        .journal_entry_for_day(&entry.student_id, &entry.date_key)
        .is_some()
    {
        return Err(TransitionError::DuplicateJournalDay(entry.date_key));
    }
    state.journal.insert(0, entry);
    Ok(())
}

pub(super) fn update_journal(
    state: &mut AppState,
    student_id: &str,
    entry_id: &str,
    title: String,
    content: String,
    at: i64,
) -> Result<(), TransitionError> {
    let entry = state
        .journal
        .iter_mut()
        .find(|e| e.id == entry_id && e.student_id == student_id)
        .ok_or_else(|| TransitionError::UnknownJournalEntry(entry_id.to_string()))?;
    if entry.locked_at(at) {
        return Err(TransitionError::JournalLocked(entry_id.to_string()));
    }
    entry.title = title;
    entry.content = content;
    entry.updated_at = Some(at);
    Ok(())
}

pub(super) fn delete_journal(
    state: &mut AppState,
    student_id: &str,
    entry_id: &str,
    at: i64,
) -> Result<(), TransitionError> {
    let idx = state
        .journal
        .iter()
        .position(|e| e.id == entry_id && e.student_id == student_id)
        .ok_or_else(|| TransitionError::UnknownJournalEntry(entry_id.to_string()))?;
    if state.journal[idx].locked_at(at) {
        return Err(TransitionError::JournalLocked(entry_id.to_string()));
    }
    state.journal.remove(idx);
    Ok(())
}

pub(super) fn add_habit(state: &mut AppState, habit: Habit) -> Result<(), TransitionError> {
    state.habits.insert(0, habit);
    Ok(())
}

pub(super) fn update_habit(
    state: &mut AppState,
    habit_id: &str,
    name: String,
    emoji: String,
) -> Result<(), TransitionError> {
    let habit = state
        .habits
        .iter_mut()
        .find(|h| h.id == habit_id)
        .ok_or_else(|| TransitionError::UnknownHabit(habit_id.to_string()))?;
    habit.name = name;
    habit.emoji = emoji;
    Ok(())
}

pub(super) fn remove_habit(state: &mut AppState, habit_id: &str) -> Result<(), TransitionError> {
    let idx = state
        .habits
        .iter()
        .position(|h| h.id == habit_id)
        .ok_or_else(|| TransitionError::UnknownHabit(habit_id.to_string()))?;
    state.habits.remove(idx);
    Ok(())
}

/// Symmetric per-day toggle: a date already present is removed, otherwise
/// added. Applying twice restores the original set.
pub(super) fn toggle_habit_day(
    state: &mut AppState,
    habit_id: &str,
    date_key: String,
) -> Result<(), TransitionError> {
    let habit = state
        .habits
        .iter_mut()
        .find(|h| h.id == habit_id)
        .ok_or_else(|| TransitionError::UnknownHabit(habit_id.to_string()))?;
    if !habit.completed_dates.remove(&date_key) {
        habit.completed_dates.insert(date_key);
    }
    Ok(())
}

pub(super) fn toggle_group(
    state: &mut AppState,
    student_id: String,
    group: String,
) -> Result<(), TransitionError> {
    let set = state.groups.entry(student_id).or_default();
    if !set.remove(&group) {
        set.insert(group);
    }
    Ok(())
}

pub(super) fn toggle_crisis_action(
    state: &mut AppState,
    student_id: String,
    action_id: String,
) -> Result<(), TransitionError> {
    let set = state.crisis_actions_done.entry(student_id).or_default();
    if !set.remove(&action_id) {
        set.insert(action_id);
    }
    Ok(())
}

/// A submission always enters the pipeline as `received`, whatever the
/// payload claims, with none of the school-side stamps set.
pub(super) fn submit_report(
    state: &mut AppState,
    mut report: IncidentReport,
) -> Result<(), TransitionError> {
    report.status = ReportStatus::Received;
    report.read_at_by_school = None;
    report.closed_at = None;
    report.closure_note = None;
    prepend_capped(&mut state.reports, report, caps::REPORTS);
    Ok(())
}

pub(super) fn mark_message_read(
    state: &mut AppState,
    message_id: &str,
    at: i64,
) -> Result<(), TransitionError> {
    let message = state
        .messages
        .iter_mut()
        .find(|m| m.id == message_id)
        .ok_or_else(|| TransitionError::UnknownMessage(message_id.to_string()))?;
    stamp_once(&mut message.read_at, at);
    Ok(())
}

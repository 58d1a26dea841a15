mod config;
mod messaging;
mod reports;
mod session;
mod staff;
mod student;

use thiserror::Error;

use crate::action::Action;
use crate::model::{AppState, FlagLevel, ReportStatus};

/// A transition the reducer refuses to apply. When any of these is returned
/// the state is untouched.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransitionError {
    #[error("unknown student: {0}")]
    UnknownStudent(String),
    #[error("unknown journal entry: {0}")]
    UnknownJournalEntry(String),
    #[error("unknown habit: {0}")]
    UnknownHabit(String),
    #[error("unknown message: {0}")]
    UnknownMessage(String),
    #[error("unknown broadcast: {0}")]
    UnknownBroadcast(String),
    #[error("unknown report: {0}")]
    UnknownReport(String),
    #[error("unknown config request: {0}")]
    UnknownConfigRequest(String),
    #[error("a journal entry already exists for {0}")]
    DuplicateJournalDay(String),
    #[error("journal entry {0} can no longer be edited")]
    JournalLocked(String),
    #[error("closure note must not be empty")]
    EmptyClosureNote,
    #[error("invalid report status transition: {from:?} -> {to:?}")]
    InvalidStatusTransition {
        from: ReportStatus,
        to: ReportStatus,
    },
    #[error("config request {0} was already decided")]
    RequestAlreadyDecided(String),
    #[error("questionnaire expects {expected} answers, got {got}")]
    InvalidAnswerCount { expected: usize, got: usize },
}

/// The state-transition function. Deterministic in (state, action): no
/// clock, no randomness; ids and timestamps arrive inside the action.
/// Every transition is all-or-nothing; on `Err` the tree is unchanged.
pub fn reduce(state: &mut AppState, action: Action) -> Result<(), TransitionError> {
    match action {
        Action::SelectRole { role } => session::select_role(state, role),
        Action::Login { id, name } => session::login(state, id, name),
        Action::Logout => session::logout(state),
        Action::Reset => session::reset(state),

        Action::AddCheckIn { check_in } => student::add_check_in(state, check_in),
        Action::AddSleepLog { log } => student::add_sleep_log(state, log),
        Action::AddJournal { entry } => student::add_journal(state, entry),
        Action::UpdateJournal {
            student_id,
            entry_id,
            title,
            content,
            at,
        } => student::update_journal(state, &student_id, &entry_id, title, content, at),
        Action::DeleteJournal {
            student_id,
            entry_id,
            at,
        } => student::delete_journal(state, &student_id, &entry_id, at),
        Action::AddHabit { habit } => student::add_habit(state, habit),
        Action::UpdateHabit {
            habit_id,
            name,
            emoji,
        } => student::update_habit(state, &habit_id, name, emoji),
        Action::RemoveHabit { habit_id } => student::remove_habit(state, &habit_id),
        Action::ToggleHabitDay { habit_id, date_key } => {
            student::toggle_habit_day(state, &habit_id, date_key)
        }
        Action::ToggleGroup { student_id, group } => {
            student::toggle_group(state, student_id, group)
        }
        Action::ToggleCrisisAction {
            student_id,
            action_id,
        } => student::toggle_crisis_action(state, student_id, action_id),
        Action::SubmitReport { report } => student::submit_report(state, report),
        Action::MarkMessageRead { message_id, at } => {
            student::mark_message_read(state, &message_id, at)
        }

        Action::SetStudentFlag { student_id, flag } => {
            staff::set_student_flag(state, &student_id, flag)
        }
        Action::SetStudentNotes { student_id, notes } => {
            staff::set_student_notes(state, &student_id, notes)
        }
        Action::UpsertStudent { record } => staff::upsert_student(state, record),
        Action::RemoveStudent { student_id } => staff::remove_student(state, &student_id),

        Action::SavePhq9 {
            student_id,
            answers,
            at,
            event_id,
        } => staff::save_phq9(state, &student_id, answers, at, event_id),
        Action::SaveGad7 {
            student_id,
            answers,
            at,
        } => staff::save_gad7(state, &student_id, answers, at),
        Action::SaveCssrs {
            student_id,
            answers,
            at,
            event_id,
        } => staff::save_cssrs(state, &student_id, answers, at, event_id),
        Action::AddSafetyEvent { event } => staff::add_safety_event(state, event),

        Action::SendMessage { message } => messaging::send_message(state, message),
        Action::EditMessage {
            message_id,
            body,
            at,
        } => messaging::edit_message(state, &message_id, body, at),
        Action::SendBroadcast {
            broadcast,
            inbox_message_id,
            from_name,
        } => messaging::send_broadcast(state, broadcast, inbox_message_id, from_name),
        Action::EditBroadcast {
            broadcast_id,
            title,
            body,
            at,
        } => messaging::edit_broadcast(state, &broadcast_id, title, body, at),

        Action::SetReportStatus {
            report_id,
            status,
            at,
        } => reports::set_status(state, &report_id, status, at),
        Action::ResolveReport { report_id, note, at } => {
            reports::resolve(state, &report_id, note, at)
        }
        Action::MarkReportReadBySchool { report_id, at } => {
            reports::mark_read_by_school(state, &report_id, at)
        }

        Action::UpdateConfig { config } => config::update(state, config),
        Action::RequestConfigChange { request } => config::request_change(state, request),
        Action::ApproveConfigRequest { request_id, at } => {
            config::approve_request(state, &request_id, at)
        }
        Action::RejectConfigRequest { request_id, at } => {
            config::reject_request(state, &request_id, at)
        }
    }
}

/// Prepend to a newest-first log, trimming the tail at the cap.
pub(crate) fn prepend_capped<T>(log: &mut Vec<T>, item: T, cap: usize) {
    log.insert(0, item);
    log.truncate(cap);
}

/// One-way flag merge: escalations never lower an existing flag.
pub(crate) fn escalate(current: FlagLevel, proposed: FlagLevel) -> FlagLevel {
    current.max(proposed)
}

/// First-write-wins timestamp: re-marking keeps the original.
pub(crate) fn stamp_once(slot: &mut Option<i64>, at: i64) {
    if slot.is_none() {
        *slot = Some(at);
    }
}

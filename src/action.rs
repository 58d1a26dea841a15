use serde::{Deserialize, Serialize};

use crate::model::{
    BroadcastItem, CheckIn, FlagLevel, Habit, IncidentReport, JournalEntry, Message, ReportStatus,
    Role, SafetyEvent, SchoolConfig, SchoolConfigRequest, SleepLog, StudentRecord,
};

/// The closed action vocabulary: one variant per user-visible mutation.
///
/// Every action carries exactly the data its effect needs. Callers supply
/// all timestamps and generated ids, so the reducer is a deterministic
/// function of (state, action). A new variant without a reducer branch is a
/// compile error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Action {
    // Session.
    #[serde(rename = "session/selectRole")]
    SelectRole { role: Role },
    #[serde(rename = "session/login")]
    Login { id: String, name: String },
    #[serde(rename = "session/logout")]
    Logout,
    #[serde(rename = "session/reset")]
    Reset,

    // Student.
    #[serde(rename = "student/addCheckIn", rename_all = "camelCase")]
    AddCheckIn { check_in: CheckIn },
    #[serde(rename = "student/addSleepLog")]
    AddSleepLog { log: SleepLog },
    #[serde(rename = "student/addJournal")]
    AddJournal { entry: JournalEntry },
    #[serde(rename = "student/updateJournal", rename_all = "camelCase")]
    UpdateJournal {
        student_id: String,
        entry_id: String,
        title: String,
        content: String,
        at: i64,
    },
    #[serde(rename = "student/deleteJournal", rename_all = "camelCase")]
    DeleteJournal {
        student_id: String,
        entry_id: String,
        at: i64,
    },
    #[serde(rename = "student/addHabit")]
    AddHabit { habit: Habit },
    #[serde(rename = "student/updateHabit", rename_all = "camelCase")]
    UpdateHabit {
        habit_id: String,
        name: String,
        emoji: String,
    },
    #[serde(rename = "student/removeHabit", rename_all = "camelCase")]
    RemoveHabit { habit_id: String },
    #[serde(rename = "student/toggleHabitDay", rename_all = "camelCase")]
    ToggleHabitDay { habit_id: String, date_key: String },
    #[serde(rename = "student/toggleGroup", rename_all = "camelCase")]
    ToggleGroup { student_id: String, group: String },
    #[serde(rename = "student/toggleCrisisAction", rename_all = "camelCase")]
    ToggleCrisisAction {
        student_id: String,
        action_id: String,
    },
    #[serde(rename = "student/submitReport")]
    SubmitReport { report: IncidentReport },
    #[serde(rename = "student/markMessageRead", rename_all = "camelCase")]
    MarkMessageRead { message_id: String, at: i64 },

    // Teacher / admin.
    #[serde(rename = "teacher/setStudentFlag", rename_all = "camelCase")]
    SetStudentFlag { student_id: String, flag: FlagLevel },
    #[serde(rename = "teacher/setStudentNotes", rename_all = "camelCase")]
    SetStudentNotes { student_id: String, notes: String },
    #[serde(rename = "admin/upsertStudent")]
    UpsertStudent { record: StudentRecord },
    #[serde(rename = "admin/removeStudent", rename_all = "camelCase")]
    RemoveStudent { student_id: String },

    // Counselor questionnaires.
    #[serde(rename = "counselor/savePhq9", rename_all = "camelCase")]
    SavePhq9 {
        student_id: String,
        answers: Vec<i64>,
        at: i64,
        /// Id for the safety event a positive item 9 creates; unused otherwise.
        event_id: String,
    },
    #[serde(rename = "counselor/saveGad7", rename_all = "camelCase")]
    SaveGad7 {
        student_id: String,
        answers: Vec<i64>,
        at: i64,
    },
    #[serde(rename = "counselor/saveCssrs", rename_all = "camelCase")]
    SaveCssrs {
        student_id: String,
        answers: Vec<bool>,
        at: i64,
        event_id: String,
    },
    #[serde(rename = "counselor/addSafetyEvent")]
    AddSafetyEvent { event: SafetyEvent },

    // Messaging.
    #[serde(rename = "messages/send")]
    SendMessage { message: Message },
    #[serde(rename = "messages/edit", rename_all = "camelCase")]
    EditMessage {
        message_id: String,
        body: String,
        at: i64,
    },
    #[serde(rename = "broadcasts/send", rename_all = "camelCase")]
    SendBroadcast {
        broadcast: BroadcastItem,
        /// Id of the single inbox message the send fans out.
        inbox_message_id: String,
        from_name: String,
    },
    #[serde(rename = "broadcasts/edit", rename_all = "camelCase")]
    EditBroadcast {
        broadcast_id: String,
        title: String,
        body: String,
        at: i64,
    },

    // Incident reports.
    #[serde(rename = "reports/setStatus", rename_all = "camelCase")]
    SetReportStatus {
        report_id: String,
        status: ReportStatus,
        at: i64,
    },
    #[serde(rename = "reports/resolve", rename_all = "camelCase")]
    ResolveReport {
        report_id: String,
        note: String,
        at: i64,
    },
    #[serde(rename = "reports/markReadBySchool", rename_all = "camelCase")]
    MarkReportReadBySchool { report_id: String, at: i64 },

    // School configuration.
    #[serde(rename = "config/update")]
    UpdateConfig { config: SchoolConfig },
    #[serde(rename = "config/requestChange")]
    RequestConfigChange { request: SchoolConfigRequest },
    #[serde(rename = "config/approveRequest", rename_all = "camelCase")]
    ApproveConfigRequest { request_id: String, at: i64 },
    #[serde(rename = "config/rejectRequest", rename_all = "camelCase")]
    RejectConfigRequest { request_id: String, at: i64 },
}

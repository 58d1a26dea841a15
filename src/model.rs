use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Collection caps. Canonical logs hold the largest role view; the smaller
/// per-role caps are applied when a view is read.
pub mod caps {
    pub const CHECK_INS_CANONICAL: usize = 1200;
    pub const CHECK_INS_STUDENT_VIEW: usize = 200;
    pub const CHECK_INS_COUNSELOR_VIEW: usize = 800;
    pub const SLEEP_LOGS_CANONICAL: usize = 1200;
    pub const SLEEP_LOGS_STUDENT_VIEW: usize = 200;
    pub const SLEEP_LOGS_COUNSELOR_VIEW: usize = 800;
    pub const MESSAGES: usize = 500;
    pub const BROADCASTS: usize = 200;
    pub const REPORTS: usize = 300;
    pub const SAFETY_EVENTS: usize = 400;
}

/// Millisecond lifetime of a journal entry's edit window.
pub const JOURNAL_EDIT_WINDOW_MS: i64 = 24 * 60 * 60 * 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Role {
    Student,
    Teacher,
    Parent,
    Counselor,
    Principal,
    Admin,
}

impl From<String> for Role {
    fn from(s: String) -> Self {
        match s.as_str() {
            "teacher" => Role::Teacher,
            "parent" => Role::Parent,
            "counselor" => Role::Counselor,
            "principal" => Role::Principal,
            "admin" => Role::Admin,
            // "student" and anything unrecognized.
            _ => Role::Student,
        }
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::Student
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct User {
    pub id: String,
    pub name: String,
    pub role: Role,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Feeling {
    Happy,
    Neutral,
    Flat,
    Worried,
    Sad,
}

impl From<String> for Feeling {
    fn from(s: String) -> Self {
        match s.as_str() {
            "happy" => Feeling::Happy,
            "flat" => Feeling::Flat,
            "worried" => Feeling::Worried,
            "sad" => Feeling::Sad,
            _ => Feeling::Neutral,
        }
    }
}

impl Default for Feeling {
    fn default() -> Self {
        Feeling::Neutral
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String")]
pub enum AgeGroup {
    #[serde(rename = "6-10")]
    Ages6To10,
    #[serde(rename = "11-17")]
    Ages11To17,
}

impl From<String> for AgeGroup {
    fn from(s: String) -> Self {
        match s.as_str() {
            "6-10" => AgeGroup::Ages6To10,
            _ => AgeGroup::Ages11To17,
        }
    }
}

impl Default for AgeGroup {
    fn default() -> Self {
        AgeGroup::Ages11To17
    }
}

/// Open answer bag keyed by question. Known keys: `mood_cause`, `stressors`
/// (comma-separated selections), `safe_adult`, `one_good_thing`,
/// `body_feeling`, `talked_to_someone`.
pub type CheckInAnswers = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CheckIn {
    pub id: String,
    pub student_id: String,
    pub created_at: i64,
    pub feeling: Feeling,
    pub age_group: AgeGroup,
    pub answers: CheckInAnswers,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum SleepQuality {
    Great,
    Ok,
    Poor,
}

impl From<String> for SleepQuality {
    fn from(s: String) -> Self {
        match s.as_str() {
            "great" => SleepQuality::Great,
            "poor" => SleepQuality::Poor,
            _ => SleepQuality::Ok,
        }
    }
}

impl Default for SleepQuality {
    fn default() -> Self {
        SleepQuality::Ok
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SleepLog {
    pub id: String,
    pub student_id: String,
    pub created_at: i64,
    pub date_key: String,
    pub hours_slept: f64,
    pub quality: SleepQuality,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JournalEntry {
    pub id: String,
    pub student_id: String,
    pub title: String,
    pub content: String,
    pub created_at: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<i64>,
    /// Calendar day key (`YYYY-MM-DD`). At most one entry per student per key.
    pub date_key: String,
}

impl JournalEntry {
    /// The edit lock is derived, never stored: entries stay editable for 24h
    /// after creation.
    pub fn locked_at(&self, now: i64) -> bool {
        now - self.created_at > JOURNAL_EDIT_WINDOW_MS
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Habit {
    pub id: String,
    pub student_id: String,
    pub name: String,
    pub emoji: String,
    pub created_at: i64,
    pub completed_dates: BTreeSet<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MessageRevision {
    pub body: String,
    pub timestamp: i64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Message {
    pub id: String,
    pub created_at: i64,
    pub sent_at: i64,
    pub from_role: Role,
    pub from_name: String,
    pub to_role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_student_id: Option<String>,
    pub subject: String,
    pub body: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edited_at: Option<i64>,
    /// Append-only audit trail; always holds at least the body at creation.
    pub history: Vec<MessageRevision>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_at: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BroadcastItem {
    pub id: String,
    pub created_at: i64,
    pub title: String,
    pub body: String,
    pub sent_at: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edited_at: Option<i64>,
    pub history: Vec<MessageRevision>,
}

/// Severity marker on a student record. Ordering matters: questionnaire
/// triggers merge upward and never lower an existing flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum FlagLevel {
    None,
    Orange,
    Red,
    Crisis,
}

impl From<String> for FlagLevel {
    fn from(s: String) -> Self {
        match s.as_str() {
            "orange" => FlagLevel::Orange,
            "red" => FlagLevel::Red,
            "crisis" => FlagLevel::Crisis,
            _ => FlagLevel::None,
        }
    }
}

impl Default for FlagLevel {
    fn default() -> Self {
        FlagLevel::None
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScaleResult {
    pub answers: Vec<i64>,
    pub created_at: i64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CssrsResult {
    pub answers: Vec<bool>,
    pub created_at: i64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StudentRecord {
    pub id: String,
    pub name: String,
    pub grade: String,
    pub flags: FlagLevel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_feeling: Option<Feeling>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phq9: Option<ScaleResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gad7: Option<ScaleResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cssrs: Option<CssrsResult>,
    pub notes: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum SafetyEventKind {
    Phq9Q9Positive,
    CssrsPositive,
}

impl From<String> for SafetyEventKind {
    fn from(s: String) -> Self {
        match s.as_str() {
            "cssrs_positive" => SafetyEventKind::CssrsPositive,
            _ => SafetyEventKind::Phq9Q9Positive,
        }
    }
}

impl Default for SafetyEventKind {
    fn default() -> Self {
        SafetyEventKind::Phq9Q9Positive
    }
}

/// Audit record written when a questionnaire answer crosses a risk
/// threshold. Immutable once created.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SafetyEvent {
    pub id: String,
    pub created_at: i64,
    pub student_id: String,
    pub kind: SafetyEventKind,
    pub shown_helplines: bool,
    pub shown_messages: bool,
    pub shown_suggestions: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum ReportStatus {
    Received,
    Reviewing,
    Resolved,
}

impl From<String> for ReportStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "reviewing" => ReportStatus::Reviewing,
            "resolved" => ReportStatus::Resolved,
            _ => ReportStatus::Received,
        }
    }
}

impl Default for ReportStatus {
    fn default() -> Self {
        ReportStatus::Received
    }
}

/// `student_id` records ownership even for anonymous reports; `anonymous`
/// governs staff- and parent-facing attribution, not storage.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IncidentReport {
    pub id: String,
    pub student_id: String,
    pub created_at: i64,
    pub kind: String,
    pub description: String,
    pub anonymous: bool,
    pub status: ReportStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_at_by_school: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closed_at: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closure_note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SchoolConfig {
    pub checkins_visible_to_parents: bool,
    pub journals_visible_to_counselor: bool,
    pub broadcasts_enabled: bool,
    pub incident_reports_enabled: bool,
    pub emergency_contact: String,
}

impl Default for SchoolConfig {
    fn default() -> Self {
        Self {
            checkins_visible_to_parents: false,
            journals_visible_to_counselor: false,
            broadcasts_enabled: true,
            incident_reports_enabled: true,
            emergency_contact: String::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
}

impl From<String> for RequestStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "approved" => RequestStatus::Approved,
            "rejected" => RequestStatus::Rejected,
            _ => RequestStatus::Pending,
        }
    }
}

impl Default for RequestStatus {
    fn default() -> Self {
        RequestStatus::Pending
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SchoolConfigRequest {
    pub id: String,
    pub requested_by: String,
    pub created_at: i64,
    pub config: SchoolConfig,
    pub status: RequestStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decided_at: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionState {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pending_role: Option<Role>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
}

/// The whole application state. Mirrored entities live once in canonical
/// collections; role views are derived reads, so mirrors cannot diverge.
/// Canonical logs are prepend-ordered (newest first) and capped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppState {
    pub version: i64,
    pub session: SessionState,
    /// Canonical student records, shared by the teacher and counselor views.
    pub directory: BTreeMap<String, StudentRecord>,
    pub check_ins: Vec<CheckIn>,
    pub sleep_logs: Vec<SleepLog>,
    pub journal: Vec<JournalEntry>,
    pub habits: Vec<Habit>,
    pub messages: Vec<Message>,
    pub broadcasts: Vec<BroadcastItem>,
    pub reports: Vec<IncidentReport>,
    pub safety_events: Vec<SafetyEvent>,
    pub config: SchoolConfig,
    pub config_requests: Vec<SchoolConfigRequest>,
    /// Per-student wellbeing-group membership.
    pub groups: BTreeMap<String, BTreeSet<String>>,
    /// Per-student set of completed crisis-plan action ids.
    pub crisis_actions_done: BTreeMap<String, BTreeSet<String>>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            version: crate::normalize::SNAPSHOT_VERSION,
            session: SessionState::default(),
            directory: BTreeMap::new(),
            check_ins: Vec::new(),
            sleep_logs: Vec::new(),
            journal: Vec::new(),
            habits: Vec::new(),
            messages: Vec::new(),
            broadcasts: Vec::new(),
            reports: Vec::new(),
            safety_events: Vec::new(),
            config: SchoolConfig::default(),
            config_requests: Vec::new(),
            groups: BTreeMap::new(),
            crisis_actions_done: BTreeMap::new(),
        }
    }
}

impl AppState {
    pub fn record(&self, student_id: &str) -> Option<&StudentRecord> {
        self.directory.get(student_id)
    }

    /// A student's own check-ins, newest first, capped at the student view
    /// size.
    pub fn student_check_ins(&self, student_id: &str) -> Vec<&CheckIn> {
        self.check_ins
            .iter()
            .filter(|c| c.student_id == student_id)
            .take(caps::CHECK_INS_STUDENT_VIEW)
            .collect()
    }

    pub fn counselor_check_ins(&self) -> Vec<&CheckIn> {
        self.check_ins
            .iter()
            .take(caps::CHECK_INS_COUNSELOR_VIEW)
            .collect()
    }

    pub fn principal_check_ins(&self) -> &[CheckIn] {
        &self.check_ins
    }

    pub fn student_sleep_logs(&self, student_id: &str) -> Vec<&SleepLog> {
        self.sleep_logs
            .iter()
            .filter(|s| s.student_id == student_id)
            .take(caps::SLEEP_LOGS_STUDENT_VIEW)
            .collect()
    }

    pub fn counselor_sleep_logs(&self) -> Vec<&SleepLog> {
        self.sleep_logs
            .iter()
            .take(caps::SLEEP_LOGS_COUNSELOR_VIEW)
            .collect()
    }

    pub fn journal_for(&self, student_id: &str) -> Vec<&JournalEntry> {
        self.journal
            .iter()
            .filter(|e| e.student_id == student_id)
            .collect()
    }

    pub fn journal_entry_for_day(&self, student_id: &str, date_key: &str) -> Option<&JournalEntry> {
        self.journal
            .iter()
            .find(|e| e.student_id == student_id && e.date_key == date_key)
    }

    pub fn habits_for(&self, student_id: &str) -> Vec<&Habit> {
        self.habits
            .iter()
            .filter(|h| h.student_id == student_id)
            .collect()
    }

    /// Messages delivered to a student: direct messages plus broadcasts
    /// addressed to the whole student body (`to_student_id` absent).
    pub fn inbox_for_student(&self, student_id: &str) -> Vec<&Message> {
        self.messages
            .iter()
            .filter(|m| {
                m.to_role == Role::Student
                    && m.to_student_id
                        .as_deref()
                        .map(|id| id == student_id)
                        .unwrap_or(true)
            })
            .collect()
    }

    pub fn inbox_for_role(&self, role: Role) -> Vec<&Message> {
        self.messages.iter().filter(|m| m.to_role == role).collect()
    }

    pub fn reports_for_student(&self, student_id: &str) -> Vec<&IncidentReport> {
        self.reports
            .iter()
            .filter(|r| r.student_id == student_id)
            .collect()
    }

    /// Counselor/principal view: every report, anonymous ones included.
    pub fn school_reports(&self) -> &[IncidentReport] {
        &self.reports
    }

    /// Parent view: only non-anonymous reports of their child.
    pub fn parent_reports(&self, child_id: &str) -> Vec<&IncidentReport> {
        self.reports
            .iter()
            .filter(|r| !r.anonymous && r.student_id == child_id)
            .collect()
    }

    pub fn groups_for(&self, student_id: &str) -> Option<&BTreeSet<String>> {
        self.groups.get(student_id)
    }

    pub fn crisis_actions_for(&self, student_id: &str) -> Option<&BTreeSet<String>> {
        self.crisis_actions_done.get(student_id)
    }
}

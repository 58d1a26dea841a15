use crate::model::{AppState, IncidentReport, ReportStatus};
use crate::reducer::{stamp_once, TransitionError};

/// Forward transitions plus the single re-open path
/// (`resolved -> reviewing`). Resolution requires a closure note and only
/// happens through [`resolve`]. Same-status transitions are no-ops.
pub(super) fn set_status(
    state: &mut AppState,
    report_id: &str,
    status: ReportStatus,
    at: i64,
) -> Result<(), TransitionError> {
    let report = report_mut(state, report_id)?;
    if report.status == status {
        return Ok(());
    }
    match (report.status, status) {
        (ReportStatus::Received, ReportStatus::Reviewing)
        | (ReportStatus::Resolved, ReportStatus::Reviewing) => {
            report.status = ReportStatus::Reviewing;
            stamp_once(&mut report.read_at_by_school, at);
            Ok(())
        }
        // Closing needs a note; that path is reports/resolve.
        (from, to) => Err(TransitionError::InvalidStatusTransition { from, to }),
    }
}

/// Stamps `closed_at` and the closure note, back-filling the school read
/// receipt, atomically for every role that can see this report.
/// `closed_at`/`closure_note` survive a later re-open so history stays
/// inspectable.
pub(super) fn resolve(
    state: &mut AppState,
    report_id: &str,
    note: String,
    at: i64,
) -> Result<(), TransitionError> {
    if note.trim().is_empty() {
        return Err(TransitionError::EmptyClosureNote);
    }
    let report = report_mut(state, report_id)?;
    if report.status == ReportStatus::Resolved {
        return Err(TransitionError::InvalidStatusTransition {
            from: ReportStatus::Resolved,
            to: ReportStatus::Resolved,
        });
    }
    report.status = ReportStatus::Resolved;
    report.closed_at = Some(at);
    report.closure_note = Some(note);
    stamp_once(&mut report.read_at_by_school, at);
    Ok(())
}

pub(super) fn mark_read_by_school(
    state: &mut AppState,
    report_id: &str,
    at: i64,
) -> Result<(), TransitionError> {
    let report = report_mut(state, report_id)?;
    stamp_once(&mut report.read_at_by_school, at);
    Ok(())
}

fn report_mut<'a>(
    state: &'a mut AppState,
    report_id: &str,
) -> Result<&'a mut IncidentReport, TransitionError> {
    state
        .reports
        .iter_mut()
        .find(|r| r.id == report_id)
        .ok_or_else(|| TransitionError::UnknownReport(report_id.to_string()))
}

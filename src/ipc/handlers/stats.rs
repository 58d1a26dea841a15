use chrono::Utc;
use serde_json::json;

use crate::calc;
use crate::ipc::error::ok;
use crate::ipc::handlers::core::selected_store;
use crate::ipc::handlers::{get_required_str, HandlerErr};
use crate::ipc::types::{AppHandle, Request};

pub fn try_handle(app: &mut AppHandle, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "stats.habitStreak" => Some(respond(app, req, habit_streak)),
        "stats.weeklyFeelings" => Some(respond(app, req, weekly_feelings)),
        "stats.topStressors" => Some(respond(app, req, top_stressors)),
        _ => None,
    }
}

fn respond(
    app: &mut AppHandle,
    req: &Request,
    f: fn(&mut AppHandle, &Request) -> Result<serde_json::Value, HandlerErr>,
) -> serde_json::Value {
    match f(app, req) {
        Ok(result) => ok(&req.id, result),
        Err(e) => e.response(&req.id),
    }
}

fn habit_streak(app: &mut AppHandle, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let habit_id = get_required_str(&req.params, "habitId")?;
    let store = selected_store(app)?;
    let habit = store
        .state()
        .habits
        .iter()
        .find(|h| h.id == habit_id)
        .ok_or_else(|| HandlerErr::bad_params(format!("unknown habit: {}", habit_id)))?;
    let today = Utc::now().date_naive();
    Ok(json!({
        "streak": calc::streak(&habit.completed_dates, today),
        "activeDays": calc::active_day_count(&habit.completed_dates),
    }))
}

fn weekly_feelings(app: &mut AppHandle, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let student_id = get_required_str(&req.params, "studentId")?;
    let store = selected_store(app)?;
    let today = Utc::now().date_naive();
    let counts = calc::weekly_feelings(&store.state().check_ins, &student_id, today);
    Ok(json!({ "counts": counts }))
}

fn top_stressors(app: &mut AppHandle, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let student_id = get_required_str(&req.params, "studentId")?;
    let store = selected_store(app)?;
    let tallies: Vec<serde_json::Value> = calc::top_stressors(&store.state().check_ins, &student_id)
        .into_iter()
        .map(|(category, count)| json!({ "category": category, "count": count }))
        .collect();
    Ok(json!({ "stressors": tallies }))
}

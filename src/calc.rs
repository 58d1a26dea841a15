use std::collections::BTreeSet;

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::model::{CheckIn, Feeling};

/// Lookback bound for streak walking.
pub const STREAK_LOOKBACK_DAYS: usize = 366;

pub fn day_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn parse_day_key(key: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(key, "%Y-%m-%d").ok()
}

pub fn day_key_of_millis(millis: i64) -> Option<String> {
    chrono::DateTime::from_timestamp_millis(millis).map(|dt| day_key(dt.date_naive()))
}

/// Consecutive-day streak ending today: walk backward from `today`, count
/// while each preceding day is present, stop at the first gap.
pub fn streak(completed_dates: &BTreeSet<String>, today: NaiveDate) -> usize {
    let mut n = 0;
    let mut day = today;
    while n < STREAK_LOOKBACK_DAYS {
        if !completed_dates.contains(&day_key(day)) {
            break;
        }
        n += 1;
        day = day - Duration::days(1);
    }
    n
}

pub fn active_day_count(completed_dates: &BTreeSet<String>) -> usize {
    completed_dates.len()
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeelingCounts {
    pub happy: usize,
    pub neutral: usize,
    pub flat: usize,
    pub worried: usize,
    pub sad: usize,
}

impl FeelingCounts {
    fn bump(&mut self, feeling: Feeling) {
        match feeling {
            Feeling::Happy => self.happy += 1,
            Feeling::Neutral => self.neutral += 1,
            Feeling::Flat => self.flat += 1,
            Feeling::Worried => self.worried += 1,
            Feeling::Sad => self.sad += 1,
        }
    }
}

/// Feeling distribution over the trailing seven days (today included).
pub fn weekly_feelings(check_ins: &[CheckIn], student_id: &str, today: NaiveDate) -> FeelingCounts {
    let window_start = today - Duration::days(6);
    let mut counts = FeelingCounts::default();
    for check_in in check_ins.iter().filter(|c| c.student_id == student_id) {
        let Some(key) = day_key_of_millis(check_in.created_at) else {
            continue;
        };
        let Some(date) = parse_day_key(&key) else {
            continue;
        };
        if date >= window_start && date <= today {
            counts.bump(check_in.feeling);
        }
    }
    counts
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StressorCategory {
    School,
    Friends,
    Family,
    Sleep,
    Other,
}

const SCHOOL_WORDS: &[&str] = &["school", "test", "exam", "homework", "grade", "class"];
const FRIEND_WORDS: &[&str] = &["friend", "bully", "bullied", "lonely", "left out"];
const FAMILY_WORDS: &[&str] = &["family", "home", "parent", "mom", "dad", "sibling"];
const SLEEP_WORDS: &[&str] = &["sleep", "tired", "sleepy", "nightmare"];

fn categorize(token: &str) -> StressorCategory {
    let t = token.trim().to_ascii_lowercase();
    if SCHOOL_WORDS.iter().any(|w| t.contains(w)) {
        StressorCategory::School
    } else if FRIEND_WORDS.iter().any(|w| t.contains(w)) {
        StressorCategory::Friends
    } else if FAMILY_WORDS.iter().any(|w| t.contains(w)) {
        StressorCategory::Family
    } else if SLEEP_WORDS.iter().any(|w| t.contains(w)) {
        StressorCategory::Sleep
    } else {
        StressorCategory::Other
    }
}

/// Tallies stressor mentions from the `stressors` and `mood_cause` answer
/// keys, most frequent first. Free text is categorized with keyword
/// heuristics; unmatched tokens land in `other`.
pub fn top_stressors(check_ins: &[CheckIn], student_id: &str) -> Vec<(StressorCategory, usize)> {
    let mut tallies: std::collections::BTreeMap<StressorCategory, usize> = Default::default();
    for check_in in check_ins.iter().filter(|c| c.student_id == student_id) {
        for key in ["stressors", "mood_cause"] {
            let Some(raw) = check_in.answers.get(key) else {
                continue;
            };
            for token in raw.split(',').filter(|t| !t.trim().is_empty()) {
                *tallies.entry(categorize(token)).or_insert(0) += 1;
            }
        }
    }
    let mut out: Vec<(StressorCategory, usize)> = tallies.into_iter().collect();
    out.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    out
}

//! Pattern notes and if-then lines. Both are hard-gated on five logged
//! entries; below the gate every category returns its fixed unlock text.

use std::collections::HashMap;

use chrono::{Datelike, Weekday};
use serde::Serialize;

use crate::analytics::average;
use crate::analytics::insights::{high_low_mood_delta, recovery_offsets};
use crate::domain::journal::{effective_craving_logs, CravingLog, JournalEntry};
use crate::personalization::content::{interpolate, CONTENT};
use crate::time_utils::{weekday_name, TimeOfDay};

pub const PATTERN_MIN_ENTRIES: usize = 5;

#[derive(Debug, Clone, Serialize)]
pub struct PatternInsight {
    pub title: String,
    pub interpretation: String,
    pub unlocked: bool,
}

fn locked(title: &str) -> PatternInsight {
    PatternInsight {
        title: title.to_string(),
        interpretation: CONTENT.patterns.locked.clone(),
        unlocked: false,
    }
}

fn unlocked(title: &str, interpretation: String) -> PatternInsight {
    PatternInsight {
        title: title.to_string(),
        interpretation,
        unlocked: true,
    }
}

/// Weekday with the highest average craving score; needs at least two
/// entries on that weekday before it counts.
fn heaviest_weekday(entries: &[JournalEntry]) -> Option<Weekday> {
    let mut by_weekday: HashMap<Weekday, Vec<f64>> = HashMap::new();
    for entry in entries {
        by_weekday
            .entry(entry.date.weekday())
            .or_default()
            .push(entry.cravings as f64);
    }

    let mut best: Option<(Weekday, f64)> = None;
    let week = [
        Weekday::Sun,
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
    ];
    for weekday in week {
        let Some(values) = by_weekday.get(&weekday) else {
            continue;
        };
        if values.len() < 2 {
            continue;
        }
        let avg = average(values);
        if avg > 0.0 && best.map_or(true, |(_, best_avg)| avg > best_avg) {
            best = Some((weekday, avg));
        }
    }
    best.map(|(weekday, _)| weekday)
}

fn time_bucket_for_patterns(
    entries: &[JournalEntry],
    logs: &[CravingLog],
) -> Option<TimeOfDay> {
    let effective = effective_craving_logs(logs, entries);
    let mut buckets: HashMap<TimeOfDay, Vec<f64>> = HashMap::new();
    for log in &effective {
        buckets
            .entry(TimeOfDay::from_hour(log.hour))
            .or_default()
            .push(log.intensity as f64);
    }
    let mut best: Option<(TimeOfDay, f64)> = None;
    for bucket in TimeOfDay::ALL {
        let Some(values) = buckets.get(&bucket) else {
            continue;
        };
        if values.len() < 2 {
            continue;
        }
        let avg = average(values);
        if best.map_or(true, |(_, best_avg)| avg > best_avg) {
            best = Some((bucket, avg));
        }
    }
    best.map(|(bucket, _)| bucket)
}

pub fn pattern_insights(entries: &[JournalEntry], logs: &[CravingLog]) -> Vec<PatternInsight> {
    let texts = &CONTENT.patterns;
    if entries.len() < PATTERN_MIN_ENTRIES {
        return vec![
            locked(&texts.time_of_day_title),
            locked(&texts.weekday_title),
            locked(&texts.mood_link_title),
            locked(&texts.recovery_title),
        ];
    }

    let time_line = match time_bucket_for_patterns(entries, logs) {
        Some(bucket) => interpolate(
            &texts.time_of_day,
            &[("window", bucket.label().to_string())],
        ),
        None => texts.time_of_day_flat.clone(),
    };

    let weekday_line = match heaviest_weekday(entries) {
        Some(weekday) => interpolate(
            &texts.weekday,
            &[("weekday", weekday_name(weekday).to_string())],
        ),
        None => texts.weekday_flat.clone(),
    };

    let mood_line = match high_low_mood_delta(entries) {
        Some(delta) if delta >= 1.0 => {
            interpolate(&texts.mood_link, &[("delta", format!("{delta:.1}"))])
        }
        _ => texts.mood_link_flat.clone(),
    };

    let recoveries = recovery_offsets(entries);
    let recovery_line = if recoveries.len() >= 2 {
        let avg = average(&recoveries.iter().map(|d| *d as f64).collect::<Vec<_>>()).round();
        interpolate(&texts.recovery, &[("days", format!("{avg:.0}"))])
    } else {
        texts.recovery_flat.clone()
    };

    vec![
        unlocked(&texts.time_of_day_title, time_line),
        unlocked(&texts.weekday_title, weekday_line),
        unlocked(&texts.mood_link_title, mood_line),
        unlocked(&texts.recovery_title, recovery_line),
    ]
}

/// Graph-backed if-then lines. Gated like the pattern notes; above the gate
/// only the categories with real signal produce a line.
pub fn if_then_insights(entries: &[JournalEntry], logs: &[CravingLog]) -> Vec<String> {
    let texts = &CONTENT.if_then;
    if entries.len() < PATTERN_MIN_ENTRIES {
        return vec![texts.locked.clone()];
    }

    let mut lines = Vec::new();
    if let Some(bucket) = time_bucket_for_patterns(entries, logs) {
        lines.push(interpolate(
            &texts.time_of_day,
            &[("window", bucket.label().to_string())],
        ));
    }
    if let Some(delta) = high_low_mood_delta(entries) {
        if delta >= 1.0 {
            lines.push(texts.mood_link.clone());
        }
    }
    if let Some(weekday) = heaviest_weekday(entries) {
        lines.push(interpolate(
            &texts.weekday,
            &[("weekday", weekday_name(weekday).to_string())],
        ));
    }
    lines.truncate(3);
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, day).unwrap()
    }

    fn entry(day: u32, mood: u8, cravings: u32) -> JournalEntry {
        JournalEntry {
            date: date(day),
            mood,
            cravings,
            note: String::new(),
            created_at: None,
        }
    }

    fn stamped(day: u32, mood: u8, cravings: u32, hour: u32) -> JournalEntry {
        JournalEntry {
            created_at: Some(date(day).and_hms_opt(hour, 0, 0).unwrap().and_utc()),
            ..entry(day, mood, cravings)
        }
    }

    #[test]
    fn test_four_entries_stay_locked() {
        let entries: Vec<JournalEntry> = (1..=4).map(|day| entry(day, 5, 4)).collect();
        let insights = pattern_insights(&entries, &[]);
        assert_eq!(insights.len(), 4);
        assert!(insights.iter().all(|insight| !insight.unlocked));
        assert!(insights
            .iter()
            .all(|insight| insight.interpretation == CONTENT.patterns.locked));

        assert_eq!(if_then_insights(&entries, &[]), vec![CONTENT.if_then.locked.clone()]);
    }

    #[test]
    fn test_five_entries_unlock_data_derived_text() {
        let entries: Vec<JournalEntry> = (1..=5).map(|day| entry(day, 5, 4)).collect();
        let insights = pattern_insights(&entries, &[]);
        assert!(insights.iter().all(|insight| insight.unlocked));
        assert!(insights
            .iter()
            .all(|insight| insight.interpretation != CONTENT.patterns.locked));
    }

    #[test]
    fn test_patterns_pick_up_real_signal() {
        // Evening-stamped high cravings, plus clear mood/craving contrast and
        // two dips with quick recoveries. 2026-08-03 and 2026-08-10 are Mondays.
        let entries = vec![
            stamped(3, 3, 8, 19),
            stamped(10, 4, 7, 20),
            entry(4, 8, 1),
            entry(5, 7, 2),
            entry(6, 8, 1),
            entry(11, 7, 2),
        ];
        let insights = pattern_insights(&entries, &[]);
        assert!(insights[0].interpretation.contains("evening"));
        assert!(insights[1].interpretation.contains("Monday"));
        assert!(insights[2].interpretation.contains("points"));
        assert!(insights[3].interpretation.contains("1 day"));

        let lines = if_then_insights(&entries, &[]);
        assert!(lines.iter().any(|line| line.contains("evening")));
        assert!(lines.iter().any(|line| line.contains("Monday")));
    }
}

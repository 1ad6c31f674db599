//! Weekly trend summaries, diary reflections, and the dashboard trend
//! metrics. Every data-starved path returns an explicit placeholder or
//! `None` rather than a zero that could read as a real measurement.

use std::collections::HashMap;

use chrono::{Datelike, Duration, NaiveDate, Timelike};
use serde::Serialize;

use crate::analytics::average;
use crate::domain::journal::{sorted_desc, CravingLog, JournalEntry};
use crate::personalization::content::{interpolate, CONTENT};
use crate::time_utils::TimeOfDay;

/// Minimum entries before the summary interprets anything.
pub const SUMMARY_MIN_ENTRIES: usize = 3;
/// Minimum entries before reflections appear.
pub const REFLECTION_MIN_ENTRIES: usize = 2;

pub fn format_unlock(needed: usize) -> String {
    let plural = if needed == 1 { "" } else { "s" };
    format!("Not enough data yet - log {needed} more check-in{plural} to unlock.")
}

/// Weekly craving trend, mood-vs-craving correlation, and time-of-day lines.
/// Below [`SUMMARY_MIN_ENTRIES`] the single placeholder line is returned.
pub fn insights_summary(entries: &[JournalEntry]) -> Vec<String> {
    let texts = &CONTENT.insights;
    if entries.len() < SUMMARY_MIN_ENTRIES {
        return vec![texts.empty.clone()];
    }

    let sorted = sorted_desc(entries);
    let recent: Vec<&JournalEntry> = sorted.iter().take(14).collect();
    let current: Vec<f64> = recent.iter().take(7).map(|e| e.cravings as f64).collect();
    let prior: Vec<f64> = recent
        .iter()
        .skip(7)
        .take(7)
        .map(|e| e.cravings as f64)
        .collect();

    let current_avg = average(&current);
    let prior_avg = if prior.is_empty() {
        current_avg
    } else {
        average(&prior)
    };

    let cravings_line = if current_avg <= prior_avg - 1.0 {
        texts.cravings_ease.clone()
    } else if current_avg >= prior_avg + 1.0 {
        texts.cravings_rise.clone()
    } else {
        texts.cravings_steady.clone()
    };

    let mut mood_line = texts.mood_stable.clone();
    if let Some(delta) = high_low_mood_delta(&sorted) {
        if delta >= 1.0 {
            mood_line = interpolate(&texts.mood_lower, &[("delta", format!("{delta:.1}"))]);
        }
    }

    let mut lines = vec![cravings_line, mood_line];
    if let Some(bucket) = top_craving_bucket(&sorted) {
        lines.push(interpolate(
            &texts.time_of_day,
            &[("window", bucket.label().to_string())],
        ));
    }
    lines
}

/// Mood gap between low-craving (≤3) and high-craving (≥6) days. Needs at
/// least two entries on each side; positive means high-craving days run
/// lower.
pub(crate) fn high_low_mood_delta(entries: &[JournalEntry]) -> Option<f64> {
    let high: Vec<f64> = entries
        .iter()
        .filter(|e| e.cravings >= 6)
        .map(|e| e.mood as f64)
        .collect();
    let low: Vec<f64> = entries
        .iter()
        .filter(|e| e.cravings <= 3)
        .map(|e| e.mood as f64)
        .collect();
    if high.len() < 2 || low.len() < 2 {
        return None;
    }
    Some(average(&low) - average(&high))
}

/// The time-of-day window with the highest average craving, from entries
/// carrying a creation timestamp. A window needs at least two samples.
pub(crate) fn top_craving_bucket(entries: &[JournalEntry]) -> Option<TimeOfDay> {
    let mut buckets: HashMap<TimeOfDay, Vec<f64>> = HashMap::new();
    for entry in entries {
        let Some(created) = entry.created_at else {
            continue;
        };
        buckets
            .entry(TimeOfDay::from_hour(created.hour()))
            .or_default()
            .push(entry.cravings as f64);
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

/// Gaps (in days) between a low-mood day (≤4) and the first recovered day
/// (≥6) within the following four days.
pub(crate) fn recovery_offsets(entries: &[JournalEntry]) -> Vec<i64> {
    let by_date: HashMap<NaiveDate, &JournalEntry> =
        entries.iter().map(|entry| (entry.date, entry)).collect();
    let mut offsets = Vec::new();
    for entry in entries {
        if entry.mood > 4 {
            continue;
        }
        for offset in 1..=4 {
            let candidate = by_date.get(&(entry.date + Duration::days(offset)));
            if let Some(candidate) = candidate {
                if candidate.mood >= 6 {
                    offsets.push(offset);
                    break;
                }
            }
        }
    }
    offsets
}

/// Up to three reflection lines over the diary. Below
/// [`REFLECTION_MIN_ENTRIES`], or when nothing qualifies, the placeholder
/// comes back instead.
pub fn diary_reflections(entries: &[JournalEntry], today: NaiveDate) -> Vec<String> {
    let texts = &CONTENT.reflections;
    if entries.len() < REFLECTION_MIN_ENTRIES {
        return vec![texts.empty.clone()];
    }

    let sorted = sorted_desc(entries);
    let by_date: HashMap<NaiveDate, &JournalEntry> =
        sorted.iter().map(|entry| (entry.date, entry)).collect();

    let mut lines = Vec::new();

    if let Some(week_ago) = by_date.get(&(today - Duration::days(7))) {
        let note = week_ago.note.trim();
        if !note.is_empty() {
            let excerpt: String = note.chars().take(120).collect();
            lines.push(interpolate(&texts.week_ago, &[("excerpt", excerpt)]));
        }
    }

    let recoveries = recovery_offsets(&sorted);
    if recoveries.len() >= 2 {
        let avg = average(&recoveries.iter().map(|d| *d as f64).collect::<Vec<_>>()).round();
        lines.push(interpolate(&texts.recovery, &[("days", format!("{avg:.0}"))]));
    }

    let current: Vec<f64> = sorted.iter().take(7).map(|e| e.mood as f64).collect();
    let prior: Vec<f64> = sorted.iter().skip(7).take(7).map(|e| e.mood as f64).collect();
    if current.len() >= 3 && prior.len() >= 3 {
        let current_avg = average(&current);
        let prior_avg = average(&prior);
        if current_avg >= prior_avg + 1.0 {
            lines.push(texts.mood_up.clone());
        } else if current_avg <= prior_avg - 1.0 {
            lines.push(texts.mood_down.clone());
        } else {
            lines.push(texts.mood_steady.clone());
        }
    }

    lines.retain(|line| !line.is_empty());
    lines.truncate(3);
    if lines.is_empty() {
        return vec![texts.empty.clone()];
    }
    lines
}

/// One calendar day in the charted series; dates without an entry fill as
/// zero so the chart renders a continuous line.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct DayPoint {
    pub date: NaiveDate,
    pub cravings: f64,
    pub mood: f64,
}

/// Continuous day series from the first logged date (or the last 14 days
/// when history is shorter) through today.
pub fn daily_series(entries: &[JournalEntry], today: NaiveDate) -> Vec<DayPoint> {
    let by_date: HashMap<NaiveDate, &JournalEntry> =
        entries.iter().map(|entry| (entry.date, entry)).collect();
    let first = entries.iter().map(|entry| entry.date).min();
    let fallback = today - Duration::days(13);
    let start = match first {
        Some(date) if date < today => date,
        _ => fallback,
    };

    let mut series = Vec::new();
    let mut cursor = start;
    while cursor <= today {
        let (cravings, mood) = by_date
            .get(&cursor)
            .map(|entry| (entry.cravings as f64, entry.mood as f64))
            .unwrap_or((0.0, 0.0));
        series.push(DayPoint {
            date: cursor,
            cravings,
            mood,
        });
        cursor = cursor + Duration::days(1);
    }
    series
}

/// Rolling-window dashboard numbers. `None` marks a metric that has not
/// unlocked yet; it must never be rendered as a zero.
#[derive(Debug, Clone, Serialize)]
pub struct TrendMetrics {
    pub avg_cravings_week: Option<f64>,
    /// Percent change of the last 7 days vs the first charted week. Unlocks
    /// at 14 entries and needs a nonzero baseline.
    pub change_vs_baseline_pct: Option<f64>,
    pub downward_days: Option<u32>,
    /// 7-day rolling average of cravings; empty until 7 entries exist.
    pub rolling_seven: Vec<f64>,
}

pub fn trend_metrics(entries: &[JournalEntry], today: NaiveDate) -> TrendMetrics {
    let series = daily_series(entries, today);
    let current_week: Vec<f64> = series
        .iter()
        .rev()
        .take(7)
        .rev()
        .map(|point| point.cravings)
        .collect();
    let prior_week: Vec<f64> = series.iter().take(7).map(|point| point.cravings).collect();

    let avg_cravings_week = if entries.is_empty() {
        None
    } else {
        Some(average(&current_week))
    };

    let change_vs_baseline_pct = match avg_cravings_week {
        Some(avg) if entries.len() >= 14 => {
            let baseline = average(&prior_week);
            if baseline != 0.0 {
                Some((avg - baseline) / baseline * 100.0)
            } else {
                None
            }
        }
        _ => None,
    };

    let downward_days = if entries.is_empty() {
        None
    } else {
        let count = current_week
            .windows(2)
            .filter(|pair| pair[1] < pair[0])
            .count() as u32;
        Some(count)
    };

    let rolling_seven = if entries.len() >= 7 && series.len() >= 7 {
        series
            .windows(7)
            .map(|window| average(&window.iter().map(|p| p.cravings).collect::<Vec<_>>()))
            .collect()
    } else {
        Vec::new()
    };

    TrendMetrics {
        avg_cravings_week,
        change_vs_baseline_pct,
        downward_days,
        rolling_seven,
    }
}

/// Weekday (Sunday-first) by 4-hour-slot craving intensity sums.
#[derive(Debug, Clone, Serialize)]
pub struct HeatmapMatrix {
    pub cells: [[f64; 6]; 7],
    pub max: f64,
    pub ready: bool,
}

pub fn heatmap_matrix(logs: &[CravingLog]) -> HeatmapMatrix {
    let mut cells = [[0.0f64; 6]; 7];
    for log in logs {
        let weekday = log.date.weekday().num_days_from_sunday() as usize;
        let slot = ((log.hour / 4) as usize).min(5);
        cells[weekday][slot] += log.intensity as f64;
    }
    let max = cells
        .iter()
        .flatten()
        .fold(1.0f64, |acc, value| acc.max(*value));
    let ready = cells.iter().flatten().any(|value| *value > 0.0);
    HeatmapMatrix { cells, max, ready }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct TimeBucketStat {
    pub bucket: TimeOfDay,
    pub avg: f64,
    pub count: usize,
}

/// Average craving intensity per time-of-day window, in fixed window order.
pub fn time_bucket_stats(logs: &[CravingLog]) -> Vec<TimeBucketStat> {
    let mut buckets: HashMap<TimeOfDay, Vec<f64>> = HashMap::new();
    for log in logs {
        buckets
            .entry(TimeOfDay::from_hour(log.hour))
            .or_default()
            .push(log.intensity as f64);
    }
    TimeOfDay::ALL
        .iter()
        .map(|bucket| {
            let values = buckets.get(bucket).map(Vec::as_slice).unwrap_or(&[]);
            TimeBucketStat {
                bucket: *bucket,
                avg: average(values),
                count: values.len(),
            }
        })
        .collect()
}

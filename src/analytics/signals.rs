use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::journal::{entry_for, latest_entry, JournalEntry};
use crate::personalization::content::{SignalTemplate, CONTENT};
use crate::time_utils::format_short_date;

/// Craving score that flips a same-day entry into spike territory.
pub const SPIKE_CRAVING_THRESHOLD: u32 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalKind {
    CravingsHighMoodStable,
    MoodLowCravingsLow,
    BothHigh,
    Stable,
    Default,
    NoData,
}

/// Today's adaptive signal: a canned title/body/support bundle chosen from
/// the most recent check-in, plus a note naming which check-in it came from.
#[derive(Debug, Clone, Serialize)]
pub struct AdaptiveSignal {
    pub kind: SignalKind,
    pub title: String,
    pub body: String,
    pub support: String,
    pub source: Option<String>,
}

fn from_template(kind: SignalKind, template: &SignalTemplate, source: Option<String>) -> AdaptiveSignal {
    AdaptiveSignal {
        kind,
        title: template.title.clone(),
        body: template.body.clone(),
        support: template.support.clone(),
        source,
    }
}

pub fn adaptive_signal(entries: &[JournalEntry], today: NaiveDate) -> AdaptiveSignal {
    let templates = &CONTENT.adaptive_signals;
    let Some(entry) = latest_entry(entries, today) else {
        return from_template(SignalKind::NoData, &templates.no_data, None);
    };

    let cravings_high = entry.cravings >= 7;
    let cravings_low = entry.cravings <= 2;
    let mood_low = entry.mood <= 4;
    let mood_stable = entry.mood >= 6;

    let (kind, template) = if cravings_high && mood_stable {
        (
            SignalKind::CravingsHighMoodStable,
            &templates.cravings_high_mood_stable,
        )
    } else if mood_low && cravings_low {
        (SignalKind::MoodLowCravingsLow, &templates.mood_low_cravings_low)
    } else if cravings_high && mood_low {
        (SignalKind::BothHigh, &templates.both_high)
    } else if cravings_low && entry.mood >= 7 {
        (SignalKind::Stable, &templates.stable)
    } else {
        (SignalKind::Default, &templates.default)
    };

    let source = if entry.date == today {
        "From today's check-in.".to_string()
    } else {
        format!("From {} check-in.", format_short_date(entry.date))
    };
    from_template(kind, template, Some(source))
}

/// True when today's entry crosses the spike threshold. Spike presentation
/// itself is a UI concern; the engine only reports the state.
pub fn spike_triggered(entries: &[JournalEntry], today: NaiveDate) -> bool {
    entry_for(entries, today)
        .map(|entry| entry.cravings >= SPIKE_CRAVING_THRESHOLD)
        .unwrap_or(false)
}

#[derive(Debug, Clone, Serialize)]
pub struct SpikeReframe {
    pub title: String,
    pub subtitle: String,
    pub reframe: String,
    /// "Name the lie" choices; empty until day 3 unlocks the exercise.
    pub lie_choices: Vec<String>,
}

pub fn spike_reframe(day_index: u32) -> SpikeReframe {
    let spike = &CONTENT.spike;
    SpikeReframe {
        title: spike.title.clone(),
        subtitle: spike.subtitle.clone(),
        reframe: spike.reframe.clone(),
        lie_choices: if day_index >= 3 {
            spike.lie_choices.clone()
        } else {
            Vec::new()
        },
    }
}

use serde::{Deserialize, Serialize};

use crate::analytics::average;
use crate::domain::journal::{sorted_desc, JournalEntry};

/// Categorical read of the last two weeks, derived from the same
/// current-vs-prior 7-day windows the trend summary uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FreedomStatus {
    Calibrating,
    Building,
    Volatile,
    Stabilizing,
}

impl FreedomStatus {
    pub fn label(&self) -> &'static str {
        match self {
            FreedomStatus::Calibrating => "Calibrating",
            FreedomStatus::Building => "Building",
            FreedomStatus::Volatile => "Volatile",
            FreedomStatus::Stabilizing => "Stabilizing",
        }
    }

    pub fn hint(&self) -> &'static str {
        match self {
            FreedomStatus::Calibrating => "Log a check-in to tune your signals.",
            FreedomStatus::Building => "Momentum is real. Protect the routines behind it.",
            FreedomStatus::Volatile => "Numbers are moving against you. Shrink the day and use the toolkit.",
            FreedomStatus::Stabilizing => "Holding steady. Keep the cadence.",
        }
    }
}

pub fn freedom_status(entries: &[JournalEntry]) -> FreedomStatus {
    if entries.len() < 3 {
        return FreedomStatus::Calibrating;
    }

    let sorted = sorted_desc(entries);
    let current_cravings: Vec<f64> = sorted.iter().take(7).map(|e| e.cravings as f64).collect();
    let current_mood: Vec<f64> = sorted.iter().take(7).map(|e| e.mood as f64).collect();
    let prior_cravings: Vec<f64> = sorted
        .iter()
        .skip(7)
        .take(7)
        .map(|e| e.cravings as f64)
        .collect();
    let prior_mood: Vec<f64> = sorted.iter().skip(7).take(7).map(|e| e.mood as f64).collect();

    let cur_cravings = average(&current_cravings);
    let cur_mood = average(&current_mood);
    let prior_cravings = if prior_cravings.is_empty() {
        cur_cravings
    } else {
        average(&prior_cravings)
    };
    let prior_mood = if prior_mood.is_empty() {
        cur_mood
    } else {
        average(&prior_mood)
    };

    if cur_cravings >= prior_cravings + 1.0 || cur_mood <= prior_mood - 1.0 {
        FreedomStatus::Volatile
    } else if cur_cravings <= prior_cravings - 1.0 && cur_mood >= 6.0 {
        FreedomStatus::Building
    } else {
        FreedomStatus::Stabilizing
    }
}

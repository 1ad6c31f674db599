use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::plan::{PlanInput, DEFAULT_MG_PER_UNIT};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DurationUnit {
    Weeks,
    Months,
    Years,
}

impl DurationUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            DurationUnit::Weeks => "weeks",
            DurationUnit::Months => "months",
            DurationUnit::Years => "years",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalType {
    Reduce,
    Immediate,
}

/// User-declared facts collected by the onboarding wizard. Consumed once to
/// build a [`crate::domain::plan::QuitPlan`], then kept as a record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OnboardingData {
    pub product_type: String,
    pub duration_value: f64,
    pub duration_unit: DurationUnit,
    pub daily_amount: f64,
    pub daily_unit: String,
    /// Nicotine strength per unit in mg. Falls back to the default when the
    /// wizard left it unset or nonsensical.
    pub strength_mg_per_unit: Option<f64>,
    pub start_date: NaiveDate,
    pub goal_type: GoalType,
    #[serde(default)]
    pub pricing_tier: Option<String>,
}

/// Converts a declared usage duration to whole days. Non-finite or
/// non-positive values collapse to 1 so the downstream log math stays total.
pub fn duration_to_days(value: f64, unit: DurationUnit) -> u32 {
    if !value.is_finite() || value <= 0.0 {
        return 1;
    }
    let safe = value.max(1.0);
    let days = match unit {
        DurationUnit::Weeks => safe * 7.0,
        DurationUnit::Months => safe * 30.4,
        DurationUnit::Years => safe * 365.0,
    };
    days.round() as u32
}

impl OnboardingData {
    pub fn use_days(&self) -> u32 {
        duration_to_days(self.duration_value, self.duration_unit)
    }

    pub fn daily_units(&self) -> f64 {
        if self.daily_amount.is_finite() {
            self.daily_amount.max(0.0)
        } else {
            0.0
        }
    }

    pub fn mg_per_unit(&self) -> f64 {
        match self.strength_mg_per_unit {
            Some(mg) if mg.is_finite() => mg.max(0.1),
            _ => DEFAULT_MG_PER_UNIT,
        }
    }

    pub fn plan_input(&self) -> PlanInput {
        PlanInput {
            daily_units: self.daily_units(),
            use_days: self.use_days(),
            mg_per_unit: self.mg_per_unit(),
        }
    }
}

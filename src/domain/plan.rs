use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_MG_PER_UNIT: f64 = 8.0;

/// Baseline above which intake intensity saturates toward 1.
const INTENSITY_SATURATION_MG: f64 = 120.0;
/// Usage history (in days) above which the duration component saturates.
const DURATION_SATURATION_DAYS: f64 = 3650.0;

pub fn clamp01(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 1.0)
}

pub fn lerp(start: f64, end: f64, t: f64) -> f64 {
    start + (end - start) * t
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeverityLabel {
    Light,
    Moderate,
    High,
    #[serde(rename = "Very high")]
    VeryHigh,
}

impl SeverityLabel {
    pub fn from_score(score: u8) -> Self {
        if score >= 76 {
            SeverityLabel::VeryHigh
        } else if score >= 51 {
            SeverityLabel::High
        } else if score >= 26 {
            SeverityLabel::Moderate
        } else {
            SeverityLabel::Light
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SeverityLabel::Light => "Light",
            SeverityLabel::Moderate => "Moderate",
            SeverityLabel::High => "High",
            SeverityLabel::VeryHigh => "Very high",
        }
    }

    /// Plan-duration bounds in days for this severity tier.
    fn duration_bounds(&self) -> (f64, f64) {
        match self {
            SeverityLabel::Light => (21.0, 35.0),
            SeverityLabel::Moderate => (35.0, 60.0),
            SeverityLabel::High => (60.0, 90.0),
            SeverityLabel::VeryHigh => (90.0, 120.0),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Severity {
    pub score: u8,
    pub label: SeverityLabel,
    pub intensity: f64,
    pub duration: f64,
}

#[derive(Debug, Clone, Copy)]
pub struct PlanInput {
    pub daily_units: f64,
    pub use_days: u32,
    pub mg_per_unit: f64,
}

impl PlanInput {
    pub fn new(daily_units: f64, use_days: u32) -> Self {
        Self {
            daily_units,
            use_days,
            mg_per_unit: DEFAULT_MG_PER_UNIT,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanPhase {
    pub title: String,
    pub range: String,
    pub focus: String,
}

/// Derived, immutable-once-computed quit plan. The only field mutated after
/// creation is `progress_offset_days`, which accumulates relapse penalties.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuitPlan {
    pub created_at: DateTime<Utc>,
    pub start_date: NaiveDate,
    pub duration_days: u32,
    pub phases: Vec<PlanPhase>,
    pub baseline_mg_per_day: f64,
    pub mg_per_unit: f64,
    pub daily_units: f64,
    pub use_days: u32,
    pub severity_score: u8,
    pub severity_label: SeverityLabel,
    pub weekly_reduction: f64,
    pub progress_offset_days: f64,
}

impl QuitPlan {
    /// True when the plan was derived from these onboarding inputs. Used to
    /// decide whether a stored plan must be rebuilt after answers change.
    pub fn matches_input(&self, input: &PlanInput) -> bool {
        self.daily_units == input.daily_units
            && self.use_days == input.use_days
            && self.mg_per_unit == input.mg_per_unit
    }
}

pub fn estimate_baseline_mg(daily_units: f64, mg_per_unit: f64) -> f64 {
    let units = if daily_units.is_finite() {
        daily_units.max(0.0)
    } else {
        0.0
    };
    units * mg_per_unit
}

pub fn compute_severity(baseline_mg_per_day: f64, use_days: u32) -> Severity {
    let baseline = baseline_mg_per_day.max(0.0);
    let use_days = use_days.max(1) as f64;
    let intensity = clamp01(baseline.ln_1p() / INTENSITY_SATURATION_MG.ln_1p());
    let duration = clamp01(use_days.ln_1p() / DURATION_SATURATION_DAYS.ln_1p());
    let score = (100.0 * (0.65 * intensity + 0.35 * duration)).round() as u8;
    Severity {
        score,
        label: SeverityLabel::from_score(score),
        intensity,
        duration,
    }
}

pub fn compute_plan_duration(severity: &Severity) -> u32 {
    let weight = clamp01(0.6 * severity.intensity + 0.4 * severity.duration);
    let (lo, hi) = severity.label.duration_bounds();
    lerp(lo, hi, weight).round() as u32
}

pub fn build_phases(duration_days: u32) -> Vec<PlanPhase> {
    let total_weeks = 4.max((duration_days as f64 / 7.0).ceil() as u32);
    let detach_weeks = 2.max(total_weeks - 4);
    vec![
        PlanPhase {
            title: "Stabilize".into(),
            range: "Days 1–7".into(),
            focus: "Rituals, friction, and calm routines. Keep it simple and steady.".into(),
        },
        PlanPhase {
            title: "Reduce".into(),
            range: "Weeks 2–4".into(),
            focus: "Gentle reductions with zero shame. Build consistent alternatives.".into(),
        },
        PlanPhase {
            title: "Detach".into(),
            range: format!("Weeks 5–{}", 4 + detach_weeks),
            focus: "Shift identity, rewrite triggers, and lock in long-term systems.".into(),
        },
    ]
}

pub fn build_quit_plan(input: PlanInput) -> QuitPlan {
    let now = Utc::now();
    build_quit_plan_at(input, now.date_naive(), now)
}

pub fn build_quit_plan_at(input: PlanInput, start_date: NaiveDate, now: DateTime<Utc>) -> QuitPlan {
    let baseline = estimate_baseline_mg(input.daily_units, input.mg_per_unit);
    let severity = compute_severity(baseline, input.use_days);
    let duration_days = compute_plan_duration(&severity);
    let weekly_reduction = round2(lerp(0.05, 0.15, 1.0 - severity.score as f64 / 100.0));

    QuitPlan {
        created_at: now,
        start_date,
        duration_days,
        phases: build_phases(duration_days),
        baseline_mg_per_day: baseline,
        mg_per_unit: input.mg_per_unit,
        daily_units: input.daily_units,
        use_days: input.use_days,
        severity_score: severity.score,
        severity_label: severity.label,
        weekly_reduction,
        progress_offset_days: 0.0,
    }
}

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::journal::RelapseEvent;
use crate::domain::plan::{clamp01, lerp, QuitPlan};
use crate::time_utils::days_between;

#[derive(Debug, Clone, Copy, Serialize)]
pub struct JourneyProgress {
    /// 1-indexed current plan day, clamped to the plan length.
    pub day_index: u32,
    /// Fraction of the plan elapsed, in [0, 1].
    pub progress: f64,
}

/// Current position within the plan, adjusted for accumulated relapse
/// penalties. The offset is fractional; the day index floors it so the
/// 1-indexed day stays a whole number.
pub fn journey_progress(plan: &QuitPlan, today: NaiveDate) -> JourneyProgress {
    let duration = plan.duration_days.max(1);
    let elapsed = days_between(plan.start_date, today).max(0) as f64;
    let effective = (elapsed - plan.progress_offset_days).max(0.0);
    let day_index = duration.min(effective.floor() as u32 + 1);
    let progress = if plan.duration_days <= 1 {
        1.0
    } else {
        clamp01(day_index as f64 / duration as f64)
    };
    JourneyProgress {
        day_index,
        progress,
    }
}

/// Relapse penalty in fractional days. Heavier baseline use raises the base
/// penalty; relapses late in the journey are penalized less (down to 35% of
/// the base at progress 1).
pub fn compute_penalty_days(baseline_mg_per_day: f64, journey_progress: f64) -> f64 {
    let base_penalty = lerp(1.0, 5.0, clamp01(baseline_mg_per_day / 80.0));
    let stage_factor = lerp(1.0, 0.35, clamp01(journey_progress));
    base_penalty * stage_factor
}

/// Applies a relapse: pushes the plan's progress offset forward by the
/// computed penalty (never backward) and returns the append-only event.
pub fn apply_relapse(
    plan: &mut QuitPlan,
    note: &str,
    tags: &[String],
    now: DateTime<Utc>,
) -> RelapseEvent {
    let progress = journey_progress(plan, now.date_naive()).progress;
    let penalty = compute_penalty_days(plan.baseline_mg_per_day, progress);
    plan.progress_offset_days = (plan.progress_offset_days + penalty).max(0.0);
    RelapseEvent {
        id: Uuid::new_v4(),
        occurred_at: now,
        penalty_days: penalty,
        note: note.trim().to_string(),
        tags: tags.to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::plan::{build_quit_plan_at, PlanInput};
    use chrono::Duration;

    fn plan_starting(start: NaiveDate) -> QuitPlan {
        let now = start.and_hms_opt(8, 0, 0).unwrap().and_utc();
        build_quit_plan_at(PlanInput::new(10.0, 730), start, now)
    }

    #[test]
    fn test_day_one_at_start_date() {
        let start = NaiveDate::from_ymd_opt(2026, 8, 1).unwrap();
        let plan = plan_starting(start);
        let journey = journey_progress(&plan, start);
        assert_eq!(journey.day_index, 1);
        let expected = 1.0 / plan.duration_days as f64;
        assert!((journey.progress - expected).abs() < 1e-9);
    }

    #[test]
    fn test_day_index_clamps_to_plan_length() {
        let start = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let plan = plan_starting(start);
        let far_future = start + Duration::days(plan.duration_days as i64 * 3);
        let journey = journey_progress(&plan, far_future);
        assert_eq!(journey.day_index, plan.duration_days);
        assert!((journey.progress - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_future_start_date_stays_at_day_one() {
        let start = NaiveDate::from_ymd_opt(2026, 8, 10).unwrap();
        let plan = plan_starting(start);
        let journey = journey_progress(&plan, start - Duration::days(5));
        assert_eq!(journey.day_index, 1);
    }

    #[test]
    fn test_penalty_examples() {
        assert!((compute_penalty_days(80.0, 0.0) - 5.0).abs() < 1e-9);
        assert!((compute_penalty_days(80.0, 1.0) - 1.75).abs() < 1e-9);
        // Light baseline, mid-journey.
        let penalty = compute_penalty_days(0.0, 0.5);
        assert!((penalty - lerp(1.0, 0.35, 0.5)).abs() < 1e-9);
        // Baselines past 80 mg saturate.
        assert!((compute_penalty_days(400.0, 0.0) - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_relapse_adds_exact_penalty_and_keeps_day_index_valid() {
        let start = NaiveDate::from_ymd_opt(2026, 8, 1).unwrap();
        let mut plan = plan_starting(start);
        let now = start
            .and_hms_opt(20, 0, 0)
            .unwrap()
            .and_utc();

        let before = plan.progress_offset_days;
        let event = apply_relapse(&mut plan, "rough night", &["stress".into()], now);
        assert!((plan.progress_offset_days - before - event.penalty_days).abs() < 1e-9);
        assert!(event.penalty_days > 0.0);

        // Even a pile of relapses never pushes the day index below 1.
        for _ in 0..50 {
            apply_relapse(&mut plan, "", &[], now);
        }
        let journey = journey_progress(&plan, start + Duration::days(3));
        assert_eq!(journey.day_index, 1);
    }
}

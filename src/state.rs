//! Explicit process-boundary state: a key-value store and an optional API
//! client, injected rather than ambient. Every load supplies its own
//! default; every remote failure degrades to whatever is already stored.

use chrono::{Datelike, NaiveDate, Utc};
use serde::Serialize;

use crate::analytics::freedom::{freedom_status, FreedomStatus};
use crate::analytics::insights::{
    diary_reflections, format_unlock, heatmap_matrix, insights_summary, time_bucket_stats,
    trend_metrics, HeatmapMatrix, TimeBucketStat, TrendMetrics,
};
use crate::analytics::patterns::{if_then_insights, pattern_insights, PatternInsight};
use crate::analytics::signals::{adaptive_signal, spike_triggered, AdaptiveSignal};
use crate::client::ApiClient;
use crate::domain::journal::{
    effective_craving_logs, upsert_entry, CravingLog, JournalEntry, RelapseEvent,
};
use crate::domain::journey::{apply_relapse, journey_progress};
use crate::domain::onboarding::OnboardingData;
use crate::domain::plan::{build_quit_plan, QuitPlan};
use crate::error::StoreError;
use crate::personalization::stages::{message_of_the_day, stage_guidance};
use crate::store::{keys, JsonFileStore, KvStore};

pub struct AppState<S: KvStore = JsonFileStore> {
    pub store: S,
    pub client: Option<ApiClient>,
}

/// Everything a dashboard render needs for the current day, derived in one
/// pass from `(plan, entries, craving logs, today)`.
#[derive(Debug, Clone, Serialize)]
pub struct DaySnapshot {
    pub day_index: u32,
    pub duration_days: u32,
    pub progress: f64,
    pub severity_label: String,
    pub baseline_mg_per_day: f64,
    pub signal: AdaptiveSignal,
    pub freedom: FreedomStatus,
    pub stage_headline: Option<String>,
    pub stage_focus: Option<String>,
    pub message_of_the_day: String,
    pub summary: Vec<String>,
    pub reflections: Vec<String>,
    pub patterns: Vec<PatternInsight>,
    pub if_then: Vec<String>,
    pub trend: TrendMetrics,
    /// Unlock hint while the trend chart is still data-starved.
    pub chart_note: Option<String>,
    pub heatmap: HeatmapMatrix,
    pub time_buckets: Vec<TimeBucketStat>,
    pub spike: bool,
}

impl<S: KvStore> AppState<S> {
    pub fn new(store: S, client: Option<ApiClient>) -> Self {
        Self { store, client }
    }

    pub fn onboarding(&self) -> Option<OnboardingData> {
        self.store.read(keys::ONBOARDING)
    }

    pub fn save_onboarding(&self, data: &OnboardingData) -> Result<(), StoreError> {
        self.store.write(keys::ONBOARDING, data)
    }

    pub fn load_plan(&self) -> Option<QuitPlan> {
        self.store.read(keys::PLAN)
    }

    pub fn save_plan(&self, plan: &QuitPlan) -> Result<(), StoreError> {
        self.store.write(keys::PLAN, plan)
    }

    /// The stored plan when it still matches the onboarding inputs, or a
    /// freshly derived (and persisted) one when the answers changed.
    pub fn ensure_plan(&self, data: &OnboardingData) -> Result<QuitPlan, StoreError> {
        let input = data.plan_input();
        if let Some(plan) = self.load_plan() {
            if plan.matches_input(&input) {
                return Ok(plan);
            }
            tracing::info!("onboarding answers changed; rebuilding quit plan");
        }
        let plan = build_quit_plan(input);
        self.save_plan(&plan)?;
        Ok(plan)
    }

    pub fn journal(&self) -> Vec<JournalEntry> {
        self.store.read(keys::JOURNAL).unwrap_or_default()
    }

    pub fn craving_logs(&self) -> Vec<CravingLog> {
        self.store.read(keys::CRAVING_LOGS).unwrap_or_default()
    }

    pub fn relapse_log(&self) -> Vec<RelapseEvent> {
        self.store.read(keys::RELAPSE_LOG).unwrap_or_default()
    }

    /// Upserts a check-in (date is the natural key) and persists the log.
    pub fn record_entry(&self, entry: JournalEntry) -> Result<Vec<JournalEntry>, StoreError> {
        let mut entries = self.journal();
        upsert_entry(&mut entries, entry);
        self.store.write(keys::JOURNAL, &entries)?;
        Ok(entries)
    }

    /// Saves a check-in, writing it through the backend first when a client
    /// is configured. The server owns the entry date and creation time; a
    /// failed write-through degrades to the local entry as given.
    pub async fn record_checkin(
        &self,
        mut entry: JournalEntry,
    ) -> Result<Vec<JournalEntry>, StoreError> {
        if let Some(client) = &self.client {
            let note = (!entry.note.trim().is_empty()).then(|| entry.note.trim().to_string());
            match client.create_diary_entry(entry.mood, note.as_deref()).await {
                Ok(row) => {
                    entry.date = row.entry_date;
                    entry.created_at = Some(row.created_at);
                }
                Err(err) => {
                    tracing::warn!(error = %err, "diary write-through failed; saving locally");
                }
            }
        }
        self.record_entry(entry)
    }

    /// Applies a relapse penalty to the plan, appends the event to the
    /// relapse log, and best-effort mirrors it to the backend. A failed
    /// mirror only logs a warning; local state always moves forward.
    pub async fn record_relapse(
        &self,
        plan: &mut QuitPlan,
        note: &str,
        tags: &[String],
    ) -> Result<RelapseEvent, StoreError> {
        let now = Utc::now();
        if let Some(client) = &self.client {
            if let Err(err) = client.create_relapse_event(note, tags, now).await {
                tracing::warn!(error = %err, "relapse event sync failed; keeping local state");
            }
        }

        let event = apply_relapse(plan, note, tags, now);
        let mut log = self.relapse_log();
        log.push(event.clone());
        self.store.write(keys::RELAPSE_LOG, &log)?;
        self.save_plan(plan)?;
        Ok(event)
    }

    /// Pulls the year-to-date journal from the backend when a client is
    /// configured. Any failure leaves the previously stored journal in
    /// place. Data-starved views degrade; they never error.
    pub async fn sync_journal(&self, today: NaiveDate) -> (Vec<JournalEntry>, Vec<CravingLog>) {
        let Some(client) = &self.client else {
            return (self.journal(), self.craving_logs());
        };

        let year_start = NaiveDate::from_ymd_opt(today.year(), 1, 1).unwrap_or(today);
        match client.fetch_journal(year_start, today).await {
            Ok(sync) => {
                if let Err(err) = self.store.write(keys::JOURNAL, &sync.entries) {
                    tracing::warn!(error = %err, "could not persist synced journal");
                }
                if let Err(err) = self.store.write(keys::CRAVING_LOGS, &sync.craving_logs) {
                    tracing::warn!(error = %err, "could not persist synced craving logs");
                }
                (sync.entries, sync.craving_logs)
            }
            Err(err) => {
                tracing::warn!(error = %err, "journal sync failed; keeping stored entries");
                (self.journal(), self.craving_logs())
            }
        }
    }

    pub fn day_snapshot(
        &self,
        plan: &QuitPlan,
        entries: &[JournalEntry],
        craving_logs: &[CravingLog],
        today: NaiveDate,
    ) -> DaySnapshot {
        let journey = journey_progress(plan, today);
        let stage = stage_guidance(journey.day_index);
        let logs = effective_craving_logs(craving_logs, entries);
        DaySnapshot {
            day_index: journey.day_index,
            duration_days: plan.duration_days,
            progress: journey.progress,
            severity_label: plan.severity_label.label().to_string(),
            baseline_mg_per_day: plan.baseline_mg_per_day,
            signal: adaptive_signal(entries, today),
            freedom: freedom_status(entries),
            stage_headline: stage.map(|s| s.headline.clone()),
            stage_focus: stage.map(|s| s.focus.clone()),
            message_of_the_day: message_of_the_day(journey.day_index.saturating_sub(1)).to_string(),
            summary: insights_summary(entries),
            reflections: diary_reflections(entries, today),
            patterns: pattern_insights(entries, craving_logs),
            if_then: if_then_insights(entries, craving_logs),
            trend: trend_metrics(entries, today),
            chart_note: (entries.len() < 7).then(|| format_unlock(7 - entries.len())),
            heatmap: heatmap_matrix(&logs),
            time_buckets: time_bucket_stats(&logs),
            spike: spike_triggered(entries, today),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::onboarding::{DurationUnit, GoalType};
    use crate::store::MemoryStore;

    fn onboarding() -> OnboardingData {
        OnboardingData {
            product_type: "pouches".into(),
            duration_value: 3.0,
            duration_unit: DurationUnit::Years,
            daily_amount: 12.0,
            daily_unit: "pouches".into(),
            strength_mg_per_unit: Some(8.0),
            start_date: NaiveDate::from_ymd_opt(2026, 8, 1).unwrap(),
            goal_type: GoalType::Reduce,
            pricing_tier: None,
        }
    }

    fn state() -> AppState<MemoryStore> {
        AppState::new(MemoryStore::new(), None)
    }

    #[test]
    fn test_ensure_plan_caches_until_inputs_change() {
        let state = state();
        let data = onboarding();
        let first = state.ensure_plan(&data).unwrap();
        let second = state.ensure_plan(&data).unwrap();
        assert_eq!(first.created_at, second.created_at);

        let mut heavier = data;
        heavier.daily_amount = 30.0;
        let rebuilt = state.ensure_plan(&heavier).unwrap();
        assert!(rebuilt.baseline_mg_per_day > first.baseline_mg_per_day);
        // The rebuilt plan replaced the stored one.
        assert_eq!(
            state.load_plan().unwrap().baseline_mg_per_day,
            rebuilt.baseline_mg_per_day
        );
    }

    #[test]
    fn test_record_entry_replaces_same_date() {
        let state = state();
        let date = NaiveDate::from_ymd_opt(2026, 8, 5).unwrap();
        let entry = |mood: u8| JournalEntry {
            date,
            mood,
            cravings: 2,
            note: String::new(),
            created_at: None,
        };
        state.record_entry(entry(4)).unwrap();
        let entries = state.record_entry(entry(8)).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].mood, 8);
        assert_eq!(state.journal().len(), 1);
    }

    #[tokio::test]
    async fn test_record_relapse_moves_offset_and_appends_log() {
        let state = state();
        let mut plan = state.ensure_plan(&onboarding()).unwrap();
        let event = state
            .record_relapse(&mut plan, "slipped at a party", &["social".into()])
            .await
            .unwrap();

        assert!(plan.progress_offset_days > 0.0);
        assert!((plan.progress_offset_days - event.penalty_days).abs() < 1e-9);
        assert_eq!(state.relapse_log().len(), 1);
        assert_eq!(
            state.load_plan().unwrap().progress_offset_days,
            plan.progress_offset_days
        );
    }

    #[tokio::test]
    async fn test_sync_without_client_returns_stored_journal() {
        let state = state();
        let date = NaiveDate::from_ymd_opt(2026, 8, 5).unwrap();
        state
            .record_entry(JournalEntry {
                date,
                mood: 6,
                cravings: 3,
                note: String::new(),
                created_at: None,
            })
            .unwrap();
        let (entries, logs) = state.sync_journal(date).await;
        assert_eq!(entries.len(), 1);
        assert!(logs.is_empty());
    }

    #[test]
    fn test_day_snapshot_is_renderable_with_no_history() {
        let state = state();
        let plan = state.ensure_plan(&onboarding()).unwrap();
        let today = plan.start_date;
        let snapshot = state.day_snapshot(&plan, &[], &[], today);

        assert_eq!(snapshot.day_index, 1);
        assert_eq!(snapshot.freedom, FreedomStatus::Calibrating);
        assert!(!snapshot.summary.is_empty());
        assert!(!snapshot.message_of_the_day.is_empty());
        assert!(!snapshot.spike);
        assert!(snapshot.trend.avg_cravings_week.is_none());
        assert!(!snapshot.heatmap.ready);
        assert!(snapshot.chart_note.as_deref().unwrap().contains("7 more"));
    }
}

use chrono::{DateTime, NaiveDate, Timelike, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One check-in per calendar date; the date is the natural key and later
/// writes for the same date replace earlier ones.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalEntry {
    pub date: NaiveDate,
    /// Mood 1-10.
    pub mood: u8,
    /// Craving score for the day; non-negative, unbounded in practice.
    pub cravings: u32,
    #[serde(default)]
    pub note: String,
    /// Wall-clock creation time, when known. Drives time-of-day bucketing.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CravingSource {
    Journal,
    Backend,
}

/// A single timestamped craving occurrence, feeding the weekday/time-slot
/// heatmap and the time-of-day averages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CravingLog {
    pub date: NaiveDate,
    pub hour: u32,
    pub intensity: u32,
    pub source: CravingSource,
    pub created_at: DateTime<Utc>,
}

/// Append-only relapse record. Never mutated after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelapseEvent {
    pub id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub penalty_days: f64,
    pub note: String,
    pub tags: Vec<String>,
}

/// Inserts the entry, replacing any existing entry for the same date, and
/// keeps the log ordered newest first.
pub fn upsert_entry(entries: &mut Vec<JournalEntry>, entry: JournalEntry) {
    entries.retain(|existing| existing.date != entry.date);
    entries.push(entry);
    entries.sort_by(|a, b| b.date.cmp(&a.date));
}

pub fn sorted_desc(entries: &[JournalEntry]) -> Vec<JournalEntry> {
    let mut sorted = entries.to_vec();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));
    sorted
}

pub fn entry_for(entries: &[JournalEntry], date: NaiveDate) -> Option<&JournalEntry> {
    entries.iter().find(|entry| entry.date == date)
}

/// Today's entry when present, otherwise the most recent one.
pub fn latest_entry(entries: &[JournalEntry], today: NaiveDate) -> Option<&JournalEntry> {
    entry_for(entries, today).or_else(|| entries.iter().max_by_key(|entry| entry.date))
}

/// The craving log to analyze: real logs when any exist, otherwise logs
/// synthesized from timestamped journal entries with a nonzero craving score.
pub fn effective_craving_logs(logs: &[CravingLog], entries: &[JournalEntry]) -> Vec<CravingLog> {
    if !logs.is_empty() {
        return logs.to_vec();
    }
    entries
        .iter()
        .filter(|entry| entry.cravings > 0)
        .filter_map(|entry| {
            entry.created_at.map(|created| CravingLog {
                date: entry.date,
                hour: created.hour(),
                intensity: entry.cravings,
                source: CravingSource::Journal,
                created_at: created,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

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

    #[test]
    fn test_upsert_replaces_same_date() {
        let mut entries = vec![entry(1, 5, 3), entry(2, 6, 2)];
        upsert_entry(&mut entries, entry(2, 9, 0));
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].date, date(2));
        assert_eq!(entries[0].mood, 9);
        assert_eq!(entries[1].date, date(1));
    }

    #[test]
    fn test_latest_entry_prefers_today() {
        let entries = vec![entry(5, 4, 8), entry(3, 7, 1)];
        let today = date(5);
        assert_eq!(latest_entry(&entries, today).unwrap().date, date(5));

        // No entry for today: fall back to the newest by date.
        let later = date(9);
        assert_eq!(latest_entry(&entries, later).unwrap().date, date(5));
        assert!(latest_entry(&[], later).is_none());
    }

    #[test]
    fn test_effective_logs_fall_back_to_timestamped_entries() {
        let stamped = JournalEntry {
            created_at: Some("2026-08-03T18:30:00Z".parse().unwrap()),
            ..entry(3, 5, 6)
        };
        let unstamped = entry(2, 5, 4);
        let zero = JournalEntry {
            created_at: Some("2026-08-01T09:00:00Z".parse().unwrap()),
            ..entry(1, 7, 0)
        };

        let synthesized = effective_craving_logs(&[], &[stamped.clone(), unstamped, zero]);
        assert_eq!(synthesized.len(), 1);
        assert_eq!(synthesized[0].hour, 18);
        assert_eq!(synthesized[0].intensity, 6);
        assert_eq!(synthesized[0].source, CravingSource::Journal);

        // Real logs win over synthesis.
        let real = vec![CravingLog {
            date: date(4),
            hour: 9,
            intensity: 2,
            source: CravingSource::Backend,
            created_at: "2026-08-04T09:00:00Z".parse().unwrap(),
        }];
        let effective = effective_craving_logs(&real, &[stamped]);
        assert_eq!(effective.len(), 1);
        assert_eq!(effective[0].source, CravingSource::Backend);
    }
}

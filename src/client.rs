//! Read-mostly client for the program backend: diary rows and craving
//! events come down, journal entries get reconstructed locally. Callers
//! treat every failure as "keep what you had"; see
//! [`crate::state::AppState::sync_journal`].

use std::collections::HashMap;

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Timelike, Utc};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;

use crate::domain::journal::{CravingLog, CravingSource, JournalEntry};
use crate::error::Error;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api/v1";

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub access_token: String,
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>, access_token: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            access_token: access_token.into(),
        }
    }

    /// Config from `QUITOTINE_API_BASE_URL` / `QUITOTINE_ACCESS_TOKEN`.
    /// Without a token there is nothing to talk to; returns `None`.
    pub fn from_env() -> Option<Self> {
        let access_token = std::env::var("QUITOTINE_ACCESS_TOKEN").ok()?;
        let base_url = std::env::var("QUITOTINE_API_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string());
        Some(Self::new(base_url, access_token))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DiaryRow {
    pub entry_date: NaiveDate,
    pub mood: u8,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CravingEventRow {
    pub intensity: Option<u32>,
    pub occurred_at: DateTime<Utc>,
}

/// Journal state reconstructed from the two backend reads.
#[derive(Debug, Clone, Default)]
pub struct JournalSync {
    pub entries: Vec<JournalEntry>,
    pub craving_logs: Vec<CravingLog>,
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    config: ApiConfig,
}

impl ApiClient {
    pub fn new(config: ApiConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, Error> {
        let response = self
            .http
            .get(format!("{}{}", self.config.base_url, path))
            .bearer_auth(&self.config.access_token)
            .query(query)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }

    pub async fn fetch_diary(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DiaryRow>, Error> {
        self.get_json(
            "/diary",
            &[("start", start.to_string()), ("end", end.to_string())],
        )
        .await
    }

    pub async fn fetch_craving_events(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<CravingEventRow>, Error> {
        self.get_json(
            "/events",
            &[
                ("event_type", "craving".to_string()),
                ("start", start.to_rfc3339()),
                ("end", end.to_rfc3339()),
            ],
        )
        .await
    }

    /// Both reads, concurrently, mapped into journal state.
    pub async fn fetch_journal(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<JournalSync, Error> {
        let start_at = start.and_time(NaiveTime::MIN).and_utc();
        // Through the end of the last requested day.
        let end_at = end.and_time(NaiveTime::MIN).and_utc() + Duration::days(1);
        let (diary, events) = tokio::try_join!(
            self.fetch_diary(start, end),
            self.fetch_craving_events(start_at, end_at)
        )?;
        Ok(map_journal(diary, events))
    }

    /// Creates today's diary entry; the server assigns the entry date.
    pub async fn create_diary_entry(
        &self,
        mood: u8,
        note: Option<&str>,
    ) -> Result<DiaryRow, Error> {
        let response = self
            .http
            .post(format!("{}/diary", self.config.base_url))
            .bearer_auth(&self.config.access_token)
            .json(&json!({ "mood": mood, "note": note }))
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }

    /// Records a relapse event; note and tags collapse into the notes field.
    pub async fn create_relapse_event(
        &self,
        note: &str,
        tags: &[String],
        occurred_at: DateTime<Utc>,
    ) -> Result<(), Error> {
        let mut parts: Vec<&str> = Vec::new();
        let trimmed = note.trim();
        if !trimmed.is_empty() {
            parts.push(trimmed);
        }
        parts.extend(tags.iter().map(String::as_str));

        self.http
            .post(format!("{}/events", self.config.base_url))
            .bearer_auth(&self.config.access_token)
            .json(&json!({
                "event_type": "relapse",
                "amount": 1,
                "notes": parts.join(" | "),
                "occurred_at": occurred_at.to_rfc3339(),
            }))
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

/// Rebuilds journal entries from diary rows plus per-date craving counts.
/// Events without an intensity are dropped, matching the backend's nullable
/// column.
pub fn map_journal(diary: Vec<DiaryRow>, events: Vec<CravingEventRow>) -> JournalSync {
    let mut cravings_by_date: HashMap<NaiveDate, u32> = HashMap::new();
    let mut craving_logs = Vec::new();
    for row in events {
        let Some(intensity) = row.intensity else {
            continue;
        };
        let date = row.occurred_at.date_naive();
        *cravings_by_date.entry(date).or_insert(0) += 1;
        craving_logs.push(CravingLog {
            date,
            hour: row.occurred_at.hour(),
            intensity: intensity.max(1),
            source: CravingSource::Backend,
            created_at: row.occurred_at,
        });
    }

    let mut entries: Vec<JournalEntry> = diary
        .into_iter()
        .map(|row| JournalEntry {
            date: row.entry_date,
            mood: row.mood,
            cravings: cravings_by_date.get(&row.entry_date).copied().unwrap_or(0),
            note: row.note.unwrap_or_default(),
            created_at: Some(row.created_at),
        })
        .collect();
    entries.sort_by(|a, b| b.date.cmp(&a.date));

    JournalSync {
        entries,
        craving_logs,
    }
}

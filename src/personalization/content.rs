//! Typed view of the embedded personalization copy. The JSON file mirrors
//! the content layout the product ships for English; templates use `{name}`
//! placeholders filled in by [`interpolate`].

use once_cell::sync::Lazy;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageConfig {
    pub day_min: u32,
    pub day_max: Option<u32>,
    pub headline: String,
    pub summary: String,
    pub reassurance: String,
    pub focus: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SignalTemplate {
    pub title: String,
    pub body: String,
    pub support: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdaptiveSignalTemplates {
    pub no_data: SignalTemplate,
    pub default: SignalTemplate,
    pub cravings_high_mood_stable: SignalTemplate,
    pub mood_low_cravings_low: SignalTemplate,
    pub both_high: SignalTemplate,
    pub stable: SignalTemplate,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Milestone {
    pub day: u32,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightTexts {
    pub empty: String,
    pub cravings_steady: String,
    pub cravings_ease: String,
    pub cravings_rise: String,
    pub mood_stable: String,
    pub mood_lower: String,
    pub time_of_day: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReflectionTexts {
    pub empty: String,
    pub week_ago: String,
    pub recovery: String,
    pub mood_up: String,
    pub mood_down: String,
    pub mood_steady: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternTexts {
    pub locked: String,
    pub time_of_day_title: String,
    pub time_of_day: String,
    pub time_of_day_flat: String,
    pub weekday_title: String,
    pub weekday: String,
    pub weekday_flat: String,
    pub mood_link_title: String,
    pub mood_link: String,
    pub mood_link_flat: String,
    pub recovery_title: String,
    pub recovery: String,
    pub recovery_flat: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IfThenTexts {
    pub locked: String,
    pub time_of_day: String,
    pub mood_link: String,
    pub weekday: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpikeTexts {
    pub title: String,
    pub subtitle: String,
    pub reframe: String,
    pub lie_choices: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalizationContent {
    pub stages: Vec<StageConfig>,
    pub adaptive_signals: AdaptiveSignalTemplates,
    pub milestones: Vec<Milestone>,
    pub insights: InsightTexts,
    pub reflections: ReflectionTexts,
    pub patterns: PatternTexts,
    pub if_then: IfThenTexts,
    pub spike: SpikeTexts,
    pub daily_messages: Vec<String>,
}

pub static CONTENT: Lazy<PersonalizationContent> = Lazy::new(|| {
    serde_json::from_str(include_str!("../../content/personalization_en.json"))
        .expect("embedded personalization_en.json is valid")
});

/// Fills `{name}` placeholders in a copy template.
pub fn interpolate(template: &str, vars: &[(&str, String)]) -> String {
    let mut out = template.to_string();
    for (key, value) in vars {
        out = out.replace(&format!("{{{key}}}"), value);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_content_parses() {
        let content = &*CONTENT;
        assert!(!content.stages.is_empty());
        assert_eq!(content.stages[0].day_min, 1);
        assert_eq!(content.daily_messages.len(), 7);
        assert!(!content.milestones.is_empty());
    }

    #[test]
    fn test_interpolate() {
        let line = interpolate(
            "Higher cravings tend to appear in the {window}.",
            &[("window", "evening".to_string())],
        );
        assert_eq!(line, "Higher cravings tend to appear in the evening.");
    }
}

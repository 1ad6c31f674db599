//! Carr-style reframing content: a ladder of belief-work steps that unlock
//! as the plan advances, and a rotating pool of one-line "lenses" picked
//! deterministically so the same day always shows the same lens.

use chrono::NaiveDate;

use crate::domain::journal::{latest_entry, JournalEntry};

/// Craving score at or above which the high-craving variants kick in.
pub const HIGH_CRAVING_THRESHOLD: u32 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepContext {
    HighCraving,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CarrStep {
    pub id: &'static str,
    pub unlock_day: u32,
    pub title: &'static str,
    pub reframe: &'static str,
    pub action: &'static str,
    pub context: Option<StepContext>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CarrLens {
    pub id: &'static str,
    pub line: &'static str,
    pub question: &'static str,
    pub tags: &'static [&'static str],
}

const CARR_STEPS: &[CarrStep] = &[
    CarrStep {
        id: "nothing_is_given_up",
        unlock_day: 1,
        title: "You are giving up nothing",
        reframe: "Nicotine relieves a discomfort nicotine itself created. Removing it removes the need, not a pleasure.",
        action: "Next urge, say out loud what the dose would actually fix. Name the loop.",
        context: None,
    },
    CarrStep {
        id: "the_urge_is_the_exit",
        unlock_day: 3,
        title: "The urge is the exit",
        reframe: "Every craving you sit through is the dependency unwinding, not a sign it is winning.",
        action: "Time one urge today from first tug to fade. Write the number down.",
        context: Some(StepContext::HighCraving),
    },
    CarrStep {
        id: "relief_is_a_loan",
        unlock_day: 5,
        title: "Relief is a loan",
        reframe: "The calm after a dose is just the withdrawal pausing. You are paying interest on borrowed relief.",
        action: "Before your usual trigger time, do your replacement ritual first.",
        context: None,
    },
    CarrStep {
        id: "identity_over_willpower",
        unlock_day: 7,
        title: "Identity over willpower",
        reframe: "You are not resisting a treat; you are someone who does not use. Willpower is for people still negotiating.",
        action: "Finish this sentence in your journal: \"I am someone who...\"",
        context: None,
    },
    CarrStep {
        id: "the_wave_always_breaks",
        unlock_day: 10,
        title: "The wave always breaks",
        reframe: "No craving in history has lasted forever. Intensity is not duration.",
        action: "Surf one urge today without any tool at all. Just watch it end.",
        context: Some(StepContext::HighCraving),
    },
    CarrStep {
        id: "triggers_are_rehearsals",
        unlock_day: 14,
        title: "Triggers are rehearsals",
        reframe: "A trigger that fires without a dose afterward is being unlearned in that exact moment.",
        action: "Walk into one known trigger on purpose today, plan ready.",
        context: None,
    },
    CarrStep {
        id: "the_last_ghost",
        unlock_day: 21,
        title: "The last ghost",
        reframe: "Stray thoughts of using months in are echoes of an old schedule, not unmet needs.",
        action: "When an echo shows up, label it \"old schedule\" and move on.",
        context: None,
    },
    CarrStep {
        id: "keep_the_door_shut",
        unlock_day: 30,
        title: "Keep the door shut",
        reframe: "\"Just one\" restarts the whole loop; there is no such thing as one for a rewired brain.",
        action: "Write down what \"just one\" would actually cost you in plan days.",
        context: None,
    },
];

const CARR_LENSES: &[CarrLens] = &[
    CarrLens {
        id: "who_is_asking",
        line: "The craving is the addiction talking, not you.",
        question: "Who benefits if you believe the urge is your own voice?",
        tags: &[],
    },
    CarrLens {
        id: "trade_math",
        line: "You traded minutes of relief for hours of wanting.",
        question: "What did the last dose actually buy you?",
        tags: &["craving"],
    },
    CarrLens {
        id: "trigger_map",
        line: "Triggers are learned, which means they can be unlearned.",
        question: "Which place or person fired the loop most recently?",
        tags: &["triggers"],
    },
    CarrLens {
        id: "future_self",
        line: "Your future self is built from today's boring repetitions.",
        question: "What would day-90 you thank you for doing today?",
        tags: &[],
    },
    CarrLens {
        id: "stress_story",
        line: "Nicotine never fixed stress; it only paused its own absence.",
        question: "What actually helps when the day gets heavy?",
        tags: &["triggers", "craving"],
    },
    CarrLens {
        id: "freedom_frame",
        line: "This is not deprivation. It is the end of being managed by a molecule.",
        question: "What does freedom look like on an ordinary Tuesday?",
        tags: &[],
    },
    CarrLens {
        id: "urge_weather",
        line: "Urges are weather. You are the climate.",
        question: "What is the forecast for tonight, and what is your umbrella?",
        tags: &["craving"],
    },
    CarrLens {
        id: "small_wins",
        line: "Every logged day is evidence against the old story.",
        question: "What small win from this week deserves to be written down?",
        tags: &[],
    },
];

/// The reframe step for the current day: highest unlocked step wins, unless
/// the latest check-in shows high cravings and a high-craving variant is
/// already unlocked. Returns nothing until the first check-in exists.
pub fn carr_step(
    day: u32,
    entries: &[JournalEntry],
    today: NaiveDate,
) -> Option<&'static CarrStep> {
    let latest = latest_entry(entries, today)?;
    let unlocked: Vec<&CarrStep> = CARR_STEPS
        .iter()
        .filter(|step| day >= step.unlock_day)
        .collect();
    let base = unlocked.last().copied()?;

    if latest.cravings >= HIGH_CRAVING_THRESHOLD {
        if let Some(alt) = unlocked
            .iter()
            .rev()
            .find(|step| step.context == Some(StepContext::HighCraving))
            .copied()
        {
            return Some(alt);
        }
    }
    Some(base)
}

/// The lens for the current day. Pool precedence: trigger-tag matches, then
/// craving-tagged lenses when the latest check-in runs hot, then the full
/// pool; selection is `day % pool.len()` so repeated renders of the same day
/// are stable.
pub fn carr_lens(
    day: u32,
    entries: &[JournalEntry],
    trigger_tags: &[String],
    today: NaiveDate,
) -> &'static CarrLens {
    let trigger_pool: Vec<&CarrLens> = CARR_LENSES
        .iter()
        .filter(|lens| {
            lens.tags
                .iter()
                .any(|tag| trigger_tags.iter().any(|wanted| wanted == tag))
        })
        .collect();

    let cravings_hot = latest_entry(entries, today)
        .map(|entry| entry.cravings >= HIGH_CRAVING_THRESHOLD)
        .unwrap_or(false);
    let craving_pool: Vec<&CarrLens> = if cravings_hot {
        CARR_LENSES
            .iter()
            .filter(|lens| lens.tags.contains(&"craving"))
            .collect()
    } else {
        Vec::new()
    };

    let pool: Vec<&CarrLens> = if !trigger_pool.is_empty() {
        trigger_pool
    } else if !craving_pool.is_empty() {
        craving_pool
    } else {
        CARR_LENSES.iter().collect()
    };

    pool[day as usize % pool.len()]
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
    fn test_steps_unlock_progressively() {
        let entries = vec![entry(1, 6, 2)];
        let today = date(1);
        assert_eq!(
            carr_step(1, &entries, today).unwrap().id,
            "nothing_is_given_up"
        );
        assert_eq!(
            carr_step(7, &entries, today).unwrap().id,
            "identity_over_willpower"
        );
        assert_eq!(
            carr_step(30, &entries, today).unwrap().id,
            "keep_the_door_shut"
        );
    }

    #[test]
    fn test_no_step_before_first_checkin() {
        assert!(carr_step(5, &[], date(5)).is_none());
    }

    #[test]
    fn test_high_cravings_prefer_context_variant() {
        let entries = vec![entry(14, 6, 8)];
        let step = carr_step(14, &entries, date(14)).unwrap();
        assert_eq!(step.context, Some(StepContext::HighCraving));
        assert_eq!(step.id, "the_wave_always_breaks");

        // Below the threshold the plain ladder applies.
        let calm = vec![entry(14, 6, 3)];
        assert_eq!(
            carr_step(14, &calm, date(14)).unwrap().id,
            "triggers_are_rehearsals"
        );
    }

    #[test]
    fn test_lens_rotation_is_deterministic() {
        let entries = vec![entry(4, 6, 1)];
        let today = date(4);
        let first = carr_lens(4, &entries, &[], today);
        assert_eq!(first.id, carr_lens(4, &entries, &[], today).id);
        // A different day usually rotates to a different lens.
        assert_ne!(first.id, carr_lens(5, &entries, &[], today).id);
    }

    #[test]
    fn test_lens_pool_precedence() {
        let hot = vec![entry(6, 5, 9)];
        let today = date(6);

        // Trigger tags outrank the craving pool.
        let lens = carr_lens(6, &hot, &["triggers".to_string()], today);
        assert!(lens.tags.contains(&"triggers"));

        // Without trigger tags, hot cravings restrict to the craving pool.
        let lens = carr_lens(6, &hot, &[], today);
        assert!(lens.tags.contains(&"craving"));

        // Calm day, no tags: full pool by modulo index.
        let calm = vec![entry(6, 6, 1)];
        let lens = carr_lens(8, &calm, &[], today);
        assert_eq!(lens.id, CARR_LENSES[0].id);
    }
}

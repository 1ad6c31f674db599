//! Quitotine core engine: quit-plan derivation, journey tracking, and the
//! personalization heuristics that turn a daily mood/craving log into
//! renderable guidance.
//!
//! The modules are pure transformations of `(plan, entries, now)`; the only
//! mutable state anywhere is [`domain::plan::QuitPlan::progress_offset_days`],
//! which grows as relapses are recorded. Persistence and the remote journal
//! sync are explicit dependencies injected through [`state::AppState`].

pub mod analytics;
pub mod client;
pub mod domain;
pub mod error;
pub mod personalization;
pub mod state;
pub mod store;
pub mod time_utils;

pub use error::{Error, StoreError};

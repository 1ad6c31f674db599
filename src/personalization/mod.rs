pub mod carr;
pub mod content;
pub mod stages;

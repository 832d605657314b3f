pub mod engine;
pub mod outcome;

pub use engine::{assess_overall, classify_factor, classify_overall};
pub use outcome::{FactorClassResult, OverallClassification};

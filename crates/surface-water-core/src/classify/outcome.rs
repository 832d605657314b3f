use crate::model::QualityClass;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Classification result for a single factor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FactorClassResult {
    /// Factor code (lowercase).
    pub code: String,
    /// Display name from the standard.
    pub name: String,
    pub value: Decimal,
    /// Unit string for display.
    pub unit: String,
    pub class: QualityClass,
    /// The boundary that placed the value in its class (class Ⅴ boundary for 劣Ⅴ).
    pub boundary: Option<Decimal>,
    /// Human-readable explanation of the classification.
    pub reason: String,
}

/// Overall class of a sample, with the factors that determined it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverallClassification {
    /// The worst class across all included factors.
    pub overall_class: QualityClass,
    /// Human-readable explanation of the overall class.
    pub overall_reason: String,
    /// Factor(s) at the overall class.
    pub determining_factors: Vec<String>,
    /// Per-factor results, in standard order.
    pub factor_results: Vec<FactorClassResult>,
    /// Opt-in factors that were supplied but left out of the aggregate.
    pub excluded_factors: Vec<String>,
}

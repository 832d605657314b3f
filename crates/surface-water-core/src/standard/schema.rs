use crate::model::Factor;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A water quality standard document: factor catalogue, class rules,
/// single limits and CWQI index sets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardDef {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub description: Option<String>,
    pub factors: Vec<Factor>,
    /// Factors that take part in six-way classification, in reporting order.
    pub class_rules: Vec<ClassRuleDef>,
    /// Factor code -> single limit value (secondary factors only).
    #[serde(default)]
    pub single_limits: BTreeMap<String, Decimal>,
    /// Index set name -> factor codes summed into the composite index.
    #[serde(default)]
    pub index_sets: BTreeMap<String, Vec<String>>,
}

/// How a factor's value maps to a class.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum ClassRuleDef {
    /// Class Ⅰ inside `[min, max]`, 劣Ⅴ outside (pH).
    Range {
        code: String,
        min: Decimal,
        max: Decimal,
        /// Physically valid scale; values outside are rejected.
        scale_min: Decimal,
        scale_max: Decimal,
        /// Reference point of the index formula.
        neutral: Decimal,
    },
    /// Higher is better; thresholds listed class Ⅰ..Ⅴ, non-increasing.
    Descending { code: String, thresholds: Vec<Decimal> },
    /// Lower is better; thresholds listed class Ⅰ..Ⅴ, non-decreasing.
    Ascending {
        code: String,
        thresholds: Vec<Decimal>,
        /// Lake/reservoir variant, if it differs from the river thresholds.
        #[serde(default)]
        lake_thresholds: Option<Vec<Decimal>>,
        /// Set for factors that only count towards the overall class on request.
        #[serde(default)]
        opt_in: Option<OptInFactor>,
    },
}

impl ClassRuleDef {
    pub fn code(&self) -> &str {
        match self {
            ClassRuleDef::Range { code, .. }
            | ClassRuleDef::Descending { code, .. }
            | ClassRuleDef::Ascending { code, .. } => code,
        }
    }
}

/// Factors listed "for reference" that are excluded from the overall class
/// unless the evaluator opts in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptInFactor {
    TotalNitrogen,
    FecalColiform,
}

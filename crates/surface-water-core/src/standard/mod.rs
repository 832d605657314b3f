pub mod builtin;
pub mod schema;
pub mod table;

use crate::cwqi::IndexSet;
use crate::error::WaterQualityError;
use rust_decimal::Decimal;
use schema::{ClassRuleDef, StandardDef};
use std::collections::HashSet;
use std::path::Path;
use table::normalize_code;

pub use table::{ClassRule, ClassThresholds, NeutralRange, StandardTable};

/// Load and compile a standard from a JSON file.
pub fn load_standard(path: &Path) -> Result<StandardTable, WaterQualityError> {
    let content = std::fs::read_to_string(path).map_err(|e| WaterQualityError::StandardLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let def: StandardDef =
        serde_json::from_str(&content).map_err(|e| WaterQualityError::StandardLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
    StandardTable::compile(&def)
}

/// Parse and compile a standard from a JSON string.
pub fn parse_standard_str(json: &str) -> Result<StandardTable, WaterQualityError> {
    let def: StandardDef = serde_json::from_str(json)?;
    StandardTable::compile(&def)
}

/// Validate that a standard document is well-formed.
pub fn validate_standard(def: &StandardDef) -> Result<(), WaterQualityError> {
    if def.factors.is_empty() {
        return Err(WaterQualityError::StandardInvalid(
            "factors must not be empty".into(),
        ));
    }

    let mut known = HashSet::new();
    for factor in &def.factors {
        let code = normalize_code(&factor.code);
        if code.is_empty() {
            return Err(WaterQualityError::StandardInvalid(
                "factor code must not be empty".into(),
            ));
        }
        if !known.insert(code) {
            return Err(WaterQualityError::StandardInvalid(format!(
                "factor '{}' is defined more than once",
                factor.code
            )));
        }
    }

    let mut classifiable = HashSet::new();
    for rule in &def.class_rules {
        let code = normalize_code(rule.code());
        if !known.contains(&code) {
            return Err(WaterQualityError::StandardInvalid(format!(
                "class rule references unknown factor '{}'",
                rule.code()
            )));
        }
        if !classifiable.insert(code) {
            return Err(WaterQualityError::StandardInvalid(format!(
                "factor '{}' has more than one class rule",
                rule.code()
            )));
        }
        validate_rule(rule)?;
    }

    for (code, limit) in &def.single_limits {
        let normalized = normalize_code(code);
        if !known.contains(&normalized) {
            return Err(WaterQualityError::StandardInvalid(format!(
                "single limit references unknown factor '{}'",
                code
            )));
        }
        if classifiable.contains(&normalized) {
            return Err(WaterQualityError::StandardInvalid(format!(
                "factor '{}' cannot have both a class rule and a single limit",
                code
            )));
        }
        if *limit <= Decimal::ZERO {
            return Err(WaterQualityError::StandardInvalid(format!(
                "single limit for '{}' must be positive",
                code
            )));
        }
    }

    for (key, codes) in &def.index_sets {
        if IndexSet::from_key(key).is_none() {
            return Err(WaterQualityError::StandardInvalid(format!(
                "unknown index set '{}'",
                key
            )));
        }
        if codes.is_empty() {
            return Err(WaterQualityError::StandardInvalid(format!(
                "index set '{}' must not be empty",
                key
            )));
        }
        let mut seen = HashSet::new();
        for code in codes {
            let normalized = normalize_code(code);
            if !classifiable.contains(&normalized) {
                return Err(WaterQualityError::StandardInvalid(format!(
                    "index set '{}' references '{}', which has no class rule",
                    key, code
                )));
            }
            if !seen.insert(normalized) {
                return Err(WaterQualityError::StandardInvalid(format!(
                    "index set '{}' lists '{}' more than once",
                    key, code
                )));
            }
        }
    }

    Ok(())
}

fn validate_rule(rule: &ClassRuleDef) -> Result<(), WaterQualityError> {
    match rule {
        ClassRuleDef::Range {
            code,
            min,
            max,
            scale_min,
            scale_max,
            neutral,
        } => {
            if min > max {
                return Err(WaterQualityError::StandardInvalid(format!(
                    "range for '{}' has min {} above max {}",
                    code, min, max
                )));
            }
            if min < scale_min || max > scale_max || neutral < scale_min || neutral > scale_max {
                return Err(WaterQualityError::StandardInvalid(format!(
                    "range for '{}' must lie within its scale [{}, {}]",
                    code, scale_min, scale_max
                )));
            }
        }
        ClassRuleDef::Descending { code, thresholds } => {
            check_thresholds(code, thresholds, Ordering::Descending)?;
        }
        ClassRuleDef::Ascending {
            code,
            thresholds,
            lake_thresholds,
            ..
        } => {
            check_thresholds(code, thresholds, Ordering::Ascending)?;
            if let Some(lake) = lake_thresholds {
                check_thresholds(code, lake, Ordering::Ascending)?;
            }
        }
    }
    Ok(())
}

#[derive(Clone, Copy)]
enum Ordering {
    Ascending,
    Descending,
}

fn check_thresholds(
    code: &str,
    thresholds: &[Decimal],
    ordering: Ordering,
) -> Result<(), WaterQualityError> {
    if thresholds.len() != 5 {
        return Err(WaterQualityError::StandardInvalid(format!(
            "factor '{}' must have exactly 5 class thresholds, found {}",
            code,
            thresholds.len()
        )));
    }
    // Class Ⅲ is the index denominator.
    if thresholds.iter().any(|t| *t <= Decimal::ZERO) {
        return Err(WaterQualityError::StandardInvalid(format!(
            "thresholds for '{}' must be positive",
            code
        )));
    }
    let ordered = thresholds.windows(2).all(|w| match ordering {
        Ordering::Ascending => w[0] <= w[1],
        Ordering::Descending => w[0] >= w[1],
    });
    if !ordered {
        let direction = match ordering {
            Ordering::Ascending => "non-decreasing",
            Ordering::Descending => "non-increasing",
        };
        return Err(WaterQualityError::StandardInvalid(format!(
            "thresholds for '{}' must be {} from class Ⅰ to Ⅴ",
            code, direction
        )));
    }
    Ok(())
}

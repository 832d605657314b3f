//! Membership and value checks shared by the classification and index engines.

use crate::error::WaterQualityError;
use crate::standard::table::normalize_code;
use crate::standard::{ClassRule, StandardTable};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// True for factors with a six-way class rule in `standard`.
pub fn is_classifiable_factor(standard: &StandardTable, code: &str) -> bool {
    standard.is_classifiable(code)
}

/// True for factors that only carry a single limit in `standard`.
pub fn is_secondary_factor(standard: &StandardTable, code: &str) -> bool {
    standard.is_secondary(code)
}

/// Reject values that cannot be a valid reading of `code`.
///
/// Every factor must be non-negative; range-classified factors (pH) must also
/// lie within their scale.
pub fn validate_value(
    standard: &StandardTable,
    code: &str,
    value: Decimal,
) -> Result<(), WaterQualityError> {
    if let Ok(ClassRule::Range(range)) = standard.class_rule(code) {
        if value < range.scale_min || value > range.scale_max {
            return Err(WaterQualityError::OutOfRange {
                factor: standard.factor_name(code),
                value,
                reason: format!(
                    "must be between {} and {}",
                    range.scale_min, range.scale_max
                ),
            });
        }
    }
    if value < Decimal::ZERO {
        return Err(WaterQualityError::OutOfRange {
            factor: standard.factor_name(code),
            value,
            reason: "must not be negative".into(),
        });
    }
    Ok(())
}

/// Outcome of comparing a secondary factor against its single limit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimitCheck {
    pub code: String,
    pub value: Decimal,
    pub limit: Decimal,
    pub exceeded: bool,
}

/// Compare a secondary factor's value with its single limit.
pub fn check_single_limit(
    standard: &StandardTable,
    code: &str,
    value: Decimal,
) -> Result<LimitCheck, WaterQualityError> {
    let limit = standard.single_limit(code)?;
    validate_value(standard, code, value)?;
    Ok(LimitCheck {
        code: normalize_code(code),
        value,
        limit,
        exceeded: value > limit,
    })
}

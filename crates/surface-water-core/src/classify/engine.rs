use crate::classify::outcome::{FactorClassResult, OverallClassification};
use crate::error::WaterQualityError;
use crate::model::{FactorReading, QualityClass, WaterBody};
use crate::standard::table::{normalize_code, select_variant};
use crate::standard::{ClassRule, ClassThresholds, StandardTable};
use crate::validators::validate_value;
use crate::EvaluationOptions;
use rust_decimal::Decimal;
use std::collections::HashMap;

/// Classify a single factor value.
///
/// Range rules (pH) are binary: Ⅰ inside the band, 劣Ⅴ outside. Descending
/// rules (dissolved oxygen) place a value in the best class whose boundary it
/// reaches; ascending rules in the best class whose boundary it does not
/// exceed.
pub fn classify_factor(
    standard: &StandardTable,
    code: &str,
    value: Decimal,
    water_body: WaterBody,
) -> Result<QualityClass, WaterQualityError> {
    let (class, _) = place(standard, code, value, water_body)?;
    Ok(class)
}

/// Overall class of a sample: the worst class of all included factors.
pub fn classify_overall(
    standard: &StandardTable,
    readings: &[FactorReading],
    options: &EvaluationOptions,
) -> Result<QualityClass, WaterQualityError> {
    assess_overall(standard, readings, options).map(|o| o.overall_class)
}

/// Classify every included factor and determine the overall class.
///
/// Every classifiable factor except the opt-in ones must have a measured
/// reading; total nitrogen and fecal coliform are only counted when `options`
/// asks for them.
pub fn assess_overall(
    standard: &StandardTable,
    readings: &[FactorReading],
    options: &EvaluationOptions,
) -> Result<OverallClassification, WaterQualityError> {
    let by_code = index_readings(readings, |code| {
        if standard.is_classifiable(code) {
            Ok(())
        } else {
            Err(WaterQualityError::UnknownFactor {
                code: code.to_string(),
                context: "classification".into(),
            })
        }
    })?;

    let mut factor_results = Vec::new();
    let mut excluded_factors = Vec::new();

    for code in standard.classifiable_codes() {
        let reading = by_code.get(code.as_str());

        if let Some(opt_in) = standard.opt_in(code) {
            if !options.includes(opt_in) {
                if let Some(reading) = reading {
                    if let Some(value) = reading.value.value() {
                        validate_value(standard, code, value)?;
                    }
                    tracing::warn!(
                        "Skipping {} ({}): reference-only factor not included in overall class",
                        standard.factor_name(code),
                        code
                    );
                    excluded_factors.push(code.clone());
                }
                continue;
            }
        }

        let value = reading
            .and_then(|r| r.value.value())
            .ok_or_else(|| WaterQualityError::MissingReading { code: code.clone() })?;

        factor_results.push(classify_with_reason(
            standard,
            code,
            value,
            options.water_body,
        )?);
    }

    determine_overall(factor_results, excluded_factors)
}

/// Map readings by normalized code, rejecting duplicates and codes `accept` refuses.
pub(crate) fn index_readings<'a>(
    readings: &'a [FactorReading],
    accept: impl Fn(&str) -> Result<(), WaterQualityError>,
) -> Result<HashMap<String, &'a FactorReading>, WaterQualityError> {
    let mut by_code = HashMap::with_capacity(readings.len());
    for reading in readings {
        accept(&reading.code)?;
        let code = normalize_code(&reading.code);
        if by_code.insert(code.clone(), reading).is_some() {
            return Err(WaterQualityError::DuplicateReading { code });
        }
    }
    Ok(by_code)
}

/// Validate, then find the class and the boundary that decided it.
fn place(
    standard: &StandardTable,
    code: &str,
    value: Decimal,
    water_body: WaterBody,
) -> Result<(QualityClass, Option<Decimal>), WaterQualityError> {
    let rule = standard.class_rule(code)?;
    validate_value(standard, code, value)?;

    let placed = match rule {
        ClassRule::Range(range) => {
            if range.contains(value) {
                (QualityClass::Class1, None)
            } else {
                (QualityClass::Class6, None)
            }
        }
        ClassRule::Descending(thresholds) => place_descending(thresholds, value),
        ClassRule::Ascending { river, lake } => {
            place_ascending(select_variant(river, lake.as_ref(), water_body), value)
        }
    };

    tracing::debug!(
        "{} = {} ({}) -> class {}",
        code,
        value,
        water_body,
        placed.0
    );
    Ok(placed)
}

fn place_ascending(thresholds: &ClassThresholds, value: Decimal) -> (QualityClass, Option<Decimal>) {
    thresholds
        .iter()
        .find(|(_, boundary)| value <= *boundary)
        .map(|(class, boundary)| (class, Some(boundary)))
        .unwrap_or((QualityClass::Class6, Some(thresholds.class5())))
}

fn place_descending(thresholds: &ClassThresholds, value: Decimal) -> (QualityClass, Option<Decimal>) {
    thresholds
        .iter()
        .find(|(_, boundary)| value >= *boundary)
        .map(|(class, boundary)| (class, Some(boundary)))
        .unwrap_or((QualityClass::Class6, Some(thresholds.class5())))
}

fn classify_with_reason(
    standard: &StandardTable,
    code: &str,
    value: Decimal,
    water_body: WaterBody,
) -> Result<FactorClassResult, WaterQualityError> {
    let (class, boundary) = place(standard, code, value, water_body)?;
    let rule = standard.class_rule(code)?;
    let name = standard.factor_name(code);
    let unit = standard
        .factor(code)
        .map(|f| f.unit.to_string())
        .unwrap_or_default();

    let comparison = match (rule, boundary) {
        (ClassRule::Range(range), _) => {
            let position = if class == QualityClass::Class1 {
                "within"
            } else {
                "outside"
            };
            format!("{} [{}, {}]", position, range.min, range.max)
        }
        (ClassRule::Descending(_), Some(b)) if class == QualityClass::Class6 => {
            format!("< {}:{}", QualityClass::Class5, b)
        }
        (ClassRule::Descending(_), Some(b)) => format!(">= {}:{}", class, b),
        (ClassRule::Ascending { .. }, Some(b)) if class == QualityClass::Class6 => {
            format!("> {}:{}", QualityClass::Class5, b)
        }
        (_, Some(b)) => format!("<= {}:{}", class, b),
        (_, None) => String::new(),
    };

    Ok(FactorClassResult {
        code: normalize_code(code),
        reason: format!("{}: {} {} {} -> {}", name, value, unit, comparison, class.label()),
        name,
        value,
        unit,
        class,
        boundary,
    })
}

fn determine_overall(
    factor_results: Vec<FactorClassResult>,
    excluded_factors: Vec<String>,
) -> Result<OverallClassification, WaterQualityError> {
    let worst = factor_results
        .iter()
        .map(|r| r.class)
        .max()
        .ok_or_else(|| {
            WaterQualityError::InvalidArgument("no factors to classify".into())
        })?;

    let determining_factors: Vec<String> = factor_results
        .iter()
        .filter(|r| r.class == worst)
        .map(|r| r.name.clone())
        .collect();

    let overall_reason = if determining_factors.len() == 1 {
        format!("Determined by {} ({})", determining_factors[0], worst.label())
    } else {
        format!(
            "Determined by {} factors at {} level",
            determining_factors.len(),
            worst.label()
        )
    };

    Ok(OverallClassification {
        overall_class: worst,
        overall_reason,
        determining_factors,
        factor_results,
        excluded_factors,
    })
}

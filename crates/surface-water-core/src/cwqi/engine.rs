use crate::classify::engine::index_readings;
use crate::cwqi::outcome::{CompositeIndex, CwqiResult};
use crate::cwqi::IndexSet;
use crate::error::WaterQualityError;
use crate::model::{FactorReading, Measurement, WaterBody};
use crate::standard::table::select_variant;
use crate::standard::{ClassRule, StandardTable};
use crate::validators::validate_value;
use rust_decimal::Decimal;

/// Unrounded index of a single factor.
///
/// pH is scored by its distance from neutral (halved above neutral), dissolved
/// oxygen by the class Ⅲ boundary divided by the value, and every other factor
/// by the value divided by its class Ⅲ boundary.
pub fn factor_index(
    standard: &StandardTable,
    index_set: IndexSet,
    code: &str,
    value: Decimal,
    water_body: WaterBody,
) -> Result<Decimal, WaterQualityError> {
    ensure_in_set(standard, index_set, code)?;
    let rule = standard.class_rule(code)?;
    validate_value(standard, code, value)?;

    let index = match rule {
        ClassRule::Range(range) => {
            if value <= range.neutral {
                range.neutral - value
            } else {
                (value - range.neutral) / Decimal::TWO
            }
        }
        ClassRule::Descending(thresholds) => {
            thresholds
                .class3()
                .checked_div(value)
                .ok_or_else(|| WaterQualityError::OutOfRange {
                    factor: standard.factor_name(code),
                    value,
                    reason: "must be greater than zero to compute an index".into(),
                })?
        }
        ClassRule::Ascending { river, lake } => {
            let class3 = select_variant(river, lake.as_ref(), water_body).class3();
            value
                .checked_div(class3)
                .ok_or_else(|| WaterQualityError::OutOfRange {
                    factor: standard.factor_name(code),
                    value,
                    reason: "too large to compute an index".into(),
                })?
        }
    };

    tracing::debug!("{} = {} ({}) -> index {}", code, value, water_body, index);
    Ok(index)
}

/// Sum the indices of every measured factor of `index_set`.
///
/// Every factor of the set is reported, in set order; unmeasured or missing
/// factors get no index and add nothing to the total. A reading outside the
/// set, a repeated code, or an invalid value fails the whole call.
pub fn composite_index(
    standard: &StandardTable,
    index_set: IndexSet,
    readings: &[FactorReading],
    water_body: WaterBody,
) -> Result<CompositeIndex, WaterQualityError> {
    let codes = standard.index_set(index_set)?;
    let by_code = index_readings(readings, |code| ensure_in_set(standard, index_set, code))?;

    let mut total = Decimal::ZERO;
    let mut results = Vec::with_capacity(codes.len());
    for code in codes {
        let value = by_code
            .get(code.as_str())
            .map(|r| r.value)
            .unwrap_or(Measurement::NotMeasured);

        let index = match value.value() {
            Some(v) => {
                let index = factor_index(standard, index_set, code, v, water_body)?;
                total = total
                    .checked_add(index)
                    .ok_or_else(|| WaterQualityError::OutOfRange {
                        factor: standard.factor_name(code),
                        value: v,
                        reason: "composite index overflowed".into(),
                    })?;
                Some(index)
            }
            None => None,
        };

        results.push(CwqiResult {
            code: code.clone(),
            name: standard.factor_name(code),
            value,
            index,
        });
    }

    tracing::debug!(
        "CWQI ({}) over {} measured factors = {}",
        index_set,
        results.iter().filter(|r| r.index.is_some()).count(),
        total
    );

    Ok(CompositeIndex {
        index_set,
        total,
        results,
    })
}

fn ensure_in_set(
    standard: &StandardTable,
    index_set: IndexSet,
    code: &str,
) -> Result<(), WaterQualityError> {
    if standard.index_set_contains(index_set, code) {
        Ok(())
    } else {
        Err(WaterQualityError::UnknownFactor {
            code: code.to_string(),
            context: format!("CWQI ({})", index_set),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rounding::bankers_round;
    use crate::standard::builtin::gb3838_2002;
    use rust_decimal_macros::dec;

    const PH: &str = "w01001";
    const DO: &str = "w01009";
    const NH3N: &str = "w21003";
    const TP: &str = "w21011";
    const TN: &str = "w21001";
    const FC: &str = "w02003";

    fn index(code: &str, value: Decimal) -> Decimal {
        factor_index(
            gb3838_2002().unwrap(),
            IndexSet::Legacy21,
            code,
            value,
            WaterBody::River,
        )
        .unwrap()
    }

    #[test]
    fn test_ph_distance_from_neutral() {
        assert_eq!(index(PH, dec!(7)), Decimal::ZERO);
        assert_eq!(index(PH, dec!(5)), dec!(2));
        assert_eq!(index(PH, dec!(9)), dec!(1));
        assert_eq!(index(PH, dec!(8)), dec!(0.5));
        assert_eq!(index(PH, dec!(6.5)), dec!(0.5));
    }

    #[test]
    fn test_dissolved_oxygen_is_inverse_ratio() {
        assert_eq!(index(DO, dec!(5)), dec!(1));
        assert_eq!(index(DO, dec!(10)), dec!(0.5));
        assert_eq!(index(DO, dec!(2.5)), dec!(2));
        assert!(index(DO, dec!(4)) > index(DO, dec!(8)));
    }

    #[test]
    fn test_dissolved_oxygen_zero_is_out_of_range() {
        let err = factor_index(
            gb3838_2002().unwrap(),
            IndexSet::Legacy21,
            DO,
            Decimal::ZERO,
            WaterBody::River,
        )
        .unwrap_err();
        assert!(matches!(err, WaterQualityError::OutOfRange { .. }));
    }

    #[test]
    fn test_ratio_to_class3() {
        assert_eq!(index(NH3N, dec!(1.0)), dec!(1));
        assert_eq!(index(NH3N, dec!(0.5)), dec!(0.5));
        assert_eq!(index("w01019", dec!(3)), dec!(0.5));
    }

    #[test]
    fn test_phosphorus_lake_variant() {
        let std = gb3838_2002().unwrap();
        let river = factor_index(std, IndexSet::Legacy21, TP, dec!(0.1), WaterBody::River).unwrap();
        let lake = factor_index(std, IndexSet::Legacy21, TP, dec!(0.1), WaterBody::Lake).unwrap();
        assert_eq!(river, dec!(0.5));
        assert_eq!(lake, dec!(2));
    }

    #[test]
    fn test_index_set_membership() {
        let std = gb3838_2002().unwrap();
        for set in IndexSet::ALL {
            let err = factor_index(std, set, TN, dec!(1), WaterBody::River).unwrap_err();
            assert!(matches!(err, WaterQualityError::UnknownFactor { .. }), "{set}");
        }
        assert!(factor_index(std, IndexSet::Legacy21, FC, dec!(100), WaterBody::River).is_err());
        assert_eq!(
            factor_index(std, IndexSet::Extended22, FC, dec!(5000), WaterBody::River).unwrap(),
            dec!(0.5)
        );
        assert!(factor_index(std, IndexSet::Extended22, "w20125", dec!(0.1), WaterBody::River)
            .is_err());
    }

    #[test]
    fn test_negative_value_rejected() {
        let std = gb3838_2002().unwrap();
        let err = factor_index(std, IndexSet::Legacy21, NH3N, dec!(-1), WaterBody::River)
            .unwrap_err();
        assert!(matches!(err, WaterQualityError::OutOfRange { .. }));
    }

    #[test]
    fn test_oversized_value_is_out_of_range() {
        let std = gb3838_2002().unwrap();
        let err = factor_index(std, IndexSet::Legacy21, "w20111", Decimal::MAX, WaterBody::River)
            .unwrap_err();
        assert!(matches!(err, WaterQualityError::OutOfRange { .. }));
    }

    #[test]
    fn test_composite_overflow_is_out_of_range() {
        let std = gb3838_2002().unwrap();
        // Each index is about 7e28, so the sum exceeds the decimal range.
        let readings = vec![
            FactorReading::measured("w20111", Decimal::from_i128_with_scale(7 * 10i128.pow(24), 0)),
            FactorReading::measured("w20115", Decimal::from_i128_with_scale(35 * 10i128.pow(25), 0)),
        ];
        let err = composite_index(std, IndexSet::Legacy21, &readings, WaterBody::River).unwrap_err();
        assert!(matches!(err, WaterQualityError::OutOfRange { .. }));
    }

    #[test]
    fn test_composite_all_absent_is_zero() {
        let std = gb3838_2002().unwrap();
        let result = composite_index(std, IndexSet::Legacy21, &[], WaterBody::River).unwrap();
        assert_eq!(result.total, Decimal::ZERO);
        assert_eq!(result.results.len(), 21);
        assert!(!result.has_data());
        assert!(result.results.iter().all(|r| r.index.is_none()));
    }

    #[test]
    fn test_composite_is_plain_sum() {
        let std = gb3838_2002().unwrap();
        let readings = vec![
            FactorReading::measured(PH, dec!(8)),
            FactorReading::measured(DO, dec!(10)),
            FactorReading::measured("W21003", dec!(1.5)),
            FactorReading::not_measured(TP),
        ];
        let result = composite_index(std, IndexSet::Legacy21, &readings, WaterBody::River).unwrap();
        assert_eq!(result.total, dec!(2.5));
        assert_eq!(result.measured_count(), 3);

        let tp = result.results.iter().find(|r| r.code == TP).unwrap();
        assert_eq!(tp.value, Measurement::NotMeasured);
        assert_eq!(tp.index, None);
        assert_eq!(result.results[0].code, PH);
        assert_eq!(result.results[0].name, "pH");
    }

    #[test]
    fn test_composite_result_is_unrounded() {
        let std = gb3838_2002().unwrap();
        let readings = vec![FactorReading::measured(DO, dec!(3))];
        let result = composite_index(std, IndexSet::Legacy21, &readings, WaterBody::River).unwrap();
        assert!(result.total.scale() > 2);
        assert_eq!(bankers_round(result.total, 2).unwrap(), dec!(1.67));
    }

    #[test]
    fn test_composite_extended_set_counts_coliform() {
        let std = gb3838_2002().unwrap();
        let readings = vec![FactorReading::measured(FC, dec!(20000))];
        let legacy = composite_index(std, IndexSet::Legacy21, &readings, WaterBody::River);
        assert!(matches!(legacy, Err(WaterQualityError::UnknownFactor { .. })));

        let extended =
            composite_index(std, IndexSet::Extended22, &readings, WaterBody::River).unwrap();
        assert_eq!(extended.results.len(), 22);
        assert_eq!(extended.total, dec!(2));
    }

    #[test]
    fn test_composite_fails_on_any_invalid_value() {
        let std = gb3838_2002().unwrap();
        let readings = vec![
            FactorReading::measured(NH3N, dec!(0.5)),
            FactorReading::measured(PH, dec!(15)),
        ];
        let err = composite_index(std, IndexSet::Legacy21, &readings, WaterBody::River).unwrap_err();
        assert!(matches!(err, WaterQualityError::OutOfRange { .. }));
    }

    #[test]
    fn test_composite_rejects_duplicates() {
        let std = gb3838_2002().unwrap();
        let readings = vec![
            FactorReading::measured(NH3N, dec!(0.5)),
            FactorReading::measured("W21003 ", dec!(0.6)),
        ];
        let err = composite_index(std, IndexSet::Legacy21, &readings, WaterBody::River).unwrap_err();
        assert!(matches!(err, WaterQualityError::DuplicateReading { .. }));
    }
}

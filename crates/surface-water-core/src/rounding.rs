use crate::error::WaterQualityError;
use crate::model::Factor;
use rust_decimal::{Decimal, RoundingStrategy};

/// Deepest decimal position searched for the first significant digit.
const MAX_SIGNIFICANT_POSITION: u32 = 28;

/// Round half to even, keeping at least one significant digit.
///
/// For magnitudes below 1 the precision is raised to the position of the first
/// non-zero digit after the decimal point, so `0.00034` rounded to 2 places
/// becomes `0.0003` instead of `0.00`.
pub fn bankers_round(value: Decimal, decimal_places: i32) -> Result<Decimal, WaterQualityError> {
    if decimal_places < 0 {
        return Err(WaterQualityError::InvalidArgument(format!(
            "decimal places cannot be negative (got {})",
            decimal_places
        )));
    }
    Ok(round_significant(value, decimal_places.unsigned_abs()))
}

fn round_significant(value: Decimal, decimal_places: u32) -> Decimal {
    if value.is_zero() {
        return Decimal::ZERO;
    }

    let mut first_significant = 0;
    let mut magnitude = value.abs();
    while magnitude < Decimal::ONE && first_significant < MAX_SIGNIFICANT_POSITION {
        magnitude *= Decimal::TEN;
        first_significant += 1;
    }

    let places = decimal_places.max(first_significant);
    value.round_dp_with_strategy(places, RoundingStrategy::MidpointNearestEven)
}

/// Round to the factor's assessment precision.
pub fn round_assessment(factor: &Factor, value: Decimal) -> Decimal {
    round_significant(value, factor.precision.assessment)
}

/// Round to the factor's hourly (raw data) precision.
pub fn round_hourly(factor: &Factor, value: Decimal) -> Decimal {
    round_significant(value, factor.precision.hourly)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::standard::builtin::gb3838_2002;
    use rust_decimal_macros::dec;

    #[test]
    fn test_half_to_even() {
        assert_eq!(bankers_round(dec!(2.5), 0).unwrap(), dec!(2));
        assert_eq!(bankers_round(dec!(3.5), 0).unwrap(), dec!(4));
        assert_eq!(bankers_round(dec!(1.245), 2).unwrap(), dec!(1.24));
        assert_eq!(bankers_round(dec!(1.255), 2).unwrap(), dec!(1.26));
        assert_eq!(bankers_round(dec!(-2.5), 0).unwrap(), dec!(-2));
    }

    #[test]
    fn test_not_a_tie_rounds_normally() {
        assert_eq!(bankers_round(dec!(2.51), 0).unwrap(), dec!(3));
        assert_eq!(bankers_round(dec!(1.2451), 2).unwrap(), dec!(1.25));
    }

    #[test]
    fn test_keeps_first_significant_digit() {
        let r = bankers_round(dec!(0.00034), 2).unwrap();
        assert_eq!(r, dec!(0.0003));
        assert_eq!(r.scale(), 4);
        assert_eq!(bankers_round(dec!(0.00035), 2).unwrap(), dec!(0.0004));
        assert_eq!(bankers_round(dec!(0.00025), 2).unwrap(), dec!(0.0002));
    }

    #[test]
    fn test_requested_precision_wins_when_larger() {
        assert_eq!(bankers_round(dec!(0.123456), 3).unwrap(), dec!(0.123));
        assert_eq!(bankers_round(dec!(12.3456), 2).unwrap(), dec!(12.35));
    }

    #[test]
    fn test_zero() {
        assert_eq!(bankers_round(dec!(0.000), 2).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_negative_places_rejected() {
        assert!(matches!(
            bankers_round(dec!(1.5), -1),
            Err(WaterQualityError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_exact_decimal_semantics() {
        // 0.1 + 0.2 is exact in decimal arithmetic.
        let sum = dec!(0.1) + dec!(0.2);
        assert_eq!(bankers_round(sum, 1).unwrap(), dec!(0.3));
    }

    #[test]
    fn test_smallest_magnitude_is_bounded() {
        let tiny = Decimal::new(1, 28);
        assert_eq!(bankers_round(tiny, 0).unwrap(), tiny);
    }

    #[test]
    fn test_factor_precision() {
        let std = gb3838_2002().unwrap();
        let nh3n = std.factor("w21003").unwrap();
        assert_eq!(round_assessment(nh3n, dec!(0.125)), dec!(0.12));
        assert_eq!(round_hourly(nh3n, dec!(0.1235)), dec!(0.124));
        let ph = std.factor("w01001").unwrap();
        assert_eq!(round_assessment(ph, dec!(7.5)), dec!(8));
    }
}

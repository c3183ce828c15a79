//! Pure mathematical functions - no I/O, no async
//! All functions here must be deterministic and side-effect free

use candid::{Int, Nat};
use num_bigint::{BigInt, BigUint};
use num_traits::{Signed, ToPrimitive, Zero};
use rust_decimal::Decimal;
use crate::infrastructure::errors::{Result, EngineError, CalculationError};
use crate::infrastructure::constants::TOLERANCE_DENOMINATOR;

/// Multiply two Nats and divide by a third with arbitrary precision
/// Formula: (a × b) ÷ c, rounded down
pub fn multiply_and_divide(a: &Nat, b: &Nat, c: &Nat) -> Result<Nat> {
    if c.0.is_zero() {
        return Err(EngineError::Calculation(CalculationError::DivisionByZero {
            operation: format!("({} × {}) ÷ {}", a, b, c),
        }));
    }

    let result: BigUint = (&a.0 * &b.0) / &c.0;
    Ok(Nat(result))
}

/// Clamp a caller-supplied tolerance into [0, TOLERANCE_DENOMINATOR]
pub fn clamp_tolerance(tolerance: u32) -> u32 {
    tolerance.min(TOLERANCE_DENOMINATOR)
}

/// Minimum acceptable output for a quoted swap
///
/// `expected * (1_000_000 - tolerance) / 1_000_000`, rounded down.
///
/// ## Example
/// - Expected: 1_000 tokens, tolerance 10_000 (1%)
/// - Result: 990 tokens
pub fn min_receive_for_tolerance(expected: &Nat, tolerance: u32) -> Result<Nat> {
    let tolerance = clamp_tolerance(tolerance);
    let keep = Nat::from(TOLERANCE_DENOMINATOR - tolerance);
    multiply_and_divide(expected, &keep, &Nat::from(TOLERANCE_DENOMINATOR))
}

/// Shortfall of `actual` against `expected` in parts per million
///
/// Returns 0 when the swap delivered at least the expected amount.
pub fn shortfall_ppm(expected: &Nat, actual: &Nat) -> Result<u64> {
    if actual >= expected {
        return Ok(0);
    }
    let missing = Nat(&expected.0 - &actual.0);
    let ppm = multiply_and_divide(&missing, &Nat::from(TOLERANCE_DENOMINATOR), expected)?;
    ppm.0.to_u64().ok_or_else(|| EngineError::Calculation(CalculationError::Overflow {
        operation: format!("shortfall_ppm({}, {})", expected, actual),
    }))
}

/// Invert a fixed-point price, keeping its precision
///
/// Formula: 10^(2 × decimals) ÷ answer, rounded down. A feed quoting `base`
/// in `quote` at 8 decimals answers `45_600_000` for 0.456; the inverse,
/// `quote` in `base`, is `219_298_245` (2.19298245).
pub fn invert_fixed_point(answer: &Int, decimals: u8) -> Result<Int> {
    if !answer.0.is_positive() {
        return Err(EngineError::Calculation(CalculationError::DivisionByZero {
            operation: format!("invert_fixed_point({}, {})", answer, decimals),
        }));
    }

    let one_squared = BigInt::from(10u32).pow(2 * decimals as u32);
    Ok(Int(one_squared / &answer.0))
}

/// Render a signed fixed-point feed answer as a decimal
///
/// `answer = 6_386_775_261_845`, `decimals = 8` → `63867.75261845`
pub fn fixed_point_to_decimal(answer: &Int, decimals: u8) -> Result<Decimal> {
    let mantissa = answer.0.to_i128().ok_or_else(|| EngineError::Calculation(CalculationError::Overflow {
        operation: format!("fixed_point_to_decimal({}, {})", answer, decimals),
    }))?;

    Decimal::try_from_i128_with_scale(mantissa, decimals as u32).map_err(|e| {
        EngineError::Calculation(CalculationError::Overflow {
            operation: format!("fixed_point_to_decimal({}, {}): {}", answer, decimals, e),
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_multiply_and_divide() {
        let result = multiply_and_divide(&Nat::from(500u64), &Nat::from(3u64), &Nat::from(2u64)).unwrap();
        assert_eq!(result, Nat::from(750u64));
    }

    #[test]
    fn test_multiply_and_divide_by_zero() {
        let result = multiply_and_divide(&Nat::from(1u64), &Nat::from(1u64), &Nat::from(0u64));
        assert!(matches!(result, Err(EngineError::Calculation(CalculationError::DivisionByZero { .. }))));
    }

    #[test]
    fn test_min_receive_one_percent() {
        let min = min_receive_for_tolerance(&Nat::from(1_000u64), 10_000).unwrap();
        assert_eq!(min, Nat::from(990u64));
    }

    #[test]
    fn test_min_receive_tight_tolerance_keeps_almost_everything() {
        // 1 ppm on 500_000_000 leaves 499_999_500
        let min = min_receive_for_tolerance(&Nat::from(500_000_000u64), 1).unwrap();
        assert_eq!(min, Nat::from(499_999_500u64));
    }

    #[test]
    fn test_min_receive_tolerance_is_clamped() {
        let min = min_receive_for_tolerance(&Nat::from(1_000u64), u32::MAX).unwrap();
        assert_eq!(min, Nat::from(0u64));
    }

    #[test]
    fn test_shortfall_ppm() {
        assert_eq!(shortfall_ppm(&Nat::from(1_000u64), &Nat::from(990u64)).unwrap(), 10_000);
        assert_eq!(shortfall_ppm(&Nat::from(1_000u64), &Nat::from(1_050u64)).unwrap(), 0);
    }

    #[test]
    fn test_invert_fixed_point() {
        let inverse = invert_fixed_point(&Int::from(45_600_000i64), 8).unwrap();
        assert_eq!(inverse, Int::from(219_298_245i64));

        // 2.00 ↔ 0.50 at 2 decimals
        assert_eq!(invert_fixed_point(&Int::from(200i64), 2).unwrap(), Int::from(50i64));
    }

    #[test]
    fn test_invert_non_positive_rejected() {
        assert!(matches!(
            invert_fixed_point(&Int::from(0i64), 8),
            Err(EngineError::Calculation(CalculationError::DivisionByZero { .. }))
        ));
        assert!(invert_fixed_point(&Int::from(-5i64), 8).is_err());
    }

    #[test]
    fn test_fixed_point_to_decimal() {
        let price = fixed_point_to_decimal(&Int::from(6_386_775_261_845i64), 8).unwrap();
        assert_eq!(price, dec!(63867.75261845));

        let negative = fixed_point_to_decimal(&Int::from(-150i64), 2).unwrap();
        assert_eq!(negative, dec!(-1.50));
    }
}

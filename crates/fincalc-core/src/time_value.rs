use rust_decimal::Decimal;
use rust_decimal::RoundingStrategy;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;

use crate::error::FinCalcError;
use crate::types::{Money, Percent, Rate};
use crate::FinCalcResult;

const MONTHS_PER_YEAR: Decimal = dec!(12);
const PERCENT: Decimal = dec!(100);

/// Decimal places kept when a value is shown to a user.
pub const CURRENCY_DP: u32 = 2;

/// Monthly periodic rate from an annual percentage rate (6.0 -> 0.005).
pub fn monthly_rate(annual_rate_percent: Percent) -> Rate {
    annual_rate_percent / PERCENT / MONTHS_PER_YEAR
}

/// Level payment that retires `principal` over `periods` payments at
/// `rate` per period.
///
/// Uses the annuity form `P * r(1+r)^N / ((1+r)^N - 1)`; a zero rate
/// degenerates to straight-line repayment `P / N`.
pub fn level_payment(principal: Money, rate: Rate, periods: u32) -> FinCalcResult<Money> {
    if periods == 0 {
        return Err(FinCalcError::invalid(
            "periods",
            "Number of periods must be > 0",
        ));
    }

    if rate.is_zero() {
        return Ok(principal / Decimal::from(periods));
    }

    let growth = (Decimal::ONE + rate)
        .checked_powu(u64::from(periods))
        .ok_or_else(|| {
            FinCalcError::invalid(
                "annual_rate_percent",
                "Rate and term compound beyond the representable decimal range",
            )
        })?;

    let denominator = growth - Decimal::ONE;
    if denominator.is_zero() {
        return Err(FinCalcError::invalid(
            "annual_rate_percent",
            "Rate is too small to amortise over the given term",
        ));
    }

    (rate * growth)
        .checked_div(denominator)
        .and_then(|factor| principal.checked_mul(factor))
        .ok_or_else(|| {
            FinCalcError::invalid(
                "principal",
                "Payment exceeds the representable decimal range",
            )
        })
}

/// Interest accrued on `balance` over one period.
pub fn period_interest(balance: Money, rate: Rate) -> Money {
    balance * rate
}

/// Round to cents, half away from zero. Display only; never applied inside
/// a recurrence.
pub fn round_currency(value: Money) -> Money {
    value.round_dp_with_strategy(CURRENCY_DP, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_monthly_rate_from_percent() {
        assert_eq!(monthly_rate(dec!(6)), dec!(0.005));
        assert_eq!(monthly_rate(dec!(0)), Decimal::ZERO);
    }

    #[test]
    fn test_level_payment_thirty_year_mortgage() {
        let payment = level_payment(dec!(200000), dec!(0.005), 360).unwrap();
        // 200k at 6% over 30 years: 1199.10 per month
        assert_eq!(round_currency(payment), dec!(1199.10));
    }

    #[test]
    fn test_level_payment_zero_rate_is_straight_line() {
        let payment = level_payment(dec!(10000), Decimal::ZERO, 12).unwrap();
        assert_eq!(payment, dec!(10000) / dec!(12));
    }

    #[test]
    fn test_level_payment_zero_periods_rejected() {
        let err = level_payment(dec!(1000), dec!(0.01), 0).unwrap_err();
        assert!(matches!(err, FinCalcError::InvalidInput { ref field, .. } if field == "periods"));
    }

    #[test]
    fn test_level_payment_overflow_is_reported() {
        // (1 + 100%/12)^1200 does not fit in 96 bits
        let result = level_payment(dec!(100000), monthly_rate(dec!(100)), 1200);
        assert!(result.is_err());
    }

    #[test]
    fn test_period_interest() {
        assert_eq!(period_interest(dec!(200000), dec!(0.005)), dec!(1000));
    }

    #[test]
    fn test_round_currency_half_up() {
        assert_eq!(round_currency(dec!(1.005)), dec!(1.01));
        assert_eq!(round_currency(dec!(1.004)), dec!(1.00));
        assert_eq!(round_currency(dec!(-1.005)), dec!(-1.01));
    }
}

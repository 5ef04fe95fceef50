use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::FinCalcError;
use crate::time_value::{level_payment, monthly_rate, period_interest};
use crate::types::{Money, Percent, Rate};
use crate::FinCalcResult;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Payments per year; every schedule is monthly.
pub const PERIODS_PER_YEAR: u32 = 12;

/// Longest term accepted, in years.
pub const MAX_TERM_YEARS: u32 = 100;

const MAX_RATE_PERCENT: Decimal = dec!(100);

/// Smallest principal accepted: one currency minor unit.
pub const MIN_PRINCIPAL: Money = dec!(0.01);

/// Largest principal or extra payment accepted. Keeps every sum over a
/// schedule representable at the maximum rate and term.
pub const MAX_PRINCIPAL: Money = dec!(1000000000000000);

// ---------------------------------------------------------------------------
// Input types
// ---------------------------------------------------------------------------

/// Fixed-rate loan terms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanParameters {
    /// Amount borrowed.
    pub principal: Money,
    /// Annual percentage rate (e.g., 6.5 = 6.5%).
    pub annual_rate_percent: Percent,
    /// Loan term in whole years.
    pub term_years: u32,
    /// Extra principal paid on top of the scheduled payment every month.
    #[serde(default)]
    pub extra_payment: Money,
}

impl LoanParameters {
    pub fn new(principal: Money, annual_rate_percent: Percent, term_years: u32) -> Self {
        Self {
            principal,
            annual_rate_percent,
            term_years,
            extra_payment: Decimal::ZERO,
        }
    }

    pub fn with_extra_payment(mut self, extra_payment: Money) -> Self {
        self.extra_payment = extra_payment;
        self
    }

    /// Nominal number of monthly payments.
    pub fn payment_count(&self) -> u32 {
        self.term_years.saturating_mul(PERIODS_PER_YEAR)
    }

    pub fn validate(&self) -> FinCalcResult<()> {
        if self.principal <= Decimal::ZERO {
            return Err(FinCalcError::invalid(
                "principal",
                "Loan principal must be positive",
            ));
        }
        if self.principal < MIN_PRINCIPAL {
            return Err(FinCalcError::invalid(
                "principal",
                format!("Loan principal must be at least {MIN_PRINCIPAL}"),
            ));
        }
        if self.principal > MAX_PRINCIPAL {
            return Err(FinCalcError::invalid(
                "principal",
                format!("Loan principal cannot exceed {MAX_PRINCIPAL}"),
            ));
        }
        if self.annual_rate_percent < Decimal::ZERO {
            return Err(FinCalcError::invalid(
                "annual_rate_percent",
                "Interest rate cannot be negative",
            ));
        }
        if self.annual_rate_percent > MAX_RATE_PERCENT {
            return Err(FinCalcError::invalid(
                "annual_rate_percent",
                "Interest rate is a percentage and cannot exceed 100",
            ));
        }
        if self.term_years == 0 {
            return Err(FinCalcError::invalid(
                "term_years",
                "Term must be at least 1 year",
            ));
        }
        if self.term_years > MAX_TERM_YEARS {
            return Err(FinCalcError::invalid(
                "term_years",
                format!("Term cannot exceed {MAX_TERM_YEARS} years"),
            ));
        }
        if self.extra_payment < Decimal::ZERO {
            return Err(FinCalcError::invalid(
                "extra_payment",
                "Extra payment cannot be negative",
            ));
        }
        if self.extra_payment > MAX_PRINCIPAL {
            return Err(FinCalcError::invalid(
                "extra_payment",
                format!("Extra payment cannot exceed {MAX_PRINCIPAL}"),
            ));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// One row of a schedule. Period 0 is the opening state and carries only
/// the balance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Period {
    pub index: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_due: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interest_due: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub principal_due: Option<Money>,
    pub remaining_balance: Money,
}

impl Period {
    fn opening(principal: Money) -> Self {
        Self {
            index: 0,
            payment_due: None,
            interest_due: None,
            principal_due: None,
            remaining_balance: principal,
        }
    }
}

/// A complete amortization schedule, period 0 first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    /// Periodic (monthly) rate as a decimal.
    pub monthly_rate: Rate,
    /// Fixed scheduled payment, excluding any extra principal.
    pub monthly_payment: Money,
    pub periods: Vec<Period>,
}

impl Schedule {
    pub fn periods(&self) -> &[Period] {
        &self.periods
    }

    /// Number of payments made, excluding the opening period.
    pub fn payment_count(&self) -> usize {
        self.periods.len().saturating_sub(1)
    }

    pub fn final_balance(&self) -> Money {
        self.periods
            .last()
            .map(|p| p.remaining_balance)
            .unwrap_or(Decimal::ZERO)
    }

    /// Payment periods only (index >= 1).
    pub fn payments(&self) -> impl Iterator<Item = &Period> {
        self.periods.iter().filter(|p| p.index > 0)
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Build the month-by-month schedule for a fixed-rate loan.
///
/// The scheduled payment is fixed up front from the nominal term; any extra
/// payment goes straight to principal on top of it, so the loan may retire
/// before the term ends. The period that would overshoot zero, and the last
/// nominal period, pay off exactly the outstanding balance.
pub fn build_schedule(params: &LoanParameters) -> FinCalcResult<Schedule> {
    params.validate()?;

    let rate = monthly_rate(params.annual_rate_percent);
    let n = params.payment_count();
    let payment = level_payment(params.principal, rate, n)?;
    if payment <= Decimal::ZERO {
        return Err(FinCalcError::invalid(
            "principal",
            "Principal is too small to produce a positive payment",
        ));
    }

    let mut periods = Vec::with_capacity(n as usize + 1);
    periods.push(Period::opening(params.principal));

    let mut balance = params.principal;
    let mut index = 1;

    while index <= n && balance > Decimal::ZERO {
        let interest_due = period_interest(balance, rate);
        let mut principal_due = (payment - interest_due)
            .checked_add(params.extra_payment)
            .ok_or_else(|| {
                FinCalcError::invalid(
                    "extra_payment",
                    "Extra payment exceeds the representable decimal range",
                )
            })?;

        let candidate = balance - principal_due;
        let remaining_balance = if candidate < Decimal::ZERO || index == n {
            principal_due = balance;
            Decimal::ZERO
        } else {
            candidate
        };

        let payment_due = principal_due.checked_add(interest_due).ok_or_else(|| {
            FinCalcError::invalid("principal", "Payment exceeds the representable decimal range")
        })?;

        periods.push(Period {
            index,
            payment_due: Some(payment_due),
            interest_due: Some(interest_due),
            principal_due: Some(principal_due),
            remaining_balance,
        });

        balance = remaining_balance;
        index += 1;
    }

    log::debug!(
        "built schedule: principal={} rate={}% term={}y extra={} payment={} periods={}",
        params.principal,
        params.annual_rate_percent,
        params.term_years,
        params.extra_payment,
        payment,
        periods.len() - 1
    );

    Ok(Schedule {
        monthly_rate: rate,
        monthly_payment: payment,
        periods,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time_value::round_currency;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn mortgage() -> LoanParameters {
        LoanParameters::new(dec!(200000), dec!(6), 30)
    }

    fn assert_invalid(params: LoanParameters, expected_field: &str) {
        match build_schedule(&params) {
            Err(FinCalcError::InvalidInput { field, .. }) => assert_eq!(field, expected_field),
            Ok(_) => panic!("expected {expected_field} to be rejected"),
        }
    }

    #[test]
    fn test_opening_period_has_only_balance() {
        let schedule = build_schedule(&mortgage()).unwrap();
        let opening = &schedule.periods[0];
        assert_eq!(opening.index, 0);
        assert_eq!(opening.payment_due, None);
        assert_eq!(opening.interest_due, None);
        assert_eq!(opening.principal_due, None);
        assert_eq!(opening.remaining_balance, dec!(200000));
    }

    #[test]
    fn test_full_term_length_and_payoff() {
        let schedule = build_schedule(&mortgage()).unwrap();
        assert_eq!(schedule.periods.len(), 361);
        assert_eq!(schedule.payment_count(), 360);
        assert_eq!(schedule.final_balance(), Decimal::ZERO);
        assert_eq!(round_currency(schedule.monthly_payment), dec!(1199.10));
    }

    #[test]
    fn test_first_period_split() {
        let schedule = build_schedule(&mortgage()).unwrap();
        let first = &schedule.periods[1];
        assert_eq!(first.interest_due, Some(dec!(1000)));
        assert_eq!(
            first.principal_due,
            Some(schedule.monthly_payment - dec!(1000))
        );
        assert_eq!(first.payment_due, Some(schedule.monthly_payment));
    }

    #[test]
    fn test_balance_recurrence_holds() {
        let schedule = build_schedule(&mortgage().with_extra_payment(dec!(250))).unwrap();
        for pair in schedule.periods.windows(2) {
            let principal = pair[1].principal_due.unwrap();
            assert_eq!(
                pair[1].remaining_balance,
                pair[0].remaining_balance - principal
            );
            assert!(pair[1].remaining_balance >= Decimal::ZERO);
        }
    }

    #[test]
    fn test_payment_is_interest_plus_principal() {
        let schedule = build_schedule(&mortgage()).unwrap();
        for p in schedule.payments() {
            assert_eq!(
                p.payment_due.unwrap(),
                p.interest_due.unwrap() + p.principal_due.unwrap()
            );
        }
    }

    #[test]
    fn test_extra_payment_terminates_early() {
        let schedule = build_schedule(&mortgage().with_extra_payment(dec!(500))).unwrap();
        assert!(schedule.periods.len() < 361);
        assert_eq!(schedule.final_balance(), Decimal::ZERO);
        // Scheduled payment is not re-amortised by the extra payment
        assert_eq!(round_currency(schedule.monthly_payment), dec!(1199.10));
    }

    #[test]
    fn test_final_early_payoff_period_clamped() {
        let schedule = build_schedule(&mortgage().with_extra_payment(dec!(500))).unwrap();
        let n = schedule.periods.len();
        let last = &schedule.periods[n - 1];
        let prior = &schedule.periods[n - 2];
        assert_eq!(last.principal_due, Some(prior.remaining_balance));
        assert_eq!(
            last.payment_due,
            Some(prior.remaining_balance + last.interest_due.unwrap())
        );
    }

    #[test]
    fn test_extra_payment_larger_than_principal_pays_off_at_once() {
        let params = LoanParameters::new(dec!(5000), dec!(5), 5).with_extra_payment(dec!(10000));
        let schedule = build_schedule(&params).unwrap();
        assert_eq!(schedule.periods.len(), 2);
        assert_eq!(schedule.periods[1].principal_due, Some(dec!(5000)));
        assert_eq!(schedule.final_balance(), Decimal::ZERO);
    }

    #[test]
    fn test_zero_rate_straight_line() {
        let schedule = build_schedule(&LoanParameters::new(dec!(10000), dec!(0), 1)).unwrap();
        assert_eq!(schedule.monthly_payment, dec!(10000) / dec!(12));
        assert_eq!(schedule.periods.len(), 13);
        assert_eq!(schedule.final_balance(), Decimal::ZERO);
        for p in schedule.payments() {
            assert_eq!(p.interest_due, Some(Decimal::ZERO));
        }
    }

    #[test]
    fn test_deterministic() {
        let params = mortgage().with_extra_payment(dec!(123.45));
        assert_eq!(
            build_schedule(&params).unwrap(),
            build_schedule(&params).unwrap()
        );
    }

    #[test]
    fn test_validation_zero_principal() {
        assert_invalid(LoanParameters::new(dec!(0), dec!(5), 10), "principal");
    }

    #[test]
    fn test_validation_negative_principal() {
        assert_invalid(LoanParameters::new(dec!(-1), dec!(5), 10), "principal");
    }

    #[test]
    fn test_validation_zero_term() {
        assert_invalid(LoanParameters::new(dec!(1000), dec!(5), 0), "term_years");
    }

    #[test]
    fn test_validation_term_too_long() {
        assert_invalid(LoanParameters::new(dec!(1000), dec!(5), 101), "term_years");
    }

    #[test]
    fn test_validation_negative_rate() {
        assert_invalid(
            LoanParameters::new(dec!(1000), dec!(-0.5), 10),
            "annual_rate_percent",
        );
    }

    #[test]
    fn test_validation_rate_above_hundred() {
        assert_invalid(
            LoanParameters::new(dec!(1000), dec!(100.01), 10),
            "annual_rate_percent",
        );
    }

    #[test]
    fn test_validation_negative_extra_payment() {
        assert_invalid(
            LoanParameters::new(dec!(1000), dec!(5), 10).with_extra_payment(dec!(-1)),
            "extra_payment",
        );
    }

    #[test]
    fn test_validation_principal_below_one_cent() {
        assert_invalid(
            LoanParameters::new(dec!(0.0000000000000000000000000001), dec!(6), 30),
            "principal",
        );
        assert_invalid(LoanParameters::new(dec!(0.009), dec!(6), 30), "principal");
    }

    #[test]
    fn test_one_cent_principal_decreases_every_period() {
        let schedule = build_schedule(&LoanParameters::new(dec!(0.01), dec!(6), 30)).unwrap();
        assert!(schedule.monthly_payment > Decimal::ZERO);
        assert_eq!(schedule.periods.len(), 361);
        for pair in schedule.periods.windows(2) {
            assert!(pair[1].remaining_balance < pair[0].remaining_balance);
        }
        assert_eq!(schedule.final_balance(), Decimal::ZERO);
    }

    #[test]
    fn test_validation_principal_above_ceiling() {
        assert_invalid(
            LoanParameters::new(dec!(50000000000000000000000000000), dec!(10), 30),
            "principal",
        );
        assert_invalid(
            LoanParameters::new(MAX_PRINCIPAL + dec!(1), dec!(5), 10),
            "principal",
        );
    }

    #[test]
    fn test_validation_extra_payment_above_ceiling() {
        assert_invalid(
            LoanParameters::new(dec!(75000), dec!(100), 1)
                .with_extra_payment(dec!(72000000000000000000000000000)),
            "extra_payment",
        );
    }

    #[test]
    fn test_largest_principal_at_maximum_rate_builds() {
        let params = LoanParameters::new(MAX_PRINCIPAL, MAX_RATE_PERCENT, 1)
            .with_extra_payment(MAX_PRINCIPAL);
        let schedule = build_schedule(&params).unwrap();
        assert_eq!(schedule.periods.len(), 2);
        assert_eq!(schedule.periods[1].principal_due, Some(MAX_PRINCIPAL));
        assert_eq!(schedule.final_balance(), Decimal::ZERO);
    }

    #[test]
    fn test_parameters_deserialize_without_extra_payment() {
        let params: LoanParameters = serde_json::from_str(
            r#"{"principal": "250000", "annual_rate_percent": "4.5", "term_years": 15}"#,
        )
        .unwrap();
        assert_eq!(params.extra_payment, Decimal::ZERO);
        assert_eq!(params.payment_count(), 180);
    }
}

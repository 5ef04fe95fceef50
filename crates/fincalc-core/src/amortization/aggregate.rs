use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::schedule::Schedule;
use crate::error::FinCalcError;
use crate::types::Money;
use crate::FinCalcResult;

/// Sums over the payment periods of one schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleTotals {
    pub total_interest: Money,
    pub total_principal: Money,
    pub total_paid: Money,
}

/// Signed differences between two schedules, first minus second.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleComparison {
    pub interest_saved: Money,
    pub total_saved: Money,
    pub months_saved: i64,
}

fn overflow(field: &str) -> FinCalcError {
    FinCalcError::invalid(field, "Sum exceeds the representable decimal range")
}

/// Total interest, principal and cash paid over a schedule. The opening
/// period carries no payment and contributes nothing.
///
/// Schedules may arrive deserialised from a caller rather than from
/// `build_schedule`, so every sum is checked.
pub fn totals(schedule: &Schedule) -> FinCalcResult<ScheduleTotals> {
    let mut total_interest = Decimal::ZERO;
    let mut total_principal = Decimal::ZERO;

    for period in schedule.payments() {
        total_interest = total_interest
            .checked_add(period.interest_due.unwrap_or(Decimal::ZERO))
            .ok_or_else(|| overflow("interest_due"))?;
        total_principal = total_principal
            .checked_add(period.principal_due.unwrap_or(Decimal::ZERO))
            .ok_or_else(|| overflow("principal_due"))?;
    }

    let total_paid = total_interest
        .checked_add(total_principal)
        .ok_or_else(|| overflow("total_paid"))?;

    Ok(ScheduleTotals {
        total_interest,
        total_principal,
        total_paid,
    })
}

/// Savings of `reduced` relative to `standard`.
///
/// Order matters: every field is `standard - reduced`, so swapping the
/// arguments flips the signs.
pub fn compare(standard: &Schedule, reduced: &Schedule) -> FinCalcResult<ScheduleComparison> {
    let base = totals(standard)?;
    let alt = totals(reduced)?;

    let comparison = ScheduleComparison {
        interest_saved: base
            .total_interest
            .checked_sub(alt.total_interest)
            .ok_or_else(|| overflow("interest_saved"))?,
        total_saved: base
            .total_paid
            .checked_sub(alt.total_paid)
            .ok_or_else(|| overflow("total_saved"))?,
        months_saved: standard.payment_count() as i64 - reduced.payment_count() as i64,
    };

    log::debug!(
        "compared schedules: interest_saved={} months_saved={}",
        comparison.interest_saved,
        comparison.months_saved
    );

    Ok(comparison)
}

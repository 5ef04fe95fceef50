//! Display-ready views of a schedule.
//!
//! Nothing here feeds back into the engine. Values are rounded to cents at
//! this boundary only, so totals shown to a user are derived from full
//! precision figures.

use rust_decimal::Decimal;
use rust_decimal::RoundingStrategy;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::aggregate::totals;
use super::schedule::Schedule;
use crate::error::FinCalcError;
use crate::time_value::round_currency;
use crate::types::Money;
use crate::FinCalcResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A schedule row rounded to cents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayRow {
    pub index: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_due: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interest_due: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub principal_due: Option<Money>,
    pub remaining_balance: Money,
}

/// One segment of the principal / interest / balance breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakdownSlice {
    pub label: String,
    pub amount: Money,
    /// Percentage of the breakdown total, one decimal place.
    pub share: Decimal,
}

/// A sampled point for a balance-over-time chart. Absent payment fields
/// (the opening period) are reported as zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub index: u32,
    pub interest_due: Money,
    pub principal_due: Money,
    pub balance: Money,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

pub fn display_rows(schedule: &Schedule) -> Vec<DisplayRow> {
    schedule
        .periods()
        .iter()
        .map(|p| DisplayRow {
            index: p.index,
            payment_due: p.payment_due.map(round_currency),
            interest_due: p.interest_due.map(round_currency),
            principal_due: p.principal_due.map(round_currency),
            remaining_balance: round_currency(p.remaining_balance),
        })
        .collect()
}

/// Principal paid, interest paid and the balance still outstanding at the
/// end of the schedule.
pub fn payment_breakdown(schedule: &Schedule) -> FinCalcResult<Vec<BreakdownSlice>> {
    let t = totals(schedule)?;
    let parts = [
        ("Principal Paid", t.total_principal),
        ("Interest Paid", t.total_interest),
        ("Remaining Balance", schedule.final_balance()),
    ];
    let sum = t
        .total_paid
        .checked_add(schedule.final_balance())
        .ok_or_else(|| {
            FinCalcError::invalid(
                "remaining_balance",
                "Breakdown total exceeds the representable decimal range",
            )
        })?;

    parts
        .into_iter()
        .map(|(label, amount)| {
            Ok(BreakdownSlice {
                label: label.to_string(),
                amount: round_currency(amount),
                share: share_of(amount, sum)?,
            })
        })
        .collect()
}

/// Sampling step for a chart of `period_len` rows (opening row included):
/// half-yearly up to 5 years, yearly up to 15, otherwise every two years.
pub fn chart_interval(period_len: usize) -> u32 {
    if period_len <= 60 {
        6
    } else if period_len <= 180 {
        12
    } else {
        24
    }
}

/// Opening period, every `chart_interval` period and the last period.
pub fn chart_points(schedule: &Schedule) -> Vec<ChartPoint> {
    let len = schedule.periods().len();
    let interval = chart_interval(len);
    let last = len.saturating_sub(1);

    schedule
        .periods()
        .iter()
        .filter(|p| p.index == 0 || p.index % interval == 0 || p.index as usize == last)
        .map(|p| ChartPoint {
            index: p.index,
            interest_due: round_currency(p.interest_due.unwrap_or(Decimal::ZERO)),
            principal_due: round_currency(p.principal_due.unwrap_or(Decimal::ZERO)),
            balance: round_currency(p.remaining_balance),
        })
        .collect()
}

fn share_of(amount: Money, total: Money) -> FinCalcResult<Decimal> {
    if total.is_zero() {
        return Ok(Decimal::ZERO);
    }
    amount
        .checked_div(total)
        .and_then(|ratio| ratio.checked_mul(dec!(100)))
        .map(|pct| pct.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero))
        .ok_or_else(|| FinCalcError::invalid("share", "Share is out of the representable range"))
}

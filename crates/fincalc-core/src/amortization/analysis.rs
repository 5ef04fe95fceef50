use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::aggregate::{compare, totals, ScheduleComparison, ScheduleTotals};
use super::schedule::{build_schedule, LoanParameters, Schedule};
use crate::types::{with_metadata, ComputationOutput, Money};
use crate::FinCalcResult;

/// Standard schedule plus, when an extra payment is requested, the
/// accelerated schedule and what it saves.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanAnalysisOutput {
    /// Fixed scheduled payment shared by both schedules.
    pub monthly_payment: Money,
    /// Nominal number of payments over the full term.
    pub payment_count: u32,
    pub standard: Schedule,
    pub standard_totals: ScheduleTotals,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accelerated: Option<Schedule>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accelerated_totals: Option<ScheduleTotals>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comparison: Option<ScheduleComparison>,
}

/// Amortise a loan and, if `extra_payment > 0`, compare early payoff
/// against the nominal term.
pub fn analyse_loan(
    params: &LoanParameters,
) -> FinCalcResult<ComputationOutput<LoanAnalysisOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    params.validate()?;
    let standard_params = params.clone().with_extra_payment(Decimal::ZERO);
    let standard = build_schedule(&standard_params)?;
    let standard_totals = totals(&standard)?;

    if params.annual_rate_percent.is_zero() {
        warnings.push("Zero interest rate: principal is repaid in equal instalments".into());
    }

    let (accelerated, accelerated_totals, comparison) = if params.extra_payment > Decimal::ZERO {
        let accelerated = build_schedule(params)?;
        if params.extra_payment >= params.principal {
            warnings.push(
                "Extra payment covers the whole principal; loan is retired in the first period"
                    .into(),
            );
        }
        let accelerated_totals = totals(&accelerated)?;
        let comparison = compare(&standard, &accelerated)?;
        (Some(accelerated), Some(accelerated_totals), Some(comparison))
    } else {
        (None, None, None)
    };

    let methodology = if comparison.is_some() {
        "Fixed-Rate Amortization with Extra Principal Comparison"
    } else {
        "Fixed-Rate Amortization"
    };

    let output = LoanAnalysisOutput {
        monthly_payment: standard.monthly_payment,
        payment_count: params.payment_count(),
        standard,
        standard_totals,
        accelerated,
        accelerated_totals,
        comparison,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        methodology,
        &serde_json::json!({
            "principal": params.principal.to_string(),
            "annual_rate_percent": params.annual_rate_percent.to_string(),
            "term_years": params.term_years,
            "extra_payment": params.extra_payment.to_string(),
            "compounding": "monthly",
        }),
        warnings,
        elapsed,
        output,
    ))
}

use napi::Result as NapiResult;
use napi_derive::napi;
use serde::Deserialize;

use fincalc_core::amortization::schedule::{LoanParameters, Schedule};
use fincalc_core::amortization::{aggregate, analysis, presentation, schedule};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

fn parse_schedule(schedule_json: &str) -> NapiResult<Schedule> {
    serde_json::from_str(schedule_json).map_err(to_napi_error)
}

/// Two schedules to compare, first minus second.
#[derive(Deserialize)]
struct ComparisonPair {
    standard: Schedule,
    reduced: Schedule,
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

#[napi]
pub fn build_schedule(input_json: String) -> NapiResult<String> {
    let input: LoanParameters = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = schedule::build_schedule(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn analyse_loan(input_json: String) -> NapiResult<String> {
    let input: LoanParameters = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = analysis::analyse_loan(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Aggregates
// ---------------------------------------------------------------------------

#[napi]
pub fn schedule_totals(schedule_json: String) -> NapiResult<String> {
    let schedule = parse_schedule(&schedule_json)?;
    let output = aggregate::totals(&schedule).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn compare_schedules(pair_json: String) -> NapiResult<String> {
    let pair: ComparisonPair = serde_json::from_str(&pair_json).map_err(to_napi_error)?;
    let output = aggregate::compare(&pair.standard, &pair.reduced).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Presentation
// ---------------------------------------------------------------------------

#[napi]
pub fn display_rows(schedule_json: String) -> NapiResult<String> {
    let schedule = parse_schedule(&schedule_json)?;
    serde_json::to_string(&presentation::display_rows(&schedule)).map_err(to_napi_error)
}

#[napi]
pub fn payment_breakdown(schedule_json: String) -> NapiResult<String> {
    let schedule = parse_schedule(&schedule_json)?;
    let output = presentation::payment_breakdown(&schedule).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn chart_points(schedule_json: String) -> NapiResult<String> {
    let schedule = parse_schedule(&schedule_json)?;
    serde_json::to_string(&presentation::chart_points(&schedule)).map_err(to_napi_error)
}

use clap::Args;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{json, Value};

use fincalc_core::amortization::aggregate;
use fincalc_core::amortization::analysis;
use fincalc_core::amortization::presentation;
use fincalc_core::amortization::schedule::{self, LoanParameters};

use crate::input;

/// Loan terms shared by every amortization command
#[derive(Args)]
pub struct LoanArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Amount borrowed
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Annual percentage rate (e.g. 6.5 for 6.5%)
    #[arg(long, alias = "apr")]
    pub rate: Option<Decimal>,

    /// Loan term in years
    #[arg(long, alias = "term")]
    pub term_years: Option<u32>,

    /// Extra principal paid every month
    #[arg(long)]
    pub extra_payment: Option<Decimal>,
}

impl LoanArgs {
    /// File first, then piped stdin, then individual flags.
    fn resolve(&self) -> Result<LoanParameters, Box<dyn std::error::Error>> {
        let params: LoanParameters = if let Some(ref path) = self.input {
            input::file::read_json(path)?
        } else if let Some(params) = input::stdin::read_stdin()? {
            params
        } else {
            let principal = self
                .principal
                .ok_or("--principal is required (or provide --input)")?;
            let rate = self
                .rate
                .ok_or("--rate is required (or provide --input)")?;
            let term_years = self
                .term_years
                .ok_or("--term-years is required (or provide --input)")?;

            LoanParameters::new(principal, rate, term_years)
                .with_extra_payment(self.extra_payment.unwrap_or(Decimal::ZERO))
        };
        log::debug!("resolved loan parameters: {:?}", params);
        Ok(params)
    }
}

/// Arguments for a single amortization schedule
#[derive(Args)]
pub struct ScheduleArgs {
    #[command(flatten)]
    pub loan: LoanArgs,

    /// Round every row to cents
    #[arg(long)]
    pub display: bool,
}

/// Arguments for an extra-payment comparison
#[derive(Args)]
pub struct CompareArgs {
    #[command(flatten)]
    pub loan: LoanArgs,

    /// Include both full schedules in the output
    #[arg(long)]
    pub with_schedules: bool,
}

/// Arguments for the payment breakdown and chart series
#[derive(Args)]
pub struct BreakdownArgs {
    #[command(flatten)]
    pub loan: LoanArgs,
}

pub fn run_schedule(args: ScheduleArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let params = args.loan.resolve()?;
    let schedule = schedule::build_schedule(&params)?;
    let totals = aggregate::totals(&schedule)?;

    let periods = if args.display {
        serde_json::to_value(presentation::display_rows(&schedule))?
    } else {
        serde_json::to_value(&schedule.periods)?
    };

    Ok(json!({
        "monthly_payment": schedule.monthly_payment,
        "monthly_rate": schedule.monthly_rate,
        "payment_count": schedule.payment_count(),
        "totals": totals,
        "periods": periods,
    }))
}

pub fn run_compare(args: CompareArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let params = args.loan.resolve()?;
    if params.extra_payment <= dec!(0) {
        return Err("--extra-payment must be greater than zero to compare schedules".into());
    }

    let output = analysis::analyse_loan(&params)?;
    let mut value = serde_json::to_value(output)?;

    if !args.with_schedules {
        if let Some(Value::Object(result)) = value.get_mut("result") {
            result.remove("standard");
            result.remove("accelerated");
        }
    }
    Ok(value)
}

pub fn run_breakdown(args: BreakdownArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let params = args.loan.resolve()?;
    let schedule = schedule::build_schedule(&params)?;

    Ok(json!({
        "slices": presentation::payment_breakdown(&schedule)?,
        "chart_interval": presentation::chart_interval(schedule.periods.len()),
        "chart_points": presentation::chart_points(&schedule),
    }))
}

//! Fixed-rate, fixed-term loan amortization.
//!
//! `schedule` builds the period-by-period recurrence, `aggregate` derives
//! totals and savings from finished schedules, and `analysis` packages both
//! for callers that want a single envelope. All math in `rust_decimal::Decimal`.

pub mod aggregate;
pub mod analysis;
pub mod schedule;

#[cfg(feature = "presentation")]
pub mod presentation;

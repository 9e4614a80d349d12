use crate::error::{CalculationError, Result};
use crate::format::CurrencyFormatter;
use crate::loan::{parse_integer_percent, LoanInput};

pub const MONTHS_PER_YEAR: u32 = 12;

/// Monthly fraction of an annual percent: `5` becomes `0.05 / 12`.
pub fn periodic_rate(annual_rate_percent: i64) -> f64 {
    (annual_rate_percent as f64 / 100.0) / MONTHS_PER_YEAR as f64
}

pub fn payment_count(term_years: u32) -> u32 {
    term_years.saturating_mul(MONTHS_PER_YEAR)
}

/// Standard amortized payment: `P * r(1+r)^n / ((1+r)^n - 1)`.
///
/// Plain floating point with no rounding. A zero rate divides by zero and
/// yields `NaN`; [`calculate`] is the checked entry point.
pub fn monthly_payment(principal: f64, annual_rate_percent: i64, term_years: u32) -> f64 {
    let r = periodic_rate(annual_rate_percent);
    let n = payment_count(term_years) as f64;
    let growth = (1.0 + r).powf(n);
    principal * ((r * growth) / (growth - 1.0))
}

/// Monthly payment for a validated input.
///
/// The rate text is truncated to a whole percent before use.
pub fn calculate(input: &LoanInput) -> Result<f64> {
    let rate_percent = parse_integer_percent(&input.annual_rate_percent)?;
    let r = periodic_rate(rate_percent);
    if r == 0.0 {
        return Err(CalculationError::ZeroRate);
    }
    if !input.principal.is_finite() {
        return Err(CalculationError::PrincipalNotFinite);
    }
    // (1+r)^n must be finite and differ from 1, or the formula has no value.
    let n = payment_count(input.term_years);
    if n == 0 || !(1.0 + r).powf(n as f64).is_finite() {
        return Err(CalculationError::TermOutOfRange);
    }

    let payment = monthly_payment(input.principal, rate_percent, input.term_years);
    log::debug!(
        "principal={} rate={}% term={}y -> payment={}",
        input.principal,
        rate_percent,
        input.term_years,
        payment
    );
    if !payment.is_finite() {
        return Err(CalculationError::NonFinite);
    }
    Ok(payment)
}

/// Calculates payments and renders them with one configured formatter.
#[derive(Debug, Clone, Default)]
pub struct PaymentCalculator {
    formatter: CurrencyFormatter,
}

impl PaymentCalculator {
    pub fn new(formatter: CurrencyFormatter) -> Self {
        Self { formatter }
    }

    pub fn formatter(&self) -> &CurrencyFormatter {
        &self.formatter
    }

    pub fn calculate(&self, input: &LoanInput) -> Result<String> {
        calculate(input).map(|payment| self.formatter.format(payment))
    }
}

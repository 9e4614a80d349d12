use serde::{Deserialize, Serialize};

use crate::error::{InputError, ParseError};

/// Sentinel the rate field holds while blank.
pub const BLANK_RATE: &str = "0";

/// Loan terms as entered on the form.
///
/// The rate stays as text: it is only turned into a number when a payment
/// is calculated, see [`parse_integer_percent`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanInput {
    pub principal: f64,
    pub annual_rate_percent: String,
    pub term_years: u32,
}

impl Default for LoanInput {
    fn default() -> Self {
        Self {
            principal: 0.0,
            annual_rate_percent: BLANK_RATE.to_string(),
            term_years: 0,
        }
    }
}

impl LoanInput {
    pub fn new(principal: f64, annual_rate_percent: impl Into<String>, term_years: u32) -> Self {
        Self {
            principal,
            annual_rate_percent: annual_rate_percent.into(),
            term_years,
        }
    }

    /// Empty text clears the field back to zero.
    pub fn update_principal(&mut self, text: &str) -> Result<(), InputError> {
        let text = text.trim();
        if text.is_empty() {
            self.principal = 0.0;
            return Ok(());
        }
        let principal = text
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| InputError::Principal {
                text: text.to_string(),
            })?;
        self.principal = principal;
        Ok(())
    }

    pub fn update_rate(&mut self, text: &str) {
        self.annual_rate_percent = text.to_string();
    }

    /// Empty text clears the field back to zero.
    pub fn update_term(&mut self, text: &str) -> Result<(), InputError> {
        let text = text.trim();
        if text.is_empty() {
            self.term_years = 0;
            return Ok(());
        }
        self.term_years = text.parse().map_err(|_| InputError::Term {
            text: text.to_string(),
        })?;
        Ok(())
    }
}

/// Parses the leading integer of a percent string, dropping any fraction or
/// trailing text: `"5.75"` is `5`, `" 12x"` is `12`.
pub fn parse_integer_percent(text: &str) -> Result<i64, ParseError> {
    let trimmed = text.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits_len == 0 {
        return Err(ParseError::NotANumber {
            text: text.to_string(),
        });
    }

    let digits = &rest[..digits_len];
    let signed = if negative {
        format!("-{digits}")
    } else {
        digits.to_string()
    };
    signed.parse().map_err(|_| ParseError::OutOfRange {
        text: text.to_string(),
    })
}

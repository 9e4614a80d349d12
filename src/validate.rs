use serde::Serialize;

use crate::loan::{LoanInput, BLANK_RATE};

pub const PRINCIPAL_BLANK: &str = "Principal cannot be blank!";
pub const RATE_BLANK: &str = "Rate cannot be blank!";
pub const TERM_BLANK: &str = "Term cannot be blank!";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Principal,
    Rate,
    Term,
}

impl Field {
    pub const ALL: [Field; 3] = [Field::Principal, Field::Rate, Field::Term];

    pub fn label(&self) -> &'static str {
        match self {
            Field::Principal => "Principal Loan Amount:",
            Field::Rate => "Interest Rate:",
            Field::Term => "Length of Loan (in years):",
        }
    }

    pub fn next(&self) -> Field {
        match self {
            Field::Principal => Field::Rate,
            Field::Rate => Field::Term,
            Field::Term => Field::Principal,
        }
    }

    pub fn prev(&self) -> Field {
        match self {
            Field::Principal => Field::Term,
            Field::Rate => Field::Principal,
            Field::Term => Field::Rate,
        }
    }
}

/// Per-field error messages; an empty string means the field is fine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    pub principal: String,
    pub rate: String,
    pub term: String,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.principal.is_empty() && self.rate.is_empty() && self.term.is_empty()
    }

    pub fn message(&self, field: Field) -> &str {
        match field {
            Field::Principal => &self.principal,
            Field::Rate => &self.rate,
            Field::Term => &self.term,
        }
    }

    pub fn set(&mut self, field: Field, message: impl Into<String>) {
        let slot = match field {
            Field::Principal => &mut self.principal,
            Field::Rate => &mut self.rate,
            Field::Term => &mut self.term,
        };
        *slot = message.into();
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Checks that every field has been filled in.
///
/// This is a presence check only. A blank field is one still holding its
/// cleared value: `0` principal, the literal `"0"` rate text, `0` years.
/// Negative amounts and non-numeric rate text pass.
pub fn validate(input: &LoanInput) -> ValidationResult {
    let mut result = ValidationResult::default();
    if input.principal == 0.0 {
        result.set(Field::Principal, PRINCIPAL_BLANK);
    }
    if input.annual_rate_percent == BLANK_RATE {
        result.set(Field::Rate, RATE_BLANK);
    }
    if input.term_years == 0 {
        result.set(Field::Term, TERM_BLANK);
    }
    log::debug!("validated {:?}: valid={}", input, result.is_valid());
    result
}

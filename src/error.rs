use thiserror::Error;

use crate::validate::Field;

/// Rejected edit of a numeric form field.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InputError {
    #[error("principal is not a number: {text:?}")]
    Principal { text: String },

    #[error("term is not a whole number of years: {text:?}")]
    Term { text: String },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("rate is not a number: {text:?}")]
    NotANumber { text: String },

    #[error("rate is out of range: {text:?}")]
    OutOfRange { text: String },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalculationError {
    #[error(transparent)]
    Rate(#[from] ParseError),

    #[error("rate must not be zero")]
    ZeroRate,

    #[error("principal is not a finite amount")]
    PrincipalNotFinite,

    #[error("term is out of range for this rate")]
    TermOutOfRange,

    #[error("payment is not a finite amount")]
    NonFinite,
}

impl CalculationError {
    /// Form field the failure belongs to, `None` when no single field caused it.
    pub fn field(&self) -> Option<Field> {
        match self {
            CalculationError::Rate(_) | CalculationError::ZeroRate => Some(Field::Rate),
            CalculationError::PrincipalNotFinite => Some(Field::Principal),
            CalculationError::TermOutOfRange => Some(Field::Term),
            CalculationError::NonFinite => None,
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown locale: {0}")]
    UnknownLocale(String),

    #[error("unknown currency: {0}")]
    UnknownCurrency(String),
}

pub type Result<T> = std::result::Result<T, CalculationError>;

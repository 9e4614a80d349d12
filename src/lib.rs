//! Mortgage payment calculator core: loan input, validation, the amortized
//! monthly payment and currency formatting.

pub mod config;
pub mod error;
pub mod form;
pub mod format;
pub mod loan;
pub mod payment;
pub mod validate;

pub use error::{CalculationError, ConfigError, InputError, ParseError};
pub use form::LoanForm;
pub use format::{Currency, CurrencyFormatter, FormatOptions, Locale};
pub use loan::{parse_integer_percent, LoanInput};
pub use payment::PaymentCalculator;
pub use validate::{validate, Field, ValidationResult};

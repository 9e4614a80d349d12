use serde::Serialize;

use crate::error::InputError;
use crate::loan::LoanInput;
use crate::payment::PaymentCalculator;
use crate::validate::{validate, Field, ValidationResult};

/// State behind the calculator form: what was typed, the errors from the last
/// submit, and the formatted payment (empty until a submit succeeds).
///
/// `error` holds a failure no single field is responsible for.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LoanForm {
    pub input: LoanInput,
    pub errors: ValidationResult,
    pub error: String,
    pub payment: String,
}

impl LoanForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, field: Field, text: &str) -> Result<(), InputError> {
        match field {
            Field::Principal => self.input.update_principal(text),
            Field::Rate => {
                self.input.update_rate(text);
                Ok(())
            }
            Field::Term => self.input.update_term(text),
        }
    }

    /// Validates and, if every field is present, calculates the payment.
    ///
    /// Returns whether a payment is now shown. Errors and payment are
    /// recomputed on every call.
    pub fn submit(&mut self, calculator: &PaymentCalculator) -> bool {
        self.errors = validate(&self.input);
        self.error.clear();
        self.payment.clear();
        if !self.errors.is_valid() {
            log::info!("submit rejected: {:?}", self.errors);
            return false;
        }

        match calculator.calculate(&self.input) {
            Ok(payment) => {
                log::info!("monthly payment {payment}");
                self.payment = payment;
                true
            }
            Err(e) => {
                log::warn!("calculation failed for {:?}: {e}", self.input);
                match e.field() {
                    Some(field) => self.errors.set(field, e.to_string()),
                    None => self.error = e.to_string(),
                }
                false
            }
        }
    }

    pub fn reset(&mut self) {
        log::info!("form cleared");
        *self = Self::default();
    }

    pub fn has_payment(&self) -> bool {
        !self.payment.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::{PRINCIPAL_BLANK, TERM_BLANK};

    fn filled() -> LoanForm {
        let mut form = LoanForm::new();
        form.update(Field::Principal, "200000").unwrap();
        form.update(Field::Rate, "6").unwrap();
        form.update(Field::Term, "30").unwrap();
        form
    }

    #[test]
    fn test_submit_valid_form() {
        let mut form = filled();
        assert!(form.submit(&PaymentCalculator::default()));
        assert_eq!(form.payment, "$1,199.10");
        assert!(form.errors.is_valid());
    }

    #[test]
    fn test_submit_blank_form() {
        let mut form = LoanForm::new();
        assert!(!form.submit(&PaymentCalculator::default()));
        assert!(!form.has_payment());
        assert_eq!(form.errors.principal, PRINCIPAL_BLANK);
    }

    #[test]
    fn test_errors_are_recomputed() {
        let calculator = PaymentCalculator::default();
        let mut form = filled();
        form.update(Field::Principal, "").unwrap();
        form.update(Field::Term, "").unwrap();
        assert!(!form.submit(&calculator));

        form.update(Field::Principal, "1000").unwrap();
        assert!(!form.submit(&calculator));
        assert!(form.errors.principal.is_empty());
        assert_eq!(form.errors.term, TERM_BLANK);
    }

    #[test]
    fn test_failed_submit_clears_previous_payment() {
        let calculator = PaymentCalculator::default();
        let mut form = filled();
        assert!(form.submit(&calculator));
        form.update(Field::Term, "0").unwrap();
        assert!(!form.submit(&calculator));
        assert!(form.payment.is_empty());
    }

    #[test]
    fn test_calculation_error_shown_on_rate() {
        let mut form = filled();
        form.update(Field::Rate, "0.0").unwrap();
        assert!(!form.submit(&PaymentCalculator::default()));
        assert_eq!(form.errors.rate, "rate must not be zero");
        assert!(form.errors.principal.is_empty());
    }

    #[test]
    fn test_oversized_term_shown_on_term() {
        let mut form = filled();
        form.update(Field::Term, "100000").unwrap();
        assert!(!form.submit(&PaymentCalculator::default()));
        assert!(form.errors.principal.is_empty());
        assert!(form.errors.rate.is_empty());
        assert_eq!(form.errors.term, "term is out of range for this rate");
        assert!(form.error.is_empty());
    }

    #[test]
    fn test_unattributed_failure_is_form_level() {
        let mut form = filled();
        form.input.principal = f64::MAX;
        form.update(Field::Rate, "2400").unwrap();
        form.update(Field::Term, "1").unwrap();
        assert!(!form.submit(&PaymentCalculator::default()));
        assert!(form.errors.is_valid());
        assert_eq!(form.error, "payment is not a finite amount");

        form.update(Field::Principal, "1000").unwrap();
        assert!(form.submit(&PaymentCalculator::default()));
        assert!(form.error.is_empty());
    }

    #[test]
    fn test_rejected_edit_keeps_value() {
        let mut form = filled();
        assert!(form.update(Field::Term, "thirty").is_err());
        assert_eq!(form.input.term_years, 30);
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut form = filled();
        form.submit(&PaymentCalculator::default());
        form.reset();
        let once = form.clone();
        form.reset();
        assert_eq!(form, once);
        assert_eq!(form, LoanForm::default());
    }
}

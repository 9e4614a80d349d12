//! Interactive form state: one text buffer per field, kept in step with the
//! [`LoanForm`] on every keystroke.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use mortgage_calc::{loan::BLANK_RATE, Field, LoanForm, PaymentCalculator};

pub struct App {
    pub form: LoanForm,
    pub calculator: PaymentCalculator,
    pub focus: Field,
    principal: String,
    rate: String,
    term: String,
}

impl App {
    pub fn new(calculator: PaymentCalculator) -> Self {
        Self {
            form: LoanForm::new(),
            calculator,
            focus: Field::Principal,
            principal: String::new(),
            rate: String::new(),
            term: String::new(),
        }
    }

    pub fn buffer(&self, field: Field) -> &str {
        match field {
            Field::Principal => &self.principal,
            Field::Rate => &self.rate,
            Field::Term => &self.term,
        }
    }

    fn buffer_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Principal => &mut self.principal,
            Field::Rate => &mut self.rate,
            Field::Term => &mut self.term,
        }
    }

    /// Pushes the focused buffer into the form. A cleared rate box goes back
    /// to the blank sentinel so it reads as blank on submit.
    fn sync_focused(&mut self) -> bool {
        let field = self.focus;
        let text = match (field, self.buffer(field)) {
            (Field::Rate, "") => BLANK_RATE.to_string(),
            (_, text) => text.to_string(),
        };
        self.form.update(field, &text).is_ok()
    }

    pub fn type_char(&mut self, c: char) {
        self.buffer_mut(self.focus).push(c);
        if !self.sync_focused() {
            self.buffer_mut(self.focus).pop();
        }
    }

    pub fn delete_char(&mut self) {
        self.buffer_mut(self.focus).pop();
        self.sync_focused();
    }

    pub fn clear(&mut self) {
        self.form.reset();
        self.principal.clear();
        self.rate.clear();
        self.term.clear();
        self.focus = Field::Principal;
    }
}

pub fn accepts(field: Field, c: char) -> bool {
    match field {
        Field::Principal | Field::Rate => c.is_ascii_digit() || c == '.',
        Field::Term => c.is_ascii_digit(),
    }
}

/// Returns true when the user asked to quit.
pub fn handle_form_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Char(c) if accepts(app.focus, c) => app.type_char(c),
        KeyCode::Backspace => app.delete_char(),
        KeyCode::Tab | KeyCode::Down => app.focus = app.focus.next(),
        KeyCode::BackTab | KeyCode::Up => app.focus = app.focus.prev(),
        KeyCode::Enter => {
            app.form.submit(&app.calculator);
        }
        KeyCode::Char('c') | KeyCode::Char('C') => app.clear(),
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => return Ok(true),
        _ => {}
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use mortgage_calc::validate::RATE_BLANK;

    fn press(app: &mut App, code: KeyCode) -> bool {
        handle_form_input(app, KeyEvent::new(code, KeyModifiers::NONE)).unwrap()
    }

    fn type_str(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn filled_app() -> App {
        let mut app = App::new(PaymentCalculator::default());
        type_str(&mut app, "200000");
        press(&mut app, KeyCode::Tab);
        type_str(&mut app, "6");
        press(&mut app, KeyCode::Tab);
        type_str(&mut app, "30");
        app
    }

    #[test]
    fn test_keystroke_filter() {
        assert!(accepts(Field::Principal, '7'));
        assert!(accepts(Field::Principal, '.'));
        assert!(accepts(Field::Rate, '.'));
        assert!(accepts(Field::Term, '3'));
        assert!(!accepts(Field::Term, '.'));
        for field in Field::ALL {
            assert!(!accepts(field, '-'));
            assert!(!accepts(field, 'e'));
        }
    }

    #[test]
    fn test_typing_updates_form() {
        let app = filled_app();
        assert_eq!(app.buffer(Field::Principal), "200000");
        assert_eq!(app.form.input.principal, 200_000.0);
        assert_eq!(app.form.input.annual_rate_percent, "6");
        assert_eq!(app.form.input.term_years, 30);
    }

    #[test]
    fn test_enter_submits() {
        let mut app = filled_app();
        assert!(!press(&mut app, KeyCode::Enter));
        assert_eq!(app.form.payment, "$1,199.10");
    }

    #[test]
    fn test_emptied_rate_reads_as_blank() {
        let mut app = filled_app();
        app.focus = Field::Rate;
        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.buffer(Field::Rate), "");
        assert_eq!(app.form.input.annual_rate_percent, BLANK_RATE);

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.form.errors.rate, RATE_BLANK);
        assert!(!app.form.has_payment());
    }

    #[test]
    fn test_unparseable_keystroke_is_dropped() {
        let mut app = App::new(PaymentCalculator::default());
        type_str(&mut app, "1.5.");
        assert_eq!(app.buffer(Field::Principal), "1.5");
        assert_eq!(app.form.input.principal, 1.5);
    }

    #[test]
    fn test_clear_and_quit() {
        let mut app = filled_app();
        press(&mut app, KeyCode::Enter);
        assert!(!press(&mut app, KeyCode::Char('c')));
        assert_eq!(app.form, LoanForm::default());
        assert_eq!(app.focus, Field::Principal);
        for field in Field::ALL {
            assert_eq!(app.buffer(field), "");
        }
        assert!(press(&mut app, KeyCode::Char('q')));
        assert!(press(&mut app, KeyCode::Esc));
    }
}

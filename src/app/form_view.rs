//! Terminal binding for a [`FormState`]: field focus, text entry and the
//! submit lifecycle of one form.
//!
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::form::FormState;
use crate::validate::{FormRecord, Rule};

/// Result of feeding a key to a form.
#[derive(Debug, PartialEq, Eq)]
pub enum FormInput<R> {
    /// Submit was requested on a valid, idle form; the values to send.
    Submit(R),
    Consumed,
    Ignored,
}

#[derive(Clone, Debug)]
pub struct FormView<R: FormRecord> {
    pub form: FormState<R>,
    pub focus: usize,
    /// Set while the submit task is in flight; blocks a second submit.
    pub submitting: bool,
    pub submit_error: Option<String>,
    masked: Vec<R::Field>,
}

impl<R: FormRecord> FormView<R> {
    pub fn new(initial: R, rules: Vec<Rule<R>>) -> Self {
        Self {
            form: FormState::new(initial, rules),
            focus: 0,
            submitting: false,
            submit_error: None,
            masked: Vec::new(),
        }
    }

    /// Render these fields as bullets.
    pub fn with_masked(mut self, fields: &[R::Field]) -> Self {
        self.masked = fields.to_vec();
        self
    }

    pub fn is_masked(&self, field: R::Field) -> bool {
        self.masked.contains(&field)
    }

    pub fn focused_field(&self) -> R::Field {
        let fields = R::fields();
        fields[self.focus.min(fields.len() - 1)]
    }

    /// Leaving a field marks it touched.
    pub fn focus_next(&mut self) {
        self.form.on_blur(self.focused_field());
        self.focus = (self.focus + 1) % R::fields().len();
    }

    pub fn focus_prev(&mut self) {
        self.form.on_blur(self.focused_field());
        let len = R::fields().len();
        self.focus = (self.focus + len - 1) % len;
    }

    pub fn can_submit(&self) -> bool {
        self.form.is_valid() && !self.submitting
    }

    pub fn begin_submit(&mut self) -> Option<R> {
        self.submit_error = None;
        if !self.can_submit() {
            return None;
        }
        self.submitting = true;
        Some(self.form.values().clone())
    }

    pub fn finish_submit(&mut self, error: Option<String>) {
        self.submitting = false;
        self.submit_error = error;
    }

    pub fn reset(&mut self) {
        self.form.reset();
        self.focus = 0;
        self.submitting = false;
        self.submit_error = None;
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> FormInput<R> {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return FormInput::Ignored;
        }
        match key.code {
            KeyCode::Tab | KeyCode::Down => self.focus_next(),
            KeyCode::BackTab | KeyCode::Up => self.focus_prev(),
            KeyCode::Enter => {
                self.form.on_blur(self.focused_field());
                return match self.begin_submit() {
                    Some(values) => FormInput::Submit(values),
                    None => FormInput::Consumed,
                };
            }
            KeyCode::Backspace => {
                if self.submitting {
                    return FormInput::Consumed;
                }
                let field = self.focused_field();
                let mut value = self.form.value(field).to_string();
                value.pop();
                self.form.on_change(field, value);
            }
            KeyCode::Char(c) => {
                if self.submitting {
                    return FormInput::Consumed;
                }
                let field = self.focused_field();
                let mut value = self.form.value(field).to_string();
                value.push(c);
                self.form.on_change(field, value);
            }
            _ => return FormInput::Ignored,
        }
        FormInput::Consumed
    }
}

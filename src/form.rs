//! Form state controller.
//!
//! Owns the current values of one form, which fields the user has left at
//! least once, and the error map derived from the values. Errors are
//! recomputed eagerly on every mutation so reads are free.
//!
use std::collections::BTreeSet;

use crate::validate::{ErrorMap, FormRecord, Rule, Validator};

#[derive(Clone, Debug)]
pub struct FormState<R: FormRecord> {
    initial: R,
    values: R,
    touched: BTreeSet<R::Field>,
    validator: Validator<R>,
    errors: Option<ErrorMap<R::Field>>,
}

impl<R: FormRecord> FormState<R> {
    pub fn new(initial: R, rules: Vec<Rule<R>>) -> Self {
        let validator = Validator::new(rules);
        let errors = validator.validate(&initial);
        Self {
            values: initial.clone(),
            initial,
            touched: BTreeSet::new(),
            validator,
            errors,
        }
    }

    pub fn values(&self) -> &R {
        &self.values
    }

    pub fn value(&self, field: R::Field) -> &str {
        self.values.value(field)
    }

    /// Replace one field's value; other fields and touched flags are kept.
    pub fn on_change(&mut self, field: R::Field, value: impl Into<String>) {
        *self.values.value_mut(field) = value.into();
        self.revalidate();
    }

    pub fn on_blur(&mut self, field: R::Field) {
        self.touched.insert(field);
    }

    /// Apply a bulk edit to the values record.
    pub fn set_values<F: FnOnce(&mut R)>(&mut self, updater: F) {
        updater(&mut self.values);
        self.revalidate();
    }

    /// Restore the initial values and forget every touched flag.
    pub fn reset(&mut self) {
        self.values = self.initial.clone();
        self.touched.clear();
        self.revalidate();
    }

    pub fn is_touched(&self, field: R::Field) -> bool {
        self.touched.contains(&field)
    }

    pub fn touched(&self) -> impl Iterator<Item = R::Field> + '_ {
        self.touched.iter().copied()
    }

    pub fn errors(&self) -> Option<&ErrorMap<R::Field>> {
        self.errors.as_ref()
    }

    pub fn field_errors(&self, field: R::Field) -> &[&'static str] {
        self.errors
            .as_ref()
            .and_then(|e| e.get(&field))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Messages to show for `field`: empty until the field has been touched.
    pub fn visible_errors(&self, field: R::Field) -> &[&'static str] {
        if self.is_touched(field) { self.field_errors(field) } else { &[] }
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_none()
    }

    fn revalidate(&mut self) {
        self.errors = self.validator.validate(&self.values);
    }
}

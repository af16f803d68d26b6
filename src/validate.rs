//! Rule-based validation of form records.
//!
//! A [`Rule`] pairs a field of a record with a message and a predicate over
//! the whole record. [`validate`] runs a rule list in declaration order and
//! collects the messages of every rule that fires, grouped by field.
//!
use std::collections::BTreeMap;
use std::fmt::Debug;

/// A flat record of string fields that rules can be evaluated against.
///
/// Implemented by each form's value struct; `Field` is a small enum naming
/// its keys.
pub trait FormRecord: Clone + Debug {
    type Field: Copy + Eq + Ord + Debug + 'static;

    /// All fields in display order.
    fn fields() -> &'static [Self::Field];

    /// Human-readable label for a field.
    fn label(field: Self::Field) -> &'static str;

    fn value(&self, field: Self::Field) -> &str;

    fn value_mut(&mut self, field: Self::Field) -> &mut String;
}

/// One declarative check: `check` returns `true` when the rule is violated.
pub struct Rule<R: FormRecord> {
    pub field: R::Field,
    pub message: &'static str,
    pub check: fn(&R) -> bool,
}

// Derives would bound `R` itself; only the stored parts need these.
impl<R: FormRecord> Clone for Rule<R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R: FormRecord> Copy for Rule<R> {}

impl<R: FormRecord> Debug for Rule<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule")
            .field("field", &self.field)
            .field("message", &self.message)
            .finish()
    }
}

impl<R: FormRecord> Rule<R> {
    pub const fn new(field: R::Field, message: &'static str, check: fn(&R) -> bool) -> Self {
        Self { field, message, check }
    }
}

/// Field -> violated-rule messages, in rule declaration order.
pub type ErrorMap<F> = BTreeMap<F, Vec<&'static str>>;

/// Evaluate `rules` against `values`.
///
/// Returns `None` when no rule fires; otherwise every field with at least one
/// violation maps to its messages in the order the rules were declared.
pub fn validate<R: FormRecord>(values: &R, rules: &[Rule<R>]) -> Option<ErrorMap<R::Field>> {
    let errors = rules.iter().fold(ErrorMap::new(), |mut acc, rule| {
        if (rule.check)(values) {
            acc.entry(rule.field).or_default().push(rule.message);
        }
        acc
    });
    if errors.is_empty() { None } else { Some(errors) }
}

/// A rule list bound once and applied to many records.
#[derive(Clone, Debug)]
pub struct Validator<R: FormRecord> {
    rules: Vec<Rule<R>>,
}

impl<R: FormRecord> Validator<R> {
    pub fn new(rules: Vec<Rule<R>>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[Rule<R>] {
        &self.rules
    }

    pub fn validate(&self, values: &R) -> Option<ErrorMap<R::Field>> {
        validate(values, &self.rules)
    }
}

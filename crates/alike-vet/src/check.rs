//! Validation check trees.

use alike_value::Value;
use std::fmt;

/// Host-side test run against the value being validated. Returns the test's
/// result value, or an error message if the test itself could not run.
pub type TestFn = dyn Fn(&Value) -> Result<Value, String> + Send + Sync;

/// A labelled test whose result must be `TRUE`.
pub struct Predicate {
    label: String,
    message: Option<String>,
    test: Box<TestFn>,
}

impl Predicate {
    /// `label` is the test as the user wrote it, e.g. `all(x > 0)`.
    pub fn new(
        label: impl Into<String>,
        test: impl Fn(&Value) -> Result<Value, String> + Send + Sync + 'static,
    ) -> Self {
        Self {
            label: label.into(),
            message: None,
            test: Box::new(test),
        }
    }

    /// Replace the generated failure message. `%s` in the template is
    /// replaced with the quoted argument name.
    pub fn with_message(mut self, template: impl Into<String>) -> Self {
        self.message = Some(template.into());
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub(crate) fn run(&self, value: &Value) -> Result<Value, String> {
        (self.test)(value)
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Predicate")
            .field("label", &self.label)
            .field("message", &self.message)
            .finish_non_exhaustive()
    }
}

/// A boolean tree of checks.
#[derive(Debug)]
pub enum Check {
    /// Every check must pass; the first failure is reported.
    All(Vec<Check>),
    /// One check must pass; if none does, every failure is reported. An
    /// empty list passes.
    Any(Vec<Check>),
    /// The value must be alike this template.
    Template(Value),
    Predicate(Predicate),
}

impl Check {
    pub fn template(value: Value) -> Self {
        Check::Template(value)
    }

    pub fn predicate(predicate: Predicate) -> Self {
        Check::Predicate(predicate)
    }

    /// `self && other`, flattening nested conjunctions.
    pub fn and(self, other: Check) -> Self {
        match self {
            Check::All(mut checks) => {
                checks.push(other);
                Check::All(checks)
            }
            first => Check::All(vec![first, other]),
        }
    }

    /// `self || other`, flattening nested disjunctions.
    pub fn or(self, other: Check) -> Self {
        match self {
            Check::Any(mut checks) => {
                checks.push(other);
                Check::Any(checks)
            }
            first => Check::Any(vec![first, other]),
        }
    }
}

impl From<Value> for Check {
    fn from(template: Value) -> Self {
        Check::Template(template)
    }
}

impl From<Predicate> for Check {
    fn from(predicate: Predicate) -> Self {
        Check::Predicate(predicate)
    }
}

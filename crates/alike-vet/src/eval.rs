//! Evaluation of check trees against a value.

use crate::check::{Check, Predicate};
use crate::error::VetError;
use crate::outcome::PredicateOutcome;
use crate::render::dedup;
use alike_core::{alike, Settings, DEFAULT_NAME};
use alike_value::{ScopeArena, Value};
use tracing::{debug, trace};

/// Evaluates checks for one named argument.
pub struct Vetter<'a> {
    scopes: &'a ScopeArena,
    settings: &'a Settings,
    name: String,
}

impl<'a> Vetter<'a> {
    pub fn new(scopes: &'a ScopeArena, settings: &'a Settings) -> Self {
        Self {
            scopes,
            settings,
            name: DEFAULT_NAME.to_string(),
        }
    }

    /// Name the value is reported under.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Check `value`, returning the deduplicated failure messages, or an
    /// empty list if it passed.
    pub fn failures(&self, check: &Check, value: &Value) -> Result<Vec<String>, VetError> {
        self.settings.validate()?;
        let mut failures = Vec::new();
        if self.eval(check, value, &mut failures)? {
            failures.clear();
        }
        dedup(&mut failures);
        debug!(name = %self.name, failures = failures.len(), "validation finished");
        Ok(failures)
    }

    /// Check `value`, failing with [`VetError::Failed`] if it does not pass.
    pub fn check(&self, check: &Check, value: &Value) -> Result<(), VetError> {
        let messages = self.failures(check, value)?;
        if messages.is_empty() {
            Ok(())
        } else {
            Err(VetError::Failed {
                name: self.name.clone(),
                messages,
            })
        }
    }

    fn eval(&self, check: &Check, value: &Value, failures: &mut Vec<String>) -> Result<bool, VetError> {
        match check {
            Check::All(checks) => {
                for c in checks {
                    if !self.eval(c, value, failures)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            Check::Any(checks) => {
                if checks.is_empty() {
                    return Ok(true);
                }
                let start = failures.len();
                for (i, c) in checks.iter().enumerate() {
                    if self.eval(c, value, failures)? {
                        trace!(branch = i, "alternative passed");
                        failures.truncate(start);
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            Check::Template(template) => {
                let result = alike(template, value, self.scopes, self.settings)?;
                match result.render(&self.name, self.settings) {
                    Some(message) => {
                        failures.push(message);
                        Ok(false)
                    }
                    None => Ok(true),
                }
            }
            Check::Predicate(predicate) => self.predicate(predicate, value, failures),
        }
    }

    fn predicate(
        &self,
        predicate: &Predicate,
        value: &Value,
        failures: &mut Vec<String>,
    ) -> Result<bool, VetError> {
        let result = predicate.run(value).map_err(|reason| VetError::Predicate {
            name: self.name.clone(),
            label: predicate.label().to_string(),
            reason,
        })?;
        let outcome = PredicateOutcome::classify(&result);
        trace!(label = predicate.label(), ?outcome, "predicate evaluated");
        if outcome.passed() {
            return Ok(true);
        }
        let message = match predicate.message() {
            Some(template) => template.replace("%s", &format!("`{}`", self.name)),
            None => outcome.describe(predicate.label()).unwrap_or_default(),
        };
        failures.push(message);
        Ok(false)
    }
}

/// Validate `value` named `name` against `check`.
pub fn vet(
    check: &Check,
    value: &Value,
    name: &str,
    scopes: &ScopeArena,
    settings: &Settings,
) -> Result<(), VetError> {
    Vetter::new(scopes, settings).named(name).check(check, value)
}

//! Classification of predicate results.

use alike_value::{Data, Value};

/// What a predicate returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PredicateOutcome {
    True,
    False,
    Na,
    /// A longer logical vector with missing values.
    ContainsNa,
    ZeroLength,
    /// A longer logical vector with at least one `FALSE`.
    NotAllTrue,
    /// A non-logical result; carries its type name.
    NotLogical(&'static str),
    /// The predicate returned its own failure message.
    Message(String),
}

impl PredicateOutcome {
    pub fn classify(value: &Value) -> Self {
        match &value.data {
            Data::Character(v) if !v.is_empty() => PredicateOutcome::Message(v[0].clone()),
            Data::Logical(v) => match v.as_slice() {
                [] => PredicateOutcome::ZeroLength,
                [Some(true)] => PredicateOutcome::True,
                [Some(false)] => PredicateOutcome::False,
                [None] => PredicateOutcome::Na,
                _ if v.iter().any(Option::is_none) => PredicateOutcome::ContainsNa,
                _ if v.iter().any(|b| *b == Some(false)) => PredicateOutcome::NotAllTrue,
                _ => PredicateOutcome::True,
            },
            _ => PredicateOutcome::NotLogical(value.type_name()),
        }
    }

    pub fn passed(&self) -> bool {
        matches!(self, PredicateOutcome::True)
    }

    /// Failure message for a predicate labelled `label`, or `None` if it
    /// passed.
    pub fn describe(&self, label: &str) -> Option<String> {
        let token = match self {
            PredicateOutcome::True => return None,
            PredicateOutcome::Message(msg) => return Some(msg.clone()),
            PredicateOutcome::False => "FALSE".to_string(),
            PredicateOutcome::Na => "NA".to_string(),
            PredicateOutcome::ContainsNa => "contains NAs".to_string(),
            PredicateOutcome::ZeroLength => "zero length".to_string(),
            PredicateOutcome::NotAllTrue => "contains non-TRUE values".to_string(),
            PredicateOutcome::NotLogical(type_name) => {
                format!("is \"{}\" instead of a \"logical\"", type_name)
            }
        };
        let verdict = if *self == PredicateOutcome::NotAllTrue {
            "is not all TRUE"
        } else {
            "is not TRUE"
        };
        Some(format!("`{}` {} ({})", label, verdict, token))
    }
}

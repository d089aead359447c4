use crate::render::{render, ReturnMode};
use alike_core::AlikeError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum VetError {
    /// The value failed validation.
    #[error("{}", full_message(.name, .messages))]
    Failed { name: String, messages: Vec<String> },

    /// A predicate could not be evaluated.
    #[error("validation of argument `{name}` produced an error while evaluating `{label}`: {reason}")]
    Predicate {
        name: String,
        label: String,
        reason: String,
    },

    #[error(transparent)]
    Alike(#[from] AlikeError),
}

impl VetError {
    /// Failure messages, assembled per `mode`. Empty for errors that are
    /// not validation failures.
    pub fn messages(&self, mode: ReturnMode) -> Vec<String> {
        match self {
            VetError::Failed { name, messages } => render(messages, name, mode),
            _ => Vec::new(),
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, VetError::Failed { .. })
    }
}

fn full_message(name: &str, messages: &[String]) -> String {
    render(messages, name, ReturnMode::Full).join("\n")
}

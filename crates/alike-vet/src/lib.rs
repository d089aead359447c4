//! Argument validation built on structural comparison.
//!
//! A [`Check`] combines templates, which the value must be alike, and
//! predicates, which must return `TRUE`, with AND/OR. Failures are
//! collected as messages naming the offending argument.

pub mod check;
pub mod error;
pub mod eval;
pub mod outcome;
pub mod render;

pub use check::{Check, Predicate, TestFn};
pub use error::VetError;
pub use eval::{vet, Vetter};
pub use outcome::PredicateOutcome;
pub use render::{render, ReturnMode};

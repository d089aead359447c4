//! Structural compatibility checking.
//!
//! `alike(target, current)` decides whether `current` has the same shape as
//! a `target` template and, if not, describes the most relevant difference
//! together with the accessor path that reaches it.

pub mod alike;
pub mod attr;
pub mod error;
pub mod guard;
pub mod lang;
pub mod mapping;
pub mod path;
pub mod priority;
pub mod result;
pub mod settings;

pub use alike::{alike, Alike};
pub use attr::class_mismatch;
pub use error::{AlikeError, AlikeResult, ErrorKind};
pub use guard::{LimitExceeded, RecursionGuard, Visit};
pub use mapping::{Binding, HashMapping, Mark, Slot};
pub use path::{DiagnosticPath, Segment};
pub use priority::{Priority, PrioritySlots};
pub use result::{truncate, Comparison, Description, Mismatch, DEFAULT_NAME};
pub use settings::{AttrMode, Settings};

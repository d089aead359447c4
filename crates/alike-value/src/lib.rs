//! Value model for structural comparison.

pub mod deparse;
pub mod scope;
pub mod symbol;
pub mod value;

pub use deparse::{deparse, format_name, format_real, quote_str};
pub use scope::{Scope, ScopeArena, ScopeError, ScopeId};
pub use symbol::{init, is_syntactic, AttrKind, Symbol};
pub use value::{
    Arg, Attributes, Closure, Complex, Data, Formal, Lang, Mode, Opaque, OpaqueKind, Value,
};

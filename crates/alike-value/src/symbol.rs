//! Interned names and the table of well-known attribute names.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

/// An interned name.
///
/// Cloning is a reference count bump; equality compares the text.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(Arc<str>);

impl Symbol {
    /// Create a symbol from a name.
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(Arc::from(name.as_ref()))
    }

    /// The symbol's name.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The well-known attribute this symbol names, if any.
    pub fn attr_kind(&self) -> AttrKind {
        AttrKind::of(self.as_str())
    }

    /// Whether the name can be written bare in an accessor like `x$name`.
    pub fn is_syntactic(&self) -> bool {
        is_syntactic(self.as_str())
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "`{}`", self.0)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Symbol {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Symbol {
    fn from(name: String) -> Self {
        Self(Arc::from(name))
    }
}

impl Borrow<str> for Symbol {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Attributes with dedicated comparison rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttrKind {
    Class,
    Dim,
    DimNames,
    Names,
    RowNames,
    Levels,
    Tsp,
    /// Source references; skipped outside strict mode.
    SrcRef,
    /// Anything else.
    Other,
}

impl AttrKind {
    /// Name of the attribute as stored on values.
    pub fn name(self) -> &'static str {
        match self {
            AttrKind::Class => "class",
            AttrKind::Dim => "dim",
            AttrKind::DimNames => "dimnames",
            AttrKind::Names => "names",
            AttrKind::RowNames => "row.names",
            AttrKind::Levels => "levels",
            AttrKind::Tsp => "tsp",
            AttrKind::SrcRef => "srcref",
            AttrKind::Other => "",
        }
    }

    /// Whether the attribute has a dedicated accessor function, i.e. failures
    /// are shown as `names(x)` rather than `attr(x, "names")`.
    pub fn has_accessor(self) -> bool {
        !matches!(self, AttrKind::SrcRef | AttrKind::Other)
    }

    fn of(name: &str) -> Self {
        known_attrs().get(name).copied().unwrap_or(AttrKind::Other)
    }
}

static KNOWN_ATTRS: OnceLock<HashMap<&'static str, AttrKind>> = OnceLock::new();

fn known_attrs() -> &'static HashMap<&'static str, AttrKind> {
    KNOWN_ATTRS.get_or_init(|| {
        [
            AttrKind::Class,
            AttrKind::Dim,
            AttrKind::DimNames,
            AttrKind::Names,
            AttrKind::RowNames,
            AttrKind::Levels,
            AttrKind::Tsp,
            AttrKind::SrcRef,
        ]
        .into_iter()
        .map(|kind| (kind.name(), kind))
        .collect()
    })
}

/// Build the process-wide attribute table eagerly.
///
/// Lookups initialise it lazily anyway; hosts that want the cost paid up
/// front call this once at startup. The table is never mutated afterwards.
pub fn init() {
    known_attrs();
}

/// Whether `name` is a syntactically valid bare name.
pub fn is_syntactic(name: &str) -> bool {
    const RESERVED: &[&str] = &[
        "if", "else", "repeat", "while", "function", "for", "next", "break", "TRUE", "FALSE",
        "NULL", "Inf", "NaN", "NA", "in",
    ];
    let mut chars = name.chars();
    let valid_start = match chars.next() {
        Some(c) if c.is_alphabetic() => true,
        Some('.') => !name[1..].starts_with(|c: char| c.is_ascii_digit()),
        _ => false,
    };
    valid_start
        && chars.all(|c| c.is_alphanumeric() || c == '.' || c == '_')
        && !RESERVED.contains(&name)
}

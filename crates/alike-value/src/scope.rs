//! Arena of scopes.
//!
//! Scopes may refer to themselves through their bindings or their enclosing
//! chain, so values hold a `ScopeId` and all scope data lives here.

use crate::symbol::Symbol;
use crate::value::Value;
use std::fmt;
use thiserror::Error;

/// Identity of a scope inside a `ScopeArena`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeId(u32);

impl ScopeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<environment #{}>", self.0)
    }
}

/// Errors raised when manipulating the arena.
#[derive(Debug, Error, PartialEq)]
pub enum ScopeError {
    #[error("unknown scope {0}")]
    UnknownScope(ScopeId),
}

/// A mapping of names to values with an optional enclosing scope.
#[derive(Debug, Clone, Default)]
pub struct Scope {
    bindings: Vec<(Symbol, Value)>,
    enclosing: Option<ScopeId>,
}

impl Scope {
    /// Look up a name among this scope's own bindings.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.bindings
            .iter()
            .find(|(sym, _)| sym.as_str() == name)
            .map(|(_, v)| v)
    }

    /// Bindings in insertion order.
    pub fn bindings(&self) -> impl Iterator<Item = (&Symbol, &Value)> {
        self.bindings.iter().map(|(s, v)| (s, v))
    }

    pub fn enclosing(&self) -> Option<ScopeId> {
        self.enclosing
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

/// Owner of every scope referenced by values in one comparison.
#[derive(Debug, Clone, Default)]
pub struct ScopeArena {
    scopes: Vec<Scope>,
}

impl ScopeArena {
    pub fn new() -> Self {
        Self { scopes: Vec::new() }
    }

    /// Allocate an empty scope.
    pub fn alloc(&mut self, enclosing: Option<ScopeId>) -> ScopeId {
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(Scope {
            bindings: Vec::new(),
            enclosing,
        });
        id
    }

    pub fn get(&self, id: ScopeId) -> Option<&Scope> {
        self.scopes.get(id.index())
    }

    /// Bind `name` in scope `id`, replacing an existing binding.
    pub fn bind(
        &mut self,
        id: ScopeId,
        name: impl Into<Symbol>,
        value: Value,
    ) -> Result<(), ScopeError> {
        let scope = self
            .scopes
            .get_mut(id.index())
            .ok_or(ScopeError::UnknownScope(id))?;
        let name = name.into();
        match scope.bindings.iter_mut().find(|(sym, _)| *sym == name) {
            Some(slot) => slot.1 = value,
            None => scope.bindings.push((name, value)),
        }
        Ok(())
    }

    /// Look up `name` starting at `id` and walking enclosing scopes.
    pub fn lookup(&self, id: ScopeId, name: &str) -> Option<&Value> {
        let mut next = Some(id);
        let mut hops = 0;
        while let Some(cur) = next {
            let scope = self.get(cur)?;
            if let Some(v) = scope.get(name) {
                return Some(v);
            }
            next = scope.enclosing;
            hops += 1;
            if hops > self.scopes.len() {
                // enclosing chain loops back on itself
                return None;
            }
        }
        None
    }

    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }
}

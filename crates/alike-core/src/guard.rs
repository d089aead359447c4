//! Recursion bookkeeping.
//!
//! Tracks scope pairs under comparison so cyclic scope graphs terminate,
//! bounds overall nesting depth, and records whether the comparator is
//! inside an attribute value.

use alike_value::ScopeId;
use std::fmt;
use tracing::debug;

/// Result of entering a scope pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visit {
    /// First visit; the pair was pushed and must be popped with `exit`.
    Fresh,
    /// The pair is already being compared further up; treat as alike.
    Seen,
}

/// A guard limit was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LimitExceeded {
    pub what: &'static str,
    pub limit: usize,
}

impl fmt::Display for LimitExceeded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} limit of {} exceeded", self.what, self.limit)
    }
}

#[derive(Debug, Clone)]
pub struct RecursionGuard {
    scopes: Vec<(ScopeId, ScopeId)>,
    env_limit: usize,
    depth: usize,
    max_depth: usize,
    attr_depth: usize,
}

impl RecursionGuard {
    pub fn new(max_depth: usize, env_limit: usize) -> Self {
        Self {
            scopes: Vec::new(),
            env_limit,
            depth: 0,
            max_depth,
            attr_depth: 0,
        }
    }

    // === Scopes ===

    /// Enter a (target, current) scope pair.
    pub fn enter(&mut self, target: ScopeId, current: ScopeId) -> Result<Visit, LimitExceeded> {
        if self.scopes.contains(&(target, current)) {
            return Ok(Visit::Seen);
        }
        if self.scopes.len() >= self.env_limit {
            debug!(limit = self.env_limit, "scope stack full");
            return Err(LimitExceeded {
                what: "environment",
                limit: self.env_limit,
            });
        }
        self.scopes.push((target, current));
        Ok(Visit::Fresh)
    }

    /// Leave the most recently entered scope pair.
    pub fn exit(&mut self) {
        self.scopes.pop();
    }

    pub fn scope_depth(&self) -> usize {
        self.scopes.len()
    }

    // === Depth ===

    pub fn descend(&mut self) -> Result<(), LimitExceeded> {
        if self.depth >= self.max_depth {
            debug!(limit = self.max_depth, "recursion depth exhausted");
            return Err(LimitExceeded {
                what: "recursion depth",
                limit: self.max_depth,
            });
        }
        self.depth += 1;
        Ok(())
    }

    pub fn ascend(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    // === Attribute context ===

    pub fn enter_attr(&mut self) {
        self.attr_depth += 1;
    }

    pub fn exit_attr(&mut self) {
        self.attr_depth = self.attr_depth.saturating_sub(1);
    }

    /// Whether the comparator is inside an attribute value, where scopes and
    /// opaque handles only need to agree on type.
    pub fn in_attr(&self) -> bool {
        self.attr_depth > 0
    }

    /// Whether every enter has been matched by an exit.
    pub fn is_clear(&self) -> bool {
        self.scopes.is_empty() && self.depth == 0 && self.attr_depth == 0
    }
}

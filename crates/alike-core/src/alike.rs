//! Structural comparison of values.
//!
//! `current` is alike `target` when it has the same shape: compatible type,
//! compatible length, recursively alike elements and alike attributes. Zero
//! length and `NULL` in the target act as wildcards.

use crate::error::{AlikeError, AlikeResult, ErrorKind};
use crate::guard::{LimitExceeded, RecursionGuard, Visit};
use crate::mapping::HashMapping;
use crate::path::Segment;
use crate::result::{Comparison, Description, Mismatch};
use crate::settings::Settings;
use alike_value::{Closure, Data, Formal, Mode, ScopeArena, ScopeId, Value};
use tracing::debug;

/// Compare `current` against `target`.
///
/// Validates `settings`, runs one comparison with fresh state, and checks
/// that all recursion bookkeeping was unwound.
pub fn alike(
    target: &Value,
    current: &Value,
    scopes: &ScopeArena,
    settings: &Settings,
) -> AlikeResult<Comparison> {
    settings.validate()?;
    let mut ctx = Alike::new(scopes, settings);
    ctx.compare(target, current)
}

/// Comparison context.
///
/// Holds the state one top-level comparison needs: the symbol mapping used
/// by expression comparison and the recursion guard. A context may be reused
/// for several comparisons; every public entry point leaves it clean.
pub struct Alike<'a> {
    pub(crate) scopes: &'a ScopeArena,
    pub(crate) settings: &'a Settings,
    pub(crate) guard: RecursionGuard,
    pub(crate) mapping: HashMapping,
}

impl<'a> Alike<'a> {
    pub fn new(scopes: &'a ScopeArena, settings: &'a Settings) -> Self {
        Self {
            scopes,
            settings,
            guard: RecursionGuard::new(settings.max_depth, settings.env_limit),
            mapping: HashMapping::new(),
        }
    }

    pub fn settings(&self) -> &Settings {
        self.settings
    }

    pub fn guard(&self) -> &RecursionGuard {
        &self.guard
    }

    pub fn mapping(&self) -> &HashMapping {
        &self.mapping
    }

    /// Compare two values.
    pub fn compare(&mut self, target: &Value, current: &Value) -> AlikeResult<Comparison> {
        debug!(
            target = target.type_name(),
            current = current.type_name(),
            mode = ?self.settings.attr_mode,
            "comparing"
        );
        let result = self.alike_rec(target, current);
        self.finish()?;
        let result = result?;
        if let Some(m) = result.mismatch() {
            debug!(kind = %m.kind, priority = ?m.priority, "not alike");
        }
        Ok(result)
    }

    /// Check that a top-level comparison left no state behind.
    pub(crate) fn finish(&mut self) -> AlikeResult<()> {
        if !self.guard.is_clear() {
            return Err(AlikeError::InvariantViolation(format!(
                "recursion guard not unwound: {} scope pairs, depth {}",
                self.guard.scope_depth(),
                self.guard.depth()
            )));
        }
        Ok(())
    }

    /// Recursive entry point; every nested comparison goes through here.
    pub(crate) fn alike_rec(&mut self, target: &Value, current: &Value) -> AlikeResult<Comparison> {
        if let Err(limit) = self.guard.descend() {
            return Ok(Comparison::fail(limit_mismatch(limit)));
        }
        let result = self.alike_node(target, current);
        self.guard.ascend();
        result
    }

    fn alike_node(&mut self, target: &Value, current: &Value) -> AlikeResult<Comparison> {
        let strict = self.settings.is_strict();
        if target.is_null() && (!strict || current.is_null()) {
            return Ok(Comparison::ok());
        }
        if self.guard.in_attr() && is_reference(target) {
            return Ok(match self.type_mismatch(target, current) {
                Some(m) => Comparison::fail(m),
                None => Comparison::ok(),
            });
        }
        if let Some(m) = self.type_mismatch(target, current) {
            return Ok(Comparison::fail(m));
        }
        if let Some(m) = self.length_mismatch(target, current) {
            return Ok(Comparison::fail(m));
        }

        let content = match (&target.data, &current.data) {
            (Data::List(t), Data::List(c)) => self.list_alike(target, t, c)?,
            (Data::Closure(t), Data::Closure(c)) => self.closure_alike(t, c)?,
            (Data::Scope(t), Data::Scope(c)) => self.scope_alike(*t, *c)?,
            (Data::Symbol(_) | Data::Language(_), _) => self.expr_alike(target, current)?,
            _ => Comparison::ok(),
        };
        if !content.success() {
            return Ok(content);
        }
        self.attributes_alike(target, current)
    }

    // === Type and length ===

    /// Type gate. Numeric types are fuzzy: a double target accepts integers,
    /// and an integer target accepts short integer-like doubles. A scalar
    /// `NA` target accepts any atomic type.
    pub(crate) fn type_mismatch(&self, target: &Value, current: &Value) -> Option<Mismatch> {
        let strict = self.settings.is_strict();
        if !strict && target.is_na_scalar() && current.is_atomic() {
            return None;
        }
        let compatible = match (&target.data, &current.data) {
            (Data::Real(_), Data::Integer(_)) => true,
            (Data::Integer(_), Data::Real(c)) => {
                c.len() <= self.settings.fuzzy_int_max_len && current.is_integer_like()
            }
            (Data::Opaque(t), Data::Opaque(c)) => t.kind == c.kind,
            _ => target.mode() == current.mode(),
        };
        if compatible {
            return None;
        }
        Some(
            Mismatch::new(
                ErrorKind::TypeMismatch,
                Description::new("be", format!("type \"{}\"", type_label(target))),
            )
            .with_current(Description::new("is", format!("\"{}\"", current.type_name()))),
        )
    }

    /// Length gate for vectors and lists. A zero-length target matches any
    /// length outside strict mode.
    fn length_mismatch(&self, target: &Value, current: &Value) -> Option<Mismatch> {
        if !is_sequence(target) {
            return None;
        }
        let (tl, cl) = (target.len(), current.len());
        if tl == cl || (tl == 0 && !self.settings.is_strict()) {
            return None;
        }
        Some(
            Mismatch::new(
                ErrorKind::LengthMismatch,
                Description::new("be", format!("length {}", tl)),
            )
            .with_current(Description::new("is", cl.to_string())),
        )
    }

    // === Lists ===

    fn list_alike(
        &mut self,
        target: &Value,
        items: &[Value],
        current_items: &[Value],
    ) -> AlikeResult<Comparison> {
        let names = target.names();
        for (i, (t, c)) in items.iter().zip(current_items).enumerate() {
            let result = self.alike_rec(t, c)?;
            if !result.success() {
                let segment = match names.and_then(|n| n.get(i)).filter(|n| !n.is_empty()) {
                    Some(name) => Segment::Member(name.as_str().into()),
                    None => Segment::Element(i + 1),
                };
                return Ok(result.wrap(segment));
            }
        }
        Ok(Comparison::ok())
    }

    // === Closures ===

    fn closure_alike(&mut self, target: &Closure, current: &Closure) -> AlikeResult<Comparison> {
        let formals = self.formals_alike(&target.formals, &current.formals)?;
        if !formals.success() {
            return Ok(formals.wrap(Segment::Accessor("formals")));
        }
        if target.body.is_null() {
            return Ok(Comparison::ok());
        }
        let body = self.expr_alike(&target.body, &current.body)?;
        Ok(body.wrap(Segment::Accessor("body")))
    }

    /// Parameter lists match by name and position. `...` in the target
    /// absorbs any parameters the current declares up to its own `...`, and
    /// a trailing target `...` allows extra trailing parameters. An empty
    /// target list matches anything outside strict mode.
    fn formals_alike(&mut self, target: &[Formal], current: &[Formal]) -> AlikeResult<Comparison> {
        if target.is_empty() && !self.settings.is_strict() {
            return Ok(Comparison::ok());
        }
        let mut ci = 0;
        for (ti, formal) in target.iter().enumerate() {
            if formal.is_dots() {
                match current[ci.min(current.len())..].iter().position(Formal::is_dots) {
                    Some(offset) => ci += offset + 1,
                    None => {
                        return Ok(Comparison::fail(Mismatch::new(
                            ErrorKind::SignatureMismatch,
                            Description::new("have", "a `...` argument"),
                        )))
                    }
                }
                continue;
            }
            let Some(other) = current.get(ci) else {
                return Ok(Comparison::fail(
                    Mismatch::new(
                        ErrorKind::SignatureMismatch,
                        Description::new(
                            "have",
                            format!("argument `{}` at position {}", formal.name, ti + 1),
                        ),
                    )
                    .with_current(Description::new("has", "none")),
                ));
            };
            if other.name != formal.name {
                return Ok(Comparison::fail(
                    Mismatch::new(
                        ErrorKind::SignatureMismatch,
                        Description::new(
                            "have",
                            format!("argument `{}` at position {}", formal.name, ti + 1),
                        ),
                    )
                    .with_current(Description::new("has", format!("`{}`", other.name))),
                ));
            }
            if let Some(default) = &formal.default {
                let Some(current_default) = &other.default else {
                    return Ok(Comparison::fail(Mismatch::new(
                        ErrorKind::SignatureMismatch,
                        Description::new(
                            "have",
                            format!("a default value for argument `{}`", formal.name),
                        ),
                    )));
                };
                let result = self.alike_rec(default, current_default)?;
                if !result.success() {
                    return Ok(result.wrap(Segment::Member(formal.name.clone())));
                }
            }
            ci += 1;
        }
        let trailing_dots = target.last().is_some_and(Formal::is_dots);
        if let Some(extra) = current.get(ci).filter(|_| !trailing_dots) {
            return Ok(Comparison::fail(Mismatch::new(
                ErrorKind::SignatureMismatch,
                Description::new("not have", format!("argument `{}`", extra.name)),
            )));
        }
        Ok(Comparison::ok())
    }

    // === Scopes ===

    /// Scopes are alike when every target binding exists in the current
    /// scope (its own bindings, not enclosing ones) and is alike. Pairs
    /// already under comparison are treated as alike, which terminates
    /// cycles.
    fn scope_alike(&mut self, target: ScopeId, current: ScopeId) -> AlikeResult<Comparison> {
        if target == current {
            return Ok(Comparison::ok());
        }
        match self.guard.enter(target, current) {
            Err(limit) => return Ok(Comparison::fail(limit_mismatch(limit))),
            Ok(Visit::Seen) => return Ok(Comparison::ok()),
            Ok(Visit::Fresh) => {}
        }
        let result = self.bindings_alike(target, current);
        self.guard.exit();
        result
    }

    fn bindings_alike(&mut self, target: ScopeId, current: ScopeId) -> AlikeResult<Comparison> {
        let scopes = self.scopes;
        let (Some(t), Some(c)) = (scopes.get(target), scopes.get(current)) else {
            return Err(AlikeError::InvariantViolation(format!(
                "comparison references unknown scope ({} or {})",
                target, current
            )));
        };
        for (name, value) in t.bindings() {
            let Some(other) = c.get(name.as_str()) else {
                return Ok(Comparison::fail(Mismatch::new(
                    ErrorKind::MissingBinding,
                    Description::new("contain", format!("variable `{}`", name)),
                )));
            };
            let result = self.alike_rec(value, other)?;
            if !result.success() {
                return Ok(result.wrap(Segment::Member(name.clone())));
            }
        }
        Ok(Comparison::ok())
    }

    // === Expressions ===

    /// Compare two expressions with their own symbol mapping, discarded
    /// afterwards.
    pub(crate) fn expr_alike(&mut self, target: &Value, current: &Value) -> AlikeResult<Comparison> {
        let mark = self.mapping.checkpoint();
        let result = self.lang_rec(target, current);
        self.mapping.rollback(mark);
        result
    }
}

/// Whether the value is a vector or list, i.e. has a meaningful length.
fn is_sequence(value: &Value) -> bool {
    value.is_atomic() || matches!(value.data, Data::List(_))
}

/// Scopes and opaque handles: compared by identity, not content.
fn is_reference(value: &Value) -> bool {
    matches!(value.data, Data::Scope(_) | Data::Opaque(_))
}

/// Name of the target type as a requirement. A double target asks for
/// "numeric" since integers are accepted.
fn type_label(target: &Value) -> &'static str {
    match target.mode() {
        Mode::Numeric if target.type_name() == "double" => "numeric",
        Mode::Language => "language",
        _ => target.type_name(),
    }
}

pub(crate) fn limit_mismatch(limit: LimitExceeded) -> Mismatch {
    Mismatch::new(
        ErrorKind::RecursionLimitExceeded,
        Description::new("be", format!("comparable within the {}", limit)),
    )
}

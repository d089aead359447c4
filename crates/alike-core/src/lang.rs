//! Structural comparison of expressions.
//!
//! Two expressions are alike when they have the same call structure and
//! their symbols can be consistently renamed into each other. Function names
//! in call heads must match exactly, literals must be equal, and `NULL` in
//! the target matches anything. Commutative binary operators may match with
//! their operands swapped.

use crate::alike::{limit_mismatch, Alike};
use crate::error::{AlikeResult, ErrorKind};
use crate::mapping::Binding;
use crate::path::Segment;
use crate::result::{truncate, Comparison, Description, Mismatch};
use alike_value::{deparse, Arg, Data, Lang, Symbol, Value};
use tracing::trace;

/// Operators whose two operands may appear in either order.
const COMMUTATIVE: &[&str] = &["+", "*", "==", "!=", "&", "|", "&&", "||"];

impl<'a> Alike<'a> {
    /// Compare two expressions.
    ///
    /// Symbol bindings made during the comparison are discarded afterwards,
    /// so consecutive calls are independent.
    pub fn compare_expr(&mut self, target: &Value, current: &Value) -> AlikeResult<Comparison> {
        let result = self.expr_alike(target, current);
        self.finish()?;
        result
    }

    pub(crate) fn lang_rec(&mut self, target: &Value, current: &Value) -> AlikeResult<Comparison> {
        if let Err(limit) = self.guard.descend() {
            return Ok(Comparison::fail(limit_mismatch(limit)));
        }
        let result = self.lang_node(target, current);
        self.guard.ascend();
        result
    }

    fn lang_node(&mut self, target: &Value, current: &Value) -> AlikeResult<Comparison> {
        match (&target.data, &current.data) {
            (Data::Null, _) => Ok(Comparison::ok()),
            (Data::Symbol(t), Data::Symbol(c)) => Ok(self.symbol_alike(t, c).into()),
            (Data::Language(t), Data::Language(c)) => self.call_alike(t, c),
            _ => Ok(self.leaf_mismatch(target, current).into()),
        }
    }

    /// Mismatch between expressions that are not both calls or both symbols.
    /// Kept out of the recursive frames.
    #[inline(never)]
    fn leaf_mismatch(&self, target: &Value, current: &Value) -> Option<Mismatch> {
        let (kind, want) = match &target.data {
            Data::Symbol(_) => (ErrorKind::TypeMismatch, "a symbol".to_string()),
            Data::Language(t) => {
                let head = match t.head_symbol() {
                    Some(name) => format!("`{}`", name),
                    None => self.snippet(&t.head),
                };
                (ErrorKind::TypeMismatch, format!("a call to {}", head))
            }
            _ if target.data == current.data => return None,
            _ => (ErrorKind::ValueMismatch, self.snippet(target)),
        };
        Some(
            Mismatch::new(kind, Description::new("be", want))
                .with_current(Description::new("is", self.snippet(current))),
        )
    }

    fn symbol_alike(&mut self, target: &Symbol, current: &Symbol) -> Option<Mismatch> {
        match self.mapping.bind(target, current) {
            Binding::Fresh(_) | Binding::Consistent(_) => None,
            Binding::Inconsistent { expected } => Some(
                Mismatch::new(
                    ErrorKind::RenamingInconsistent,
                    Description::new("be", format!("`{}`", expected)),
                )
                .with_current(Description::new("is", format!("`{}`", current))),
            ),
            Binding::Taken { taken_by } => Some(Mismatch::new(
                ErrorKind::RenamingInconsistent,
                Description::new(
                    "not be",
                    format!("`{}`, which already stands for `{}`", current, taken_by),
                ),
            )),
        }
    }

    fn call_alike(&mut self, target: &Lang, current: &Lang) -> AlikeResult<Comparison> {
        if let Some(m) = call_shape_mismatch(target, current) {
            return Ok(Comparison::fail(m));
        }
        if target.head_symbol().is_none() || current.head_symbol().is_none() {
            let head = self.lang_rec(&target.head, &current.head)?;
            if !head.success() {
                return Ok(head.wrap(Segment::Element(1)));
            }
        }

        // Function literals nest a new scope of parameter names.
        let is_function = target.head_symbol().is_some_and(|h| h.as_str() == "function");
        if is_function {
            if let Err(limit) = self.guard.descend() {
                return Ok(Comparison::fail(limit_mismatch(limit)));
            }
        }
        let result = self.args_in_either_order(target, current);
        if is_function {
            self.guard.ascend();
        }
        result
    }

    fn args_in_either_order(&mut self, target: &Lang, current: &Lang) -> AlikeResult<Comparison> {
        let mark = self.mapping.checkpoint();
        let direct = self.args_alike(&target.args, &current.args, false)?;
        if direct.success() || !is_commutative(target) {
            return Ok(direct);
        }
        self.mapping.rollback(mark);
        let swapped = self.args_alike(&target.args, &current.args, true)?;
        if swapped.success() {
            trace!(op = ?target.head_symbol(), "operands matched in swapped order");
            return Ok(swapped);
        }
        self.mapping.rollback(mark);
        Ok(direct)
    }

    fn args_alike(&mut self, target: &[Arg], current: &[Arg], swapped: bool) -> AlikeResult<Comparison> {
        let n = target.len();
        for (i, arg) in target.iter().enumerate() {
            let ci = if swapped { n - 1 - i } else { i };
            let result = self.lang_rec(&arg.value, &current[ci].value)?;
            if !result.success() {
                return Ok(result.wrap(Segment::Element(ci + 2)));
            }
        }
        Ok(Comparison::ok())
    }

    /// A value deparsed for a diagnostic, cut to the configured width.
    fn snippet(&self, value: &Value) -> String {
        format!("`{}`", truncate(&deparse(value), self.settings.width))
    }
}

fn is_commutative(call: &Lang) -> bool {
    call.args.len() == 2
        && call.args.iter().all(|a| a.tag.is_none())
        && call
            .head_symbol()
            .is_some_and(|h| COMMUTATIVE.contains(&h.as_str()))
}

/// Differences in head name, arity or argument tags.
#[inline(never)]
fn call_shape_mismatch(target: &Lang, current: &Lang) -> Option<Mismatch> {
    if let (Some(t), Some(c)) = (target.head_symbol(), current.head_symbol()) {
        if t != c {
            return Some(
                Mismatch::new(
                    ErrorKind::ValueMismatch,
                    Description::new("be", format!("a call to `{}`", t)),
                )
                .with_current(Description::new("is", format!("a call to `{}`", c))),
            );
        }
    }
    let (tn, cn) = (target.args.len(), current.args.len());
    if tn != cn {
        return Some(
            Mismatch::new(
                ErrorKind::LengthMismatch,
                Description::new(
                    "have",
                    format!("{} argument{}", tn, if tn == 1 { "" } else { "s" }),
                ),
            )
            .with_current(Description::new("has", cn.to_string())),
        );
    }
    target
        .args
        .iter()
        .zip(&current.args)
        .enumerate()
        .find(|(_, (t, c))| t.tag != c.tag)
        .map(|(i, (t, c))| tag_mismatch(i, t, c))
}

fn tag_mismatch(i: usize, target: &Arg, current: &Arg) -> Mismatch {
    let want = match &target.tag {
        Some(tag) => format!("argument {} named `{}`", i + 1, tag),
        None => format!("argument {} unnamed", i + 1),
    };
    let has = match &current.tag {
        Some(tag) => format!("`{}`", tag),
        None => "no name".to_string(),
    };
    Mismatch::new(ErrorKind::NameMismatch, Description::new("have", want))
        .with_current(Description::new("has", has))
}

#[cfg(test)]
mod tests {
    use crate::alike::Alike;
    use crate::error::ErrorKind;
    use crate::settings::Settings;
    use alike_value::{Arg, ScopeArena, Value};

    fn sym(s: &str) -> Value {
        Value::symbol(s)
    }

    fn call(f: &str, args: Vec<Value>) -> Value {
        Value::call_fn(f, args)
    }

    fn compare(target: &Value, current: &Value) -> Option<ErrorKind> {
        let scopes = ScopeArena::new();
        let settings = Settings::default();
        let mut ctx = Alike::new(&scopes, &settings);
        let result = ctx.compare_expr(target, current).expect("comparison runs");
        assert!(ctx.mapping().is_empty());
        result.kind()
    }

    #[test]
    fn test_consistent_renaming() {
        let target = call("f", vec![sym("a"), sym("b"), sym("a")]);
        let renamed = call("f", vec![sym("x"), sym("y"), sym("x")]);
        assert_eq!(compare(&target, &renamed), None);

        let clash = call("f", vec![sym("x"), sym("y"), sym("y")]);
        assert_eq!(compare(&target, &clash), Some(ErrorKind::RenamingInconsistent));

        // two target symbols cannot both map to x
        let merged = call("f", vec![sym("x"), sym("x"), sym("x")]);
        assert_eq!(compare(&target, &merged), Some(ErrorKind::RenamingInconsistent));
    }

    #[test]
    fn test_heads_must_match() {
        let target = call("f", vec![sym("a")]);
        let other = call("g", vec![sym("a")]);
        assert_eq!(compare(&target, &other), Some(ErrorKind::ValueMismatch));
    }

    #[test]
    fn test_literals_and_null() {
        let target = call("f", vec![sym("a"), Value::real([1.0])]);
        assert_eq!(compare(&target, &call("f", vec![sym("b"), Value::real([1.0])])), None);
        assert_eq!(
            compare(&target, &call("f", vec![sym("b"), Value::real([2.0])])),
            Some(ErrorKind::ValueMismatch)
        );
        let wildcard = call("f", vec![Value::null(), Value::null()]);
        assert_eq!(compare(&wildcard, &call("f", vec![sym("b"), Value::real([2.0])])), None);
    }

    #[test]
    fn test_arity_and_tags() {
        let target = Value::call(sym("f"), [Arg::named("n", sym("a"))]);
        let untagged = Value::call(sym("f"), [Arg::new(sym("a"))]);
        assert_eq!(compare(&target, &untagged), Some(ErrorKind::NameMismatch));
        let longer = call("f", vec![sym("a"), sym("b")]);
        assert_eq!(compare(&untagged, &longer), Some(ErrorKind::LengthMismatch));
    }

    #[test]
    fn test_commutative_swap() {
        let target = call("+", vec![sym("a"), Value::integer([1])]);
        let swapped = call("+", vec![Value::integer([1]), sym("x")]);
        assert_eq!(compare(&target, &swapped), None);

        let minus = call("-", vec![sym("a"), Value::integer([1])]);
        let swapped_minus = call("-", vec![Value::integer([1]), sym("x")]);
        assert_eq!(compare(&minus, &swapped_minus), Some(ErrorKind::TypeMismatch));
    }

    #[test]
    fn test_swap_rolls_back_failed_bindings() {
        // direct order binds a->x before failing on the literal; the swapped
        // attempt must start from a clean mapping
        let target = call(
            "*",
            vec![
                call("f", vec![sym("a"), Value::integer([1])]),
                call("f", vec![sym("b"), Value::integer([2])]),
            ],
        );
        let current = call(
            "*",
            vec![
                call("f", vec![sym("x"), Value::integer([2])]),
                call("f", vec![sym("y"), Value::integer([1])]),
            ],
        );
        assert_eq!(compare(&target, &current), None);
    }

    #[test]
    fn test_failure_path() {
        let scopes = ScopeArena::new();
        let settings = Settings::default();
        let mut ctx = Alike::new(&scopes, &settings);
        let target = call("f", vec![sym("a"), call("g", vec![sym("a")])]);
        let current = call("f", vec![sym("x"), call("g", vec![sym("y")])]);
        let result = ctx.compare_expr(&target, &current).unwrap();
        assert_eq!(
            result.render("expr", &settings),
            Some("`expr[[3]][[2]]` should be `x` (is `y`)".to_string())
        );
    }
}

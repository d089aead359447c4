//! Deferred diagnostic paths.
//!
//! A failure deep inside a structure is described by the accessor
//! expression that reaches it, e.g. `names(x[[2]])[1]`. The comparator
//! discovers the innermost accessor first and learns the enclosing ones as
//! the recursion unwinds, so each level wraps the path with one more segment
//! that sits closer to the object. Segments are appended to a vector (O(1)
//! amortized) and the expression is only built by `render`, which applies
//! them from the object outwards.

use alike_value::{is_syntactic, quote_str, Symbol};
use smallvec::SmallVec;

/// One accessor step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// `x[[i]]`, 1-based.
    Element(usize),
    /// `x$name`, or `x[["name"]]` for non-syntactic names.
    Member(Symbol),
    /// `x[i]`, 1-based.
    Subset(usize),
    /// `f(x)` for accessor functions such as `names` or `length`.
    Accessor(&'static str),
    /// `attr(x, "name")`.
    Attr(Symbol),
}

impl Segment {
    /// Apply the segment to an expression. `atomic` tells whether `expr`
    /// can take a postfix accessor without parentheses.
    fn apply(&self, expr: &str, atomic: bool) -> String {
        let postfix_base = || {
            if atomic {
                expr.to_string()
            } else {
                format!("({})", expr)
            }
        };
        match self {
            Segment::Element(i) => format!("{}[[{}]]", postfix_base(), i),
            Segment::Member(name) if is_syntactic(name.as_str()) => {
                format!("{}${}", postfix_base(), name)
            }
            Segment::Member(name) => format!("{}[[{}]]", postfix_base(), quote_str(name.as_str())),
            Segment::Subset(i) => format!("{}[{}]", postfix_base(), i),
            Segment::Accessor(f) => format!("{}({})", f, expr),
            Segment::Attr(name) => format!("attr({}, {})", expr, quote_str(name.as_str())),
        }
    }
}

/// Location of a failure relative to the compared object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiagnosticPath {
    /// Innermost segment first; the last one applies to the object itself.
    segments: SmallVec<[Segment; 4]>,
}

impl DiagnosticPath {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap the path in one more accessor, closer to the object.
    pub fn wrap(&mut self, segment: Segment) {
        self.segments.push(segment);
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Segments from the object outwards.
    pub fn segments(&self) -> impl Iterator<Item = &Segment> {
        self.segments.iter().rev()
    }

    /// Build the accessor expression with `base` as the object.
    pub fn render(&self, base: &str) -> String {
        let mut atomic = is_syntactic(base) || base.starts_with('`');
        let mut expr = base.to_string();
        for segment in self.segments.iter().rev() {
            expr = segment.apply(&expr, atomic);
            atomic = true;
        }
        expr
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_path_renders_base() {
        assert_eq!(DiagnosticPath::new().render("x"), "x");
    }

    #[test]
    fn test_wrapping_order() {
        // names mismatch at index 1, inside element 2 of the object
        let mut path = DiagnosticPath::new();
        path.wrap(Segment::Subset(1));
        path.wrap(Segment::Accessor("names"));
        path.wrap(Segment::Element(2));
        assert_eq!(path.render("x"), "names(x[[2]])[1]");
        assert_eq!(path.len(), 3);
    }

    #[test]
    fn test_attr_and_members() {
        let mut path = DiagnosticPath::new();
        path.wrap(Segment::Attr(Symbol::new("units")));
        path.wrap(Segment::Accessor("dimnames"));
        path.wrap(Segment::Member(Symbol::new("a b")));
        path.wrap(Segment::Member(Symbol::new("cfg")));
        assert_eq!(
            path.render("obj"),
            r#"attr(dimnames(obj$cfg[["a b"]]), "units")"#
        );
    }

    #[test]
    fn test_non_syntactic_base_is_parenthesised() {
        let mut path = DiagnosticPath::new();
        path.wrap(Segment::Element(1));
        assert_eq!(path.render("f(y) + 1"), "(f(y) + 1)[[1]]");
        let mut names = DiagnosticPath::new();
        names.wrap(Segment::Accessor("names"));
        assert_eq!(names.render("f(y) + 1"), "names(f(y) + 1)");
    }
}

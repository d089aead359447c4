//! Render values back to source-like text for diagnostics.

use crate::symbol::is_syntactic;
use crate::value::{Arg, Closure, Complex, Data, Lang, Value};
use std::fmt;

/// Deparse a value to a single line of text.
pub fn deparse(value: &Value) -> String {
    let mut printer = Deparser::new();
    printer.print_value(value);
    printer.output
}

/// Format a double the way diagnostics show numbers: whole numbers without a
/// trailing `.0`, non-finite values as `NaN`/`Inf`/`-Inf`.
pub fn format_real(x: f64) -> String {
    if x.is_nan() {
        "NaN".to_string()
    } else if x.is_infinite() {
        if x > 0.0 { "Inf" } else { "-Inf" }.to_string()
    } else if x.fract() == 0.0 && x.abs() < 1e15 {
        format!("{}", x as i64)
    } else {
        format!("{}", x)
    }
}

/// Quote a string literal with escapes.
pub fn quote_str(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// A name as it would be written in source: bare if syntactic, else
/// backquoted.
pub fn format_name(name: &str) -> String {
    if is_syntactic(name) || name == "..." {
        name.to_string()
    } else {
        format!("`{}`", name)
    }
}

/// Binding strength of infix operators; higher binds tighter.
fn infix_precedence(op: &str) -> Option<u8> {
    let prec = match op {
        "^" => 14,
        ":" => 12,
        "*" | "/" => 10,
        "+" | "-" => 9,
        "<" | ">" | "<=" | ">=" | "==" | "!=" => 8,
        "&" | "&&" => 6,
        "|" | "||" => 5,
        "~" => 4,
        "<-" | "<<-" | "=" => 2,
        _ if op.len() > 2 && op.starts_with('%') && op.ends_with('%') => 11,
        _ => return None,
    };
    Some(prec)
}

struct Deparser {
    output: String,
}

impl Deparser {
    fn new() -> Self {
        Self {
            output: String::new(),
        }
    }

    fn write(&mut self, s: &str) {
        self.output.push_str(s);
    }

    fn print_value(&mut self, value: &Value) {
        let names = value.names();
        match &value.data {
            Data::Null => self.write("NULL"),
            Data::Logical(v) => self.print_vector("logical", v, names, |b| match b {
                Some(true) => "TRUE".to_string(),
                Some(false) => "FALSE".to_string(),
                None => "NA".to_string(),
            }),
            Data::Integer(v) => self.print_vector("integer", v, names, |i| format!("{}L", i)),
            Data::Real(v) => self.print_vector("numeric", v, names, |x| format_real(*x)),
            Data::Complex(v) => self.print_vector("complex", v, names, format_complex),
            Data::Character(v) => self.print_vector("character", v, names, |s| quote_str(s)),
            Data::Raw(v) => self.print_vector("raw", v, names, |b| format!("as.raw(0x{:02x})", b)),
            Data::List(items) => {
                self.write("list(");
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        self.write(", ");
                    }
                    if let Some(name) = names.and_then(|n| n.get(i)).filter(|n| !n.is_empty()) {
                        self.write(&format_name(name));
                        self.write(" = ");
                    }
                    self.print_value(item);
                }
                self.write(")");
            }
            Data::Symbol(sym) => self.write(&format_name(sym.as_str())),
            Data::Language(lang) => self.print_lang(lang),
            Data::Closure(closure) => self.print_closure(closure),
            Data::Scope(id) => self.write(&id.to_string()),
            Data::Opaque(o) => self.write(&format!("<{}: {:#x}>", o.kind.type_name(), o.handle)),
        }
    }

    fn print_vector<T>(
        &mut self,
        empty: &str,
        items: &[T],
        names: Option<&[String]>,
        fmt_item: impl Fn(&T) -> String,
    ) {
        if items.is_empty() {
            self.write(&format!("{}(0)", empty));
            return;
        }
        if items.len() == 1 && names.is_none() {
            self.write(&fmt_item(&items[0]));
            return;
        }
        self.write("c(");
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            if let Some(name) = names.and_then(|n| n.get(i)).filter(|n| !n.is_empty()) {
                self.write(&format_name(name));
                self.write(" = ");
            }
            self.write(&fmt_item(item));
        }
        self.write(")");
    }

    fn print_args(&mut self, args: &[Arg]) {
        for (i, arg) in args.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            if let Some(tag) = &arg.tag {
                self.write(&format_name(tag.as_str()));
                self.write(" = ");
            }
            self.print_value(&arg.value);
        }
    }

    /// Print an infix operand, parenthesising it when it binds looser than
    /// the enclosing operator.
    fn print_operand(&mut self, operand: &Value, parent_prec: u8) {
        let needs_parens = match &operand.data {
            Data::Language(inner) => inner
                .head_symbol()
                .filter(|_| inner.args.len() == 2)
                .and_then(|op| infix_precedence(op.as_str()))
                .is_some_and(|prec| prec < parent_prec),
            _ => false,
        };
        if needs_parens {
            self.write("(");
            self.print_value(operand);
            self.write(")");
        } else {
            self.print_value(operand);
        }
    }

    fn print_lang(&mut self, lang: &Lang) {
        let Some(head) = lang.head_symbol() else {
            self.print_value(&lang.head);
            self.write("(");
            self.print_args(&lang.args);
            self.write(")");
            return;
        };
        let op = head.as_str();
        let untagged = lang.args.iter().all(|a| a.tag.is_none());
        match (op, lang.args.as_slice()) {
            (_, [lhs, rhs]) if untagged && infix_precedence(op).is_some() => {
                let prec = infix_precedence(op).unwrap_or(0);
                self.print_operand(&lhs.value, prec);
                if op == "^" || op == ":" {
                    self.write(op);
                } else {
                    self.write(&format!(" {} ", op));
                }
                self.print_operand(&rhs.value, prec + 1);
            }
            ("-" | "+" | "!" | "~", [operand]) if untagged => {
                self.write(op);
                self.print_operand(&operand.value, 13);
            }
            ("$" | "@", [obj, field]) if untagged => {
                self.print_value(&obj.value);
                self.write(op);
                self.print_value(&field.value);
            }
            ("(", [inner]) => {
                self.write("(");
                self.print_value(&inner.value);
                self.write(")");
            }
            ("{", body) => {
                self.write("{");
                for (i, stmt) in body.iter().enumerate() {
                    self.write(if i == 0 { " " } else { "; " });
                    self.print_value(&stmt.value);
                }
                self.write(" }");
            }
            ("[" | "[[", [obj, rest @ ..]) => {
                let close = if op == "[" { "]" } else { "]]" };
                self.print_value(&obj.value);
                self.write(op);
                self.print_args(rest);
                self.write(close);
            }
            _ => {
                self.write(&format_name(op));
                self.write("(");
                self.print_args(&lang.args);
                self.write(")");
            }
        }
    }

    fn print_closure(&mut self, closure: &Closure) {
        self.write("function(");
        for (i, formal) in closure.formals.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            self.write(&format_name(formal.name.as_str()));
            if let Some(default) = &formal.default {
                self.write(" = ");
                self.print_value(default);
            }
        }
        self.write(") ");
        self.print_value(&closure.body);
    }
}

fn format_complex(c: &Complex) -> String {
    let sign = if c.im < 0.0 { "-" } else { "+" };
    format!("{}{}{}i", format_real(c.re), sign, format_real(c.im.abs()))
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&deparse(self))
    }
}

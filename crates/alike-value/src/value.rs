//! Tagged value representation shared by every comparator.
//!
//! A `Value` is a payload (`Data`) plus an ordered attribute list. Sequences
//! own their elements; scopes are referenced by id into a `ScopeArena` so
//! self-referential environments never form ownership cycles.

use crate::scope::ScopeId;
use crate::symbol::{AttrKind, Symbol};
use std::fmt;

/// A complex number.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Complex {
    pub re: f64,
    pub im: f64,
}

impl Complex {
    pub fn new(re: f64, im: f64) -> Self {
        Self { re, im }
    }
}

/// Kinds of externally managed handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpaqueKind {
    /// Compiled code.
    Bytecode,
    /// Foreign pointer.
    ExternalPtr,
    /// Weak reference.
    WeakRef,
}

impl OpaqueKind {
    pub fn type_name(self) -> &'static str {
        match self {
            OpaqueKind::Bytecode => "bytecode",
            OpaqueKind::ExternalPtr => "externalptr",
            OpaqueKind::WeakRef => "weakref",
        }
    }
}

/// An externally managed handle; only its kind takes part in comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Opaque {
    pub kind: OpaqueKind,
    pub handle: u64,
}

/// A call argument slot, optionally tagged.
#[derive(Debug, Clone, PartialEq)]
pub struct Arg {
    pub tag: Option<Symbol>,
    pub value: Value,
}

impl Arg {
    /// An untagged argument.
    pub fn new(value: Value) -> Self {
        Self { tag: None, value }
    }

    /// A tagged argument, `tag = value`.
    pub fn named(tag: impl Into<Symbol>, value: Value) -> Self {
        Self {
            tag: Some(tag.into()),
            value,
        }
    }
}

/// A syntax tree node: a head (symbol or call) applied to arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct Lang {
    pub head: Box<Value>,
    pub args: Vec<Arg>,
}

impl Lang {
    /// The head as a symbol, if it is one.
    pub fn head_symbol(&self) -> Option<&Symbol> {
        match &self.head.data {
            Data::Symbol(s) => Some(s),
            _ => None,
        }
    }
}

/// A function parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Formal {
    pub name: Symbol,
    pub default: Option<Value>,
}

impl Formal {
    pub fn new(name: impl Into<Symbol>) -> Self {
        Self {
            name: name.into(),
            default: None,
        }
    }

    pub fn with_default(name: impl Into<Symbol>, default: Value) -> Self {
        Self {
            name: name.into(),
            default: Some(default),
        }
    }

    /// Whether this is the variadic `...` parameter.
    pub fn is_dots(&self) -> bool {
        self.name.as_str() == "..."
    }
}

/// A function: parameters, a body, and the scope it closes over.
#[derive(Debug, Clone, PartialEq)]
pub struct Closure {
    pub formals: Vec<Formal>,
    pub body: Box<Value>,
    pub env: ScopeId,
}

/// The payload of a value.
#[derive(Debug, Clone, PartialEq)]
pub enum Data {
    Null,
    /// `None` is a missing (`NA`) logical.
    Logical(Vec<Option<bool>>),
    Integer(Vec<i32>),
    Real(Vec<f64>),
    Complex(Vec<Complex>),
    Character(Vec<String>),
    Raw(Vec<u8>),
    List(Vec<Value>),
    Symbol(Symbol),
    Language(Lang),
    Closure(Closure),
    Scope(ScopeId),
    Opaque(Opaque),
}

/// Coarse classification used as the first comparison gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    Null,
    Logical,
    Numeric,
    Complex,
    Character,
    Raw,
    List,
    Function,
    Language,
    Environment,
    Opaque,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Mode::Null => "NULL",
            Mode::Logical => "logical",
            Mode::Numeric => "numeric",
            Mode::Complex => "complex",
            Mode::Character => "character",
            Mode::Raw => "raw",
            Mode::List => "list",
            Mode::Function => "function",
            Mode::Language => "language",
            Mode::Environment => "environment",
            Mode::Opaque => "opaque",
        };
        f.write_str(name)
    }
}

/// Ordered `Symbol -> Value` association list.
///
/// Order carries no meaning for comparisons but keeps iteration, and
/// therefore diagnostics, deterministic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attributes(Vec<(Symbol, Value)>);

impl Attributes {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0
            .iter()
            .find(|(sym, _)| sym.as_str() == name)
            .map(|(_, v)| v)
    }

    pub fn get_kind(&self, kind: AttrKind) -> Option<&Value> {
        self.get(kind.name())
    }

    /// Set an attribute, replacing an existing one in place. Setting `NULL`
    /// removes the attribute.
    pub fn set(&mut self, name: impl Into<Symbol>, value: Value) {
        let name = name.into();
        if value.is_null() {
            self.remove(name.as_str());
            return;
        }
        match self.0.iter_mut().find(|(sym, _)| *sym == name) {
            Some(slot) => slot.1 = value,
            None => self.0.push((name, value)),
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        let pos = self.0.iter().position(|(sym, _)| sym.as_str() == name)?;
        Some(self.0.remove(pos).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Symbol, &Value)> {
        self.0.iter().map(|(s, v)| (s, v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A comparable value.
#[derive(Debug, Clone, PartialEq)]
pub struct Value {
    pub data: Data,
    pub attrs: Attributes,
}

impl From<Data> for Value {
    fn from(data: Data) -> Self {
        Self {
            data,
            attrs: Attributes::new(),
        }
    }
}

// === Constructors ===

impl Value {
    pub fn null() -> Self {
        Data::Null.into()
    }

    pub fn logical(values: impl IntoIterator<Item = bool>) -> Self {
        Data::Logical(values.into_iter().map(Some).collect()).into()
    }

    /// A length-one logical `NA`.
    pub fn na() -> Self {
        Data::Logical(vec![None]).into()
    }

    pub fn integer(values: impl IntoIterator<Item = i32>) -> Self {
        Data::Integer(values.into_iter().collect()).into()
    }

    pub fn real(values: impl IntoIterator<Item = f64>) -> Self {
        Data::Real(values.into_iter().collect()).into()
    }

    pub fn complex(values: impl IntoIterator<Item = Complex>) -> Self {
        Data::Complex(values.into_iter().collect()).into()
    }

    pub fn character<S: Into<String>>(values: impl IntoIterator<Item = S>) -> Self {
        Data::Character(values.into_iter().map(Into::into).collect()).into()
    }

    pub fn raw(values: impl IntoIterator<Item = u8>) -> Self {
        Data::Raw(values.into_iter().collect()).into()
    }

    pub fn list(values: impl IntoIterator<Item = Value>) -> Self {
        Data::List(values.into_iter().collect()).into()
    }

    /// A list with a `names` attribute.
    pub fn named_list<S: Into<String>>(entries: impl IntoIterator<Item = (S, Value)>) -> Self {
        let (names, values): (Vec<String>, Vec<Value>) =
            entries.into_iter().map(|(k, v)| (k.into(), v)).unzip();
        Value::list(values).with_names(names)
    }

    pub fn symbol(name: impl Into<Symbol>) -> Self {
        Data::Symbol(name.into()).into()
    }

    /// A call `head(args...)`.
    pub fn call(head: Value, args: impl IntoIterator<Item = Arg>) -> Self {
        Data::Language(Lang {
            head: Box::new(head),
            args: args.into_iter().collect(),
        })
        .into()
    }

    /// A call whose head is the symbol `name`, with untagged arguments.
    pub fn call_fn(name: &str, args: impl IntoIterator<Item = Value>) -> Self {
        Value::call(Value::symbol(name), args.into_iter().map(Arg::new))
    }

    pub fn closure(formals: Vec<Formal>, body: Value, env: ScopeId) -> Self {
        Data::Closure(Closure {
            formals,
            body: Box::new(body),
            env,
        })
        .into()
    }

    pub fn scope(id: ScopeId) -> Self {
        Data::Scope(id).into()
    }

    pub fn opaque(kind: OpaqueKind, handle: u64) -> Self {
        Data::Opaque(Opaque { kind, handle }).into()
    }

    // === Attribute builders ===

    pub fn with_attr(mut self, name: impl Into<Symbol>, value: Value) -> Self {
        self.attrs.set(name, value);
        self
    }

    pub fn with_names<S: Into<String>>(self, names: impl IntoIterator<Item = S>) -> Self {
        self.with_attr("names", Value::character(names))
    }

    pub fn with_class<S: Into<String>>(self, class: impl IntoIterator<Item = S>) -> Self {
        self.with_attr("class", Value::character(class))
    }

    pub fn with_dim(self, dim: impl IntoIterator<Item = i32>) -> Self {
        self.with_attr("dim", Value::integer(dim))
    }
}

// === Inspection ===

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self.data, Data::Null)
    }

    /// Whether the value is a homogeneous vector of scalars.
    pub fn is_atomic(&self) -> bool {
        matches!(
            self.data,
            Data::Logical(_)
                | Data::Integer(_)
                | Data::Real(_)
                | Data::Complex(_)
                | Data::Character(_)
                | Data::Raw(_)
        )
    }

    /// Whether the value is a length-one logical `NA`.
    pub fn is_na_scalar(&self) -> bool {
        matches!(&self.data, Data::Logical(v) if v.len() == 1 && v[0].is_none())
    }

    /// Number of elements. Calls count their head; symbols, closures, scopes
    /// and opaque handles have length one.
    pub fn len(&self) -> usize {
        match &self.data {
            Data::Null => 0,
            Data::Logical(v) => v.len(),
            Data::Integer(v) => v.len(),
            Data::Real(v) => v.len(),
            Data::Complex(v) => v.len(),
            Data::Character(v) => v.len(),
            Data::Raw(v) => v.len(),
            Data::List(v) => v.len(),
            Data::Language(l) => l.args.len() + 1,
            Data::Symbol(_) | Data::Closure(_) | Data::Scope(_) | Data::Opaque(_) => 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn attr(&self, name: &str) -> Option<&Value> {
        self.attrs.get(name)
    }

    pub fn mode(&self) -> Mode {
        match &self.data {
            Data::Null => Mode::Null,
            Data::Logical(_) => Mode::Logical,
            Data::Integer(_) | Data::Real(_) => Mode::Numeric,
            Data::Complex(_) => Mode::Complex,
            Data::Character(_) => Mode::Character,
            Data::Raw(_) => Mode::Raw,
            Data::List(_) => Mode::List,
            Data::Symbol(_) | Data::Language(_) => Mode::Language,
            Data::Closure(_) => Mode::Function,
            Data::Scope(_) => Mode::Environment,
            Data::Opaque(_) => Mode::Opaque,
        }
    }

    /// Storage type name, as shown in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match &self.data {
            Data::Null => "NULL",
            Data::Logical(_) => "logical",
            Data::Integer(_) => "integer",
            Data::Real(_) => "double",
            Data::Complex(_) => "complex",
            Data::Character(_) => "character",
            Data::Raw(_) => "raw",
            Data::List(_) => "list",
            Data::Symbol(_) => "symbol",
            Data::Language(_) => "language",
            Data::Closure(_) => "closure",
            Data::Scope(_) => "environment",
            Data::Opaque(o) => o.kind.type_name(),
        }
    }

    /// Character payload, if this is a character vector.
    pub fn as_strings(&self) -> Option<&[String]> {
        match &self.data {
            Data::Character(v) => Some(v),
            _ => None,
        }
    }

    /// Integer payload, if this is an integer vector.
    pub fn as_integers(&self) -> Option<&[i32]> {
        match &self.data {
            Data::Integer(v) => Some(v),
            _ => None,
        }
    }

    /// Real payload, if this is a double vector.
    pub fn as_reals(&self) -> Option<&[f64]> {
        match &self.data {
            Data::Real(v) => Some(v),
            _ => None,
        }
    }

    /// List elements, if this is a list.
    pub fn as_list(&self) -> Option<&[Value]> {
        match &self.data {
            Data::List(v) => Some(v),
            _ => None,
        }
    }

    /// The explicit `names` attribute as strings.
    pub fn names(&self) -> Option<&[String]> {
        self.attr("names").and_then(Value::as_strings)
    }

    /// The class vector: the explicit `class` attribute, or the implicit
    /// class derived from dims and type.
    pub fn class(&self) -> Vec<String> {
        if let Some(class) = self.attr("class").and_then(Value::as_strings) {
            return class.to_vec();
        }
        match self.attr("dim").map(Value::len) {
            Some(2) => return vec!["matrix".into(), "array".into()],
            Some(_) => return vec!["array".into()],
            None => {}
        }
        let implicit = match &self.data {
            Data::Real(_) => "numeric",
            Data::Symbol(_) => "name",
            Data::Language(_) => "call",
            Data::Closure(_) => "function",
            _ => self.type_name(),
        };
        vec![implicit.to_string()]
    }

    /// Whether the values of a double vector are all whole numbers.
    pub fn is_integer_like(&self) -> bool {
        match &self.data {
            Data::Integer(_) => true,
            Data::Real(v) => v
                .iter()
                .all(|x| x.is_finite() && x.fract() == 0.0 && x.abs() <= i32::MAX as f64),
            _ => false,
        }
    }
}

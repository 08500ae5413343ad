//! FILENAME: parser/src/ast.rs
//! PURPOSE: Defines the value domain and expression tree the Parser produces.
//! CONTEXT: The engine crate walks this tree (see `engine::evaluator`) but
//! never mutates it; the AST and the evaluator live in different crates to
//! avoid a parser<->engine circular dependency (the same split the teacher
//! repo uses between `core/parser` and `core/engine`).

use std::cmp::Ordering;
use std::rc::Rc;

/// A cell reference as described in spec §4.4: each axis is either an
/// absolute coordinate or an offset relative to the evaluating frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellRefSpec {
    pub col_absolute: bool,
    pub col_ref: i64,
    pub row_absolute: bool,
    pub row_ref: i64,
}

/// A pair of corner references; the resolver (engine-side) expands this
/// into a concrete rectangle of (col, row) pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellRangeSpec {
    pub start: CellRefSpec,
    pub end: CellRefSpec,
}

/// An opaque handle to a function value. Backwards (the scripting language
/// functions are defined in) is out of scope; this variant only needs to
/// exist so `Value`'s shape matches spec §6.2 and participates in the total
/// order used for dictionary keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FunctionValue(pub Rc<str>);

/// The sum type every expression evaluates to (spec §6.2).
/// `Float` stands in for the externally-supplied arbitrary-precision
/// decimal type ("Fixed", out of scope); `f64` is the stand-in used at this
/// interface boundary.
#[derive(Debug, Clone)]
pub enum Value {
    Float(f64),
    String(Rc<str>),
    Array(Vec<Value>),
    Dictionary(Vec<(Value, Value)>),
    Function(FunctionValue),
    Nil,
    CellRange(CellRangeSpec),
    CellRef(CellRefSpec),
}

impl Value {
    fn rank(&self) -> u8 {
        match self {
            Value::Nil => 0,
            Value::Float(_) => 1,
            Value::String(_) => 2,
            Value::CellRef(_) => 3,
            Value::CellRange(_) => 4,
            Value::Array(_) => 5,
            Value::Dictionary(_) => 6,
            Value::Function(_) => 7,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}
impl Eq for Value {}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Total order over all value kinds (spec §6.2: "a total order over all
/// value kinds defined externally"). Ties within a kind compare contents;
/// ties across kinds fall back to `rank()`. This ordering is this crate's
/// own choice, since the original decides it outside the scope we inherit.
impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Value::Nil, Value::Nil) => Ordering::Equal,
            (Value::Float(a), Value::Float(b)) => a.total_cmp(b),
            (Value::String(a), Value::String(b)) => a.cmp(b),
            (Value::CellRef(a), Value::CellRef(b)) => (a.col_absolute, a.col_ref, a.row_absolute, a.row_ref)
                .cmp(&(b.col_absolute, b.col_ref, b.row_absolute, b.row_ref)),
            (Value::CellRange(a), Value::CellRange(b)) => a.start.cmp(&b.start).then_with(|| a.end.cmp(&b.end)),
            (Value::Array(a), Value::Array(b)) => a.cmp(b),
            (Value::Dictionary(a), Value::Dictionary(b)) => a.cmp(b),
            (Value::Function(a), Value::Function(b)) => a.0.cmp(&b.0),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl Ord for CellRefSpec {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.col_absolute, self.col_ref, self.row_absolute, self.row_ref)
            .cmp(&(other.col_absolute, other.col_ref, other.row_absolute, other.row_ref))
    }
}
impl PartialOrd for CellRefSpec {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Binary operators, listed low-to-high precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Equal,
    NotEqual,
    LessThan,
    GreaterThan,
    LessEqual,
    GreaterEqual,
    Concat,
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Negate,
}

/// Arity category a getter handler is registered under (spec §4.5).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Constant,
    Unary,
    Binary,
    Ternary,
    /// Variable argument count, e.g. SUM/AVERAGE over a range.
    Variadic,
}

/// An opaque handle into a `GetterRegistry`/the engine's matching handler
/// table. The parser never executes a getter — it only resolves the name
/// once, at parse time, and bakes the id into the AST.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GetterId(pub u32);

/// A parsed formula. The parser commits to this shape once; the engine's
/// evaluator walks it without re-parsing.
#[derive(Debug, Clone)]
pub enum Expression {
    Constant(Value),
    CellRef(CellRefSpec),
    CellRange(CellRangeSpec),
    /// An unresolved identifier. Resolved against the `NameMap` at
    /// evaluation time (spec §4.5), not at parse time.
    NamedRef(String),
    Unary {
        op: UnaryOp,
        operand: Box<Expression>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    /// A call to a built-in resolved through the getter registry at parse
    /// time (spec §4.5: "consulted by the parser to resolve identifiers
    /// into built-in calls").
    Call {
        getter: GetterId,
        args: Vec<Expression>,
    },
}

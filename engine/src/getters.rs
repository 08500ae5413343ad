//! FILENAME: engine/src/getters.rs
//! PURPOSE: The engine-side handler table behind the getter registry.
//! CONTEXT: Spec §4.5: "Getter registry: mapping from built-in function
//! name to a handler (constant / unary / binary / ternary; with or without
//! context). Populated before parsing; consulted by the parser to resolve
//! identifiers into built-in calls." `parser::GetterRegistry` only knows
//! names and arities; this table holds the actual callbacks, keyed by the
//! same `GetterId` so a `Call` node resolved by the parser dispatches here
//! without either crate depending on the other (spec §9: "macro-generated
//! built-in function family... replace with a registry keyed by name and
//! arity").
//!
//! The specific built-in set (SUM/AVERAGE/MIN/MAX/ABS/IF/ROW/COLUMN) is this
//! crate's own choice — the original's function library lives in the
//! Backwards scripting surface, out of scope here — chosen to be just
//! enough to exercise ranges, arithmetic coercion, and context-dependent
//! getters end to end.

use std::collections::HashMap;

use parser::{Arity, GetterId, GetterRegistry, Value};

use crate::error::EngineError;
use crate::frame::CallFrame;

pub enum Handler {
    ConstantCtx(fn(&CallFrame) -> Result<Value, EngineError>),
    Unary(fn(Value) -> Result<Value, EngineError>),
    Ternary(fn(Value, Value, Value) -> Result<Value, EngineError>),
    Variadic(fn(&[Value]) -> Result<Value, EngineError>),
}

pub struct GetterTable {
    handlers: HashMap<GetterId, Handler>,
}

impl GetterTable {
    pub fn get(&self, id: GetterId) -> Option<&Handler> {
        self.handlers.get(&id)
    }

    /// Builds the registry the parser consults and the table the engine
    /// dispatches through, in lockstep so their `GetterId`s line up.
    pub fn with_builtins() -> (GetterRegistry, GetterTable) {
        let mut registry = GetterRegistry::new();
        let mut handlers = HashMap::new();
        let mut next_id = 0u32;

        let mut register = |name: &str, arity: Arity, handler: Handler| {
            let id = GetterId(next_id);
            next_id += 1;
            registry.register(name, id, arity);
            handlers.insert(id, handler);
        };

        register("SUM", Arity::Variadic, Handler::Variadic(sum));
        register("AVERAGE", Arity::Variadic, Handler::Variadic(average));
        register("MIN", Arity::Variadic, Handler::Variadic(min));
        register("MAX", Arity::Variadic, Handler::Variadic(max));
        register("ABS", Arity::Unary, Handler::Unary(abs));
        register("IF", Arity::Ternary, Handler::Ternary(if_getter));
        register("ROW", Arity::Constant, Handler::ConstantCtx(row));
        register("COLUMN", Arity::Constant, Handler::ConstantCtx(column));

        (registry, GetterTable { handlers })
    }
}

/// Flattens `Array` values one level (what a `CellRange` evaluates to) and
/// coerces to numbers, skipping `Nil` the way most spreadsheet aggregates
/// skip blank cells.
fn flatten_numbers(args: &[Value]) -> Result<Vec<f64>, EngineError> {
    let mut out = Vec::new();
    for arg in args {
        match arg {
            Value::Array(items) => {
                for item in items {
                    if let Some(n) = as_number_skip_nil(item)? {
                        out.push(n);
                    }
                }
            }
            other => {
                if let Some(n) = as_number_skip_nil(other)? {
                    out.push(n);
                }
            }
        }
    }
    Ok(out)
}

fn as_number_skip_nil(v: &Value) -> Result<Option<f64>, EngineError> {
    match v {
        Value::Nil => Ok(None),
        Value::Float(f) => Ok(Some(*f)),
        other => Err(EngineError::TypeError(format!("expected a number, found {:?}", other))),
    }
}

fn sum(args: &[Value]) -> Result<Value, EngineError> {
    Ok(Value::Float(flatten_numbers(args)?.into_iter().sum()))
}

fn average(args: &[Value]) -> Result<Value, EngineError> {
    let numbers = flatten_numbers(args)?;
    if numbers.is_empty() {
        return Err(EngineError::TypeError("AVERAGE of no values".to_string()));
    }
    Ok(Value::Float(numbers.iter().sum::<f64>() / numbers.len() as f64))
}

fn min(args: &[Value]) -> Result<Value, EngineError> {
    flatten_numbers(args)?
        .into_iter()
        .fold(None, |acc: Option<f64>, n| Some(acc.map_or(n, |a| a.min(n))))
        .map(Value::Float)
        .ok_or_else(|| EngineError::TypeError("MIN of no values".to_string()))
}

fn max(args: &[Value]) -> Result<Value, EngineError> {
    flatten_numbers(args)?
        .into_iter()
        .fold(None, |acc: Option<f64>, n| Some(acc.map_or(n, |a| a.max(n))))
        .map(Value::Float)
        .ok_or_else(|| EngineError::TypeError("MAX of no values".to_string()))
}

fn abs(arg: Value) -> Result<Value, EngineError> {
    match arg {
        Value::Float(f) => Ok(Value::Float(f.abs())),
        other => Err(EngineError::TypeError(format!("ABS expects a number, found {:?}", other))),
    }
}

fn if_getter(cond: Value, then_branch: Value, else_branch: Value) -> Result<Value, EngineError> {
    match cond {
        Value::Float(f) => Ok(if f != 0.0 { then_branch } else { else_branch }),
        other => Err(EngineError::TypeError(format!("IF expects a numeric condition, found {:?}", other))),
    }
}

/// 1-based, matching the A1 display convention (spec §4.4's rows are
/// internally 0-based but "A1-style strings use 1-based row numbering").
fn row(frame: &CallFrame) -> Result<Value, EngineError> {
    Ok(Value::Float((frame.row + 1) as f64))
}

fn column(frame: &CallFrame) -> Result<Value, EngineError> {
    Ok(Value::Float((frame.col + 1) as f64))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sum_flattens_one_level_of_array() {
        let args = vec![Value::Array(vec![Value::Float(1.0), Value::Float(2.0)]), Value::Float(3.0)];
        assert_eq!(sum(&args).unwrap(), Value::Float(6.0));
    }

    #[test]
    fn sum_skips_nil_entries() {
        let args = vec![Value::Array(vec![Value::Float(1.0), Value::Nil, Value::Float(2.0)])];
        assert_eq!(sum(&args).unwrap(), Value::Float(3.0));
    }

    #[test]
    fn average_of_no_values_is_an_error() {
        assert!(average(&[]).is_err());
    }

    #[test]
    fn registry_and_table_agree_on_ids() {
        let (registry, table) = GetterTable::with_builtins();
        let (id, arity) = registry.resolve("SUM").unwrap();
        assert_eq!(arity, Arity::Variadic);
        assert!(table.get(id).is_some());
    }
}

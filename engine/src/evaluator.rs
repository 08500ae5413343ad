//! FILENAME: engine/src/evaluator.rs
//! PURPOSE: Drives evaluation of a single cell and walks its expression
//! tree.
//! CONTEXT: Spec §4.2. Grounded on `Forwards::Engine::SpreadSheet::computeCell`
//! (both overloads) in `original_source/Forwards/src/Parser/SpreadSheet.cpp`.
//! The original's `try`/`catch` epilogue becomes an explicit `Result` here
//! (spec §9); the cycle-detection branch that in the original lives inside
//! `CellRefValue::evaluate` lives in `cell_ref_value` below, at the same
//! point in the protocol.

use std::rc::Rc;

use parser::{parse_full_expression, BinaryOp, Expression, StringLogger, UnaryOp, Value};

use crate::cell::CellType;
use crate::context::CallingContext;
use crate::error::EngineError;
use crate::frame::CallFrame;
use crate::getters::Handler;
use crate::reference;
use crate::sheet::Sheet;

/// The message-returning entry point (spec §4.2, step 9 "message form"):
/// used for interactive single-cell evaluation. Always suppresses
/// propagation; the returned `String` is the first line of any failure.
pub fn compute_cell_message(sheet: &mut Sheet, ctx: &mut CallingContext, col: usize, row: usize) -> (String, Option<Rc<Value>>) {
    match compute_cell(sheet, ctx, col, row, false) {
        Ok(value) => (String::new(), value),
        Err(e) => (e.first_line(), None),
    }
}

/// The rethrow-flag entry point (spec §4.2). `rethrow = false` is what the
/// recalc scheduler uses; `rethrow = true` is what a `CellRef` evaluation
/// uses so a failing precedent's error surfaces to whatever depends on it.
pub fn compute_cell(sheet: &mut Sheet, ctx: &mut CallingContext, col: usize, row: usize, rethrow: bool) -> Result<Option<Rc<Value>>, EngineError> {
    if sheet.get_cell_at(col, row).is_none() {
        return Ok(None);
    }

    // Step 2: memoization check / cycle-breaker for same-generation re-entry.
    {
        let cell = sheet.get_cell_at(col, row).expect("checked above");
        if cell.previous_generation == ctx.generation && cell.previous_value.is_some() {
            return Ok(cell.previous_value.clone());
        }
    }

    // Steps 3-4: LABEL fast path, else parse-on-demand.
    let cell = sheet.get_cell_at(col, row).expect("checked above");
    let mut expr = cell.value.clone();
    if expr.is_none() && cell.cell_type == CellType::Label {
        expr = Some(Rc::new(Expression::Constant(Value::String(Rc::from(cell.current_input.as_str())))));
    }
    if expr.is_none() {
        let mut logger = StringLogger::new();
        let source = cell.current_input.clone();
        let parsed = parse_full_expression(&source, ctx.getters_registry(), &mut logger, col as u64, row as u64);
        if parsed.is_none() {
            // Parse failed: leave the cell unparsed so the next edit can retry.
            return Ok(None);
        }
        expr = parsed.map(Rc::new);
    }
    let expr = expr.expect("populated by one of the three branches above");

    // Step 5: commit the parse, unless this is a user-input (interactive,
    // non-committing) evaluation. LABEL cells are never committed: their
    // synthesised constant is re-derived from `current_input` every time
    // (spec invariant 4), so `current_input` stays the source of truth and
    // is never cleared for a LABEL cell.
    if !ctx.in_user_input && cell.cell_type != CellType::Label {
        let cell = sheet.get_cell_mut(col, row).expect("checked above");
        cell.current_input.clear();
        cell.value = Some(expr.clone());
    }

    // Step 6: push frame, mark in-evaluation.
    ctx.stack.push(CallFrame::new(col, row));
    {
        let cell = sheet.get_cell_mut(col, row).expect("checked above");
        cell.in_evaluation = true;
        cell.recursed = false;
    }

    // Step 7: evaluate.
    let result = eval_expr(sheet, ctx, &expr);

    // Step 8: record outcome, regardless of success or failure. A failure,
    // or a result that is itself empty (e.g. forwarded from a cycle), both
    // leave `previous_value` empty — "empty on failure" per spec §4.2 step 8.
    let value = result.as_ref().ok().cloned().flatten();
    {
        let cell = sheet.get_cell_mut(col, row).expect("checked above");
        cell.in_evaluation = false;
        cell.previous_generation = ctx.generation;
        cell.previous_value = value.clone();
    }
    ctx.stack.pop();

    match result {
        Ok(v) => Ok(v),
        Err(e) if rethrow => Err(e),
        Err(_) => Ok(None),
    }
}

/// Walks one expression node. Cell references re-enter `compute_cell` at
/// step 1; cycle detection (spec §4.2 "Cycle detection") is resolved here,
/// at the point a `CellRef` is about to recurse into an already-evaluating
/// cell.
///
/// Returns `Ok(None)` for "empty" — no exception, just nothing to show —
/// distinct from any concrete `Value` including `Value::Nil`. A bare
/// reference to an empty/cycled-through cell forwards that emptiness
/// untouched (spec §8 scenario 3: a cycle's `previousValue` stays empty,
/// not a stand-in value); an operator or array that *consumes* an operand
/// coerces a missing one to `Value::Nil` at the point of use, via
/// `as_value`.
pub fn eval_expr(sheet: &mut Sheet, ctx: &mut CallingContext, expr: &Expression) -> Result<Option<Rc<Value>>, EngineError> {
    match expr {
        Expression::Constant(v) => Ok(Some(Rc::new(v.clone()))),

        Expression::CellRef(spec) => {
            let (col, row) = reference::resolve_cell_ref(spec, ctx.here())?;
            cell_ref_value(sheet, ctx, col, row)
        }

        Expression::CellRange(spec) => {
            let coords = reference::resolve_cell_range(spec, ctx.here())?;
            let mut values = Vec::with_capacity(coords.len());
            for (col, row) in coords {
                let value = cell_ref_value(sheet, ctx, col, row)?;
                values.push((*as_value(value)).clone());
            }
            Ok(Some(Rc::new(Value::Array(values))))
        }

        Expression::NamedRef(name) => match ctx.names.get(name) {
            Some(bound) => eval_expr(sheet, ctx, &bound),
            None => Err(EngineError::UnknownName(name.clone())),
        },

        Expression::Unary { op, operand } => {
            let value = as_value(eval_expr(sheet, ctx, operand)?);
            apply_unary(*op, &value).map(Some)
        }

        Expression::Binary { op, left, right } => {
            let left = as_value(eval_expr(sheet, ctx, left)?);
            let right = as_value(eval_expr(sheet, ctx, right)?);
            apply_binary(*op, &left, &right).map(Some)
        }

        Expression::Call { getter, args } => call_getter(sheet, ctx, *getter, args).map(Some),
    }
}

/// Coerces a possibly-empty evaluation result to a concrete `Value` for an
/// operator or array element that needs one to consume — the empty-stays-
/// empty rule only applies to a value that bubbles out untouched.
fn as_value(value: Option<Rc<Value>>) -> Rc<Value> {
    value.unwrap_or_else(|| Rc::new(Value::Nil))
}

/// A `CellRef` encountered mid-evaluation. If the target is already on the
/// stack (`in_evaluation`), this is a cycle: mark every frame from the
/// target down to the top as `recursed` and return the target's cached
/// `previousValue` untouched — empty if it has none — without recursing
/// further. Otherwise re-enter the protocol with `rethrow = true`, so a
/// failing precedent propagates to its dependents.
fn cell_ref_value(sheet: &mut Sheet, ctx: &mut CallingContext, col: usize, row: usize) -> Result<Option<Rc<Value>>, EngineError> {
    let in_evaluation = sheet.get_cell_at(col, row).map_or(false, |c| c.in_evaluation);
    if in_evaluation {
        if let Some(idx) = ctx.stack.iter().position(|f| f.col == col && f.row == row) {
            let cycle: Vec<CallFrame> = ctx.stack[idx..].to_vec();
            for frame in cycle {
                if let Some(cell) = sheet.get_cell_mut(frame.col, frame.row) {
                    cell.recursed = true;
                }
            }
        }
        let cached = sheet.get_cell_at(col, row).and_then(|c| c.previous_value.clone());
        return Ok(cached);
    }

    compute_cell(sheet, ctx, col, row, true)
}

fn as_float(v: &Value) -> Result<f64, EngineError> {
    match v {
        Value::Float(f) => Ok(*f),
        other => Err(EngineError::TypeError(format!("expected a number, found {:?}", other))),
    }
}

fn as_text(v: &Value) -> Result<String, EngineError> {
    match v {
        Value::Float(f) => Ok(format!("{}", f)),
        Value::String(s) => Ok(s.to_string()),
        other => Err(EngineError::TypeError(format!("cannot concatenate {:?}", other))),
    }
}

fn apply_unary(op: UnaryOp, operand: &Value) -> Result<Rc<Value>, EngineError> {
    match op {
        UnaryOp::Negate => Ok(Rc::new(Value::Float(-as_float(operand)?))),
    }
}

/// Comparisons use `Value`'s total order directly (spec §6.2: "a total
/// order over all value kinds"), so they're meaningful across mismatched
/// kinds rather than requiring numeric coercion. Arithmetic and
/// concatenation still coerce, since `1 + "2"` isn't well-defined under
/// the ordering alone.
fn apply_binary(op: BinaryOp, left: &Value, right: &Value) -> Result<Rc<Value>, EngineError> {
    let as_bool = |b: bool| Rc::new(Value::Float(if b { 1.0 } else { 0.0 }));
    match op {
        BinaryOp::Equal => Ok(as_bool(left == right)),
        BinaryOp::NotEqual => Ok(as_bool(left != right)),
        BinaryOp::LessThan => Ok(as_bool(left < right)),
        BinaryOp::GreaterThan => Ok(as_bool(left > right)),
        BinaryOp::LessEqual => Ok(as_bool(left <= right)),
        BinaryOp::GreaterEqual => Ok(as_bool(left >= right)),
        BinaryOp::Concat => Ok(Rc::new(Value::String(Rc::from(format!("{}{}", as_text(left)?, as_text(right)?))))),
        BinaryOp::Add => Ok(Rc::new(Value::Float(as_float(left)? + as_float(right)?))),
        BinaryOp::Subtract => Ok(Rc::new(Value::Float(as_float(left)? - as_float(right)?))),
        BinaryOp::Multiply => Ok(Rc::new(Value::Float(as_float(left)? * as_float(right)?))),
        BinaryOp::Divide => {
            let denom = as_float(right)?;
            if denom == 0.0 {
                return Err(EngineError::TypeError("division by zero".to_string()));
            }
            Ok(Rc::new(Value::Float(as_float(left)? / denom)))
        }
        BinaryOp::Power => Ok(Rc::new(Value::Float(as_float(left)?.powf(as_float(right)?)))),
    }
}

fn call_getter(sheet: &mut Sheet, ctx: &mut CallingContext, getter: parser::GetterId, args: &[Expression]) -> Result<Rc<Value>, EngineError> {
    let mut values = Vec::with_capacity(args.len());
    for arg in args {
        let value = eval_expr(sheet, ctx, arg)?;
        values.push((*as_value(value)).clone());
    }

    let handler = ctx
        .getters
        .get(getter)
        .ok_or_else(|| EngineError::Fatal(format!("unregistered getter id {:?}", getter)))?;

    let result = match handler {
        Handler::ConstantCtx(f) => {
            if !values.is_empty() {
                return Err(EngineError::TypeError("expected no arguments".to_string()));
            }
            f(&ctx.here())?
        }
        Handler::Unary(f) => {
            if values.len() != 1 {
                return Err(EngineError::TypeError("expected exactly one argument".to_string()));
            }
            f(values.into_iter().next().unwrap())?
        }
        Handler::Ternary(f) => {
            if values.len() != 3 {
                return Err(EngineError::TypeError("expected exactly three arguments".to_string()));
            }
            let mut it = values.into_iter();
            f(it.next().unwrap(), it.next().unwrap(), it.next().unwrap())?
        }
        Handler::Variadic(f) => f(&values)?,
    };
    Ok(Rc::new(result))
}

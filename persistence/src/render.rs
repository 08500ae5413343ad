//! FILENAME: persistence/src/render.rs
//! PURPOSE: Renders a parsed `Expression` back to formula source text,
//! anchored at the cell that owns it.
//! CONTEXT: Spec §6.3's save format writes `<td>=FORMULA</td>` for a VALUE
//! cell; once a formula has been parsed, `current_input` is cleared (spec
//! invariant 3) so the only source of truth left is the AST. The original
//! covers this with `Expression::toString(col, row)` on every expression
//! node (see the call site in `original_source/OddsAndEnds/SaveFile.cpp`:
//! `cell->value->toString(col, row)`); since this crate keeps the AST as
//! pure data with no methods (parser/engine split, see parser::ast), the
//! renderer lives here instead, as the one place that needs it.
//! Relative references are re-rendered relative to `(col, row)`, which is
//! why the anchor has to be threaded through explicitly rather than baked
//! into the `Expression` once.

use engine::coord::col_index_to_letters;
use parser::{BinaryOp, CellRangeSpec, CellRefSpec, Expression, GetterRegistry, UnaryOp, Value};

pub fn render(expr: &Expression, registry: &GetterRegistry, col: usize, row: usize) -> String {
    match expr {
        Expression::Constant(v) => render_value(v),
        Expression::CellRef(spec) => render_cell_ref(spec, col, row),
        Expression::CellRange(range) => render_cell_range(range, col, row),
        Expression::NamedRef(name) => name.clone(),
        Expression::Unary { op, operand } => {
            let op_text = match op {
                UnaryOp::Negate => "-",
            };
            format!("{}({})", op_text, render(operand, registry, col, row))
        }
        Expression::Binary { op, left, right } => {
            let op_text = match op {
                BinaryOp::Equal => "=",
                BinaryOp::NotEqual => "<>",
                BinaryOp::LessThan => "<",
                BinaryOp::GreaterThan => ">",
                BinaryOp::LessEqual => "<=",
                BinaryOp::GreaterEqual => ">=",
                BinaryOp::Concat => "&",
                BinaryOp::Add => "+",
                BinaryOp::Subtract => "-",
                BinaryOp::Multiply => "*",
                BinaryOp::Divide => "/",
                BinaryOp::Power => "^",
            };
            format!("({} {} {})", render(left, registry, col, row), op_text, render(right, registry, col, row))
        }
        Expression::Call { getter, args } => {
            let name = registry.name_of(*getter).unwrap_or("?");
            let rendered_args: Vec<String> = args.iter().map(|a| render(a, registry, col, row)).collect();
            format!("{}({})", name, rendered_args.join(","))
        }
    }
}

fn render_value(v: &Value) -> String {
    match v {
        Value::Float(f) => format!("{}", f),
        Value::String(s) => format!("\"{}\"", s),
        Value::CellRef(spec) => render_cell_ref(spec, 0, 0),
        Value::CellRange(range) => render_cell_range(range, 0, 0),
        Value::Nil | Value::Array(_) | Value::Dictionary(_) | Value::Function(_) => String::new(),
    }
}

fn render_cell_ref(spec: &CellRefSpec, col: usize, row: usize) -> String {
    let abs_col = if spec.col_absolute { spec.col_ref } else { col as i64 + spec.col_ref };
    let abs_row = if spec.row_absolute { spec.row_ref } else { row as i64 + spec.row_ref };
    let col_text = if abs_col >= 0 { col_index_to_letters(abs_col as u64) } else { "?".to_string() };
    let row_text = if abs_row >= 0 { (abs_row + 1).to_string() } else { "?".to_string() };
    format!(
        "{}{}{}{}",
        if spec.col_absolute { "$" } else { "" },
        col_text,
        if spec.row_absolute { "$" } else { "" },
        row_text
    )
}

fn render_cell_range(range: &CellRangeSpec, col: usize, row: usize) -> String {
    format!("{}:{}", render_cell_ref(&range.start, col, row), render_cell_ref(&range.end, col, row))
}

#[cfg(test)]
mod tests {
    use super::*;
    use parser::GetterId;

    #[test]
    fn renders_a_relative_reference_anchored_at_the_owning_cell() {
        let spec = CellRefSpec { col_absolute: false, col_ref: 1, row_absolute: false, row_ref: -1 };
        assert_eq!(render_cell_ref(&spec, 0, 5), "B5");
    }

    #[test]
    fn renders_an_absolute_reference_with_dollar_signs() {
        let spec = CellRefSpec { col_absolute: true, col_ref: 0, row_absolute: true, row_ref: 0 };
        assert_eq!(render_cell_ref(&spec, 99, 99), "$A$1");
    }

    #[test]
    fn renders_arithmetic_fully_parenthesized() {
        let registry = GetterRegistry::new();
        let expr = Expression::Binary {
            op: BinaryOp::Add,
            left: Box::new(Expression::Constant(Value::Float(1.0))),
            right: Box::new(Expression::Constant(Value::Float(2.0))),
        };
        assert_eq!(render(&expr, &registry, 0, 0), "(1 + 2)");
    }

    #[test]
    fn renders_a_call_by_looking_up_the_registered_name() {
        let mut registry = GetterRegistry::new();
        registry.register("SUM", GetterId(0), parser::Arity::Variadic);
        let expr = Expression::Call { getter: GetterId(0), args: vec![Expression::Constant(Value::Float(1.0))] };
        assert_eq!(render(&expr, &registry, 0, 0), "SUM(1)");
    }
}

//! Formula evaluation. Evaluation happens once, when a formula is entered;
//! the result is cached on the cell and never recomputed afterwards.

use super::parser::{BinOp, Expr};

/// Numeric view of the grid for the evaluator. Blank and non-numeric
/// cells read as 0.
pub trait CellLookup {
    fn get_value(&self, row: usize, col: usize) -> f64;
}

#[derive(Debug, Clone, PartialEq)]
pub enum EvalResult {
    Number(f64),
    Error(String),
}

impl EvalResult {
    /// Display string for a cell. Every failure collapses to the single
    /// "#ERROR" literal, matching what the grid renders.
    pub fn to_display(&self) -> String {
        match self {
            EvalResult::Number(n) => {
                if !n.is_finite() {
                    return "#ERROR".to_string();
                }
                format_number(*n)
            }
            EvalResult::Error(_) => "#ERROR".to_string(),
        }
    }
}

fn format_number(n: f64) -> String {
    if n == n.trunc() && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        let s = format!("{n:.4}");
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

/// Evaluate a parsed expression against the grid.
pub fn evaluate(expr: &Expr, lookup: &dyn CellLookup) -> EvalResult {
    match eval(expr, lookup) {
        Ok(n) => EvalResult::Number(n),
        Err(e) => EvalResult::Error(e),
    }
}

fn eval(expr: &Expr, lookup: &dyn CellLookup) -> Result<f64, String> {
    match expr {
        Expr::Number(n) => Ok(*n),
        Expr::CellRef { row, col } => Ok(lookup.get_value(*row, *col)),
        Expr::Range { .. } => Err("range outside a function".to_string()),
        Expr::Negate(inner) => Ok(-eval(inner, lookup)?),
        Expr::BinaryOp { op, left, right } => {
            let l = eval(left, lookup)?;
            let r = eval(right, lookup)?;
            match op {
                BinOp::Add => Ok(l + r),
                BinOp::Sub => Ok(l - r),
                BinOp::Mul => Ok(l * r),
                BinOp::Div => {
                    if r == 0.0 {
                        Err("division by zero".to_string())
                    } else {
                        Ok(l / r)
                    }
                }
            }
        }
        Expr::Function { name, args } => eval_function(name, args, lookup),
    }
}

/// Flatten function arguments into a list of numbers. Ranges expand
/// row-major; scalar expressions contribute one value each.
fn collect_values(args: &[Expr], lookup: &dyn CellLookup) -> Result<Vec<f64>, String> {
    let mut values = Vec::new();
    for arg in args {
        match arg {
            Expr::Range { start, end } => {
                let (r1, c1) = *start;
                let (r2, c2) = *end;
                let (r1, r2) = (r1.min(r2), r1.max(r2));
                let (c1, c2) = (c1.min(c2), c1.max(c2));
                for row in r1..=r2 {
                    for col in c1..=c2 {
                        values.push(lookup.get_value(row, col));
                    }
                }
            }
            other => values.push(eval(other, lookup)?),
        }
    }
    Ok(values)
}

fn eval_function(name: &str, args: &[Expr], lookup: &dyn CellLookup) -> Result<f64, String> {
    match name {
        "SUM" => Ok(collect_values(args, lookup)?.iter().sum()),
        "AVERAGE" => {
            let values = collect_values(args, lookup)?;
            if values.is_empty() {
                return Err("AVERAGE of nothing".to_string());
            }
            Ok(values.iter().sum::<f64>() / values.len() as f64)
        }
        "MIN" => {
            let values = collect_values(args, lookup)?;
            let min = values.iter().copied().fold(f64::INFINITY, f64::min);
            Ok(if min == f64::INFINITY { 0.0 } else { min })
        }
        "MAX" => {
            let values = collect_values(args, lookup)?;
            let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            Ok(if max == f64::NEG_INFINITY { 0.0 } else { max })
        }
        "COUNT" => Ok(collect_values(args, lookup)?.len() as f64),
        "IF" => {
            if args.len() < 2 || args.len() > 3 {
                return Err("IF takes 2 or 3 arguments".to_string());
            }
            let cond = eval(&args[0], lookup)?;
            if cond != 0.0 {
                eval(&args[1], lookup)
            } else if let Some(else_arg) = args.get(2) {
                eval(else_arg, lookup)
            } else {
                Ok(0.0)
            }
        }
        other => Err(format!("unknown function: {other}")),
    }
}

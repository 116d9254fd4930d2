//! Postfix (reverse Polish) expression evaluation.

use crate::subjects::{ExprError, Stack};

/// Divisors smaller than this are treated as zero.
const DIV_EPS: f64 = 1e-10;

/// Binary operators understood by the evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

impl Operator {
    /// `:` is accepted as an alias for `/`.
    pub fn parse(token: &str) -> Option<Operator> {
        match token {
            "+" => Some(Operator::Add),
            "-" => Some(Operator::Sub),
            "*" => Some(Operator::Mul),
            "/" | ":" => Some(Operator::Div),
            "^" => Some(Operator::Pow),
            _ => None,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Sub => "-",
            Operator::Mul => "*",
            Operator::Div => "/",
            Operator::Pow => "^",
        }
    }

    /// Binding strength for infix conversion.
    pub fn precedence(self) -> u8 {
        match self {
            Operator::Add | Operator::Sub => 1,
            Operator::Mul | Operator::Div => 2,
            Operator::Pow => 3,
        }
    }

    pub fn apply(self, left: f64, right: f64) -> Result<f64, ExprError> {
        Ok(match self {
            Operator::Add => left + right,
            Operator::Sub => left - right,
            Operator::Mul => left * right,
            Operator::Div => {
                if right.abs() < DIV_EPS {
                    return Err(ExprError::DivisionByZero);
                }
                left / right
            }
            Operator::Pow => left.powf(right),
        })
    }
}

/// Evaluate a whitespace-separated postfix expression.
pub fn evaluate(expression: &str) -> Result<f64, ExprError> {
    if expression.trim().is_empty() {
        return Err(ExprError::Empty);
    }

    let mut stack: Stack<f64> = Stack::new();
    for token in expression.split_whitespace() {
        if let Ok(number) = token.parse::<f64>() {
            stack.push(number);
            continue;
        }

        let op = Operator::parse(token).ok_or_else(|| ExprError::UnknownToken(token.to_string()))?;
        let (Some(right), Some(left)) = (stack.pop(), stack.pop()) else {
            return Err(ExprError::MissingOperands {
                operator: op.symbol(),
            });
        };
        stack.push(op.apply(left, right)?);
    }

    match (stack.pop(), stack.len()) {
        (Some(result), 0) => Ok(result),
        (Some(_), rest) => Err(ExprError::LeftoverOperands(rest + 1)),
        (None, _) => Err(ExprError::Empty),
    }
}

//! The operations whose running time is being characterized.
//!
//! - `stack`: a linked-list LIFO stack
//! - `postfix` / `infix`: expression evaluation and conversion on top of it
//! - `ops`: typed stack-operation scripts and their interpreter

pub mod infix;
pub mod ops;
pub mod postfix;
pub mod stack;

pub use infix::to_postfix;
pub use ops::{StackMachine, StackOp, parse_script, write_script};
pub use postfix::{Operator, evaluate};
pub use stack::Stack;

/// Expression parsing / evaluation failures.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ExprError {
    #[error("expression is empty")]
    Empty,

    #[error("unknown token '{0}'")]
    UnknownToken(String),

    #[error("operator '{operator}' needs two operands")]
    MissingOperands { operator: &'static str },

    #[error("division by zero")]
    DivisionByZero,

    #[error("malformed expression: {0} values left on the stack")]
    LeftoverOperands(usize),

    #[error("unbalanced parentheses")]
    UnbalancedParentheses,
}

/// Stack-script parsing failures.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScriptError {
    #[error("unknown operation '{0}'")]
    UnknownOperation(String),

    #[error("invalid push value '{0}'")]
    InvalidPushValue(String),

    #[error("script holds {actual} operations, expected {expected}")]
    LengthMismatch { expected: usize, actual: usize },
}

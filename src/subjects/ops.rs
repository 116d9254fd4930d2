//! Stack-operation scripts.
//!
//! A script is a whitespace-separated list of operations in the wire form
//!
//! ```text
//! 1,<value>   push <value>
//! 2           pop
//! 3           top
//! 4           is-empty
//! 5           print
//! ```
//!
//! The wire form is parsed exactly once, into `StackOp`; everything downstream
//! works on the enum.

use std::fmt;
use std::io::{self, Write};
use std::str::FromStr;

use crate::subjects::{ScriptError, Stack};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackOp {
    Push(i64),
    Pop,
    Top,
    IsEmpty,
    Print,
}

impl fmt::Display for StackOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StackOp::Push(v) => write!(f, "1,{v}"),
            StackOp::Pop => f.write_str("2"),
            StackOp::Top => f.write_str("3"),
            StackOp::IsEmpty => f.write_str("4"),
            StackOp::Print => f.write_str("5"),
        }
    }
}

impl FromStr for StackOp {
    type Err = ScriptError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        match token {
            "2" => Ok(StackOp::Pop),
            "3" => Ok(StackOp::Top),
            "4" => Ok(StackOp::IsEmpty),
            "5" => Ok(StackOp::Print),
            _ => {
                let value = token
                    .strip_prefix("1,")
                    .ok_or_else(|| ScriptError::UnknownOperation(token.to_string()))?;
                value
                    .parse::<i64>()
                    .map(StackOp::Push)
                    .map_err(|_| ScriptError::InvalidPushValue(value.to_string()))
            }
        }
    }
}

/// Parse a whole script.
pub fn parse_script(text: &str) -> Result<Vec<StackOp>, ScriptError> {
    text.split_whitespace().map(str::parse).collect()
}

/// Write a script in wire form (single line, space separated).
pub fn write_script<W: Write>(ops: &[StackOp], mut out: W) -> io::Result<()> {
    for (i, op) in ops.iter().enumerate() {
        if i > 0 {
            out.write_all(b" ")?;
        }
        write!(out, "{op}")?;
    }
    out.flush()
}

/// Executes operations against a `Stack<i64>` and writes a transcript.
///
/// Popping or peeking an empty stack is recorded in the transcript, not
/// treated as an error.
pub struct StackMachine<W: Write> {
    stack: Stack<i64>,
    out: W,
}

impl<W: Write> StackMachine<W> {
    pub fn new(out: W) -> Self {
        Self {
            stack: Stack::new(),
            out,
        }
    }

    pub fn apply(&mut self, op: StackOp) -> io::Result<()> {
        match op {
            StackOp::Push(v) => {
                self.stack.push(v);
                writeln!(self.out, "Push: {v}")
            }
            StackOp::Pop => match self.stack.pop() {
                Some(v) => writeln!(self.out, "Pop: {v}"),
                None => writeln!(self.out, "Pop: stack is empty"),
            },
            StackOp::Top => match self.stack.top() {
                Some(v) => writeln!(self.out, "Top: {v}"),
                None => writeln!(self.out, "Top: stack is empty"),
            },
            StackOp::IsEmpty => writeln!(self.out, "IsEmpty: {}", self.stack.is_empty()),
            StackOp::Print => writeln!(self.out, "Print: {}", self.stack),
        }
    }

    pub fn run(&mut self, ops: &[StackOp]) -> io::Result<()> {
        for &op in ops {
            self.apply(op)?;
        }
        Ok(())
    }

    pub fn stack(&self) -> &Stack<i64> {
        &self.stack
    }

    pub fn into_output(self) -> W {
        self.out
    }
}

//! Infix to postfix conversion (shunting-yard).
//!
//! All operators are treated as left-associative, `^` included, and `-` is
//! always binary.

use crate::subjects::postfix::Operator;
use crate::subjects::{ExprError, Stack};

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(String),
    Op(Operator),
    Open,
    Close,
}

fn tokenize(expression: &str) -> Result<Vec<Token>, ExprError> {
    let mut tokens = Vec::new();
    let mut chars = expression.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '(' => {
                chars.next();
                tokens.push(Token::Open);
            }
            ')' => {
                chars.next();
                tokens.push(Token::Close);
            }
            c if c.is_ascii_digit() || c == '.' => {
                let mut number = String::new();
                while let Some(&d) = chars.peek() {
                    if d.is_ascii_digit() || d == '.' {
                        number.push(d);
                        chars.next();
                    } else {
                        break;
                    }
                }
                if number.parse::<f64>().is_err() {
                    return Err(ExprError::UnknownToken(number));
                }
                tokens.push(Token::Number(number));
            }
            c => {
                let symbol = c.to_string();
                let op = Operator::parse(&symbol).ok_or(ExprError::UnknownToken(symbol))?;
                chars.next();
                tokens.push(Token::Op(op));
            }
        }
    }

    Ok(tokens)
}

/// Convert an infix expression to space-separated postfix.
pub fn to_postfix(expression: &str) -> Result<String, ExprError> {
    let tokens = tokenize(expression)?;
    if tokens.is_empty() {
        return Err(ExprError::Empty);
    }

    let mut ops: Stack<Token> = Stack::new();
    let mut output: Vec<String> = Vec::with_capacity(tokens.len());

    for token in tokens {
        match token {
            Token::Number(n) => output.push(n),
            Token::Op(op) => {
                while let Some(Token::Op(top)) = ops.top() {
                    if top.precedence() < op.precedence() {
                        break;
                    }
                    output.push(top.symbol().to_string());
                    ops.pop();
                }
                ops.push(Token::Op(op));
            }
            Token::Open => ops.push(Token::Open),
            Token::Close => loop {
                match ops.pop() {
                    Some(Token::Op(op)) => output.push(op.symbol().to_string()),
                    Some(Token::Open) => break,
                    _ => return Err(ExprError::UnbalancedParentheses),
                }
            },
        }
    }

    while let Some(token) = ops.pop() {
        match token {
            Token::Op(op) => output.push(op.symbol().to_string()),
            _ => return Err(ExprError::UnbalancedParentheses),
        }
    }

    Ok(output.join(" "))
}

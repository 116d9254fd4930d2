//! Seeded generation of postfix expressions and stack-operation scripts.
//!
//! Generators never own a random source; callers pass an explicit `StdRng` so
//! the same `(seed, size, trial)` always produces the same input, even when
//! sizes are swept on different threads.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use rand::prelude::*;
use rand::rngs::StdRng;

use crate::subjects::StackOp;

/// Smallest well-formed binary expression: `a b op`.
const MIN_POSTFIX_TOKENS: usize = 3;

/// Operand range for generated expressions; small values keep `*` chains finite
/// for longer.
const OPERAND_MIN: i64 = 1;
const OPERAND_MAX: i64 = 50;

/// Value range for generated pushes.
const PUSH_MIN: i64 = 1;
const PUSH_MAX: i64 = 99;

/// Derive the generator seed for one trial.
pub fn trial_seed(base_seed: u64, size: usize, trial: usize) -> u64 {
    let mut hasher = DefaultHasher::new();
    base_seed.hash(&mut hasher);
    size.hash(&mut hasher);
    trial.hash(&mut hasher);
    hasher.finish()
}

/// A fresh generator for one trial.
pub fn trial_rng(base_seed: u64, size: usize, trial: usize) -> StdRng {
    StdRng::seed_from_u64(trial_seed(base_seed, size, trial))
}

/// Operators to draw from for an expression of `tokens` tokens.
///
/// Long expressions avoid `-` and `/` so that an intermediate zero divisor
/// becomes unlikely; `+` is over-represented in the middle band for the same
/// reason.
fn operator_pool(tokens: usize) -> &'static [&'static str] {
    if tokens > 1000 {
        &["+", "*"]
    } else if tokens > 100 {
        &["+", "*", "+", "-", "*", "+"]
    } else {
        &["+", "-", "*", "/"]
    }
}

/// Generate a valid postfix expression with roughly `size` tokens.
///
/// The token count is rounded up to the next odd number (at least 3): a binary
/// postfix expression always has one more operand than operators. All
/// operands come first, followed by all operators.
pub fn generate_postfix(size: usize, rng: &mut StdRng) -> String {
    let tokens = (if size % 2 == 0 { size + 1 } else { size }).max(MIN_POSTFIX_TOKENS);
    let operators = (tokens - 1) / 2;
    let operands = operators + 1;

    let pool = operator_pool(tokens);
    let mut out = String::with_capacity(tokens * 3);

    for i in 0..operands {
        if i > 0 {
            out.push(' ');
        }
        out.push_str(&rng.gen_range(OPERAND_MIN..=OPERAND_MAX).to_string());
    }
    for _ in 0..operators {
        out.push(' ');
        // `pool` is never empty.
        out.push_str(pool.choose(rng).copied().unwrap_or("+"));
    }

    out
}

/// Generate `count` stack operations.
///
/// Mix: push 60% (always when the tracked stack is empty), pop 20%, top 10%,
/// is-empty 5%, print 5%.
pub fn generate_stack_script(count: usize, rng: &mut StdRng) -> Vec<StackOp> {
    let mut ops = Vec::with_capacity(count);
    let mut depth = 0usize;

    for _ in 0..count {
        let roll: f64 = rng.r#gen();
        let op = if depth == 0 || roll < 0.6 {
            depth += 1;
            StackOp::Push(rng.gen_range(PUSH_MIN..=PUSH_MAX))
        } else if roll < 0.8 {
            depth -= 1;
            StackOp::Pop
        } else if roll < 0.9 {
            StackOp::Top
        } else if roll < 0.95 {
            StackOp::IsEmpty
        } else {
            StackOp::Print
        };
        ops.push(op);
    }

    ops
}

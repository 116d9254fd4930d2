//! Mathematical utilities: summary statistics and least squares solvers.

pub mod moments;
pub mod ols;

pub use moments::*;
pub use ols::*;

//! Measurement: the subject abstraction and the timing harness.

pub mod harness;
pub mod subject;

pub use harness::*;
pub use subject::*;

//! Growth-rate model implementations.
//!
//! Models are implemented as small, pure functions so that fitting and
//! selection code can stay generic over `ModelKind`.

pub mod model;

pub use model::*;

//! Complexity fitting and classification.
//!
//! Responsibilities:
//!
//! - fit each candidate growth model to a sample set (`fitter`)
//! - select the best model and build theoretical curves (`selection`)

pub mod fitter;
pub mod selection;

pub use fitter::*;
pub use selection::*;

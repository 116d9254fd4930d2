//! Input/output helpers.
//!
//! - sample CSV export (`export`) and ingest (`ingest`)
//! - JSON run report read/write (`report_json`)

pub mod export;
pub mod ingest;
pub mod report_json;

pub use export::*;
pub use ingest::*;
pub use report_json::*;

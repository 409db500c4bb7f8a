//! Shared types and forecast aggregation for WeatherCast
//!
//! Everything in this crate is pure computation over in-memory data, so it
//! can be used by the backend and by tooling without pulling in any I/O.

pub mod aggregation;
pub mod models;
pub mod types;
pub mod validation;

pub use aggregation::*;
pub use models::*;
pub use types::*;
pub use validation::*;

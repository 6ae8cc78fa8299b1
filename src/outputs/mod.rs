//! Output writers for one-shot mode.
//!
//! - [`json`]: writes the aggregated listing as a JSON array

pub mod json;

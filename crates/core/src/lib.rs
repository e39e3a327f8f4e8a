//! Domain logic for the agenda notification engine.
//!
//! This crate has zero internal dependencies so it can be used by the
//! repository layer, the dispatchers, and any future CLI tooling.

pub mod error;
pub mod link;
pub mod message;
pub mod period;
pub mod types;

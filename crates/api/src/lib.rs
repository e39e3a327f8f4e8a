//! Agenda API server library.
//!
//! Exposes config, state, error handling, and routes so integration
//! tests and the binary entrypoint share the same building blocks.
//! The event/user CRUD surface lives in a separate service; this one
//! carries only the notification engine's own endpoints.

pub mod config;
pub mod error;
pub mod router;
pub mod routes;
pub mod state;

//! Taskboard mock API server library.
//!
//! Exposes the mock server for use in tests and offline demos. It speaks
//! the same form-in / JSON-envelope-out contract as the hosted task
//! service, keeping all state in memory.

pub mod config;
pub mod server;
pub mod store;

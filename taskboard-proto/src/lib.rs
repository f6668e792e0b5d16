//! Shared wire model for the Taskboard task API.
//!
//! The remote service speaks JSON responses wrapped in a `status` envelope
//! and accepts form-encoded request bodies. Everything that crosses that
//! boundary is defined here so the client and the mock server agree on it.

pub mod datetime;
pub mod envelope;
pub mod form;
pub mod task;
pub mod user;

//! Vesper API Library Crate
//!
//! The completion gateway: configuration, shared state, the ask handler and
//! routing. The `api` binary is a thin wrapper around this library.

pub mod config;
pub mod handlers;
pub mod models;
pub mod router;
pub mod state;

//! Core types and trait definitions for the Factoid fact store.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

pub mod error;
pub mod fact;
pub mod store;
pub mod telemetry;

pub use error::{Error, Result};

//! Common utilities and types used throughout the paging simulator.
//!
//! Currently this holds the error taxonomy shared by configuration parsing,
//! policy selection, and the simulation lifecycle.

/// Error types and the crate-wide `Result` alias.
pub mod error;

pub use error::{Result, SimError};

//! Common error handling utilities for Folio
//!
//! Process-level error type shared by the server binary and its startup
//! code. Request-level errors live next to the HTTP surface
//! (`folio_server::error::ApiError`); domain crates keep their own
//! `thiserror` enums and are converted at the boundary.
//!
//! # Example
//!
//! ```rust
//! use error_common::{FolioError, Result};
//!
//! fn require(value: &str, flag: &str) -> Result<()> {
//!     if value.trim().is_empty() {
//!         return Err(FolioError::ConfigError(format!("{flag} is not provided")));
//!     }
//!     Ok(())
//! }
//!
//! assert!(require("", "gclientid").is_err());
//! ```

pub mod types;

pub use types::*;

//! Identity records for Folio
//!
//! An [`Identity`] is created exactly once per unique email, the first time
//! somebody signs in with it. This crate provides:
//! - the [`Identity`] model and its wire form
//! - the [`IdentityStore`] trait with PostgreSQL and in-memory backends
//! - [`IdentityService::find_or_create`], which resolves the create race
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use auth_identity::{IdentityService, InMemoryIdentityStore};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let service = IdentityService::new(Arc::new(InMemoryIdentityStore::new()));
//!
//! let first = service.find_or_create("ada@example.com", "Ada").await?;
//! let again = service.find_or_create("ada@example.com", "Ada").await?;
//! assert_eq!(first.id, again.id);
//! # Ok(())
//! # }
//! ```

pub mod models;
pub mod repository;
pub mod postgres;
pub mod service;
pub mod error;

pub use models::*;
pub use repository::*;
pub use postgres::PgIdentityStore;
pub use service::*;
pub use error::*;

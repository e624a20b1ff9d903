//! Google ID token verification for Folio sign-in
//!
//! The browser obtains an ID token from Google Identity Services and posts
//! it to the login endpoint. This crate turns that opaque credential into a
//! [`VerifiedClaim`]:
//! - [`GoogleTokenInfoClient`] asks Google's `tokeninfo` endpoint about the token
//! - [`ClaimPolicy`] independently checks audience and issuer
//!
//! # Example
//!
//! ```rust,no_run
//! use auth_oauth::{ClaimPolicy, GoogleTokenInfoClient, TokenVerifier};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = GoogleTokenInfoClient::new()?;
//! let policy = ClaimPolicy::new("1234.apps.googleusercontent.com");
//!
//! let claim = client.verify("eyJhbGciOi...").await?;
//! policy.validate(&claim)?;
//! println!("signed in as {}", claim.email);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod provider;
pub mod policy;
pub mod models;
pub mod error;

pub use client::*;
pub use provider::*;
pub use policy::*;
pub use models::*;
pub use error::*;

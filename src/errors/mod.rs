//! # Error Handling
//!
//! Typed errors for the credential-acquisition engine, built with `thiserror`.
//! Every failure the engine can hit is representable as a value of
//! [`AuthError`]; nothing panics on bad input, and secrets never appear in
//! error messages.

mod types;

pub use types::{AuthError, Result};

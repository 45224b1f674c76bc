//! # Observability
//!
//! Structured logging for the acquisition engine via the `tracing`
//! ecosystem. Token material never reaches a log sink: everything secret is
//! a [`SecretString`](crate::token::SecretString), and channel events carry
//! only client ids, resource URIs, and status codes.

mod logging;

pub use logging::init_logging;

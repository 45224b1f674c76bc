//! # Configuration
//!
//! The identity configuration record consumed by the acquisition engine, and
//! the pod identity metadata forwarded to the node identity broker. Loading
//! is offered from a cloud-config JSON file or from environment variables;
//! the record itself is read-only to the rest of the crate.

mod settings;

pub use settings::{AuthConfig, IdentityContext};

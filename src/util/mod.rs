//! Utilities Module - shared infrastructure
//!
//! Contains helper functions used across the codebase:
//! - `case`: Studly-case and label-title conversion
//! - `escape`: HTML escaping without double encoding

pub mod case;
pub mod escape;

// Re-export public functions
pub use case::{studly, title_from_name};
pub use escape::escape;

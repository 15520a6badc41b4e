//! Domain layer - pure logging policy with no runtime state.
//!
//! This layer contains the core concepts and invariants of request logging:
//! - Option resolution and defaults
//! - Header redaction policy
//! - Quiet-down silence windows
//! - Record assembly and level names
//!
//! All types in this layer are pure and easily testable.

pub mod headers;
pub mod level;
pub mod options;
pub mod record;
pub mod window;

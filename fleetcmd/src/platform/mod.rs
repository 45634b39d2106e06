//! Platform definitions for multi-vendor support.
//!
//! Each supported vendor contributes prompt patterns, session-preparation
//! commands and (where the dialect has one) an enable-mode escalation
//! sequence.

mod definition;
mod registry;
pub mod vendors;

pub use definition::{Escalation, PlatformDefinition};
pub use registry::PlatformRegistry;

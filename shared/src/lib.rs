//! Shared building blocks for the TV bridge workspace
//!
//! Holds the process identity used to tag every trace event, the
//! process-aware logging macros, and the error type for configuration
//! problems that any binary in the workspace can hit at startup.

pub mod errors;
pub mod logging;
pub mod types;

pub use errors::*;
pub use types::*;

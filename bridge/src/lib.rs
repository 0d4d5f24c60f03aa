//! Android TV launch bridge
//!
//! Accepts WebSocket connections from a browser UI, checks that a submitted
//! URL is a YouTube link, opens it on the TV through `adb` and streams the
//! command output back until it exits.

pub mod bridge_impl;
pub mod config;
pub mod error;
pub mod protocol;
pub mod services;
pub mod state;
pub mod traits;
pub mod types;
pub mod validator;

// Re-export main types
pub use bridge_impl::BridgeServer;
pub use config::{BridgeConfig, CorsPolicy};
pub use error::{BridgeError, BridgeResult, DecodeError, LaunchError};
pub use state::BridgeState;
pub use types::*;

// Re-export trait definitions
pub use traits::CommandRunner;

// Re-export service implementations
pub use services::{AdbCommandRunner, ConnectionSession, Notifier};

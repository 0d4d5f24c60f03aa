//! Service implementations
//!
//! Real implementations of the service traits plus the per-connection
//! plumbing they share.

pub mod command_runner;
pub mod heartbeat;
pub mod notifier;
pub mod output_relay;
pub mod session;

#[cfg(test)]
mod tests;

// Re-export service implementations
pub use command_runner::AdbCommandRunner;
pub use heartbeat::{HEARTBEAT_INTERVAL, InboundStream, watch_inbound};
pub use notifier::{NOTIFICATION_BUFFER, Notifier};
pub use output_relay::{OutputChannel, relay_lines, spawn_relay};
pub use session::{ConnectionSession, MAX_PENDING_FRAMES, SessionState};

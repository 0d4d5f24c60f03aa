//! Bridge server state
//!
//! Read-only configuration plus the few counters the health endpoint reports.
//! Sessions share nothing else.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Instant;

use crate::config::BridgeConfig;

#[derive(Debug)]
pub struct BridgeState {
    pub config: Arc<BridgeConfig>,
    pub session_count: AtomicU32,
    pub server_start_time: Instant,
}

impl BridgeState {
    pub fn new(config: Arc<BridgeConfig>) -> Self {
        Self {
            config,
            session_count: AtomicU32::new(0),
            server_start_time: Instant::now(),
        }
    }

    /// Get server uptime in seconds
    pub fn get_uptime_seconds(&self) -> u64 {
        self.server_start_time.elapsed().as_secs()
    }

    /// Get live session count
    pub fn get_session_count(&self) -> u32 {
        self.session_count.load(Ordering::Relaxed)
    }

    /// Increment session count
    pub fn increment_session_count(&self) -> u32 {
        self.session_count.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Decrement session count
    pub fn decrement_session_count(&self) -> u32 {
        self.session_count.fetch_sub(1, Ordering::Relaxed).saturating_sub(1)
    }
}

//! Service tests for the bridge
//!
//! Process-backed tests run a fake `adb` shell script and are unix only.

pub mod helpers;
pub mod heartbeat;

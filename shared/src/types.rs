//! Process identity shared by every binary in the workspace

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// Global process ID singleton - set once at startup
static PROCESS_ID: OnceLock<ProcessId> = OnceLock::new();

/// Identity attached to every trace event emitted by this process
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProcessId {
    pub name: String,
    pub pid: u32,
}

impl ProcessId {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pid: std::process::id(),
        }
    }

    /// Initialize the global process ID; later calls keep the first value
    pub fn init(name: &str) -> &'static ProcessId {
        PROCESS_ID.get_or_init(|| ProcessId::new(name))
    }

    /// Get the global process ID, falling back to `unknown` when `init` was never called
    pub fn current() -> &'static ProcessId {
        PROCESS_ID.get_or_init(|| ProcessId::new("unknown"))
    }
}

impl fmt::Display for ProcessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.pid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_process_id_display() {
        let id = ProcessId::new("bridge");
        assert_eq!(id.to_string(), format!("bridge:{}", std::process::id()));
    }

    #[test]
    fn test_current_is_stable() {
        let first = ProcessId::current();
        let second = ProcessId::current();
        assert_eq!(first, second);
    }
}

//! Bridge configuration
//!
//! Built once in `main` from the command line (and `CORS_ALLOW_ORIGINS`) and
//! shared read-only with the components that need it.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use shared::{SharedError, SharedResult};

use crate::services::heartbeat::HEARTBEAT_INTERVAL;

/// Default device-bridge binary
pub const DEFAULT_ADB_BINARY: &str = "adb";

/// Package of the YouTube app on Android TV
pub const DEFAULT_TARGET_PACKAGE: &str = "com.google.android.youtube.tv";

/// Which origins receive an `Access-Control-Allow-Origin` header
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorsPolicy {
    Any,
    List(Vec<String>),
}

impl CorsPolicy {
    /// Parse `*` or a comma-separated origin list; blank entries are dropped
    pub fn parse(raw: &str) -> SharedResult<Self> {
        let raw = raw.trim();
        if raw == "*" {
            return Ok(Self::Any);
        }

        let origins: Vec<String> = raw
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect();

        if let Some(bad) = origins.iter().find(|origin| *origin == "*") {
            return Err(SharedError::invalid_config("cors_allow_origins", bad.clone()));
        }

        Ok(Self::List(origins))
    }

    /// Value for `Access-Control-Allow-Origin`, if the request origin is allowed
    pub fn allow_origin(&self, origin: Option<&str>) -> Option<String> {
        match self {
            Self::Any => Some("*".to_string()),
            Self::List(origins) => {
                let origin = origin?;
                origins.iter().any(|allowed| allowed == origin).then(|| origin.to_string())
            }
        }
    }
}

/// Runtime configuration for the bridge
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    pub bind_address: SocketAddr,
    pub static_dir: PathBuf,
    pub cors: CorsPolicy,
    pub adb_binary: String,
    pub target_package: String,
    /// Period between WebSocket pings; a peer silent for two periods is dropped
    pub heartbeat_interval: Duration,
}

impl BridgeConfig {
    pub fn new(bind_address: SocketAddr, static_dir: impl Into<PathBuf>) -> Self {
        Self {
            bind_address,
            static_dir: static_dir.into(),
            cors: CorsPolicy::Any,
            adb_binary: DEFAULT_ADB_BINARY.to_string(),
            target_package: DEFAULT_TARGET_PACKAGE.to_string(),
            heartbeat_interval: HEARTBEAT_INTERVAL,
        }
    }

    /// Configure the CORS policy (fluent API)
    pub fn with_cors(mut self, cors: CorsPolicy) -> Self {
        self.cors = cors;
        self
    }

    /// Configure the device-bridge binary (fluent API)
    pub fn with_adb_binary(mut self, adb_binary: impl Into<String>) -> Self {
        self.adb_binary = adb_binary.into();
        self
    }

    /// Configure the Android package that receives the intent (fluent API)
    pub fn with_target_package(mut self, target_package: impl Into<String>) -> Self {
        self.target_package = target_package.into();
        self
    }

    /// Configure the WebSocket ping period (fluent API)
    pub fn with_heartbeat_interval(mut self, heartbeat_interval: Duration) -> Self {
        self.heartbeat_interval = heartbeat_interval;
        self
    }

    /// Reject values that would make every invocation fail
    pub fn validate(&self) -> SharedResult<()> {
        if self.adb_binary.trim().is_empty() {
            return Err(SharedError::invalid_config("adb_binary", &self.adb_binary));
        }
        if self.target_package.trim().is_empty() || self.target_package.contains(char::is_whitespace) {
            return Err(SharedError::invalid_config("target_package", &self.target_package));
        }
        if self.heartbeat_interval.is_zero() {
            return Err(SharedError::invalid_config(
                "heartbeat_interval",
                format!("{:?}", self.heartbeat_interval),
            ));
        }
        Ok(())
    }
}

//! Bridge error types

use shared::SharedError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("HTTP server startup failed on {addr}: {source}")]
    ServerStartupFailed {
        addr: std::net::SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Shared component error: {0}")]
    SharedError(#[from] SharedError),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl BridgeError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

pub type BridgeResult<T> = Result<T, BridgeError>;

/// Reasons an invocation of the device-bridge binary never started
#[derive(Error, Debug)]
pub enum LaunchError {
    /// The binary is not on the execution path
    #[error("{binary} was not found. Please check your PATH.")]
    BinaryNotFound { binary: String },

    #[error("Failed to start process: {detail}")]
    StartFailed { detail: String },
}

/// Inbound frame that could not be decoded into a request
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("frame is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("frame is not a JSON object")]
    NotAnObject,
}

//! Bridge process entry point

use clap::Parser;
use shared::{ProcessId, logging, process_info};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::signal;

use bridge::{BridgeConfig, BridgeError, BridgeResult, BridgeServer, CorsPolicy};
use bridge::config::{DEFAULT_ADB_BINARY, DEFAULT_TARGET_PACKAGE};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "bridge")]
#[command(about = "Open YouTube links on an Android TV from the browser")]
struct Args {
    /// Interface to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Port for HTTP and WebSocket connections
    #[arg(long, default_value = "8080")]
    port: u16,

    /// Directory holding the browser UI
    #[arg(long, default_value = "docs")]
    static_dir: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Device-bridge binary
    #[arg(long, default_value = DEFAULT_ADB_BINARY)]
    adb_path: String,

    /// Android package that receives the VIEW intent
    #[arg(long, default_value = DEFAULT_TARGET_PACKAGE)]
    target_package: String,

    /// Seconds between WebSocket pings; peers silent for two periods are dropped
    #[arg(long, default_value = "30")]
    heartbeat_secs: u64,

    /// Allowed CORS origins: `*` or a comma-separated list
    #[arg(long, env = "CORS_ALLOW_ORIGINS", default_value = "*")]
    cors_allow_origins: String,
}

impl Args {
    fn into_config(self) -> BridgeResult<BridgeConfig> {
        let bind_address: SocketAddr = format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| BridgeError::config(format!("Invalid bind address: {}", e)))?;

        let config = BridgeConfig::new(bind_address, self.static_dir)
            .with_cors(CorsPolicy::parse(&self.cors_allow_origins)?)
            .with_adb_binary(self.adb_path)
            .with_target_package(self.target_package)
            .with_heartbeat_interval(Duration::from_secs(self.heartbeat_secs));
        config.validate()?;

        Ok(config)
    }
}

#[tokio::main]
async fn main() -> BridgeResult<()> {
    // .env may carry CORS_ALLOW_ORIGINS
    let _ = dotenv::dotenv();
    let args = Args::parse();

    ProcessId::init("bridge");
    logging::init_tracing_with_level(Some(&args.log_level));

    let config = args.into_config()?;
    logging::log_startup(
        ProcessId::current(),
        &format!("bridge on {} (adb: {}, package: {})", config.bind_address, config.adb_binary, config.target_package),
    );
    process_info!(ProcessId::current(), "🔐 CORS policy: {:?}", config.cors);

    let server = BridgeServer::new(config);
    server
        .run(async {
            match signal::ctrl_c().await {
                Ok(()) => logging::log_shutdown(ProcessId::current(), "Received Ctrl+C signal"),
                Err(err) => {
                    logging::log_error(ProcessId::current(), "Signal handling", &err);
                    std::future::pending::<()>().await;
                }
            }
        })
        .await?;

    logging::log_success(ProcessId::current(), "Bridge stopped gracefully");
    Ok(())
}

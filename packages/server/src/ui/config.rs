//! Server configuration (command line flags, each overridable by environment variable).

use std::time::Duration;

use clap::Parser;

use crate::infrastructure::execution::Judge0Config;

#[derive(Parser, Debug, Clone)]
#[command(name = "codesync-server")]
#[command(about = "Collaborative code editing server with live document sync and code execution", long_about = None)]
pub struct ServerConfig {
    /// Host address to bind the server to
    #[arg(short = 'H', long, env = "CODESYNC_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "CODESYNC_PORT", default_value = "8080")]
    pub port: u16,

    /// Base URL of the Judge0-compatible execution service
    #[arg(
        long,
        env = "CODESYNC_EXECUTION_URL",
        default_value = "https://judge0-ce.p.rapidapi.com"
    )]
    pub execution_url: String,

    /// API key sent to the execution service
    #[arg(long, env = "CODESYNC_EXECUTION_API_KEY", hide_env_values = true)]
    pub execution_api_key: Option<String>,

    /// Header name carrying the API key
    #[arg(
        long,
        env = "CODESYNC_EXECUTION_API_KEY_HEADER",
        default_value = "X-RapidAPI-Key"
    )]
    pub execution_api_key_header: String,

    /// Per-request timeout for the execution service, in seconds
    #[arg(
        long,
        env = "CODESYNC_EXECUTION_TIMEOUT_SECS",
        default_value_t = 15,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub execution_timeout_secs: u64,

    /// Interval between WebSocket pings, in seconds
    #[arg(
        long,
        env = "CODESYNC_HEARTBEAT_INTERVAL_SECS",
        default_value_t = 15,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub heartbeat_interval_secs: u64,

    /// Close a connection after this many seconds without any frame
    #[arg(
        long,
        env = "CODESYNC_IDLE_TIMEOUT_SECS",
        default_value_t = 45,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub idle_timeout_secs: u64,

    /// Default log level (overridden by RUST_LOG)
    #[arg(long, env = "CODESYNC_LOG_LEVEL", default_value = "debug")]
    pub log_level: String,
}

impl ServerConfig {
    pub fn judge0(&self) -> Judge0Config {
        Judge0Config {
            base_url: self.execution_url.clone(),
            api_key: self.execution_api_key.clone(),
            api_key_header: self.execution_api_key_header.clone(),
            timeout: Duration::from_secs(self.execution_timeout_secs),
        }
    }

    pub fn gateway(&self) -> GatewayConfig {
        GatewayConfig {
            heartbeat_interval: Duration::from_secs(self.heartbeat_interval_secs),
            idle_timeout: Duration::from_secs(self.idle_timeout_secs),
        }
    }
}

/// Liveness settings of the Connection Gateway
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GatewayConfig {
    /// The writer pings the peer this often
    pub heartbeat_interval: Duration,
    /// The reader gives up after this long without any inbound frame
    pub idle_timeout: Duration,
}

impl GatewayConfig {
    /// An idle timeout not longer than the heartbeat interval drops healthy peers.
    pub fn is_consistent(&self) -> bool {
        self.idle_timeout > self.heartbeat_interval
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            heartbeat_interval: Duration::from_secs(15),
            idle_timeout: Duration::from_secs(45),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_are_collected_into_component_configs() {
        // テスト項目: フラグが Judge0Config と GatewayConfig に反映される
        // given (前提条件):
        let args = [
            "codesync-server",
            "--port",
            "9000",
            "--execution-url",
            "http://localhost:2358",
            "--execution-api-key",
            "secret",
            "--execution-timeout-secs",
            "3",
            "--heartbeat-interval-secs",
            "5",
            "--idle-timeout-secs",
            "20",
        ];

        // when (操作):
        let config = ServerConfig::try_parse_from(args).unwrap();

        // then (期待する結果):
        assert_eq!(config.port, 9000);
        let judge0 = config.judge0();
        assert_eq!(judge0.base_url, "http://localhost:2358");
        assert_eq!(judge0.api_key.as_deref(), Some("secret"));
        assert_eq!(judge0.timeout, Duration::from_secs(3));
        let gateway = config.gateway();
        assert_eq!(gateway.heartbeat_interval, Duration::from_secs(5));
        assert_eq!(gateway.idle_timeout, Duration::from_secs(20));
        assert!(gateway.is_consistent());
    }

    #[test]
    fn test_zero_heartbeat_interval_is_rejected() {
        // テスト項目: 0 秒のハートビート間隔は受け付けない
        // given (前提条件):
        let args = ["codesync-server", "--heartbeat-interval-secs", "0"];

        // when (操作):
        let result = ServerConfig::try_parse_from(args);

        // then (期待する結果):
        assert!(result.is_err());
    }

    #[test]
    fn test_idle_timeout_must_exceed_heartbeat() {
        // テスト項目: アイドルタイムアウトがハートビート間隔以下だと不整合と判定される
        // given (前提条件):
        let config = GatewayConfig {
            heartbeat_interval: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(30),
        };

        // when (操作):
        let consistent = config.is_consistent();

        // then (期待する結果):
        assert!(!consistent);
        assert!(GatewayConfig::default().is_consistent());
    }
}

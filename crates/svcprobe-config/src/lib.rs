//! Shared configuration for the svcprobe client.
//!
//! Values are layered by `ortho_config`: built-in defaults, then a TOML file
//! named by `--config-path` or `SVCPROBE_CONFIG_PATH`, then `SVCPROBE_*`
//! environment variables, then command-line flags.

mod bus;
mod defaults;
mod logging;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

pub use bus::{BusScope, BusScopeParseError};
pub use defaults::{
    DEFAULT_CALL_TIMEOUT_MS, DEFAULT_LOG_FILTER, default_bus_scope, default_log_filter,
    default_log_filter_string, default_log_format,
};
pub use logging::{LogFormat, LogFormatParseError};

/// Client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(prefix = "SVCPROBE")]
pub struct Config {
    /// Bus the remote service is published on.
    #[ortho_config(default = default_bus_scope())]
    pub bus: BusScope,
    /// Upper bound for a single call in milliseconds; `0` blocks
    /// indefinitely.
    #[ortho_config(default = DEFAULT_CALL_TIMEOUT_MS)]
    pub call_timeout_ms: u64,
    /// `tracing` filter expression for diagnostics.
    #[ortho_config(default = default_log_filter_string())]
    pub log_filter: String,
    /// Output format for diagnostics.
    #[ortho_config(default = default_log_format())]
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bus: default_bus_scope(),
            call_timeout_ms: DEFAULT_CALL_TIMEOUT_MS,
            log_filter: default_log_filter_string(),
            log_format: default_log_format(),
        }
    }
}

impl Config {
    /// Bus scope used for new connections.
    #[must_use]
    pub const fn bus(&self) -> BusScope {
        self.bus
    }

    /// Call timeout in milliseconds; `0` means no timeout.
    #[must_use]
    pub const fn call_timeout_ms(&self) -> u64 {
        self.call_timeout_ms
    }

    /// Log filter expression.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        self.log_filter.as_str()
    }

    /// Log output format.
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        self.log_format
    }
}

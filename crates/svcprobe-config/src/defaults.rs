use crate::bus::BusScope;
use crate::logging::LogFormat;

/// Default log filter expression.
///
/// Diagnostics go to stderr alongside user-facing errors, so only warnings
/// are shown unless the operator asks for more.
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Default call timeout in milliseconds; `0` blocks indefinitely.
pub const DEFAULT_CALL_TIMEOUT_MS: u64 = 0;

/// Default log filter expression used by the client.
#[must_use]
pub const fn default_log_filter() -> &'static str {
    DEFAULT_LOG_FILTER
}

/// Owned log filter value used where allocation is required (e.g. serde).
#[must_use]
pub fn default_log_filter_string() -> String {
    DEFAULT_LOG_FILTER.to_owned()
}

/// Default logging format.
#[must_use]
pub const fn default_log_format() -> LogFormat {
    LogFormat::Compact
}

/// Default bus scope.
#[must_use]
pub const fn default_bus_scope() -> BusScope {
    BusScope::Session
}

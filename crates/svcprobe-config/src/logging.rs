use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// How the client renders diagnostic events on stderr.
///
/// Command output and error lines are unaffected; this only shapes the
/// `tracing` events enabled by the log filter. Selected with `--log-format`,
/// `SVCPROBE_LOG_FORMAT`, or `log_format` in the configuration file.
#[derive(
    Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq, EnumString, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum LogFormat {
    /// One terse line per event, readable next to the client's own errors.
    #[default]
    Compact,
    /// One JSON object per event with fields flattened, for capture by
    /// test harnesses.
    Json,
}

/// Raised when `--log-format` names neither `compact` nor `json`.
pub type LogFormatParseError = strum::ParseError;

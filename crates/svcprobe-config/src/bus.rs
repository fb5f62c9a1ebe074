use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Which message bus the client talks to.
#[derive(
    Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq, EnumString, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum BusScope {
    /// The per-login-session bus.
    #[default]
    Session,
    /// The machine-wide system bus.
    System,
}

/// Errors encountered while parsing a [`BusScope`] from text.
pub type BusScopeParseError = strum::ParseError;

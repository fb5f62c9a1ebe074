//! Error types and reporting helpers for the client runtime.

use std::ffi::OsString;
use std::io::{self, Write};
use std::sync::Arc;

use svcprobe_bus::BusError;
use thiserror::Error;

use crate::telemetry::TelemetryError;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error("failed to load configuration: {0}")]
    LoadConfiguration(Arc<ortho_config::OrthoError>),
    #[error("unrecognized command '{0}'")]
    UnrecognizedCommand(String),
    #[error("option parsing failed: unknown option '{0}'")]
    UnknownOption(String),
    #[error("argument {0:?} is not valid UTF-8")]
    InvalidArgument(OsString),
    #[error("failed to write usage: {0}")]
    WriteUsage(io::Error),
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),
    #[error(transparent)]
    Command(#[from] CommandError),
}

/// Failures raised while a command handler runs.
#[derive(Debug, Error)]
pub(crate) enum CommandError {
    #[error("{0} argument required.")]
    MissingArgument(&'static str),
    #[error("too many arguments.")]
    TooManyArguments,
    #[error("cannot convert {0} to integer.")]
    Conversion(String),
    #[error("invalid {name} '{value}' (choose from {choices}).")]
    InvalidChoice {
        name: &'static str,
        value: String,
        choices: String,
    },
    #[error("option parsing failed: {0}")]
    Options(String),
    #[error("failed to write command output: {0}")]
    WriteOutput(io::Error),
    #[error(transparent)]
    Bus(#[from] BusError),
}

/// Writes `error` to `stderr` as a single line.
///
/// Bus failures already name their domain and code and are printed as-is.
/// Everything else is prefixed with the program name.
pub(crate) fn report_error(stderr: &mut dyn Write, program: &str, error: &AppError) {
    let line = match error {
        AppError::Command(CommandError::Bus(bus_error)) => bus_error.to_string(),
        other => format!("{program}: {}", fold_lines(&other.to_string())),
    };
    let _ = writeln!(stderr, "{line}");
}

fn fold_lines(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

//! Configuration loading helpers for the client.
//!
//! Configuration flags must precede the command verb. They are split off the
//! argument vector here so `ortho_config` only sees the flags it understands
//! while the dispatcher receives the verb and its own arguments untouched.

use std::ffi::{OsStr, OsString};

use ortho_config::OrthoConfig;
use svcprobe_config::Config;

use crate::AppError;

/// A configuration flag accepted before the command verb.
pub(crate) struct ConfigFlag {
    pub(crate) name: &'static str,
    pub(crate) value_name: &'static str,
    pub(crate) help: &'static str,
}

/// CLI flags recognised by the configuration loader.
///
/// MAINTENANCE: keep in sync with the fields of `svcprobe_config::Config`.
pub(crate) const CONFIG_CLI_FLAGS: &[ConfigFlag] = &[
    ConfigFlag {
        name: "--config-path",
        value_name: "PATH",
        help: "Read configuration from PATH",
    },
    ConfigFlag {
        name: "--bus",
        value_name: "SCOPE",
        help: "Bus to use: session or system",
    },
    ConfigFlag {
        name: "--call-timeout-ms",
        value_name: "MS",
        help: "Give up on a call after MS milliseconds (0 waits forever)",
    },
    ConfigFlag {
        name: "--log-filter",
        value_name: "FILTER",
        help: "Diagnostic log filter, for example 'debug'",
    },
    ConfigFlag {
        name: "--log-format",
        value_name: "FORMAT",
        help: "Diagnostic log format: compact or json",
    },
];

pub(crate) trait ConfigLoader {
    /// Loads configuration from the filtered configuration arguments.
    fn load(&self, args: &[OsString]) -> Result<Config, AppError>;
}

pub(crate) struct OrthoConfigLoader;

#[derive(Debug, Clone, Copy)]
enum FlagAction {
    Include { needs_value: bool },
    Stop,
}

impl ConfigLoader for OrthoConfigLoader {
    fn load(&self, args: &[OsString]) -> Result<Config, AppError> {
        Config::load_from_iter(args.iter().cloned()).map_err(AppError::LoadConfiguration)
    }
}

impl OrthoConfigLoader {
    fn process_config_flag(argument: &OsStr) -> FlagAction {
        let argument_text = argument.to_string_lossy();
        let (flag, inline_value) = match argument_text.split_once('=') {
            Some((flag, _)) => (flag, true),
            None => (argument_text.as_ref(), false),
        };

        if CONFIG_CLI_FLAGS.iter().any(|known| known.name == flag) {
            return FlagAction::Include {
                needs_value: !inline_value,
            };
        }

        FlagAction::Stop
    }
}

pub(crate) struct ConfigArgumentSplit {
    pub(crate) config_arguments: Vec<OsString>,
    pub(crate) command_start: usize,
}

/// Separates leading configuration flags from the command tokens.
///
/// The program name is always kept as the first configuration argument. The
/// first token that is not a known flag (or a flag's value) starts the
/// command.
pub(crate) fn split_config_arguments(args: &[OsString]) -> ConfigArgumentSplit {
    let Some((program, rest)) = args.split_first() else {
        return ConfigArgumentSplit {
            config_arguments: Vec::new(),
            command_start: 0,
        };
    };

    let mut config_arguments = vec![program.clone()];
    let mut pending_value = false;
    let mut consumed = 0usize;

    for argument in rest {
        if pending_value {
            config_arguments.push(argument.clone());
            pending_value = false;
            consumed += 1;
            continue;
        }

        match OrthoConfigLoader::process_config_flag(argument) {
            FlagAction::Include { needs_value } => {
                config_arguments.push(argument.clone());
                pending_value = needs_value;
                consumed += 1;
            }
            FlagAction::Stop => break,
        }
    }

    ConfigArgumentSplit {
        config_arguments,
        command_start: consumed + 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn os_args(args: &[&str]) -> Vec<OsString> {
        args.iter().map(OsString::from).collect()
    }

    #[test]
    fn inline_value_flags_do_not_need_follow_up_value() {
        let result = OrthoConfigLoader::process_config_flag(OsStr::new("--bus=system"));
        assert!(matches!(result, FlagAction::Include { needs_value: false }));
    }

    #[test]
    fn separate_value_flags_consume_following_argument() {
        let result = OrthoConfigLoader::process_config_flag(OsStr::new("--call-timeout-ms"));
        assert!(matches!(result, FlagAction::Include { needs_value: true }));
    }

    #[rstest]
    #[case("echo")]
    #[case("--help")]
    #[case("--unknown")]
    fn other_tokens_start_the_command(#[case] token: &str) {
        let result = OrthoConfigLoader::process_config_flag(OsStr::new(token));
        assert!(matches!(result, FlagAction::Stop));
    }

    #[test]
    fn splits_leading_flags_from_command() {
        let args = os_args(&["client", "--bus", "system", "--log-filter=debug", "echo", "hi"]);
        let split = split_config_arguments(&args);
        assert_eq!(
            split.config_arguments,
            os_args(&["client", "--bus", "system", "--log-filter=debug"])
        );
        assert_eq!(split.command_start, 4);
    }

    #[test]
    fn flags_after_the_verb_belong_to_the_command() {
        let args = os_args(&["client", "echo", "--bus"]);
        let split = split_config_arguments(&args);
        assert_eq!(split.config_arguments, os_args(&["client"]));
        assert_eq!(split.command_start, 1);
    }

    #[test]
    fn trailing_flag_without_value_ends_the_split() {
        let args = os_args(&["client", "--bus"]);
        let split = split_config_arguments(&args);
        assert_eq!(split.config_arguments, os_args(&["client", "--bus"]));
        assert_eq!(split.command_start, 2);
    }

    #[test]
    fn empty_arguments_split_to_nothing() {
        let split = split_config_arguments(&[]);
        assert!(split.config_arguments.is_empty());
        assert_eq!(split.command_start, 0);
    }
}

//! Command-line runtime for the svcprobe client.
//!
//! The runtime splits leading configuration flags from the command tokens,
//! resolves the verb against a fixed registry, and hands the remaining tokens
//! to the matching handler. Configuration, the bus provider, and the IO
//! streams are injected so tests can drive the full dispatch path without a
//! live bus.

use std::ffi::OsString;
use std::io::Write;
use std::path::Path;
use std::process::ExitCode;

use svcprobe_bus::{CallTimeout, ConnectionProvider, ZbusProvider};
use tracing::debug;

mod commands;
mod config;
mod errors;
mod registry;
mod telemetry;

use commands::{CommandContext, CommandInvocation};
use config::split_config_arguments;
pub(crate) use config::{ConfigLoader, OrthoConfigLoader};
pub(crate) use errors::{AppError, CommandError};
use errors::report_error;
use registry::CommandRegistry;

/// Name used in diagnostics when the argument vector is empty.
const DEFAULT_PROGRAM_NAME: &str = "client";
const HELP_FLAGS: &[&str] = &["-h", "--help"];

/// Bundles the IO streams provided to the CLI runtime.
pub(crate) struct IoStreams<'a, W: Write, E: Write> {
    pub(crate) stdout: &'a mut W,
    pub(crate) stderr: &'a mut E,
}

impl<'a, W: Write, E: Write> IoStreams<'a, W, E> {
    pub(crate) fn new(stdout: &'a mut W, stderr: &'a mut E) -> Self {
        Self { stdout, stderr }
    }
}

struct CliRunner<'a, W: Write, E: Write, L: ConfigLoader, P: ConnectionProvider> {
    io: &'a mut IoStreams<'a, W, E>,
    loader: &'a L,
    provider: &'a P,
    registry: CommandRegistry,
}

impl<'a, W, E, L, P> CliRunner<'a, W, E, L, P>
where
    W: Write,
    E: Write,
    L: ConfigLoader,
    P: ConnectionProvider,
{
    fn new(io: &'a mut IoStreams<'a, W, E>, loader: &'a L, provider: &'a P) -> Self {
        Self {
            io,
            loader,
            provider,
            registry: CommandRegistry::builtin(),
        }
    }

    fn run<I>(&mut self, args: I) -> ExitCode
    where
        I: IntoIterator<Item = OsString>,
    {
        let args: Vec<OsString> = args.into_iter().collect();
        let program = program_name(&args);

        match self.dispatch(&program, &args) {
            Ok(()) => ExitCode::SUCCESS,
            Err(error) => {
                report_error(&mut *self.io.stderr, &program, &error);
                ExitCode::FAILURE
            }
        }
    }

    fn dispatch(&mut self, program: &str, args: &[OsString]) -> Result<(), AppError> {
        let split = split_config_arguments(args);
        let tokens = command_tokens(args.get(split.command_start..).unwrap_or_default())?;

        let Some((verb, arguments)) = tokens.split_first() else {
            return self.write_usage(program);
        };
        if HELP_FLAGS.contains(&verb.as_str()) {
            return self.write_usage(program);
        }
        if verb.starts_with('-') {
            return Err(AppError::UnknownOption(verb.clone()));
        }
        let descriptor = self
            .registry
            .lookup(verb)
            .ok_or_else(|| AppError::UnrecognizedCommand(verb.clone()))?;

        let config = self.loader.load(&split.config_arguments)?;
        telemetry::initialise(&config)?;
        debug!(
            verb = descriptor.verb,
            bus = %config.bus(),
            timeout_ms = config.call_timeout_ms(),
            "dispatching command"
        );

        let mut context = CommandContext {
            program,
            stdout: &mut *self.io.stdout,
            provider: self.provider,
            scope: config.bus(),
            timeout: CallTimeout::from_millis(config.call_timeout_ms()),
        };
        let invocation = CommandInvocation {
            descriptor,
            arguments,
        };
        (descriptor.run)(invocation, &mut context)?;
        self.io.stdout.flush().map_err(CommandError::WriteOutput)?;
        Ok(())
    }

    fn write_usage(&mut self, program: &str) -> Result<(), AppError> {
        self.registry
            .write_usage(&mut *self.io.stdout, program)
            .map_err(AppError::WriteUsage)
    }
}

fn program_name(args: &[OsString]) -> String {
    args.first()
        .and_then(|argument| Path::new(argument).file_name())
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| DEFAULT_PROGRAM_NAME.to_owned())
}

fn command_tokens(args: &[OsString]) -> Result<Vec<String>, AppError> {
    args.iter()
        .map(|argument| {
            argument
                .to_str()
                .map(str::to_owned)
                .ok_or_else(|| AppError::InvalidArgument(argument.clone()))
        })
        .collect()
}

/// Runs the CLI using the provided arguments and IO handles.
#[must_use]
pub fn run<I, W, E>(args: I, stdout: &mut W, stderr: &mut E) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    W: Write,
    E: Write,
{
    let mut io = IoStreams::new(stdout, stderr);
    run_with(args, &mut io, &OrthoConfigLoader, &ZbusProvider)
}

/// Runs the CLI with a custom configuration loader and bus provider.
#[must_use]
pub(crate) fn run_with<'a, I, W, E, L, P>(
    args: I,
    io: &'a mut IoStreams<'a, W, E>,
    loader: &'a L,
    provider: &'a P,
) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    W: Write,
    E: Write,
    L: ConfigLoader,
    P: ConnectionProvider,
{
    CliRunner::new(io, loader, provider).run(args)
}

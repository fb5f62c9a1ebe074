//! Command handlers and the context they run in.
//!
//! Each handler owns its grammar. It parses its own options, binds its
//! positional arguments to typed values, and only then opens a connection,
//! so usage and conversion errors never touch the bus.

mod arguments;
pub(crate) mod echo;
pub(crate) mod signal;
pub(crate) mod variant;
pub(crate) mod wait;

use std::io::Write;

use clap::error::ErrorKind;
use clap::{CommandFactory, FromArgMatches};
use svcprobe_bus::{
    CallTimeout, ConnectionProvider, RemoteCall, ServiceTarget, TypedValue, invoke,
};
use svcprobe_config::BusScope;
use tracing::debug;

pub(crate) use arguments::{Parameter, bind_arguments};

use crate::errors::CommandError;
use crate::registry::CommandDescriptor;

/// The object every built-in command talks to.
pub(crate) const TEST_SERVICE: ServiceTarget<'static> = ServiceTarget::new(
    "com.wdc.TestService1",
    "/com/wdc/TestService1",
    "com.wdc.TestService1",
);

/// Signature shared by every handler.
pub(crate) type Handler =
    fn(CommandInvocation<'_>, &mut CommandContext<'_>) -> Result<(), CommandError>;

/// A resolved verb together with the tokens that followed it.
#[derive(Debug, Clone, Copy)]
pub(crate) struct CommandInvocation<'a> {
    pub(crate) descriptor: &'static CommandDescriptor,
    pub(crate) arguments: &'a [String],
}

/// Process-level collaborators handed to a handler.
pub(crate) struct CommandContext<'a> {
    pub(crate) program: &'a str,
    pub(crate) stdout: &'a mut dyn Write,
    pub(crate) provider: &'a dyn ConnectionProvider,
    pub(crate) scope: BusScope,
    pub(crate) timeout: CallTimeout,
}

impl CommandContext<'_> {
    /// Starts a call to `method` on the test service.
    pub(crate) fn request(&self, method: &str) -> RemoteCall {
        RemoteCall::new(TEST_SERVICE, method).with_timeout(self.timeout)
    }

    /// Connects, performs `call` once, and releases the connection.
    pub(crate) fn execute(&self, call: &RemoteCall) -> Result<Vec<TypedValue>, CommandError> {
        debug!(scope = %self.scope, method = %call.method, "connecting to bus");
        let connection = self.provider.connect(self.scope, self.timeout)?;
        Ok(invoke(connection.as_ref(), call)?)
    }

    pub(crate) fn print(&mut self, line: impl std::fmt::Display) -> Result<(), CommandError> {
        writeln!(self.stdout, "{line}").map_err(CommandError::WriteOutput)
    }
}

/// Tokens that request handler help wherever they appear before `--`.
const HELP_FLAGS: &[&str] = &["-h", "--help"];
const END_OF_OPTIONS: &str = "--";

/// Parses the handler's option grammar.
///
/// A help flag anywhere before `--` wins over every other token. Returns
/// `Ok(None)` once help has been written to stdout; the handler should then
/// stop without connecting. Unknown options are usage errors; `--` ends
/// option parsing so dash-prefixed positionals can still be passed.
pub(crate) fn parse_options<T>(
    invocation: &CommandInvocation<'_>,
    context: &mut CommandContext<'_>,
) -> Result<Option<T>, CommandError>
where
    T: CommandFactory + FromArgMatches,
{
    let descriptor = invocation.descriptor;
    let command = T::command()
        .no_binary_name(true)
        .bin_name(format!("{} {}", context.program, descriptor.verb))
        .override_usage(descriptor.usage(context.program));

    let parsed = if requests_help(invocation.arguments) {
        command.try_get_matches_from(["--help"])
    } else {
        command.try_get_matches_from(invocation.arguments)
    };

    match parsed {
        Ok(matches) => T::from_arg_matches(&matches)
            .map(Some)
            .map_err(|error| CommandError::Options(clap_summary(&error))),
        Err(error) if matches!(error.kind(), ErrorKind::DisplayHelp) => {
            write!(context.stdout, "{}", error.render()).map_err(CommandError::WriteOutput)?;
            Ok(None)
        }
        Err(error) => Err(CommandError::Options(clap_summary(&error))),
    }
}

fn requests_help(arguments: &[String]) -> bool {
    arguments
        .iter()
        .take_while(|argument| argument.as_str() != END_OF_OPTIONS)
        .any(|argument| HELP_FLAGS.contains(&argument.as_str()))
}

/// First line of a clap diagnostic without its `error: ` prefix.
fn clap_summary(error: &clap::Error) -> String {
    let rendered = error.to_string();
    let first = rendered.lines().next().unwrap_or_default();
    first.strip_prefix("error: ").unwrap_or(first).to_owned()
}

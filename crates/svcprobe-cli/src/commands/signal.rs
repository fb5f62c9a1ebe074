//! `signal <NAME> <VALUE>`: asks the service to emit a signal.

use clap::Parser;

use super::{CommandContext, CommandInvocation, Parameter, bind_arguments, parse_options};
use crate::errors::CommandError;
use crate::registry::CommandDescriptor;

const SIGNAL_NAMES: &[&str] = &["S1", "S2"];

const PARAMETERS: &[Parameter] = &[
    Parameter::text("NAME", "NAME").one_of(SIGNAL_NAMES),
    Parameter::text("VALUE", "VALUE"),
];

pub(crate) const DESCRIPTOR: CommandDescriptor = CommandDescriptor {
    verb: "signal",
    summary: "Ask the service to emit a signal.",
    parameters: PARAMETERS,
    flags: "",
    run,
};

/// Make the service emit signal NAME carrying VALUE.
#[derive(Debug, Parser)]
#[command(name = "signal", disable_version_flag = true)]
struct SignalOptions {
    /// Signal name (S1 or S2) followed by the string it carries.
    #[arg(value_name = "NAME VALUE", num_args = 0..)]
    values: Vec<String>,
}

fn run(
    invocation: CommandInvocation<'_>,
    context: &mut CommandContext<'_>,
) -> Result<(), CommandError> {
    let Some(options) = parse_options::<SignalOptions>(&invocation, context)? else {
        return Ok(());
    };
    let arguments = bind_arguments(invocation.descriptor.parameters, &options.values)?;
    let call = context.request("SendSignal").with_arguments(arguments);
    context.execute(&call)?;
    Ok(())
}

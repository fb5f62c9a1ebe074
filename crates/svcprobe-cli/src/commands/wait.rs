//! `wait <SECONDS>`: asks the service to stall.

use clap::Parser;

use super::{CommandContext, CommandInvocation, Parameter, bind_arguments, parse_options};
use crate::errors::CommandError;
use crate::registry::CommandDescriptor;

const PARAMETERS: &[Parameter] = &[Parameter::unsigned("SECONDS", "SECONDS")];

pub(crate) const DESCRIPTOR: CommandDescriptor = CommandDescriptor {
    verb: "wait",
    summary: "Stall for a specified amount of time.",
    parameters: PARAMETERS,
    flags: "",
    run,
};

/// Make the service stall for SECONDS before replying.
///
/// SECONDS accepts decimal, 0x-prefixed hexadecimal, or 0-prefixed octal.
#[derive(Debug, Parser)]
#[command(name = "wait", disable_version_flag = true)]
struct WaitOptions {
    /// Seconds the service should wait.
    #[arg(value_name = "SECONDS", num_args = 0.., allow_negative_numbers = true)]
    values: Vec<String>,
}

fn run(
    invocation: CommandInvocation<'_>,
    context: &mut CommandContext<'_>,
) -> Result<(), CommandError> {
    let Some(options) = parse_options::<WaitOptions>(&invocation, context)? else {
        return Ok(());
    };
    let arguments = bind_arguments(invocation.descriptor.parameters, &options.values)?;
    let call = context.request("Wait").with_arguments(arguments);
    context.execute(&call)?;
    Ok(())
}

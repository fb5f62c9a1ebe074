//! `echo <STRING>`: round-trips a string through `EchoString`.

use clap::Parser;
use svcprobe_bus::{BusError, Signature, TypedValue, ValueKind};

use super::{CommandContext, CommandInvocation, Parameter, bind_arguments, parse_options};
use crate::errors::CommandError;
use crate::registry::CommandDescriptor;

const PARAMETERS: &[Parameter] = &[Parameter::text("STRING", "string")];

pub(crate) const DESCRIPTOR: CommandDescriptor = CommandDescriptor {
    verb: "echo",
    summary: "Send a string, receive the same string.",
    parameters: PARAMETERS,
    flags: "",
    run,
};

/// Send a string to the service and print the reply.
#[derive(Debug, Parser)]
#[command(name = "echo", disable_version_flag = true)]
struct EchoOptions {
    /// String to send.
    #[arg(value_name = "STRING", num_args = 0.., allow_negative_numbers = true)]
    values: Vec<String>,
}

fn run(
    invocation: CommandInvocation<'_>,
    context: &mut CommandContext<'_>,
) -> Result<(), CommandError> {
    let Some(options) = parse_options::<EchoOptions>(&invocation, context)? else {
        return Ok(());
    };
    let arguments = bind_arguments(invocation.descriptor.parameters, &options.values)?;
    let call = context
        .request("EchoString")
        .with_arguments(arguments)
        .expecting(Signature::new([ValueKind::String]));

    match context.execute(&call)?.as_slice() {
        [TypedValue::Str(text)] => context.print(text),
        _ => Err(BusError::protocol("EchoString reply carried no string").into()),
    }
}

//! `variant [-d|--double]`: fetches a variant-typed reply.

use clap::Parser;
use svcprobe_bus::{BusError, Signature, TypedValue, ValueKind};

use super::{CommandContext, CommandInvocation, bind_arguments, parse_options};
use crate::errors::CommandError;
use crate::registry::CommandDescriptor;

pub(crate) const DESCRIPTOR: CommandDescriptor = CommandDescriptor {
    verb: "variant",
    summary: "Receive a variant-typed reply.",
    parameters: &[],
    flags: "[-d|--double]",
    run,
};

/// Ask the service for a variant and print the value it wraps.
#[derive(Debug, Parser)]
#[command(name = "variant", disable_version_flag = true)]
struct VariantOptions {
    /// Request a double instead of a string.
    #[arg(short, long)]
    double: bool,
    #[arg(num_args = 0.., hide = true)]
    values: Vec<String>,
}

fn run(
    invocation: CommandInvocation<'_>,
    context: &mut CommandContext<'_>,
) -> Result<(), CommandError> {
    let Some(options) = parse_options::<VariantOptions>(&invocation, context)? else {
        return Ok(());
    };
    bind_arguments(invocation.descriptor.parameters, &options.values)?;
    let call = context
        .request("VariantResponse")
        .with_arguments(vec![TypedValue::Bool(options.double)])
        .expecting(Signature::new([ValueKind::Variant]));

    match context.execute(&call)?.as_slice() {
        [value @ TypedValue::Variant(_)] => context.print(value),
        _ => Err(BusError::protocol("VariantResponse reply carried no variant").into()),
    }
}

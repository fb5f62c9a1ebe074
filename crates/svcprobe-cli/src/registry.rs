//! The immutable table of built-in commands.

use std::io::{self, Write};

use crate::commands::{self, Handler, Parameter};
use crate::config::CONFIG_CLI_FLAGS;

/// Static description of one verb.
#[derive(Debug)]
pub(crate) struct CommandDescriptor {
    pub(crate) verb: &'static str,
    pub(crate) summary: &'static str,
    /// Positional grammar, in order.
    pub(crate) parameters: &'static [Parameter],
    /// Options accepted before the positionals, e.g. `[-d|--double]`.
    pub(crate) flags: &'static str,
    pub(crate) run: Handler,
}

impl CommandDescriptor {
    /// One-line usage, e.g. `client signal <NAME> <VALUE>`.
    pub(crate) fn usage(&self, program: &str) -> String {
        let mut usage = format!("{program} {}", self.verb);
        if !self.flags.is_empty() {
            usage.push(' ');
            usage.push_str(self.flags);
        }
        for parameter in self.parameters {
            usage.push_str(&format!(" <{}>", parameter.name));
        }
        usage
    }
}

static COMMANDS: [CommandDescriptor; 4] = [
    commands::echo::DESCRIPTOR,
    commands::wait::DESCRIPTOR,
    commands::variant::DESCRIPTOR,
    commands::signal::DESCRIPTOR,
];

/// Verb lookup over a fixed command table.
#[derive(Debug, Clone, Copy)]
pub(crate) struct CommandRegistry {
    commands: &'static [CommandDescriptor],
}

impl CommandRegistry {
    pub(crate) fn builtin() -> Self {
        Self {
            commands: &COMMANDS,
        }
    }

    /// Exact, case-sensitive lookup.
    pub(crate) fn lookup(&self, verb: &str) -> Option<&'static CommandDescriptor> {
        self.commands.iter().find(|descriptor| descriptor.verb == verb)
    }

    /// Writes the combined usage text.
    pub(crate) fn write_usage(&self, writer: &mut dyn Write, program: &str) -> io::Result<()> {
        writeln!(writer, "Usage: {program} [OPTIONS] <command> [ARGS]")?;
        writeln!(writer)?;
        writeln!(writer, "Synchronous D-Bus client for the com.wdc.TestService1 test service.")?;
        writeln!(writer)?;
        writeln!(writer, "Supported Commands:")?;
        for descriptor in self.commands {
            writeln!(writer, "  {:<13}{}", descriptor.verb, descriptor.summary)?;
        }
        writeln!(writer)?;
        writeln!(writer, "Options:")?;
        for flag in CONFIG_CLI_FLAGS {
            let spelled = format!("{} <{}>", flag.name, flag.value_name);
            writeln!(writer, "  {spelled:<28}{}", flag.help)?;
        }
        writeln!(writer, "  {:<28}{}", "-h, --help", "Print this help")?;
        writeln!(writer)?;
        writeln!(
            writer,
            "Run '{program} <command> --help' for command specific help."
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("echo")]
    #[case("wait")]
    #[case("variant")]
    #[case("signal")]
    fn resolves_builtin_verbs(#[case] verb: &str) {
        let descriptor = CommandRegistry::builtin().lookup(verb).expect("verb known");
        assert_eq!(descriptor.verb, verb);
    }

    #[rstest]
    #[case("Echo")]
    #[case("ech")]
    #[case("")]
    #[case("listen")]
    fn lookup_is_exact(#[case] verb: &str) {
        assert!(CommandRegistry::builtin().lookup(verb).is_none());
    }

    #[test]
    fn verbs_are_unique() {
        let registry = CommandRegistry::builtin();
        for (index, descriptor) in registry.commands.iter().enumerate() {
            assert!(
                registry.commands[index + 1..]
                    .iter()
                    .all(|other| other.verb != descriptor.verb),
                "duplicate verb {}",
                descriptor.verb
            );
        }
    }

    #[rstest]
    #[case("echo", "client echo <STRING>")]
    #[case("wait", "client wait <SECONDS>")]
    #[case("variant", "client variant [-d|--double]")]
    #[case("signal", "client signal <NAME> <VALUE>")]
    fn usage_lines_follow_grammar(#[case] verb: &str, #[case] expected: &str) {
        let descriptor = CommandRegistry::builtin().lookup(verb).expect("verb known");
        assert_eq!(descriptor.usage("client"), expected);
    }
}

//! Binding of positional text to typed call arguments.

use svcprobe_bus::TypedValue;

use crate::errors::CommandError;

/// How a positional argument is converted before it is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ParameterKind {
    /// Sent verbatim as a string.
    Text,
    /// Parsed as an unsigned 64-bit integer literal.
    Unsigned,
}

/// One positional parameter in a command's grammar.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Parameter {
    /// Placeholder shown in usage text, e.g. `SECONDS`.
    pub(crate) name: &'static str,
    /// Lower-case noun used in diagnostics, e.g. `string`.
    pub(crate) label: &'static str,
    pub(crate) kind: ParameterKind,
    /// Permitted values; empty accepts anything.
    pub(crate) choices: &'static [&'static str],
}

impl Parameter {
    pub(crate) const fn text(name: &'static str, label: &'static str) -> Self {
        Self {
            name,
            label,
            kind: ParameterKind::Text,
            choices: &[],
        }
    }

    pub(crate) const fn unsigned(name: &'static str, label: &'static str) -> Self {
        Self {
            name,
            label,
            kind: ParameterKind::Unsigned,
            choices: &[],
        }
    }

    pub(crate) const fn one_of(mut self, choices: &'static [&'static str]) -> Self {
        self.choices = choices;
        self
    }

    fn bind(&self, value: &str) -> Result<TypedValue, CommandError> {
        if !self.choices.is_empty() && !self.choices.contains(&value) {
            return Err(CommandError::InvalidChoice {
                name: self.name,
                value: value.to_owned(),
                choices: self.choices.join(", "),
            });
        }
        match self.kind {
            ParameterKind::Text => Ok(TypedValue::string(value)),
            ParameterKind::Unsigned => parse_integer_literal(value)
                .map(TypedValue::U64)
                .ok_or_else(|| CommandError::Conversion(value.to_owned())),
        }
    }
}

/// Converts `values` into typed arguments following `parameters`.
///
/// Arity is checked before any conversion: the first absent parameter is
/// reported as missing and surplus values are rejected as a whole.
pub(crate) fn bind_arguments(
    parameters: &[Parameter],
    values: &[String],
) -> Result<Vec<TypedValue>, CommandError> {
    if let Some(missing) = parameters.get(values.len()) {
        return Err(CommandError::MissingArgument(missing.label));
    }
    if values.len() > parameters.len() {
        return Err(CommandError::TooManyArguments);
    }
    parameters
        .iter()
        .zip(values)
        .map(|(parameter, value)| parameter.bind(value))
        .collect()
}

/// Parses an unsigned integer literal in C notation.
///
/// Accepts an optional leading `+`, then decimal digits, `0x`/`0X`
/// hexadecimal, or octal with a leading `0`. The whole input must be
/// consumed and the value must fit in 64 bits.
pub(crate) fn parse_integer_literal(text: &str) -> Option<u64> {
    let unsigned = text.strip_prefix('+').unwrap_or(text);
    let (digits, radix) = if let Some(hex) = unsigned
        .strip_prefix("0x")
        .or_else(|| unsigned.strip_prefix("0X"))
    {
        (hex, 16)
    } else if let Some(octal) = unsigned.strip_prefix('0').filter(|rest| !rest.is_empty()) {
        (octal, 8)
    } else {
        (unsigned, 10)
    };
    if digits.is_empty() || !digits.chars().all(|digit| digit.is_digit(radix)) {
        return None;
    }
    u64::from_str_radix(digits, radix).ok()
}

//! Typed values exchanged with remote methods.
//!
//! Every [`TypedValue`] knows its wire type, so a tuple of values always
//! carries its own [`Signature`]. Signatures render in D-Bus notation (`s`,
//! `t`, `sx`, ...) without the enclosing parentheses of a message body.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Wire-level type of a single value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// UTF-8 string (`s`).
    String,
    /// Signed 64-bit integer (`x`).
    Int64,
    /// Unsigned 64-bit integer (`t`).
    UInt64,
    /// Boolean (`b`).
    Boolean,
    /// IEEE 754 double (`d`).
    Double,
    /// Variant wrapping another value (`v`).
    Variant,
}

impl ValueKind {
    /// Returns the D-Bus type code for the kind.
    #[must_use]
    pub const fn code(self) -> char {
        match self {
            Self::String => 's',
            Self::Int64 => 'x',
            Self::UInt64 => 't',
            Self::Boolean => 'b',
            Self::Double => 'd',
            Self::Variant => 'v',
        }
    }

    /// Maps a D-Bus type code back to a kind.
    #[must_use]
    pub const fn from_code(code: char) -> Option<Self> {
        match code {
            's' => Some(Self::String),
            'x' => Some(Self::Int64),
            't' => Some(Self::UInt64),
            'b' => Some(Self::Boolean),
            'd' => Some(Self::Double),
            'v' => Some(Self::Variant),
            _ => None,
        }
    }
}

/// A single self-describing value.
#[derive(Debug, Clone, PartialEq)]
pub enum TypedValue {
    /// UTF-8 string.
    Str(String),
    /// Signed 64-bit integer.
    I64(i64),
    /// Unsigned 64-bit integer.
    U64(u64),
    /// Boolean.
    Bool(bool),
    /// Double precision float.
    Double(f64),
    /// Variant boxing another value.
    Variant(Box<TypedValue>),
}

impl TypedValue {
    /// Builds a string value.
    #[must_use]
    pub fn string(value: impl Into<String>) -> Self {
        Self::Str(value.into())
    }

    /// Returns the wire type of the value.
    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::Str(_) => ValueKind::String,
            Self::I64(_) => ValueKind::Int64,
            Self::U64(_) => ValueKind::UInt64,
            Self::Bool(_) => ValueKind::Boolean,
            Self::Double(_) => ValueKind::Double,
            Self::Variant(_) => ValueKind::Variant,
        }
    }

    /// Borrows the string payload when the value is a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(value) => Some(value.as_str()),
            _ => None,
        }
    }

    /// Strips any number of variant wrappers.
    #[must_use]
    pub fn unwrap_variant(&self) -> &Self {
        match self {
            Self::Variant(inner) => inner.unwrap_variant(),
            other => other,
        }
    }
}

impl fmt::Display for TypedValue {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(value) => formatter.write_str(value),
            Self::I64(value) => write!(formatter, "{value}"),
            Self::U64(value) => write!(formatter, "{value}"),
            Self::Bool(value) => write!(formatter, "{value}"),
            Self::Double(value) => write!(formatter, "{value}"),
            Self::Variant(inner) => inner.fmt(formatter),
        }
    }
}

/// Ordered list of value kinds describing a tuple.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Signature(Vec<ValueKind>);

impl Signature {
    /// Builds a signature from kinds.
    #[must_use]
    pub fn new(kinds: impl IntoIterator<Item = ValueKind>) -> Self {
        Self(kinds.into_iter().collect())
    }

    /// Derives the signature of a value tuple.
    #[must_use]
    pub fn of(values: &[TypedValue]) -> Self {
        Self(values.iter().map(TypedValue::kind).collect())
    }

    /// Kinds in tuple order.
    #[must_use]
    pub fn kinds(&self) -> &[ValueKind] {
        &self.0
    }

    /// Returns true for the empty tuple.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0
            .iter()
            .try_for_each(|kind| write!(formatter, "{}", kind.code()))
    }
}

impl FromStr for Signature {
    type Err = SignatureParseError;

    /// Parses D-Bus notation, with or without one pair of enclosing
    /// parentheses.
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let body = input
            .strip_prefix('(')
            .and_then(|inner| inner.strip_suffix(')'))
            .unwrap_or(input);
        body.chars()
            .map(|code| {
                ValueKind::from_code(code).ok_or_else(|| SignatureParseError {
                    signature: input.to_owned(),
                    code,
                })
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }
}

/// Raised when a signature contains a type this client does not handle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported type code '{code}' in signature '{signature}'")]
pub struct SignatureParseError {
    /// The full signature text.
    pub signature: String,
    /// The first unsupported code.
    pub code: char,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn signature_of_values_renders_codes_in_order() {
        let values = vec![
            TypedValue::string("hi"),
            TypedValue::I64(-3),
            TypedValue::U64(7),
        ];
        assert_eq!(Signature::of(&values).to_string(), "sxt");
    }

    #[test]
    fn empty_signature_renders_as_empty_string() {
        assert_eq!(Signature::default().to_string(), "");
        assert!(Signature::of(&[]).is_empty());
    }

    #[rstest]
    #[case("s", &[ValueKind::String])]
    #[case("(s)", &[ValueKind::String])]
    #[case("(bv)", &[ValueKind::Boolean, ValueKind::Variant])]
    #[case("", &[])]
    #[case("()", &[])]
    fn parses_supported_signatures(#[case] text: &str, #[case] kinds: &[ValueKind]) {
        let signature: Signature = text.parse().expect("signature parses");
        assert_eq!(signature.kinds(), kinds);
    }

    #[test]
    fn rejects_container_types() {
        let error = "a{sv}".parse::<Signature>().expect_err("dicts are unsupported");
        assert_eq!(error.code, 'a');
        assert!(error.to_string().contains("a{sv}"));
    }

    #[rstest]
    #[case(TypedValue::string("plain"), "plain")]
    #[case(TypedValue::I64(-42), "-42")]
    #[case(TypedValue::U64(18_446_744_073_709_551_615), "18446744073709551615")]
    #[case(TypedValue::Bool(true), "true")]
    #[case(TypedValue::Double(2.5), "2.5")]
    #[case(TypedValue::Variant(Box::new(TypedValue::string("inner"))), "inner")]
    fn display_renders_inner_payload(#[case] value: TypedValue, #[case] expected: &str) {
        assert_eq!(value.to_string(), expected);
    }

    #[test]
    fn unwrap_variant_strips_nested_wrappers() {
        let nested = TypedValue::Variant(Box::new(TypedValue::Variant(Box::new(
            TypedValue::U64(5),
        ))));
        assert_eq!(nested.unwrap_variant(), &TypedValue::U64(5));
        assert_eq!(nested.kind(), ValueKind::Variant);
    }
}

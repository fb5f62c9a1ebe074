//! Structured errors raised while reaching or calling a remote service.
//!
//! Every failure carries a domain, a human message, and a numeric code. The
//! codes follow the GDBus numbering of the standard
//! `org.freedesktop.DBus.Error.*` names so scripts that already parse GLib
//! client output keep working.

use std::fmt;

use thiserror::Error;

/// Prefix shared by the standard bus error names.
const STANDARD_ERROR_PREFIX: &str = "org.freedesktop.DBus.Error.";

/// Where a failure originated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorDomain {
    /// The bus could not be reached.
    Connection,
    /// The call was sent but the round trip failed (I/O, timeout).
    Transport,
    /// The reply did not match the declared signature.
    Protocol,
    /// The remote side answered with a named error.
    Remote(String),
}

impl fmt::Display for ErrorDomain {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connection => formatter.write_str("bus-connection"),
            Self::Transport => formatter.write_str("bus-transport"),
            Self::Protocol => formatter.write_str("bus-protocol"),
            Self::Remote(name) => formatter.write_str(name),
        }
    }
}

/// Numeric error codes, numbered as GDBus numbers them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ErrorCode {
    /// Generic failure.
    Failed = 0,
    /// Out of memory.
    NoMemory = 1,
    /// The named service is unknown to the bus.
    ServiceUnknown = 2,
    /// The name has no current owner.
    NameHasNoOwner = 3,
    /// No reply arrived.
    NoReply = 4,
    /// Input or output failed.
    IoError = 5,
    /// The bus address was malformed.
    BadAddress = 6,
    /// The operation is not supported.
    NotSupported = 7,
    /// A resource limit was exceeded.
    LimitsExceeded = 8,
    /// Access was denied.
    AccessDenied = 9,
    /// Authentication failed.
    AuthFailed = 10,
    /// No server listened at the address.
    NoServer = 11,
    /// A bus-side timeout expired.
    Timeout = 12,
    /// No network is available.
    NoNetwork = 13,
    /// The address is already in use.
    AddressInUse = 14,
    /// The connection was closed.
    Disconnected = 15,
    /// Arguments or reply did not match the expected types.
    InvalidArgs = 16,
    /// A file was not found.
    FileNotFound = 17,
    /// A file already exists.
    FileExists = 18,
    /// The method does not exist on the interface.
    UnknownMethod = 19,
    /// The call timed out on the client side.
    TimedOut = 20,
}

impl ErrorCode {
    /// Maps a bus error name to its code; unknown names map to
    /// [`ErrorCode::Failed`].
    #[must_use]
    pub fn from_error_name(name: &str) -> Self {
        let Some(short) = name.strip_prefix(STANDARD_ERROR_PREFIX) else {
            return Self::Failed;
        };
        match short {
            "NoMemory" => Self::NoMemory,
            "ServiceUnknown" => Self::ServiceUnknown,
            "NameHasNoOwner" => Self::NameHasNoOwner,
            "NoReply" => Self::NoReply,
            "IOError" => Self::IoError,
            "BadAddress" => Self::BadAddress,
            "NotSupported" => Self::NotSupported,
            "LimitsExceeded" => Self::LimitsExceeded,
            "AccessDenied" => Self::AccessDenied,
            "AuthFailed" => Self::AuthFailed,
            "NoServer" => Self::NoServer,
            "Timeout" => Self::Timeout,
            "NoNetwork" => Self::NoNetwork,
            "AddressInUse" => Self::AddressInUse,
            "Disconnected" => Self::Disconnected,
            "InvalidArgs" => Self::InvalidArgs,
            "FileNotFound" => Self::FileNotFound,
            "FileExists" => Self::FileExists,
            "UnknownMethod" => Self::UnknownMethod,
            "TimedOut" => Self::TimedOut,
            _ => Self::Failed,
        }
    }

    /// Returns the numeric value.
    #[must_use]
    pub const fn value(self) -> i32 {
        self as i32
    }
}

/// A failure reported through the single error channel of a call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{domain}: {message} [{}]", .code.value())]
pub struct BusError {
    /// Origin of the failure.
    pub domain: ErrorDomain,
    /// Human-readable description.
    pub message: String,
    /// Numeric code within the domain.
    pub code: ErrorCode,
}

impl BusError {
    /// Builds an error from its parts.
    #[must_use]
    pub fn new(domain: ErrorDomain, message: impl Into<String>, code: ErrorCode) -> Self {
        Self {
            domain,
            message: single_line(message.into()),
            code,
        }
    }

    /// The bus was unreachable.
    #[must_use]
    pub fn connection(message: impl Into<String>, code: ErrorCode) -> Self {
        Self::new(ErrorDomain::Connection, message, code)
    }

    /// The round trip failed after the call was issued.
    #[must_use]
    pub fn transport(message: impl Into<String>, code: ErrorCode) -> Self {
        Self::new(ErrorDomain::Transport, message, code)
    }

    /// The reply broke the declared contract.
    #[must_use]
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::new(ErrorDomain::Protocol, message, ErrorCode::InvalidArgs)
    }

    /// The remote side raised the named error.
    #[must_use]
    pub fn remote(name: impl Into<String>, message: impl Into<String>) -> Self {
        let error_name = name.into();
        let code = ErrorCode::from_error_name(&error_name);
        Self::new(ErrorDomain::Remote(error_name), message, code)
    }

    /// Returns true when the failure happened before any call was made.
    #[must_use]
    pub const fn is_connection(&self) -> bool {
        matches!(self.domain, ErrorDomain::Connection)
    }
}

/// Folds line breaks so each error prints as a single line.
fn single_line(message: String) -> String {
    if message.contains(['\n', '\r']) {
        message
            .split(['\n', '\r'])
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    } else {
        message
    }
}

//! Remote call requests.

use std::time::Duration;

use crate::value::{Signature, TypedValue};

/// Well-known address of a remote object: service name, object path, and
/// interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceTarget<'a> {
    /// Bus name owned by the service.
    pub service: &'a str,
    /// Object path exposing the interface.
    pub path: &'a str,
    /// Interface declaring the methods.
    pub interface: &'a str,
}

impl<'a> ServiceTarget<'a> {
    /// Builds a target from its three parts.
    #[must_use]
    pub const fn new(service: &'a str, path: &'a str, interface: &'a str) -> Self {
        Self {
            service,
            path,
            interface,
        }
    }
}

/// How long a call may block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CallTimeout {
    /// Block until the remote side answers or the bus fails.
    #[default]
    Never,
    /// Give up after the duration.
    After(Duration),
}

impl CallTimeout {
    /// Interprets a millisecond count, treating `0` as "no timeout".
    #[must_use]
    pub const fn from_millis(millis: u64) -> Self {
        if millis == 0 {
            Self::Never
        } else {
            Self::After(Duration::from_millis(millis))
        }
    }

    /// Returns the bound, if any.
    #[must_use]
    pub const fn duration(self) -> Option<Duration> {
        match self {
            Self::Never => None,
            Self::After(duration) => Some(duration),
        }
    }
}

/// A single method call, created per invocation and consumed by one call.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteCall {
    /// Destination bus name.
    pub service: String,
    /// Object path.
    pub path: String,
    /// Interface name.
    pub interface: String,
    /// Method name.
    pub method: String,
    /// Arguments in wire order.
    pub arguments: Vec<TypedValue>,
    /// Reply signature the caller demands; `None` discards reply values.
    pub reply: Option<Signature>,
    /// Blocking bound.
    pub timeout: CallTimeout,
}

impl RemoteCall {
    /// Starts a call to `method` on `target` with no arguments and a
    /// discarded reply.
    #[must_use]
    pub fn new(target: ServiceTarget<'_>, method: impl Into<String>) -> Self {
        Self {
            service: target.service.to_owned(),
            path: target.path.to_owned(),
            interface: target.interface.to_owned(),
            method: method.into(),
            arguments: Vec::new(),
            reply: None,
            timeout: CallTimeout::Never,
        }
    }

    /// Sets the argument tuple.
    #[must_use]
    pub fn with_arguments(mut self, arguments: Vec<TypedValue>) -> Self {
        self.arguments = arguments;
        self
    }

    /// Demands a reply matching `signature`.
    #[must_use]
    pub fn expecting(mut self, signature: Signature) -> Self {
        self.reply = Some(signature);
        self
    }

    /// Sets the blocking bound.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: CallTimeout) -> Self {
        self.timeout = timeout;
        self
    }

    /// Signature of the argument tuple.
    #[must_use]
    pub fn argument_signature(&self) -> Signature {
        Signature::of(&self.arguments)
    }
}

//! Seams between the command handlers and the bus.
//!
//! A [`ConnectionProvider`] hands out live connections; a [`BusConnection`]
//! performs raw round trips. Production code uses the zbus-backed
//! implementations in [`crate::dbus`], tests substitute stubs.

use svcprobe_config::BusScope;

use crate::call::{CallTimeout, RemoteCall};
use crate::error::BusError;
use crate::value::TypedValue;

/// A live connection able to perform one blocking round trip per call.
pub trait BusConnection {
    /// Sends `call` and waits for the reply.
    ///
    /// Implementations decode the reply against `call.reply` when it is set
    /// and may return an empty tuple when it is not.
    fn call(&self, call: &RemoteCall) -> Result<Vec<TypedValue>, BusError>;
}

/// Supplies connections to a bus scope.
pub trait ConnectionProvider {
    /// Opens a connection to the bus selected by `scope`.
    ///
    /// `timeout` bounds every call made through the returned connection.
    /// Failures use [`crate::ErrorDomain::Connection`].
    fn connect(
        &self,
        scope: BusScope,
        timeout: CallTimeout,
    ) -> Result<Box<dyn BusConnection>, BusError>;
}

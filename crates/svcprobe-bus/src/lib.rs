//! Synchronous method calls over D-Bus with typed parameter marshalling.
//!
//! The crate models a call as a [`RemoteCall`] made of self-describing
//! [`TypedValue`]s. [`invoke`] performs exactly one blocking round trip over
//! a [`BusConnection`] obtained from a [`ConnectionProvider`] and checks the
//! reply strictly against the declared [`Signature`]. All failures surface as
//! a single [`BusError`] carrying a domain, message, and numeric code.

mod call;
pub mod dbus;
mod error;
mod invoker;
mod provider;
mod value;

pub use call::{CallTimeout, RemoteCall, ServiceTarget};
pub use dbus::ZbusProvider;
pub use error::{BusError, ErrorCode, ErrorDomain};
pub use invoker::invoke;
pub use provider::{BusConnection, ConnectionProvider};
pub use value::{Signature, SignatureParseError, TypedValue, ValueKind};

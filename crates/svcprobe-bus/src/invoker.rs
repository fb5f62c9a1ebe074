//! The call invoker: one blocking round trip with strict reply checking.

use tracing::debug;

use crate::call::RemoteCall;
use crate::error::BusError;
use crate::provider::BusConnection;
use crate::value::{Signature, TypedValue};

/// Performs `call` over `connection` exactly once.
///
/// When the call declares a reply signature the returned values are checked
/// against it and a mismatch becomes a protocol error. When it does not, any
/// reply payload is dropped and an empty tuple is returned. Failures are
/// never retried because the remote methods are not known to be idempotent.
pub fn invoke(
    connection: &dyn BusConnection,
    call: &RemoteCall,
) -> Result<Vec<TypedValue>, BusError> {
    debug!(
        service = %call.service,
        path = %call.path,
        interface = %call.interface,
        method = %call.method,
        arguments = %call.argument_signature(),
        "issuing remote call"
    );
    let values = connection.call(call).inspect_err(|error| {
        debug!(method = %call.method, %error, "remote call failed");
    })?;

    let Some(expected) = call.reply.as_ref() else {
        return Ok(Vec::new());
    };
    let actual = Signature::of(&values);
    if &actual != expected {
        return Err(BusError::protocol(format!(
            "method {} returned type '({actual})' but expected '({expected})'",
            call.method
        )));
    }
    debug!(method = %call.method, reply = %actual, "remote call completed");
    Ok(values)
}

//! zbus-backed connection provider.
//!
//! Connections use the zbus blocking API. Arguments are marshalled as a
//! dynamic structure so the body signature always mirrors the typed values
//! handed in by the command handlers.

use std::io;

use serde::Serialize;
use svcprobe_config::BusScope;
use tracing::debug;
use zbus::DBusError;
use zbus::blocking::Connection;
use zbus::blocking::connection::Builder;
use zbus::message::{Body, Message};
use zbus::zvariant::{DynamicType, OwnedValue, Structure, StructureBuilder, Value};

use crate::call::{CallTimeout, RemoteCall};
use crate::error::{BusError, ErrorCode};
use crate::provider::{BusConnection, ConnectionProvider};
use crate::value::{Signature, SignatureParseError, TypedValue, ValueKind};

/// Opens zbus connections to the session or system bus.
#[derive(Debug, Default, Clone, Copy)]
pub struct ZbusProvider;

impl ConnectionProvider for ZbusProvider {
    fn connect(
        &self,
        scope: BusScope,
        timeout: CallTimeout,
    ) -> Result<Box<dyn BusConnection>, BusError> {
        debug!(%scope, ?timeout, "connecting to bus");
        let builder = match scope {
            BusScope::Session => Builder::session(),
            BusScope::System => Builder::system(),
        }
        .map_err(|error| connection_error(scope, &error))?;
        let bounded = match timeout.duration() {
            Some(duration) => builder.method_timeout(duration),
            None => builder,
        };
        let inner = bounded
            .build()
            .map_err(|error| connection_error(scope, &error))?;
        Ok(Box::new(ZbusConnection { inner }))
    }
}

/// A live zbus connection; dropping it closes the socket.
pub struct ZbusConnection {
    inner: Connection,
}

impl BusConnection for ZbusConnection {
    fn call(&self, call: &RemoteCall) -> Result<Vec<TypedValue>, BusError> {
        let reply = if call.arguments.is_empty() {
            self.send(call, &())?
        } else {
            let body = marshal_arguments(&call.arguments)?;
            self.send(call, &body)?
        };
        match call.reply.as_ref() {
            Some(expected) => decode_reply(&reply, expected),
            None => Ok(Vec::new()),
        }
    }
}

impl ZbusConnection {
    fn send<B>(&self, call: &RemoteCall, body: &B) -> Result<Message, BusError>
    where
        B: Serialize + DynamicType,
    {
        self.inner
            .call_method(
                Some(call.service.as_str()),
                call.path.as_str(),
                Some(call.interface.as_str()),
                call.method.as_str(),
                body,
            )
            .map_err(call_error)
    }
}

fn marshal_arguments(arguments: &[TypedValue]) -> Result<Structure<'_>, BusError> {
    arguments
        .iter()
        .fold(StructureBuilder::new(), |builder, argument| {
            builder.append_field(to_value(argument))
        })
        .build()
        .map_err(|error| BusError::protocol(format!("cannot marshal arguments: {error}")))
}

fn to_value(value: &TypedValue) -> Value<'_> {
    match value {
        TypedValue::Str(text) => Value::from(text.as_str()),
        TypedValue::I64(number) => Value::I64(*number),
        TypedValue::U64(number) => Value::U64(*number),
        TypedValue::Bool(flag) => Value::Bool(*flag),
        TypedValue::Double(number) => Value::F64(*number),
        TypedValue::Variant(inner) => Value::Value(Box::new(to_value(inner))),
    }
}

fn decode_reply(reply: &Message, expected: &Signature) -> Result<Vec<TypedValue>, BusError> {
    let body = reply.body();
    let actual: Signature = body
        .signature()
        .to_string()
        .parse()
        .map_err(|error: SignatureParseError| BusError::protocol(error.to_string()))?;
    if &actual != expected {
        return Err(BusError::protocol(format!(
            "reply type '({actual})' does not match expected '({expected})'"
        )));
    }

    match expected.kinds() {
        [] => Ok(Vec::new()),
        [kind] => decode_single(&body, *kind).map(|value| vec![value]),
        _ => {
            let structure: Structure<'_> = body.deserialize().map_err(decode_error)?;
            structure.fields().iter().map(from_value).collect()
        }
    }
}

fn decode_single(body: &Body, kind: ValueKind) -> Result<TypedValue, BusError> {
    let value = match kind {
        ValueKind::String => TypedValue::Str(body.deserialize::<String>().map_err(decode_error)?),
        ValueKind::Int64 => TypedValue::I64(body.deserialize::<i64>().map_err(decode_error)?),
        ValueKind::UInt64 => TypedValue::U64(body.deserialize::<u64>().map_err(decode_error)?),
        ValueKind::Boolean => TypedValue::Bool(body.deserialize::<bool>().map_err(decode_error)?),
        ValueKind::Double => TypedValue::Double(body.deserialize::<f64>().map_err(decode_error)?),
        ValueKind::Variant => {
            let inner: OwnedValue = body.deserialize().map_err(decode_error)?;
            TypedValue::Variant(Box::new(from_value(&inner)?))
        }
    };
    Ok(value)
}

fn from_value(value: &Value<'_>) -> Result<TypedValue, BusError> {
    match value {
        Value::Str(text) => Ok(TypedValue::Str(text.as_str().to_owned())),
        Value::I64(number) => Ok(TypedValue::I64(*number)),
        Value::U64(number) => Ok(TypedValue::U64(*number)),
        Value::Bool(flag) => Ok(TypedValue::Bool(*flag)),
        Value::F64(number) => Ok(TypedValue::Double(*number)),
        Value::Value(inner) => Ok(TypedValue::Variant(Box::new(from_value(inner)?))),
        other => Err(BusError::protocol(format!(
            "unsupported reply value of type '{}'",
            other.value_signature()
        ))),
    }
}

fn decode_error(error: zbus::Error) -> BusError {
    BusError::protocol(format!("cannot decode reply: {error}"))
}

fn connection_error(scope: BusScope, error: &zbus::Error) -> BusError {
    let code = match error {
        zbus::Error::Address(_) => ErrorCode::BadAddress,
        zbus::Error::Handshake(_) => ErrorCode::AuthFailed,
        zbus::Error::InputOutput(source) => match source.kind() {
            io::ErrorKind::NotFound | io::ErrorKind::ConnectionRefused => ErrorCode::NoServer,
            _ => ErrorCode::IoError,
        },
        _ => ErrorCode::Failed,
    };
    BusError::connection(format!("cannot connect to the {scope} bus: {error}"), code)
}

fn call_error(error: zbus::Error) -> BusError {
    match error {
        zbus::Error::MethodError(name, detail, _) => {
            BusError::remote(name.as_str(), detail.unwrap_or_default())
        }
        zbus::Error::FDO(fdo) => {
            BusError::remote(fdo.name().as_str(), fdo.description().unwrap_or_default())
        }
        zbus::Error::InputOutput(source) if source.kind() == io::ErrorKind::TimedOut => {
            BusError::transport(format!("timeout was reached: {source}"), ErrorCode::TimedOut)
        }
        zbus::Error::InputOutput(source) => {
            BusError::transport(source.to_string(), ErrorCode::IoError)
        }
        other => BusError::transport(other.to_string(), ErrorCode::Failed),
    }
}

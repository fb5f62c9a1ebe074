//! Test support utilities for client behavioural coverage.
//!
//! Supplies an in-memory stand-in for the test service, static configuration
//! loaders, and a harness that captures CLI output so step definitions and
//! unit tests stay focused on their assertions.

use std::cell::RefCell;
use std::ffi::OsString;
use std::process::ExitCode;
use std::rc::Rc;

use rstest::fixture;
use svcprobe_bus::{
    BusConnection, BusError, CallTimeout, ConnectionProvider, ErrorCode, RemoteCall, TypedValue,
};
use svcprobe_config::{BusScope, Config};

use crate::{AppError, ConfigLoader, IoStreams, run_with};

pub(super) struct StaticConfigLoader {
    config: Config,
}

impl StaticConfigLoader {
    pub(super) fn new(config: Config) -> Self {
        Self { config }
    }
}

impl ConfigLoader for StaticConfigLoader {
    fn load(&self, _args: &[OsString]) -> Result<Config, AppError> {
        Ok(self.config.clone())
    }
}

/// A loader that panics if called, proving dispatch stopped earlier.
pub(super) struct PanickingLoader;

impl ConfigLoader for PanickingLoader {
    fn load(&self, _args: &[OsString]) -> Result<Config, AppError> {
        panic!("configuration must not be loaded on this path");
    }
}

#[derive(Default)]
struct StubState {
    unreachable: bool,
    failure: Option<BusError>,
    reply: Option<Vec<TypedValue>>,
    connections: Vec<(BusScope, CallTimeout)>,
    calls: Vec<RemoteCall>,
}

/// In-memory test service.
///
/// `EchoString` returns its arguments, `VariantResponse` wraps a string or a
/// double, and `Wait` and `SendSignal` reply with an empty tuple.
#[derive(Clone, Default)]
pub(super) struct StubBus {
    state: Rc<RefCell<StubState>>,
}

impl StubBus {
    pub(super) fn make_unreachable(&self) {
        self.state.borrow_mut().unreachable = true;
    }

    pub(super) fn fail_calls_with(&self, error: BusError) {
        self.state.borrow_mut().failure = Some(error);
    }

    pub(super) fn reply_with(&self, values: Vec<TypedValue>) {
        self.state.borrow_mut().reply = Some(values);
    }

    pub(super) fn connections(&self) -> Vec<(BusScope, CallTimeout)> {
        self.state.borrow().connections.clone()
    }

    pub(super) fn calls(&self) -> Vec<RemoteCall> {
        self.state.borrow().calls.clone()
    }
}

impl ConnectionProvider for StubBus {
    fn connect(
        &self,
        scope: BusScope,
        timeout: CallTimeout,
    ) -> Result<Box<dyn BusConnection>, BusError> {
        let mut state = self.state.borrow_mut();
        state.connections.push((scope, timeout));
        if state.unreachable {
            return Err(BusError::connection(
                "Could not connect: No such file or directory",
                ErrorCode::FileNotFound,
            ));
        }
        Ok(Box::new(StubConnection {
            state: Rc::clone(&self.state),
        }))
    }
}

struct StubConnection {
    state: Rc<RefCell<StubState>>,
}

impl BusConnection for StubConnection {
    fn call(&self, call: &RemoteCall) -> Result<Vec<TypedValue>, BusError> {
        let mut state = self.state.borrow_mut();
        state.calls.push(call.clone());
        if let Some(error) = state.failure.clone() {
            return Err(error);
        }
        if let Some(values) = state.reply.clone() {
            return Ok(values);
        }
        match call.method.as_str() {
            "EchoString" => Ok(call.arguments.clone()),
            "VariantResponse" => {
                let inner = if call.arguments == [TypedValue::Bool(true)] {
                    TypedValue::Double(2.5)
                } else {
                    TypedValue::string("variant")
                };
                Ok(vec![TypedValue::Variant(Box::new(inner))])
            }
            "Wait" | "SendSignal" => Ok(Vec::new()),
            other => Err(BusError::remote(
                "org.freedesktop.DBus.Error.UnknownMethod",
                format!("No such method '{other}'"),
            )),
        }
    }
}

/// Captured result of one CLI run.
pub(super) struct Outcome {
    pub(super) exit: ExitCode,
    pub(super) stdout: String,
    pub(super) stderr: String,
}

pub(super) fn os_args(args: &[&str]) -> Vec<OsString> {
    args.iter().map(OsString::from).collect()
}

pub(super) fn run_client(
    args: Vec<OsString>,
    loader: &impl ConfigLoader,
    provider: &impl ConnectionProvider,
) -> Outcome {
    let mut stdout = Vec::new();
    let mut stderr = Vec::new();
    let exit = {
        let mut io = IoStreams::new(&mut stdout, &mut stderr);
        run_with(args, &mut io, loader, provider)
    };
    Outcome {
        exit,
        stdout: String::from_utf8(stdout).expect("stdout utf8"),
        stderr: String::from_utf8(stderr).expect("stderr utf8"),
    }
}

#[derive(Default)]
pub(super) struct TestWorld {
    pub(super) config: Config,
    pub(super) bus: StubBus,
    pub(super) outcome: Option<Outcome>,
}

impl TestWorld {
    pub(super) fn run(&mut self, command: &str) {
        let loader = StaticConfigLoader::new(self.config.clone());
        self.outcome = Some(run_client(Self::build_args(command), &loader, &self.bus));
    }

    fn build_args(command: &str) -> Vec<OsString> {
        let mut args = vec![OsString::from("client")];
        args.extend(
            command
                .trim()
                .trim_matches('"')
                .split_whitespace()
                .map(OsString::from),
        );
        args
    }

    pub(super) fn outcome(&self) -> &Outcome {
        self.outcome.as_ref().expect("the client has run")
    }
}

#[fixture]
pub(super) fn world() -> RefCell<TestWorld> {
    RefCell::new(TestWorld::default())
}

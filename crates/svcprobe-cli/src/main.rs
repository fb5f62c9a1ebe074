//! Entry point for the `client` binary.
//!
//! Delegates to [`svcprobe_cli::run`], which loads configuration, dispatches
//! the requested verb, and performs a single call against the test service.

use std::io::{self, StderrLock, StdoutLock};
use std::process::ExitCode;

fn main() -> ExitCode {
    let mut stdout: StdoutLock<'_> = io::stdout().lock();
    let mut stderr: StderrLock<'_> = io::stderr().lock();
    svcprobe_cli::run(std::env::args_os(), &mut stdout, &mut stderr)
}

//! Binary entrypoint for the `rouse` manifest tool.
//!
//! The binary delegates to [`rouse_cli::run`], which parses arguments,
//! loads the manifest, and writes results to the locked standard streams.

use std::io::{self, StderrLock, StdoutLock};
use std::process::ExitCode;

fn main() -> ExitCode {
    let mut stdout: StdoutLock<'_> = io::stdout().lock();
    let mut stderr: StderrLock<'_> = io::stderr().lock();
    rouse_cli::run(std::env::args_os(), &mut stdout, &mut stderr)
}

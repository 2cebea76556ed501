//! Run an external command with a time limit
//!
//! Commands are argument vectors handed straight to the OS, there is no shell in between, so
//! request values passed as arguments are never interpreted.

use std::io::{self, ErrorKind};
use std::path::Path;
use std::process::{Output, Stdio};
use std::time::Duration;

use log::{info, warn};
use tokio::process::Command;
use tokio::time::timeout;

/// How a command run ended
#[derive(Debug)]
pub enum Run {
    Exited(Output),
    /// Killed after the time limit
    TimedOut,
    SpawnFailed(io::Error),
}

/// Run `argv` (program followed by arguments) and capture its output
///
/// The child is killed if it outlives `limit`.
pub async fn run(argv: &[String], current_dir: Option<&Path>, limit: Duration) -> Run {
    let Some((program, args)) = argv.split_first() else {
        return Run::SpawnFailed(io::Error::new(ErrorKind::InvalidInput, "empty command"));
    };

    let mut cmd = Command::new(program);
    cmd.args(args).stdin(Stdio::null()).kill_on_drop(true);
    if let Some(dir) = current_dir {
        cmd.current_dir(dir);
    }
    info!("Running {:?}", cmd);

    match timeout(limit, cmd.output()).await {
        Ok(Ok(output)) => Run::Exited(output),
        Ok(Err(err)) => {
            warn!("Can't run {program}: {err}");
            Run::SpawnFailed(err)
        }
        Err(_) => {
            warn!("{program} still running after {}s, killing it", limit.as_secs_f32());
            Run::TimedOut
        }
    }
}

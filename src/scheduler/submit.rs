use std::fmt;
use std::io;

use log::{info, warn};

use crate::config::SchedulerConfig;
use crate::layout::Token;
use crate::process::{run, Run};
use crate::scheduler::SchedulerKind;

#[derive(Debug)]
pub enum SubmitError {
    SpawnFailed(io::Error),
    TimedOut,
    /// The scheduler ran and refused the job
    Rejected { code: Option<i32>, stderr: String },
    /// Exit 0 without printing a job id
    EmptyTicket,
    NotUtf8,
}

impl fmt::Display for SubmitError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SubmitError::SpawnFailed(err) => write!(f, "can't start scheduler: {err}"),
            SubmitError::TimedOut => write!(f, "scheduler did not answer in time"),
            SubmitError::Rejected { code: Some(code), stderr } => {
                write!(f, "scheduler exited with status {code}: {}", stderr.trim())
            }
            SubmitError::Rejected { code: None, stderr } => {
                write!(f, "scheduler killed by signal: {}", stderr.trim())
            }
            SubmitError::EmptyTicket => write!(f, "scheduler printed no job id"),
            SubmitError::NotUtf8 => write!(f, "scheduler job id is not UTF-8"),
        }
    }
}

impl std::error::Error for SubmitError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SubmitError::SpawnFailed(err) => Some(err),
            _ => None,
        }
    }
}

/// Scheduler arguments for one job
///
/// The token is the only request value on the command line. It names the job and is exported to
/// the job script as `random`, which uses it to find the working directory.
pub fn submit_args(config: &SchedulerConfig, token: Token) -> Vec<String> {
    let name = format!("{}{}", config.job_name_prefix, token);
    let var = format!("random={token}");
    let script = config.script.to_string_lossy().into_owned();

    match config.kind {
        SchedulerKind::Pbs => vec![
            "-S".to_string(),
            config.shell.clone(),
            script,
            "-N".to_string(),
            name,
            "-v".to_string(),
            var,
        ],
        SchedulerKind::Slurm => vec![
            "--parsable".to_string(),
            format!("--job-name={name}"),
            format!("--export=ALL,{var}"),
            script,
        ],
    }
}

/// Submit the job and return the scheduler's ticket exactly as printed
pub async fn submit(config: &SchedulerConfig, token: Token) -> Result<String, SubmitError> {
    let mut argv = config.command();
    argv.extend(submit_args(config, token));
    info!("Submitting token {token} to {}", config.kind);

    let output = match run(&argv, None, config.timeout()).await {
        Run::Exited(output) => output,
        Run::TimedOut => return Err(SubmitError::TimedOut),
        Run::SpawnFailed(err) => return Err(SubmitError::SpawnFailed(err)),
    };

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        warn!("Scheduler rejected token {token}: {}", stderr.trim());
        return Err(SubmitError::Rejected { code: output.status.code(), stderr });
    }

    let ticket = String::from_utf8(output.stdout).map_err(|_| SubmitError::NotUtf8)?;
    if ticket.trim().is_empty() {
        return Err(SubmitError::EmptyTicket);
    }
    info!("{} job id: {}", config.kind, ticket.trim());
    Ok(ticket)
}

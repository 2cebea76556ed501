//! Queue the job, or publish the working area as a failed result
//!
//! Which branch runs depends only on the extraction outcome. Either way jobid.txt is the last file
//! written to the result directory, so the viewer never sees a job id before the rest of the
//! result area is in place.

/// Recursive copy of the working area into the result area
pub mod copy;

use std::os::unix::fs::symlink;

use log::{error, info, warn};

use crate::config::Config;
use crate::dispatch::copy::copy_dir_contents;
use crate::error::StageError;
use crate::extract::Extraction;
use crate::layout::{Workspace, ENTRY_POINT, JOB_ID_FILE};
use crate::request::write::{append_status, write_new};
use crate::scheduler::submit::submit;

/// Terminal state of a staged request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// The scheduler accepted the job
    Queued { ticket: String },
    /// The chain could not be extracted, nothing was queued
    ExtractionFailed,
    /// Extraction worked but the scheduler did not take the job
    SubmissionFailed { reason: String },
}

impl Dispatch {
    pub fn is_queued(&self) -> bool {
        matches!(self, Dispatch::Queued { .. })
    }

    pub fn label(&self) -> &str {
        match self {
            Dispatch::Queued { .. } => "queued",
            Dispatch::ExtractionFailed => "extraction failed",
            Dispatch::SubmissionFailed { .. } => "submission failed",
        }
    }
}

/// Finish a request whose extraction step has run
pub async fn dispatch(config: &Config, ws: &Workspace, extraction: &Extraction) -> Result<Dispatch, StageError> {
    if !extraction.succeeded() {
        publish_failure(config, ws)?;
        return Ok(Dispatch::ExtractionFailed);
    }

    match submit(&config.scheduler, ws.token).await {
        Ok(ticket) => {
            // the job is queued, its ticket gets recorded even without the status link
            if let Err(err) = link_status(ws) {
                warn!("Can't link status log for token {}: {}", ws.token, err);
            }
            info!("Writing job id to {}", ws.job_id_file().display());
            write_new(&ws.job_id_file(), ticket.as_bytes())?;
            Ok(Dispatch::Queued { ticket })
        }
        Err(err) => {
            error!("Submission failed for token {}: {}", ws.token, err);
            if let Err(status_err) = append_status(ws, &format!("The job could not be queued: {err}")) {
                warn!("Can't update status log for token {}: {}", ws.token, status_err);
            }
            publish_failure(config, ws)?;
            Ok(Dispatch::SubmissionFailed { reason: err.to_string() })
        }
    }
}

/// Point the result area at the live status log of the queued job
fn link_status(ws: &Workspace) -> Result<(), StageError> {
    let link = ws.status_link();
    let target = ws.status_file();
    info!("Linking {} -> {}", link.display(), target.display());
    symlink(&target, &link).map_err(|err| StageError::io(&link, err))
}

/// Copy the working area into the result area and mark it with the failure job id
fn publish_failure(config: &Config, ws: &Workspace) -> Result<(), StageError> {
    warn!("No job queued for token {}, publishing working area", ws.token);
    let copied = copy_dir_contents(&ws.working, &ws.result, &[JOB_ID_FILE, ENTRY_POINT])?;
    info!("Copied {} entries from {} to {}", copied, ws.working.display(), ws.result.display());

    let sentinel = format!("{}\n", config.failure_job_id);
    write_new(&ws.job_id_file(), sentinel.as_bytes())
}

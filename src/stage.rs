//! One request from validated input to redirect
//!
//! allocate -> link entry point -> write request -> extract chain -> dispatch -> respond

use std::fs;

use log::{error, info, warn};

use crate::config::Config;
use crate::dispatch::{dispatch, Dispatch};
use crate::error::{InputError, StageError};
use crate::extract::{extract_chain, Extraction};
use crate::layout::Workspace;
use crate::request::chain::ChainQuery;
use crate::request::write::write_request;
use crate::response::{self, Response};
use crate::workspace::allocate::{allocate, TokenSource};
use crate::workspace::init::link_entry_point;

/// A request that made it to a terminal dispatch state
#[derive(Debug)]
pub struct Staged {
    pub workspace: Workspace,
    pub extraction: Extraction,
    pub dispatch: Dispatch,
}

/// Overall result of handling one request, decides the exit code
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Verdict {
    /// Redirected to a results page, whether or not a job was queued
    Redirected,
    Rejected,
    Fatal,
    /// Redirected, but the scheduler did not accept the job
    SubmissionFailed,
}

impl Verdict {
    pub fn exit_code(&self) -> u8 {
        match self {
            Verdict::Redirected => 0,
            Verdict::Fatal => 1,
            Verdict::Rejected => 2,
            Verdict::SubmissionFailed => 3,
        }
    }
}

/// Stage a validated request and hand it to the scheduler
pub async fn stage<S: TokenSource>(config: &Config, query: &ChainQuery, source: &mut S) -> Result<Staged, StageError> {
    let layout = config.layout();
    let ws = allocate(&layout, &config.allocation, source)?;
    info!("Staging {} as token {}", query, ws.token);

    if let Err(err) = link_entry_point(&layout, &ws).and_then(|_| write_request(query, &ws)) {
        discard(&ws);
        return Err(err);
    }

    let extraction = extract_chain(&config.extraction, &ws).await;
    let dispatch = dispatch(config, &ws, &extraction).await?;
    info!("Token {} finished: {}", ws.token, dispatch.label());

    Ok(Staged { workspace: ws, extraction, dispatch })
}

/// Remove a workspace that failed before anything could use it
fn discard(ws: &Workspace) {
    for dir in [&ws.result, &ws.working] {
        if let Err(err) = fs::remove_dir_all(dir) {
            warn!("Can't remove {}: {}", dir.display(), err);
        }
    }
}

/// Turn raw input into the response shown to the user
pub async fn handle<S: TokenSource>(
    config: &Config,
    input: Result<ChainQuery, InputError>,
    source: &mut S,
) -> (Response, Verdict) {
    let query = match input {
        Ok(query) => query,
        Err(err) => {
            warn!("Rejected request: {err}");
            return (response::text(err), Verdict::Rejected);
        }
    };

    let staged = match stage(config, &query, source).await {
        Ok(staged) => staged,
        Err(err) => {
            error!("Staging failed: {err}");
            return (response::text(format!("Sorry, the job could not be prepared: {err}")), Verdict::Fatal);
        }
    };

    let verdict = match staged.dispatch {
        Dispatch::SubmissionFailed { .. } => Verdict::SubmissionFailed,
        _ => Verdict::Redirected,
    };
    match response::redirect(&config.response, &query, staged.workspace.token, &staged.dispatch) {
        Ok(page) => (page, verdict),
        Err(err) => {
            error!("Can't render redirect: {err}");
            let url = response::results_url(&config.response, staged.workspace.token);
            (response::text(format!("Your results will appear at {url}")), verdict)
        }
    }
}

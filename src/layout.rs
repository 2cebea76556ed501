//! Directory layout of the staging root and the public results root
//!
//! Every path the stager touches is built here, so the on-disk layout has a single definition:
//!
//! ```text
//! <staging_root>/<token>/list.txt        request, "<pdb_id> <chain>"
//! <staging_root>/<token>/error.txt       status log, read and appended by the extraction step
//! <results_root>/<token>/index.php       link to the shared result viewer
//! <results_root>/<token>/jobid.txt       scheduler ticket or failure sentinel
//! <results_root>/<token>/error_link.txt  link to the working status log (queued jobs only)
//! ```
use std::fmt;
use std::path::PathBuf;

/// Request file read by the extraction step
pub const LIST_FILE: &str = "list.txt";
/// Human readable status log
pub const STATUS_FILE: &str = "error.txt";
/// Scheduler ticket, or the failure sentinel
pub const JOB_ID_FILE: &str = "jobid.txt";
/// Link from the result area to the live status log
pub const STATUS_LINK: &str = "error_link.txt";
/// Entry point served by the result viewer
pub const ENTRY_POINT: &str = "index.php";

/// Numeric identifier naming one request's working and result directories
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Token(pub u32);

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone)]
pub struct Layout {
    pub staging_root: PathBuf,
    pub results_root: PathBuf,
    /// Shared viewer resource that every result directory links to
    pub viewer: PathBuf,
}

impl Layout {
    pub fn working_dir(&self, token: Token) -> PathBuf {
        self.staging_root.join(token.to_string())
    }

    pub fn result_dir(&self, token: Token) -> PathBuf {
        self.results_root.join(token.to_string())
    }
}

/// The matched pair of directories claimed for one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    pub token: Token,
    pub working: PathBuf,
    pub result: PathBuf,
}

impl Workspace {
    pub fn list_file(&self) -> PathBuf {
        self.working.join(LIST_FILE)
    }

    pub fn status_file(&self) -> PathBuf {
        self.working.join(STATUS_FILE)
    }

    pub fn job_id_file(&self) -> PathBuf {
        self.result.join(JOB_ID_FILE)
    }

    pub fn status_link(&self) -> PathBuf {
        self.result.join(STATUS_LINK)
    }

    pub fn entry_point(&self) -> PathBuf {
        self.result.join(ENTRY_POINT)
    }
}

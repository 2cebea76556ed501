//! Deployment configuration, read from a JSON file
//!
//! Every field has a default matching the original web server layout, so an empty object `{}` is
//! a complete configuration.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use log::info;
use serde::{Deserialize, Serialize};

use crate::layout::Layout;
use crate::scheduler::SchedulerKind;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Private root holding one working directory per request
    #[serde(default = "default_staging_root")]
    pub staging_root: PathBuf,

    /// Public root served by the web server, one result directory per request
    #[serde(default = "default_results_root")]
    pub results_root: PathBuf,

    /// Result viewer linked into every result directory
    #[serde(default = "default_viewer")]
    pub viewer: PathBuf,

    /// Written to jobid.txt when no job was queued
    #[serde(default = "default_failure_job_id")]
    pub failure_job_id: String,

    #[serde(default)]
    pub allocation: AllocationConfig,

    #[serde(default)]
    pub extraction: ExtractionConfig,

    #[serde(default)]
    pub scheduler: SchedulerConfig,

    #[serde(default)]
    pub response: ResponseConfig,
}

/// Token range and retry bound for the identifier allocator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocationConfig {
    #[serde(default = "default_min_token")]
    pub min_token: u32,

    #[serde(default = "default_max_token")]
    pub max_token: u32,

    /// Give up after this many contested tokens
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

/// Chain extraction command, run inside the working directory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Program followed by its arguments, never passed through a shell
    #[serde(default = "default_extraction_command")]
    pub command: Vec<String>,

    #[serde(default = "default_extraction_timeout")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    #[serde(default)]
    pub kind: SchedulerKind,

    /// Submission program plus leading arguments, defaults to qsub or sbatch by `kind`
    #[serde(default)]
    pub command: Option<Vec<String>>,

    /// Job script handed to the scheduler
    #[serde(default = "default_job_script")]
    pub script: PathBuf,

    /// Interpreter for the job script (PBS `-S`)
    #[serde(default = "default_job_shell")]
    pub shell: String,

    /// Job name is this prefix followed by the token
    #[serde(default = "default_job_name_prefix")]
    pub job_name_prefix: String,

    #[serde(default = "default_submit_timeout")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseConfig {
    /// Base URL of the results pages, the token is appended
    #[serde(default = "default_results_url")]
    pub results_url: String,

    #[serde(default = "default_redirect_delay")]
    pub redirect_delay_secs: u32,
}

fn default_staging_root() -> PathBuf {
    PathBuf::from("/scratch/working")
}

fn default_results_root() -> PathBuf {
    PathBuf::from("/var/www/html/conserv/results")
}

fn default_viewer() -> PathBuf {
    PathBuf::from("/var/www/html/conserv/scripts/index.php")
}

fn default_failure_job_id() -> String {
    "999999.limlab".to_string()
}

fn default_min_token() -> u32 {
    1
}

fn default_max_token() -> u32 {
    1_000_000
}

fn default_max_attempts() -> u32 {
    100
}

fn default_extraction_command() -> Vec<String> {
    vec!["/var/www/html/conserv/scripts/get_check_chain.sh".to_string()]
}

fn default_extraction_timeout() -> u64 {
    300
}

fn default_job_script() -> PathBuf {
    PathBuf::from("/var/www/html/conserv/scripts/submit.sub")
}

fn default_job_shell() -> String {
    "/bin/bash".to_string()
}

fn default_job_name_prefix() -> String {
    "C_".to_string()
}

fn default_submit_timeout() -> u64 {
    60
}

fn default_results_url() -> String {
    "http://conserv.limlab.dnsalias.org/results".to_string()
}

fn default_redirect_delay() -> u32 {
    5
}

impl Default for Config {
    fn default() -> Self {
        Self {
            staging_root: default_staging_root(),
            results_root: default_results_root(),
            viewer: default_viewer(),
            failure_job_id: default_failure_job_id(),
            allocation: AllocationConfig::default(),
            extraction: ExtractionConfig::default(),
            scheduler: SchedulerConfig::default(),
            response: ResponseConfig::default(),
        }
    }
}

impl Default for AllocationConfig {
    fn default() -> Self {
        Self {
            min_token: default_min_token(),
            max_token: default_max_token(),
            max_attempts: default_max_attempts(),
        }
    }
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            command: default_extraction_command(),
            timeout_secs: default_extraction_timeout(),
        }
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            kind: SchedulerKind::default(),
            command: None,
            script: default_job_script(),
            shell: default_job_shell(),
            job_name_prefix: default_job_name_prefix(),
            timeout_secs: default_submit_timeout(),
        }
    }
}

impl Default for ResponseConfig {
    fn default() -> Self {
        Self {
            results_url: default_results_url(),
            redirect_delay_secs: default_redirect_delay(),
        }
    }
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self> {
        info!("Reading configuration {}", path.display());
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        let alloc = &self.allocation;
        if alloc.min_token == 0 || alloc.min_token > alloc.max_token {
            bail!("allocation token range {}..={} is empty or includes 0", alloc.min_token, alloc.max_token);
        }
        if alloc.max_attempts == 0 {
            bail!("allocation.max_attempts must be at least 1");
        }
        if self.extraction.command.is_empty() {
            bail!("extraction.command must name a program");
        }
        if matches!(&self.scheduler.command, Some(command) if command.is_empty()) {
            bail!("scheduler.command must name a program");
        }
        if self.failure_job_id.trim().is_empty() {
            bail!("failure_job_id must not be empty");
        }
        Ok(())
    }

    pub fn layout(&self) -> Layout {
        Layout {
            staging_root: self.staging_root.clone(),
            results_root: self.results_root.clone(),
            viewer: self.viewer.clone(),
        }
    }
}

impl ExtractionConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl SchedulerConfig {
    /// Submission program and leading arguments
    pub fn command(&self) -> Vec<String> {
        match &self.command {
            Some(command) => command.clone(),
            None => vec![self.kind.default_program().to_string()],
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

//! Hand a staged job to the batch queue

/// Build and run the qsub / sbatch submission command
pub mod submit;

use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Batch scheduler family, decides the submission command line
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchedulerKind {
    /// PBS / Torque `qsub`
    #[default]
    Pbs,
    /// SLURM `sbatch --parsable`
    Slurm,
}

impl SchedulerKind {
    pub fn default_program(&self) -> &'static str {
        match self {
            SchedulerKind::Pbs => "/usr/local/bin/qsub",
            SchedulerKind::Slurm => "/usr/bin/sbatch",
        }
    }
}

impl fmt::Display for SchedulerKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SchedulerKind::Pbs => write!(f, "pbs"),
            SchedulerKind::Slurm => write!(f, "slurm"),
        }
    }
}

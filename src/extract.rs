//! Run the chain extraction step against a working directory
//!
//! The extraction script reads list.txt, fetches the PDB entry and writes the chain, logging its
//! progress into error.txt itself. Its exit status is the only thing observed here: 0 means the
//! chain was extracted, anything else that it wasn't.

use log::{debug, info, warn};

use crate::config::ExtractionConfig;
use crate::layout::Workspace;
use crate::process::{run, Run};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    Extracted,
    Failed { code: Option<i32> },
    TimedOut,
    SpawnFailed,
}

impl Extraction {
    pub fn succeeded(&self) -> bool {
        matches!(self, Extraction::Extracted)
    }
}

/// Run the extraction command inside the working directory
///
/// Never fails: a command that can't start or hangs past the timeout is a failed extraction.
pub async fn extract_chain(config: &ExtractionConfig, ws: &Workspace) -> Extraction {
    info!("Extracting chain for token {} in {}", ws.token, ws.working.display());

    let outcome = match run(&config.command, Some(&ws.working), config.timeout()).await {
        Run::Exited(output) => {
            debug!("extraction stdout: {}", String::from_utf8_lossy(&output.stdout));
            debug!("extraction stderr: {}", String::from_utf8_lossy(&output.stderr));
            if output.status.success() {
                Extraction::Extracted
            } else {
                Extraction::Failed { code: output.status.code() }
            }
        }
        Run::TimedOut => Extraction::TimedOut,
        Run::SpawnFailed(_) => Extraction::SpawnFailed,
    };

    match &outcome {
        Extraction::Extracted => info!("Chain extracted for token {}", ws.token),
        other => warn!("Extraction failed for token {}: {:?}", ws.token, other),
    }
    outcome
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;
    use crate::layout::Token;

    fn workspace(dir: &TempDir) -> Workspace {
        let working = dir.path().join("working");
        fs::create_dir(&working).unwrap();
        fs::write(working.join("list.txt"), "1abc A").unwrap();
        Workspace { token: Token(11), working, result: dir.path().join("result") }
    }

    fn config(script: &str, timeout_secs: u64) -> ExtractionConfig {
        ExtractionConfig {
            command: vec!["/bin/sh".to_string(), "-c".to_string(), script.to_string()],
            timeout_secs,
        }
    }

    #[tokio::test]
    async fn runs_inside_working_directory() {
        let dir = TempDir::new().unwrap();
        let ws = workspace(&dir);

        let outcome = extract_chain(&config("test -f list.txt && cp list.txt input.pdb", 10), &ws).await;

        assert_eq!(outcome, Extraction::Extracted);
        assert!(outcome.succeeded());
        assert_eq!(fs::read_to_string(ws.working.join("input.pdb")).unwrap(), "1abc A");
    }

    #[tokio::test]
    async fn nonzero_exit_is_failure() {
        let dir = TempDir::new().unwrap();
        let ws = workspace(&dir);

        let outcome = extract_chain(&config("exit 2", 10), &ws).await;

        assert_eq!(outcome, Extraction::Failed { code: Some(2) });
        assert!(!outcome.succeeded());
    }

    #[tokio::test]
    async fn hang_is_failure() {
        let dir = TempDir::new().unwrap();
        let ws = workspace(&dir);

        let outcome = extract_chain(&config("sleep 30", 1), &ws).await;

        assert_eq!(outcome, Extraction::TimedOut);
    }

    #[tokio::test]
    async fn missing_script_is_failure() {
        let dir = TempDir::new().unwrap();
        let ws = workspace(&dir);
        let config = ExtractionConfig { command: vec![dir.path().join("absent.sh").display().to_string()], timeout_secs: 5 };

        assert_eq!(extract_chain(&config, &ws).await, Extraction::SpawnFailed);
    }
}

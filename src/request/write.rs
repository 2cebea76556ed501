use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use chrono::Utc;
use log::info;

use crate::error::StageError;
use crate::layout::Workspace;
use crate::request::chain::ChainQuery;

/// First line of every status log
pub static PREPARING: &str = "Preparing and checking the input files\n";

/// Write the request and the initial status line into the working directory
///
/// Both files are synced before returning, the extraction step reads them straight after.
pub fn write_request(query: &ChainQuery, ws: &Workspace) -> Result<(), StageError> {
    let list = ws.list_file();
    info!("Writing request {} to {}", query, list.display());
    write_new(&list, query.to_string().as_bytes())?;

    let status = ws.status_file();
    info!("Writing initial status to {}", status.display());
    write_new(&status, PREPARING.as_bytes())
}

/// Append a timestamped line to the status log shown by the result viewer
pub fn append_status(ws: &Workspace, message: &str) -> Result<(), StageError> {
    let status = ws.status_file();
    let mut file = OpenOptions::new()
        .append(true)
        .open(&status)
        .map_err(|err| StageError::io(&status, err))?;

    let line = format!("[{}] {}\n", Utc::now().format("%Y-%m-%d %H:%M:%S UTC"), message);
    file.write_all(line.as_bytes())
        .and_then(|_| file.sync_all())
        .map_err(|err| StageError::io(&status, err))
}

/// Create a file that must not exist yet, write it, and flush it to disk
pub(crate) fn write_new(path: &Path, content: &[u8]) -> Result<(), StageError> {
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(|err| StageError::io(path, err))?;

    file.write_all(content)
        .and_then(|_| file.sync_all())
        .map_err(|err| StageError::io(path, err))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;
    use crate::layout::Token;

    fn workspace(dir: &TempDir) -> Workspace {
        let working = dir.path().join("working");
        let result = dir.path().join("result");
        fs::create_dir(&working).unwrap();
        fs::create_dir(&result).unwrap();
        Workspace { token: Token(7), working, result }
    }

    #[test]
    fn writes_list_and_status() {
        let dir = TempDir::new().unwrap();
        let ws = workspace(&dir);
        let query = ChainQuery::new("1abc", "a").unwrap();

        write_request(&query, &ws).unwrap();

        assert_eq!(fs::read_to_string(ws.list_file()).unwrap(), "1abc A");
        assert_eq!(fs::read_to_string(ws.status_file()).unwrap(), PREPARING);
    }

    #[test]
    fn refuses_to_overwrite() {
        let dir = TempDir::new().unwrap();
        let ws = workspace(&dir);
        fs::write(ws.list_file(), "9xyz Q").unwrap();
        let query = ChainQuery::new("1abc", "A").unwrap();

        let err = write_request(&query, &ws).unwrap_err();

        assert!(matches!(err, StageError::Io { .. }));
        assert_eq!(fs::read_to_string(ws.list_file()).unwrap(), "9xyz Q");
    }

    #[test]
    fn appends_after_preparing_line() {
        let dir = TempDir::new().unwrap();
        let ws = workspace(&dir);
        write_request(&ChainQuery::new("1abc", "A").unwrap(), &ws).unwrap();

        append_status(&ws, "Job submission failed").unwrap();

        let status = fs::read_to_string(ws.status_file()).unwrap();
        let lines: Vec<&str> = status.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], PREPARING.trim_end());
        assert!(lines[1].starts_with('['));
        assert!(lines[1].ends_with("] Job submission failed"));
    }
}

use std::os::unix::fs::symlink;

use log::info;

use crate::error::StageError;
use crate::layout::{Layout, Workspace};

/// Link the shared result viewer into the result directory
///
/// From here on the result page for this token resolves, showing a pending job until jobid.txt
/// exists.
pub fn link_entry_point(layout: &Layout, ws: &Workspace) -> Result<(), StageError> {
    let entry = ws.entry_point();
    info!("Linking {} -> {}", entry.display(), layout.viewer.display());
    symlink(&layout.viewer, &entry).map_err(|err| StageError::io(&entry, err))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;
    use crate::layout::Token;

    #[test]
    fn entry_point_resolves_to_viewer() {
        let dir = TempDir::new().unwrap();
        let layout = Layout {
            staging_root: dir.path().join("working"),
            results_root: dir.path().join("results"),
            viewer: dir.path().join("index.php"),
        };
        fs::write(&layout.viewer, "<?php // viewer").unwrap();
        let ws = Workspace {
            token: Token(3),
            working: layout.working_dir(Token(3)),
            result: layout.result_dir(Token(3)),
        };
        fs::create_dir_all(&ws.result).unwrap();

        link_entry_point(&layout, &ws).unwrap();

        assert_eq!(fs::read_link(ws.entry_point()).unwrap(), layout.viewer);
        assert_eq!(fs::read_to_string(ws.entry_point()).unwrap(), "<?php // viewer");
        // a second link over the same entry point is refused
        assert!(link_entry_point(&layout, &ws).is_err());
    }
}

use std::fs::{self, DirBuilder};
use std::io::{self, ErrorKind};
use std::os::unix::fs::{symlink, DirBuilderExt};
use std::path::Path;

use log::debug;
use walkdir::WalkDir;

use crate::error::StageError;

/// Copy everything inside `src` into `dst`, like `rsync -a src/ dst/`
///
/// Files already in `dst` are overwritten, symlinks are copied as links and never followed on
/// either side. Top level entries named in `reserved` belong to `dst` and are skipped together
/// with anything below them. Returns the number of entries copied.
pub fn copy_dir_contents(src: &Path, dst: &Path, reserved: &[&str]) -> Result<u64, StageError> {
    let walk = WalkDir::new(src)
        .follow_links(false)
        .min_depth(1)
        .into_iter()
        .filter_entry(|entry| {
            let skip = entry.depth() == 1
                && entry.file_name().to_str().is_some_and(|name| reserved.contains(&name));
            if skip {
                debug!("Skipping reserved {}", entry.path().display());
            }
            !skip
        });

    let mut copied = 0;
    for entry in walk {
        let entry = entry.map_err(|err| {
            let path = err.path().unwrap_or(src).to_path_buf();
            StageError::io(&path, err.into())
        })?;
        let from = entry.path();
        let rel = from
            .strip_prefix(src)
            .map_err(|_| StageError::io(from, io::Error::new(ErrorKind::Other, "entry outside copy root")))?;
        let to = dst.join(rel);
        let file_type = entry.file_type();

        if file_type.is_dir() {
            if !is_real_dir(&to) {
                clear(&to)?;
                DirBuilder::new().mode(0o700).create(&to).map_err(|err| StageError::io(&to, err))?;
            }
        } else if file_type.is_symlink() {
            let target = fs::read_link(from).map_err(|err| StageError::io(from, err))?;
            clear(&to)?;
            symlink(&target, &to).map_err(|err| StageError::io(&to, err))?;
        } else {
            // a link in the way would be written through
            if fs::symlink_metadata(&to).is_ok_and(|meta| meta.file_type().is_symlink()) {
                clear(&to)?;
            }
            fs::copy(from, &to).map_err(|err| StageError::io(&to, err))?;
        }
        copied += 1;
    }
    Ok(copied)
}

/// A directory that is not a symlink to one
fn is_real_dir(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok_and(|meta| meta.file_type().is_dir())
}

/// Remove whatever sits at `path`, without following links
fn clear(path: &Path) -> Result<(), StageError> {
    let Ok(meta) = fs::symlink_metadata(path) else {
        return Ok(());
    };
    let removed = if meta.file_type().is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    };
    removed.map_err(|err| StageError::io(path, err))
}

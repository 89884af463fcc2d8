//! Cleanup engine.
//!
//! Removes the files this tool generates, and the directory trees created to
//! hold them — but only when a tree contains no files at all, at any depth.
//! A tree holding even one unrelated file is left untouched.

use camino::Utf8Path;
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;

use crate::error::ManpageError;
use crate::pagespec::ManpageTarget;

/// Removes every configured manual page and any now-empty destination trees.
///
/// Uses only the structural parse of each spec; no rendering defaults are
/// needed for cleaning. Missing files are silently skipped, so the operation
/// is idempotent.
///
/// # Errors
///
/// Returns [`ManpageError::Io`] only for real filesystem failures, never for
/// already-absent files or directories.
pub fn clean_pages(
    targets: &[ManpageTarget],
    project_root: &Utf8Path,
) -> Result<(), ManpageError> {
    tracing::info!("Cleaning manual pages");

    for target in targets {
        remove_file_if_present(&target.output_path(project_root))?;
    }

    let mut seen: Vec<&Utf8Path> = Vec::new();
    for target in targets {
        if target.manpage_dir.as_str().is_empty() || seen.contains(&target.manpage_dir.as_path()) {
            continue;
        }
        seen.push(target.manpage_dir.as_path());

        let folder = target.output_dir(project_root);
        if folder == *project_root {
            continue;
        }
        remove_tree_if_only_subdirectories(&folder)?;
    }

    tracing::info!("Finished cleaning manual pages");
    Ok(())
}

fn remove_file_if_present(path: &Utf8Path) -> Result<(), ManpageError> {
    let Some(parent) = path.parent() else {
        return Ok(());
    };
    let Some(file_name) = path.file_name() else {
        return Ok(());
    };
    let Some(dir) = open_optional_dir(parent)? else {
        return Ok(());
    };

    match dir.remove_file(file_name) {
        Ok(()) => {
            tracing::debug!("Removing {path}");
            Ok(())
        }
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(ManpageError::Io {
            path: path.to_path_buf(),
            source: err,
        }),
    }
}

/// Removes a directory tree only when it contains no files anywhere in its
/// subtree. A missing directory is not an error.
fn remove_tree_if_only_subdirectories(folder: &Utf8Path) -> Result<(), ManpageError> {
    let Some(dir) = open_optional_dir(folder)? else {
        return Ok(());
    };
    if !has_only_subdirectories(&dir, folder)? {
        return Ok(());
    }
    drop(dir);

    tracing::debug!("Removing {folder}");
    let parent = folder
        .parent()
        .ok_or_else(|| ManpageError::Message(format!("{folder} has no parent directory")))?;
    let name = folder
        .file_name()
        .ok_or_else(|| ManpageError::Message(format!("{folder} has no directory name")))?;
    let parent_dir = Dir::open_ambient_dir(parent, ambient_authority()).map_err(|io_err| {
        ManpageError::Io {
            path: parent.to_path_buf(),
            source: io_err,
        }
    })?;
    parent_dir
        .remove_dir_all(name)
        .map_err(|io_err| ManpageError::Io {
            path: folder.to_path_buf(),
            source: io_err,
        })
}

/// Recursively checks whether a directory holds only subdirectories and no
/// files, at any depth.
///
/// # Errors
///
/// Returns [`ManpageError::Io`] when a directory entry cannot be inspected.
pub fn has_only_subdirectories(dir: &Dir, base: &Utf8Path) -> Result<bool, ManpageError> {
    for entry_result in dir.read_dir(".").map_err(|err| ManpageError::Io {
        path: base.to_path_buf(),
        source: err,
    })? {
        let entry = entry_result.map_err(|err| ManpageError::Io {
            path: base.to_path_buf(),
            source: err,
        })?;
        let file_type = entry.file_type().map_err(|err| ManpageError::Io {
            path: base.to_path_buf(),
            source: err,
        })?;

        if !file_type.is_dir() {
            return Ok(false);
        }

        let name = entry.file_name().map_err(|err| ManpageError::Io {
            path: base.to_path_buf(),
            source: err,
        })?;
        let subdir = dir.open_dir(&name).map_err(|err| ManpageError::Io {
            path: base.join(&name),
            source: err,
        })?;
        if !has_only_subdirectories(&subdir, &base.join(&name))? {
            return Ok(false);
        }
    }
    Ok(true)
}

fn open_optional_dir(path: &Utf8Path) -> Result<Option<Dir>, ManpageError> {
    match Dir::open_ambient_dir(path, ambient_authority()) {
        Ok(dir) => Ok(Some(dir)),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(ManpageError::Io {
            path: path.to_path_buf(),
            source: err,
        }),
    }
}

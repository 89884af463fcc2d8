//! Manual page file writer using `cap_std` for filesystem operations.

use camino::Utf8Path;
use cap_std::ambient_authority;
use cap_std::fs_utf8::{Dir, OpenOptions};
use std::io::Write;

use crate::error::ManpageError;

/// Writes rendered manual page content to `path`, creating the destination
/// directory tree as needed.
///
/// # Errors
///
/// Returns [`ManpageError::Io`] when the directory cannot be created or the
/// file cannot be written.
pub fn write_page(path: &Utf8Path, content: &str) -> Result<(), ManpageError> {
    let parent = path
        .parent()
        .ok_or_else(|| ManpageError::Message(format!("{path} has no parent directory")))?;
    let file_name = path
        .file_name()
        .ok_or_else(|| ManpageError::Message(format!("{path} has no file name")))?;

    let dir = ensure_dir(parent)?;
    let mut file = dir
        .open_with(
            file_name,
            OpenOptions::new().write(true).create(true).truncate(true),
        )
        .map_err(|io_err| ManpageError::Io {
            path: path.to_path_buf(),
            source: io_err,
        })?;

    file.write_all(content.as_bytes())
        .map_err(|io_err| ManpageError::Io {
            path: path.to_path_buf(),
            source: io_err,
        })
}

fn ensure_dir(path: &Utf8Path) -> Result<Dir, ManpageError> {
    match Dir::open_ambient_dir(path, ambient_authority()) {
        Ok(dir) => Ok(dir),
        Err(open_err) if open_err.kind() == std::io::ErrorKind::NotFound => {
            Dir::create_ambient_dir_all(path, ambient_authority()).map_err(|io_err| {
                ManpageError::Io {
                    path: path.to_path_buf(),
                    source: io_err,
                }
            })?;
            Dir::open_ambient_dir(path, ambient_authority()).map_err(|io_err| ManpageError::Io {
                path: path.to_path_buf(),
                source: io_err,
            })
        }
        Err(open_err) => Err(ManpageError::Io {
            path: path.to_path_buf(),
            source: open_err,
        }),
    }
}

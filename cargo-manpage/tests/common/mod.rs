//! Shared helpers for `cargo-manpage` integration tests.

use camino::{Utf8Path, Utf8PathBuf};

use cargo_manpage::config::ManpageConfig;
use cargo_manpage::metadata::ProjectContext;

/// Creates a temporary project root.
pub fn sandbox() -> (tempfile::TempDir, Utf8PathBuf) {
    let tempdir = tempfile::tempdir().expect("create temp dir");
    let root =
        Utf8PathBuf::from_path_buf(tempdir.path().to_path_buf()).expect("tempdir path is UTF-8");
    (tempdir, root)
}

/// Builds a minimal project context rooted at `root` running `command` as the
/// external generator.
pub fn project(root: &Utf8Path, command: &str) -> ProjectContext {
    ProjectContext {
        package_name: "demo".to_owned(),
        version: "1.0.0".to_owned(),
        authors: Vec::new(),
        urls: Vec::new(),
        project_root: root.to_path_buf(),
        config: ManpageConfig {
            pages: Vec::new(),
            include_url: true,
            force_command_line: false,
            command: command.to_owned(),
        },
    }
}

/// Writes a file beneath `root`, creating parent directories.
pub fn write_file(root: &Utf8Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent.as_std_path()).expect("create parent directories");
    }
    std::fs::write(path.as_std_path(), contents).expect("write file");
}

/// Writes an executable shell script beneath `root` and returns its path.
#[cfg(unix)]
pub fn write_script(root: &Utf8Path, relative: &str, body: &str) -> Utf8PathBuf {
    use std::os::unix::fs::PermissionsExt;

    write_file(root, relative, body);
    let path = root.join(relative);
    let mut permissions = std::fs::metadata(path.as_std_path())
        .expect("script metadata")
        .permissions();
    permissions.set_mode(0o755);
    std::fs::set_permissions(path.as_std_path(), permissions).expect("mark script executable");
    path
}

//! External command-line generation.
//!
//! Fallback (and optionally forced) generation strategy: the resolved page
//! options are marshalled into the argument vector of an external generator
//! program, which is run synchronously with its output captured.

use camino::Utf8Path;
use std::process::Command;

use crate::error::ManpageError;
use crate::pagespec::ManpageTarget;

/// Builds the generator argument vector equivalent to the resolved options.
///
/// Scalar options become `--option-name value` flags with underscores
/// replaced by hyphens; authors become repeated `--author` / `--author-email`
/// pairs with the email wrapped in angle brackets.
pub fn command_arguments(target: &ManpageTarget, project_root: &Utf8Path) -> Vec<String> {
    let options = &target.options;
    let mut args = vec![
        "--output".to_owned(),
        target.output_path(project_root).into_string(),
    ];

    if let Some((kind, name)) = &options.object {
        args.push(format!("--{}", kind.key()));
        args.push(name.clone());
    }
    if let Some((kind, source)) = &options.import {
        args.push(format!("--{}", kind.key()));
        args.push(source.clone());
    }
    if let Some(format) = &options.format {
        args.push("--format".to_owned());
        args.push(format.clone());
    }

    for author in &options.authors {
        args.push("--author".to_owned());
        args.push(author.name.clone());
        args.push("--author-email".to_owned());
        args.push(format!("<{}>", author.email));
    }

    for (key, value) in options.scalars() {
        args.push(format!("--{}", key.replace('_', "-")));
        args.push(value.to_owned());
    }

    args
}

/// Runs the external generator and fails on a non-zero exit.
///
/// # Errors
///
/// Returns [`ManpageError::Generation`] with the captured standard output
/// and error streams when the subprocess exits non-zero, and
/// [`ManpageError::Io`] when it cannot be spawned at all.
pub fn run_command(program: &str, args: &[String]) -> Result<(), ManpageError> {
    tracing::debug!("{} {}", program, args.join(" "));

    let output = Command::new(program)
        .args(args)
        .output()
        .map_err(|io_err| ManpageError::Io {
            path: Utf8Path::new(program).to_path_buf(),
            source: io_err,
        })?;

    if output.status.success() {
        return Ok(());
    }

    let status = output.status.code().unwrap_or(-1);
    let message = format!(
        "{}{}",
        String::from_utf8_lossy(&output.stderr),
        String::from_utf8_lossy(&output.stdout)
    );
    Err(ManpageError::Generation {
        command: program.to_owned(),
        status,
        message,
    })
}

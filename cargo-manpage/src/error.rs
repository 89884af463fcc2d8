//! Error types for `cargo-manpage`.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors surfaced by the `cargo-manpage` pipeline.
///
/// Variants fall into three families: configuration errors are
/// user-correctable and abort the current operation before any generation is
/// attempted; [`ManpageError::Render`] is recoverable inside the generation
/// driver via the command-line fallback; [`ManpageError::Generation`] has no
/// further fallback and aborts the whole run.
#[derive(Debug, Error)]
pub enum ManpageError {
    /// `cargo metadata` could not be executed or parsed.
    #[error("cargo metadata failed: {0}")]
    Metadata(#[from] cargo_metadata::Error),

    /// The configuration table has the wrong shape.
    #[error("failed to parse [package.metadata.manpage]: {0}")]
    MetadataJson(#[from] serde_json::Error),

    /// The requested package is not a workspace member.
    #[error("package '{0}' not found in workspace")]
    PackageNotFound(String),

    /// No package was named and the workspace has no root package.
    #[error("workspace root package was not available; pass --package")]
    WorkspaceRootMissing,

    /// The configuration table or its page list is absent.
    #[error("configure \"pages\" in [package.metadata.manpage] in Cargo.toml to specify the manual pages to generate")]
    MissingPageTable,

    /// A directive component lacked a `key=value` shape.
    #[error("directive '{0}' is malformed: expected key=value")]
    MalformedDirective(String),

    /// A singular directive was set a second time.
    #[error("'{directive}' is invalid: '{existing}' is already configured")]
    ConflictingDirective {
        /// The directive key being set.
        directive: String,
        /// The value or kind already configured.
        existing: String,
    },

    /// The output path would land directly in the project root.
    #[error(
        "the directory storing the generated manual page must be within the project's base directory, and not equal to the project's base directory"
    )]
    OutputInProjectRoot,

    /// In-process rendering failed; recoverable via the command line.
    #[error("manual page rendering failed: {0}")]
    Render(String),

    /// The external generator exited non-zero.
    #[error("error while invoking '{command}' (status {status}):\n{message}")]
    Generation {
        /// Program that was invoked.
        command: String,
        /// Subprocess exit status.
        status: i32,
        /// Captured standard error and output.
        message: String,
    },

    /// A filesystem operation failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path the operation touched.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Free-form failure.
    #[error("{0}")]
    Message(String),
}

impl ManpageError {
    /// Returns true for user-correctable configuration errors.
    pub const fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::MissingPageTable
                | Self::MalformedDirective(_)
                | Self::ConflictingDirective { .. }
                | Self::OutputInProjectRoot
        )
    }
}

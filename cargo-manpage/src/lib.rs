//! Build-time manual page generation from command-line parser definitions.
//!
//! `cargo-manpage` reads page specs from `[package.metadata.manpage]`,
//! resolves unset options from the package manifest, and generates each page
//! either in-process through a renderer adapter or by invoking an external
//! generator program, falling back from the former to the latter on any
//! failure. The matching `clean` operation removes generated files and,
//! conservatively, directory trees that hold nothing but empty
//! subdirectories.

pub mod author;
pub mod clean;
pub mod cli;
pub mod cmdline;
pub mod config;
pub mod defaults;
pub mod error;
pub mod generate;
pub mod metadata;
pub mod output;
pub mod pagespec;
pub mod render;

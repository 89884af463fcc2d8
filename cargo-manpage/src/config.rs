//! Plugin configuration from `[package.metadata.manpage]`.

use cargo_metadata::Package;
use serde::Deserialize;

use crate::error::ManpageError;

/// Default external generator program.
pub const DEFAULT_COMMAND: &str = "argparse-manpage";

/// Manual page generation configuration for one package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManpageConfig {
    /// Page spec strings, in configured order.
    pub pages: Vec<String>,
    /// Whether resolved pages carry a project URL.
    pub include_url: bool,
    /// Skip in-process generation and always invoke the external command.
    pub force_command_line: bool,
    /// External generator program name.
    pub command: String,
}

/// Raw deserialized shape of the metadata table.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct RawConfig {
    pages: Option<Vec<String>>,
    include_url: Option<bool>,
    force_command_line: Option<bool>,
    command: Option<String>,
}

impl ManpageConfig {
    /// Reads the configuration from a package's metadata table.
    ///
    /// # Errors
    ///
    /// Returns [`ManpageError::MissingPageTable`] when the table or its
    /// `pages` list is absent, and [`ManpageError::MetadataJson`] when the
    /// table has the wrong shape.
    pub fn from_package(package: &Package) -> Result<Self, ManpageError> {
        let value = package
            .metadata
            .get("manpage")
            .ok_or(ManpageError::MissingPageTable)?;
        Self::from_value(value)
    }

    fn from_value(value: &serde_json::Value) -> Result<Self, ManpageError> {
        let raw: RawConfig = serde_json::from_value(value.clone())?;
        let pages = raw.pages.ok_or(ManpageError::MissingPageTable)?;
        Ok(Self {
            pages,
            include_url: raw.include_url.unwrap_or(true),
            force_command_line: raw.force_command_line.unwrap_or(false),
            command: raw.command.unwrap_or_else(|| DEFAULT_COMMAND.to_owned()),
        })
    }
}

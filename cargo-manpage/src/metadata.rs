//! Cargo metadata discovery for `cargo-manpage`.

use camino::{Utf8Path, Utf8PathBuf};
use cargo_metadata::{Metadata, MetadataCommand, Package};

use crate::author::{Author, extract_name_email};
use crate::config::ManpageConfig;
use crate::error::ManpageError;

/// Read-only project metadata backing default resolution, plus the plugin's
/// own configuration table.
#[derive(Debug, Clone)]
pub struct ProjectContext {
    /// Selected Cargo package name.
    pub package_name: String,
    /// Package version.
    pub version: String,
    /// Declared authors with a non-empty name or email, in manifest order.
    pub authors: Vec<Author>,
    /// Named project URLs, in manifest field order.
    pub urls: Vec<(String, String)>,
    /// Root directory containing the package manifest.
    pub project_root: Utf8PathBuf,
    /// Manual page generation configuration.
    pub config: ManpageConfig,
}

/// Loads Cargo metadata for the current workspace.
pub fn load_metadata() -> Result<Metadata, ManpageError> {
    let mut command = MetadataCommand::new();
    command.no_deps();
    Ok(command.exec()?)
}

/// Selects the target package and assembles its project context.
///
/// # Errors
///
/// Returns a configuration error when the named package does not exist, when
/// no package is named and the workspace has no root package, or when the
/// package carries no usable `[package.metadata.manpage]` table.
pub fn project_context(
    metadata: &Metadata,
    package_name: Option<&str>,
) -> Result<ProjectContext, ManpageError> {
    let package = match package_name {
        Some(name) => find_package(metadata, name)?,
        None => metadata
            .root_package()
            .ok_or(ManpageError::WorkspaceRootMissing)?,
    };

    let project_root = package
        .manifest_path
        .parent()
        .map(Utf8Path::to_path_buf)
        .ok_or_else(|| ManpageError::Message("package manifest has no parent".to_owned()))?;

    let config = ManpageConfig::from_package(package)?;

    Ok(ProjectContext {
        package_name: package.name.clone(),
        version: package.version.to_string(),
        authors: parse_authors(&package.authors),
        urls: named_urls(package),
        project_root,
        config,
    })
}

fn find_package<'a>(metadata: &'a Metadata, name: &str) -> Result<&'a Package, ManpageError> {
    metadata
        .packages
        .iter()
        .find(|package| package.name == name)
        .ok_or_else(|| ManpageError::PackageNotFound(name.to_owned()))
}

/// Parses manifest author strings, dropping entries with neither a name nor
/// an email.
fn parse_authors(raw: &[String]) -> Vec<Author> {
    raw.iter()
        .map(|text| {
            let (name, email) = extract_name_email(text);
            Author { name, email }
        })
        .filter(|author| !author.name.is_empty() || !author.email.is_empty())
        .collect()
}

/// Collects the manifest's named URLs, preserving field order.
fn named_urls(package: &Package) -> Vec<(String, String)> {
    let fields = [
        ("homepage", package.homepage.as_ref()),
        ("repository", package.repository.as_ref()),
        ("documentation", package.documentation.as_ref()),
    ];
    fields
        .into_iter()
        .filter_map(|(name, url)| url.map(|url| (name.to_owned(), url.clone())))
        .collect()
}

//! Default resolution from project metadata.
//!
//! Invoked only when building. Cleaning uses the structural parse alone, so
//! it never needs rendering defaults.

use crate::metadata::ProjectContext;
use crate::pagespec::PageOptions;

/// Fills unset page options from the project metadata.
///
/// The URL is taken directly when the project declares a single URL;
/// with several, the first case-insensitive `homepage`/`home-page` match
/// wins, and no match leaves the option unset. Authors are copied only when
/// no `author=` directive was given. `prog` is left alone; consumers treat an
/// unset value as an empty program name.
pub fn resolve_defaults(options: &mut PageOptions, project: &ProjectContext) {
    if options.url.is_none() {
        options.url = default_url(&project.urls);
    }

    if options.authors.is_empty() {
        options.authors.extend(project.authors.iter().cloned());
    }

    if options.project_name.is_none() {
        options.project_name = Some(project.package_name.clone());
    }

    if options.version.is_none() && !project.version.is_empty() {
        options.version = Some(project.version.clone());
    }
}

fn default_url(urls: &[(String, String)]) -> Option<String> {
    if urls.len() == 1 {
        return urls.first().map(|(_, url)| url.clone());
    }

    for key in ["homepage", "home-page"] {
        if let Some((_, url)) = urls.iter().find(|(name, _)| name.eq_ignore_ascii_case(key)) {
            return Some(url.clone());
        }
    }
    None
}

//! Manual page spec parsing.
//!
//! A page spec is one colon-delimited string: the output path, followed by
//! zero or more `key=value` directives configuring how that page is
//! generated. Parsing is purely structural; default values from project
//! metadata are filled in separately by [`crate::defaults`].

use camino::{Utf8Path, Utf8PathBuf};

use crate::author::{Author, extract_name_email};
use crate::error::ManpageError;

/// Which kind of callable or object holds the parser definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    /// A function returning the parser.
    Function,
    /// A plain object holding the parser.
    Object,
}

impl ObjectKind {
    /// Directive key and command-line flag name for this kind.
    pub const fn key(self) -> &'static str {
        match self {
            Self::Function => "function",
            Self::Object => "object",
        }
    }
}

/// How the parser definition source is located.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportKind {
    /// A source file path relative to the project root.
    Pyfile,
    /// A dotted module name.
    Module,
}

impl ImportKind {
    /// Directive key and command-line flag name for this kind.
    pub const fn key(self) -> &'static str {
        match self {
            Self::Pyfile => "pyfile",
            Self::Module => "module",
        }
    }
}

/// Structured options for one manual page, derived from its directives.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageOptions {
    /// Object coordinates: which named thing holds the parser.
    pub object: Option<(ObjectKind, String)>,
    /// Import coordinates: where the parser definition lives.
    pub import: Option<(ImportKind, String)>,
    /// Output layout variant, stored verbatim.
    pub format: Option<String>,
    /// Accumulated authors, in directive order.
    pub authors: Vec<Author>,
    /// Project name shown in the page footer.
    pub project_name: Option<String>,
    /// Program name; derived from a `pyfile=` base name when not given.
    pub prog: Option<String>,
    /// Project URL.
    pub url: Option<String>,
    /// Project version.
    pub version: Option<String>,
    /// Short description.
    pub description: Option<String>,
    /// Long description.
    pub long_description: Option<String>,
    /// Manual section number.
    pub manual_section: Option<String>,
    /// Manual title.
    pub manual_title: Option<String>,
    /// Path of a file whose content is appended to the page.
    pub include: Option<String>,
    /// Path of a file whose content replaces the page entirely.
    pub manfile: Option<String>,
}

/// Recognized scalar directive keys, in canonical command-line order.
pub const SCALAR_KEYS: [&str; 10] = [
    "description",
    "long_description",
    "project_name",
    "prog",
    "url",
    "version",
    "manual_section",
    "manual_title",
    "include",
    "manfile",
];

impl PageOptions {
    /// Recognized scalar options with their set values, in canonical order.
    pub fn scalars(&self) -> impl Iterator<Item = (&'static str, &str)> {
        SCALAR_KEYS
            .into_iter()
            .filter_map(|key| self.scalar(key).map(|value| (key, value)))
    }

    fn scalar(&self, key: &str) -> Option<&str> {
        self.scalar_field(key)
            .and_then(|field| field.as_deref())
    }

    fn scalar_field(&self, key: &str) -> Option<&Option<String>> {
        match key {
            "description" => Some(&self.description),
            "long_description" => Some(&self.long_description),
            "project_name" => Some(&self.project_name),
            "prog" => Some(&self.prog),
            "url" => Some(&self.url),
            "version" => Some(&self.version),
            "manual_section" => Some(&self.manual_section),
            "manual_title" => Some(&self.manual_title),
            "include" => Some(&self.include),
            "manfile" => Some(&self.manfile),
            _ => None,
        }
    }

    fn scalar_field_mut(&mut self, key: &str) -> Option<&mut Option<String>> {
        match key {
            "description" => Some(&mut self.description),
            "long_description" => Some(&mut self.long_description),
            "project_name" => Some(&mut self.project_name),
            "prog" => Some(&mut self.prog),
            "url" => Some(&mut self.url),
            "version" => Some(&mut self.version),
            "manual_section" => Some(&mut self.manual_section),
            "manual_title" => Some(&mut self.manual_title),
            "include" => Some(&mut self.include),
            "manfile" => Some(&mut self.manfile),
            _ => None,
        }
    }
}

/// One manual page to build or clean: file name, destination directory and
/// the options governing its generation.
#[derive(Debug, Clone)]
pub struct ManpageTarget {
    /// Manual page file name.
    pub manpage: String,
    /// Destination directory, as configured (usually project-relative).
    pub manpage_dir: Utf8PathBuf,
    /// Generation options for this page.
    pub options: PageOptions,
}

impl ManpageTarget {
    /// Full output path of this page beneath the project root.
    pub fn output_path(&self, project_root: &Utf8Path) -> Utf8PathBuf {
        project_root.join(&self.manpage_dir).join(&self.manpage)
    }

    /// Destination directory resolved beneath the project root.
    pub fn output_dir(&self, project_root: &Utf8Path) -> Utf8PathBuf {
        project_root.join(&self.manpage_dir)
    }
}

/// Parses one page spec string.
///
/// With `full` set the directive list is parsed as well; the clean operation
/// passes `false` since it only needs the structural output path.
///
/// # Errors
///
/// Returns a configuration error when the output path would land directly in
/// the project root, when a directive lacks `=`, or when a singular directive
/// is set twice.
pub fn parse_spec(
    spec: &str,
    project_root: &Utf8Path,
    full: bool,
) -> Result<ManpageTarget, ManpageError> {
    let mut components = spec.trim().split(':');
    let page_path = Utf8Path::new(components.next().unwrap_or_default());

    let manpage = page_path
        .file_name()
        .filter(|name| !name.is_empty())
        .ok_or_else(|| ManpageError::Message(format!("invalid manual page path '{page_path}'")))?
        .to_owned();
    let manpage_dir = page_path
        .parent()
        .map(Utf8Path::to_path_buf)
        .unwrap_or_default();

    let dir_str = manpage_dir.as_str();
    if dir_str.is_empty() || dir_str == "." || project_root.join(&manpage_dir) == *project_root {
        return Err(ManpageError::OutputInProjectRoot);
    }

    let mut options = PageOptions::default();
    if full {
        parse_directives(&mut options, components)?;
    }

    Ok(ManpageTarget {
        manpage,
        manpage_dir,
        options,
    })
}

/// Parses `key=value` directive components into `options`.
///
/// Object and import coordinates are each mutually exclusive pairs; singular
/// scalar options may only be set once. `author=` directives accumulate.
/// Unrecognized keys are silently ignored for forward compatibility.
fn parse_directives<'a>(
    options: &mut PageOptions,
    components: impl Iterator<Item = &'a str>,
) -> Result<(), ManpageError> {
    let mut pyfile_basename: Option<String> = None;

    for component in components {
        let (key, value) = component
            .split_once('=')
            .ok_or_else(|| ManpageError::MalformedDirective(component.to_owned()))?;

        match key {
            "function" | "object" => {
                if let Some((existing, _)) = &options.object {
                    return Err(conflict(key, existing.key()));
                }
                let kind = if key == "function" {
                    ObjectKind::Function
                } else {
                    ObjectKind::Object
                };
                options.object = Some((kind, value.to_owned()));
            }
            "pyfile" | "module" => {
                if let Some((existing, _)) = &options.import {
                    return Err(conflict(key, existing.key()));
                }
                let kind = if key == "pyfile" {
                    ImportKind::Pyfile
                } else {
                    ImportKind::Module
                };
                if kind == ImportKind::Pyfile {
                    pyfile_basename = Utf8Path::new(value).file_name().map(str::to_owned);
                }
                options.import = Some((kind, value.to_owned()));
            }
            "format" => {
                if let Some(existing) = &options.format {
                    return Err(conflict(key, existing));
                }
                options.format = Some(value.to_owned());
            }
            "author" => {
                let (name, email) = extract_name_email(value);
                options.authors.push(Author { name, email });
            }
            _ => {
                if let Some(field) = options.scalar_field_mut(key) {
                    if let Some(existing) = field {
                        return Err(conflict(key, &existing.clone()));
                    }
                    *field = Some(value.to_owned());
                }
                // Unrecognized keys are dropped without complaint.
            }
        }
    }

    if options.prog.is_none() {
        options.prog = pyfile_basename;
    }

    Ok(())
}

fn conflict(directive: &str, existing: &str) -> ManpageError {
    ManpageError::ConflictingDirective {
        directive: directive.to_owned(),
        existing: existing.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    //! Directive grammar unit tests.

    use super::*;
    use rstest::rstest;

    fn root() -> Utf8PathBuf {
        Utf8PathBuf::from("/project")
    }

    #[rstest]
    fn parses_structural_components() {
        let target = parse_spec("man/man1/app.1", &root(), true).expect("parse spec");
        assert_eq!(target.manpage, "app.1");
        assert_eq!(target.manpage_dir, Utf8PathBuf::from("man/man1"));
        assert_eq!(target.output_path(&root()), "/project/man/man1/app.1");
    }

    #[rstest]
    #[case::bare("app.1")]
    #[case::current_dir("./app.1")]
    #[case::absolute_root("/project/app.1")]
    fn rejects_page_in_project_root(#[case] spec: &str) {
        let err = parse_spec(spec, &root(), true).expect_err("root output must be rejected");
        assert!(matches!(err, ManpageError::OutputInProjectRoot));
    }

    #[rstest]
    fn routes_object_and_import_directives() {
        let target = parse_spec(
            "man/app.1:function=build_cli:module=app.cli",
            &root(),
            true,
        )
        .expect("parse spec");
        assert_eq!(
            target.options.object,
            Some((ObjectKind::Function, "build_cli".to_owned()))
        );
        assert_eq!(
            target.options.import,
            Some((ImportKind::Module, "app.cli".to_owned()))
        );
    }

    #[rstest]
    #[case::object_pair("man/app.1:function=f:object=o", "object", "function")]
    #[case::object_pair_reversed("man/app.1:object=o:function=f", "function", "object")]
    #[case::import_pair("man/app.1:pyfile=a.json:module=b", "module", "pyfile")]
    #[case::format_twice("man/app.1:format=pretty:format=pretty", "format", "pretty")]
    #[case::scalar_twice("man/app.1:url=example.net:url=example.org", "url", "example.net")]
    fn rejects_conflicting_directives(
        #[case] spec: &str,
        #[case] directive: &str,
        #[case] existing: &str,
    ) {
        let err = parse_spec(spec, &root(), true).expect_err("conflict must be rejected");
        match err {
            ManpageError::ConflictingDirective {
                directive: got_directive,
                existing: got_existing,
            } => {
                assert_eq!(got_directive, directive);
                assert_eq!(got_existing, existing);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[rstest]
    fn rejects_malformed_directive() {
        let err = parse_spec("man/app.1:no-equals-sign", &root(), true)
            .expect_err("malformed directive must be rejected");
        assert!(matches!(err, ManpageError::MalformedDirective(component) if component == "no-equals-sign"));
    }

    #[rstest]
    fn splits_directive_on_first_equals() {
        let target =
            parse_spec("man/app.1:description=a=b", &root(), true).expect("parse spec");
        assert_eq!(target.options.description.as_deref(), Some("a=b"));
    }

    #[rstest]
    fn ignores_unrecognized_keys() {
        let target =
            parse_spec("man/app.1:frobnicate=yes:url=example.net", &root(), true).expect("parse spec");
        assert_eq!(target.options.url.as_deref(), Some("example.net"));
    }

    #[rstest]
    fn accumulates_authors_in_order() {
        let target = parse_spec(
            "man/app.1:author=A One <a@one.net>:author=B Two b@two.net",
            &root(),
            true,
        )
        .expect("parse spec");
        let names: Vec<&str> = target
            .options
            .authors
            .iter()
            .map(|author| author.name.as_str())
            .collect();
        assert_eq!(names, ["A One", "B Two"]);
        assert_eq!(target.options.authors[1].email, "b@two.net");
    }

    #[rstest]
    #[case::derived("man/app.1:pyfile=src/cli.json", Some("cli.json"))]
    #[case::overridden("man/app.1:pyfile=src/cli.json:prog=app", Some("app"))]
    #[case::overridden_first("man/app.1:prog=app:pyfile=src/cli.json", Some("app"))]
    #[case::no_pyfile("man/app.1:module=app.cli", None)]
    fn derives_prog_from_pyfile(#[case] spec: &str, #[case] prog: Option<&str>) {
        let target = parse_spec(spec, &root(), true).expect("parse spec");
        assert_eq!(target.options.prog.as_deref(), prog);
    }

    #[rstest]
    fn structural_parse_skips_directives() {
        let target = parse_spec("man/app.1:object=o:object=p", &root(), false)
            .expect("structural parse ignores directive conflicts");
        assert_eq!(target.options, PageOptions::default());
    }

    #[rstest]
    fn scalars_follow_canonical_order() {
        let target = parse_spec(
            "man/app.1:manual_section=1:description=d:url=example.net",
            &root(),
            true,
        )
        .expect("parse spec");
        let keys: Vec<&str> = target.options.scalars().map(|(key, _)| key).collect();
        assert_eq!(keys, ["description", "url", "manual_section"]);
    }
}

//! In-process manual page rendering behind a narrow adapter.
//!
//! The generation driver only talks to the [`Renderer`] trait, so the
//! command-line fallback can be exercised in tests with stub renderers. The
//! production implementation, [`SchemaRenderer`], loads a JSON command-schema
//! document, rebuilds a `clap::Command` from it and renders roff through
//! `clap_mangen`. That path leans on `clap` and `clap_mangen` internals and
//! is expected to break across their upgrades; every error it returns is
//! recoverable through the external command.

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use serde::Deserialize;
use std::io::Read;

use crate::error::ManpageError;
use crate::pagespec::{ImportKind, ObjectKind};

/// Output layout variants understood by the renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageFormat {
    /// Full page with one section per subcommand.
    Pretty,
    /// Flat page with all subcommands in a single section.
    SingleCommandsSection,
}

impl PageFormat {
    /// Parses the `format=` directive value, defaulting to `pretty`.
    ///
    /// # Errors
    ///
    /// An unknown value is a render error, which the generation driver
    /// recovers from by falling back to the external command.
    pub fn parse(value: Option<&str>) -> Result<Self, ManpageError> {
        match value.unwrap_or("pretty") {
            "pretty" => Ok(Self::Pretty),
            "single-commands-section" => Ok(Self::SingleCommandsSection),
            other => Err(ManpageError::Render(format!("unknown format '{other}'"))),
        }
    }
}

/// Opaque handle to a looked-up parser definition.
#[derive(Debug, Clone)]
pub struct ParserHandle {
    command: clap::Command,
}

impl ParserHandle {
    /// Wraps a built `clap` command.
    pub fn new(command: clap::Command) -> Self {
        Self { command }
    }
}

/// Resolved page fields handed to the renderer alongside the parser.
#[derive(Debug, Clone, Default)]
pub struct RenderData {
    /// Project name for the page footer.
    pub project_name: Option<String>,
    /// Short description.
    pub description: Option<String>,
    /// Long description.
    pub long_description: Option<String>,
    /// Project URL.
    pub url: Option<String>,
    /// Project version.
    pub version: Option<String>,
    /// Manual section, `1` when unset.
    pub manual_section: Option<String>,
    /// Manual title.
    pub manual_title: Option<String>,
    /// File whose content is appended to the page.
    pub include: Option<String>,
    /// File whose content replaces the page.
    pub manfile: Option<String>,
    /// Authors rendered as `"Name <email>"` strings.
    pub authors: Vec<String>,
}

/// Narrow interface to the underlying manual page renderer.
pub trait Renderer {
    /// Looks up the parser definition at the given import coordinates.
    ///
    /// # Errors
    ///
    /// Any failure here is recoverable through the command-line fallback.
    fn get_parser(
        &self,
        import: &(ImportKind, String),
        object: Option<&(ObjectKind, String)>,
        prog: &str,
    ) -> Result<ParserHandle, ManpageError>;

    /// Renders the manual page text for a parser.
    ///
    /// # Errors
    ///
    /// Any failure here is recoverable through the command-line fallback.
    fn render(
        &self,
        parser: &ParserHandle,
        format: PageFormat,
        data: &RenderData,
    ) -> Result<String, ManpageError>;
}

/// JSON command-schema shape accepted by [`SchemaRenderer`].
#[derive(Debug, Clone, Deserialize)]
pub struct CommandSchema {
    /// Command name.
    pub name: String,
    /// One-line description.
    #[serde(default)]
    pub description: Option<String>,
    /// Command version.
    #[serde(default)]
    pub version: Option<String>,
    /// Declared arguments.
    #[serde(default)]
    pub args: Vec<ArgSchema>,
    /// Nested subcommands.
    #[serde(default)]
    pub subcommands: Vec<CommandSchema>,
}

/// One argument inside a [`CommandSchema`].
#[derive(Debug, Clone, Deserialize)]
pub struct ArgSchema {
    /// Argument identifier.
    pub id: String,
    /// Short flag.
    #[serde(default)]
    pub short: Option<char>,
    /// Long flag.
    #[serde(default)]
    pub long: Option<String>,
    /// Help text.
    #[serde(default)]
    pub help: Option<String>,
    /// Value placeholder; absent for boolean flags.
    #[serde(default)]
    pub value_name: Option<String>,
    /// Whether the argument is required.
    #[serde(default)]
    pub required: bool,
}

impl CommandSchema {
    /// Rebuilds a `clap` command from the schema.
    pub fn to_command(&self) -> clap::Command {
        let mut command = clap::Command::new(self.name.clone());
        if let Some(description) = &self.description {
            command = command.about(description.clone());
        }
        if let Some(version) = &self.version {
            command = command.version(version.clone());
        }
        for arg in &self.args {
            command = command.arg(arg.to_arg());
        }
        for subcommand in &self.subcommands {
            command = command.subcommand(subcommand.to_command());
        }
        command
    }
}

impl ArgSchema {
    fn to_arg(&self) -> clap::Arg {
        let mut arg = clap::Arg::new(self.id.clone()).required(self.required);
        if let Some(short) = self.short {
            arg = arg.short(short);
        }
        if let Some(long) = &self.long {
            arg = arg.long(long.clone());
        }
        if let Some(help) = &self.help {
            arg = arg.help(help.clone());
        }
        match &self.value_name {
            Some(value_name) => arg = arg.value_name(value_name.clone()),
            None if self.short.is_some() || self.long.is_some() => {
                arg = arg.action(clap::ArgAction::SetTrue);
            }
            None => {}
        }
        arg
    }
}

/// Production renderer backed by JSON command schemas and `clap_mangen`.
#[derive(Debug, Clone)]
pub struct SchemaRenderer {
    project_root: Utf8PathBuf,
}

impl SchemaRenderer {
    /// Creates a renderer resolving schema paths beneath `project_root`.
    pub const fn new(project_root: Utf8PathBuf) -> Self {
        Self { project_root }
    }

    fn schema_path(&self, import: &(ImportKind, String)) -> Utf8PathBuf {
        let (kind, source) = import;
        match kind {
            ImportKind::Pyfile => self.project_root.join(source),
            ImportKind::Module => {
                let mut relative = source.replace('.', "/");
                relative.push_str(".json");
                self.project_root.join(relative)
            }
        }
    }

    fn read_schema(&self, path: &Utf8Path) -> Result<serde_json::Value, ManpageError> {
        let text = read_text(path)
            .map_err(|err| ManpageError::Render(format!("cannot read schema {path}: {err}")))?;
        serde_json::from_str(&text)
            .map_err(|err| ManpageError::Render(format!("schema {path} is not valid JSON: {err}")))
    }
}

impl Renderer for SchemaRenderer {
    fn get_parser(
        &self,
        import: &(ImportKind, String),
        object: Option<&(ObjectKind, String)>,
        prog: &str,
    ) -> Result<ParserHandle, ManpageError> {
        let path = self.schema_path(import);
        let mut value = self.read_schema(&path)?;

        // A schema document may hold several named commands; an object
        // directive picks one of them out.
        if let Some((_, object_name)) = object {
            if let Some(selected) = value
                .get("commands")
                .and_then(|commands| commands.get(object_name))
                .or_else(|| value.get(object_name))
            {
                value = selected.clone();
            } else if value.get("name").and_then(serde_json::Value::as_str)
                != Some(object_name.as_str())
            {
                return Err(ManpageError::Render(format!(
                    "object '{object_name}' not found in schema {path}"
                )));
            }
        }

        let schema: CommandSchema = serde_json::from_value(value)
            .map_err(|err| ManpageError::Render(format!("schema {path} is malformed: {err}")))?;

        let mut command = schema.to_command();
        if !prog.is_empty() {
            command = command.name(prog.to_owned());
        }
        Ok(ParserHandle::new(command))
    }

    fn render(
        &self,
        parser: &ParserHandle,
        format: PageFormat,
        data: &RenderData,
    ) -> Result<String, ManpageError> {
        if let Some(manfile) = &data.manfile {
            let path = self.project_root.join(manfile);
            return read_text(&path)
                .map_err(|err| ManpageError::Render(format!("cannot read manfile {path}: {err}")));
        }

        let mut command = parser.command.clone();
        if let Some(description) = &data.description {
            command = command.about(description.clone());
        }
        if let Some(long_description) = &data.long_description {
            command = command.long_about(long_description.clone());
        }
        if let Some(version) = &data.version {
            command = command.version(version.clone());
        }
        if !data.authors.is_empty() {
            command = command.author(data.authors.join(", "));
        }

        let name = command.get_name().to_owned();
        let section = data.manual_section.as_deref().unwrap_or("1").to_owned();
        let mut man = clap_mangen::Man::new(command)
            .title(name.to_uppercase())
            .section(section);
        if let Some(manual_title) = &data.manual_title {
            man = man.manual(manual_title.clone());
        }
        if let Some(project_name) = &data.project_name {
            let source = match &data.version {
                Some(version) => format!("{project_name} {version}"),
                None => project_name.clone(),
            };
            man = man.source(source);
        }

        let mut buffer = Vec::new();
        let render_result = match format {
            PageFormat::Pretty => man.render(&mut buffer),
            PageFormat::SingleCommandsSection => man
                .render_title(&mut buffer)
                .and_then(|()| man.render_name_section(&mut buffer))
                .and_then(|()| man.render_synopsis_section(&mut buffer))
                .and_then(|()| man.render_description_section(&mut buffer))
                .and_then(|()| man.render_options_section(&mut buffer))
                .and_then(|()| man.render_subcommands_section(&mut buffer))
                .and_then(|()| man.render_version_section(&mut buffer))
                .and_then(|()| man.render_authors_section(&mut buffer)),
        };
        render_result.map_err(|err| ManpageError::Render(format!("roff rendering failed: {err}")))?;

        let mut page = String::from_utf8(buffer)
            .map_err(|err| ManpageError::Render(format!("rendered page is not UTF-8: {err}")))?;

        if let Some(url) = &data.url {
            page.push_str(&format!(".SH LINKS\n.UR {url}\n.UE\n"));
        }
        if let Some(include) = &data.include {
            let path = self.project_root.join(include);
            let extra = read_text(&path).map_err(|err| {
                ManpageError::Render(format!("cannot read include file {path}: {err}"))
            })?;
            page.push_str(&extra);
        }

        Ok(page)
    }
}

fn read_text(path: &Utf8Path) -> Result<String, std::io::Error> {
    let parent = path
        .parent()
        .ok_or_else(|| std::io::Error::other(format!("{path} has no parent directory")))?;
    let file_name = path
        .file_name()
        .ok_or_else(|| std::io::Error::other(format!("{path} has no file name")))?;

    let dir = Dir::open_ambient_dir(parent, ambient_authority())?;
    let mut file = dir.open(file_name)?;
    let mut buffer = String::new();
    file.read_to_string(&mut buffer)?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    //! Schema loading and rendering tests.

    use super::*;
    use rstest::rstest;
    use std::io::Write;

    fn sandbox() -> (tempfile::TempDir, Utf8PathBuf) {
        let tempdir = tempfile::tempdir().expect("create temp dir");
        let root = Utf8PathBuf::from_path_buf(tempdir.path().to_path_buf())
            .expect("tempdir path is UTF-8");
        (tempdir, root)
    }

    fn write_file(root: &Utf8Path, relative: &str, contents: &str) {
        let path = root.join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent directories");
        }
        let mut file = std::fs::File::create(path.as_std_path()).expect("create file");
        file.write_all(contents.as_bytes()).expect("write file");
    }

    const SCHEMA: &str = r#"{
        "name": "demo",
        "description": "demonstration tool",
        "args": [
            { "id": "verbose", "short": "v", "long": "verbose", "help": "More output" },
            { "id": "input", "value_name": "FILE", "required": true }
        ]
    }"#;

    #[rstest]
    fn renders_roff_from_pyfile_schema() {
        let (_tempdir, root) = sandbox();
        write_file(&root, "cli.json", SCHEMA);
        let renderer = SchemaRenderer::new(root);

        let import = (ImportKind::Pyfile, "cli.json".to_owned());
        let parser = renderer.get_parser(&import, None, "").expect("load schema");
        let data = RenderData {
            manual_section: Some("1".to_owned()),
            url: Some("https://example.net".to_owned()),
            ..RenderData::default()
        };
        let page = renderer
            .render(&parser, PageFormat::Pretty, &data)
            .expect("render page");

        assert!(page.contains(".TH"), "missing roff header: {page}");
        assert!(page.contains("demo"), "missing command name: {page}");
        assert!(page.contains("https://example.net"), "missing url: {page}");
    }

    #[rstest]
    fn module_imports_resolve_to_json_paths() {
        let (_tempdir, root) = sandbox();
        write_file(&root, "app/cli.json", SCHEMA);
        let renderer = SchemaRenderer::new(root);

        let import = (ImportKind::Module, "app.cli".to_owned());
        renderer
            .get_parser(&import, None, "override")
            .expect("module schema resolves");
    }

    #[rstest]
    fn missing_schema_is_a_render_error() {
        let (_tempdir, root) = sandbox();
        let renderer = SchemaRenderer::new(root);
        let import = (ImportKind::Pyfile, "absent.json".to_owned());
        let err = renderer
            .get_parser(&import, None, "")
            .expect_err("missing schema must fail");
        assert!(matches!(err, ManpageError::Render(_)));
    }

    #[rstest]
    fn object_directive_selects_named_command() {
        let (_tempdir, root) = sandbox();
        write_file(
            &root,
            "cli.json",
            r#"{ "commands": { "alpha": { "name": "alpha" }, "beta": { "name": "beta" } } }"#,
        );
        let renderer = SchemaRenderer::new(root);
        let import = (ImportKind::Pyfile, "cli.json".to_owned());
        let object = (ObjectKind::Object, "beta".to_owned());

        renderer
            .get_parser(&import, Some(&object), "")
            .expect("named command resolves");

        let missing = (ObjectKind::Object, "gamma".to_owned());
        let err = renderer
            .get_parser(&import, Some(&missing), "")
            .expect_err("unknown object must fail");
        assert!(matches!(err, ManpageError::Render(_)));
    }

    #[rstest]
    #[case::default(None, PageFormat::Pretty)]
    #[case::pretty(Some("pretty"), PageFormat::Pretty)]
    #[case::flat(Some("single-commands-section"), PageFormat::SingleCommandsSection)]
    fn parses_known_formats(#[case] value: Option<&str>, #[case] expected: PageFormat) {
        assert_eq!(PageFormat::parse(value).expect("known format"), expected);
    }

    #[rstest]
    fn unknown_format_is_a_render_error() {
        let err = PageFormat::parse(Some("fancy")).expect_err("unknown format must fail");
        assert!(matches!(err, ManpageError::Render(_)));
    }

    #[rstest]
    fn manfile_replaces_rendered_output() {
        let (_tempdir, root) = sandbox();
        write_file(&root, "page.roff", ".TH HAND 1\nhand-written\n");
        let renderer = SchemaRenderer::new(root);
        let parser = ParserHandle::new(clap::Command::new("demo"));
        let data = RenderData {
            manfile: Some("page.roff".to_owned()),
            ..RenderData::default()
        };
        let page = renderer
            .render(&parser, PageFormat::Pretty, &data)
            .expect("manfile is read");
        assert_eq!(page, ".TH HAND 1\nhand-written\n");
    }
}

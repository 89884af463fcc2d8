//! Generation driver.
//!
//! Iterates the configured pages in order, attempting in-process rendering
//! first and falling back to the external command on any failure. A failure
//! of the fallback itself aborts the whole build.

use camino::Utf8PathBuf;

use crate::cmdline;
use crate::config::ManpageConfig;
use crate::error::ManpageError;
use crate::metadata::ProjectContext;
use crate::output;
use crate::pagespec::ManpageTarget;
use crate::render::{PageFormat, RenderData, Renderer};

/// Everything the driver needs to build one batch of pages.
pub struct BuildContext<'a> {
    /// Project metadata and root directory.
    pub project: &'a ProjectContext,
    /// Plugin configuration switches.
    pub config: &'a ManpageConfig,
    /// In-process renderer adapter.
    pub renderer: &'a dyn Renderer,
}

/// Builds every configured page, returning the generated paths for build
/// artifact registration.
///
/// # Errors
///
/// Fails fast on the first page whose external-command generation fails;
/// in-process failures are recovered per page via the command-line fallback.
pub fn build_pages(
    targets: &mut [ManpageTarget],
    ctx: &BuildContext<'_>,
) -> Result<Vec<Utf8PathBuf>, ManpageError> {
    let mut artifacts = Vec::with_capacity(targets.len());

    for target in targets.iter_mut() {
        let page_path = target.output_path(&ctx.project.project_root);
        tracing::info!("Building manual page {page_path}");

        apply_config_options(target, ctx.config);

        if ctx.config.force_command_line {
            build_using_cmdline(target, ctx)?;
        } else if let Err(err) = build_in_process(target, ctx) {
            tracing::error!(
                "{err}\nManual page {page_path} failed to build when calling the renderer \
                 directly. Will retry using the command line program..."
            );
            build_using_cmdline(target, ctx)?;
            tracing::error!("...generating using the command line succeeded");
        }

        artifacts.push(page_path);
    }

    Ok(artifacts)
}

/// Applies configuration switches that manipulate a page's appearance.
fn apply_config_options(target: &mut ManpageTarget, config: &ManpageConfig) {
    if !config.include_url {
        target.options.url = None;
    }
}

fn build_in_process(target: &ManpageTarget, ctx: &BuildContext<'_>) -> Result<(), ManpageError> {
    let options = &target.options;
    let import = options
        .import
        .as_ref()
        .ok_or_else(|| ManpageError::Render("no pyfile= or module= directive given".to_owned()))?;
    let format = PageFormat::parse(options.format.as_deref())?;

    let prog = options.prog.as_deref().unwrap_or_default();
    let parser = ctx
        .renderer
        .get_parser(import, options.object.as_ref(), prog)?;

    let data = RenderData {
        project_name: options.project_name.clone(),
        description: options.description.clone(),
        long_description: options.long_description.clone(),
        url: options.url.clone(),
        version: options.version.clone(),
        manual_section: options.manual_section.clone(),
        manual_title: options.manual_title.clone(),
        include: options.include.clone(),
        manfile: options.manfile.clone(),
        authors: options.authors.iter().map(|author| author.display()).collect(),
    };

    let page = ctx.renderer.render(&parser, format, &data)?;
    output::write_page(&target.output_path(&ctx.project.project_root), &page)
}

fn build_using_cmdline(target: &ManpageTarget, ctx: &BuildContext<'_>) -> Result<(), ManpageError> {
    let args = cmdline::command_arguments(target, &ctx.project.project_root);
    cmdline::run_command(&ctx.config.command, &args)
}

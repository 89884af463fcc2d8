//! CLI entrypoint for `cargo-manpage`.

use clap::Parser;
use tracing::level_filters::LevelFilter;

use cargo_manpage::cli::{Args, Operation};
use cargo_manpage::error::ManpageError;
use cargo_manpage::generate::BuildContext;
use cargo_manpage::pagespec::ManpageTarget;
use cargo_manpage::render::SchemaRenderer;
use cargo_manpage::{clean, defaults, generate, metadata, pagespec};

fn main() -> Result<(), ManpageError> {
    let args = Args::parse();
    init_tracing(&args);
    run(&args)
}

fn run(args: &Args) -> Result<(), ManpageError> {
    let cargo_metadata = metadata::load_metadata()?;
    let project = metadata::project_context(&cargo_metadata, args.package.as_deref())?;

    match args.command {
        Operation::Build => {
            let mut targets = parse_targets(&project, true)?;
            for target in &mut targets {
                defaults::resolve_defaults(&mut target.options, &project);
            }

            let renderer = SchemaRenderer::new(project.project_root.clone());
            let ctx = BuildContext {
                project: &project,
                config: &project.config,
                renderer: &renderer,
            };

            tracing::info!("Building manual pages");
            let artifacts = generate::build_pages(&mut targets, &ctx)?;
            for artifact in &artifacts {
                tracing::debug!("Registered build artifact {artifact}");
            }
            tracing::info!("Finished building manual pages");
        }
        Operation::Clean => {
            let targets = parse_targets(&project, false)?;
            clean::clean_pages(&targets, &project.project_root)?;
        }
    }

    Ok(())
}

fn parse_targets(
    project: &metadata::ProjectContext,
    full: bool,
) -> Result<Vec<ManpageTarget>, ManpageError> {
    project
        .config
        .pages
        .iter()
        .map(|spec| pagespec::parse_spec(spec, &project.project_root, full))
        .collect()
}

fn init_tracing(args: &Args) {
    let level = if args.quiet {
        LevelFilter::ERROR
    } else {
        match args.verbose {
            0 => LevelFilter::INFO,
            _ => LevelFilter::DEBUG,
        }
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .without_time()
        .init();
}

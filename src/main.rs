//! postgen's main application entry point.
//! Handles command-line argument parsing, context loading, and runs the
//! reconciliation pipeline over the generated project.

use postgen::{
    cli::{get_args, Args},
    config::{apply_overrides, load_context_file, load_context_from_stdin, load_manifest, LoadedContext},
    error::{default_error_handler, Result},
    manifest::Manifest,
    pipeline::Pipeline,
    renderer::MiniJinjaRenderer,
};

/// Main application entry point.
fn main() {
    let args = get_args();

    // Logger configuration
    env_logger::Builder::new()
        .filter_level(if args.verbose { log::LevelFilter::Debug } else { log::LevelFilter::Info })
        .init();

    if let Err(err) = run(args) {
        default_error_handler(err);
    }
}

/// Main application logic execution.
///
/// # Flow
/// 1. Loads the context (file, stdin, overrides)
/// 2. Loads the manifest (file or built-in)
/// 3. Picks the project directory
/// 4. Prints the plan (dry run) or runs the pipeline
fn run(args: Args) -> Result<()> {
    let mut context = match (&args.context, args.stdin) {
        (Some(path), _) => load_context_file(path)?,
        (None, true) => load_context_from_stdin()?,
        (None, false) => LoadedContext::default(),
    };
    apply_overrides(&mut context, &args.overrides);

    let manifest = match &args.manifest {
        Some(path) => load_manifest(path)?,
        None => Manifest::builtin(),
    };

    let project_dir = match (args.project_dir, context.output_dir) {
        (Some(dir), _) | (None, Some(dir)) => dir,
        (None, None) => std::env::current_dir()?,
    };

    let renderer = MiniJinjaRenderer::new();
    let pipeline = Pipeline::new(&project_dir, &manifest, &renderer).strict(args.strict);

    if args.dry_run {
        let (_, plan) = pipeline.plan(&context.raw)?;
        for spec in plan.specs() {
            println!("{spec}");
        }
        return Ok(());
    }

    let report = pipeline.run(&context.raw)?;
    println!(
        "Project '{}' reconciled: {} removed, {} regenerated.",
        project_dir.display(),
        report.removed.len(),
        report.regenerated.len()
    );
    Ok(())
}

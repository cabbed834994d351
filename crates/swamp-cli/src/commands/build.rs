use std::path::{Path, PathBuf};

use swamp_compiler::{
    BackendError, BuildError, BuildReport, CodeGenerator, Package, Session, TypeInfoPackGenerator,
    Verbosity, build, package_chunk,
};
use swamp_core::Colors;
use thiserror::Error;
use tracing::{debug, info};

pub struct BuildArgs {
    pub path: PathBuf,
    pub output: PathBuf,
    pub color: bool,
    pub verbose: bool,
}

#[derive(Debug, Error)]
pub enum BuildCommandError {
    #[error("the prelude failed to compile ({0} errors)")]
    Prelude(usize),

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error("build failed with {0} errors")]
    Failed(usize),
}

pub fn run(args: BuildArgs) {
    if let Err(err) = execute(&args) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

pub fn execute(args: &BuildArgs) -> Result<(), BuildCommandError> {
    let mut session = Session::new().map_err(|diag| BuildCommandError::Prelude(diag.error_count()))?;
    let report = build(&mut session, &args.path)?;

    if !report.diagnostics.is_empty() {
        eprint!(
            "{}",
            report
                .diagnostics
                .printer(&session.sources)
                .colored(args.color)
                .render()
        );
    }
    for err in &report.errors {
        eprintln!("error: {err}");
    }
    if !report.is_success() {
        return Err(BuildCommandError::Failed(
            report.diagnostics.error_count() + report.errors.len(),
        ));
    }

    if args.verbose {
        for package in &report.packages {
            eprintln!("types of `{}`:", package.name);
            eprint!("{}", type_dump(&mut session, package, Colors::new(args.color))?);
        }
    }
    write_packs(&mut session, &report, &args.output, args.verbose)?;
    info!(packages = report.packages.len(), "build finished");
    Ok(())
}

/// One package writes `output` itself; several write `<name>/<file>` beside it.
fn write_packs(
    session: &mut Session,
    report: &BuildReport,
    output: &Path,
    verbose: bool,
) -> Result<(), BackendError> {
    let output_dir = output.parent().unwrap_or_else(|| Path::new(""));
    let file_name = output
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| crate::cli::DEFAULT_OUTPUT.to_string());
    let verbosity = if verbose {
        Verbosity::Verbose
    } else {
        Verbosity::Normal
    };

    let mut generator = TypeInfoPackGenerator::new(file_name);
    let single = report.packages.len() == 1;
    for package in &report.packages {
        let sub_dir = if single { "" } else { package.name.as_str() };
        debug!(package = %package.name, sub_dir, "generating pack");
        generator.generate_from_package(session, package, output_dir, sub_dir, verbosity)?;
    }
    Ok(())
}

/// `#i keyword payload` listing of the package's TypeInfo.
pub fn type_dump(session: &mut Session, package: &Package, colors: Colors) -> Result<String, BackendError> {
    let chunk = package_chunk(session, package)?;
    Ok(swamp_typeinfo::dump(&chunk, colors))
}

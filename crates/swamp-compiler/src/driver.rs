//! Build driver: packages and solutions.
//!
//! Every package gets its own module repository over the shared session.
//! Failures stay inside the package they happen in; the report carries
//! whatever was built.

use std::fs;
use std::path::{Path, PathBuf};

use swamp_core::settings::{PackageSettings, SOLUTION_FILE_NAME, SettingsError, SolutionSettings};
use swamp_core::{ArtifactName, Span};
use thiserror::Error;
use tracing::debug;

use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::repository::{ModuleRepository, Package, PackageModuleReader, RepositoryError};
use crate::session::Session;

#[derive(Debug, Error)]
pub enum BuildError {
    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error("package `{package}`: {source}")]
    Repository {
        package: String,
        #[source]
        source: RepositoryError,
    },

    #[error("`{}` is neither a solution nor a package directory", .0.display())]
    NotFound(PathBuf),
}

/// Outcome of a build. Errors without a source location are in `errors`.
#[derive(Debug, Default)]
pub struct BuildReport {
    pub packages: Vec<Package>,
    pub diagnostics: Diagnostics,
    pub errors: Vec<BuildError>,
}

impl BuildReport {
    pub fn is_success(&self) -> bool {
        self.errors.is_empty() && !self.diagnostics.has_errors()
    }

    pub fn package(&self, name: &str) -> Option<&Package> {
        self.packages.iter().find(|p| p.name == name)
    }
}

/// Build whatever `path` names: a solution file, a directory holding
/// `solution.toml`, or a package directory.
pub fn build(session: &mut Session, path: &Path) -> Result<BuildReport, BuildError> {
    if path.is_file() {
        return build_solution(session, path);
    }
    let solution = path.join(SOLUTION_FILE_NAME);
    if solution.is_file() {
        return build_solution(session, &solution);
    }
    if path.is_dir() {
        return Ok(build_package(session, path));
    }
    Err(BuildError::NotFound(path.to_path_buf()))
}

pub fn build_package(session: &mut Session, dir: &Path) -> BuildReport {
    let mut report = BuildReport::default();
    build_package_into(&mut report, session, dir);
    report
}

pub fn build_solution(session: &mut Session, path: &Path) -> Result<BuildReport, BuildError> {
    let settings = SolutionSettings::load(path)?;
    let root = path.parent().unwrap_or_else(|| Path::new("."));
    debug!(solution = %settings.name, packages = settings.packages.len(), "building solution");

    let mut report = BuildReport::default();
    for dir in settings.package_dirs(root) {
        build_package_into(&mut report, session, &dir);
    }
    Ok(report)
}

fn build_package_into(report: &mut BuildReport, session: &mut Session, dir: &Path) {
    let name = match package_name(dir) {
        Ok(name) => name,
        Err(err) => {
            report_settings_error(report, session, err);
            return;
        }
    };
    let reader = match PackageModuleReader::from_settings(dir) {
        Ok(reader) => reader,
        Err(err) => {
            report_settings_error(report, session, err);
            return;
        }
    };
    debug!(package = %name, dir = %dir.display(), "building package");

    let mut repository = ModuleRepository::new(session, reader, ArtifactName::new(name.clone()));
    let fetched = repository.fetch_main_module_in_package();
    let (package, diagnostics) = repository.finish();
    report.diagnostics.extend(diagnostics);

    match fetched {
        Ok(_) => debug!(package = %name, modules = package.len(), "package built"),
        // Already reported at the import that closed the cycle.
        Err(RepositoryError::CircularDependencyDetected { stack, tried }) => {
            debug!(package = %name, ?stack, %tried, "package has an import cycle");
        }
        Err(source) => report.errors.push(BuildError::Repository {
            package: name,
            source,
        }),
    }
    report.packages.push(package);
}

/// `Name` from `package.toml`, else the directory name.
fn package_name(dir: &Path) -> Result<String, SettingsError> {
    if let Some(settings) = PackageSettings::load_from_dir(dir)? {
        return Ok(settings.name);
    }
    let name = dir
        .canonicalize()
        .ok()
        .and_then(|d| d.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_else(|| "main".to_string());
    Ok(name)
}

/// Malformed settings files are reported against the file itself.
fn report_settings_error(report: &mut BuildReport, session: &mut Session, err: SettingsError) {
    let SettingsError::Parse { path, .. } = &err else {
        report.errors.push(err.into());
        return;
    };
    let Ok(text) = fs::read_to_string(path) else {
        report.errors.push(err.into());
        return;
    };
    let source = session.sources.add_file(path, text);
    report
        .diagnostics
        .report(DiagnosticKind::SettingsError, Span::new(source, 0..0))
        .message(err.to_string())
        .emit();
}

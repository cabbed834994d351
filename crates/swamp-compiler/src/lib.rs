//! Swamp compiler: type system, generic instantiation and module resolution.
//!
//! The pipeline for one package:
//! - `repository` - reads modules, links imports, detects cycles
//! - `syntax` - lexer and parser
//! - `decorate` - type checks a module into the decorated tree (`ir`)
//! - `types`, `concretize`, `type_repo` - the type graph and its catalogues
//! - `type_info` - canonical type table for backends
//! - `driver` - packages and solutions
//! - `diagnostics` - error reporting

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod backend;
pub mod concretize;
pub mod decorate;
pub mod diagnostics;
pub mod driver;
pub mod ir;
pub mod module;
pub mod prelude;
pub mod repository;
pub mod resources;
pub mod session;
pub mod syntax;
pub mod type_info;
pub mod type_repo;
pub mod types;

#[cfg(test)]
mod driver_tests;
#[cfg(test)]
mod test_utils;
#[cfg(test)]
mod type_info_tests;

pub use backend::{BackendError, CodeGenerator, TypeInfoPackGenerator, Verbosity, package_chunk};
pub use diagnostics::{DiagnosticKind, Diagnostics, DiagnosticsPrinter, Severity};
pub use driver::{BuildError, BuildReport, build, build_package, build_solution};
pub use module::{Module, ModuleId};
pub use repository::{ModuleRepository, Package, RepositoryError};
pub use session::Session;

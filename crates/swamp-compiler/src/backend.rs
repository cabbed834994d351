//! Code generator seam and the built-in TypeInfo pack generator.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use swamp_typeinfo::{TypeInfoChunk, WriteError};
use thiserror::Error;
use tracing::debug;

use crate::repository::Package;
use crate::session::Session;
use crate::type_info::{ConsumeError, TypeInfoBuilder};

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Default)]
pub enum Verbosity {
    Quiet,
    #[default]
    Normal,
    Verbose,
}

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("module `{module}`: {source}")]
    Consume {
        module: String,
        #[source]
        source: ConsumeError,
    },

    #[error(transparent)]
    Write(#[from] WriteError),

    #[error("failed to write `{}`: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Turns a decorated package into output files.
pub trait CodeGenerator {
    fn generate_from_package(
        &mut self,
        session: &mut Session,
        package: &Package,
        output_dir: &Path,
        sub_dir: &str,
        verbosity: Verbosity,
    ) -> Result<(), BackendError>;
}

/// TypeInfo for every module of `package` that decorated cleanly.
pub fn package_chunk(session: &mut Session, package: &Package) -> Result<TypeInfoChunk, BackendError> {
    let mut builder = TypeInfoBuilder::new();
    for module in package.iter().filter(|m| !m.failed) {
        builder
            .consume_module(&mut session.types, module)
            .map_err(|source| BackendError::Consume {
                module: module.artifact.to_string(),
                source,
            })?;
    }
    Ok(builder.into_chunk())
}

/// Writes the package's TypeInfo chunk as one binary file.
#[derive(Debug, Clone)]
pub struct TypeInfoPackGenerator {
    file_name: String,
}

impl TypeInfoPackGenerator {
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }
}

impl CodeGenerator for TypeInfoPackGenerator {
    fn generate_from_package(
        &mut self,
        session: &mut Session,
        package: &Package,
        output_dir: &Path,
        sub_dir: &str,
        verbosity: Verbosity,
    ) -> Result<(), BackendError> {
        let chunk = package_chunk(session, package)?;
        let bytes = chunk.to_bytes()?;
        let dir = output_dir.join(sub_dir);
        let path = dir.join(&self.file_name);
        fs::create_dir_all(&dir).map_err(|source| BackendError::Io {
            path: dir.clone(),
            source,
        })?;
        fs::write(&path, &bytes).map_err(|source| BackendError::Io {
            path: path.clone(),
            source,
        })?;

        if verbosity >= Verbosity::Verbose {
            debug!(
                package = %package.name,
                types = chunk.len(),
                bytes = bytes.len(),
                path = %path.display(),
                "wrote type info"
            );
        }
        Ok(())
    }
}

//! Module repository: resolves module paths to decorated modules.
//!
//! A module is read, parsed, its imports fetched (re-entering the repository)
//! and then decorated. Results are cached by artifact name; a stack of the
//! modules being resolved detects import cycles.

mod reader;


use std::collections::HashMap;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use swamp_core::{ArtifactName, ModulePath};
use thiserror::Error;
use tracing::debug;

use crate::decorate::decorate_module;
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::module::{Exposure, ImportRecord, Module, ModuleId};
use crate::session::Session;
use crate::syntax::{self, ast};
use crate::type_repo::TypeRepoError;

pub use reader::{
    DocumentLocation, DocumentProvider, FileSystemDocuments, MemoryModuleReader, ModuleDocument,
    ModuleKind, ModuleReader, OverlayDocuments, PackageModuleReader, ReadError,
};

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("circular dependency: {} -> {tried}", .stack.join(" -> "))]
    CircularDependencyDetected { stack: Vec<String>, tried: String },

    #[error(transparent)]
    Read(#[from] ReadError),

    #[error(transparent)]
    Type(#[from] TypeRepoError),
}

/// Every module of one package, in the order they finished resolving.
#[derive(Debug, Default)]
pub struct Package {
    pub name: String,
    pub modules: IndexMap<ArtifactName, Module>,
    pub paths: HashMap<PathBuf, ModuleId>,
}

impl Package {
    pub fn module(&self, id: ModuleId) -> Option<&Module> {
        self.modules.get_index(id.index()).map(|(_, m)| m)
    }

    pub fn get(&self, artifact: &ArtifactName) -> Option<&Module> {
        self.modules.get(artifact)
    }

    pub fn main(&self) -> Option<&Module> {
        self.modules.values().find(|m| m.path.is_main())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Module> {
        self.modules.values()
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

pub struct ModuleRepository<'s, R> {
    session: &'s mut Session,
    reader: R,
    namespace: ArtifactName,
    modules: IndexMap<ArtifactName, Module>,
    paths: HashMap<PathBuf, ModuleId>,
    stack: Vec<ArtifactName>,
    diag: Diagnostics,
}

impl<'s, R: ModuleReader> ModuleRepository<'s, R> {
    pub fn new(session: &'s mut Session, reader: R, namespace: ArtifactName) -> Self {
        Self {
            session,
            reader,
            namespace,
            modules: IndexMap::new(),
            paths: HashMap::new(),
            stack: Vec::new(),
            diag: Diagnostics::new(),
        }
    }

    pub fn fetch_main_module_in_package(&mut self) -> Result<ModuleId, RepositoryError> {
        self.fetch_module_in_package(ModuleKind::Main, &ModulePath::main())
    }

    /// The module at `relative` below this package, loading it on first use.
    pub fn fetch_module_in_package(
        &mut self,
        kind: ModuleKind,
        relative: &ModulePath,
    ) -> Result<ModuleId, RepositoryError> {
        let artifact = self.namespace.join(relative);
        if let Some(index) = self.modules.get_index_of(&artifact) {
            debug!(module = %artifact, "module cache hit");
            return Ok(ModuleId::new(index));
        }
        if self.stack.contains(&artifact) {
            let stack: Vec<String> = self.stack.iter().map(ToString::to_string).collect();
            debug!(module = %artifact, stack = ?stack, "circular dependency");
            return Err(RepositoryError::CircularDependencyDetected {
                stack,
                tried: artifact.to_string(),
            });
        }

        debug!(module = %artifact, "fetching module");
        self.stack.push(artifact.clone());
        let loaded = self.load(kind, relative, &artifact);
        self.stack.pop();
        let (module, path) = loaded?;

        let (index, _) = self.modules.insert_full(artifact, module);
        let id = ModuleId::new(index);
        self.paths.insert(path, id);
        Ok(id)
    }

    fn load(
        &mut self,
        kind: ModuleKind,
        relative: &ModulePath,
        artifact: &ArtifactName,
    ) -> Result<(Module, PathBuf), RepositoryError> {
        let document = self.reader.read_module(kind, relative, &self.namespace)?;
        let path = document.location.path();
        let sources = &mut self.session.sources;
        let source = match &document.location {
            DocumentLocation::File(file) => sources.add_file(file, document.text),
            DocumentLocation::Memory(uri) => sources.add_memory(uri, document.text),
        };
        let parsed = syntax::parse(sources.content(source), source);

        let mut module = Module::new(artifact.clone(), relative.clone(), Some(source));
        let halted = parsed.diagnostics.has_compile_errors();
        self.diag.extend(parsed.diagnostics);
        if halted {
            debug!(module = %artifact, "parse failed");
            module.failed = true;
            module.types.freeze();
            return Ok((module, path));
        }

        self.session.prelude.attach(&self.session.types, &mut module)?;
        for import in &parsed.module.imports {
            self.link_import(&mut module, import)?;
        }

        if !module.failed {
            let session = &mut *self.session;
            decorate_module(
                &mut session.types,
                &mut session.resources,
                &mut module,
                &parsed.module,
                &mut self.diag,
            );
            debug!(module = %artifact, definitions = module.definitions().count(), "decorated");
        }
        module.types.freeze();
        Ok((module, path))
    }

    /// Fetch one import and copy its exposed surface into `module`.
    fn link_import(&mut self, module: &mut Module, import: &ast::Import) -> Result<(), RepositoryError> {
        let path = ModulePath::new(import.path.iter().map(|i| i.name.clone()).collect());
        let target = self.namespace.join(&path);

        let id = match self.fetch_module_in_package(ModuleKind::Import, &path) {
            Ok(id) => id,
            Err(RepositoryError::CircularDependencyDetected { stack, tried }) => {
                // Only the import that closes the cycle reports it.
                if stack.last().map(String::as_str) == Some(module.artifact.as_str()) {
                    self.diag
                        .report(DiagnosticKind::CircularDependencyDetected, import.span)
                        .message(format!("{} -> {tried}", stack.join(" -> ")))
                        .emit();
                }
                return Err(RepositoryError::CircularDependencyDetected { stack, tried });
            }
            Err(err) => {
                self.diag
                    .report(DiagnosticKind::MissingFile, import.span)
                    .message(err.to_string())
                    .emit();
                module.failed = true;
                return Ok(());
            }
        };

        let prefix = import.prefix();
        let index = module.add_import_record(ImportRecord {
            artifact: target,
            prefix: prefix.clone(),
            span: import.span,
        });
        let exposure = match &import.exposing {
            ast::Exposing::Nothing => Exposure::Nothing,
            ast::Exposing::All => Exposure::All,
            ast::Exposing::Names(names) => Exposure::Names(names.iter().map(|n| n.name.clone()).collect()),
        };

        let Some((_, source)) = self.modules.get_index(id.index()) else {
            return Ok(());
        };
        let missing = module.import_from(&self.session.types, source, &prefix, &exposure, Some(index))?;
        if let ast::Exposing::Names(names) = &import.exposing {
            for name in names.iter().filter(|n| missing.contains(&n.name)) {
                self.diag
                    .report(DiagnosticKind::MissingImportedSymbol, name.span)
                    .message(format!("`{}` is not exposed by `{}`", name.name, import.dotted_path()))
                    .emit();
            }
        }
        Ok(())
    }

    pub fn module(&self, id: ModuleId) -> Option<&Module> {
        self.modules.get_index(id.index()).map(|(_, m)| m)
    }

    pub fn module_by_path(&self, path: &Path) -> Option<&Module> {
        let id = self.paths.get(path)?;
        self.module(*id)
    }

    pub fn all_modules(&self) -> impl Iterator<Item = &Module> {
        self.modules.values()
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diag
    }

    pub fn finish(self) -> (Package, Diagnostics) {
        let package = Package {
            name: self.namespace.to_string(),
            modules: self.modules,
            paths: self.paths,
        };
        (package, self.diag)
    }
}

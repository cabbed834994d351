//! The prelude: primitive types plus the embedded standard library.
//!
//! Built once per session and attached to every user module before it is
//! decorated. `core` is visible unprefixed; each fragment under its own name
//! (`List.map`), with `Maybe` and `Result` types also unprefixed.

mod sources;

#[cfg(test)]
mod prelude_tests;

use swamp_core::{ArtifactName, ModulePath, SourceMap, Span};
use tracing::debug;

use crate::decorate::decorate_module;
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::module::{Exposure, Module};
use crate::resources::ResourceNames;
use crate::syntax::parse;
use crate::type_repo::TypeRepoError;
use crate::types::{PrimitiveKind, TypeArena};

use sources::{FRAGMENTS, UNPREFIXED_TYPES};

const CORE_MODULE_NAME: &str = "core";

#[derive(Debug)]
pub struct Prelude {
    core: Module,
    fragments: Vec<Module>,
}

impl Prelude {
    /// Compile the prelude. Errors here are bugs in the embedded sources.
    pub fn bootstrap(arena: &mut TypeArena, sources: &mut SourceMap) -> Result<Self, Diagnostics> {
        let core_source = sources.add_embedded(CORE_MODULE_NAME, "");
        let mut diag = Diagnostics::new();

        let core = match core_module(arena) {
            Ok(core) => core,
            Err(err) => {
                diag.report(DiagnosticKind::InternalError, Span::new(core_source, 0..0))
                    .message(err.to_string())
                    .emit();
                return Err(diag);
            }
        };

        let mut prelude = Prelude {
            core,
            fragments: Vec::with_capacity(FRAGMENTS.len()),
        };
        // The prelude has no resource literals; this table stays empty.
        let mut resources = ResourceNames::new();

        for &(name, text) in FRAGMENTS {
            let source = sources.add_embedded(name, text);
            let parsed = parse(text, source);
            diag.extend(parsed.diagnostics);

            let path = ModulePath::from_dotted(name);
            let mut module = Module::new(ArtifactName::new(name), path, Some(source));
            module.internal = true;
            if let Err(err) = prelude.attach(arena, &mut module) {
                diag.report(DiagnosticKind::InternalError, Span::new(source, 0..0))
                    .message(err.to_string())
                    .emit();
            }
            decorate_module(arena, &mut resources, &mut module, &parsed.module, &mut diag);
            module.types.freeze();
            prelude.fragments.push(module);
        }

        if diag.has_errors() {
            return Err(diag);
        }
        debug!(fragments = prelude.fragments.len(), "prelude compiled");
        Ok(prelude)
    }

    /// Make the prelude visible in `module`.
    pub fn attach(&self, arena: &TypeArena, module: &mut Module) -> Result<(), TypeRepoError> {
        module.import_from(arena, &self.core, "", &Exposure::All, None)?;
        for fragment in &self.fragments {
            let Some(prefix) = fragment.path.last() else {
                continue;
            };
            let exposure = if UNPREFIXED_TYPES.contains(&prefix) {
                Exposure::Names(fragment.exposed_types().map(|(name, _)| name.to_string()).collect())
            } else {
                Exposure::Nothing
            };
            module.import_from(arena, fragment, prefix, &exposure, None)?;
        }
        Ok(())
    }

    pub fn core(&self) -> &Module {
        &self.core
    }

    /// Fragment by name: `List`, `Maybe`.
    pub fn fragment(&self, name: &str) -> Option<&Module> {
        self.fragments.iter().find(|m| m.path.last() == Some(name))
    }

    pub fn modules(&self) -> impl Iterator<Item = &Module> {
        std::iter::once(&self.core).chain(&self.fragments)
    }
}

fn core_module(arena: &TypeArena) -> Result<Module, TypeRepoError> {
    let mut core = Module::new(
        ArtifactName::new(CORE_MODULE_NAME),
        ModulePath::from_dotted(CORE_MODULE_NAME),
        None,
    );
    core.internal = true;
    for kind in PrimitiveKind::ALL {
        core.types.declare_type(arena, kind.name(), arena.primitive(kind))?;
    }
    core.types.freeze();
    Ok(core)
}

//! Compile snippets through the whole pipeline.

use swamp_core::ArtifactName;

use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::ir::dump_definition;
use crate::module::{Module, ModuleId};
use crate::repository::{MemoryModuleReader, ModuleRepository, Package, RepositoryError};
use crate::session::Session;

pub struct Compiled {
    pub session: Session,
    pub package: Package,
    pub diagnostics: Diagnostics,
    pub result: Result<ModuleId, RepositoryError>,
}

/// Compile `main` as the main module of package `test`.
pub fn compile(main: &str) -> Compiled {
    compile_modules(&[("", main)])
}

/// Compile in-memory modules keyed by dotted path; `""` is the main module.
pub fn compile_modules(modules: &[(&str, &str)]) -> Compiled {
    let mut reader = MemoryModuleReader::new();
    for &(path, text) in modules {
        reader.insert(path, normalize(text));
    }

    let mut session = Session::new().expect("prelude compiles");
    let mut repository = ModuleRepository::new(&mut session, reader, ArtifactName::new("test"));
    let result = repository.fetch_main_module_in_package();
    let (package, diagnostics) = repository.finish();
    Compiled {
        session,
        package,
        diagnostics,
        result,
    }
}

fn normalize(text: &str) -> String {
    let mut text = text.trim().to_string();
    text.push('\n');
    text
}

impl Compiled {
    pub fn main(&self) -> &Module {
        self.package.main().expect("main module was built")
    }

    /// Decorated tree of a main-module definition.
    pub fn dump(&self, name: &str) -> String {
        let module = self.main();
        let definition = module
            .definition(name)
            .unwrap_or_else(|| panic!("`{name}` is not defined"));
        let body = definition
            .body
            .as_ref()
            .unwrap_or_else(|| panic!("`{name}` has no decorated body"));
        dump_definition(&self.session.types, name, definition.ty, body)
    }

    /// Type of a main-module definition, rendered.
    pub fn type_of(&self, name: &str) -> String {
        let definition = self
            .main()
            .definition(name)
            .unwrap_or_else(|| panic!("`{name}` is not defined"));
        self.session.types.display(definition.ty)
    }

    pub fn kinds(&self) -> Vec<DiagnosticKind> {
        self.diagnostics.kinds()
    }

    /// `uri:line:column: severity: message`, one diagnostic per line.
    pub fn render(&self) -> String {
        self.diagnostics
            .printer(&self.session.sources)
            .snippets(false)
            .render()
    }

    #[track_caller]
    pub fn assert_clean(&self) {
        assert!(self.diagnostics.is_empty(), "unexpected diagnostics:\n{}", self.render());
    }
}

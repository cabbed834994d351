//! A decorated module: its type repository, definitions and imports.

use indexmap::{IndexMap, IndexSet};
use swamp_core::{ArtifactName, ModulePath, SourceId, Span};

use crate::ir::Expression;
use crate::type_repo::{Imported, TypeRepo, TypeRepoError};
use crate::types::{TypeArena, TypeId};

/// Handle to a module inside a [`Package`](crate::repository::Package).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct ModuleId(u32);

impl ModuleId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index as u32)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Definition {
    pub name: String,
    pub ty: TypeId,
    /// `None` until decorated, and for definitions whose body failed.
    pub body: Option<Expression>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportedDefinition {
    /// Fully qualified name in the exporting module.
    pub qualified: String,
    pub ty: TypeId,
    pub import: Option<usize>,
}

/// Which names of an imported module are also visible unprefixed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Exposure {
    Nothing,
    All,
    Names(Vec<String>),
}

/// A user-written `import` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRecord {
    pub artifact: ArtifactName,
    pub prefix: String,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct Module {
    pub artifact: ArtifactName,
    pub path: ModulePath,
    pub source: Option<SourceId>,
    /// Prelude modules: never warned about.
    pub internal: bool,
    /// Failed to read, tokenize or parse; exports nothing.
    pub failed: bool,
    pub types: TypeRepo,
    definitions: IndexMap<String, Definition>,
    imported_definitions: IndexMap<String, ImportedDefinition>,
    imports: Vec<ImportRecord>,
    linked: IndexSet<(ArtifactName, String)>,
}

impl Module {
    pub fn new(artifact: ArtifactName, path: ModulePath, source: Option<SourceId>) -> Self {
        Self {
            artifact,
            path,
            source,
            internal: false,
            failed: false,
            types: TypeRepo::new(),
            definitions: IndexMap::new(),
            imported_definitions: IndexMap::new(),
            imports: Vec::new(),
            linked: IndexSet::new(),
        }
    }

    /// Add a definition. Returns `false` if the name is already defined.
    pub fn add_definition(&mut self, definition: Definition) -> bool {
        if self.definitions.contains_key(&definition.name) {
            return false;
        }
        self.definitions.insert(definition.name.clone(), definition);
        true
    }

    pub fn definition(&self, name: &str) -> Option<&Definition> {
        self.definitions.get(name)
    }

    pub(crate) fn definition_mut(&mut self, name: &str) -> Option<&mut Definition> {
        self.definitions.get_mut(name)
    }

    pub fn definitions(&self) -> impl Iterator<Item = &Definition> {
        self.definitions.values()
    }

    pub fn imported_definition(&self, key: &str) -> Option<&ImportedDefinition> {
        self.imported_definitions.get(key)
    }

    pub fn add_import_record(&mut self, record: ImportRecord) -> usize {
        self.imports.push(record);
        self.imports.len() - 1
    }

    pub fn imports(&self) -> &[ImportRecord] {
        &self.imports
    }

    /// Exposed named types. Every top-level type of a module is exposed.
    pub fn exposed_types(&self) -> impl Iterator<Item = (&str, TypeId)> {
        let failed = self.failed;
        self.types.declared_types().filter(move |_| !failed)
    }

    pub fn exposed_variants(&self) -> impl Iterator<Item = (&str, TypeId)> {
        let failed = self.failed;
        self.types.declared_variants().filter(move |_| !failed)
    }

    pub fn exposed_definitions(&self) -> impl Iterator<Item = &Definition> {
        let failed = self.failed;
        self.definitions.values().filter(move |_| !failed)
    }

    /// Copy the exposed surface of `source` in under `prefix`, mirroring
    /// unprefixed what `exposure` names. An empty prefix only mirrors.
    ///
    /// Linking the same module under the same prefix twice is a no-op.
    /// Returns the exposed names `source` does not have.
    pub fn import_from(
        &mut self,
        arena: &TypeArena,
        source: &Module,
        prefix: &str,
        exposure: &Exposure,
        import: Option<usize>,
    ) -> Result<Vec<String>, TypeRepoError> {
        if !self
            .linked
            .insert((source.artifact.clone(), prefix.to_string()))
        {
            return Ok(Vec::new());
        }

        let mirrored = |name: &str| match exposure {
            Exposure::Nothing => false,
            Exposure::All => true,
            Exposure::Names(names) => names.iter().any(|n| n == name),
        };

        for (name, ty) in source.exposed_types() {
            let imported = Imported { ty, import };
            let mirror = mirrored(name);
            if !prefix.is_empty() {
                self.types.import_type(format!("{prefix}.{name}"), imported)?;
            }
            if mirror {
                self.types.import_type(name, imported)?;
            }
            if let Some(custom) = arena.as_custom(ty) {
                for &variant in &custom.variants {
                    let Some(atom) = arena.as_variant(variant) else {
                        continue;
                    };
                    let imported = Imported { ty: variant, import };
                    if !prefix.is_empty() {
                        self.types
                            .import_variant(format!("{prefix}.{}", atom.name), imported)?;
                    }
                    if mirror {
                        self.types.import_variant(atom.name.clone(), imported)?;
                    }
                }
            }
        }

        for definition in source.exposed_definitions() {
            let imported = ImportedDefinition {
                qualified: source.artifact.member(&definition.name),
                ty: definition.ty,
                import,
            };
            if !prefix.is_empty() {
                self.imported_definitions
                    .entry(format!("{prefix}.{}", definition.name))
                    .or_insert_with(|| imported.clone());
            }
            if mirrored(&definition.name) {
                self.imported_definitions
                    .entry(definition.name.clone())
                    .or_insert(imported);
            }
        }

        let Exposure::Names(names) = exposure else {
            return Ok(Vec::new());
        };
        let missing = names
            .iter()
            .filter(|name| {
                !source.exposed_types().any(|(n, _)| n == name.as_str())
                    && !source.exposed_definitions().any(|d| d.name == **name)
            })
            .cloned()
            .collect();
        Ok(missing)
    }
}

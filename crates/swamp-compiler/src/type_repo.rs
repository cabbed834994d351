//! Per-module catalogue of types.
//!
//! Named types (customs, aliases) and variants are looked up by source name.
//! Anonymous structural types (function and record atoms) are shared by
//! canonical name so that every `{ x : Int, y : Int }` written in a module is
//! one node.

use std::collections::HashMap;

use indexmap::IndexMap;
use swamp_core::Span;
use thiserror::Error;

use crate::types::{TypeArena, TypeError, TypeId};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeRepoError {
    #[error("type `{0}` is already declared")]
    AlreadyDeclared(String),

    #[error("type repository is frozen")]
    Frozen,

    #[error(transparent)]
    Type(#[from] TypeError),
}

/// An entry copied in from another module.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Imported {
    pub ty: TypeId,
    /// Index of the user import that brought it in; `None` for the prelude.
    pub import: Option<usize>,
}

/// Where a name lookup was satisfied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Found {
    Local(TypeId),
    Imported(Imported),
}

impl Found {
    pub fn ty(self) -> TypeId {
        match self {
            Found::Local(ty) => ty,
            Found::Imported(imported) => imported.ty,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TypeRepo {
    types: IndexMap<String, TypeId>,
    variants: IndexMap<String, TypeId>,
    /// Decorated name to node, for de-duplication and `find_type`.
    canonical: HashMap<String, TypeId>,
    imported_types: IndexMap<String, Imported>,
    imported_variants: IndexMap<String, Imported>,
    frozen: bool,
}

impl TypeRepo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Node with the same canonical name, local first, then imported.
    pub fn find_type(&self, arena: &TypeArena, ty: TypeId) -> Option<TypeId> {
        let key = arena.decorated_name(ty);
        if let Some(&found) = self.canonical.get(&key) {
            return Some(found);
        }
        self.imported_types
            .values()
            .map(|imported| imported.ty)
            .find(|&imported| arena.decorated_name(imported) == key)
    }

    pub fn declare_type(
        &mut self,
        arena: &TypeArena,
        name: impl Into<String>,
        ty: TypeId,
    ) -> Result<(), TypeRepoError> {
        self.check_open()?;
        let name = name.into();
        if self.types.contains_key(&name) {
            return Err(TypeRepoError::AlreadyDeclared(name));
        }
        self.canonical.entry(arena.decorated_name(ty)).or_insert(ty);
        self.types.insert(name, ty);
        Ok(())
    }

    /// Function atom for `parameters`, shared with an existing equal one.
    pub fn add_function_atom(
        &mut self,
        arena: &mut TypeArena,
        parameters: Vec<TypeId>,
        span: Option<Span>,
    ) -> Result<TypeId, TypeRepoError> {
        self.check_open()?;
        let candidate = arena.function(parameters, span);
        Ok(self.intern(arena, candidate))
    }

    /// Record atom for `fields`, shared with an existing equal one.
    pub fn declare_record_type(
        &mut self,
        arena: &mut TypeArena,
        fields: Vec<(String, TypeId)>,
        span: Option<Span>,
    ) -> Result<TypeId, TypeRepoError> {
        self.check_open()?;
        let candidate = arena.record(fields, Vec::new(), span)?;
        Ok(self.intern(arena, candidate))
    }

    fn intern(&mut self, arena: &TypeArena, candidate: TypeId) -> TypeId {
        *self
            .canonical
            .entry(arena.decorated_name(candidate))
            .or_insert(candidate)
    }

    pub fn declare_variant(&mut self, name: impl Into<String>, variant: TypeId) -> Result<(), TypeRepoError> {
        self.check_open()?;
        let name = name.into();
        if self.variants.contains_key(&name) {
            return Err(TypeRepoError::AlreadyDeclared(name));
        }
        self.variants.insert(name, variant);
        Ok(())
    }

    pub fn lookup_type(&self, name: &str) -> Option<Found> {
        if let Some(&ty) = self.types.get(name) {
            return Some(Found::Local(ty));
        }
        self.imported_types.get(name).copied().map(Found::Imported)
    }

    pub fn lookup_variant(&self, name: &str) -> Option<Found> {
        if let Some(&variant) = self.variants.get(name) {
            return Some(Found::Local(variant));
        }
        self.imported_variants.get(name).copied().map(Found::Imported)
    }

    /// Register an imported type under `key` (`List.List` or, for expose-all
    /// imports, `List`). The first import of a key wins.
    pub fn import_type(&mut self, key: impl Into<String>, imported: Imported) -> Result<(), TypeRepoError> {
        self.check_open()?;
        self.imported_types.entry(key.into()).or_insert(imported);
        Ok(())
    }

    pub fn import_variant(&mut self, key: impl Into<String>, imported: Imported) -> Result<(), TypeRepoError> {
        self.check_open()?;
        self.imported_variants.entry(key.into()).or_insert(imported);
        Ok(())
    }

    /// Locally declared named types in declaration order.
    pub fn declared_types(&self) -> impl Iterator<Item = (&str, TypeId)> {
        self.types.iter().map(|(name, &ty)| (name.as_str(), ty))
    }

    pub fn declared_variants(&self) -> impl Iterator<Item = (&str, TypeId)> {
        self.variants.iter().map(|(name, &ty)| (name.as_str(), ty))
    }

    pub fn imported_types(&self) -> impl Iterator<Item = (&str, Imported)> {
        self.imported_types.iter().map(|(name, &imported)| (name.as_str(), imported))
    }

    /// Reject further declarations. Called once the module is decorated.
    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    fn check_open(&self) -> Result<(), TypeRepoError> {
        if self.frozen {
            return Err(TypeRepoError::Frozen);
        }
        Ok(())
    }
}

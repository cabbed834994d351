use crate::types::{TypeArena, TypeId};

use super::ConcretizeError;

/// Positional bindings for the local type names of one context.
///
/// The first concrete that is not `Any` wins a slot; `Any` never overwrites,
/// and a later concrete must be compatible with the one already bound.
#[derive(Debug, Clone)]
pub struct DynamicLocalTypeResolver {
    names: Vec<String>,
    slots: Vec<Option<TypeId>>,
}

impl DynamicLocalTypeResolver {
    pub fn new(names: Vec<String>) -> Self {
        let slots = vec![None; names.len()];
        Self { names, slots }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn binding(&self, name: &str) -> Option<TypeId> {
        let index = self.names.iter().position(|n| n == name)?;
        self.slots[index]
    }

    pub fn set_type(
        &mut self,
        arena: &mut TypeArena,
        name: &str,
        concrete: TypeId,
    ) -> Result<(), ConcretizeError> {
        let Some(index) = self.names.iter().position(|n| n == name) else {
            return Err(ConcretizeError::Internal(format!(
                "`{name}` is not a local type name of this context"
            )));
        };

        let Some(existing) = self.slots[index] else {
            self.slots[index] = Some(concrete);
            return Ok(());
        };

        let existing_is_any = arena.is_any(arena.unalias(existing));
        let concrete_is_any = arena.is_any(arena.unalias(concrete));
        if concrete_is_any {
            return Ok(());
        }
        if existing_is_any {
            self.slots[index] = Some(concrete);
            return Ok(());
        }
        arena.compatible_types(existing, concrete)?;
        Ok(())
    }

    /// Bind every empty slot to `ty`.
    pub fn fill_unbound(&mut self, ty: TypeId) {
        for slot in &mut self.slots {
            slot.get_or_insert(ty);
        }
    }

    pub fn verify(&self) -> Result<(), ConcretizeError> {
        match self.slots.iter().position(Option::is_none) {
            Some(index) => Err(ConcretizeError::Unresolved(self.names[index].clone())),
            None => Ok(()),
        }
    }

    /// Bound pairs in declaration order; empty slots are skipped.
    pub fn into_bindings(self) -> Vec<(String, TypeId)> {
        self.names
            .into_iter()
            .zip(self.slots)
            .filter_map(|(name, slot)| slot.map(|ty| (name, ty)))
            .collect()
    }
}

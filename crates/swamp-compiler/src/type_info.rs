//! Canonicalizes decorated types into a [`TypeInfoChunk`].
//!
//! References, aliases-of-references and resolved contexts are followed to
//! their atoms; aliases keep an entry of their own. Structurally equal types
//! end up at one index no matter which module or node they come from.

use std::collections::HashMap;

use swamp_typeinfo::{InfoField, InfoIndex, InfoType, InfoVariant, TypeInfoChunk};
use thiserror::Error;
use tracing::trace;

use crate::module::Module;
use crate::types::{PrimitiveKind, TypeArena, TypeError, TypeId, TypeNode};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConsumeError {
    #[error(transparent)]
    Type(#[from] TypeError),

    #[error("generic type `{0}` has to be concretized first")]
    Generic(String),
}

/// Maps decorated types to chunk indices for backends.
pub trait TypeLookup {
    fn lookup(&mut self, arena: &mut TypeArena, ty: TypeId) -> Result<InfoIndex, ConsumeError>;
}

#[derive(Debug, Default)]
pub struct TypeInfoBuilder {
    chunk: TypeInfoChunk,
    cache: HashMap<TypeId, InfoIndex>,
}

impl TypeInfoBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn chunk(&self) -> &TypeInfoChunk {
        &self.chunk
    }

    pub fn into_chunk(self) -> TypeInfoChunk {
        self.chunk
    }

    /// Index of `ty`, adding it and everything it mentions on first sight.
    pub fn consume(&mut self, arena: &mut TypeArena, ty: TypeId) -> Result<InfoIndex, ConsumeError> {
        if let Some(&index) = self.cache.get(&ty) {
            return Ok(index);
        }
        let index = self.consume_uncached(arena, ty)?;
        self.cache.insert(ty, index);
        Ok(index)
    }

    /// Consume the exposed types and definition types of `module`.
    ///
    /// Generic declarations and definitions have no concrete layout and are
    /// skipped; their instances enter through the definitions that use them.
    pub fn consume_module(&mut self, arena: &mut TypeArena, module: &Module) -> Result<(), ConsumeError> {
        let types: Vec<TypeId> = module
            .exposed_types()
            .map(|(_, ty)| ty)
            .chain(module.definitions().map(|d| d.ty))
            .collect();
        for ty in types {
            if is_generic(arena, ty) {
                trace!(ty = %arena.display(ty), "skipping generic entity");
                continue;
            }
            self.consume(arena, ty)?;
        }
        Ok(())
    }

    fn consume_uncached(&mut self, arena: &mut TypeArena, ty: TypeId) -> Result<InfoIndex, ConsumeError> {
        let entry = match arena.get(ty).clone() {
            TypeNode::Primitive(p) => match (primitive_entry(p.kind), p.generics.first()) {
                (Some(entry), _) => entry,
                (None, Some(&element)) => {
                    let element = self.consume(arena, element)?;
                    if p.kind == PrimitiveKind::Array {
                        InfoType::Array(element)
                    } else {
                        InfoType::List(element)
                    }
                }
                (None, None) => return Err(ConsumeError::Generic(p.kind.name().to_string())),
            },
            TypeNode::Unmanaged(_) => InfoType::Unmanaged,
            TypeNode::AnyMatching => InfoType::AnyMatching,
            TypeNode::Record(record) => {
                let mut fields = Vec::with_capacity(record.len());
                for field in record.sorted_fields() {
                    fields.push(InfoField {
                        name: field.name.clone(),
                        ty: self.consume(arena, field.ty)?,
                    });
                }
                InfoType::record(fields)
            }
            TypeNode::Tuple(tuple) => InfoType::Tuple {
                elements: self.consume_all(arena, &tuple.elements)?,
            },
            TypeNode::Function(function) => InfoType::Function {
                parameters: self.consume_all(arena, &function.parameters)?,
            },
            TypeNode::Custom(_) => return self.consume_custom(arena, ty),
            TypeNode::Variant(variant) => return self.consume(arena, variant.parent),
            TypeNode::Alias(alias) => InfoType::Alias {
                target: self.consume(arena, alias.target)?,
                name: alias.name,
            },
            TypeNode::LocalTypeName(local) => InfoType::LocalType { name: local.name },
            TypeNode::Reference(reference) => return self.consume(arena, reference.target),
            TypeNode::NameOnlyContext(_) | TypeNode::ContextReference(_) => {
                return Err(ConsumeError::Generic(arena.display(ty)));
            }
            TypeNode::ResolvedContext(_) | TypeNode::Invoker(_) => {
                let resolved = arena.resolve(ty)?;
                return self.consume(arena, resolved);
            }
        };

        let index = self.chunk.add(entry);
        trace!(ty = %arena.display(ty), index = %index, "consumed");
        Ok(index)
    }

    fn consume_all(&mut self, arena: &mut TypeArena, types: &[TypeId]) -> Result<Vec<InfoIndex>, ConsumeError> {
        types.iter().map(|&ty| self.consume(arena, ty)).collect()
    }

    /// Customs may mention themselves, so the slot is reserved before the
    /// variants are consumed and filled afterwards. A filled custom equal to
    /// an earlier entry gives its reservation back and shares that index.
    fn consume_custom(&mut self, arena: &mut TypeArena, ty: TypeId) -> Result<InfoIndex, ConsumeError> {
        let Some(custom) = arena.as_custom(ty).cloned() else {
            return Err(TypeError::Internal("not a custom type".into()).into());
        };
        let index = self.chunk.push(InfoType::Custom {
            name: custom.name.clone(),
            variants: Vec::new(),
        });
        self.cache.insert(ty, index);

        let mut variants = Vec::with_capacity(custom.variants.len());
        for variant in custom.variants {
            let Some(atom) = arena.as_variant(variant).cloned() else {
                return Err(TypeError::Internal("custom type lists a non-variant".into()).into());
            };
            variants.push(InfoVariant {
                name: atom.name,
                parameters: self.consume_all(arena, &atom.parameters)?,
            });
        }
        let filled = InfoType::Custom {
            name: custom.name,
            variants,
        };
        if let Some(existing) = self.chunk.find(&filled)
            && existing != index
            && index.get() + 1 == self.chunk.len()
        {
            self.chunk.truncate(index.get());
            self.cache.insert(ty, existing);
            trace!(ty = %arena.display(ty), index = %existing, "shared custom");
            return Ok(existing);
        }
        self.chunk.replace(index, filled);
        trace!(ty = %arena.display(ty), index = %index, "consumed custom");
        Ok(index)
    }
}

impl TypeLookup for TypeInfoBuilder {
    fn lookup(&mut self, arena: &mut TypeArena, ty: TypeId) -> Result<InfoIndex, ConsumeError> {
        self.consume(arena, ty)
    }
}

/// Singleton entry, `None` for the generic primitives.
fn primitive_entry(kind: PrimitiveKind) -> Option<InfoType> {
    let entry = match kind {
        PrimitiveKind::Int => InfoType::Int,
        PrimitiveKind::Bool => InfoType::Bool,
        PrimitiveKind::String => InfoType::String,
        PrimitiveKind::Char => InfoType::Char,
        PrimitiveKind::Fixed => InfoType::Fixed,
        PrimitiveKind::Blob => InfoType::Blob,
        PrimitiveKind::ResourceName => InfoType::ResourceName,
        PrimitiveKind::Any => InfoType::Any,
        PrimitiveKind::TypeRef => InfoType::TypeRef,
        PrimitiveKind::List | PrimitiveKind::Array => return None,
    };
    Some(entry)
}

/// Contexts, open customs and anything else over a free local type name.
fn is_generic(arena: &TypeArena, ty: TypeId) -> bool {
    arena.has_free_names(arena.unalias(ty))
}

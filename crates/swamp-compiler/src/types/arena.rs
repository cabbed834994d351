//! Storage for every type node of a build session.
//!
//! Nodes are appended and never removed, so a [`TypeId`] stays valid for the
//! whole session and can be shared between modules.

use std::collections::HashMap;

use swamp_core::{ArtifactName, Span};

use super::error::TypeError;
use super::node::*;

#[derive(Clone, Debug)]
struct Slot {
    node: TypeNode,
    span: Option<Span>,
}

#[derive(Clone, Debug)]
pub struct TypeArena {
    slots: Vec<Slot>,
    /// Custom instances keyed by declaration and decorated argument names.
    pub(super) instances: HashMap<(TypeId, Vec<String>), TypeId>,
    /// Collapsed resolved contexts.
    pub(super) collapsed: HashMap<TypeId, TypeId>,
}

impl Default for TypeArena {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeArena {
    pub fn new() -> Self {
        let mut arena = Self {
            slots: Vec::new(),
            instances: HashMap::new(),
            collapsed: HashMap::new(),
        };

        // Pre-register builtin types at their expected IDs
        for kind in PrimitiveKind::ALL {
            if kind.generic_arity() > 0 {
                continue;
            }
            let id = arena.primitive_atom(kind, Vec::new());
            debug_assert_eq!(id, kind.builtin_id());
        }
        let any_matching = arena.alloc(TypeNode::AnyMatching, None);
        debug_assert_eq!(any_matching, TYPE_ANY_MATCHING);

        for kind in [PrimitiveKind::List, PrimitiveKind::Array] {
            let element = arena.local_type_name("a", None);
            let id = arena.primitive_atom(kind, vec![element]);
            debug_assert_eq!(id, kind.builtin_id());
        }
        debug_assert_eq!(arena.slots.len() as u32, FIRST_USER_TYPE);

        arena
    }

    pub fn alloc(&mut self, node: TypeNode, span: Option<Span>) -> TypeId {
        let id = TypeId(self.slots.len() as u32);
        self.slots.push(Slot { node, span });
        id
    }

    pub fn get(&self, id: TypeId) -> &TypeNode {
        &self.slot(id).node
    }

    /// Source location the node was declared at, if any.
    pub fn span(&self, id: TypeId) -> Option<Span> {
        self.slot(id).span
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    fn slot(&self, id: TypeId) -> &Slot {
        self.slots.get(id.index()).expect("invalid TypeId")
    }

    fn node_mut(&mut self, id: TypeId) -> &mut TypeNode {
        &mut self.slots.get_mut(id.index()).expect("invalid TypeId").node
    }

    // Atoms

    fn primitive_atom(&mut self, kind: PrimitiveKind, generics: Vec<TypeId>) -> TypeId {
        self.alloc(TypeNode::Primitive(PrimitiveAtom { kind, generics }), None)
    }

    /// Shared builtin for `kind`; `List` and `Array` return their open form.
    pub fn primitive(&self, kind: PrimitiveKind) -> TypeId {
        kind.builtin_id()
    }

    pub fn list_of(&mut self, element: TypeId) -> TypeId {
        self.primitive_atom(PrimitiveKind::List, vec![element])
    }

    pub fn array_of(&mut self, element: TypeId) -> TypeId {
        self.primitive_atom(PrimitiveKind::Array, vec![element])
    }

    pub fn unmanaged(&mut self, name: impl Into<String>, span: Option<Span>) -> TypeId {
        self.alloc(
            TypeNode::Unmanaged(UnmanagedAtom { name: name.into() }),
            span,
        )
    }

    pub fn record(
        &mut self,
        fields: Vec<(String, TypeId)>,
        generics: Vec<TypeId>,
        span: Option<Span>,
    ) -> Result<TypeId, TypeError> {
        let atom = RecordAtom::new(fields, generics)?;
        Ok(self.alloc(TypeNode::Record(atom), span))
    }

    pub fn tuple(&mut self, elements: Vec<TypeId>, span: Option<Span>) -> TypeId {
        self.alloc(TypeNode::Tuple(TupleAtom { elements }), span)
    }

    pub fn function(&mut self, parameters: Vec<TypeId>, span: Option<Span>) -> TypeId {
        self.alloc(TypeNode::Function(FunctionAtom { parameters }), span)
    }

    /// Declare a custom type without variants, so variants may refer to it.
    /// `arguments` are the local type names of a generic declaration.
    pub fn declare_custom(
        &mut self,
        name: impl Into<String>,
        artifact: ArtifactName,
        arguments: Vec<TypeId>,
        span: Option<Span>,
    ) -> TypeId {
        let generic_names = arguments
            .iter()
            .filter_map(|&a| match self.get(a) {
                TypeNode::LocalTypeName(local) => Some(local.name.clone()),
                _ => None,
            })
            .collect();
        self.alloc(
            TypeNode::Custom(CustomAtom {
                name: name.into(),
                artifact,
                generic_names,
                arguments,
                variants: Vec::new(),
                origin: None,
            }),
            span,
        )
    }

    /// Append a variant; its index is its position in the parent.
    pub fn add_variant(
        &mut self,
        custom: TypeId,
        name: impl Into<String>,
        parameters: Vec<TypeId>,
        span: Option<Span>,
    ) -> Result<TypeId, TypeError> {
        let name = name.into();
        let index = match self.get(custom) {
            TypeNode::Custom(atom) => {
                for &existing in &atom.variants {
                    if let TypeNode::Variant(v) = self.get(existing)
                        && v.name == name
                    {
                        return Err(TypeError::DuplicateVariant(name));
                    }
                }
                atom.variants.len()
            }
            _ => return Err(TypeError::Internal("variant parent is not a custom type".into())),
        };

        let variant = self.alloc(
            TypeNode::Variant(VariantAtom {
                parent: custom,
                index,
                name,
                parameters,
            }),
            span,
        );
        if let TypeNode::Custom(atom) = self.node_mut(custom) {
            atom.variants.push(variant);
        }
        Ok(variant)
    }

    /// Allocate an instance of a generic custom declaration without variants.
    pub(super) fn custom_instance(&mut self, declaration: TypeId, arguments: Vec<TypeId>) -> Result<TypeId, TypeError> {
        let TypeNode::Custom(atom) = self.get(declaration) else {
            return Err(TypeError::Internal("instance of a non-custom type".into()));
        };
        let node = TypeNode::Custom(CustomAtom {
            name: atom.name.clone(),
            artifact: atom.artifact.clone(),
            generic_names: atom.generic_names.clone(),
            arguments,
            variants: Vec::new(),
            origin: Some(declaration),
        });
        let span = self.span(declaration);
        Ok(self.alloc(node, span))
    }

    pub fn any_matching(&self) -> TypeId {
        TYPE_ANY_MATCHING
    }

    // References

    pub fn alias(
        &mut self,
        name: impl Into<String>,
        artifact: ArtifactName,
        target: TypeId,
        span: Option<Span>,
    ) -> TypeId {
        self.alloc(
            TypeNode::Alias(Alias {
                name: name.into(),
                artifact,
                target,
            }),
            span,
        )
    }

    pub fn reference(
        &mut self,
        kind: ReferenceKind,
        name: impl Into<String>,
        target: TypeId,
        span: Option<Span>,
    ) -> TypeId {
        self.alloc(
            TypeNode::Reference(TypeReference {
                kind,
                name: name.into(),
                target,
            }),
            span,
        )
    }

    pub fn local_type_name(&mut self, name: impl Into<String>, span: Option<Span>) -> TypeId {
        self.alloc(
            TypeNode::LocalTypeName(LocalTypeName { name: name.into() }),
            span,
        )
    }

    pub fn name_only_context(&mut self, names: Vec<String>, span: Option<Span>) -> TypeId {
        self.alloc(
            TypeNode::NameOnlyContext(NameOnlyContext {
                names,
                body: None,
                sealed: false,
            }),
            span,
        )
    }

    pub fn add_context_name(&mut self, context: TypeId, name: impl Into<String>) -> Result<(), TypeError> {
        let name = name.into();
        match self.node_mut(context) {
            TypeNode::NameOnlyContext(ctx) if ctx.sealed => Err(TypeError::ContextSealed(name)),
            TypeNode::NameOnlyContext(ctx) => {
                if !ctx.names.contains(&name) {
                    ctx.names.push(name);
                }
                Ok(())
            }
            _ => Err(TypeError::Internal("not a name-only context".into())),
        }
    }

    /// Set the body; allowed exactly once. Seals the name list.
    pub fn set_context_body(&mut self, context: TypeId, body: TypeId) -> Result<(), TypeError> {
        match self.node_mut(context) {
            TypeNode::NameOnlyContext(ctx) if ctx.body.is_some() => {
                Err(TypeError::ContextBodyAlreadySet)
            }
            TypeNode::NameOnlyContext(ctx) => {
                ctx.body = Some(body);
                ctx.sealed = true;
                Ok(())
            }
            _ => Err(TypeError::Internal("not a name-only context".into())),
        }
    }

    pub fn context_reference(
        &mut self,
        name: impl Into<String>,
        context: TypeId,
        focus: Option<TypeId>,
        span: Option<Span>,
    ) -> TypeId {
        self.alloc(
            TypeNode::ContextReference(ContextReference {
                name: name.into(),
                context,
                focus,
            }),
            span,
        )
    }

    pub fn resolved_context(&mut self, reference: TypeId, bindings: Vec<(String, TypeId)>) -> TypeId {
        let span = self.span(reference);
        self.alloc(
            TypeNode::ResolvedContext(ResolvedContext {
                reference,
                bindings,
            }),
            span,
        )
    }

    pub fn invoker(&mut self, target: TypeId, arguments: Vec<TypeId>, span: Option<Span>) -> TypeId {
        self.alloc(TypeNode::Invoker(Invoker { target, arguments }), span)
    }

    pub(super) fn set_variants(&mut self, custom: TypeId, variants: Vec<TypeId>) {
        if let TypeNode::Custom(atom) = self.node_mut(custom) {
            atom.variants = variants;
        }
    }

    // Queries

    pub fn as_function(&self, id: TypeId) -> Option<&FunctionAtom> {
        match self.get(id) {
            TypeNode::Function(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_record(&self, id: TypeId) -> Option<&RecordAtom> {
        match self.get(id) {
            TypeNode::Record(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_custom(&self, id: TypeId) -> Option<&CustomAtom> {
        match self.get(id) {
            TypeNode::Custom(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_variant(&self, id: TypeId) -> Option<&VariantAtom> {
        match self.get(id) {
            TypeNode::Variant(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_context(&self, id: TypeId) -> Option<&NameOnlyContext> {
        match self.get(id) {
            TypeNode::NameOnlyContext(c) => Some(c),
            _ => None,
        }
    }

    pub fn is_any(&self, id: TypeId) -> bool {
        self.get(id).is_any()
    }

    pub fn is_primitive(&self, id: TypeId, kind: PrimitiveKind) -> bool {
        matches!(self.get(id), TypeNode::Primitive(p) if p.kind == kind)
    }

    /// Variant `name` of a custom atom.
    pub fn find_variant(&self, custom: TypeId, name: &str) -> Option<TypeId> {
        let atom = self.as_custom(custom)?;
        atom.variants
            .iter()
            .copied()
            .find(|&v| matches!(self.get(v), TypeNode::Variant(variant) if variant.name == name))
    }
}

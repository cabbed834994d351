//! Walking indirections: `next`, `unalias`, `resolve` and substitution of
//! local type names.

use super::arena::TypeArena;
use super::error::TypeError;
use super::node::*;

/// Indirection levels `resolve` follows before giving up.
pub const MAX_RESOLVE_DEPTH: u32 = 64;

pub type Bindings = [(String, TypeId)];

impl TypeArena {
    /// Exactly one level of indirection. `None` for atoms and bare local
    /// type names.
    pub fn next(&self, id: TypeId) -> Option<TypeId> {
        match self.get(id) {
            TypeNode::Alias(a) => Some(a.target),
            TypeNode::Reference(r) => Some(r.target),
            TypeNode::ContextReference(r) => Some(r.context),
            TypeNode::NameOnlyContext(c) => c.body,
            TypeNode::ResolvedContext(r) => Some(r.reference),
            TypeNode::Invoker(i) => Some(i.target),
            _ => None,
        }
    }

    /// Strip alias and reference layers. Contexts are left intact.
    pub fn unalias(&self, id: TypeId) -> TypeId {
        let mut current = id;
        for _ in 0..MAX_RESOLVE_DEPTH {
            match self.get(current) {
                TypeNode::Alias(a) => current = a.target,
                TypeNode::Reference(r) => current = r.target,
                _ => return current,
            }
        }
        current
    }

    /// Unalias, then resolve an invoker to the instantiated type.
    ///
    /// Callers have already validated the shape, so a failure here is an
    /// internal error.
    pub fn unalias_with_resolve_invoker(&mut self, id: TypeId) -> Result<TypeId, TypeError> {
        let unaliased = self.unalias(id);
        if !matches!(self.get(unaliased), TypeNode::Invoker(_)) {
            return Ok(unaliased);
        }
        self.resolve(unaliased)
            .map_err(|err| TypeError::Internal(format!("invoker resolution failed: {err}")))
    }

    /// Follow indirections to an atom, collapsing resolved contexts and
    /// invokers by substitution. A bare local type name is terminal.
    pub fn resolve(&mut self, id: TypeId) -> Result<TypeId, TypeError> {
        self.resolve_at(id, 0)
    }

    fn resolve_at(&mut self, id: TypeId, depth: u32) -> Result<TypeId, TypeError> {
        if depth > MAX_RESOLVE_DEPTH {
            return Err(TypeError::ResolveDepthExceeded(MAX_RESOLVE_DEPTH));
        }

        match self.get(id) {
            node if node.is_atom() => Ok(id),
            TypeNode::LocalTypeName(_) => Ok(id),
            TypeNode::Alias(a) => {
                let target = a.target;
                self.resolve_at(target, depth + 1)
            }
            TypeNode::Reference(r) => {
                let target = r.target;
                self.resolve_at(target, depth + 1)
            }
            TypeNode::ContextReference(r) => {
                let shown = r.focus.unwrap_or(r.context);
                self.resolve_at(shown, depth + 1)
            }
            TypeNode::NameOnlyContext(c) => match c.body {
                Some(body) => self.resolve_at(body, depth + 1),
                None => Err(TypeError::Internal("context without body".into())),
            },
            TypeNode::ResolvedContext(r) => {
                if let Some(&done) = self.collapsed.get(&id) {
                    return Ok(done);
                }
                let bindings = r.bindings.clone();
                let reference = r.reference;
                let body = self
                    .context_body(reference)
                    .ok_or_else(|| TypeError::Internal("resolved context without body".into()))?;
                let substituted = self.instantiate(body, &bindings)?;
                let result = self.resolve_at(substituted, depth + 1)?;
                self.collapsed.insert(id, result);
                Ok(result)
            }
            TypeNode::Invoker(i) => {
                let target = i.target;
                let arguments = i.arguments.clone();
                let applied = self.apply(target, arguments)?;
                self.resolve_at(applied, depth + 1)
            }
            _ => Err(TypeError::Internal("unhandled node in resolve".into())),
        }
    }

    /// Apply a generic type constructor to arguments.
    fn apply(&mut self, target: TypeId, arguments: Vec<TypeId>) -> Result<TypeId, TypeError> {
        let constructor = self.unalias(target);
        match self.get(constructor) {
            TypeNode::Custom(c) if c.is_generic() => {
                let declaration = c.declaration(constructor);
                self.instantiate_custom(declaration, arguments)
            }
            TypeNode::NameOnlyContext(c) => {
                let names = c.names.clone();
                let body = c
                    .body
                    .ok_or_else(|| TypeError::Internal("context without body".into()))?;
                self.check_argument_count(constructor, names.len(), arguments.len())?;
                let bindings: Vec<(String, TypeId)> = names.into_iter().zip(arguments).collect();
                self.instantiate(body, &bindings)
            }
            TypeNode::Primitive(p) if p.kind.generic_arity() > 0 => {
                let kind = p.kind;
                self.check_argument_count(constructor, kind.generic_arity(), arguments.len())?;
                Ok(self.alloc(
                    TypeNode::Primitive(PrimitiveAtom {
                        kind,
                        generics: arguments,
                    }),
                    None,
                ))
            }
            _ => Err(TypeError::NotGeneric(self.constructor_name(constructor))),
        }
    }

    fn check_argument_count(&self, constructor: TypeId, expected: usize, found: usize) -> Result<(), TypeError> {
        if expected == found {
            return Ok(());
        }
        Err(TypeError::TypeArgumentCount {
            name: self.constructor_name(constructor),
            expected,
            found,
        })
    }

    /// Instance of a generic custom declaration, shared per argument list.
    ///
    /// The instance is registered before its variants are built, so variants
    /// that mention the type itself terminate.
    pub fn instantiate_custom(&mut self, declaration: TypeId, arguments: Vec<TypeId>) -> Result<TypeId, TypeError> {
        let Some(custom) = self.as_custom(declaration) else {
            return Err(TypeError::Internal("not a custom type".into()));
        };
        let names = custom.generic_names.clone();
        let open_arguments = custom.arguments.clone();
        let variants = custom.variants.clone();
        self.check_argument_count(declaration, names.len(), arguments.len())?;

        if arguments == open_arguments {
            return Ok(declaration);
        }

        let key = (
            declaration,
            arguments.iter().map(|&a| self.decorated_name(a)).collect::<Vec<_>>(),
        );
        if let Some(&existing) = self.instances.get(&key) {
            return Ok(existing);
        }

        let instance = self.custom_instance(declaration, arguments.clone())?;
        self.instances.insert(key, instance);

        let bindings: Vec<(String, TypeId)> = names.into_iter().zip(arguments).collect();
        let mut instantiated = Vec::with_capacity(variants.len());
        for variant in variants {
            let Some(atom) = self.as_variant(variant) else {
                return Err(TypeError::Internal("custom type member is not a variant".into()));
            };
            let name = atom.name.clone();
            let index = atom.index;
            let parameters = atom.parameters.clone();
            let span = self.span(variant);

            let mut substituted = Vec::with_capacity(parameters.len());
            for param in parameters {
                substituted.push(self.instantiate(param, &bindings)?);
            }
            instantiated.push(self.alloc(
                TypeNode::Variant(VariantAtom {
                    parent: instance,
                    index,
                    name,
                    parameters: substituted,
                }),
                span,
            ));
        }
        self.set_variants(instance, instantiated);
        Ok(instance)
    }

    /// Substitute bound local type names. Invokers are rebuilt, not
    /// resolved, so recursive generic types stay finite. Nodes that mention
    /// no bound name are returned unchanged.
    pub fn instantiate(&mut self, id: TypeId, bindings: &Bindings) -> Result<TypeId, TypeError> {
        if bindings.is_empty() {
            return Ok(id);
        }

        let node = self.get(id).clone();
        let span = self.span(id);
        match node {
            TypeNode::LocalTypeName(local) => Ok(bindings
                .iter()
                .find(|(n, _)| *n == local.name)
                .map_or(id, |(_, t)| *t)),
            TypeNode::Primitive(p) => {
                let generics = self.instantiate_all(&p.generics, bindings)?;
                if generics == p.generics {
                    return Ok(id);
                }
                Ok(self.alloc(
                    TypeNode::Primitive(PrimitiveAtom {
                        kind: p.kind,
                        generics,
                    }),
                    span,
                ))
            }
            TypeNode::Record(r) => {
                let mut changed = false;
                let mut fields = Vec::with_capacity(r.len());
                for field in r.fields() {
                    let ty = self.instantiate(field.ty, bindings)?;
                    changed |= ty != field.ty;
                    fields.push((field.name.clone(), ty));
                }
                let generics = self.instantiate_all(&r.generics, bindings)?;
                if !changed && generics == r.generics {
                    return Ok(id);
                }
                self.record(fields, generics, span)
            }
            TypeNode::Tuple(t) => {
                let elements = self.instantiate_all(&t.elements, bindings)?;
                if elements == t.elements {
                    return Ok(id);
                }
                Ok(self.tuple(elements, span))
            }
            TypeNode::Function(f) => {
                let parameters = self.instantiate_all(&f.parameters, bindings)?;
                if parameters == f.parameters {
                    return Ok(id);
                }
                Ok(self.function(parameters, span))
            }
            TypeNode::Custom(c) => {
                if !c.is_generic() {
                    return Ok(id);
                }
                let arguments = self.instantiate_all(&c.arguments, bindings)?;
                if arguments == c.arguments {
                    return Ok(id);
                }
                self.instantiate_custom(c.declaration(id), arguments)
            }
            TypeNode::Variant(v) => {
                let parent = self.instantiate(v.parent, bindings)?;
                if parent == v.parent {
                    return Ok(id);
                }
                self.as_custom(parent)
                    .and_then(|c| c.variants.get(v.index).copied())
                    .ok_or_else(|| TypeError::Internal("instantiated variant missing".into()))
            }
            TypeNode::Alias(a) => {
                let target = self.instantiate(a.target, bindings)?;
                if target == a.target {
                    return Ok(id);
                }
                Ok(self.alias(a.name, a.artifact, target, span))
            }
            TypeNode::Invoker(i) => {
                let arguments = self.instantiate_all(&i.arguments, bindings)?;
                if arguments == i.arguments {
                    return Ok(id);
                }
                Ok(self.invoker(i.target, arguments, span))
            }
            TypeNode::Unmanaged(_)
            | TypeNode::AnyMatching
            | TypeNode::Reference(_)
            | TypeNode::NameOnlyContext(_)
            | TypeNode::ContextReference(_)
            | TypeNode::ResolvedContext(_) => Ok(id),
        }
    }

    fn instantiate_all(&mut self, ids: &[TypeId], bindings: &Bindings) -> Result<Vec<TypeId>, TypeError> {
        ids.iter()
            .map(|&id| self.instantiate(id, bindings))
            .collect()
    }

    /// Whether `id` mentions a local type name that is not bound.
    pub fn has_free_names(&self, id: TypeId) -> bool {
        self.has_free_names_at(id, 0)
    }

    fn has_free_names_at(&self, id: TypeId, depth: u32) -> bool {
        if depth > MAX_RESOLVE_DEPTH {
            return false;
        }
        let depth = depth + 1;
        match self.get(id) {
            TypeNode::LocalTypeName(_) => true,
            TypeNode::Primitive(p) => p.generics.iter().any(|&g| self.has_free_names_at(g, depth)),
            TypeNode::Record(r) => {
                r.fields().iter().any(|f| self.has_free_names_at(f.ty, depth))
                    || r.generics.iter().any(|&g| self.has_free_names_at(g, depth))
            }
            TypeNode::Tuple(t) => t.elements.iter().any(|&e| self.has_free_names_at(e, depth)),
            TypeNode::Function(f) => f.parameters.iter().any(|&p| self.has_free_names_at(p, depth)),
            TypeNode::Custom(c) => c.arguments.iter().any(|&a| self.has_free_names_at(a, depth)),
            TypeNode::Variant(v) => self.has_free_names_at(v.parent, depth),
            TypeNode::Alias(a) => self.has_free_names_at(a.target, depth),
            TypeNode::Invoker(i) => i.arguments.iter().any(|&a| self.has_free_names_at(a, depth)),
            TypeNode::NameOnlyContext(_) | TypeNode::ContextReference(_) => true,
            TypeNode::Unmanaged(_)
            | TypeNode::AnyMatching
            | TypeNode::Reference(_)
            | TypeNode::ResolvedContext(_) => false,
        }
    }
}

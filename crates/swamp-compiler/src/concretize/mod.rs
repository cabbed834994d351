//! Binding the local type names of a generic context from concrete argument
//! types.
//!
//! A call to `map : (a -> b) -> List a -> List b` with arguments
//! `Int -> Bool` and `List Int` yields a resolved context `a = Int, b = Bool`;
//! resolving that context gives `(Int -> Bool) -> List Int -> List Bool`.

mod resolver;

#[cfg(test)]
mod concretize_tests;

use thiserror::Error;
use tracing::trace;

use crate::types::{TYPE_ANY, TypeArena, TypeError, TypeId, TypeNode};

pub use resolver::DynamicLocalTypeResolver;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConcretizeError {
    #[error("`*` must consume at least one argument")]
    WrongArityForVariadic,

    #[error("expected {expected} arguments, found {found}")]
    ArityMismatch { expected: usize, found: usize },

    #[error("can not infer type variable `{0}`")]
    Unresolved(String),

    #[error(transparent)]
    Type(#[from] TypeError),

    #[error("internal concretizer error: {0}")]
    Internal(String),
}

/// How a parameter list with a `*` wildcard lines up against concretes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariadicSplit {
    /// Parameters before `*`, matched 1-to-1 from the front.
    pub prefix: usize,
    /// Concretes consumed by `*`.
    pub middle: usize,
    /// Parameters after `*`, matched 1-to-1 against the tail.
    pub suffix: usize,
}

impl VariadicSplit {
    /// Split `found` concretes around the wildcard at `star` of `expected`
    /// parameters. The wildcard must consume at least one concrete.
    pub fn new(expected: usize, star: usize, found: usize) -> Result<Self, ConcretizeError> {
        let prefix = star;
        let suffix = expected - star - 1;
        if found < prefix + suffix + 1 {
            return Err(ConcretizeError::WrongArityForVariadic);
        }
        Ok(Self {
            prefix,
            middle: found - prefix - suffix,
            suffix,
        })
    }

    /// Pairs `(expected index, concrete index)` for the fixed positions.
    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let front = (0..self.prefix).map(|i| (i, i));
        let tail_start = self.prefix + self.middle;
        let back = (0..self.suffix).map(move |j| (self.prefix + 1 + j, tail_start + j));
        front.chain(back)
    }
}

/// Produce a resolved context for `context_ref` from `concretes`.
///
/// For functions, `concretes` are the argument types followed by the
/// expected return type (`Any` when unknown).
pub fn concretize(
    arena: &mut TypeArena,
    context_ref: TypeId,
    concretes: &[TypeId],
) -> Result<TypeId, ConcretizeError> {
    let TypeNode::ContextReference(reference) = arena.get(context_ref) else {
        return Err(ConcretizeError::Internal(
            "concretize needs a context reference".into(),
        ));
    };
    let focus = reference.focus;
    let Some(context) = arena.as_context(reference.context) else {
        return Err(ConcretizeError::Internal(
            "context reference does not point at a context".into(),
        ));
    };
    let names = context.names.clone();
    let body = focus
        .or(context.body)
        .ok_or_else(|| ConcretizeError::Internal("context has no body".into()))?;

    let mut resolver = DynamicLocalTypeResolver::new(names);
    let shape = arena.unalias(body);
    let node = arena.get(shape).clone();

    let expected: Vec<TypeId> = match &node {
        TypeNode::Function(f) => f.parameters.clone(),
        TypeNode::Variant(v) => v.parameters.clone(),
        TypeNode::Record(r) => r.generics.clone(),
        TypeNode::Primitive(p) => p.generics.clone(),
        TypeNode::Tuple(t) => t.elements.clone(),
        _ => {
            return Err(ConcretizeError::Internal(format!(
                "can not concretize `{}`",
                arena.display(shape)
            )));
        }
    };

    let star = expected
        .iter()
        .position(|&e| matches!(arena.get(e), TypeNode::AnyMatching));
    match star {
        Some(star) => {
            let split = VariadicSplit::new(expected.len(), star, concretes.len())?;
            for (e, c) in split.pairs() {
                extract(arena, &mut resolver, expected[e], concretes[c])?;
            }
        }
        None => {
            if expected.len() != concretes.len() {
                let (expected, found) = match &node {
                    TypeNode::Function(_) => (
                        expected.len().saturating_sub(1),
                        concretes.len().saturating_sub(1),
                    ),
                    _ => (expected.len(), concretes.len()),
                };
                return Err(ConcretizeError::ArityMismatch { expected, found });
            }
            for (&e, &c) in expected.iter().zip(concretes) {
                extract(arena, &mut resolver, e, c)?;
            }
        }
    }

    if matches!(node, TypeNode::Variant(_)) {
        resolver.fill_unbound(TYPE_ANY);
    }
    resolver.verify()?;

    let bindings = resolver.into_bindings();
    trace!(
        context = %arena.display(context_ref),
        bindings = ?bindings
            .iter()
            .map(|(name, ty)| format!("{name}={}", arena.display(*ty)))
            .collect::<Vec<_>>(),
        "concretized"
    );
    Ok(arena.resolved_context(context_ref, bindings))
}

/// Walk `expected` and `concrete` side by side, binding local type names.
fn extract(
    arena: &mut TypeArena,
    resolver: &mut DynamicLocalTypeResolver,
    expected: TypeId,
    concrete: TypeId,
) -> Result<(), ConcretizeError> {
    if !arena.has_free_names(expected) {
        return Ok(());
    }

    let expected = arena.unalias(expected);
    match arena.get(expected).clone() {
        TypeNode::LocalTypeName(local) => {
            if !resolver.contains(&local.name) {
                return Ok(());
            }
            let unaliased = arena.unalias(concrete);
            if matches!(arena.get(unaliased), TypeNode::LocalTypeName(_)) {
                return Ok(());
            }
            resolver.set_type(arena, &local.name, concrete)
        }
        TypeNode::Function(ef) => {
            let actual = arena.resolve(concrete)?;
            if let TypeNode::Function(cf) = arena.get(actual).clone() {
                extract_pairwise(arena, resolver, &ef.parameters, &cf.parameters)?;
            }
            Ok(())
        }
        TypeNode::Primitive(ep) => {
            let actual = arena.resolve(concrete)?;
            if let TypeNode::Primitive(cp) = arena.get(actual).clone()
                && cp.kind == ep.kind
            {
                extract_pairwise(arena, resolver, &ep.generics, &cp.generics)?;
            }
            Ok(())
        }
        TypeNode::Tuple(et) => {
            let actual = arena.resolve(concrete)?;
            if let TypeNode::Tuple(ct) = arena.get(actual).clone() {
                extract_pairwise(arena, resolver, &et.elements, &ct.elements)?;
            }
            Ok(())
        }
        TypeNode::Record(er) => {
            let actual = arena.resolve(concrete)?;
            if let TypeNode::Record(cr) = arena.get(actual).clone() {
                for field in er.fields() {
                    if let Some(other) = cr.find_field(&field.name) {
                        extract(arena, resolver, field.ty, other.ty)?;
                    }
                }
                extract_pairwise(arena, resolver, &er.generics, &cr.generics)?;
            }
            Ok(())
        }
        TypeNode::Invoker(invoker) => {
            let declaration = arena.unalias(invoker.target);
            let actual = arena.resolve(concrete)?;
            if let Some(custom) = arena.as_custom(actual).cloned()
                && custom.declaration(actual) == declaration
            {
                extract_pairwise(arena, resolver, &invoker.arguments, &custom.arguments)?;
            } else if let TypeNode::Primitive(cp) = arena.get(actual).clone()
                && arena.is_primitive(declaration, cp.kind)
            {
                extract_pairwise(arena, resolver, &invoker.arguments, &cp.generics)?;
            }
            Ok(())
        }
        TypeNode::Custom(ec) => {
            let actual = arena.resolve(concrete)?;
            if let Some(custom) = arena.as_custom(actual).cloned()
                && custom.declaration(actual) == ec.declaration(expected)
            {
                extract_pairwise(arena, resolver, &ec.arguments, &custom.arguments)?;
            }
            Ok(())
        }
        TypeNode::NameOnlyContext(_) | TypeNode::ContextReference(_) => {
            let actual = arena.unalias(concrete);
            if let TypeNode::ResolvedContext(resolved) = arena.get(actual).clone() {
                for (name, ty) in resolved.bindings {
                    if resolver.contains(&name) {
                        resolver.set_type(arena, &name, ty)?;
                    }
                }
            }
            Ok(())
        }
        TypeNode::Unmanaged(_)
        | TypeNode::AnyMatching
        | TypeNode::Variant(_)
        | TypeNode::Alias(_)
        | TypeNode::Reference(_)
        | TypeNode::ResolvedContext(_) => Ok(()),
    }
}

fn extract_pairwise(
    arena: &mut TypeArena,
    resolver: &mut DynamicLocalTypeResolver,
    expected: &[TypeId],
    concrete: &[TypeId],
) -> Result<(), ConcretizeError> {
    if expected.len() != concrete.len() {
        return Ok(());
    }
    for (&e, &c) in expected.iter().zip(concrete) {
        extract(arena, resolver, e, c)?;
    }
    Ok(())
}

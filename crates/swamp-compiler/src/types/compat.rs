//! `compatible_types`: may a value of type `actual` be used where `expected`
//! is required?

use std::collections::HashSet;

use super::arena::TypeArena;
use super::error::TypeError;
use super::node::*;

impl TypeArena {
    /// Identity, then `Any` on either side, then a custom type accepting one
    /// of its own variants, then structural comparison of the resolved atoms.
    pub fn compatible_types(&mut self, expected: TypeId, actual: TypeId) -> Result<(), TypeError> {
        let mut visited = HashSet::new();
        if self.is_compatible(expected, actual, &mut visited)? {
            return Ok(());
        }
        Err(TypeError::Mismatch {
            expected: self.display(expected),
            actual: self.display(actual),
        })
    }

    fn is_compatible(
        &mut self,
        expected: TypeId,
        actual: TypeId,
        visited: &mut HashSet<(TypeId, TypeId)>,
    ) -> Result<bool, TypeError> {
        if expected == actual {
            return Ok(true);
        }

        let expected = self.resolve(expected)?;
        let actual = self.resolve(actual)?;
        if expected == actual || self.is_any(expected) || self.is_any(actual) {
            return Ok(true);
        }

        let expected_node = self.get(expected).clone();
        let actual_node = self.get(actual).clone();
        match (&expected_node, &actual_node) {
            (TypeNode::Custom(_), TypeNode::Variant(v)) => self.is_compatible(expected, v.parent, visited),
            (TypeNode::Variant(e), TypeNode::Variant(a)) => {
                Ok(e.index == a.index && self.is_compatible(e.parent, a.parent, visited)?)
            }
            (TypeNode::AnyMatching, _) => Ok(true),
            (TypeNode::Primitive(e), TypeNode::Primitive(a)) => {
                if e.kind != a.kind {
                    return Ok(false);
                }
                self.all_compatible(&e.generics, &a.generics, visited)
            }
            (TypeNode::Unmanaged(e), TypeNode::Unmanaged(a)) => Ok(e.name == a.name),
            (TypeNode::Record(e), TypeNode::Record(a)) => {
                if e.len() != a.len() {
                    return Ok(false);
                }
                for (ef, af) in e.sorted_fields().zip(a.sorted_fields()) {
                    if ef.name != af.name || !self.is_compatible(ef.ty, af.ty, visited)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            (TypeNode::Function(e), TypeNode::Function(a)) => {
                self.all_compatible(&e.parameters, &a.parameters, visited)
            }
            (TypeNode::Tuple(e), TypeNode::Tuple(a)) => {
                self.all_compatible(&e.elements, &a.elements, visited)
            }
            (TypeNode::Custom(e), TypeNode::Custom(a)) => {
                if !visited.insert((expected, actual)) {
                    return Ok(true);
                }
                if e.variants.len() != a.variants.len() {
                    return Ok(false);
                }
                for (&ev, &av) in e.variants.iter().zip(&a.variants) {
                    let (Some(ev), Some(av)) = (self.as_variant(ev).cloned(), self.as_variant(av).cloned()) else {
                        return Err(TypeError::Internal("custom type member is not a variant".into()));
                    };
                    if ev.name != av.name || !self.all_compatible(&ev.parameters, &av.parameters, visited)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            (TypeNode::LocalTypeName(e), TypeNode::LocalTypeName(a)) => Ok(e.name == a.name),
            _ => Ok(false),
        }
    }

    fn all_compatible(
        &mut self,
        expected: &[TypeId],
        actual: &[TypeId],
        visited: &mut HashSet<(TypeId, TypeId)>,
    ) -> Result<bool, TypeError> {
        if expected.len() != actual.len() {
            return Ok(false);
        }
        for (&e, &a) in expected.iter().zip(actual) {
            if !self.is_compatible(e, a, visited)? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

//! Human readable and canonical names of type nodes.

use super::arena::TypeArena;
use super::node::*;

/// Local type name bindings in scope while rendering.
type Env<'a> = &'a [(String, TypeId)];

impl TypeArena {
    /// Source-syntax rendering: `(Int -> Bool) -> List Int -> List Bool`.
    pub fn display(&self, id: TypeId) -> String {
        let mut out = String::new();
        self.write_display(&mut out, id, &[], Precedence::Top);
        out
    }

    /// Deterministic, fully parenthesized key derived from structure:
    /// `(List Int)`, `{x:Int;y:Int}`, `(Int->Bool)`, `(Maybe Int)`.
    pub fn decorated_name(&self, id: TypeId) -> String {
        let mut out = String::new();
        self.write_decorated(&mut out, id, &[]);
        out
    }

    /// Name a type constructor is written with: `Maybe`, `List`, `Pair`.
    pub fn constructor_name(&self, id: TypeId) -> String {
        match self.get(id) {
            TypeNode::Primitive(p) => p.kind.name().to_string(),
            TypeNode::Unmanaged(u) => u.name.clone(),
            TypeNode::Custom(c) => c.name.clone(),
            TypeNode::Variant(v) => v.name.clone(),
            TypeNode::Alias(a) => a.name.clone(),
            TypeNode::Reference(r) => r.name.clone(),
            TypeNode::LocalTypeName(l) => l.name.clone(),
            TypeNode::ContextReference(r) => r.name.clone(),
            TypeNode::NameOnlyContext(c) => match c.body {
                Some(body) => self.constructor_name(body),
                None => "<context>".to_string(),
            },
            TypeNode::ResolvedContext(r) => self.constructor_name(r.reference),
            TypeNode::Invoker(i) => self.constructor_name(i.target),
            TypeNode::Record(_) | TypeNode::Tuple(_) | TypeNode::Function(_) | TypeNode::AnyMatching => {
                self.decorated_name(id)
            }
        }
    }

    fn write_display(&self, out: &mut String, id: TypeId, env: Env<'_>, prec: Precedence) {
        match self.get(id) {
            TypeNode::Primitive(p) => {
                self.write_applied(out, p.kind.name(), &p.generics, env, prec);
            }
            TypeNode::Unmanaged(u) => out.push_str(&u.name),
            TypeNode::Record(r) => {
                if r.is_empty() {
                    out.push_str("{}");
                    return;
                }
                out.push_str("{ ");
                for (i, field) in r.fields().iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    out.push_str(&field.name);
                    out.push_str(" : ");
                    self.write_display(out, field.ty, env, Precedence::Top);
                }
                out.push_str(" }");
            }
            TypeNode::Tuple(t) => {
                if t.elements.is_empty() {
                    out.push_str("()");
                    return;
                }
                out.push_str("( ");
                for (i, &element) in t.elements.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    self.write_display(out, element, env, Precedence::Top);
                }
                out.push_str(" )");
            }
            TypeNode::Function(f) => {
                let wrap = prec != Precedence::Top;
                if wrap {
                    out.push('(');
                }
                for (i, &param) in f.parameters.iter().enumerate() {
                    if i > 0 {
                        out.push_str(" -> ");
                    }
                    self.write_display(out, param, env, Precedence::Arrow);
                }
                if wrap {
                    out.push(')');
                }
            }
            TypeNode::Custom(c) => self.write_applied(out, &c.name, &c.arguments, env, prec),
            TypeNode::Variant(v) => self.write_display(out, v.parent, env, prec),
            TypeNode::AnyMatching => out.push('*'),
            TypeNode::Alias(a) => out.push_str(&a.name),
            TypeNode::Reference(r) => match self.get(r.target) {
                TypeNode::Custom(_) | TypeNode::Primitive(_) => {
                    self.write_display(out, r.target, env, prec)
                }
                _ => out.push_str(&r.name),
            },
            TypeNode::LocalTypeName(l) => match lookup(env, &l.name) {
                Some(bound) => self.write_display(out, bound, &[], prec),
                None => out.push_str(&l.name),
            },
            TypeNode::NameOnlyContext(c) => match c.body {
                Some(body) => self.write_display(out, body, env, prec),
                None => out.push_str("<context>"),
            },
            TypeNode::ContextReference(r) => {
                let shown = r.focus.unwrap_or(r.context);
                self.write_display(out, shown, env, prec);
            }
            TypeNode::ResolvedContext(r) => {
                self.write_display(out, r.reference, &r.bindings, prec);
            }
            TypeNode::Invoker(i) => {
                let name = self.constructor_name(i.target);
                self.write_applied(out, &name, &i.arguments, env, prec);
            }
        }
    }

    fn write_applied(
        &self,
        out: &mut String,
        name: &str,
        arguments: &[TypeId],
        env: Env<'_>,
        prec: Precedence,
    ) {
        if arguments.is_empty() {
            out.push_str(name);
            return;
        }
        let wrap = prec == Precedence::Argument;
        if wrap {
            out.push('(');
        }
        out.push_str(name);
        for &arg in arguments {
            out.push(' ');
            self.write_display(out, arg, env, Precedence::Argument);
        }
        if wrap {
            out.push(')');
        }
    }

    fn write_decorated(&self, out: &mut String, id: TypeId, env: Env<'_>) {
        match self.get(id) {
            TypeNode::Primitive(p) => self.write_decorated_applied(out, p.kind.name(), &p.generics, env),
            TypeNode::Unmanaged(u) => out.push_str(&u.name),
            TypeNode::Record(r) => {
                out.push('{');
                for (i, field) in r.sorted_fields().enumerate() {
                    if i > 0 {
                        out.push(';');
                    }
                    out.push_str(&field.name);
                    out.push(':');
                    self.write_decorated(out, field.ty, env);
                }
                out.push('}');
                if !r.generics.is_empty() {
                    out.push('<');
                    self.write_decorated_list(out, &r.generics, env, ",");
                    out.push('>');
                }
            }
            TypeNode::Tuple(t) => {
                out.push('(');
                self.write_decorated_list(out, &t.elements, env, ",");
                if t.elements.len() == 1 {
                    out.push(',');
                }
                out.push(')');
            }
            TypeNode::Function(f) => {
                out.push('(');
                self.write_decorated_list(out, &f.parameters, env, "->");
                out.push(')');
            }
            TypeNode::Custom(c) => self.write_decorated_applied(out, &c.name, &c.arguments, env),
            TypeNode::Variant(v) => {
                self.write_decorated(out, v.parent, env);
                out.push('.');
                out.push_str(&v.name);
            }
            TypeNode::AnyMatching => out.push('*'),
            TypeNode::Alias(a) => out.push_str(&a.name),
            TypeNode::Reference(r) => self.write_decorated(out, r.target, env),
            TypeNode::LocalTypeName(l) => match lookup(env, &l.name) {
                Some(bound) => self.write_decorated(out, bound, &[]),
                None => out.push_str(&l.name),
            },
            TypeNode::NameOnlyContext(c) => {
                out.push('<');
                out.push_str(&c.names.join(","));
                out.push('>');
                if let Some(body) = c.body {
                    self.write_decorated(out, body, env);
                }
            }
            TypeNode::ContextReference(r) => {
                let shown = r.focus.unwrap_or(r.context);
                self.write_decorated(out, shown, env);
            }
            TypeNode::ResolvedContext(r) => {
                let body = self.context_body(r.reference);
                match body {
                    Some(body) => self.write_decorated(out, body, &r.bindings),
                    None => self.write_decorated(out, r.reference, &r.bindings),
                }
            }
            TypeNode::Invoker(i) => {
                let name = self.constructor_name(i.target);
                self.write_decorated_applied(out, &name, &i.arguments, env);
            }
        }
    }

    fn write_decorated_applied(&self, out: &mut String, name: &str, arguments: &[TypeId], env: Env<'_>) {
        if arguments.is_empty() {
            out.push_str(name);
            return;
        }
        out.push('(');
        out.push_str(name);
        for &arg in arguments {
            out.push(' ');
            self.write_decorated(out, arg, env);
        }
        out.push(')');
    }

    fn write_decorated_list(&self, out: &mut String, items: &[TypeId], env: Env<'_>, separator: &str) {
        for (i, &item) in items.iter().enumerate() {
            if i > 0 {
                out.push_str(separator);
            }
            self.write_decorated(out, item, env);
        }
    }

    /// Body a context reference collapses to: the focused variant or the
    /// context body.
    pub(super) fn context_body(&self, reference: TypeId) -> Option<TypeId> {
        match self.get(reference) {
            TypeNode::ContextReference(r) => match r.focus {
                Some(focus) => Some(focus),
                None => self.as_context(r.context).and_then(|c| c.body),
            },
            TypeNode::NameOnlyContext(c) => c.body,
            _ => None,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Precedence {
    Top,
    /// Left of `->`.
    Arrow,
    /// Argument of a type application.
    Argument,
}

fn lookup(env: Env<'_>, name: &str) -> Option<TypeId> {
    env.iter().find(|(n, _)| n == name).map(|(_, t)| *t)
}

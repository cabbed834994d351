//! Decoration: type-check a parsed module and build its decorated tree.
//!
//! Declarations are processed in passes so that items may refer to each other
//! regardless of order:
//!
//! 1. custom types are declared empty (so variants may be mutually recursive)
//! 2. type aliases
//! 3. variants of every custom type
//! 4. annotations, then every definition is registered with its type
//! 5. definition bodies
//!
//! Generic annotations become name-only contexts. Calls to generic functions
//! and constructors of generic custom types are concretized per call site.

mod call;
mod case;
mod expr;
mod scope;
mod type_expr;

#[cfg(test)]
mod decorate_tests;

use std::collections::HashSet;

use indexmap::IndexMap;
use swamp_core::Span;

use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::ir::{Expression, ExpressionKind};
use crate::module::{Definition, Module};
use crate::resources::ResourceLookup;
use crate::syntax::ast;
use crate::type_repo::{Found, TypeRepoError};
use crate::types::{TYPE_ANY, TypeArena, TypeError, TypeId};

use scope::Scope;

/// Decorate `parsed` into `module`. Imports must already be linked.
pub fn decorate_module(
    arena: &mut TypeArena,
    resources: &mut dyn ResourceLookup,
    module: &mut Module,
    parsed: &ast::Module,
    diag: &mut Diagnostics,
) {
    let mut decorator = Decorator {
        arena,
        resources,
        module,
        diag,
        scope: Scope::default(),
        type_vars: Vec::new(),
        used_types: HashSet::new(),
        used_imports: HashSet::new(),
        declared_types: Vec::new(),
    };
    decorator.decorate(parsed);
}

pub(crate) struct Decorator<'a> {
    arena: &'a mut TypeArena,
    resources: &'a mut dyn ResourceLookup,
    module: &'a mut Module,
    diag: &'a mut Diagnostics,
    scope: Scope,
    /// Local type names visible while resolving a type expression.
    type_vars: Vec<(String, TypeId)>,
    used_types: HashSet<String>,
    used_imports: HashSet<usize>,
    declared_types: Vec<(String, Span)>,
}

impl Decorator<'_> {
    fn decorate(&mut self, parsed: &ast::Module) {
        let customs = self.declare_custom_types(parsed);
        self.declare_aliases(parsed);
        self.define_variants(parsed, &customs);

        let annotations = self.annotations(parsed);
        let definitions: Vec<&ast::Definition> = parsed
            .items
            .iter()
            .filter_map(|item| match item {
                ast::Item::Definition(def) => Some(def),
                _ => None,
            })
            .collect();

        for (name, (_, span)) in &annotations {
            if !definitions.iter().any(|d| d.name.name == *name) {
                self.diag
                    .report(DiagnosticKind::UnknownAnnotationTarget, *span)
                    .message(name.clone())
                    .emit();
            }
        }

        // Annotated definitions first, so unannotated constants may use them.
        let mut registered = Vec::new();
        for def in &definitions {
            if let Some(&(ty, _)) = annotations.get(&def.name.name) {
                if self.register(def, ty) {
                    registered.push(*def);
                }
            } else if !def.params.is_empty() || matches!(def.body.kind, ast::ExprKind::ExternalFunction { .. }) {
                self.diag
                    .report(DiagnosticKind::MissingAnnotation, def.name.span)
                    .message(def.name.name.clone())
                    .emit();
                self.register(def, TYPE_ANY);
            }
        }
        for def in &definitions {
            if annotations.contains_key(&def.name.name) || !def.params.is_empty() {
                continue;
            }
            if matches!(def.body.kind, ast::ExprKind::ExternalFunction { .. }) {
                continue;
            }
            let body = self.decorate_expr(&def.body);
            if self.register(def, body.ty)
                && let Some(definition) = self.module.definition_mut(&def.name.name)
            {
                definition.body = Some(body);
            }
        }

        for def in registered {
            self.decorate_definition(def);
        }

        if !self.module.internal {
            self.report_unused_imports();
            if self.module.path.is_main() {
                self.report_unused_types();
            }
        }
    }

    fn register(&mut self, def: &ast::Definition, ty: TypeId) -> bool {
        let added = self.module.add_definition(Definition {
            name: def.name.name.clone(),
            ty,
            body: None,
            span: def.span,
        });
        if !added {
            self.diag
                .report(DiagnosticKind::DuplicateDefinition, def.name.span)
                .message(def.name.name.clone())
                .emit();
        }
        added
    }

    /// Annotation types by name, in source order.
    fn annotations(&mut self, parsed: &ast::Module) -> IndexMap<String, (TypeId, Span)> {
        let mut out = IndexMap::new();
        for item in &parsed.items {
            let ast::Item::Annotation(annotation) = item else {
                continue;
            };
            if out.contains_key(&annotation.name.name) {
                self.diag
                    .report(DiagnosticKind::DuplicateDefinition, annotation.name.span)
                    .message(annotation.name.name.clone())
                    .emit();
                continue;
            }
            let ty = self.annotation_type(annotation);
            out.insert(annotation.name.name.clone(), (ty, annotation.name.span));
        }
        out
    }

    fn decorate_definition(&mut self, def: &ast::Definition) {
        let Some(ty) = self.module.definition(&def.name.name).map(|d| d.ty) else {
            return;
        };

        let body = if let ast::ExprKind::ExternalFunction { id, arity } = def.body.kind {
            self.external(def, ty, id, arity)
        } else if def.params.is_empty() {
            let body = self.decorate_expr(&def.body);
            self.check(DiagnosticKind::ShapeMismatch, ty, body.ty, def.body.span);
            Some(body)
        } else {
            self.function_value(def, ty)
        };

        debug_assert!(self.scope.is_empty());
        if let Some(definition) = self.module.definition_mut(&def.name.name) {
            definition.body = body;
        }
    }

    fn external(&mut self, def: &ast::Definition, ty: TypeId, id: u32, arity: u32) -> Option<Expression> {
        let resolved = self.resolve(ty, def.span)?;
        let declared = self.arena.as_function(resolved).map_or(0, |f| f.arity());
        if declared != arity as usize {
            self.diag
                .report(DiagnosticKind::ArityMismatch, def.body.span)
                .message(format!(
                    "`{}` is declared with {declared} parameters but the external function takes {arity}",
                    def.name.name
                ))
                .emit();
            return None;
        }
        Some(Expression::new(ExpressionKind::External { id, arity }, ty, def.body.span))
    }

    fn function_value(&mut self, def: &ast::Definition, ty: TypeId) -> Option<Expression> {
        let resolved = self.resolve(ty, def.span)?;
        let Some(function) = self.arena.as_function(resolved).cloned() else {
            if !self.arena.is_any(resolved) {
                self.diag
                    .report(DiagnosticKind::ArityMismatch, def.name.span)
                    .message(format!(
                        "`{}` has parameters but its type `{}` is not a function",
                        def.name.name,
                        self.arena.display(ty)
                    ))
                    .emit();
            }
            return None;
        };
        if function.arity() != def.params.len() {
            self.diag
                .report(DiagnosticKind::ArityMismatch, def.name.span)
                .message(format!(
                    "`{}` has {} parameters but its type `{}` takes {}",
                    def.name.name,
                    def.params.len(),
                    self.arena.display(ty),
                    function.arity()
                ))
                .emit();
            return None;
        }

        self.scope.push_frame();
        for (index, (param, &param_ty)) in def.params.iter().zip(function.arguments()).enumerate() {
            self.scope
                .bind(param.name.clone(), param_ty, scope::LocalKind::Parameter(index), param.span);
        }
        let body = self.decorate_expr(&def.body);
        self.scope.pop_frame();

        if let Some(expected) = function.return_type() {
            self.check(
                DiagnosticKind::UnMatchingFunctionReturnTypesInFunctionValue,
                expected,
                body.ty,
                def.body.span,
            );
        }

        let parameters = def.params.iter().map(|p| p.name.clone()).collect();
        Some(Expression::new(
            ExpressionKind::FunctionValue {
                parameters,
                body: Box::new(body),
            },
            ty,
            def.span,
        ))
    }

    // Lookups

    fn lookup_type(&mut self, key: &str) -> Option<TypeId> {
        let found = self.module.types.lookup_type(key)?;
        match found {
            Found::Local(_) => {
                self.used_types.insert(key.to_string());
            }
            Found::Imported(imported) => self.mark_import(imported.import),
        }
        Some(found.ty())
    }

    /// A local variant marks its parent type used.
    fn lookup_variant(&mut self, key: &str) -> Option<TypeId> {
        let found = self.module.types.lookup_variant(key)?;
        match found {
            Found::Local(variant) => {
                let parent = self
                    .arena
                    .as_variant(variant)
                    .and_then(|v| self.arena.as_custom(v.parent))
                    .map(|c| c.name.clone());
                if let Some(parent) = parent {
                    self.used_types.insert(parent);
                }
            }
            Found::Imported(imported) => self.mark_import(imported.import),
        }
        Some(found.ty())
    }

    fn mark_import(&mut self, import: Option<usize>) {
        if let Some(import) = import {
            self.used_imports.insert(import);
        }
    }

    // Checks

    /// Report `kind` unless a value of `actual` fits where `expected` is required.
    fn check(&mut self, kind: DiagnosticKind, expected: TypeId, actual: TypeId, span: Span) -> bool {
        match self.arena.compatible_types(expected, actual) {
            Ok(()) => true,
            Err(err) => {
                self.report_type_error(kind, err, span);
                false
            }
        }
    }

    fn report_type_error(&mut self, kind: DiagnosticKind, err: TypeError, span: Span) {
        let kind = match err {
            TypeError::ResolveDepthExceeded(_) | TypeError::Internal(_) => DiagnosticKind::InternalError,
            _ => kind,
        };
        self.diag.report(kind, span).message(err.to_string()).emit();
    }

    fn report_repo_error(&mut self, err: TypeRepoError, span: Span) {
        match err {
            TypeRepoError::AlreadyDeclared(name) => {
                self.diag
                    .report(DiagnosticKind::DuplicateType, span)
                    .message(name)
                    .emit();
            }
            TypeRepoError::Type(err) => self.report_type_error(DiagnosticKind::ShapeMismatch, err, span),
            TypeRepoError::Frozen => {
                self.diag
                    .report(DiagnosticKind::InternalError, span)
                    .message("declaration into a frozen module")
                    .emit();
            }
        }
    }

    /// Resolve to an atom, reporting failure as an internal error.
    fn resolve(&mut self, ty: TypeId, span: Span) -> Option<TypeId> {
        match self.arena.resolve(ty) {
            Ok(resolved) => Some(resolved),
            Err(err) => {
                self.report_type_error(DiagnosticKind::InternalError, err, span);
                None
            }
        }
    }

    fn poison(span: Span) -> Expression {
        Expression::new(ExpressionKind::Error, TYPE_ANY, span)
    }

    // Warnings

    fn report_unused_imports(&mut self) {
        let unused: Vec<_> = self
            .module
            .imports()
            .iter()
            .enumerate()
            .filter(|(index, _)| !self.used_imports.contains(index))
            .map(|(_, record)| (record.prefix.clone(), record.span))
            .collect();
        for (prefix, span) in unused {
            self.diag
                .report(DiagnosticKind::UnusedImport, span)
                .message(prefix)
                .emit();
        }
    }

    fn report_unused_types(&mut self) {
        for (name, span) in std::mem::take(&mut self.declared_types) {
            if !self.used_types.contains(&name) {
                self.diag
                    .report(DiagnosticKind::UnusedType, span)
                    .message(name)
                    .emit();
            }
        }
    }
}

//! Type declarations and type expressions.

use crate::diagnostics::DiagnosticKind;
use crate::syntax::ast::{self, TypeExpr, TypeExprKind};
use crate::types::{TYPE_ANY, TypeError, TypeId, TypeNode};

use super::Decorator;

impl Decorator<'_> {
    /// Declare every custom type without variants. Returns `(item index, type)`.
    pub(super) fn declare_custom_types(&mut self, parsed: &ast::Module) -> Vec<(usize, TypeId)> {
        let mut declared = Vec::new();
        for (index, item) in parsed.items.iter().enumerate() {
            let ast::Item::CustomType(custom) = item else {
                continue;
            };
            let locals = self.local_names(&custom.params);
            let ty = self.arena.declare_custom(
                custom.name.name.clone(),
                self.module.artifact.clone(),
                locals.iter().map(|(_, id)| *id).collect(),
                Some(custom.span),
            );
            match self.module.types.declare_type(self.arena, custom.name.name.clone(), ty) {
                Ok(()) => {
                    self.declared_types.push((custom.name.name.clone(), custom.name.span));
                    declared.push((index, ty));
                }
                Err(err) => self.report_repo_error(err, custom.name.span),
            }
        }
        declared
    }

    pub(super) fn declare_aliases(&mut self, parsed: &ast::Module) {
        for item in &parsed.items {
            let ast::Item::TypeAlias(alias) = item else {
                continue;
            };
            let locals = self.local_names(&alias.params);
            self.type_vars = locals.clone();
            let mut target = self.resolve_type_expr(&alias.target);
            self.type_vars.clear();

            if !locals.is_empty() {
                let names = locals.into_iter().map(|(name, _)| name).collect();
                let context = self.arena.name_only_context(names, Some(alias.span));
                if let Err(err) = self.arena.set_context_body(context, target) {
                    self.report_type_error(DiagnosticKind::InternalError, err, alias.span);
                }
                target = context;
            }

            let ty = self.arena.alias(
                alias.name.name.clone(),
                self.module.artifact.clone(),
                target,
                Some(alias.span),
            );
            match self.module.types.declare_type(self.arena, alias.name.name.clone(), ty) {
                Ok(()) => self.declared_types.push((alias.name.name.clone(), alias.name.span)),
                Err(err) => self.report_repo_error(err, alias.name.span),
            }
        }
    }

    pub(super) fn define_variants(&mut self, parsed: &ast::Module, customs: &[(usize, TypeId)]) {
        for &(index, custom_ty) in customs {
            let ast::Item::CustomType(custom) = &parsed.items[index] else {
                continue;
            };
            self.type_vars = self
                .arena
                .as_custom(custom_ty)
                .map(|c| c.generic_names.iter().cloned().zip(c.arguments.iter().copied()).collect())
                .unwrap_or_default();

            for variant in &custom.variants {
                let params = variant
                    .params
                    .iter()
                    .map(|p| self.resolve_type_expr(p))
                    .collect();
                let added = self
                    .arena
                    .add_variant(custom_ty, variant.name.name.clone(), params, Some(variant.name.span));
                match added {
                    Ok(variant_ty) => {
                        if let Err(err) = self.module.types.declare_variant(variant.name.name.clone(), variant_ty) {
                            self.report_repo_error(err, variant.name.span);
                        }
                    }
                    Err(err) => self.report_type_error(DiagnosticKind::DuplicateDefinition, err, variant.name.span),
                }
            }
            self.type_vars.clear();
        }
    }

    /// Type of an annotation. Free type variables make it generic: the result
    /// is a reference to a name-only context over them.
    pub(super) fn annotation_type(&mut self, annotation: &ast::Annotation) -> TypeId {
        let mut names = Vec::new();
        collect_type_variables(&annotation.ty, &mut names);
        if names.is_empty() {
            return self.resolve_type_expr(&annotation.ty);
        }

        self.type_vars = names
            .iter()
            .map(|name| (name.clone(), self.arena.local_type_name(name.clone(), Some(annotation.ty.span))))
            .collect();
        let body = self.resolve_type_expr(&annotation.ty);
        self.type_vars.clear();

        let context = self.arena.name_only_context(names, Some(annotation.ty.span));
        if let Err(err) = self.arena.set_context_body(context, body) {
            self.report_type_error(DiagnosticKind::InternalError, err, annotation.ty.span);
            return TYPE_ANY;
        }
        self.arena
            .context_reference(annotation.name.name.clone(), context, None, Some(annotation.ty.span))
    }

    pub(super) fn resolve_type_expr(&mut self, expr: &TypeExpr) -> TypeId {
        match &expr.kind {
            TypeExprKind::Named { name, args } => self.named_type(name, args, expr),
            TypeExprKind::Variable(ident) => {
                match self.type_vars.iter().find(|(n, _)| *n == ident.name) {
                    Some(&(_, id)) => id,
                    None => {
                        self.diag
                            .report(DiagnosticKind::UnknownType, ident.span)
                            .message(ident.name.clone())
                            .emit();
                        TYPE_ANY
                    }
                }
            }
            TypeExprKind::Function(parts) => {
                let parameters = parts.iter().map(|p| self.resolve_type_expr(p)).collect();
                match self
                    .module
                    .types
                    .add_function_atom(self.arena, parameters, Some(expr.span))
                {
                    Ok(ty) => ty,
                    Err(err) => {
                        self.report_repo_error(err, expr.span);
                        TYPE_ANY
                    }
                }
            }
            TypeExprKind::Record(fields) => {
                let fields = fields
                    .iter()
                    .map(|(name, ty)| (name.name.clone(), self.resolve_type_expr(ty)))
                    .collect();
                match self
                    .module
                    .types
                    .declare_record_type(self.arena, fields, Some(expr.span))
                {
                    Ok(ty) => ty,
                    Err(err) => {
                        self.report_repo_error(err, expr.span);
                        TYPE_ANY
                    }
                }
            }
            TypeExprKind::Tuple(elements) => {
                let elements = elements.iter().map(|e| self.resolve_type_expr(e)).collect();
                self.arena.tuple(elements, Some(expr.span))
            }
            TypeExprKind::AnyMatching => self.arena.any_matching(),
        }
    }

    fn named_type(&mut self, name: &ast::QualifiedName, args: &[TypeExpr], expr: &TypeExpr) -> TypeId {
        let key = name.key();
        let Some(ty) = self.lookup_type(&key) else {
            self.diag
                .report(DiagnosticKind::UnknownType, name.span())
                .message(key)
                .emit();
            return TYPE_ANY;
        };

        let expected = self.type_parameter_count(ty);
        if expected != args.len() {
            let err = if expected == 0 {
                TypeError::NotGeneric(key)
            } else {
                TypeError::TypeArgumentCount {
                    name: key,
                    expected,
                    found: args.len(),
                }
            };
            self.report_type_error(DiagnosticKind::ShapeMismatch, err, expr.span);
            return TYPE_ANY;
        }
        if args.is_empty() {
            return ty;
        }

        let arguments = args.iter().map(|a| self.resolve_type_expr(a)).collect();
        self.arena.invoker(ty, arguments, Some(expr.span))
    }

    fn type_parameter_count(&self, ty: TypeId) -> usize {
        match self.arena.get(self.arena.unalias(ty)) {
            TypeNode::Custom(custom) if custom.origin.is_none() => custom.generic_names.len(),
            TypeNode::Primitive(primitive) => primitive.kind.generic_arity(),
            TypeNode::NameOnlyContext(context) => context.names.len(),
            _ => 0,
        }
    }

    fn local_names(&mut self, params: &[ast::Ident]) -> Vec<(String, TypeId)> {
        params
            .iter()
            .map(|p| (p.name.clone(), self.arena.local_type_name(p.name.clone(), Some(p.span))))
            .collect()
    }
}

/// Lower-case type variables in order of first appearance.
fn collect_type_variables(expr: &TypeExpr, out: &mut Vec<String>) {
    match &expr.kind {
        TypeExprKind::Variable(ident) => {
            if !out.contains(&ident.name) {
                out.push(ident.name.clone());
            }
        }
        TypeExprKind::Named { args, .. } => {
            for arg in args {
                collect_type_variables(arg, out);
            }
        }
        TypeExprKind::Function(parts) | TypeExprKind::Tuple(parts) => {
            for part in parts {
                collect_type_variables(part, out);
            }
        }
        TypeExprKind::Record(fields) => {
            for (_, ty) in fields {
                collect_type_variables(ty, out);
            }
        }
        TypeExprKind::AnyMatching => {}
    }
}

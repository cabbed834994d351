//! `case ... of` over custom types and literals.

use std::collections::HashSet;

use swamp_core::Span;

use crate::diagnostics::DiagnosticKind;
use crate::ir::{CaseArm, CasePattern, Expression, ExpressionKind, Literal, literal_text};
use crate::syntax::ast::{self, Expr, PatternKind};
use crate::types::{TYPE_ANY, TypeId, TypeNode};

use super::Decorator;
use super::expr::lower_literal;
use super::scope::LocalKind;

/// Values a pattern binds: name, type, span.
type PatternLocals = Vec<(String, TypeId, Span)>;

#[derive(Default)]
struct Coverage {
    variants: HashSet<usize>,
    literals: Vec<Literal>,
    wildcard: bool,
}

impl Decorator<'_> {
    pub(super) fn case(&mut self, scrutinee: &Expr, arms: &[ast::CaseArm], span: Span) -> Expression {
        let scrutinee = self.decorate_expr(scrutinee);
        let custom = self.scrutinee_custom(&scrutinee);

        let mut coverage = Coverage::default();
        let mut decorated = Vec::with_capacity(arms.len());
        for arm in arms {
            let (pattern, locals) = self.pattern(&arm.pattern, &scrutinee, custom, &mut coverage);

            self.scope.push_frame();
            for (name, ty, span) in locals {
                self.scope.bind(name, ty, LocalKind::Pattern, span);
            }
            let body = self.decorate_expr(&arm.body);
            self.scope.pop_frame();

            decorated.push(CaseArm { pattern, body });
        }

        if !coverage.wildcard {
            self.report_missing(custom, &coverage, span);
        }

        let types: Vec<TypeId> = decorated.iter().map(|a| a.body.ty).collect();
        let ty = self.first_known(&types);
        for arm in &decorated {
            self.check(DiagnosticKind::UnmatchingBranchTypes, ty, arm.body.ty, arm.body.span);
        }

        Expression::new(
            ExpressionKind::Case {
                scrutinee: Box::new(scrutinee),
                arms: decorated,
            },
            ty,
            span,
        )
    }

    /// The custom type being matched, or `None` for literals and `Any`.
    fn scrutinee_custom(&mut self, scrutinee: &Expression) -> Option<TypeId> {
        let resolved = self.resolve(scrutinee.ty, scrutinee.span)?;
        match self.arena.get(resolved) {
            TypeNode::Custom(_) => Some(resolved),
            TypeNode::Variant(v) => Some(v.parent),
            _ => None,
        }
    }

    fn pattern(
        &mut self,
        pattern: &ast::Pattern,
        scrutinee: &Expression,
        custom: Option<TypeId>,
        coverage: &mut Coverage,
    ) -> (CasePattern, PatternLocals) {
        match &pattern.kind {
            PatternKind::Wildcard => {
                if coverage.wildcard {
                    self.diag
                        .report(DiagnosticKind::DuplicateCasePattern, pattern.span)
                        .message("_")
                        .emit();
                }
                coverage.wildcard = true;
                (CasePattern::Wildcard, Vec::new())
            }
            PatternKind::Literal(literal) => {
                let (literal, ty) = lower_literal(literal);
                self.check(DiagnosticKind::ShapeMismatch, scrutinee.ty, ty, pattern.span);
                if coverage.literals.contains(&literal) {
                    self.diag
                        .report(DiagnosticKind::DuplicateCasePattern, pattern.span)
                        .message(literal_text(&literal))
                        .emit();
                } else {
                    coverage.literals.push(literal.clone());
                }
                (CasePattern::Literal(literal), Vec::new())
            }
            PatternKind::Variant { name, bindings } => self.variant_pattern(name, bindings, scrutinee, custom, coverage),
        }
    }

    fn variant_pattern(
        &mut self,
        name: &ast::QualifiedName,
        bindings: &[ast::Ident],
        scrutinee: &Expression,
        custom: Option<TypeId>,
        coverage: &mut Coverage,
    ) -> (CasePattern, PatternLocals) {
        let key = name.key();
        // Marks the declaring type or import used.
        let _ = self.lookup_variant(&key);

        let untyped = |bindings: &[ast::Ident]| -> PatternLocals {
            bindings
                .iter()
                .map(|b| (b.name.clone(), TYPE_ANY, b.span))
                .collect()
        };
        let fallback = |key: String, bindings: &[ast::Ident]| CasePattern::Variant {
            variant: TYPE_ANY,
            name: key,
            bindings: bindings.iter().map(|b| b.name.clone()).collect(),
        };

        let Some(custom) = custom else {
            if !self.arena.is_any(scrutinee.ty) {
                self.diag
                    .report(DiagnosticKind::ShapeMismatch, name.span())
                    .message(format!(
                        "`{key}` can not match a value of type `{}`",
                        self.arena.display(scrutinee.ty)
                    ))
                    .emit();
            }
            return (fallback(key, bindings), untyped(bindings));
        };

        let Some(variant) = self
            .arena
            .find_variant(custom, &name.name.name)
            .and_then(|v| self.arena.as_variant(v).cloned().map(|atom| (v, atom)))
        else {
            self.diag
                .report(DiagnosticKind::UnknownVariant, name.span())
                .message(key.clone())
                .emit();
            return (fallback(key, bindings), untyped(bindings));
        };
        let (variant_ty, atom) = variant;

        if !coverage.variants.insert(atom.index) {
            self.diag
                .report(DiagnosticKind::DuplicateCasePattern, name.span())
                .message(key.clone())
                .emit();
        }

        let locals = if atom.parameters.len() == bindings.len() {
            bindings
                .iter()
                .zip(&atom.parameters)
                .filter(|(b, _)| b.name != "_")
                .map(|(b, &ty)| (b.name.clone(), ty, b.span))
                .collect()
        } else {
            self.diag
                .report(DiagnosticKind::ArityMismatch, name.span())
                .message(format!(
                    "`{key}` has {} fields, the pattern binds {}",
                    atom.parameters.len(),
                    bindings.len()
                ))
                .emit();
            untyped(bindings)
        };

        let pattern = CasePattern::Variant {
            variant: variant_ty,
            name: key,
            bindings: bindings.iter().map(|b| b.name.clone()).collect(),
        };
        (pattern, locals)
    }

    fn report_missing(&mut self, custom: Option<TypeId>, coverage: &Coverage, span: Span) {
        match custom.and_then(|c| self.arena.as_custom(c)) {
            Some(atom) => {
                let missing: Vec<String> = atom
                    .variants
                    .iter()
                    .filter_map(|&v| self.arena.as_variant(v))
                    .filter(|v| !coverage.variants.contains(&v.index))
                    .map(|v| v.name.clone())
                    .collect();
                if !missing.is_empty() {
                    self.diag
                        .report(DiagnosticKind::UnhandledCustomTypeVariants, span)
                        .message(missing.join(", "))
                        .emit();
                }
            }
            None => {
                if !coverage.literals.is_empty() {
                    self.diag
                        .report(DiagnosticKind::UnhandledCustomTypeVariants, span)
                        .message("_")
                        .emit();
                }
            }
        }
    }
}

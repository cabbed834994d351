//! Calls and constructors.

use swamp_core::Span;

use crate::concretize::{ConcretizeError, VariadicSplit, concretize};
use crate::diagnostics::DiagnosticKind;
use crate::ir::{Expression, ExpressionKind};
use crate::syntax::ast::{self, Expr, ExprKind};
use crate::types::{FunctionAtom, TYPE_ANY, TypeId, TypeNode};

use super::Decorator;

impl Decorator<'_> {
    pub(super) fn call(&mut self, callee: &Expr, args: &[Expr], span: Span) -> Expression {
        if let ExprKind::Constructor(name) = &callee.kind {
            return self.constructor(name, args, span);
        }

        let callee = self.decorate_expr(callee);
        let arguments: Vec<Expression> = args.iter().map(|a| self.decorate_expr(a)).collect();

        if self.is_generic(callee.ty) {
            return self.generic_call(callee, arguments, span);
        }

        let Some(resolved) = self.resolve(callee.ty, callee.span) else {
            return Self::poison(span);
        };
        if self.arena.is_any(resolved) {
            return Self::plain_call(callee, arguments, TYPE_ANY, span);
        }
        let Some(function) = self.arena.as_function(resolved).cloned() else {
            self.diag
                .report(DiagnosticKind::NotCallable, callee.span)
                .message(format!("`{}`", self.arena.display(callee.ty)))
                .emit();
            return Self::poison(span);
        };

        self.check_arguments(&function, &arguments, span);
        let ty = function.return_type().unwrap_or(TYPE_ANY);
        Self::plain_call(callee, arguments, ty, span)
    }

    fn plain_call(callee: Expression, arguments: Vec<Expression>, ty: TypeId, span: Span) -> Expression {
        Expression::new(
            ExpressionKind::Call {
                callee: Box::new(callee),
                arguments,
                context: None,
            },
            ty,
            span,
        )
    }

    fn is_generic(&self, ty: TypeId) -> bool {
        let unaliased = self.arena.unalias(ty);
        matches!(self.arena.get(unaliased), TypeNode::ContextReference(_))
    }

    /// Argument types for concretization; generic function values bind nothing.
    fn concretes(&self, arguments: &[Expression]) -> Vec<TypeId> {
        arguments
            .iter()
            .map(|a| if self.is_generic(a.ty) { TYPE_ANY } else { a.ty })
            .collect()
    }

    fn generic_call(&mut self, callee: Expression, arguments: Vec<Expression>, span: Span) -> Expression {
        let reference = self.arena.unalias(callee.ty);
        let mut concretes = self.concretes(&arguments);
        concretes.push(TYPE_ANY);

        let context = match concretize(self.arena, reference, &concretes) {
            Ok(context) => context,
            Err(ConcretizeError::Unresolved(_))
                if arguments.iter().any(|a| self.arena.has_free_names(a.ty)) =>
            {
                // Called from a generic body: checked where that body is instantiated.
                return Self::plain_call(callee, arguments, TYPE_ANY, span);
            }
            Err(err) => {
                self.report_concretize_error(err, span);
                return Self::poison(span);
            }
        };

        let Some(resolved) = self.resolve(context, span) else {
            return Self::poison(span);
        };
        let Some(function) = self.arena.as_function(resolved).cloned() else {
            self.diag
                .report(DiagnosticKind::NotCallable, callee.span)
                .message(format!("`{}`", self.arena.display(callee.ty)))
                .emit();
            return Self::poison(span);
        };

        self.check_arguments(&function, &arguments, span);
        let ty = function.return_type().unwrap_or(TYPE_ANY);
        Expression::new(
            ExpressionKind::Call {
                callee: Box::new(callee),
                arguments,
                context: Some(context),
            },
            ty,
            span,
        )
    }

    /// Check arguments against parameters, lining up around a `*` wildcard.
    fn check_arguments(&mut self, function: &FunctionAtom, arguments: &[Expression], span: Span) -> bool {
        let parameters = &function.parameters;
        let star = parameters
            .iter()
            .position(|&p| matches!(self.arena.get(p), TypeNode::AnyMatching));

        let pairs: Vec<(usize, usize)> = match star {
            Some(star) => match VariadicSplit::new(parameters.len(), star, arguments.len() + 1) {
                // The last concrete is the return slot.
                Ok(split) => split.pairs().filter(|&(_, a)| a < arguments.len()).collect(),
                Err(err) => {
                    self.report_concretize_error(err, span);
                    return false;
                }
            },
            None => {
                if function.arity() != arguments.len() {
                    self.report_concretize_error(
                        ConcretizeError::ArityMismatch {
                            expected: function.arity(),
                            found: arguments.len(),
                        },
                        span,
                    );
                    return false;
                }
                (0..arguments.len()).map(|i| (i, i)).collect()
            }
        };

        let mut ok = true;
        for (p, a) in pairs {
            ok &= self.check_argument(parameters[p], &arguments[a]);
        }
        ok
    }

    /// A generic function value is first concretized against the expected
    /// function type.
    fn check_argument(&mut self, expected: TypeId, argument: &Expression) -> bool {
        let mut actual = argument.ty;
        if self.is_generic(actual)
            && let Ok(resolved) = self.arena.resolve(expected)
            && let Some(function) = self.arena.as_function(resolved).cloned()
        {
            let reference = self.arena.unalias(actual);
            match concretize(self.arena, reference, &function.parameters) {
                Ok(context) => actual = context,
                Err(err) => {
                    self.report_concretize_error(err, argument.span);
                    return false;
                }
            }
        }
        self.check(DiagnosticKind::FunctionArgumentTypeMismatch, expected, actual, argument.span)
    }

    fn report_concretize_error(&mut self, err: ConcretizeError, span: Span) {
        let kind = match err {
            ConcretizeError::Type(err) => {
                self.report_type_error(DiagnosticKind::FunctionArgumentTypeMismatch, err, span);
                return;
            }
            ConcretizeError::ArityMismatch { .. } => DiagnosticKind::ArityMismatch,
            ConcretizeError::WrongArityForVariadic => DiagnosticKind::WrongArityForVariadic,
            ConcretizeError::Unresolved(_) => DiagnosticKind::UnresolvableLocalTypeName,
            ConcretizeError::Internal(_) => DiagnosticKind::InternalError,
        };
        self.diag.report(kind, span).message(err.to_string()).emit();
    }

    /// `Just 1`, `Nothing`, `Game.Move 1 2`. The expression has the parent
    /// type; a generic parent is instantiated from the arguments.
    pub(super) fn constructor(&mut self, name: &ast::QualifiedName, args: &[Expr], span: Span) -> Expression {
        let key = name.key();
        let arguments: Vec<Expression> = args.iter().map(|a| self.decorate_expr(a)).collect();

        let Some(declared) = self.lookup_variant(&key) else {
            self.diag
                .report(DiagnosticKind::UnknownVariant, name.span())
                .message(key)
                .emit();
            return Self::poison(span);
        };
        let Some(variant) = self.arena.as_variant(declared).cloned() else {
            self.diag
                .report(DiagnosticKind::InternalError, span)
                .message(format!("`{key}` is not a variant"))
                .emit();
            return Self::poison(span);
        };
        if variant.parameters.len() != arguments.len() {
            self.diag
                .report(DiagnosticKind::ArityMismatch, span)
                .message(format!(
                    "`{key}` takes {} arguments, found {}",
                    variant.parameters.len(),
                    arguments.len()
                ))
                .emit();
            return Self::poison(span);
        }

        let generic_names = self
            .arena
            .as_custom(variant.parent)
            .map(|c| c.generic_names.clone())
            .unwrap_or_default();
        let instance = if generic_names.is_empty() {
            declared
        } else {
            match self.instantiate_variant(&key, declared, variant.parent, generic_names, &arguments, span) {
                Some(instance) => instance,
                None => return Self::poison(span),
            }
        };

        let Some(instance_atom) = self.arena.as_variant(instance).cloned() else {
            return Self::poison(span);
        };
        for (&param, argument) in instance_atom.parameters.iter().zip(&arguments) {
            self.check_argument(param, argument);
        }

        Expression::new(
            ExpressionKind::Constructor {
                variant: instance,
                name: key,
                arguments,
            },
            instance_atom.parent,
            span,
        )
    }

    fn instantiate_variant(
        &mut self,
        key: &str,
        variant: TypeId,
        parent: TypeId,
        generic_names: Vec<String>,
        arguments: &[Expression],
        span: Span,
    ) -> Option<TypeId> {
        let context = self.arena.name_only_context(generic_names, Some(span));
        if let Err(err) = self.arena.set_context_body(context, parent) {
            self.report_type_error(DiagnosticKind::InternalError, err, span);
            return None;
        }
        let reference = self.arena.context_reference(key, context, Some(variant), Some(span));
        let concretes = self.concretes(arguments);
        match concretize(self.arena, reference, &concretes) {
            Ok(resolved) => self.resolve(resolved, span),
            Err(err) => {
                self.report_concretize_error(err, span);
                None
            }
        }
    }
}

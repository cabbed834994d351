//! Expressions other than calls and case.

use swamp_core::Span;

use crate::diagnostics::DiagnosticKind;
use crate::ir::{
    ArithmeticOp, ComparisonOp, Expression, ExpressionKind, LetBinding, Literal, LogicalOp,
    RecordFieldValue,
};
use crate::syntax::ast::{self, BinaryOp, Expr, ExprKind};
use crate::types::{
    PrimitiveKind, TYPE_ANY, TYPE_BOOL, TYPE_CHAR, TYPE_FIXED, TYPE_INT, TYPE_RESOURCE_NAME,
    TYPE_STRING, TypeId, TypeNode,
};

use super::Decorator;
use super::scope::LocalKind;

impl Decorator<'_> {
    pub(super) fn decorate_expr(&mut self, expr: &Expr) -> Expression {
        let span = expr.span;
        match &expr.kind {
            ExprKind::Literal(literal) => {
                let (literal, ty) = lower_literal(literal);
                Expression::new(ExpressionKind::Literal(literal), ty, span)
            }
            ExprKind::Resource(name) => {
                let id = self.resources.lookup_resource_id(name);
                Expression::new(
                    ExpressionKind::ResourceName {
                        name: name.clone(),
                        id,
                    },
                    TYPE_RESOURCE_NAME,
                    span,
                )
            }
            ExprKind::Variable(name) => self.variable(name, span),
            ExprKind::Constructor(name) => self.constructor(name, &[], span),
            ExprKind::Call { callee, args } => self.call(callee, args, span),
            ExprKind::Binary { op, left, right } => self.binary(*op, left, right, span),
            ExprKind::Negate(operand) => self.negate(operand, span),
            ExprKind::If {
                condition,
                then_branch,
                else_branch,
            } => self.if_expr(condition, then_branch, else_branch, span),
            ExprKind::Let { bindings, body } => self.let_expr(bindings, body, span),
            ExprKind::Case { scrutinee, arms } => self.case(scrutinee, arms, span),
            ExprKind::Record(fields) => self.record(fields, span),
            ExprKind::RecordUpdate { record, fields } => self.record_update(record, fields, span),
            ExprKind::FieldAccess { target, field } => self.field_access(target, field, span),
            ExprKind::Tuple(elements) => {
                let elements: Vec<Expression> = elements.iter().map(|e| self.decorate_expr(e)).collect();
                let ty = self
                    .arena
                    .tuple(elements.iter().map(|e| e.ty).collect(), Some(span));
                Expression::new(ExpressionKind::Tuple(elements), ty, span)
            }
            ExprKind::List(elements) => self.list(elements, span),
            ExprKind::ExternalFunction { .. } => {
                self.diag
                    .report(DiagnosticKind::ShapeMismatch, span)
                    .message("`__externalfn` is only allowed as a definition body")
                    .emit();
                Self::poison(span)
            }
        }
    }

    fn variable(&mut self, name: &ast::QualifiedName, span: Span) -> Expression {
        if name.qualifier.is_empty() {
            if let Some(local) = self.scope.use_local(&name.name.name) {
                let kind = match local.kind {
                    LocalKind::Parameter(index) => ExpressionKind::Parameter {
                        name: local.name.clone(),
                        index,
                    },
                    LocalKind::Let | LocalKind::Pattern => ExpressionKind::LetLocal {
                        name: local.name.clone(),
                    },
                };
                return Expression::new(kind, local.ty, span);
            }
            if let Some(definition) = self.module.definition(&name.name.name) {
                let kind = ExpressionKind::Definition {
                    name: self.module.artifact.member(&definition.name),
                };
                return Expression::new(kind, definition.ty, span);
            }
        }

        let key = name.key();
        if let Some(imported) = self.module.imported_definition(&key).cloned() {
            self.mark_import(imported.import);
            return Expression::new(
                ExpressionKind::Definition {
                    name: imported.qualified,
                },
                imported.ty,
                span,
            );
        }

        self.diag
            .report(DiagnosticKind::UnknownIdentifier, name.span())
            .message(key)
            .emit();
        Self::poison(span)
    }

    fn binary(&mut self, op: BinaryOp, left: &Expr, right: &Expr, span: Span) -> Expression {
        let left = self.decorate_expr(left);
        let right = self.decorate_expr(right);
        let operands_match = self.check(
            DiagnosticKind::UnmatchingBinaryOperatorTypes,
            left.ty,
            right.ty,
            right.span,
        );
        let operand_ty = if self.arena.is_any(left.ty) { right.ty } else { left.ty };

        let (left, right) = (Box::new(left), Box::new(right));
        match op {
            BinaryOp::Add | BinaryOp::Subtract | BinaryOp::Multiply | BinaryOp::Divide => {
                if operands_match {
                    self.require_kind(op, operand_ty, &[PrimitiveKind::Int, PrimitiveKind::Fixed], span);
                }
                let op = match op {
                    BinaryOp::Add => ArithmeticOp::Add,
                    BinaryOp::Subtract => ArithmeticOp::Subtract,
                    BinaryOp::Multiply => ArithmeticOp::Multiply,
                    _ => ArithmeticOp::Divide,
                };
                Expression::new(ExpressionKind::Arithmetic { op, left, right }, operand_ty, span)
            }
            BinaryOp::Append => {
                if operands_match {
                    self.require_kind(op, operand_ty, &[PrimitiveKind::String, PrimitiveKind::List], span);
                }
                Expression::new(ExpressionKind::Append { left, right }, operand_ty, span)
            }
            BinaryOp::Equal | BinaryOp::NotEqual => {
                let op = if op == BinaryOp::Equal {
                    ComparisonOp::Equal
                } else {
                    ComparisonOp::NotEqual
                };
                Expression::new(ExpressionKind::Comparison { op, left, right }, TYPE_BOOL, span)
            }
            BinaryOp::Less | BinaryOp::LessEqual | BinaryOp::Greater | BinaryOp::GreaterEqual => {
                if operands_match {
                    self.require_kind(
                        op,
                        operand_ty,
                        &[
                            PrimitiveKind::Int,
                            PrimitiveKind::Fixed,
                            PrimitiveKind::Char,
                            PrimitiveKind::String,
                        ],
                        span,
                    );
                }
                let op = match op {
                    BinaryOp::Less => ComparisonOp::Less,
                    BinaryOp::LessEqual => ComparisonOp::LessEqual,
                    BinaryOp::Greater => ComparisonOp::Greater,
                    _ => ComparisonOp::GreaterEqual,
                };
                Expression::new(ExpressionKind::Comparison { op, left, right }, TYPE_BOOL, span)
            }
            BinaryOp::And | BinaryOp::Or => {
                if operands_match {
                    self.require_kind(op, operand_ty, &[PrimitiveKind::Bool], span);
                }
                let op = if op == BinaryOp::And {
                    LogicalOp::And
                } else {
                    LogicalOp::Or
                };
                Expression::new(ExpressionKind::Logical { op, left, right }, TYPE_BOOL, span)
            }
        }
    }

    /// Operand must resolve to one of `kinds`; `Any` always passes.
    fn require_kind(&mut self, op: BinaryOp, ty: TypeId, kinds: &[PrimitiveKind], span: Span) {
        let Some(resolved) = self.resolve(ty, span) else {
            return;
        };
        let accepted = match self.arena.get(resolved) {
            TypeNode::Primitive(p) => p.kind == PrimitiveKind::Any || kinds.contains(&p.kind),
            _ => false,
        };
        if !accepted {
            let names: Vec<&str> = kinds.iter().map(|k| k.name()).collect();
            self.diag
                .report(DiagnosticKind::UnmatchingBinaryOperatorTypes, span)
                .message(format!(
                    "`{}` needs {} operands, found `{}`",
                    op.symbol(),
                    names.join(" or "),
                    self.arena.display(ty)
                ))
                .emit();
        }
    }

    fn negate(&mut self, operand: &Expr, span: Span) -> Expression {
        let operand = self.decorate_expr(operand);
        let ty = operand.ty;
        if let Some(resolved) = self.resolve(ty, span)
            && !self.arena.is_any(resolved)
            && !self.arena.is_primitive(resolved, PrimitiveKind::Int)
            && !self.arena.is_primitive(resolved, PrimitiveKind::Fixed)
        {
            self.diag
                .report(DiagnosticKind::UnmatchingBinaryOperatorTypes, span)
                .message(format!("`-` needs an Int or Fixed operand, found `{}`", self.arena.display(ty)))
                .emit();
        }
        Expression::new(ExpressionKind::Negate(Box::new(operand)), ty, span)
    }

    fn if_expr(&mut self, condition: &Expr, then_branch: &Expr, else_branch: &Expr, span: Span) -> Expression {
        let condition = self.decorate_expr(condition);
        if self.arena.compatible_types(TYPE_BOOL, condition.ty).is_err() {
            self.diag
                .report(DiagnosticKind::IfConditionNotBool, condition.span)
                .message(format!("found `{}`", self.arena.display(condition.ty)))
                .emit();
        }
        let then_branch = self.decorate_expr(then_branch);
        let else_branch = self.decorate_expr(else_branch);
        self.check(
            DiagnosticKind::UnmatchingBranchTypes,
            then_branch.ty,
            else_branch.ty,
            else_branch.span,
        );
        let ty = self.first_known(&[then_branch.ty, else_branch.ty]);
        Expression::new(
            ExpressionKind::If {
                condition: Box::new(condition),
                then_branch: Box::new(then_branch),
                else_branch: Box::new(else_branch),
            },
            ty,
            span,
        )
    }

    fn let_expr(&mut self, bindings: &[ast::LetBinding], body: &Expr, span: Span) -> Expression {
        self.scope.push_frame();
        let mut decorated = Vec::with_capacity(bindings.len());
        for binding in bindings {
            let value = self.decorate_expr(&binding.value);
            self.scope
                .bind(binding.name.name.clone(), value.ty, LocalKind::Let, binding.name.span);
            decorated.push(LetBinding {
                name: binding.name.name.clone(),
                value,
            });
        }
        let body = self.decorate_expr(body);

        for local in self.scope.pop_frame() {
            if !local.used && !local.name.starts_with('_') && !self.module.internal {
                self.diag
                    .report(DiagnosticKind::UnusedLocalDefinition, local.span)
                    .message(local.name)
                    .emit();
            }
        }

        let ty = body.ty;
        Expression::new(
            ExpressionKind::Let {
                bindings: decorated,
                body: Box::new(body),
            },
            ty,
            span,
        )
    }

    fn record(&mut self, fields: &[ast::FieldInit], span: Span) -> Expression {
        let values: Vec<(String, Expression)> = fields
            .iter()
            .map(|f| (f.name.name.clone(), self.decorate_expr(&f.value)))
            .collect();
        let field_types = values.iter().map(|(name, value)| (name.clone(), value.ty)).collect();
        let ty = match self
            .module
            .types
            .declare_record_type(self.arena, field_types, Some(span))
        {
            Ok(ty) => ty,
            Err(err) => {
                self.report_repo_error(err, span);
                return Self::poison(span);
            }
        };

        let record = self.arena.as_record(ty).cloned();
        let fields = values
            .into_iter()
            .map(|(name, value)| {
                let index = record
                    .as_ref()
                    .and_then(|r| r.find_field(&name))
                    .map_or(0, |f| f.index);
                RecordFieldValue { name, index, value }
            })
            .collect();
        Expression::new(ExpressionKind::Record(fields), ty, span)
    }

    fn record_update(&mut self, record: &ast::Ident, fields: &[ast::FieldInit], span: Span) -> Expression {
        let name = ast::QualifiedName {
            qualifier: Vec::new(),
            name: record.clone(),
        };
        let target = self.variable(&name, record.span);
        let ty = target.ty;
        let atom = self
            .resolve(ty, record.span)
            .and_then(|resolved| self.arena.as_record(resolved).cloned());
        if atom.is_none() && !self.arena.is_any(ty) {
            self.diag
                .report(DiagnosticKind::ShapeMismatch, record.span)
                .message(format!("`{}` is not a record", self.arena.display(ty)))
                .emit();
        }

        let mut updated = Vec::with_capacity(fields.len());
        for field in fields {
            let value = self.decorate_expr(&field.value);
            let mut index = 0;
            if let Some(atom) = &atom {
                match atom.find_field(&field.name.name) {
                    Some(existing) => {
                        index = existing.index;
                        self.check(DiagnosticKind::WrongRecordFieldType, existing.ty, value.ty, value.span);
                    }
                    None => {
                        self.diag
                            .report(DiagnosticKind::UnknownRecordField, field.name.span)
                            .message(field.name.name.clone())
                            .emit();
                    }
                }
            }
            updated.push(RecordFieldValue {
                name: field.name.name.clone(),
                index,
                value,
            });
        }

        Expression::new(
            ExpressionKind::RecordUpdate {
                record: Box::new(target),
                fields: updated,
            },
            ty,
            span,
        )
    }

    fn field_access(&mut self, target: &Expr, field: &ast::Ident, span: Span) -> Expression {
        let target = self.decorate_expr(target);
        if self.arena.is_any(target.ty) {
            return Self::poison(span);
        }
        let atom = self
            .resolve(target.ty, target.span)
            .and_then(|resolved| self.arena.as_record(resolved).cloned());
        let Some(atom) = atom else {
            self.diag
                .report(DiagnosticKind::ShapeMismatch, target.span)
                .message(format!("`{}` is not a record", self.arena.display(target.ty)))
                .emit();
            return Self::poison(span);
        };
        let Some(found) = atom.find_field(&field.name) else {
            self.diag
                .report(DiagnosticKind::UnknownRecordField, field.span)
                .message(field.name.clone())
                .emit();
            return Self::poison(span);
        };
        Expression::new(
            ExpressionKind::FieldAccess {
                target: Box::new(target),
                field: field.name.clone(),
                index: found.index,
            },
            found.ty,
            span,
        )
    }

    fn list(&mut self, elements: &[Expr], span: Span) -> Expression {
        let elements: Vec<Expression> = elements.iter().map(|e| self.decorate_expr(e)).collect();
        let element_ty = self.first_known(&elements.iter().map(|e| e.ty).collect::<Vec<_>>());
        for element in &elements {
            self.check(DiagnosticKind::ShapeMismatch, element_ty, element.ty, element.span);
        }
        let ty = self.arena.list_of(element_ty);
        Expression::new(ExpressionKind::List(elements), ty, span)
    }

    /// First type that is not the `Any` placeholder.
    pub(super) fn first_known(&self, types: &[TypeId]) -> TypeId {
        types
            .iter()
            .copied()
            .find(|&ty| !self.arena.is_any(ty))
            .or_else(|| types.first().copied())
            .unwrap_or(TYPE_ANY)
    }
}

pub(super) fn lower_literal(literal: &ast::Literal) -> (Literal, TypeId) {
    match literal {
        ast::Literal::Int(v) => (Literal::Int(*v), TYPE_INT),
        ast::Literal::Fixed(v) => (Literal::Fixed(*v), TYPE_FIXED),
        ast::Literal::Str(s) => (Literal::String(s.clone()), TYPE_STRING),
        ast::Literal::Char(c) => (Literal::Char(*c), TYPE_CHAR),
        ast::Literal::Bool(b) => (Literal::Bool(*b), TYPE_BOOL),
    }
}

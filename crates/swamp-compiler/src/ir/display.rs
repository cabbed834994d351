//! Short-form text dump of the decorated tree, one node per line.

use std::fmt::Write as _;

use crate::types::{TypeArena, TypeId, TypeNode};

use super::{CaseArm, CasePattern, Expression, ExpressionKind, Literal, RecordFieldValue};

/// `name : type` followed by the indented body.
pub fn dump_definition(arena: &TypeArena, name: &str, ty: TypeId, body: &Expression) -> String {
    let mut printer = Printer {
        arena,
        out: String::new(),
    };
    let _ = writeln!(printer.out, "{name} : {}", arena.display(ty));
    printer.expression(body, 1);
    printer.out
}

struct Printer<'a> {
    arena: &'a TypeArena,
    out: String,
}

impl Printer<'_> {
    fn line(&mut self, depth: usize, text: &str) {
        for _ in 0..depth {
            self.out.push_str("  ");
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn typed(&mut self, depth: usize, text: &str, ty: TypeId) {
        let text = format!("{text} : {}", self.arena.display(ty));
        self.line(depth, &text);
    }

    fn expression(&mut self, expr: &Expression, depth: usize) {
        let child = depth + 1;
        match &expr.kind {
            ExpressionKind::Literal(literal) => {
                let text = literal_text(literal);
                self.typed(depth, &text, expr.ty);
            }
            ExpressionKind::ResourceName { name, id } => {
                self.typed(depth, &format!("ResourceName @{name} #{id}"), expr.ty);
            }
            ExpressionKind::Parameter { name, .. } => {
                self.typed(depth, &format!("Parameter {name}"), expr.ty);
            }
            ExpressionKind::LetLocal { name } => {
                self.typed(depth, &format!("LetLocal {name}"), expr.ty);
            }
            ExpressionKind::Definition { name } => {
                self.typed(depth, &format!("Definition {name}"), expr.ty);
            }
            ExpressionKind::Constructor { name, arguments, .. } => {
                self.typed(depth, &format!("Constructor {name}"), expr.ty);
                for argument in arguments {
                    self.expression(argument, child);
                }
            }
            ExpressionKind::Call {
                callee,
                arguments,
                context,
            } => {
                let text = match context {
                    Some(context) => format!("Call {}", self.bindings(*context)),
                    None => "Call".to_string(),
                };
                self.typed(depth, &text, expr.ty);
                self.expression(callee, child);
                for argument in arguments {
                    self.expression(argument, child);
                }
            }
            ExpressionKind::Arithmetic { op, left, right } => {
                self.typed(depth, &format!("Arithmetic {}", op.keyword()), expr.ty);
                self.expression(left, child);
                self.expression(right, child);
            }
            ExpressionKind::Comparison { op, left, right } => {
                self.typed(depth, &format!("Comparison {}", op.keyword()), expr.ty);
                self.expression(left, child);
                self.expression(right, child);
            }
            ExpressionKind::Logical { op, left, right } => {
                self.typed(depth, &format!("Logical {}", op.keyword()), expr.ty);
                self.expression(left, child);
                self.expression(right, child);
            }
            ExpressionKind::Append { left, right } => {
                self.typed(depth, "Append", expr.ty);
                self.expression(left, child);
                self.expression(right, child);
            }
            ExpressionKind::Negate(operand) => {
                self.typed(depth, "Negate", expr.ty);
                self.expression(operand, child);
            }
            ExpressionKind::If {
                condition,
                then_branch,
                else_branch,
            } => {
                self.typed(depth, "If", expr.ty);
                self.expression(condition, child);
                self.expression(then_branch, child);
                self.expression(else_branch, child);
            }
            ExpressionKind::Let { bindings, body } => {
                self.typed(depth, "Let", expr.ty);
                for binding in bindings {
                    self.line(child, &format!("Binding {}", binding.name));
                    self.expression(&binding.value, child + 1);
                }
                self.expression(body, child);
            }
            ExpressionKind::Case { scrutinee, arms } => {
                self.typed(depth, "Case", expr.ty);
                self.expression(scrutinee, child);
                for arm in arms {
                    self.arm(arm, child);
                }
            }
            ExpressionKind::Record(fields) => {
                self.typed(depth, "Record", expr.ty);
                self.fields(fields, child);
            }
            ExpressionKind::RecordUpdate { record, fields } => {
                self.typed(depth, "RecordUpdate", expr.ty);
                self.expression(record, child);
                self.fields(fields, child);
            }
            ExpressionKind::FieldAccess {
                target,
                field,
                index,
            } => {
                self.typed(depth, &format!("FieldAccess .{field} #{index}"), expr.ty);
                self.expression(target, child);
            }
            ExpressionKind::Tuple(elements) => {
                self.typed(depth, "Tuple", expr.ty);
                for element in elements {
                    self.expression(element, child);
                }
            }
            ExpressionKind::List(elements) => {
                self.typed(depth, "List", expr.ty);
                for element in elements {
                    self.expression(element, child);
                }
            }
            ExpressionKind::External { id, arity } => {
                self.typed(depth, &format!("External {id}/{arity}"), expr.ty);
            }
            ExpressionKind::FunctionValue { parameters, body } => {
                self.typed(depth, &format!("FunctionValue ({})", parameters.join(", ")), expr.ty);
                self.expression(body, child);
            }
            ExpressionKind::Error => self.line(depth, "Error"),
        }
    }

    fn arm(&mut self, arm: &CaseArm, depth: usize) {
        let pattern = match &arm.pattern {
            CasePattern::Wildcard => "_".to_string(),
            CasePattern::Literal(literal) => literal_text(literal),
            CasePattern::Variant { name, bindings, .. } if bindings.is_empty() => name.clone(),
            CasePattern::Variant { name, bindings, .. } => format!("{name} {}", bindings.join(" ")),
        };
        self.line(depth, &format!("Arm {pattern}"));
        self.expression(&arm.body, depth + 1);
    }

    fn fields(&mut self, fields: &[RecordFieldValue], depth: usize) {
        for field in fields {
            self.line(depth, &format!("Field {} #{}", field.name, field.index));
            self.expression(&field.value, depth + 1);
        }
    }

    fn bindings(&self, context: TypeId) -> String {
        let TypeNode::ResolvedContext(resolved) = self.arena.get(context) else {
            return self.arena.display(context);
        };
        let pairs: Vec<String> = resolved
            .bindings
            .iter()
            .map(|(name, ty)| format!("{name}={}", self.arena.display(*ty)))
            .collect();
        format!("<{}>", pairs.join(", "))
    }
}

/// `Int 3`, `Fixed -1.500`, `Bool True`.
pub(crate) fn literal_text(literal: &Literal) -> String {
    match literal {
        Literal::Int(v) => format!("Int {v}"),
        Literal::Fixed(v) => {
            let sign = if *v < 0 { "-" } else { "" };
            let abs = v.unsigned_abs();
            format!("Fixed {sign}{}.{:03}", abs / 1000, abs % 1000)
        }
        Literal::String(s) => format!("String {s:?}"),
        Literal::Char(c) => format!("Char {c:?}"),
        Literal::Bool(true) => "Bool True".to_string(),
        Literal::Bool(false) => "Bool False".to_string(),
    }
}

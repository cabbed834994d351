use swamp_core::{SourceMap, Span};

use super::*;
use crate::types::{TYPE_BOOL, TYPE_FIXED, TYPE_INT, TypeArena};

fn span() -> Span {
    let mut sources = SourceMap::new();
    let id = sources.add_memory("memory://test.swamp", "");
    Span::new(id, 0..0)
}

fn expr(kind: ExpressionKind, ty: TypeId) -> Expression {
    Expression::new(kind, ty, span())
}

#[test]
fn function_value_with_arithmetic() {
    let mut arena = TypeArena::new();
    let fn_ty = arena.function(vec![TYPE_INT, TYPE_INT], None);
    let param = || {
        expr(
            ExpressionKind::Parameter {
                name: "a".into(),
                index: 0,
            },
            TYPE_INT,
        )
    };
    let body = expr(
        ExpressionKind::FunctionValue {
            parameters: vec!["a".into()],
            body: Box::new(expr(
                ExpressionKind::Arithmetic {
                    op: ArithmeticOp::Multiply,
                    left: Box::new(param()),
                    right: Box::new(param()),
                },
                TYPE_INT,
            )),
        },
        fn_ty,
    );

    insta::assert_snapshot!(dump_definition(&arena, "first", fn_ty, &body), @r"
    first : Int -> Int
      FunctionValue (a) : Int -> Int
        Arithmetic MULTIPLY : Int
          Parameter a : Int
          Parameter a : Int
    ");
}

#[test]
fn literals_and_case_arms() {
    let arena = TypeArena::new();
    let body = expr(
        ExpressionKind::Case {
            scrutinee: Box::new(expr(ExpressionKind::Literal(Literal::Fixed(-1500)), TYPE_FIXED)),
            arms: vec![
                CaseArm {
                    pattern: CasePattern::Literal(Literal::Fixed(250)),
                    body: expr(ExpressionKind::Literal(Literal::Bool(true)), TYPE_BOOL),
                },
                CaseArm {
                    pattern: CasePattern::Wildcard,
                    body: expr(ExpressionKind::Literal(Literal::Bool(false)), TYPE_BOOL),
                },
            ],
        },
        TYPE_BOOL,
    );

    insta::assert_snapshot!(dump_definition(&arena, "check", TYPE_BOOL, &body), @r"
    check : Bool
      Case : Bool
        Fixed -1.500 : Fixed
        Arm Fixed 0.250
          Bool True : Bool
        Arm _
          Bool False : Bool
    ");
}

use indoc::indoc;

use crate::diagnostics::DiagnosticKind;
use crate::test_utils::compile;

#[test]
fn primitive_function() {
    let compiled = compile(indoc! {"
        first : Int -> Int
        first a = a * a
    "});

    compiled.assert_clean();
    insta::assert_snapshot!(compiled.dump("first"), @r"
    first : Int -> Int
      FunctionValue (a) : Int -> Int
        Arithmetic MULTIPLY : Int
          Parameter a : Int
          Parameter a : Int
    ");
}

#[test]
fn polymorphic_call_binds_type_variables() {
    let compiled = compile(indoc! {"
        drawSprite : Int -> Bool
        drawSprite x = x > 0

        drawSprites : List Int -> List Bool
        drawSprites sprites = List.map drawSprite sprites
    "});

    compiled.assert_clean();
    let dump = compiled.dump("drawSprites");
    let call = dump
        .lines()
        .find(|line| line.trim_start().starts_with("Call"))
        .expect("a call node");
    assert_eq!(call.trim(), "Call <a=Int, b=Bool> : List Bool");
}

#[test]
fn return_type_mismatch() {
    let compiled = compile(indoc! {"
        type Direction =
            Up
            | Down

        isVertical : Direction -> Int
        isVertical direction =
            case direction of
                Up -> True
                Down -> False
    "});

    assert_eq!(
        compiled.kinds(),
        vec![DiagnosticKind::UnMatchingFunctionReturnTypesInFunctionValue]
    );
}

#[test]
fn non_exhaustive_case() {
    let compiled = compile(indoc! {"
        unwrap : Maybe Int -> Int
        unwrap a =
            case a of
                Just x -> x
    "});

    assert_eq!(compiled.kinds(), vec![DiagnosticKind::UnhandledCustomTypeVariants]);
    let message = &compiled.diagnostics.iter().next().unwrap().message;
    assert_eq!(message, "missing variants: Nothing");
}

#[test]
fn wildcard_makes_case_exhaustive() {
    let compiled = compile(indoc! {"
        unwrap : Maybe Int -> Int
        unwrap a =
            case a of
                Just x -> x
                _ -> 0
    "});

    compiled.assert_clean();
}

#[test]
fn duplicate_case_pattern() {
    let compiled = compile(indoc! {"
        describe : Int -> String
        describe n =
            case n of
                0 -> \"zero\"
                0 -> \"nil\"
                _ -> \"many\"
    "});

    assert_eq!(compiled.kinds(), vec![DiagnosticKind::DuplicateCasePattern]);
}

#[test]
fn constructor_of_generic_custom_type() {
    let compiled = compile(indoc! {"
        three : Maybe Int
        three = Just 3

        fallback : Int
        fallback = Maybe.withDefault 0 three
    "});

    compiled.assert_clean();
    assert_eq!(compiled.type_of("fallback"), "Int");
}

#[test]
fn constructor_argument_mismatch() {
    let compiled = compile(indoc! {"
        type Shape =
            Circle Int
            | Square Int

        big : Shape
        big = Circle \"large\"
    "});

    assert_eq!(compiled.kinds(), vec![DiagnosticKind::FunctionArgumentTypeMismatch]);
}

#[test]
fn operand_types_must_match() {
    let compiled = compile("bad = 1 + \"one\"\n");

    assert_eq!(compiled.kinds(), vec![DiagnosticKind::UnmatchingBinaryOperatorTypes]);
}

#[test]
fn unknown_identifier() {
    let compiled = compile(indoc! {"
        value : Int
        value = missing + 1
    "});

    assert_eq!(compiled.kinds(), vec![DiagnosticKind::UnknownIdentifier]);
    insta::assert_snapshot!(compiled.render(), @"memory://test/main.swamp:2:9: error: `missing` is not defined");
}

#[test]
fn if_condition_must_be_bool() {
    let compiled = compile(indoc! {"
        pick : Int -> Int
        pick n = if n then 1 else 2
    "});

    assert_eq!(compiled.kinds(), vec![DiagnosticKind::IfConditionNotBool]);
}

#[test]
fn records_and_field_access() {
    let compiled = compile(indoc! {"
        type alias Position =
            { x : Int
            , y : Int
            }

        origin : Position
        origin = { x = 0, y = 0 }

        right : Position -> Position
        right p = { p | x = p.x + 1 }
    "});

    compiled.assert_clean();
    insta::assert_snapshot!(compiled.dump("right"), @r"
    right : Position -> Position
      FunctionValue (p) : Position -> Position
        RecordUpdate : Position
          Parameter p : Position
          Field x #0
            Arithmetic ADD : Int
              FieldAccess .x #0 : Int
                Parameter p : Position
              Int 1 : Int
    ");
}

#[test]
fn unknown_record_field() {
    let compiled = compile(indoc! {"
        type alias Position =
            { x : Int
            , y : Int
            }

        depth : Position -> Int
        depth p = p.z
    "});

    assert_eq!(compiled.kinds(), vec![DiagnosticKind::UnknownRecordField]);
}

#[test]
fn resource_names_are_numbered() {
    let compiled = compile(indoc! {"
        player = @sprites/player
        enemy = @sprites/enemy
        again = @sprites/player
    "});

    compiled.assert_clean();
    insta::assert_snapshot!(compiled.dump("again"), @r"
    again : ResourceName
      ResourceName @sprites/player #0 : ResourceName
    ");
    assert_eq!(compiled.session.resources.len(), 2);
}

#[test]
fn external_function_arity_is_checked() {
    let compiled = compile(indoc! {"
        clamp : Int -> Int -> Int
        clamp = __externalfn 900 3
    "});

    assert_eq!(compiled.kinds(), vec![DiagnosticKind::ArityMismatch]);
}

#[test]
fn missing_annotation_on_function() {
    let compiled = compile("double x = x * 2\n");

    assert!(compiled.kinds().contains(&DiagnosticKind::MissingAnnotation));
}

#[test]
fn annotation_without_definition() {
    let compiled = compile(indoc! {"
        ghost : Int

        value = 1
    "});

    assert_eq!(compiled.kinds(), vec![DiagnosticKind::UnknownAnnotationTarget]);
}

#[test]
fn unused_local_and_type_are_warned() {
    let compiled = compile(indoc! {"
        type Color =
            Red
            | Green

        area : Int -> Int
        area w =
            let
                h = 2
                unused = 3
                _ignored = 4
            in
            w * h
    "});

    assert_eq!(
        compiled.kinds(),
        vec![DiagnosticKind::UnusedLocalDefinition, DiagnosticKind::UnusedType]
    );
    assert!(!compiled.diagnostics.has_errors());
    insta::assert_snapshot!(compiled.render(), @r"
    memory://test/main.swamp:9:9: warning: `unused` is never used
    memory://test/main.swamp:1:6: warning: type `Color` is never used
    ");
}

#[test]
fn using_a_variant_marks_its_type() {
    let compiled = compile(indoc! {"
        type Color =
            Red
            | Green

        favourite = Red
    "});

    compiled.assert_clean();
}

#[test]
fn variadic_debug_log() {
    let compiled = compile(indoc! {"
        traced : Int -> Int
        traced n = Debug.log n \"value\"
    "});

    compiled.assert_clean();
}

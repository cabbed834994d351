use indoc::indoc;

use super::lexer::{TokenKind, lex};

fn kinds(source: &str) -> Vec<TokenKind> {
    lex(source).into_iter().map(|t| t.kind).collect()
}

fn layout(source: &str) -> String {
    lex(source)
        .iter()
        .map(|t| {
            let marker = if t.line_start { "^" } else { " " };
            format!("{marker}{:>2} {:?} {:?}", t.column, t.kind, t.text(source))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn keywords_take_precedence_over_identifiers() {
    assert_eq!(
        kinds("type alias typed True Truth"),
        vec![
            TokenKind::KwType,
            TokenKind::KwAlias,
            TokenKind::LowerIdent,
            TokenKind::KwTrue,
            TokenKind::UpperIdent,
        ]
    );
}

#[test]
fn leading_underscore_is_an_identifier() {
    assert_eq!(
        kinds("_ _unused __externalfn __x"),
        vec![
            TokenKind::Underscore,
            TokenKind::LowerIdent,
            TokenKind::KwExternalFn,
            TokenKind::LowerIdent,
        ]
    );
}

#[test]
fn operators_use_longest_match() {
    assert_eq!(
        kinds("-> ++ == /= <= >= && || .. - + / < > ."),
        vec![
            TokenKind::Arrow,
            TokenKind::PlusPlus,
            TokenKind::EqualEqual,
            TokenKind::NotEqual,
            TokenKind::LessEqual,
            TokenKind::GreaterEqual,
            TokenKind::AndAnd,
            TokenKind::OrOr,
            TokenKind::DotDot,
            TokenKind::Minus,
            TokenKind::Plus,
            TokenKind::Slash,
            TokenKind::Less,
            TokenKind::Greater,
            TokenKind::Dot,
        ]
    );
}

#[test]
fn literals() {
    assert_eq!(
        kinds(r#"42 1.5 "hi \"there\"" 'x' '\n' @sprites/player"#),
        vec![
            TokenKind::Int,
            TokenKind::Fixed,
            TokenKind::Str,
            TokenKind::Char,
            TokenKind::Char,
            TokenKind::Resource,
        ]
    );
}

#[test]
fn comments_are_dropped() {
    assert_eq!(
        kinds("a -- the rest is ignored ++ b\nc"),
        vec![TokenKind::LowerIdent, TokenKind::LowerIdent]
    );
}

#[test]
fn tokens_record_layout() {
    let source = indoc! {"
        first a =
            case a of
                Just x -> x
    "};
    insta::assert_snapshot!(layout(source), @r#"
    ^ 0 LowerIdent "first"
      6 LowerIdent "a"
      8 Equals "="
    ^ 4 KwCase "case"
      9 LowerIdent "a"
     11 KwOf "of"
    ^ 8 UpperIdent "Just"
     13 LowerIdent "x"
     15 Arrow "->"
     18 LowerIdent "x"
    "#);
}

#[test]
fn garbage_is_coalesced() {
    let tokens = lex("a $$$ b");
    let garbage: Vec<_> = tokens
        .iter()
        .filter(|t| t.kind == TokenKind::Garbage)
        .map(|t| t.text("a $$$ b"))
        .collect();
    assert_eq!(garbage, vec!["$$$"]);
}

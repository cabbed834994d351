use swamp_core::ArtifactName;

use super::*;
use crate::types::{TYPE_BOOL, TYPE_INT, TYPE_STRING, TypeArena, TypeError, TypeId, TypeNode};

/// `map : (a -> b) -> List a -> List b`
fn map_context(arena: &mut TypeArena) -> TypeId {
    let a = arena.local_type_name("a", None);
    let b = arena.local_type_name("b", None);
    let f = arena.function(vec![a, b], None);
    let list_a = arena.list_of(a);
    let list_b = arena.list_of(b);
    let body = arena.function(vec![f, list_a, list_b], None);
    let context = arena.name_only_context(vec!["a".into(), "b".into()], None);
    arena.set_context_body(context, body).unwrap();
    arena.context_reference("map", context, None, None)
}

fn generic(arena: &mut TypeArena, names: &[&str], body: impl FnOnce(&mut TypeArena, &[TypeId]) -> TypeId) -> TypeId {
    let locals: Vec<TypeId> = names.iter().map(|n| arena.local_type_name(*n, None)).collect();
    let body = body(arena, &locals);
    let context = arena.name_only_context(names.iter().map(|n| n.to_string()).collect(), None);
    arena.set_context_body(context, body).unwrap();
    arena.context_reference("f", context, None, None)
}

fn binding(arena: &TypeArena, resolved: TypeId, name: &str) -> String {
    let TypeNode::ResolvedContext(r) = arena.get(resolved) else {
        panic!("expected resolved context");
    };
    arena.display(r.binding(name).unwrap())
}

#[test]
fn map_round_trip() {
    let mut arena = TypeArena::new();
    let map = map_context(&mut arena);
    let predicate = arena.function(vec![TYPE_INT, TYPE_BOOL], None);
    let ints = arena.list_of(TYPE_INT);

    let resolved = concretize(&mut arena, map, &[predicate, ints, TYPE_ANY]).unwrap();
    let collapsed = arena.resolve(resolved).unwrap();

    let f = arena.function(vec![TYPE_INT, TYPE_BOOL], None);
    let list_int = arena.list_of(TYPE_INT);
    let list_bool = arena.list_of(TYPE_BOOL);
    let expected = arena.function(vec![f, list_int, list_bool], None);

    assert!(arena.compatible_types(expected, collapsed).is_ok());
    assert_eq!(arena.display(collapsed), "(Int -> Bool) -> List Int -> List Bool");
}

#[test]
fn bindings_are_captured_from_arguments() {
    let mut arena = TypeArena::new();
    let map = map_context(&mut arena);
    let draw_sprite = arena.function(vec![TYPE_INT, TYPE_BOOL], None);
    let sprites = arena.list_of(TYPE_INT);
    let expected_return = arena.list_of(TYPE_BOOL);

    let resolved = concretize(&mut arena, map, &[draw_sprite, sprites, expected_return]).unwrap();

    assert_eq!(binding(&arena, resolved, "a"), "Int");
    assert_eq!(binding(&arena, resolved, "b"), "Bool");
    let collapsed = arena.resolve(resolved).unwrap();
    let result = arena.as_function(collapsed).unwrap().return_type().unwrap();
    assert_eq!(arena.display(result), "List Bool");
}

#[test]
fn first_concrete_wins_and_any_never_overwrites() {
    let mut arena = TypeArena::new();
    let pair = generic(&mut arena, &["a"], |arena, locals| {
        arena.function(vec![locals[0], locals[0], locals[0]], None)
    });

    let resolved = concretize(&mut arena, pair, &[TYPE_ANY, TYPE_STRING, TYPE_ANY]).unwrap();
    assert_eq!(binding(&arena, resolved, "a"), "String");
}

#[test]
fn incompatible_redefinition_is_a_mismatch() {
    let mut arena = TypeArena::new();
    let pair = generic(&mut arena, &["a"], |arena, locals| {
        arena.function(vec![locals[0], locals[0], locals[0]], None)
    });

    let err = concretize(&mut arena, pair, &[TYPE_INT, TYPE_STRING, TYPE_ANY]).unwrap_err();
    assert_eq!(
        err,
        ConcretizeError::Type(TypeError::Mismatch {
            expected: "Int".into(),
            actual: "String".into()
        })
    );
}

#[test]
fn arity_mismatch_counts_arguments() {
    let mut arena = TypeArena::new();
    let map = map_context(&mut arena);
    let err = concretize(&mut arena, map, &[TYPE_INT, TYPE_ANY]).unwrap_err();
    assert_eq!(
        err,
        ConcretizeError::ArityMismatch {
            expected: 2,
            found: 1
        }
    );
}

#[test]
fn unresolved_name_is_reported() {
    let mut arena = TypeArena::new();
    let phantom = generic(&mut arena, &["a", "b"], |arena, locals| {
        arena.function(vec![locals[0], TYPE_INT], None)
    });
    let err = concretize(&mut arena, phantom, &[TYPE_INT, TYPE_ANY]).unwrap_err();
    assert_eq!(err, ConcretizeError::Unresolved("b".into()));
}

#[test]
fn variadic_wildcard_slurps_the_middle() {
    let mut arena = TypeArena::new();
    let log = generic(&mut arena, &["a"], |arena, locals| {
        let star = arena.any_matching();
        arena.function(vec![locals[0], star, locals[0]], None)
    });

    let resolved = concretize(&mut arena, log, &[TYPE_STRING, TYPE_INT, TYPE_BOOL, TYPE_ANY]).unwrap();
    assert_eq!(binding(&arena, resolved, "a"), "String");

    let err = concretize(&mut arena, log, &[TYPE_STRING, TYPE_ANY]).unwrap_err();
    assert_eq!(err, ConcretizeError::WrongArityForVariadic);
}

#[test]
fn variadic_split_pairs() {
    let split = VariadicSplit::new(4, 1, 6).unwrap();
    assert_eq!(
        split,
        VariadicSplit {
            prefix: 1,
            middle: 3,
            suffix: 2
        }
    );
    let pairs: Vec<_> = split.pairs().collect();
    assert_eq!(pairs, vec![(0, 0), (2, 4), (3, 5)]);

    assert_eq!(
        VariadicSplit::new(2, 1, 1),
        Err(ConcretizeError::WrongArityForVariadic)
    );
}

#[test]
fn variant_fills_unmentioned_slots_with_any() {
    let mut arena = TypeArena::new();
    let a = arena.local_type_name("a", None);
    let maybe = arena.declare_custom("Maybe", ArtifactName::new("Maybe"), vec![a], None);
    let nothing = arena.add_variant(maybe, "Nothing", Vec::new(), None).unwrap();
    let just = arena.add_variant(maybe, "Just", vec![a], None).unwrap();
    let context = arena.name_only_context(vec!["a".into()], None);
    arena.set_context_body(context, maybe).unwrap();

    let nothing_ref = arena.context_reference("Nothing", context, Some(nothing), None);
    let resolved = concretize(&mut arena, nothing_ref, &[]).unwrap();
    assert_eq!(binding(&arena, resolved, "a"), "Any");

    let just_ref = arena.context_reference("Just", context, Some(just), None);
    let resolved = concretize(&mut arena, just_ref, &[TYPE_INT]).unwrap();
    assert_eq!(binding(&arena, resolved, "a"), "Int");
    let variant = arena.resolve(resolved).unwrap();
    let parent = arena.as_variant(variant).unwrap().parent;
    assert_eq!(arena.display(parent), "Maybe Int");
}

#[test]
fn record_and_tuple_bodies_fill_positional_parameters() {
    let mut arena = TypeArena::new();
    let boxed = generic(&mut arena, &["a"], |arena, locals| {
        arena
            .record(vec![("value".into(), locals[0])], vec![locals[0]], None)
            .unwrap()
    });
    let resolved = concretize(&mut arena, boxed, &[TYPE_BOOL]).unwrap();
    assert_eq!(binding(&arena, resolved, "a"), "Bool");

    let pair = generic(&mut arena, &["a", "b"], |arena, locals| arena.tuple(locals.to_vec(), None));
    let resolved = concretize(&mut arena, pair, &[TYPE_INT, TYPE_STRING]).unwrap();
    let collapsed = arena.resolve(resolved).unwrap();
    assert_eq!(arena.display(collapsed), "( Int, String )");
}

#[test]
fn nested_generic_arguments_bind_through_invokers() {
    let mut arena = TypeArena::new();
    let a = arena.local_type_name("a", None);
    let maybe = arena.declare_custom("Maybe", ArtifactName::new("Maybe"), vec![a], None);
    arena.add_variant(maybe, "Nothing", Vec::new(), None).unwrap();
    arena.add_variant(maybe, "Just", vec![a], None).unwrap();

    let with_default = generic(&mut arena, &["a"], |arena, locals| {
        let maybe_a = arena.invoker(maybe, vec![locals[0]], None);
        arena.function(vec![locals[0], maybe_a, locals[0]], None)
    });
    let maybe_int = arena.invoker(maybe, vec![TYPE_INT], None);
    let maybe_int = arena.resolve(maybe_int).unwrap();

    let resolved = concretize(&mut arena, with_default, &[TYPE_ANY, maybe_int, TYPE_ANY]).unwrap();
    assert_eq!(binding(&arena, resolved, "a"), "Int");
}

#[test]
fn bindings_are_copied_from_resolved_contexts() {
    let mut arena = TypeArena::new();
    let map = map_context(&mut arena);
    let predicate = arena.function(vec![TYPE_INT, TYPE_BOOL], None);
    let ints = arena.list_of(TYPE_INT);
    let resolved_map = concretize(&mut arena, map, &[predicate, ints, TYPE_ANY]).unwrap();

    let TypeNode::ContextReference(reference) = arena.get(map).clone() else {
        panic!("expected context reference");
    };
    let apply = generic(&mut arena, &["a", "b"], |arena, _| {
        let ctx_ref = arena.context_reference("inner", reference.context, None, None);
        arena.function(vec![ctx_ref, TYPE_INT], None)
    });
    let resolved = concretize(&mut arena, apply, &[resolved_map, TYPE_INT]).unwrap();
    assert_eq!(binding(&arena, resolved, "a"), "Int");
    assert_eq!(binding(&arena, resolved, "b"), "Bool");
}

#[test]
fn unsupported_body_is_internal() {
    let mut arena = TypeArena::new();
    let window = generic(&mut arena, &["a"], |arena, _| arena.unmanaged("Window", None));
    assert!(matches!(
        concretize(&mut arena, window, &[]),
        Err(ConcretizeError::Internal(_))
    ));

    assert!(matches!(
        concretize(&mut arena, TYPE_INT, &[]),
        Err(ConcretizeError::Internal(_))
    ));
}

use swamp_core::ArtifactName;

use super::*;

fn declare_maybe(arena: &mut TypeArena) -> TypeId {
    let a = arena.local_type_name("a", None);
    let maybe = arena.declare_custom("Maybe", ArtifactName::new("Maybe"), vec![a], None);
    arena.add_variant(maybe, "Nothing", Vec::new(), None).unwrap();
    arena.add_variant(maybe, "Just", vec![a], None).unwrap();
    maybe
}

fn sample_types(arena: &mut TypeArena) -> Vec<TypeId> {
    let maybe = declare_maybe(arena);
    let maybe_int = arena.invoker(maybe, vec![TYPE_INT], None);
    let list = arena.list_of(TYPE_STRING);
    let record = arena
        .record(vec![("x".into(), TYPE_INT), ("y".into(), TYPE_INT)], Vec::new(), None)
        .unwrap();
    let function = arena.function(vec![TYPE_INT, TYPE_BOOL], None);
    let tuple = arena.tuple(vec![TYPE_CHAR, TYPE_FIXED], None);
    let unmanaged = arena.unmanaged("Window", None);
    vec![
        TYPE_INT, TYPE_BOOL, TYPE_BLOB, maybe_int, list, record, function, tuple, unmanaged,
    ]
}

#[test]
fn any_is_compatible_with_everything() {
    let mut arena = TypeArena::new();
    for t in sample_types(&mut arena) {
        assert!(arena.compatible_types(TYPE_ANY, t).is_ok());
        assert!(arena.compatible_types(t, TYPE_ANY).is_ok());
    }
}

#[test]
fn every_atom_is_compatible_with_itself() {
    let mut arena = TypeArena::new();
    for t in sample_types(&mut arena) {
        assert!(arena.compatible_types(t, t).is_ok());
    }
}

#[test]
fn structurally_equal_atoms_are_compatible() {
    let mut arena = TypeArena::new();
    let first = arena
        .record(vec![("x".into(), TYPE_INT), ("y".into(), TYPE_INT)], Vec::new(), None)
        .unwrap();
    let second = arena
        .record(vec![("y".into(), TYPE_INT), ("x".into(), TYPE_INT)], Vec::new(), None)
        .unwrap();
    assert!(arena.compatible_types(first, second).is_ok());

    let l1 = arena.list_of(TYPE_INT);
    let l2 = arena.list_of(TYPE_INT);
    assert!(arena.compatible_types(l1, l2).is_ok());
}

#[test]
fn mismatch_carries_both_sides() {
    let mut arena = TypeArena::new();
    let list_int = arena.list_of(TYPE_INT);
    let list_bool = arena.list_of(TYPE_BOOL);

    let err = arena.compatible_types(list_int, list_bool).unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"expected `List Int`, found `List Bool`");
}

#[test]
fn shape_mismatches() {
    let mut arena = TypeArena::new();
    let unary = arena.function(vec![TYPE_INT, TYPE_INT], None);
    let binary = arena.function(vec![TYPE_INT, TYPE_INT, TYPE_INT], None);
    assert!(arena.compatible_types(unary, binary).is_err());

    let xy = arena
        .record(vec![("x".into(), TYPE_INT), ("y".into(), TYPE_INT)], Vec::new(), None)
        .unwrap();
    let xz = arena
        .record(vec![("x".into(), TYPE_INT), ("z".into(), TYPE_INT)], Vec::new(), None)
        .unwrap();
    assert!(arena.compatible_types(xy, xz).is_err());

    let pair = arena.tuple(vec![TYPE_INT, TYPE_INT], None);
    let triple = arena.tuple(vec![TYPE_INT, TYPE_INT, TYPE_INT], None);
    assert!(arena.compatible_types(pair, triple).is_err());

    let window = arena.unmanaged("Window", None);
    let socket = arena.unmanaged("Socket", None);
    assert!(arena.compatible_types(window, socket).is_err());
    assert!(arena.compatible_types(TYPE_INT, TYPE_FIXED).is_err());
}

#[test]
fn custom_accepts_its_own_variant() {
    let mut arena = TypeArena::new();
    let direction = arena.declare_custom("Direction", ArtifactName::new("game"), Vec::new(), None);
    let up = arena.add_variant(direction, "Up", Vec::new(), None).unwrap();
    arena.add_variant(direction, "Down", Vec::new(), None).unwrap();

    assert!(arena.compatible_types(direction, up).is_ok());
    assert!(arena.compatible_types(up, direction).is_err());
}

#[test]
fn custom_instances_compare_by_arguments() {
    let mut arena = TypeArena::new();
    let maybe = declare_maybe(&mut arena);
    let maybe_int = arena.invoker(maybe, vec![TYPE_INT], None);
    let maybe_bool = arena.invoker(maybe, vec![TYPE_BOOL], None);
    let maybe_any = arena.invoker(maybe, vec![TYPE_ANY], None);

    assert!(arena.compatible_types(maybe_int, maybe_bool).is_err());
    assert!(arena.compatible_types(maybe_int, maybe_any).is_ok());
}

#[test]
fn recursive_customs_compare_without_looping() {
    let mut arena = TypeArena::new();
    let declare_list = |arena: &mut TypeArena, name: &str| {
        let custom = arena.declare_custom(name, ArtifactName::new("game"), Vec::new(), None);
        let tail = arena.reference(ReferenceKind::Custom, name, custom, None);
        arena.add_variant(custom, "Nil", Vec::new(), None).unwrap();
        arena.add_variant(custom, "Cons", vec![TYPE_INT, tail], None).unwrap();
        custom
    };
    let first = declare_list(&mut arena, "Ints");
    let second = declare_list(&mut arena, "Numbers");

    assert!(arena.compatible_types(first, second).is_ok());
}

#[test]
fn local_type_names_match_by_name() {
    let mut arena = TypeArena::new();
    let a1 = arena.local_type_name("a", None);
    let a2 = arena.local_type_name("a", None);
    let b = arena.local_type_name("b", None);
    assert!(arena.compatible_types(a1, a2).is_ok());
    assert!(arena.compatible_types(a1, b).is_err());
    assert!(arena.compatible_types(a1, TYPE_INT).is_err());
}

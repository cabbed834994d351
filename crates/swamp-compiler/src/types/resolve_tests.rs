use swamp_core::ArtifactName;

use super::*;

fn declare_maybe(arena: &mut TypeArena) -> TypeId {
    let a = arena.local_type_name("a", None);
    let maybe = arena.declare_custom("Maybe", ArtifactName::new("Maybe"), vec![a], None);
    arena.add_variant(maybe, "Nothing", Vec::new(), None).unwrap();
    arena.add_variant(maybe, "Just", vec![a], None).unwrap();
    maybe
}

#[test]
fn next_steps_one_level() {
    let mut arena = TypeArena::new();
    let reference = arena.reference(ReferenceKind::Primitive, "Int", TYPE_INT, None);
    let alias = arena.alias("Score", ArtifactName::new("game"), reference, None);

    assert_eq!(arena.next(alias), Some(reference));
    assert_eq!(arena.next(reference), Some(TYPE_INT));
    assert_eq!(arena.next(TYPE_INT), None);
}

#[test]
fn unalias_keeps_contexts() {
    let mut arena = TypeArena::new();
    let a = arena.local_type_name("a", None);
    let body = arena.function(vec![a, a], None);
    let context = arena.name_only_context(vec!["a".into()], None);
    arena.set_context_body(context, body).unwrap();
    let reference = arena.context_reference("identity", context, None, None);
    let alias = arena.alias("Id", ArtifactName::new("game"), reference, None);

    assert_eq!(arena.unalias(alias), reference);
    assert_eq!(arena.resolve(alias).unwrap(), body);
}

#[test]
fn every_reference_resolves_to_an_atom() {
    let mut arena = TypeArena::new();
    let maybe = declare_maybe(&mut arena);
    let invoker = arena.invoker(maybe, vec![TYPE_STRING], None);
    let custom_ref = arena.reference(ReferenceKind::Custom, "Maybe", invoker, None);
    let alias = arena.alias("Name", ArtifactName::new("game"), custom_ref, None);
    let scoped = arena.reference(ReferenceKind::Scoped, "Game.Name", alias, None);

    for id in [invoker, custom_ref, alias, scoped] {
        let resolved = arena.resolve(id).unwrap();
        assert!(arena.get(resolved).is_atom());
    }
    let local = arena.local_type_name("x", None);
    assert_eq!(arena.resolve(local).unwrap(), local);
}

#[test]
fn invoker_instances_are_shared() {
    let mut arena = TypeArena::new();
    let maybe = declare_maybe(&mut arena);
    let first = arena.invoker(maybe, vec![TYPE_INT], None);
    let second = arena.invoker(maybe, vec![TYPE_INT], None);

    let a = arena.resolve(first).unwrap();
    let b = arena.resolve(second).unwrap();
    assert_eq!(a, b);

    let instance = arena.as_custom(a).unwrap().clone();
    assert_eq!(instance.origin, Some(maybe));
    let just = arena.as_variant(instance.variants[1]).unwrap();
    assert_eq!(just.parameters, vec![TYPE_INT]);
    assert_eq!(just.parent, a);
}

#[test]
fn recursive_generic_custom_terminates() {
    let mut arena = TypeArena::new();
    let a = arena.local_type_name("a", None);
    let tree = arena.declare_custom("Tree", ArtifactName::new("game"), vec![a], None);
    let subtree = arena.invoker(tree, vec![a], None);
    let children = arena.list_of(subtree);
    arena.add_variant(tree, "Leaf", Vec::new(), None).unwrap();
    arena.add_variant(tree, "Node", vec![a, children], None).unwrap();

    let int_tree = arena.invoker(tree, vec![TYPE_INT], None);
    let instance = arena.resolve(int_tree).unwrap();
    let node = arena.as_custom(instance).unwrap().variants[1];
    let children = arena.as_variant(node).unwrap().parameters[1];
    assert_eq!(arena.display(children), "List (Tree Int)");

    let TypeNode::Primitive(list) = arena.get(children).clone() else {
        panic!("expected list");
    };
    assert_eq!(arena.resolve(list.generics[0]).unwrap(), instance);
}

#[test]
fn invoker_argument_count_is_checked() {
    let mut arena = TypeArena::new();
    let maybe = declare_maybe(&mut arena);
    let invoker = arena.invoker(maybe, vec![TYPE_INT, TYPE_BOOL], None);
    assert_eq!(
        arena.resolve(invoker),
        Err(TypeError::TypeArgumentCount {
            name: "Maybe".into(),
            expected: 1,
            found: 2
        })
    );

    let not_generic = arena.invoker(TYPE_INT, vec![TYPE_BOOL], None);
    assert_eq!(
        arena.resolve(not_generic),
        Err(TypeError::NotGeneric("Int".into()))
    );
}

#[test]
fn unalias_with_resolve_invoker_reports_internal_error() {
    let mut arena = TypeArena::new();
    let maybe = declare_maybe(&mut arena);
    let good = arena.invoker(maybe, vec![TYPE_INT], None);
    let alias = arena.alias("MaybeInt", ArtifactName::new("game"), good, None);
    let resolved = arena.unalias_with_resolve_invoker(alias).unwrap();
    assert!(arena.as_custom(resolved).is_some());

    let bad = arena.invoker(TYPE_INT, vec![TYPE_BOOL], None);
    assert!(matches!(
        arena.unalias_with_resolve_invoker(bad),
        Err(TypeError::Internal(_))
    ));
}

#[test]
fn deep_alias_chain_hits_depth_guard() {
    let mut arena = TypeArena::new();
    let mut current = TYPE_INT;
    for i in 0..(MAX_RESOLVE_DEPTH + 2) {
        current = arena.alias(format!("A{i}"), ArtifactName::new("game"), current, None);
    }
    assert_eq!(
        arena.resolve(current),
        Err(TypeError::ResolveDepthExceeded(MAX_RESOLVE_DEPTH))
    );
}

#[test]
fn instantiate_substitutes_through_structures() {
    let mut arena = TypeArena::new();
    let maybe = declare_maybe(&mut arena);
    let a = arena.local_type_name("a", None);
    let maybe_a = arena.invoker(maybe, vec![a], None);
    let record = arena
        .record(vec![("value".into(), maybe_a), ("count".into(), TYPE_INT)], Vec::new(), None)
        .unwrap();
    let pair = arena.tuple(vec![a, record], None);

    let bindings = vec![("a".to_string(), TYPE_BOOL)];
    let instantiated = arena.instantiate(pair, &bindings).unwrap();
    assert_eq!(arena.display(instantiated), "( Bool, { value : Maybe Bool, count : Int } )");
    assert!(!arena.has_free_names(instantiated));
    assert!(arena.has_free_names(pair));

    let untouched = arena.instantiate(TYPE_INT, &bindings).unwrap();
    assert_eq!(untouched, TYPE_INT);
}

use swamp_core::{ArtifactName, ModulePath, SourceMap};

use super::Prelude;
use super::sources::FRAGMENTS;
use crate::module::Module;
use crate::type_repo::Found;
use crate::types::{PrimitiveKind, TypeArena};

fn bootstrap() -> (TypeArena, Prelude) {
    let mut arena = TypeArena::new();
    let mut sources = SourceMap::new();
    let prelude = Prelude::bootstrap(&mut arena, &mut sources).unwrap_or_else(|diag| {
        panic!("prelude does not compile:\n{}", diag.printer(&sources).snippets(false).render())
    });
    (arena, prelude)
}

#[test]
fn every_fragment_compiles() {
    let (_, prelude) = bootstrap();

    for &(name, _) in FRAGMENTS {
        let fragment = prelude.fragment(name).expect("fragment is compiled");
        assert!(!fragment.failed, "{name} failed");
        assert!(fragment.internal);
    }
    assert_eq!(prelude.modules().count(), FRAGMENTS.len() + 1);
}

#[test]
fn core_declares_primitives() {
    let (arena, prelude) = bootstrap();

    for kind in PrimitiveKind::ALL {
        let found = prelude.core().types.lookup_type(kind.name()).expect("primitive is declared");
        assert_eq!(found, Found::Local(arena.primitive(kind)));
    }
}

#[test]
fn attach_exposes_fragments_by_prefix() {
    let (arena, prelude) = bootstrap();
    let mut module = Module::new(ArtifactName::new("user"), ModulePath::main(), None);
    prelude.attach(&arena, &mut module).expect("prelude attaches");

    assert!(module.types.lookup_type("Int").is_some());
    assert!(module.imported_definition("List.map").is_some());
    assert!(module.imported_definition("map").is_none());

    // Maybe and Result types are also unprefixed, their functions are not.
    assert!(module.types.lookup_type("Maybe").is_some());
    assert!(module.types.lookup_type("Maybe.Maybe").is_some());
    assert!(module.types.lookup_variant("Just").is_some());
    assert!(module.types.lookup_variant("Ok").is_some());
    assert!(module.imported_definition("withDefault").is_none());
    assert!(module.imported_definition("Maybe.withDefault").is_some());
}

#[test]
fn attaching_twice_is_harmless() {
    let (arena, prelude) = bootstrap();
    let mut module = Module::new(ArtifactName::new("user"), ModulePath::main(), None);

    prelude.attach(&arena, &mut module).expect("prelude attaches");
    prelude.attach(&arena, &mut module).expect("second attach is a no-op");
}

#[test]
fn prelude_functions_are_typed() {
    let (arena, prelude) = bootstrap();
    let list = prelude.fragment("List").expect("List fragment");
    let map = list.definition("map").expect("List.map");

    insta::assert_snapshot!(arena.display(map.ty), @"(a -> b) -> List a -> List b");
}

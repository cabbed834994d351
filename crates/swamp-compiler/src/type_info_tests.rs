use swamp_core::{ArtifactName, Colors};
use swamp_typeinfo::{InfoType, TypeInfoChunk, WriteError, dump};

use crate::type_info::{ConsumeError, TypeInfoBuilder, TypeLookup};
use crate::types::{TYPE_BOOL, TYPE_INT, TYPE_LIST, TypeArena};

#[test]
fn equal_records_share_one_entry() {
    let mut arena = TypeArena::new();
    let mut builder = TypeInfoBuilder::new();
    let first = arena
        .record(vec![("x".into(), TYPE_INT), ("y".into(), TYPE_INT)], Vec::new(), None)
        .unwrap();
    let second = arena
        .record(vec![("y".into(), TYPE_INT), ("x".into(), TYPE_INT)], Vec::new(), None)
        .unwrap();

    let i = builder.consume(&mut arena, first).unwrap();
    assert_eq!(builder.consume(&mut arena, first).unwrap(), i);
    assert_eq!(builder.consume(&mut arena, second).unwrap(), i);

    let j = builder.consume(&mut arena, TYPE_INT).unwrap();
    assert_ne!(i, j);

    let list = arena.list_of(TYPE_INT);
    let k = builder.consume(&mut arena, list).unwrap();
    assert_eq!(builder.chunk().get(k), Some(&InfoType::List(j)));

    let array = arena.array_of(TYPE_INT);
    builder.consume(&mut arena, array).unwrap();

    insta::assert_snapshot!(dump(builder.chunk(), Colors::OFF), @r"
    #0 int
    #1 record { x: #0, y: #0 }
    #2 list #0
    #3 array #0
    ");
}

#[test]
fn equal_customs_share_one_entry() {
    let mut arena = TypeArena::new();
    let mut direction = |artifact: &str| {
        let custom = arena.declare_custom("Direction", ArtifactName::new(artifact), Vec::new(), None);
        arena.add_variant(custom, "Up", Vec::new(), None).unwrap();
        arena.add_variant(custom, "Down", vec![TYPE_INT], None).unwrap();
        custom
    };
    let first = direction("game.Player");
    let second = direction("game.Enemy");

    let mut builder = TypeInfoBuilder::new();
    let i = builder.consume(&mut arena, first).unwrap();
    assert_eq!(builder.consume(&mut arena, second).unwrap(), i);
    assert_eq!(builder.consume(&mut arena, second).unwrap(), i);

    // A different variant list stays distinct.
    let heading = arena.declare_custom("Direction", ArtifactName::new("game.Map"), Vec::new(), None);
    arena.add_variant(heading, "Up", Vec::new(), None).unwrap();
    let j = builder.consume(&mut arena, heading).unwrap();
    assert_ne!(i, j);

    insta::assert_snapshot!(dump(builder.chunk(), Colors::OFF), @r"
    #0 custom Direction { Up, Down (#1) }
    #1 int
    #2 custom Direction { Up }
    ");
}

#[test]
fn lookup_is_consume() {
    let mut arena = TypeArena::new();
    let mut builder = TypeInfoBuilder::new();
    let function = arena.function(vec![TYPE_INT, TYPE_BOOL], None);

    let consumed = builder.consume(&mut arena, function).unwrap();
    assert_eq!(builder.lookup(&mut arena, function).unwrap(), consumed);
    assert_eq!(builder.chunk().len(), 3);
}

#[test]
fn recursive_custom_refers_to_itself() {
    let mut arena = TypeArena::new();
    let tree = arena.declare_custom("Tree", ArtifactName::new("main"), Vec::new(), None);
    arena.add_variant(tree, "Leaf", Vec::new(), None).unwrap();
    arena.add_variant(tree, "Node", vec![tree, TYPE_INT, tree], None).unwrap();

    let mut builder = TypeInfoBuilder::new();
    let index = builder.consume(&mut arena, tree).unwrap();

    let Some(InfoType::Custom { name, variants }) = builder.chunk().get(index) else {
        panic!("expected a custom entry");
    };
    assert_eq!(name, "Tree");
    assert_eq!(variants.len(), 2);
    assert!(variants[0].parameters.is_empty());
    assert_eq!(variants[1].parameters[0], index);
    assert_eq!(variants[1].parameters[2], index);
    assert!(builder.chunk().to_bytes().is_ok());
}

#[test]
fn variant_consumes_its_custom() {
    let mut arena = TypeArena::new();
    let direction = arena.declare_custom("Direction", ArtifactName::new("main"), Vec::new(), None);
    let up = arena.add_variant(direction, "Up", Vec::new(), None).unwrap();

    let mut builder = TypeInfoBuilder::new();
    assert_eq!(
        builder.consume(&mut arena, up).unwrap(),
        builder.consume(&mut arena, direction).unwrap()
    );
}

#[test]
fn aliases_keep_their_own_entry() {
    let mut arena = TypeArena::new();
    let score = arena.alias("Score", ArtifactName::new("main"), TYPE_INT, None);

    let mut builder = TypeInfoBuilder::new();
    let index = builder.consume(&mut arena, score).unwrap();
    let int = builder.consume(&mut arena, TYPE_INT).unwrap();
    assert_eq!(
        builder.chunk().get(index),
        Some(&InfoType::Alias {
            name: "Score".into(),
            target: int,
        })
    );
}

#[test]
fn open_list_can_not_be_serialized() {
    let mut arena = TypeArena::new();
    let mut builder = TypeInfoBuilder::new();
    builder.consume(&mut arena, TYPE_LIST).unwrap();

    let chunk: TypeInfoChunk = builder.into_chunk();
    assert_eq!(
        chunk.to_bytes(),
        Err(WriteError::LocalTypeNotSupported("a".into()))
    );
}

#[test]
fn contexts_are_rejected() {
    let mut arena = TypeArena::new();
    let a = arena.local_type_name("a", None);
    let identity = arena.function(vec![a, a], None);
    let context = arena.name_only_context(vec!["a".into()], None);
    arena.set_context_body(context, identity).unwrap();

    let mut builder = TypeInfoBuilder::new();
    assert!(matches!(
        builder.consume(&mut arena, context),
        Err(ConsumeError::Generic(_))
    ));
}

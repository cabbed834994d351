use swamp_core::Colors;

use super::*;

fn sample() -> TypeInfoChunk {
    let mut chunk = TypeInfoChunk::new();
    let int = chunk.add(InfoType::Int);
    let position = chunk.add(InfoType::record(vec![
        InfoField {
            name: "y".into(),
            ty: int,
        },
        InfoField {
            name: "x".into(),
            ty: int,
        },
    ]));
    chunk.add(InfoType::Alias {
        name: "Position".into(),
        target: position,
    });
    chunk.add(InfoType::List(int));
    chunk.add(InfoType::Custom {
        name: "Maybe".into(),
        variants: vec![
            InfoVariant {
                name: "Nothing".into(),
                parameters: vec![],
            },
            InfoVariant {
                name: "Just".into(),
                parameters: vec![int],
            },
        ],
    });
    chunk.add(InfoType::Function {
        parameters: vec![int, position],
    });
    chunk
}

#[test]
fn dump_plain() {
    insta::assert_snapshot!(dump(&sample(), Colors::OFF), @r"
    #0 int
    #1 record { x: #0, y: #0 }
    #2 alias Position = #1
    #3 list #0
    #4 custom Maybe { Nothing, Just (#0) }
    #5 function (#0, #1)
    ");
}

#[test]
fn dump_colored_wraps_keywords() {
    let mut chunk = TypeInfoChunk::new();
    chunk.add(InfoType::Bool);

    let colors = Colors::new(true);
    assert!(colors.is_enabled());
    assert!(!Colors::new(false).is_enabled());

    let out = dump(&chunk, colors);
    assert_eq!(out, "\x1b[2m#0\x1b[0m \x1b[34mbool\x1b[0m\n");
}

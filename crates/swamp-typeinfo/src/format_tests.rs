use super::*;

#[test]
fn header_carries_version_and_count() {
    let mut chunk = TypeInfoChunk::new();
    chunk.add(InfoType::Int);
    chunk.add(InfoType::Bool);

    let bytes = chunk.to_bytes().unwrap();
    assert_eq!(bytes, [0, 1, 3, 2, InfoKind::Int as u8, InfoKind::Bool as u8]);
}

#[test]
fn record_and_list_layout() {
    let mut chunk = TypeInfoChunk::new();
    let int = chunk.add(InfoType::Int);
    chunk.add(InfoType::record(vec![InfoField {
        name: "x".into(),
        ty: int,
    }]));
    chunk.add(InfoType::List(int));

    let bytes = chunk.to_bytes().unwrap();
    assert_eq!(
        bytes,
        [
            0, 1, 3, 3, //
            7, //
            3, 1, 1, b'x', 0, //
            5, 0,
        ]
    );
}

#[test]
fn custom_layout() {
    let mut chunk = TypeInfoChunk::new();
    let int = chunk.add(InfoType::Int);
    chunk.add(InfoType::Custom {
        name: "M".into(),
        variants: vec![
            InfoVariant {
                name: "N".into(),
                parameters: vec![],
            },
            InfoVariant {
                name: "J".into(),
                parameters: vec![int],
            },
        ],
    });

    let bytes = chunk.to_bytes().unwrap();
    assert_eq!(
        bytes,
        [
            0, 1, 3, 2, //
            7, //
            0, 1, b'M', 2, 1, b'N', 0, 1, b'J', 1, 0,
        ]
    );
}

#[test]
fn written_chunk_reads_back() {
    let mut chunk = TypeInfoChunk::new();
    let int = chunk.add(InfoType::Int);
    let text = chunk.add(InfoType::String);
    let pair = chunk.add(InfoType::Tuple {
        elements: vec![int, text],
    });
    let alias = chunk.add(InfoType::Alias {
        name: "Pair".into(),
        target: pair,
    });
    chunk.add(InfoType::Function {
        parameters: vec![alias, int],
    });
    chunk.add(InfoType::Array(text));
    chunk.add(InfoType::AnyMatching);

    let bytes = chunk.to_bytes().unwrap();
    assert_eq!(TypeInfoChunk::from_bytes(&bytes).unwrap(), chunk);
}

#[test]
fn local_types_are_rejected() {
    let mut chunk = TypeInfoChunk::new();
    chunk.add(InfoType::LocalType { name: "a".into() });

    let err = chunk.to_bytes().unwrap_err();
    assert_eq!(err, WriteError::LocalTypeNotSupported("a".into()));
    assert!(err.to_string().starts_with("not supporting local types"));
}

#[test]
fn table_limit_is_enforced() {
    let mut chunk = TypeInfoChunk::new();
    for i in 0..=MAX_TYPES {
        chunk.push(InfoType::LocalType {
            name: format!("t{i}"),
        });
    }
    assert_eq!(
        chunk.to_bytes().unwrap_err(),
        WriteError::TooManyTypes(MAX_TYPES + 1)
    );
}

#[test]
fn long_names_are_rejected() {
    let mut chunk = TypeInfoChunk::new();
    let int = chunk.add(InfoType::Int);
    chunk.add(InfoType::Alias {
        name: "n".repeat(256),
        target: int,
    });
    assert!(matches!(
        chunk.to_bytes().unwrap_err(),
        WriteError::StringTooLong(_)
    ));
}

#[test]
fn read_rejects_truncated_input() {
    assert_eq!(
        TypeInfoChunk::from_bytes(&[0, 1, 3, 1]).unwrap_err(),
        ReadError::UnexpectedEnd(4)
    );
}

#[test]
fn read_rejects_other_versions() {
    assert_eq!(
        TypeInfoChunk::from_bytes(&[1, 0, 0, 0]).unwrap_err(),
        ReadError::UnsupportedVersion(1, 0, 0)
    );
}

#[test]
fn read_rejects_unknown_tags() {
    assert_eq!(
        TypeInfoChunk::from_bytes(&[0, 1, 3, 1, 99]).unwrap_err(),
        ReadError::UnknownKind {
            tag: 99,
            offset: 4
        }
    );
}

#[test]
fn read_rejects_dangling_indices() {
    assert_eq!(
        TypeInfoChunk::from_bytes(&[0, 1, 3, 1, 5, 3]).unwrap_err(),
        ReadError::IndexOutOfRange { index: 3, count: 1 }
    );
}
